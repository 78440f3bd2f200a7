//! Financial Calculators CLI
//!
//! Runs one loan, tax, insurance or car calculation and prints a summary
//! (or JSON), optionally recording it in a history file.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use serde_json::json;
use std::path::PathBuf;

use financial_calculators::{
    car::{CarAffordabilityInput, Financing},
    insurance::{CoverageType, InsuranceInput, Ownership},
    tax::{ReliefClaims, ResidencyClass, SalaryPackage, TaxInput},
    Calculation, CalculatorKind, ChartData, HistoryStore, LoanParameters, ScenarioRunner, Tables,
};

#[derive(Parser, Debug)]
#[command(
    name = "fincalc",
    about = "Loan, Malaysian income tax, motor insurance and car affordability calculators"
)]
struct Cli {
    #[arg(long, global = true, help = "Directory of CSV rate tables; compiled-in 2025 tables when omitted")]
    tables: Option<PathBuf>,

    #[arg(long, global = true, help = "JSON history file to record the calculation in")]
    history: Option<PathBuf>,

    #[arg(long, global = true, help = "Print the full result as JSON")]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Loan instalment, payoff schedule and extra-payment savings
    Loan(LoanArgs),
    /// Annual income tax from a salary package or a gross income
    Tax(TaxArgs),
    /// Motor insurance premium breakdown
    Insurance(InsuranceArgs),
    /// Monthly cost of financing and running a car
    Car(CarArgs),
    /// Show or clear recorded calculations
    History(HistoryArgs),
}

#[derive(Args, Debug)]
struct LoanArgs {
    #[arg(long, help = "Amount borrowed; use --price and --margin instead to finance a share of a price")]
    principal: Option<f64>,
    #[arg(long)]
    price: Option<f64>,
    #[arg(long, default_value_t = 90.0, help = "Financed share of --price in percent")]
    margin: f64,
    #[arg(long, help = "Annual interest rate in percent, e.g. 4.5")]
    rate: f64,
    #[arg(long)]
    years: f64,
    #[arg(long, default_value_t = 0.0, help = "Extra principal paid every month")]
    extra: f64,
    #[arg(long, help = "Print the yearly payment schedule")]
    schedule: bool,
}

#[derive(Args, Debug)]
struct TaxArgs {
    #[arg(long, help = "Annual gross income; skips the salary package")]
    gross: Option<f64>,
    #[arg(long, default_value_t = 0.0, help = "Monthly basic salary")]
    basic: f64,
    #[arg(long, default_value_t = 0.0, help = "Monthly allowances")]
    allowances: f64,
    #[arg(long, default_value_t = 0.0, help = "Monthly commission")]
    commission: f64,
    #[arg(long, default_value_t = 0.0, help = "Monthly overtime")]
    overtime: f64,
    #[arg(long, default_value_t = 0.0, help = "Annual bonus")]
    bonus: f64,
    #[arg(long, default_value_t = 0.0, help = "Monthly voluntary EPF top-up")]
    voluntary_epf: f64,
    #[arg(long)]
    non_resident: bool,

    #[arg(long, default_value_t = 0.0)]
    spouse: f64,
    #[arg(long, default_value_t = 0.0)]
    disabled: f64,
    #[arg(long, default_value_t = 0.0)]
    children: f64,
    #[arg(long, default_value_t = 0.0)]
    parents: f64,
    #[arg(long, default_value_t = 0.0)]
    lifestyle: f64,
    #[arg(long, default_value_t = 0.0)]
    education: f64,
    #[arg(long, default_value_t = 0.0)]
    medical: f64,
    #[arg(long, default_value_t = 0.0, help = "Private retirement scheme contributions")]
    prs: f64,
    #[arg(long, default_value_t = 0.0)]
    life_insurance: f64,
    #[arg(long, default_value_t = 0.0)]
    zakat: f64,
    #[arg(long, default_value_t = 0.0)]
    donations: f64,
}

impl TaxArgs {
    fn residency(&self) -> ResidencyClass {
        if self.non_resident {
            ResidencyClass::NonResident
        } else {
            ResidencyClass::Resident
        }
    }

    fn reliefs(&self) -> ReliefClaims {
        ReliefClaims {
            spouse: self.spouse,
            disabled: self.disabled,
            children: self.children,
            parents: self.parents,
            lifestyle: self.lifestyle,
            education: self.education,
            medical: self.medical,
            prs: self.prs,
            life_insurance: self.life_insurance,
            zakat: self.zakat,
            donations: self.donations,
        }
    }

    fn salary(&self) -> SalaryPackage {
        SalaryPackage {
            basic_salary: self.basic,
            allowances: self.allowances,
            commission: self.commission,
            overtime: self.overtime,
            bonus: self.bonus,
            voluntary_epf: self.voluntary_epf,
        }
    }
}

/// Policy options shared by the insurance and car commands
#[derive(Args, Debug)]
struct PolicyArgs {
    #[arg(long, default_value_t = 0.0)]
    vehicle_age: f64,
    #[arg(long, default_value = "25plus", help = "under25, 25plus or above60")]
    driver_age: String,
    #[arg(long, default_value_t = 0.0, help = "No-claim discount in percent")]
    ncd: f64,
    #[arg(long, help = "Third-party cover only")]
    third_party: bool,
    #[arg(long, default_value = "standard")]
    region: String,
    #[arg(long, help = "Company-owned vehicle")]
    company: bool,
    #[arg(long)]
    flood: bool,
    #[arg(long)]
    windscreen: bool,
}

impl PolicyArgs {
    fn to_input(&self, vehicle_price: f64, segment: &str, body_type: &str) -> InsuranceInput {
        InsuranceInput {
            vehicle_price,
            segment: segment.to_string(),
            vehicle_age_years: self.vehicle_age,
            driver_age: self.driver_age.clone(),
            ncd_percent: self.ncd,
            coverage: if self.third_party {
                CoverageType::ThirdParty
            } else {
                CoverageType::Comprehensive
            },
            region: self.region.clone(),
            body_type: body_type.to_string(),
            ownership: if self.company {
                Ownership::Company
            } else {
                Ownership::Private
            },
            flood_cover: self.flood,
            windscreen_cover: self.windscreen,
        }
    }
}

#[derive(Args, Debug)]
struct InsuranceArgs {
    #[arg(long)]
    price: f64,
    #[arg(long, help = "A, B, C, D, E, F or Supercar")]
    segment: String,
    #[arg(long, default_value = "sedan")]
    body_type: String,
    #[command(flatten)]
    policy: PolicyArgs,
}

#[derive(Args, Debug)]
struct CarArgs {
    #[arg(long)]
    price: f64,
    #[arg(long, help = "A, B, C, D, E, F or Supercar")]
    segment: String,
    #[arg(long, default_value = "sedan")]
    body_type: String,
    #[arg(long, default_value_t = 1_000.0)]
    engine_cc: f64,
    #[arg(long, default_value_t = 0.0, help = "Kilometres driven per month")]
    mileage: f64,
    #[arg(long, help = "Pay in cash instead of financing")]
    cash: bool,
    #[arg(long, default_value_t = 10.0, help = "Down payment in percent of price")]
    down_payment: f64,
    #[arg(long, default_value_t = 3.0, help = "Annual interest rate in percent")]
    rate: f64,
    #[arg(long, default_value_t = 9.0)]
    years: f64,
    #[command(flatten)]
    policy: PolicyArgs,
}

#[derive(Args, Debug)]
struct HistoryArgs {
    #[arg(value_enum)]
    kind: KindArg,
    #[arg(long, help = "Delete the recorded calculations for this calculator")]
    clear: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum KindArg {
    Loan,
    Tax,
    Insurance,
    Car,
}

impl From<KindArg> for CalculatorKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Loan => CalculatorKind::Loan,
            KindArg::Tax => CalculatorKind::Tax,
            KindArg::Insurance => CalculatorKind::Insurance,
            KindArg::Car => CalculatorKind::Car,
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let tables = match &cli.tables {
        Some(dir) => Tables::from_csv_path(dir)
            .with_context(|| format!("failed to load tables from {}", dir.display()))?,
        None => Tables::malaysia_2025(),
    };
    let runner = ScenarioRunner::with_tables(tables);

    let (kind, summary) = match &cli.command {
        Command::Loan(args) => run_loan(&runner, args, cli.json)?,
        Command::Tax(args) => run_tax(&runner, args, cli.json)?,
        Command::Insurance(args) => run_insurance(&runner, args, cli.json)?,
        Command::Car(args) => run_car(&runner, args, cli.json)?,
        Command::History(args) => return show_history(&cli, args),
    };

    if let Some(path) = &cli.history {
        let mut store = HistoryStore::load(path)
            .with_context(|| format!("failed to read history from {}", path.display()))?;
        store.record(kind, &summary)?;
        store
            .save(path)
            .with_context(|| format!("failed to write history to {}", path.display()))?;
    }

    Ok(())
}

/// Print JSON or the warnings after a text summary
fn finish<T: Serialize>(calc: &Calculation<T>, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(calc)?);
        return Ok(());
    }
    if calc.has_warnings() {
        println!();
        println!("Warnings:");
        for warning in &calc.warnings {
            println!("  - {}", warning);
        }
    }
    Ok(())
}

fn print_chart<C: ChartData>(result: &C) {
    println!();
    for slice in result.chart_slices() {
        println!("  {:<14} RM{:>12.2}", slice.category, slice.amount);
    }
}

fn run_loan(runner: &ScenarioRunner, args: &LoanArgs, json: bool) -> Result<(CalculatorKind, serde_json::Value)> {
    let params = match (args.principal, args.price) {
        (Some(principal), _) => LoanParameters::new(principal, args.rate, args.years, args.extra),
        (None, Some(price)) => LoanParameters::from_margin(price, args.margin, args.rate, args.years, args.extra),
        (None, None) => bail!("either --principal or --price is required"),
    };

    let calc = runner.run_loan(&params);
    let result = &calc.result;

    if !json {
        println!("Loan Calculation");
        println!("================\n");
        println!("Principal:            RM{:>12.2}", params.principal);
        println!("Base payment:         RM{:>12.2}", result.base_payment_amount);
        println!("Total monthly:        RM{:>12.2}", result.total_monthly_payment);
        println!("Months to payoff:     {:>14}", result.actual_months_to_payoff);
        println!("Total interest:       RM{:>12.2}", result.total_interest_paid);
        println!(
            "Total paid:           RM{:>12.2}",
            result.total_principal() + result.total_interest_paid
        );
        if params.extra_monthly_payment > 0.0 {
            println!("Interest saved:       RM{:>12.2}", result.interest_saved);
            println!("Paid off earlier by:  {:>14}", result.payoff_earlier.to_string());
        }
        print_chart(result);

        if args.schedule && !result.is_empty() {
            println!();
            println!("{:>5} {:>12} {:>12} {:>12}", "Month", "Payment", "Principal", "Interest");
            println!("{}", "-".repeat(44));
            for entry in result.yearly_samples() {
                println!(
                    "{:>5} {:>12.2} {:>12.2} {:>12.2}",
                    entry.month, entry.total_payment, entry.principal_portion, entry.interest_portion
                );
            }
        }
    }
    finish(&calc, json)?;

    let summary = json!({
        "input": params,
        "base_payment_amount": result.base_payment_amount,
        "actual_months_to_payoff": result.actual_months_to_payoff,
        "total_interest_paid": result.total_interest_paid,
        "interest_saved": result.interest_saved,
        "months_saved": result.months_saved,
    });
    Ok((CalculatorKind::Loan, summary))
}

fn run_tax(runner: &ScenarioRunner, args: &TaxArgs, json: bool) -> Result<(CalculatorKind, serde_json::Value)> {
    if let Some(gross) = args.gross {
        let input = TaxInput {
            gross_annual_income: gross,
            residency: args.residency(),
            reliefs: args.reliefs(),
            voluntary_epf_annual: args.voluntary_epf * 12.0,
        };
        let calc = runner.run_tax(&input);
        if !json {
            print_tax(&calc.result);
        }
        finish(&calc, json)?;

        let summary = json!({
            "input": input,
            "chargeable_income": calc.result.chargeable_income,
            "annual_tax": calc.result.annual_tax,
            "monthly_tax": calc.result.monthly_tax,
        });
        return Ok((CalculatorKind::Tax, summary));
    }

    let salary = args.salary();
    let calc = runner.run_salary(&salary, args.residency(), &args.reliefs());
    let result = &calc.result;

    if !json {
        println!("Annual gross income:  RM{:>12.2}", result.annual_gross);
        print_tax(&result.tax);
        println!("Total EPF:            RM{:>12.2}", result.total_epf);
        println!("Take-home (monthly):  RM{:>12.2}", result.take_home_monthly);
        print_chart(result);
    }
    finish(&calc, json)?;

    let summary = json!({
        "salary": salary,
        "residency": args.residency(),
        "reliefs": args.reliefs(),
        "annual_gross": result.annual_gross,
        "chargeable_income": result.tax.chargeable_income,
        "annual_tax": result.tax.annual_tax,
        "monthly_tax": result.tax.monthly_tax,
        "take_home_monthly": result.take_home_monthly,
        "total_epf": result.total_epf,
    });
    Ok((CalculatorKind::Tax, summary))
}

fn print_tax(result: &financial_calculators::TaxResult) {
    println!("Income Tax ({})", result.residency);
    println!("==========================\n");
    println!("Total reliefs:        RM{:>12.2}", result.total_reliefs);
    println!("Chargeable income:    RM{:>12.2}", result.chargeable_income);
    println!();
    println!("{:<26} {:>12} {:>6} {:>12}", "Bracket", "Taxed", "Rate", "Tax");
    println!("{}", "-".repeat(60));
    for band in &result.breakdown {
        println!(
            "{:<26} {:>12.2} {:>5.1}% {:>12.2}",
            band.bracket.label(),
            band.taxed_amount,
            band.rate * 100.0,
            band.tax
        );
    }
    println!();
    println!("Annual tax:           RM{:>12.2}", result.annual_tax);
    println!("Monthly tax:          RM{:>12.2}", result.monthly_tax);
    println!("Effective rate:       {:>13.2}%", result.effective_rate * 100.0);
    println!("Marginal rate:        {:>13.2}%", result.marginal_rate * 100.0);
}

fn run_insurance(
    runner: &ScenarioRunner,
    args: &InsuranceArgs,
    json: bool,
) -> Result<(CalculatorKind, serde_json::Value)> {
    let input = args.policy.to_input(args.price, &args.segment, &args.body_type);
    let calc = runner.run_insurance(&input);
    let b = &calc.result;

    if !json {
        println!("Motor Insurance ({} cover)", input.coverage);
        println!("==============================\n");
        println!("Sum insured:          RM{:>12.2}", b.sum_insured);
        println!("Own damage (base):    RM{:>12.2}", b.own_damage_base);
        println!("Own damage (loaded):  RM{:>12.2}", b.own_damage_loaded);
        println!("NCD {:>5.1}%:           RM{:>12.2}", b.ncd_percent_applied, -b.ncd_discount);
        println!("Third party:          RM{:>12.2}", b.third_party);
        println!("Add-ons:              RM{:>12.2}", b.add_on_premium);
        if b.minimum_premium_applied {
            println!("Minimum premium applied (was RM{:.2})", b.pre_tax_before_floor);
        }
        println!("Premium before tax:   RM{:>12.2}", b.pre_tax_total);
        println!("Service tax:          RM{:>12.2}", b.service_tax);
        println!("Stamp duty:           RM{:>12.2}", b.stamp_duty);
        println!("Total payable:        RM{:>12.2}", b.final_payable);
        println!("Monthly equivalent:   RM{:>12.2}", b.monthly_equivalent);
    }
    finish(&calc, json)?;

    let summary = json!({
        "input": input,
        "sum_insured": b.sum_insured,
        "pre_tax_total": b.pre_tax_total,
        "final_payable": b.final_payable,
    });
    Ok((CalculatorKind::Insurance, summary))
}

fn run_car(runner: &ScenarioRunner, args: &CarArgs, json: bool) -> Result<(CalculatorKind, serde_json::Value)> {
    let financing = if args.cash {
        Financing::Cash
    } else {
        Financing::Loan {
            down_payment_percent: args.down_payment,
            interest_rate_percent: args.rate,
            loan_years: args.years,
        }
    };
    let input = CarAffordabilityInput {
        car_price: args.price,
        segment: args.segment.clone(),
        body_type: args.body_type.clone(),
        engine_cc: args.engine_cc,
        monthly_mileage: args.mileage,
        financing,
        policy: args.policy.to_input(args.price, &args.segment, &args.body_type),
    };

    let calc = runner.run_car(&input);
    let b = &calc.result;

    if !json {
        println!("Car Affordability");
        println!("=================\n");
        println!("Down payment:         RM{:>12.2}", b.down_payment);
        println!("Loan amount:          RM{:>12.2}", b.loan_amount);
        print_chart(b);
        println!("  {:<14} RM{:>12.2}", "Total", b.total_monthly_cost);
    }
    finish(&calc, json)?;

    let summary = json!({
        "input": input,
        "monthly_loan_payment": b.monthly_loan_payment,
        "monthly_insurance": b.monthly_insurance,
        "total_monthly_cost": b.total_monthly_cost,
    });
    Ok((CalculatorKind::Car, summary))
}

fn show_history(cli: &Cli, args: &HistoryArgs) -> Result<()> {
    let Some(path) = &cli.history else {
        bail!("--history <FILE> is required for the history command");
    };
    let kind = CalculatorKind::from(args.kind);
    let mut store = HistoryStore::load(path)
        .with_context(|| format!("failed to read history from {}", path.display()))?;

    if args.clear {
        store.clear(kind);
        store.save(path)?;
        println!("Cleared {} history", kind);
        return Ok(());
    }

    if cli.json {
        let records: Vec<_> = store.entries(kind).collect();
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    println!("{} history ({} records)", kind, store.entries(kind).count());
    for record in store.entries(kind) {
        println!("{}  {}", record.timestamp.format("%Y-%m-%d %H:%M:%S"), record.summary);
    }
    Ok(())
}
