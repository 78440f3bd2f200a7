//! Export a loan amortization schedule to CSV
//!
//! Optionally prints how the payoff changes across several extra monthly payments.

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use std::path::PathBuf;

use financial_calculators::{LoanParameters, ScenarioRunner};

#[derive(Parser, Debug)]
#[command(name = "export_schedule", about = "Write a loan payment schedule to CSV")]
struct Args {
    #[arg(long)]
    principal: f64,
    #[arg(long, help = "Annual interest rate in percent")]
    rate: f64,
    #[arg(long)]
    years: f64,
    #[arg(long, default_value_t = 0.0)]
    extra: f64,
    #[arg(long, default_value = "loan_schedule.csv")]
    output: PathBuf,
    #[arg(
        long,
        value_delimiter = ',',
        help = "Comma-separated extra payments to compare, e.g. 0,100,250,500"
    )]
    compare: Vec<f64>,
}

/// One CSV row; balance is after the month's payment
#[derive(Debug, Serialize)]
struct ScheduleRow {
    month: u32,
    payment: f64,
    principal: f64,
    interest: f64,
    balance: f64,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let runner = ScenarioRunner::new();
    let params = LoanParameters::new(args.principal, args.rate, args.years, args.extra);
    let calc = runner.run_loan(&params);
    let result = &calc.result;

    for warning in &calc.warnings {
        eprintln!("warning: {}", warning);
    }

    let mut writer = csv::Writer::from_path(&args.output)
        .with_context(|| format!("failed to create {}", args.output.display()))?;

    let mut balance = params.principal;
    for entry in &result.schedule {
        balance -= entry.principal_portion;
        writer.serialize(ScheduleRow {
            month: entry.month,
            payment: entry.total_payment,
            principal: entry.principal_portion,
            interest: entry.interest_portion,
            balance: balance.max(0.0),
        })?;
    }
    writer.flush()?;

    println!(
        "Wrote {} months to {} (total interest RM{:.2})",
        result.schedule.len(),
        args.output.display(),
        result.total_interest_paid
    );

    if !args.compare.is_empty() {
        println!();
        println!("{:>10} {:>8} {:>14} {:>14}", "Extra", "Months", "Interest", "Saved");
        println!("{}", "-".repeat(49));
        let sweep = runner.extra_payment_sweep(&params, &args.compare);
        for (extra, run) in args.compare.iter().zip(&sweep) {
            println!(
                "{:>10.2} {:>8} {:>14.2} {:>14.2}",
                extra, run.actual_months_to_payoff, run.total_interest_paid, run.interest_saved
            );
        }
    }

    Ok(())
}
