//! Fixed-payment amortization with extra principal payments
//!
//! The base instalment comes from the annuity formula. The payoff itself is
//! simulated month by month, since a fixed extra payment changes the schedule
//! in a way that has no closed form.

use log::{debug, trace};

use super::params::LoanParameters;
use super::schedule::{LoanResult, PayoffEarlier, PayoffSchedule, PaymentScheduleEntry};
use crate::calculator::{push_warning, Calculation, Calculator, CalculatorKind};
use crate::money::SETTLEMENT_EPSILON;

/// Hard cap on simulated months (50 years)
pub const MAX_SIMULATION_MONTHS: u32 = 600;

/// Annual rate above which a loan is flagged as implausible
pub const DEFAULT_PLAUSIBLE_RATE_PERCENT: f64 = 20.0;

/// Monthly annuity instalment
///
/// Returns 0.0 for a non-positive principal or term, or a negative rate.
/// A zero rate spreads the principal evenly over the term.
pub fn compute_base_payment(principal: f64, annual_rate_percent: f64, term_years: f64) -> f64 {
    if principal <= 0.0 || term_years <= 0.0 || annual_rate_percent < 0.0 {
        return 0.0;
    }

    let num_payments = term_years * 12.0;
    if annual_rate_percent == 0.0 {
        return principal / num_payments;
    }

    let r = annual_rate_percent / 100.0 / 12.0;
    let factor = (1.0 + r).powf(num_payments);
    principal * r * factor / (factor - 1.0)
}

/// Simulate the payoff of `principal` at a fixed monthly payment
///
/// Stops once the balance is within the settlement epsilon or after
/// [`MAX_SIMULATION_MONTHS`]. A payment that does not cover the interest
/// repays no principal, so such a loan runs to the cap.
pub fn simulate_payoff(principal: f64, monthly_rate: f64, total_monthly_payment: f64) -> PayoffSchedule {
    let mut schedule = PayoffSchedule::new();
    let mut balance = principal;
    let mut month = 0;

    while balance > SETTLEMENT_EPSILON && month < MAX_SIMULATION_MONTHS {
        month += 1;

        let interest = balance * monthly_rate;
        let principal_portion = (total_monthly_payment - interest).min(balance).max(0.0);
        balance -= principal_portion;

        trace!(
            "month {}, interest {:.4}, principal {:.4}, balance {:.4}",
            month,
            interest,
            principal_portion,
            balance
        );

        schedule.add_entry(PaymentScheduleEntry::new(month, principal_portion, interest));
    }

    schedule.remaining_balance = balance.max(0.0);
    schedule
}

/// Baseline (base payment only) and actual (base + extra) payoff runs
#[derive(Debug, Clone, PartialEq)]
pub struct ExtraPaymentComparison {
    pub baseline: PayoffSchedule,
    pub actual: PayoffSchedule,
    pub interest_saved: f64,
    pub months_saved: i64,
}

/// Run the payoff with and without the extra payment
pub fn compare_with_extra_payment(
    principal: f64,
    monthly_rate: f64,
    base_payment: f64,
    extra_payment: f64,
) -> ExtraPaymentComparison {
    let baseline = simulate_payoff(principal, monthly_rate, base_payment);
    let actual = simulate_payoff(principal, monthly_rate, base_payment + extra_payment);

    let interest_saved = baseline.total_interest - actual.total_interest;
    let months_saved = baseline.months() as i64 - actual.months() as i64;

    ExtraPaymentComparison {
        baseline,
        actual,
        interest_saved,
        months_saved,
    }
}

/// Loan calculator
#[derive(Debug, Clone, Copy)]
pub struct LoanAmortizer {
    /// Annual rates above this are reported as implausible
    pub plausible_rate_percent: f64,
}

impl Default for LoanAmortizer {
    fn default() -> Self {
        Self {
            plausible_rate_percent: DEFAULT_PLAUSIBLE_RATE_PERCENT,
        }
    }
}

impl LoanAmortizer {
    pub fn new(plausible_rate_percent: f64) -> Self {
        Self {
            plausible_rate_percent,
        }
    }

    /// Compute the instalment, schedule and savings from any extra payment
    pub fn compute_loan(&self, params: &LoanParameters) -> Calculation<LoanResult> {
        let mut warnings = Vec::new();

        if !params.is_active() {
            debug!("loan inputs incomplete, returning empty result: {:?}", params);
            return Calculation::clean(LoanResult::empty());
        }

        if params.annual_interest_rate_percent > self.plausible_rate_percent {
            push_warning(
                &mut warnings,
                format!(
                    "Interest rate {:.2}% is above the plausible limit of {:.2}%",
                    params.annual_interest_rate_percent, self.plausible_rate_percent
                ),
            );
        }

        let mut extra = params.extra_monthly_payment;
        if extra.is_nan() || extra < 0.0 {
            push_warning(&mut warnings, "Extra monthly payment cannot be negative; using 0");
            extra = 0.0;
        }

        let base_payment = compute_base_payment(
            params.principal,
            params.annual_interest_rate_percent,
            params.term_years,
        );
        let comparison =
            compare_with_extra_payment(params.principal, params.monthly_rate(), base_payment, extra);

        if !comparison.actual.converged() {
            push_warning(
                &mut warnings,
                format!(
                    "Loan is not repaid within {} months; RM{:.2} remains outstanding",
                    MAX_SIMULATION_MONTHS, comparison.actual.remaining_balance
                ),
            );
        }

        debug!(
            "loan {:.2} at {}% over {} years: base {:.2}, {} months, interest {:.2}, saved {:.2}",
            params.principal,
            params.annual_interest_rate_percent,
            params.term_years,
            base_payment,
            comparison.actual.months(),
            comparison.actual.total_interest,
            comparison.interest_saved
        );

        let ExtraPaymentComparison {
            baseline,
            actual,
            interest_saved,
            months_saved,
        } = comparison;

        let result = LoanResult {
            base_payment_amount: base_payment,
            total_monthly_payment: base_payment + extra,
            actual_months_to_payoff: actual.months(),
            total_interest_paid: actual.total_interest,
            baseline_months: baseline.months(),
            baseline_interest: baseline.total_interest,
            interest_saved,
            months_saved,
            payoff_earlier: PayoffEarlier::from_months(months_saved),
            converged: actual.converged(),
            remaining_balance: actual.remaining_balance,
            schedule: actual.entries,
        };

        Calculation::new(result, warnings)
    }
}

impl Calculator for LoanAmortizer {
    type Input = LoanParameters;
    type Output = LoanResult;

    fn kind(&self) -> CalculatorKind {
        CalculatorKind::Loan
    }

    fn compute(&self, input: &LoanParameters) -> Calculation<LoanResult> {
        self.compute_loan(input)
    }
}

/// Compute a loan with the default plausibility bound
pub fn compute_loan(params: &LoanParameters) -> Calculation<LoanResult> {
    LoanAmortizer::default().compute_loan(params)
}
