//! Loan amortizer: annuity instalment, month-by-month payoff and extra-payment savings

mod amortizer;
mod params;
mod schedule;

pub use amortizer::{
    compare_with_extra_payment, compute_base_payment, compute_loan, simulate_payoff,
    ExtraPaymentComparison, LoanAmortizer, DEFAULT_PLAUSIBLE_RATE_PERCENT, MAX_SIMULATION_MONTHS,
};
pub use params::LoanParameters;
pub use schedule::{LoanResult, PayoffEarlier, PayoffSchedule, PaymentScheduleEntry};
