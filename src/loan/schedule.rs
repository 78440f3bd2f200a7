//! Payment schedule rows and loan results

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::calculator::{ChartData, ChartSlice};
use crate::money::SETTLEMENT_EPSILON;

/// A single month of an amortization schedule
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PaymentScheduleEntry {
    /// Payment number (1-indexed)
    pub month: u32,
    pub principal_portion: f64,
    pub interest_portion: f64,
    pub total_payment: f64,
}

impl PaymentScheduleEntry {
    pub fn new(month: u32, principal_portion: f64, interest_portion: f64) -> Self {
        Self {
            month,
            principal_portion,
            interest_portion,
            total_payment: principal_portion + interest_portion,
        }
    }
}

impl fmt::Display for PaymentScheduleEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "month {}, payment RM{:.2}, principal RM{:.2}, interest RM{:.2}",
            self.month, self.total_payment, self.principal_portion, self.interest_portion
        )
    }
}

/// Output of one payoff simulation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PayoffSchedule {
    /// Monthly rows in payment order
    pub entries: Vec<PaymentScheduleEntry>,

    /// Sum of interest portions
    pub total_interest: f64,

    /// Balance left when the simulation stopped
    pub remaining_balance: f64,
}

impl PayoffSchedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a monthly row
    pub fn add_entry(&mut self, entry: PaymentScheduleEntry) {
        self.total_interest += entry.interest_portion;
        self.entries.push(entry);
    }

    pub fn months(&self) -> u32 {
        self.entries.len() as u32
    }

    /// False when the month cap was hit before the balance was settled
    pub fn converged(&self) -> bool {
        self.remaining_balance <= SETTLEMENT_EPSILON
    }
}

/// Whole years and leftover months by which a loan is paid off early
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayoffEarlier {
    pub years: i64,
    pub months: i64,
}

impl PayoffEarlier {
    /// Split a signed month count; both parts carry the sign of the input
    pub fn from_months(months_saved: i64) -> Self {
        Self {
            years: months_saved / 12,
            months: months_saved % 12,
        }
    }
}

impl fmt::Display for PayoffEarlier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} years {} months", self.years, self.months)
    }
}

/// Complete loan calculation result
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoanResult {
    /// Annuity instalment without the extra payment
    pub base_payment_amount: f64,

    /// Instalment actually paid each month (base + extra)
    pub total_monthly_payment: f64,

    pub actual_months_to_payoff: u32,
    pub total_interest_paid: f64,

    /// Baseline run with the base instalment only
    pub baseline_months: u32,
    pub baseline_interest: f64,

    pub interest_saved: f64,

    /// May be zero or negative when no extra payment is made
    pub months_saved: i64,
    pub payoff_earlier: PayoffEarlier,

    /// False when the actual run hit the month cap with a balance outstanding
    pub converged: bool,
    pub remaining_balance: f64,

    pub schedule: Vec<PaymentScheduleEntry>,
}

impl LoanResult {
    /// The "nothing to show yet" result for an incomplete form
    pub fn empty() -> Self {
        Self {
            converged: true,
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.schedule.is_empty()
    }

    pub fn total_principal(&self) -> f64 {
        self.schedule.iter().map(|e| e.principal_portion).sum()
    }

    /// One row per year (every 12th month) plus the final month
    pub fn yearly_samples(&self) -> Vec<PaymentScheduleEntry> {
        let mut samples: Vec<PaymentScheduleEntry> =
            self.schedule.iter().step_by(12).copied().collect();
        if let Some(last) = self.schedule.last() {
            if samples.last() != Some(last) {
                samples.push(*last);
            }
        }
        samples
    }
}

impl ChartData for LoanResult {
    fn chart_slices(&self) -> Vec<ChartSlice> {
        vec![
            ChartSlice::new("Principal", self.total_principal()),
            ChartSlice::new("Interest", self.total_interest_paid),
        ]
    }
}
