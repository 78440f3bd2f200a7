//! Loan input parameters

use serde::{Deserialize, Serialize};

/// Inputs for a fixed-payment loan
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoanParameters {
    /// Amount borrowed
    pub principal: f64,

    /// Nominal annual interest rate in percent (3.5 = 3.5%)
    pub annual_interest_rate_percent: f64,

    /// Loan term in years
    pub term_years: f64,

    /// Extra principal paid on top of the base instalment every month
    #[serde(default)]
    pub extra_monthly_payment: f64,
}

impl LoanParameters {
    pub fn new(
        principal: f64,
        annual_interest_rate_percent: f64,
        term_years: f64,
        extra_monthly_payment: f64,
    ) -> Self {
        Self {
            principal,
            annual_interest_rate_percent,
            term_years,
            extra_monthly_payment,
        }
    }

    /// Build from a purchase price and the financed margin (90 = 90% of price)
    pub fn from_margin(
        price: f64,
        margin_percent: f64,
        annual_interest_rate_percent: f64,
        term_years: f64,
        extra_monthly_payment: f64,
    ) -> Self {
        Self::new(
            price * (margin_percent / 100.0),
            annual_interest_rate_percent,
            term_years,
            extra_monthly_payment,
        )
    }

    /// Monthly periodic rate as a fraction
    pub fn monthly_rate(&self) -> f64 {
        self.annual_interest_rate_percent / 100.0 / 12.0
    }

    /// Number of scheduled monthly instalments
    pub fn scheduled_payments(&self) -> f64 {
        self.term_years * 12.0
    }

    /// Principal, rate and term must all be positive for there to be a loan to show
    pub fn is_active(&self) -> bool {
        self.principal > 0.0 && self.annual_interest_rate_percent > 0.0 && self.term_years > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_margin() {
        let params = LoanParameters::from_margin(500_000.0, 90.0, 4.0, 35.0, 0.0);
        assert_eq!(params.principal, 450_000.0);
        assert_eq!(params.scheduled_payments(), 420.0);
    }

    #[test]
    fn test_is_active() {
        assert!(LoanParameters::new(1000.0, 3.0, 1.0, 0.0).is_active());
        assert!(!LoanParameters::new(0.0, 3.0, 1.0, 0.0).is_active());
        assert!(!LoanParameters::new(1000.0, 0.0, 1.0, 0.0).is_active());
        assert!(!LoanParameters::new(1000.0, 3.0, 0.0, 0.0).is_active());
    }

    #[test]
    fn test_extra_payment_defaults_when_missing() {
        let params: LoanParameters = serde_json::from_str(
            r#"{"principal": 1000.0, "annual_interest_rate_percent": 5.0, "term_years": 2.0}"#,
        )
        .unwrap();
        assert_eq!(params.extra_monthly_payment, 0.0);
    }
}
