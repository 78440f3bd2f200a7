//! Financial Calculators - loan, income tax and motor insurance calculations
//!
//! This library provides:
//! - Loan amortization with extra principal payments and early-payoff savings
//! - Malaysian personal income tax over a versioned bracket table, with reliefs
//! - Motor insurance premium pricing with a full stage-by-stage breakdown
//! - Car affordability (financing plus running costs)
//! - A bounded per-calculator history store and a parallel scenario runner
//!
//! All calculators are pure: they take an input struct and return a
//! [`Calculation`] carrying the result and any non-fatal warnings.

pub mod calculator;
pub mod car;
pub mod error;
pub mod history;
pub mod insurance;
pub mod loan;
pub mod money;
pub mod scenario;
pub mod tables;
pub mod tax;

// Re-export commonly used types
pub use calculator::{Calculation, Calculator, CalculatorKind, ChartData, ChartSlice};
pub use car::{compute_car_affordability, CarAffordabilityInput, CarCostBreakdown, Financing};
pub use error::{HistoryError, TableError};
pub use history::{HistoryRecord, HistoryStore};
pub use insurance::{compute_insurance_premium, CoverageType, InsuranceInput, PremiumBreakdown};
pub use loan::{compute_loan, LoanParameters, LoanResult, PaymentScheduleEntry};
pub use scenario::ScenarioRunner;
pub use tables::Tables;
pub use tax::{compute_tax, ResidencyClass, TaxInput, TaxResult};
