//! Motor insurance premium pricing

mod pricer;
mod types;

pub use pricer::{compute_insurance_premium, sum_insured, InsurancePricer};
pub use types::{CoverageType, InsuranceInput, Ownership, PremiumBreakdown};
