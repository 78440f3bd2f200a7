//! Malaysian personal income tax: progressive brackets, reliefs and salary packages

mod engine;
mod progressive;
mod reliefs;
mod salary;

pub use engine::{compute_tax, ResidencyClass, TaxEngine, TaxInput, TaxResult};
pub use progressive::{compute_progressive_tax, BracketTax, ProgressiveTax};
pub use reliefs::{compute_reliefs, AppliedRelief, ReliefClaims, ReliefSummary};
pub use salary::{SalaryPackage, SalaryTaxResult};
