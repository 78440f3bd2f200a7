//! Rate, bracket and cap tables consumed by the calculators

mod brackets;
mod tax_rules;
mod vehicle;
pub mod loader;

pub use brackets::{BracketTable, TaxBracket};
pub use loader::DEFAULT_TABLES_PATH;
pub use tax_rules::{EpfRates, ReliefCaps, SalaryLimits, TaxRules};
pub use vehicle::{
    CarCostTables, FactorTable, InsuranceRates, ProductConfig, RoadTaxBand, SegmentTable,
    VehicleSegment,
};

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::TableError;

/// Container for every table the calculators read
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tables {
    pub tax: TaxRules,
    /// Shared by the insurance pricer and the car running-cost estimate
    pub segments: SegmentTable,
    pub insurance: InsuranceRates,
    pub car: CarCostTables,
}

impl Tables {
    /// Compiled-in Malaysian tables for year of assessment 2025
    pub fn malaysia_2025() -> Self {
        Self {
            tax: TaxRules::malaysia_2025(),
            segments: SegmentTable::malaysia(),
            insurance: InsuranceRates::malaysia(),
            car: CarCostTables::malaysia(),
        }
    }

    /// Load tables from CSV files in the default location (data/tables/)
    pub fn from_csv() -> Result<Self, TableError> {
        Self::from_csv_path(Path::new(DEFAULT_TABLES_PATH))
    }

    /// Load tables from CSV files in a specific directory.
    /// Settings not covered by the files keep their compiled-in values.
    pub fn from_csv_path(path: &Path) -> Result<Self, TableError> {
        let mut tables = Self::malaysia_2025();

        tables.tax.brackets = loader::load_tax_brackets(path)?;
        tables.tax.reliefs = loader::load_relief_caps(path)?;
        tables.segments = loader::load_segments(path)?;
        tables.insurance = InsuranceRates {
            driver_age: loader::load_factor_table(path, loader::DRIVER_AGE_FACTORS_FILE)?,
            region: loader::load_factor_table(path, loader::REGION_FACTORS_FILE)?,
            body_type: loader::load_factor_table(path, loader::BODY_TYPE_FACTORS_FILE)?,
            ownership: loader::load_factor_table(path, loader::OWNERSHIP_FACTORS_FILE)?,
            product: loader::load_product_config(path)?,
        };

        log::info!(
            "loaded {} tax brackets (YA {}) and {} vehicle segments from {}",
            tables.tax.brackets.brackets().len(),
            tables.tax.brackets.year,
            tables.segments.len(),
            path.display()
        );
        Ok(tables)
    }
}

impl Default for Tables {
    fn default() -> Self {
        Self::malaysia_2025()
    }
}
