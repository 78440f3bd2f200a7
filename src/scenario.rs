//! Scenario runner for batch calculations
//!
//! Loads the tables once, then runs many loan, tax, insurance or car
//! calculations against them without re-reading CSV files. Batches run in
//! parallel and come back in input order.

use rayon::prelude::*;
use std::path::Path;

use crate::calculator::Calculation;
use crate::car::{CarAffordabilityCalculator, CarAffordabilityInput, CarCostBreakdown};
use crate::error::TableError;
use crate::insurance::{InsuranceInput, InsurancePricer, PremiumBreakdown};
use crate::loan::{LoanAmortizer, LoanParameters, LoanResult};
use crate::tables::Tables;
use crate::tax::{ReliefClaims, ResidencyClass, SalaryPackage, SalaryTaxResult, TaxEngine, TaxInput, TaxResult};

/// Pre-loaded scenario runner
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::from_csv()?;
/// let results = runner.extra_payment_sweep(&params, &[0.0, 100.0, 200.0]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScenarioRunner {
    tables: Tables,
    amortizer: LoanAmortizer,
}

impl ScenarioRunner {
    /// Runner over the compiled-in tables
    pub fn new() -> Self {
        Self::default()
    }

    /// Create runner by loading tables from CSV files
    pub fn from_csv() -> Result<Self, TableError> {
        Ok(Self::with_tables(Tables::from_csv()?))
    }

    /// Create runner from a specific tables directory
    pub fn from_csv_path(path: &Path) -> Result<Self, TableError> {
        Ok(Self::with_tables(Tables::from_csv_path(path)?))
    }

    pub fn with_tables(tables: Tables) -> Self {
        Self {
            tables,
            amortizer: LoanAmortizer::default(),
        }
    }

    pub fn tables(&self) -> &Tables {
        &self.tables
    }

    /// Mutable access for what-if changes to a rate or cap
    pub fn tables_mut(&mut self) -> &mut Tables {
        &mut self.tables
    }

    pub fn tax_engine(&self) -> TaxEngine {
        TaxEngine::new(self.tables.tax.clone())
    }

    pub fn insurance_pricer(&self) -> InsurancePricer {
        InsurancePricer::new(self.tables.segments.clone(), self.tables.insurance.clone())
    }

    pub fn car_calculator(&self) -> CarAffordabilityCalculator {
        CarAffordabilityCalculator::new(
            self.tables.segments.clone(),
            self.tables.insurance.clone(),
            self.tables.car.clone(),
        )
    }

    pub fn run_loan(&self, params: &LoanParameters) -> Calculation<LoanResult> {
        self.amortizer.compute_loan(params)
    }

    pub fn run_tax(&self, input: &TaxInput) -> Calculation<TaxResult> {
        self.tax_engine().compute_tax(input)
    }

    pub fn run_salary(
        &self,
        salary: &SalaryPackage,
        residency: ResidencyClass,
        reliefs: &ReliefClaims,
    ) -> Calculation<SalaryTaxResult> {
        self.tax_engine().compute_salary(salary, residency, reliefs)
    }

    pub fn run_insurance(&self, input: &InsuranceInput) -> Calculation<PremiumBreakdown> {
        self.insurance_pricer().compute_premium(input)
    }

    pub fn run_car(&self, input: &CarAffordabilityInput) -> Calculation<CarCostBreakdown> {
        self.car_calculator().compute_affordability(input)
    }

    pub fn run_loan_batch(&self, params: &[LoanParameters]) -> Vec<Calculation<LoanResult>> {
        params.par_iter().map(|p| self.amortizer.compute_loan(p)).collect()
    }

    pub fn run_tax_batch(&self, inputs: &[TaxInput]) -> Vec<Calculation<TaxResult>> {
        let engine = self.tax_engine();
        inputs.par_iter().map(|input| engine.compute_tax(input)).collect()
    }

    pub fn run_insurance_batch(&self, inputs: &[InsuranceInput]) -> Vec<Calculation<PremiumBreakdown>> {
        let pricer = self.insurance_pricer();
        inputs.par_iter().map(|input| pricer.compute_premium(input)).collect()
    }

    pub fn run_car_batch(&self, inputs: &[CarAffordabilityInput]) -> Vec<Calculation<CarCostBreakdown>> {
        let calculator = self.car_calculator();
        inputs
            .par_iter()
            .map(|input| calculator.compute_affordability(input))
            .collect()
    }

    /// One loan result per extra monthly payment, in the order given
    pub fn extra_payment_sweep(&self, params: &LoanParameters, extras: &[f64]) -> Vec<LoanResult> {
        extras
            .par_iter()
            .map(|&extra| {
                let params = LoanParameters {
                    extra_monthly_payment: extra,
                    ..*params
                };
                self.amortizer.compute_loan(&params).result
            })
            .collect()
    }
}
