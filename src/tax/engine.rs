//! Annual income tax for one year of assessment

use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::progressive::{compute_progressive_tax, BracketTax};
use super::reliefs::{compute_reliefs, AppliedRelief, ReliefClaims};
use super::salary::{SalaryPackage, SalaryTaxResult};
use crate::calculator::{push_warning, Calculation, Calculator, CalculatorKind};
use crate::money::round_whole;
use crate::tables::{TaxBracket, TaxRules};

/// Taxpayer class deciding between progressive and flat-rate assessment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResidencyClass {
    #[default]
    Resident,
    NonResident,
}

impl fmt::Display for ResidencyClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResidencyClass::Resident => write!(f, "resident"),
            ResidencyClass::NonResident => write!(f, "non-resident"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TaxInput {
    pub gross_annual_income: f64,
    #[serde(default)]
    pub residency: ResidencyClass,
    #[serde(default)]
    pub reliefs: ReliefClaims,
    /// Voluntary EPF top-ups for the year; shares the joint voluntary cap
    #[serde(default)]
    pub voluntary_epf_annual: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TaxResult {
    pub residency: ResidencyClass,
    pub gross_annual_income: f64,
    pub reliefs: Vec<AppliedRelief>,
    pub total_reliefs: f64,
    pub chargeable_income: f64,
    /// Exact sum of the breakdown
    pub unrounded_tax: f64,
    /// Rounded to the nearest ringgit
    pub annual_tax: f64,
    /// annual_tax / 12, rounded to the nearest ringgit
    pub monthly_tax: f64,
    pub effective_rate: f64,
    /// Rate on the next ringgit of income
    pub marginal_rate: f64,
    pub breakdown: Vec<BracketTax>,
}

/// Income tax calculator over a fixed rule set
#[derive(Debug, Clone, Default)]
pub struct TaxEngine {
    rules: TaxRules,
}

impl TaxEngine {
    pub fn new(rules: TaxRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &TaxRules {
        &self.rules
    }

    /// Reliefs, chargeable income and the rounded annual and monthly tax
    ///
    /// Non-residents pay the flat rate on gross income. Their reliefs are
    /// still computed and reported but play no part in the tax.
    pub fn compute_tax(&self, input: &TaxInput) -> Calculation<TaxResult> {
        let mut warnings = Vec::new();

        let gross = if input.gross_annual_income.is_nan() || input.gross_annual_income < 0.0 {
            push_warning(&mut warnings, "Gross income cannot be negative; using RM0");
            0.0
        } else {
            input.gross_annual_income
        };

        let relief_calc = compute_reliefs(&input.reliefs, input.voluntary_epf_annual, &self.rules.reliefs);
        warnings.extend(relief_calc.warnings);
        let reliefs = relief_calc.result;

        let chargeable_income = (gross - reliefs.total).max(0.0);

        let (breakdown, marginal_rate) = match input.residency {
            ResidencyClass::Resident => (
                compute_progressive_tax(chargeable_income, &self.rules.brackets).breakdown,
                self.rules.brackets.marginal_rate(chargeable_income),
            ),
            ResidencyClass::NonResident => {
                let rate = self.rules.non_resident_rate;
                let flat = BracketTax {
                    bracket: TaxBracket::new(0.0, None, rate),
                    taxed_amount: gross,
                    rate,
                    tax: gross * rate,
                };
                (vec![flat], rate)
            }
        };
        let unrounded_tax: f64 = breakdown.iter().map(|b| b.tax).sum();

        let annual_tax = round_whole(unrounded_tax);
        let monthly_tax = round_whole(annual_tax / 12.0);
        let effective_rate = if gross > 0.0 { annual_tax / gross } else { 0.0 };

        debug!(
            "{} gross {:.2}, reliefs {:.2}, chargeable {:.2}, tax {:.0}",
            input.residency, gross, reliefs.total, chargeable_income, annual_tax
        );

        let result = TaxResult {
            residency: input.residency,
            gross_annual_income: gross,
            reliefs: reliefs.reliefs,
            total_reliefs: reliefs.total,
            chargeable_income,
            unrounded_tax,
            annual_tax,
            monthly_tax,
            effective_rate,
            marginal_rate,
            breakdown,
        };

        Calculation::new(result, warnings)
    }

    /// Tax, EPF and take-home pay for a monthly salary package
    pub fn compute_salary(
        &self,
        salary: &SalaryPackage,
        residency: ResidencyClass,
        reliefs: &ReliefClaims,
    ) -> Calculation<SalaryTaxResult> {
        let mut warnings = salary.check_limits(&self.rules.salary_limits);

        let input = TaxInput {
            gross_annual_income: salary.annual_gross(),
            residency,
            reliefs: *reliefs,
            voluntary_epf_annual: salary.voluntary_epf * 12.0,
        };
        let tax = self.compute_tax(&input);
        warnings.extend(tax.warnings);

        let result = SalaryTaxResult::new(salary, &self.rules.epf, tax.result);
        Calculation::new(result, warnings)
    }
}

impl Calculator for TaxEngine {
    type Input = TaxInput;
    type Output = TaxResult;

    fn kind(&self) -> CalculatorKind {
        CalculatorKind::Tax
    }

    fn compute(&self, input: &TaxInput) -> Calculation<TaxResult> {
        self.compute_tax(input)
    }
}

/// Compute tax under the 2025 Malaysian rules
pub fn compute_tax(input: &TaxInput) -> Calculation<TaxResult> {
    TaxEngine::default().compute_tax(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_resident_scenario() {
        // 69,000 gross less the 9,000 personal relief leaves 60,000 chargeable
        let calc = compute_tax(&TaxInput {
            gross_annual_income: 69_000.0,
            ..Default::default()
        });
        let result = calc.result;

        assert_eq!(result.chargeable_income, 60_000.0);
        assert_eq!(result.annual_tax, 3_100.0);
        assert_eq!(result.monthly_tax, 258.0);
        assert_eq!(result.marginal_rate, 0.13);
        assert_eq!(result.breakdown.len(), 5);
        assert!(calc.warnings.is_empty());
    }

    #[test]
    fn test_breakdown_sums_to_unrounded_tax() {
        let result = compute_tax(&TaxInput {
            gross_annual_income: 123_456.78,
            ..Default::default()
        })
        .result;

        let sum: f64 = result.breakdown.iter().map(|b| b.tax).sum();
        assert_eq!(sum, result.unrounded_tax);
        assert_eq!(result.annual_tax, result.unrounded_tax.round());
    }

    #[test]
    fn test_income_below_reliefs() {
        let result = compute_tax(&TaxInput {
            gross_annual_income: 8_000.0,
            ..Default::default()
        })
        .result;

        assert_eq!(result.chargeable_income, 0.0);
        assert_eq!(result.annual_tax, 0.0);
        assert!(result.breakdown.is_empty());
    }

    #[test]
    fn test_non_resident_flat_rate_on_gross() {
        let calc = compute_tax(&TaxInput {
            gross_annual_income: 100_000.0,
            residency: ResidencyClass::NonResident,
            reliefs: ReliefClaims {
                lifestyle: 2_000.0,
                ..Default::default()
            },
            voluntary_epf_annual: 0.0,
        });
        let result = calc.result;

        assert_eq!(result.annual_tax, 30_000.0);
        assert_eq!(result.monthly_tax, 2_500.0);
        assert_eq!(result.total_reliefs, 11_000.0);
        assert_eq!(result.chargeable_income, 89_000.0);
        assert_eq!(result.breakdown.len(), 1);
        assert_abs_diff_eq!(result.effective_rate, 0.30);
        assert_eq!(result.marginal_rate, 0.30);
    }

    #[test]
    fn test_relief_warnings_propagate() {
        let calc = compute_tax(&TaxInput {
            gross_annual_income: 80_000.0,
            reliefs: ReliefClaims {
                medical: 9_000.0,
                ..Default::default()
            },
            ..Default::default()
        });
        assert_eq!(calc.warnings.len(), 1);
        assert_eq!(calc.result.total_reliefs, 14_000.0);
    }

    #[test]
    fn test_residency_serde_names() {
        let json = serde_json::to_string(&ResidencyClass::NonResident).unwrap();
        assert_eq!(json, "\"non-resident\"");
        assert_eq!(ResidencyClass::NonResident.to_string(), "non-resident");
    }
}
