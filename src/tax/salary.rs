//! Monthly salary package: gross income, EPF contributions and take-home pay

use serde::{Deserialize, Serialize};

use super::engine::TaxResult;
use crate::calculator::{push_warning, ChartData, ChartSlice};
use crate::money::non_negative;
use crate::tables::{EpfRates, SalaryLimits};

/// Employment income components. Monthly amounts except `bonus`, which is annual.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SalaryPackage {
    pub basic_salary: f64,
    pub allowances: f64,
    pub commission: f64,
    pub overtime: f64,
    pub bonus: f64,
    /// Monthly voluntary EPF top-up
    pub voluntary_epf: f64,
}

impl SalaryPackage {
    pub fn monthly_gross(&self) -> f64 {
        non_negative(self.basic_salary)
            + non_negative(self.allowances)
            + non_negative(self.commission)
            + non_negative(self.overtime)
    }

    pub fn annual_gross(&self) -> f64 {
        self.monthly_gross() * 12.0 + non_negative(self.bonus)
    }

    /// Warnings for negative or unrealistically large components
    pub fn check_limits(&self, limits: &SalaryLimits) -> Vec<String> {
        let mut warnings = Vec::new();
        for (name, amount, limit) in [
            ("Basic salary", self.basic_salary, limits.basic_salary),
            ("Allowances", self.allowances, limits.allowances),
            ("Bonus", self.bonus, limits.bonus),
            ("Commission", self.commission, limits.commission),
            ("Overtime", self.overtime, limits.overtime),
        ] {
            if amount < 0.0 {
                push_warning(&mut warnings, format!("{} cannot be negative; using RM0", name));
            } else if amount > limit {
                push_warning(
                    &mut warnings,
                    format!("{} of RM{:.2} exceeds the realistic limit of RM{:.2}", name, amount, limit),
                );
            }
        }
        warnings
    }
}

/// Salary package result: tax plus EPF and take-home figures
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalaryTaxResult {
    pub monthly_gross: f64,
    pub annual_gross: f64,
    pub employee_epf_annual: f64,
    pub employer_epf_annual: f64,
    pub voluntary_epf_annual: f64,
    pub total_epf: f64,
    /// Monthly gross less employee EPF, voluntary EPF and monthly tax
    pub take_home_monthly: f64,
    pub tax: TaxResult,
}

impl SalaryTaxResult {
    pub fn new(salary: &SalaryPackage, epf: &EpfRates, tax: TaxResult) -> Self {
        let basic = non_negative(salary.basic_salary);
        let voluntary_monthly = non_negative(salary.voluntary_epf);

        let employee_epf_annual = basic * epf.employee * 12.0;
        let employer_epf_annual = basic * epf.employer * 12.0;
        let voluntary_epf_annual = voluntary_monthly * 12.0;
        let monthly_gross = salary.monthly_gross();

        Self {
            monthly_gross,
            annual_gross: salary.annual_gross(),
            employee_epf_annual,
            employer_epf_annual,
            voluntary_epf_annual,
            total_epf: employee_epf_annual + employer_epf_annual + voluntary_epf_annual,
            take_home_monthly: monthly_gross - basic * epf.employee - voluntary_monthly - tax.monthly_tax,
            tax,
        }
    }

    /// Annual gross less tax, employee EPF and voluntary EPF
    pub fn net_income_annual(&self) -> f64 {
        self.annual_gross - self.tax.annual_tax - self.employee_epf_annual - self.voluntary_epf_annual
    }
}

impl ChartData for SalaryTaxResult {
    fn chart_slices(&self) -> Vec<ChartSlice> {
        vec![
            ChartSlice::new("Net Income", self.net_income_annual()),
            ChartSlice::new("Income Tax", self.tax.annual_tax),
            ChartSlice::new("Employee EPF", self.employee_epf_annual),
            ChartSlice::new("Employer EPF", self.employer_epf_annual),
            ChartSlice::new("Voluntary EPF", self.voluntary_epf_annual),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tax::{ReliefClaims, ResidencyClass, TaxEngine};
    use approx::assert_abs_diff_eq;

    fn package() -> SalaryPackage {
        SalaryPackage {
            basic_salary: 5_000.0,
            allowances: 500.0,
            bonus: 10_000.0,
            voluntary_epf: 100.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_gross_income() {
        let salary = package();
        assert_eq!(salary.monthly_gross(), 5_500.0);
        assert_eq!(salary.annual_gross(), 76_000.0);
    }

    #[test]
    fn test_salary_tax_and_take_home() {
        let engine = TaxEngine::default();
        let calc = engine.compute_salary(&package(), ResidencyClass::Resident, &ReliefClaims::default());
        let result = calc.result;

        assert!(calc.warnings.is_empty());
        assert_abs_diff_eq!(result.employee_epf_annual, 6_600.0, epsilon = 1e-9);
        assert_abs_diff_eq!(result.employer_epf_annual, 7_200.0, epsilon = 1e-9);
        assert_eq!(result.voluntary_epf_annual, 1_200.0);
        assert_abs_diff_eq!(result.total_epf, 15_000.0, epsilon = 1e-9);

        // 76,000 - 9,000 personal - 1,200 voluntary = 65,800 chargeable
        assert_eq!(result.tax.chargeable_income, 65_800.0);
        // 1,800 + 15,800 x 13% = 3,854
        assert_eq!(result.tax.annual_tax, 3_854.0);
        assert_eq!(result.tax.monthly_tax, 321.0);
        assert_abs_diff_eq!(result.take_home_monthly, 5_500.0 - 550.0 - 100.0 - 321.0, epsilon = 1e-9);
    }

    #[test]
    fn test_unrealistic_components_warn() {
        let salary = SalaryPackage {
            basic_salary: 150_000.0,
            overtime: -10.0,
            ..Default::default()
        };
        let warnings = salary.check_limits(&SalaryLimits::default());
        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].starts_with("Basic salary"));
        assert!(warnings[1].starts_with("Overtime"));
    }

    #[test]
    fn test_negative_voluntary_epf_warns() {
        let salary = SalaryPackage {
            voluntary_epf: -50.0,
            ..package()
        };
        let calc = TaxEngine::default().compute_salary(&salary, ResidencyClass::Resident, &ReliefClaims::default());

        assert_eq!(calc.warnings.len(), 1);
        assert!(calc.warnings[0].starts_with("Voluntary EPF"));
        assert_eq!(calc.result.voluntary_epf_annual, 0.0);
        // 76,000 - 9,000 personal relief, no voluntary relief
        assert_eq!(calc.result.tax.chargeable_income, 67_000.0);
    }

    #[test]
    fn test_chart_slices() {
        let engine = TaxEngine::default();
        let result = engine
            .compute_salary(&package(), ResidencyClass::Resident, &ReliefClaims::default())
            .result;
        let slices = result.chart_slices();

        let labels: Vec<&str> = slices.iter().map(|s| s.category.as_str()).collect();
        assert_eq!(
            labels,
            vec!["Net Income", "Income Tax", "Employee EPF", "Employer EPF", "Voluntary EPF"]
        );
        assert_abs_diff_eq!(slices[0].amount, 76_000.0 - 3_854.0 - 6_600.0 - 1_200.0, epsilon = 1e-9);
    }
}
