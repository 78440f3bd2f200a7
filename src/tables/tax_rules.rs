//! Relief caps, EPF contribution rates and other personal income tax rules

use serde::{Deserialize, Serialize};

use super::brackets::BracketTable;

/// Statutory relief amounts and caps (RM)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReliefCaps {
    /// Automatic individual relief, always granted
    pub personal: f64,
    /// 6 children x RM2,000
    pub children: f64,
    /// 2 parents x RM1,500
    pub parents: f64,
    pub lifestyle: f64,
    pub education: f64,
    /// Medical expenses for parents
    pub medical: f64,
    /// Joint cap on voluntary EPF + PRS + life insurance
    pub voluntary_contributions: f64,
}

impl Default for ReliefCaps {
    fn default() -> Self {
        Self {
            personal: 9_000.0,
            children: 12_000.0,
            parents: 3_000.0,
            lifestyle: 2_500.0,
            education: 7_000.0,
            medical: 5_000.0,
            voluntary_contributions: 7_000.0,
        }
    }
}

impl ReliefCaps {
    /// Set a cap by its CSV key; returns false for an unknown key
    pub fn set(&mut self, key: &str, amount: f64) -> bool {
        let slot = match key.trim().to_ascii_lowercase().as_str() {
            "personal" => &mut self.personal,
            "children" => &mut self.children,
            "parents" => &mut self.parents,
            "lifestyle" => &mut self.lifestyle,
            "education" => &mut self.education,
            "medical" => &mut self.medical,
            "voluntary_contributions" => &mut self.voluntary_contributions,
            _ => return false,
        };
        *slot = amount;
        true
    }
}

/// EPF (retirement fund) contribution rates on basic salary
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpfRates {
    pub employee: f64,
    pub employer: f64,
}

impl Default for EpfRates {
    fn default() -> Self {
        Self {
            employee: 0.11,
            employer: 0.12,
        }
    }
}

/// Monthly (annual for bonus) amounts above which a salary component is flagged
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SalaryLimits {
    pub basic_salary: f64,
    pub allowances: f64,
    pub bonus: f64,
    pub commission: f64,
    pub overtime: f64,
}

impl Default for SalaryLimits {
    fn default() -> Self {
        Self {
            basic_salary: 100_000.0,
            allowances: 50_000.0,
            bonus: 500_000.0,
            commission: 100_000.0,
            overtime: 50_000.0,
        }
    }
}

/// Everything the tax engine needs for one year of assessment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxRules {
    pub brackets: BracketTable,
    pub reliefs: ReliefCaps,
    /// Flat rate applied to gross employment income of non-residents
    pub non_resident_rate: f64,
    pub epf: EpfRates,
    pub salary_limits: SalaryLimits,
}

impl TaxRules {
    pub fn malaysia_2025() -> Self {
        Self {
            brackets: BracketTable::malaysia_2025(),
            reliefs: ReliefCaps::default(),
            non_resident_rate: 0.30,
            epf: EpfRates::default(),
            salary_limits: SalaryLimits::default(),
        }
    }
}

impl Default for TaxRules {
    fn default() -> Self {
        Self::malaysia_2025()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_relief_cap() {
        let mut caps = ReliefCaps::default();
        assert!(caps.set("Lifestyle", 3_000.0));
        assert_eq!(caps.lifestyle, 3_000.0);
        assert!(!caps.set("unknown", 1.0));
    }

    #[test]
    fn test_defaults() {
        let rules = TaxRules::malaysia_2025();
        assert_eq!(rules.brackets.year, 2025);
        assert_eq!(rules.non_resident_rate, 0.30);
        assert_eq!(rules.reliefs.personal, 9_000.0);
        assert_eq!(rules.epf.employee, 0.11);
    }
}
