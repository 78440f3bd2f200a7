//! Common calculator capability shared by the loan, tax, insurance and car calculators
//!
//! Every calculator is a pure function of its input: `compute(input) -> (result, warnings)`.
//! Warnings report out-of-policy input (a relief above its cap, an implausible rate)
//! that was clamped or accepted as-is; they never stop the computation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies a calculator, used to key history records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CalculatorKind {
    Loan,
    Tax,
    Insurance,
    Car,
}

impl CalculatorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CalculatorKind::Loan => "loan",
            CalculatorKind::Tax => "tax",
            CalculatorKind::Insurance => "insurance",
            CalculatorKind::Car => "car",
        }
    }
}

impl fmt::Display for CalculatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one calculator invocation together with its non-fatal warnings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Calculation<T> {
    pub result: T,
    pub warnings: Vec<String>,
}

impl<T> Calculation<T> {
    pub fn new(result: T, warnings: Vec<String>) -> Self {
        Self { result, warnings }
    }

    /// A result with no warnings attached
    pub fn clean(result: T) -> Self {
        Self {
            result,
            warnings: Vec::new(),
        }
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Calculation<U> {
        Calculation {
            result: f(self.result),
            warnings: self.warnings,
        }
    }
}

/// Record a warning and mirror it to the log
pub fn push_warning(warnings: &mut Vec<String>, message: impl Into<String>) {
    let message = message.into();
    log::warn!("{}", message);
    warnings.push(message);
}

/// One labelled segment of a chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSlice {
    pub category: String,
    pub amount: f64,
}

impl ChartSlice {
    pub fn new(category: impl Into<String>, amount: f64) -> Self {
        Self {
            category: category.into(),
            amount,
        }
    }
}

/// Results that can be rendered as a labelled (category, amount) chart
pub trait ChartData {
    fn chart_slices(&self) -> Vec<ChartSlice>;
}

/// A pure financial calculator
pub trait Calculator {
    type Input;
    type Output;

    fn kind(&self) -> CalculatorKind;

    fn compute(&self, input: &Self::Input) -> Calculation<Self::Output>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calculation_map_keeps_warnings() {
        let mut warnings = Vec::new();
        push_warning(&mut warnings, "rate looks high");
        let calc = Calculation::new(2.0_f64, warnings).map(|v| v * 3.0);

        assert_eq!(calc.result, 6.0);
        assert!(calc.has_warnings());
        assert_eq!(calc.warnings, vec!["rate looks high".to_string()]);
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(CalculatorKind::Loan.to_string(), "loan");
        assert_eq!(CalculatorKind::Insurance.as_str(), "insurance");
    }
}
