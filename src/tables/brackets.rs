//! Progressive income tax brackets

use serde::{Deserialize, Serialize};

use crate::error::TableError;

/// One marginal-rate band
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub lower_bound: f64,

    /// None for the unbounded top bracket
    pub upper_bound: Option<f64>,

    /// Marginal rate as a fraction (0.13 = 13%)
    pub rate: f64,
}

impl TaxBracket {
    pub fn new(lower_bound: f64, upper_bound: Option<f64>, rate: f64) -> Self {
        Self {
            lower_bound,
            upper_bound,
            rate,
        }
    }

    /// Income that falls into this band; infinite for the top band
    pub fn width(&self) -> f64 {
        match self.upper_bound {
            Some(upper) => upper - self.lower_bound,
            None => f64::INFINITY,
        }
    }

    /// Label such as "RM5,000 - RM20,000" or "Above RM1,000,000"
    pub fn label(&self) -> String {
        match self.upper_bound {
            Some(upper) => format!(
                "RM{} - RM{}",
                group_thousands(self.lower_bound),
                group_thousands(upper)
            ),
            None => format!("Above RM{}", group_thousands(self.lower_bound)),
        }
    }
}

fn group_thousands(amount: f64) -> String {
    let digits = format!("{:.0}", amount);
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Versioned bracket table partitioning [0, inf)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BracketTable {
    /// Year of assessment the table applies to
    pub year: u16,
    brackets: Vec<TaxBracket>,
}

impl BracketTable {
    /// Build a table, checking that the brackets partition [0, inf)
    pub fn new(year: u16, brackets: Vec<TaxBracket>) -> Result<Self, TableError> {
        let table = Self { year, brackets };
        table.validate()?;
        Ok(table)
    }

    /// Malaysian resident rates, year of assessment 2025
    pub fn malaysia_2025() -> Self {
        Self {
            year: 2025,
            brackets: vec![
                TaxBracket::new(0.0, Some(5_000.0), 0.0),
                TaxBracket::new(5_000.0, Some(20_000.0), 0.01),
                TaxBracket::new(20_000.0, Some(35_000.0), 0.03),
                TaxBracket::new(35_000.0, Some(50_000.0), 0.08),
                TaxBracket::new(50_000.0, Some(70_000.0), 0.13),
                TaxBracket::new(70_000.0, Some(100_000.0), 0.21),
                TaxBracket::new(100_000.0, Some(250_000.0), 0.24),
                TaxBracket::new(250_000.0, Some(400_000.0), 0.245),
                TaxBracket::new(400_000.0, Some(600_000.0), 0.25),
                TaxBracket::new(600_000.0, Some(1_000_000.0), 0.26),
                TaxBracket::new(1_000_000.0, None, 0.28),
            ],
        }
    }

    pub fn brackets(&self) -> &[TaxBracket] {
        &self.brackets
    }

    /// Brackets must start at zero, be contiguous and ascending, end unbounded,
    /// and carry rates within [0, 1]
    pub fn validate(&self) -> Result<(), TableError> {
        let first = self
            .brackets
            .first()
            .ok_or_else(|| TableError::InvalidBrackets("table is empty".to_string()))?;
        if first.lower_bound != 0.0 {
            return Err(TableError::InvalidBrackets(format!(
                "first bracket starts at {} instead of 0",
                first.lower_bound
            )));
        }

        let last_index = self.brackets.len() - 1;
        for (i, bracket) in self.brackets.iter().enumerate() {
            if !(0.0..=1.0).contains(&bracket.rate) {
                return Err(TableError::InvalidBrackets(format!(
                    "bracket {} has rate {} outside [0, 1]",
                    i + 1,
                    bracket.rate
                )));
            }

            match (bracket.upper_bound, i == last_index) {
                (None, true) => {}
                (None, false) => {
                    return Err(TableError::InvalidBrackets(format!(
                        "bracket {} is unbounded but is not the top bracket",
                        i + 1
                    )))
                }
                (Some(_), true) => {
                    return Err(TableError::InvalidBrackets(
                        "top bracket must be unbounded".to_string(),
                    ))
                }
                (Some(upper), false) => {
                    if upper <= bracket.lower_bound {
                        return Err(TableError::InvalidBrackets(format!(
                            "bracket {} has upper bound {} not above lower bound {}",
                            i + 1,
                            upper,
                            bracket.lower_bound
                        )));
                    }
                    let next = &self.brackets[i + 1];
                    if next.lower_bound != upper {
                        return Err(TableError::InvalidBrackets(format!(
                            "gap or overlap between bracket {} (ends {}) and bracket {} (starts {})",
                            i + 1,
                            upper,
                            i + 2,
                            next.lower_bound
                        )));
                    }
                }
            }
        }

        Ok(())
    }

    /// Marginal rate applying to the last unit of `income`
    pub fn marginal_rate(&self, income: f64) -> f64 {
        self.brackets
            .iter()
            .find(|b| income <= b.upper_bound.unwrap_or(f64::INFINITY))
            .map(|b| b.rate)
            .unwrap_or(0.0)
    }
}

impl Default for BracketTable {
    fn default() -> Self {
        Self::malaysia_2025()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_is_valid() {
        let table = BracketTable::malaysia_2025();
        assert!(table.validate().is_ok());
        assert_eq!(table.brackets().len(), 11);
        assert_eq!(table.brackets()[1].width(), 15_000.0);
        assert!(table.brackets()[10].width().is_infinite());
    }

    #[test]
    fn test_marginal_rate() {
        let table = BracketTable::malaysia_2025();
        assert_eq!(table.marginal_rate(4_000.0), 0.0);
        assert_eq!(table.marginal_rate(60_000.0), 0.13);
        assert_eq!(table.marginal_rate(2_000_000.0), 0.28);
    }

    #[test]
    fn test_labels() {
        let table = BracketTable::malaysia_2025();
        assert_eq!(table.brackets()[1].label(), "RM5,000 - RM20,000");
        assert_eq!(table.brackets()[10].label(), "Above RM1,000,000");
        assert_eq!(table.brackets()[0].label(), "RM0 - RM5,000");
    }

    #[test]
    fn test_rejects_gap() {
        let result = BracketTable::new(
            2025,
            vec![
                TaxBracket::new(0.0, Some(5_000.0), 0.0),
                TaxBracket::new(6_000.0, None, 0.1),
            ],
        );
        assert!(matches!(result, Err(TableError::InvalidBrackets(_))));
    }

    #[test]
    fn test_rejects_bounded_top() {
        let result = BracketTable::new(2025, vec![TaxBracket::new(0.0, Some(5_000.0), 0.0)]);
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_bad_rate_and_empty() {
        assert!(BracketTable::new(2025, vec![TaxBracket::new(0.0, None, 1.5)]).is_err());
        assert!(BracketTable::new(2025, Vec::new()).is_err());
    }
}
