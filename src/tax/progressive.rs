//! Marginal-rate evaluation over a bracket table

use log::trace;
use serde::{Deserialize, Serialize};

use crate::tables::{BracketTable, TaxBracket};

/// Tax attributed to one bracket
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BracketTax {
    pub bracket: TaxBracket,
    /// Portion of income falling inside the bracket
    pub taxed_amount: f64,
    pub rate: f64,
    pub tax: f64,
}

/// Unrounded progressive tax and its per-bracket breakdown
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProgressiveTax {
    /// Sum of `breakdown[..].tax`, accumulated in bracket order
    pub total: f64,
    pub breakdown: Vec<BracketTax>,
}

/// Tax `chargeable_income` band by band
///
/// Only brackets that receive income appear in the breakdown. The total is
/// the running sum of the per-bracket amounts, so the two always agree.
pub fn compute_progressive_tax(chargeable_income: f64, table: &BracketTable) -> ProgressiveTax {
    let mut result = ProgressiveTax::default();
    let mut remaining = chargeable_income;

    for bracket in table.brackets() {
        if remaining <= 0.0 {
            break;
        }

        let taxed_amount = remaining.min(bracket.width());
        let tax = taxed_amount * bracket.rate;
        remaining -= taxed_amount;

        trace!("{}: {:.2} at {} = {:.2}", bracket.label(), taxed_amount, bracket.rate, tax);

        result.total += tax;
        result.breakdown.push(BracketTax {
            bracket: *bracket,
            taxed_amount,
            rate: bracket.rate,
            tax,
        });
    }

    result
}
