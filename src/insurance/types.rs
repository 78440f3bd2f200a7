//! Motor policy inputs and the premium breakdown

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::calculator::{ChartData, ChartSlice};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CoverageType {
    #[default]
    Comprehensive,
    /// Third-party liability only; no own-damage cover and no add-ons
    ThirdParty,
}

impl fmt::Display for CoverageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoverageType::Comprehensive => write!(f, "comprehensive"),
            CoverageType::ThirdParty => write!(f, "third-party"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ownership {
    #[default]
    Private,
    Company,
}

impl Ownership {
    /// Key into the ownership factor table
    pub fn as_str(&self) -> &'static str {
        match self {
            Ownership::Private => "private",
            Ownership::Company => "company",
        }
    }
}

/// One motor policy quote request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InsuranceInput {
    pub vehicle_price: f64,
    /// Segment code ("A" to "F", "Supercar")
    pub segment: String,
    pub vehicle_age_years: f64,
    /// Driver age band key ("under25", "25plus", "above60")
    pub driver_age: String,
    pub ncd_percent: f64,
    pub coverage: CoverageType,
    pub region: String,
    pub body_type: String,
    pub ownership: Ownership,
    pub flood_cover: bool,
    pub windscreen_cover: bool,
}

impl Default for InsuranceInput {
    fn default() -> Self {
        Self {
            vehicle_price: 0.0,
            segment: String::new(),
            vehicle_age_years: 0.0,
            driver_age: "25plus".to_string(),
            ncd_percent: 0.0,
            coverage: CoverageType::Comprehensive,
            region: "standard".to_string(),
            body_type: "sedan".to_string(),
            ownership: Ownership::Private,
            flood_cover: false,
            windscreen_cover: false,
        }
    }
}

impl InsuranceInput {
    /// Comprehensive quote with standard factors and no add-ons
    pub fn new(vehicle_price: f64, segment: &str) -> Self {
        Self {
            vehicle_price,
            segment: segment.to_string(),
            ..Default::default()
        }
    }
}

/// Every intermediate of the premium pipeline, in pipeline order
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PremiumBreakdown {
    pub sum_insured: f64,

    // Own damage
    pub own_damage_base: f64,
    pub driver_age_factor: f64,
    pub region_factor: f64,
    pub body_type_factor: f64,
    pub ownership_factor: f64,
    /// After loadings, before the no-claim discount
    pub own_damage_loaded: f64,
    pub ncd_percent_applied: f64,
    pub ncd_discount: f64,
    pub own_damage_after_ncd: f64,

    pub third_party: f64,

    // Add-ons
    pub flood_premium: f64,
    pub windscreen_premium: f64,
    pub add_on_premium: f64,

    /// Own damage + third party + add-ons, before the minimum premium floor
    pub pre_tax_before_floor: f64,
    pub minimum_premium_applied: bool,
    pub pre_tax_total: f64,
    pub service_tax: f64,
    pub stamp_duty: f64,
    pub final_payable: f64,
    pub monthly_equivalent: f64,
}

impl PremiumBreakdown {
    /// Nothing to price yet
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.final_payable == 0.0
    }
}

impl ChartData for PremiumBreakdown {
    fn chart_slices(&self) -> Vec<ChartSlice> {
        let own_damage_share = if self.minimum_premium_applied {
            // Floor uplift is reported against own damage
            self.pre_tax_total - self.third_party - self.add_on_premium
        } else {
            self.own_damage_after_ncd
        };
        vec![
            ChartSlice::new("Own Damage", own_damage_share),
            ChartSlice::new("Third Party", self.third_party),
            ChartSlice::new("Add-ons", self.add_on_premium),
            ChartSlice::new("Service Tax", self.service_tax),
            ChartSlice::new("Stamp Duty", self.stamp_duty),
        ]
    }
}
