//! Vehicle segment data, motor insurance rating factors and running-cost tables

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Normalise a lookup key: trimmed and lower-cased
fn normalise(key: &str) -> String {
    key.trim().to_ascii_lowercase()
}

/// Per-segment rates for a class of car
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleSegment {
    /// Segment code as entered ("A", "B", ..., "Supercar")
    pub code: String,
    pub name: String,
    /// Own-damage premium rate on sum insured
    pub insurance_rate: f64,
    /// Annual servicing cost as a fraction of car price
    pub servicing_rate: f64,
    /// Base fuel efficiency in km/L
    pub fuel_efficiency: f64,
    pub minor_service: f64,
    pub major_service: f64,
}

impl VehicleSegment {
    pub fn new(
        code: &str,
        name: &str,
        insurance_rate: f64,
        servicing_rate: f64,
        fuel_efficiency: f64,
        minor_service: f64,
        major_service: f64,
    ) -> Self {
        Self {
            code: code.to_string(),
            name: name.to_string(),
            insurance_rate,
            servicing_rate,
            fuel_efficiency,
            minor_service,
            major_service,
        }
    }
}

/// Segment table keyed by segment code (case-insensitive)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SegmentTable {
    segments: BTreeMap<String, VehicleSegment>,
}

impl SegmentTable {
    /// Malaysian market segments and their current rates
    pub fn malaysia() -> Self {
        let mut table = Self::default();
        for segment in [
            VehicleSegment::new("A", "A Segment (Perodua, Proton)", 0.027, 0.015, 15.0, 200.0, 800.0),
            VehicleSegment::new("B", "B Segment (Honda City, Toyota Vios)", 0.028, 0.018, 14.0, 300.0, 1_200.0),
            VehicleSegment::new("C", "C Segment (Honda Civic, Toyota Corolla)", 0.030, 0.02, 13.0, 400.0, 1_500.0),
            VehicleSegment::new("D", "D Segment (Honda Accord, Toyota Camry, 3-Series)", 0.031, 0.025, 12.0, 600.0, 2_000.0),
            VehicleSegment::new("E", "E Segment (BMW 5 Series, Mercedes E-Class)", 0.033, 0.03, 11.0, 800.0, 3_000.0),
            VehicleSegment::new("F", "F Segment (Bentley, Rolls-Royce, S-Class, 7 Series)", 0.036, 0.035, 10.0, 1_200.0, 4_000.0),
            VehicleSegment::new("Supercar", "Supercar (Lamborghini, Ferrari)", 0.040, 0.05, 8.0, 2_000.0, 8_000.0),
        ] {
            table.insert(segment);
        }
        table
    }

    pub fn insert(&mut self, segment: VehicleSegment) {
        self.segments.insert(normalise(&segment.code), segment);
    }

    pub fn get(&self, code: &str) -> Option<&VehicleSegment> {
        self.segments.get(&normalise(code))
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &VehicleSegment> {
        self.segments.values()
    }
}

/// Category key to multiplicative factor, with an explicit default for unknown keys
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorTable {
    factors: BTreeMap<String, f64>,
    default_factor: f64,
}

impl Default for FactorTable {
    fn default() -> Self {
        Self {
            factors: BTreeMap::new(),
            default_factor: 1.0,
        }
    }
}

impl FactorTable {
    pub fn from_pairs(pairs: &[(&str, f64)]) -> Self {
        let mut table = Self::default();
        for &(key, factor) in pairs {
            table.set(key, factor);
        }
        table
    }

    /// Set a factor; the key "default" sets the fallback factor
    pub fn set(&mut self, key: &str, factor: f64) {
        let key = normalise(key);
        if key == "default" {
            self.default_factor = factor;
        } else {
            self.factors.insert(key, factor);
        }
    }

    /// Factor for `key`, or the default factor when the key is unknown
    pub fn factor(&self, key: &str) -> f64 {
        self.factors
            .get(&normalise(key))
            .copied()
            .unwrap_or(self.default_factor)
    }
}

/// Product-level pricing constants for a motor policy
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProductConfig {
    /// Sum insured falls by this fraction per year of vehicle age
    pub depreciation_rate_per_year: f64,
    /// Age beyond which no further depreciation applies
    pub max_depreciation_years: f64,
    /// Sum insured never drops below this fraction of vehicle price
    pub min_sum_insured_ratio: f64,
    /// Third-party premium rate on vehicle price under comprehensive cover
    pub tp_rate_comprehensive: f64,
    /// Third-party premium rate on vehicle price for third-party-only cover
    pub tp_rate_third_party: f64,
    pub max_ncd_percent: f64,
    pub flood_rate: f64,
    /// Windscreen cover value as a fraction of sum insured
    pub windscreen_value_ratio: f64,
    pub windscreen_value_cap: f64,
    /// Premium rate on the windscreen cover value
    pub windscreen_rate: f64,
    pub min_premium: f64,
    pub service_tax_rate: f64,
    pub stamp_duty: f64,
}

impl Default for ProductConfig {
    fn default() -> Self {
        Self {
            depreciation_rate_per_year: 0.04,
            max_depreciation_years: 10.0,
            min_sum_insured_ratio: 0.6,
            tp_rate_comprehensive: 0.002,
            tp_rate_third_party: 0.001,
            max_ncd_percent: 55.0,
            flood_rate: 0.0025,
            windscreen_value_ratio: 0.02,
            windscreen_value_cap: 2_000.0,
            windscreen_rate: 0.15,
            min_premium: 263.13,
            service_tax_rate: 0.08,
            stamp_duty: 10.0,
        }
    }
}

impl ProductConfig {
    /// Set a constant by its CSV key; returns false for an unknown key
    pub fn set(&mut self, key: &str, value: f64) -> bool {
        let slot = match normalise(key).as_str() {
            "depreciation_rate_per_year" => &mut self.depreciation_rate_per_year,
            "max_depreciation_years" => &mut self.max_depreciation_years,
            "min_sum_insured_ratio" => &mut self.min_sum_insured_ratio,
            "tp_rate_comprehensive" => &mut self.tp_rate_comprehensive,
            "tp_rate_third_party" => &mut self.tp_rate_third_party,
            "max_ncd_percent" => &mut self.max_ncd_percent,
            "flood_rate" => &mut self.flood_rate,
            "windscreen_value_ratio" => &mut self.windscreen_value_ratio,
            "windscreen_value_cap" => &mut self.windscreen_value_cap,
            "windscreen_rate" => &mut self.windscreen_rate,
            "min_premium" => &mut self.min_premium,
            "service_tax_rate" => &mut self.service_tax_rate,
            "stamp_duty" => &mut self.stamp_duty,
            _ => return false,
        };
        *slot = value;
        true
    }
}

/// Own-damage loading tables and product constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsuranceRates {
    pub driver_age: FactorTable,
    pub region: FactorTable,
    pub body_type: FactorTable,
    pub ownership: FactorTable,
    pub product: ProductConfig,
}

impl InsuranceRates {
    pub fn malaysia() -> Self {
        Self {
            driver_age: FactorTable::from_pairs(&[("under25", 1.20), ("25plus", 1.0), ("above60", 1.10)]),
            region: FactorTable::from_pairs(&[
                ("kl", 1.05),
                ("johor", 1.04),
                ("penang", 1.03),
                ("sabah", 0.95),
                ("sarawak", 0.95),
                ("langkawi", 1.0),
                ("standard", 1.0),
            ]),
            body_type: FactorTable::from_pairs(&[
                ("suv", 1.10),
                ("mpv", 1.10),
                ("pickup", 1.05),
                ("sedan", 1.0),
                ("coupe", 1.0),
            ]),
            ownership: FactorTable::from_pairs(&[("private", 1.0), ("company", 1.20)]),
            product: ProductConfig::default(),
        }
    }
}

impl Default for InsuranceRates {
    fn default() -> Self {
        Self::malaysia()
    }
}

/// Progressive road tax band: base + per-cc rate above `from_cc`, up to `to_cc`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoadTaxBand {
    pub from_cc: f64,
    /// None for the open-ended top band
    pub to_cc: Option<f64>,
    pub base: f64,
    pub per_cc: f64,
}

/// Running-cost constants for the car affordability calculator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarCostTables {
    /// Road tax bands in ascending engine capacity
    pub road_tax: Vec<RoadTaxBand>,
    /// Multiplier on segment fuel efficiency by body type
    pub fuel_efficiency_factor: FactorTable,
    /// No vehicle is assumed to do worse than this (km/L)
    pub min_fuel_efficiency: f64,
    pub fuel_price_per_litre: f64,
    /// Monthly mileage above this is out of policy (km)
    pub max_monthly_mileage: f64,
    /// Accepted down payment range (percent of price)
    pub min_down_payment_percent: f64,
    pub max_down_payment_percent: f64,
    pub max_interest_rate_percent: f64,
    pub max_loan_years: f64,
}

impl CarCostTables {
    pub fn malaysia() -> Self {
        let band = |from_cc: f64, to_cc: Option<f64>, base: f64, per_cc: f64| RoadTaxBand {
            from_cc,
            to_cc,
            base,
            per_cc,
        };
        Self {
            road_tax: vec![
                band(0.0, Some(1_000.0), 20.0, 0.0),
                band(1_000.0, Some(1_200.0), 55.0, 0.0),
                band(1_200.0, Some(1_400.0), 70.0, 0.0),
                band(1_400.0, Some(1_600.0), 90.0, 0.0),
                band(1_600.0, Some(1_800.0), 200.0, 0.40),
                band(1_800.0, Some(2_000.0), 280.0, 0.50),
                band(2_000.0, Some(2_500.0), 380.0, 1.00),
                band(2_500.0, Some(3_000.0), 880.0, 2.50),
                band(3_000.0, None, 2_130.0, 4.50),
            ],
            fuel_efficiency_factor: FactorTable::from_pairs(&[
                ("suv", 0.75),
                ("mpv", 0.80),
                ("pickup", 0.85),
                ("sedan", 1.0),
                ("coupe", 1.0),
            ]),
            min_fuel_efficiency: 6.0,
            fuel_price_per_litre: 2.50,
            max_monthly_mileage: 1_000.0,
            min_down_payment_percent: 10.0,
            max_down_payment_percent: 100.0,
            max_interest_rate_percent: 10.0,
            max_loan_years: 9.0,
        }
    }
}

impl Default for CarCostTables {
    fn default() -> Self {
        Self::malaysia()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_lookup_is_case_insensitive() {
        let segments = SegmentTable::malaysia();
        assert_eq!(segments.len(), 7);
        assert_eq!(segments.get("b").map(|s| s.insurance_rate), Some(0.028));
        assert_eq!(segments.get("SUPERCAR").map(|s| s.fuel_efficiency), Some(8.0));
        assert!(segments.get("G").is_none());
    }

    #[test]
    fn test_factor_table_default() {
        let rates = InsuranceRates::malaysia();
        assert_eq!(rates.region.factor("KL"), 1.05);
        assert_eq!(rates.region.factor("sabah"), 0.95);
        assert_eq!(rates.region.factor("atlantis"), 1.0);
        assert_eq!(rates.driver_age.factor("under25"), 1.20);
        assert_eq!(rates.ownership.factor("company"), 1.20);
    }

    #[test]
    fn test_factor_table_default_key() {
        let mut table = FactorTable::default();
        table.set("default", 0.9);
        table.set("x", 2.0);
        assert_eq!(table.factor("y"), 0.9);
        assert_eq!(table.factor("X"), 2.0);
        assert_eq!(table.factors.len(), 1);
    }

    #[test]
    fn test_product_config_set() {
        let mut config = ProductConfig::default();
        assert!(config.set("stamp_duty", 12.0));
        assert_eq!(config.stamp_duty, 12.0);
        assert!(!config.set("nonsense", 1.0));
    }

    #[test]
    fn test_road_tax_bands_are_ascending() {
        let tables = CarCostTables::malaysia();
        for pair in tables.road_tax.windows(2) {
            assert_eq!(pair[0].to_cc, Some(pair[1].from_cc));
        }
        assert!(tables.road_tax.last().unwrap().to_cc.is_none());
    }
}
