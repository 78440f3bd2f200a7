//! Motor insurance premium pipeline
//!
//! Stage order matters: each stage works on the running values of the one
//! before it. Sum insured, base split, own-damage loadings, add-ons,
//! no-claim discount, minimum premium floor, then service tax and stamp duty.

use log::debug;

use super::types::{CoverageType, InsuranceInput, PremiumBreakdown};
use crate::calculator::{push_warning, Calculation, Calculator, CalculatorKind};
use crate::tables::{InsuranceRates, ProductConfig, SegmentTable};

/// Depreciated sum insured, never below the configured share of price
pub fn sum_insured(vehicle_price: f64, vehicle_age_years: f64, product: &ProductConfig) -> f64 {
    let age = vehicle_age_years.max(0.0).min(product.max_depreciation_years);
    let depreciated = vehicle_price * (1.0 - age * product.depreciation_rate_per_year);
    let floor = vehicle_price * product.min_sum_insured_ratio;
    if depreciated < floor {
        floor
    } else {
        depreciated
    }
}

/// Premium calculator over a segment table and rating factors
#[derive(Debug, Clone, Default)]
pub struct InsurancePricer {
    segments: SegmentTable,
    rates: InsuranceRates,
}

impl InsurancePricer {
    pub fn new(segments: SegmentTable, rates: InsuranceRates) -> Self {
        Self { segments, rates }
    }

    pub fn compute_premium(&self, input: &InsuranceInput) -> Calculation<PremiumBreakdown> {
        let mut warnings = Vec::new();
        let product = &self.rates.product;

        if input.vehicle_price.is_nan() || input.vehicle_price <= 0.0 {
            return Calculation::clean(PremiumBreakdown::empty());
        }

        let segment = match self.segments.get(&input.segment) {
            Some(segment) => segment,
            None => {
                push_warning(
                    &mut warnings,
                    format!("Unknown vehicle segment {:?}; no premium calculated", input.segment),
                );
                return Calculation::new(PremiumBreakdown::empty(), warnings);
            }
        };

        let mut vehicle_age = input.vehicle_age_years;
        if vehicle_age.is_nan() || vehicle_age < 0.0 {
            push_warning(&mut warnings, "Vehicle age cannot be negative; using 0");
            vehicle_age = 0.0;
        }

        let mut ncd_percent = input.ncd_percent;
        if ncd_percent.is_nan() || ncd_percent < 0.0 {
            push_warning(&mut warnings, "No-claim discount cannot be negative; using 0%");
            ncd_percent = 0.0;
        } else if ncd_percent > product.max_ncd_percent {
            push_warning(
                &mut warnings,
                format!(
                    "No-claim discount of {}% capped at {}%",
                    ncd_percent, product.max_ncd_percent
                ),
            );
            ncd_percent = product.max_ncd_percent;
        }

        let mut b = PremiumBreakdown {
            sum_insured: sum_insured(input.vehicle_price, vehicle_age, product),
            driver_age_factor: 1.0,
            region_factor: 1.0,
            body_type_factor: 1.0,
            ownership_factor: 1.0,
            stamp_duty: product.stamp_duty,
            ..Default::default()
        };

        match input.coverage {
            CoverageType::Comprehensive => {
                b.own_damage_base = b.sum_insured * segment.insurance_rate;
                b.third_party = input.vehicle_price * product.tp_rate_comprehensive;
            }
            CoverageType::ThirdParty => {
                b.third_party = input.vehicle_price * product.tp_rate_third_party;
            }
        }

        // Loadings touch own damage only
        b.own_damage_loaded = b.own_damage_base;
        if b.own_damage_base > 0.0 {
            b.driver_age_factor = self.rates.driver_age.factor(&input.driver_age);
            b.region_factor = self.rates.region.factor(&input.region);
            b.body_type_factor = self.rates.body_type.factor(&input.body_type);
            b.ownership_factor = self.rates.ownership.factor(input.ownership.as_str());

            b.own_damage_loaded *= b.driver_age_factor;
            b.own_damage_loaded *= b.region_factor;
            b.own_damage_loaded *= b.body_type_factor;
            b.own_damage_loaded *= b.ownership_factor;
        }

        if input.coverage == CoverageType::Comprehensive {
            if input.flood_cover {
                b.flood_premium = b.sum_insured * product.flood_rate;
            }
            if input.windscreen_cover {
                let windscreen_value =
                    (b.sum_insured * product.windscreen_value_ratio).min(product.windscreen_value_cap);
                b.windscreen_premium = windscreen_value * product.windscreen_rate;
            }
            b.add_on_premium = b.flood_premium + b.windscreen_premium;
        }

        b.ncd_percent_applied = ncd_percent;
        b.own_damage_after_ncd = b.own_damage_loaded * (1.0 - ncd_percent / 100.0);
        b.ncd_discount = b.own_damage_loaded - b.own_damage_after_ncd;

        b.pre_tax_before_floor = b.own_damage_after_ncd + b.third_party + b.add_on_premium;
        if b.pre_tax_before_floor < product.min_premium {
            b.minimum_premium_applied = true;
            b.pre_tax_total = product.min_premium;
        } else {
            b.pre_tax_total = b.pre_tax_before_floor;
        }

        b.service_tax = b.pre_tax_total * product.service_tax_rate;
        b.final_payable = b.pre_tax_total + b.service_tax + b.stamp_duty;
        b.monthly_equivalent = b.final_payable / 12.0;

        debug!(
            "{} {} cover on {:.2}: sum insured {:.2}, OD {:.2}, TP {:.2}, add-ons {:.2}, payable {:.2}",
            segment.code,
            input.coverage,
            input.vehicle_price,
            b.sum_insured,
            b.own_damage_after_ncd,
            b.third_party,
            b.add_on_premium,
            b.final_payable
        );

        Calculation::new(b, warnings)
    }
}

impl Calculator for InsurancePricer {
    type Input = InsuranceInput;
    type Output = PremiumBreakdown;

    fn kind(&self) -> CalculatorKind {
        CalculatorKind::Insurance
    }

    fn compute(&self, input: &InsuranceInput) -> Calculation<PremiumBreakdown> {
        self.compute_premium(input)
    }
}

/// Price a policy with the Malaysian segment rates and factors
pub fn compute_insurance_premium(input: &InsuranceInput) -> Calculation<PremiumBreakdown> {
    InsurancePricer::new(SegmentTable::malaysia(), InsuranceRates::malaysia()).compute_premium(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::ChartData;
    use crate::insurance::Ownership;
    use approx::assert_abs_diff_eq;
    use proptest::prelude::*;

    #[test]
    fn test_new_car_full_ncd() {
        let input = InsuranceInput {
            ncd_percent: 55.0,
            ..InsuranceInput::new(100_000.0, "B")
        };
        let calc = compute_insurance_premium(&input);
        let b = calc.result;

        assert!(calc.warnings.is_empty());
        assert_eq!(b.sum_insured, 100_000.0);
        assert_abs_diff_eq!(b.own_damage_loaded, 2_800.0, epsilon = 1e-6);
        assert_abs_diff_eq!(b.own_damage_after_ncd, 1_260.0, epsilon = 1e-6);
        assert_abs_diff_eq!(b.third_party, 200.0, epsilon = 1e-9);
        assert_abs_diff_eq!(b.pre_tax_total, 1_460.0, epsilon = 1e-6);
        assert!(!b.minimum_premium_applied);
        assert_abs_diff_eq!(b.service_tax, 116.8, epsilon = 1e-6);
        assert_abs_diff_eq!(b.final_payable, 1_586.8, epsilon = 1e-6);
    }

    #[test]
    fn test_third_party_hits_minimum_premium() {
        let input = InsuranceInput {
            coverage: CoverageType::ThirdParty,
            flood_cover: true,
            ..InsuranceInput::new(100_000.0, "B")
        };
        let b = compute_insurance_premium(&input).result;

        assert_eq!(b.own_damage_base, 0.0);
        assert_eq!(b.add_on_premium, 0.0);
        assert_abs_diff_eq!(b.pre_tax_before_floor, 100.0, epsilon = 1e-9);
        assert!(b.minimum_premium_applied);
        assert_eq!(b.pre_tax_total, 263.13);
        assert_abs_diff_eq!(b.final_payable, 294.1804, epsilon = 1e-9);
    }

    #[test]
    fn test_loadings_and_add_ons() {
        let input = InsuranceInput {
            vehicle_age_years: 3.0,
            driver_age: "under25".to_string(),
            region: "KL".to_string(),
            body_type: "suv".to_string(),
            ownership: Ownership::Company,
            ncd_percent: 25.0,
            flood_cover: true,
            windscreen_cover: true,
            ..InsuranceInput::new(150_000.0, "C")
        };
        let b = compute_insurance_premium(&input).result;

        // 150,000 x (1 - 3 x 4%)
        assert_abs_diff_eq!(b.sum_insured, 132_000.0, epsilon = 1e-6);
        assert_abs_diff_eq!(b.own_damage_base, 3_960.0, epsilon = 1e-6);
        assert_abs_diff_eq!(b.own_damage_loaded, 3_960.0 * 1.2 * 1.05 * 1.1 * 1.2, epsilon = 1e-6);
        assert_abs_diff_eq!(b.own_damage_after_ncd, b.own_damage_loaded * 0.75, epsilon = 1e-6);
        assert_abs_diff_eq!(b.flood_premium, 330.0, epsilon = 1e-6);
        // 2% of 132,000 exceeds the 2,000 cap
        assert_abs_diff_eq!(b.windscreen_premium, 300.0, epsilon = 1e-9);
        assert_abs_diff_eq!(b.third_party, 300.0, epsilon = 1e-9);
        assert_abs_diff_eq!(
            b.pre_tax_total,
            b.own_damage_after_ncd + b.third_party + b.add_on_premium,
            epsilon = 1e-9
        );
        assert_abs_diff_eq!(
            b.final_payable,
            b.pre_tax_total * 1.08 + 10.0,
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_add_ons_not_discounted_by_ncd() {
        let b = compute_insurance_premium(&InsuranceInput {
            ncd_percent: 55.0,
            flood_cover: true,
            ..InsuranceInput::new(100_000.0, "B")
        })
        .result;

        assert_abs_diff_eq!(b.flood_premium, 250.0, epsilon = 1e-9);
        assert_abs_diff_eq!(b.ncd_discount, 1_540.0, epsilon = 1e-6);
        // 1,260 own damage after NCD + 200 third party + 250 flood at full price
        assert_abs_diff_eq!(b.pre_tax_total, 1_710.0, epsilon = 1e-6);
        assert_abs_diff_eq!(b.final_payable, 1_856.8, epsilon = 1e-6);
    }

    #[test]
    fn test_windscreen_below_cap() {
        let b = compute_insurance_premium(&InsuranceInput {
            windscreen_cover: true,
            ..InsuranceInput::new(50_000.0, "A")
        })
        .result;

        // 2% of 50,000 is 1,000 of cover, under the 2,000 cap
        assert_abs_diff_eq!(b.windscreen_premium, 150.0, epsilon = 1e-9);
        assert_abs_diff_eq!(b.add_on_premium, 150.0, epsilon = 1e-9);
    }

    #[test]
    fn test_old_vehicle_depreciation_floor() {
        let b = compute_insurance_premium(&InsuranceInput {
            vehicle_age_years: 25.0,
            ..InsuranceInput::new(80_000.0, "A")
        })
        .result;
        assert_abs_diff_eq!(b.sum_insured, 48_000.0, epsilon = 1e-6);
    }

    #[test]
    fn test_ncd_capped_with_warning() {
        let calc = compute_insurance_premium(&InsuranceInput {
            ncd_percent: 70.0,
            ..InsuranceInput::new(100_000.0, "B")
        });
        assert_eq!(calc.result.ncd_percent_applied, 55.0);
        assert_eq!(calc.warnings.len(), 1);
    }

    #[test]
    fn test_unknown_segment_and_no_price() {
        let calc = compute_insurance_premium(&InsuranceInput::new(100_000.0, "Z"));
        assert!(calc.result.is_empty());
        assert_eq!(calc.warnings.len(), 1);

        let calc = compute_insurance_premium(&InsuranceInput::new(0.0, "B"));
        assert!(calc.result.is_empty());
        assert!(calc.warnings.is_empty());
    }

    #[test]
    fn test_chart_slices_sum_to_payable() {
        let b = compute_insurance_premium(&InsuranceInput {
            coverage: CoverageType::ThirdParty,
            ..InsuranceInput::new(50_000.0, "A")
        })
        .result;
        let total: f64 = b.chart_slices().iter().map(|s| s.amount).sum();
        assert_abs_diff_eq!(total, b.final_payable, epsilon = 1e-9);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(256))]

        #[test]
        fn prop_sum_insured_floor(price in 1_000.0f64..5_000_000.0, age in 0.0f64..60.0) {
            let product = ProductConfig::default();
            prop_assert!(sum_insured(price, age, &product) >= price * product.min_sum_insured_ratio);
        }

        #[test]
        fn prop_final_payable_floor(
            price in 1_000.0f64..2_000_000.0,
            age in 0u32..30,
            ncd in 0.0f64..100.0,
            third_party in any::<bool>(),
            segment in prop::sample::select(vec!["A", "B", "C", "D", "E", "F", "Supercar"])
        ) {
            let input = InsuranceInput {
                vehicle_age_years: age as f64,
                ncd_percent: ncd,
                coverage: if third_party { CoverageType::ThirdParty } else { CoverageType::Comprehensive },
                ..InsuranceInput::new(price, segment)
            };
            let product = ProductConfig::default();
            let floor = product.min_premium + product.min_premium * product.service_tax_rate + product.stamp_duty;

            let b = compute_insurance_premium(&input).result;
            prop_assert!(b.final_payable >= floor);
        }
    }
}
