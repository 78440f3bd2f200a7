//! Total monthly cost of owning a car: financing, insurance, road tax, servicing and fuel

use log::debug;
use serde::{Deserialize, Serialize};

use super::costs::{fuel_efficiency, monthly_fuel_cost, road_tax};
use crate::calculator::{push_warning, Calculation, Calculator, CalculatorKind, ChartData, ChartSlice};
use crate::insurance::{InsuranceInput, InsurancePricer, PremiumBreakdown};
use crate::loan::compute_base_payment;
use crate::money::non_negative;
use crate::tables::{CarCostTables, InsuranceRates, SegmentTable};

/// Engine capacity assumed when none is given
pub const DEFAULT_ENGINE_CC: f64 = 1_000.0;

/// How the car is paid for
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Financing {
    #[default]
    Cash,
    Loan {
        down_payment_percent: f64,
        interest_rate_percent: f64,
        loan_years: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CarAffordabilityInput {
    pub car_price: f64,
    pub segment: String,
    pub body_type: String,
    pub engine_cc: f64,
    /// Kilometres driven per month
    pub monthly_mileage: f64,
    pub financing: Financing,
    /// Policy options; price, segment and body type are taken from the car
    pub policy: InsuranceInput,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CarCostBreakdown {
    pub down_payment: f64,
    pub loan_amount: f64,
    pub monthly_loan_payment: f64,
    pub insurance: PremiumBreakdown,
    pub monthly_insurance: f64,
    pub annual_road_tax: f64,
    pub monthly_road_tax: f64,
    pub monthly_servicing: f64,
    /// Typical cost of a minor and a major service for the segment
    pub minor_service_cost: f64,
    pub major_service_cost: f64,
    /// km/L after the body-type adjustment
    pub fuel_efficiency: f64,
    pub monthly_fuel: f64,
    pub total_monthly_cost: f64,
}

impl ChartData for CarCostBreakdown {
    fn chart_slices(&self) -> Vec<ChartSlice> {
        vec![
            ChartSlice::new("Loan Payment", self.monthly_loan_payment),
            ChartSlice::new("Insurance", self.monthly_insurance),
            ChartSlice::new("Road Tax", self.monthly_road_tax),
            ChartSlice::new("Servicing", self.monthly_servicing),
            ChartSlice::new("Fuel", self.monthly_fuel),
        ]
    }
}

/// Car affordability calculator
#[derive(Debug, Clone, Default)]
pub struct CarAffordabilityCalculator {
    segments: SegmentTable,
    pricer: InsurancePricer,
    costs: CarCostTables,
}

impl CarAffordabilityCalculator {
    pub fn new(segments: SegmentTable, rates: InsuranceRates, costs: CarCostTables) -> Self {
        Self {
            pricer: InsurancePricer::new(segments.clone(), rates),
            segments,
            costs,
        }
    }

    fn financing(
        &self,
        car_price: f64,
        financing: &Financing,
        warnings: &mut Vec<String>,
    ) -> (f64, f64, f64) {
        let (down_percent, rate, years) = match *financing {
            Financing::Cash => return (car_price, 0.0, 0.0),
            Financing::Loan {
                down_payment_percent,
                interest_rate_percent,
                loan_years,
            } => (down_payment_percent, interest_rate_percent, loan_years),
        };

        let (min_down, max_down) = (self.costs.min_down_payment_percent, self.costs.max_down_payment_percent);
        let down_percent = if down_percent.is_nan() || down_percent < min_down || down_percent > max_down {
            let clamped = if down_percent > max_down { max_down } else { min_down };
            push_warning(
                warnings,
                format!(
                    "Down payment of {}% is outside {}% to {}%; using {}%",
                    down_percent, min_down, max_down, clamped
                ),
            );
            clamped
        } else {
            down_percent
        };

        if rate > self.costs.max_interest_rate_percent {
            push_warning(
                warnings,
                format!(
                    "Interest rate of {}% exceeds the usual maximum of {}%",
                    rate, self.costs.max_interest_rate_percent
                ),
            );
        }
        if years > self.costs.max_loan_years {
            push_warning(
                warnings,
                format!(
                    "Loan period of {} years exceeds the usual maximum of {} years",
                    years, self.costs.max_loan_years
                ),
            );
        }

        let down_payment = car_price * down_percent / 100.0;
        let loan_amount = car_price - down_payment;
        let monthly_payment = if loan_amount > 0.0 && rate > 0.0 && years > 0.0 {
            compute_base_payment(loan_amount, rate, years)
        } else {
            0.0
        };

        (down_payment, loan_amount, monthly_payment)
    }

    pub fn compute_affordability(&self, input: &CarAffordabilityInput) -> Calculation<CarCostBreakdown> {
        let mut warnings = Vec::new();

        if input.car_price.is_nan() || input.car_price <= 0.0 {
            return Calculation::clean(CarCostBreakdown::default());
        }

        let segment = match self.segments.get(&input.segment) {
            Some(segment) => segment,
            None => {
                push_warning(
                    &mut warnings,
                    format!("Unknown vehicle segment {:?}; no costs calculated", input.segment),
                );
                return Calculation::new(CarCostBreakdown::default(), warnings);
            }
        };

        let mut mileage = non_negative(input.monthly_mileage);
        if mileage > self.costs.max_monthly_mileage {
            push_warning(
                &mut warnings,
                format!(
                    "Monthly mileage of {} km exceeds {} km; using {} km",
                    mileage, self.costs.max_monthly_mileage, self.costs.max_monthly_mileage
                ),
            );
            mileage = self.costs.max_monthly_mileage;
        }

        let engine_cc = if input.engine_cc > 0.0 {
            input.engine_cc
        } else {
            DEFAULT_ENGINE_CC
        };

        let (down_payment, loan_amount, monthly_loan_payment) =
            self.financing(input.car_price, &input.financing, &mut warnings);

        let policy = InsuranceInput {
            vehicle_price: input.car_price,
            segment: input.segment.clone(),
            body_type: input.body_type.clone(),
            ..input.policy.clone()
        };
        let premium = self.pricer.compute_premium(&policy);
        warnings.extend(premium.warnings);
        let insurance = premium.result;

        let annual_road_tax = road_tax(engine_cc, &self.costs.road_tax);
        let efficiency = fuel_efficiency(segment.fuel_efficiency, &input.body_type, &self.costs);
        let monthly_fuel = monthly_fuel_cost(mileage, efficiency, self.costs.fuel_price_per_litre);

        let mut breakdown = CarCostBreakdown {
            down_payment,
            loan_amount,
            monthly_loan_payment,
            monthly_insurance: insurance.final_payable / 12.0,
            insurance,
            annual_road_tax,
            monthly_road_tax: annual_road_tax / 12.0,
            monthly_servicing: input.car_price * segment.servicing_rate / 12.0,
            minor_service_cost: segment.minor_service,
            major_service_cost: segment.major_service,
            fuel_efficiency: efficiency,
            monthly_fuel,
            total_monthly_cost: 0.0,
        };
        breakdown.total_monthly_cost = breakdown.chart_slices().iter().map(|s| s.amount).sum();

        debug!(
            "{} segment car at {:.2}: loan {:.2}, insurance {:.2}, total {:.2}/month",
            segment.code,
            input.car_price,
            breakdown.monthly_loan_payment,
            breakdown.monthly_insurance,
            breakdown.total_monthly_cost
        );

        Calculation::new(breakdown, warnings)
    }
}

impl Calculator for CarAffordabilityCalculator {
    type Input = CarAffordabilityInput;
    type Output = CarCostBreakdown;

    fn kind(&self) -> CalculatorKind {
        CalculatorKind::Car
    }

    fn compute(&self, input: &CarAffordabilityInput) -> Calculation<CarCostBreakdown> {
        self.compute_affordability(input)
    }
}

/// Monthly cost of a car under the Malaysian tables
pub fn compute_car_affordability(input: &CarAffordabilityInput) -> Calculation<CarCostBreakdown> {
    CarAffordabilityCalculator::new(
        SegmentTable::malaysia(),
        InsuranceRates::malaysia(),
        CarCostTables::malaysia(),
    )
    .compute_affordability(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn financed_city_car() -> CarAffordabilityInput {
        CarAffordabilityInput {
            car_price: 100_000.0,
            segment: "B".to_string(),
            body_type: "sedan".to_string(),
            engine_cc: 1_500.0,
            monthly_mileage: 1_000.0,
            financing: Financing::Loan {
                down_payment_percent: 10.0,
                interest_rate_percent: 3.0,
                loan_years: 7.0,
            },
            policy: InsuranceInput::default(),
        }
    }

    #[test]
    fn test_financed_car() {
        let calc = compute_car_affordability(&financed_city_car());
        let b = calc.result;

        assert!(calc.warnings.is_empty());
        assert_abs_diff_eq!(b.down_payment, 10_000.0, epsilon = 1e-9);
        assert_abs_diff_eq!(b.loan_amount, 90_000.0, epsilon = 1e-9);
        assert_abs_diff_eq!(
            b.monthly_loan_payment,
            compute_base_payment(90_000.0, 3.0, 7.0),
            epsilon = 1e-9
        );
        // OD 2,800 + TP 200 = 3,000; +8% tax + 10 duty
        assert_abs_diff_eq!(b.insurance.final_payable, 3_250.0, epsilon = 1e-6);
        assert_abs_diff_eq!(b.monthly_insurance, 3_250.0 / 12.0, epsilon = 1e-6);
        assert_abs_diff_eq!(b.monthly_road_tax, 7.5, epsilon = 1e-9);
        assert_abs_diff_eq!(b.monthly_servicing, 150.0, epsilon = 1e-9);
        assert_abs_diff_eq!(b.monthly_fuel, 1_000.0 / 14.0 * 2.5, epsilon = 1e-9);
        assert_abs_diff_eq!(
            b.total_monthly_cost,
            b.monthly_loan_payment + b.monthly_insurance + 7.5 + 150.0 + b.monthly_fuel,
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_cash_purchase_has_no_loan() {
        let input = CarAffordabilityInput {
            financing: Financing::Cash,
            ..financed_city_car()
        };
        let b = compute_car_affordability(&input).result;

        assert_eq!(b.monthly_loan_payment, 0.0);
        assert_eq!(b.loan_amount, 0.0);
        assert_eq!(b.down_payment, 100_000.0);
    }

    #[test]
    fn test_out_of_policy_inputs_warn_and_clamp() {
        let input = CarAffordabilityInput {
            monthly_mileage: 2_500.0,
            financing: Financing::Loan {
                down_payment_percent: 5.0,
                interest_rate_percent: 12.0,
                loan_years: 10.0,
            },
            ..financed_city_car()
        };
        let calc = compute_car_affordability(&input);
        let b = calc.result;

        assert_eq!(calc.warnings.len(), 4);
        assert_abs_diff_eq!(b.monthly_fuel, 1_000.0 / 14.0 * 2.5, epsilon = 1e-9);
        assert_abs_diff_eq!(b.down_payment, 10_000.0, epsilon = 1e-9);
        assert_abs_diff_eq!(
            b.monthly_loan_payment,
            compute_base_payment(90_000.0, 12.0, 10.0),
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_zero_rate_loan_has_no_payment() {
        let input = CarAffordabilityInput {
            financing: Financing::Loan {
                down_payment_percent: 20.0,
                interest_rate_percent: 0.0,
                loan_years: 5.0,
            },
            ..financed_city_car()
        };
        assert_eq!(compute_car_affordability(&input).result.monthly_loan_payment, 0.0);
    }

    #[test]
    fn test_missing_engine_cc_and_mileage() {
        let input = CarAffordabilityInput {
            engine_cc: 0.0,
            monthly_mileage: 0.0,
            ..financed_city_car()
        };
        let b = compute_car_affordability(&input).result;
        assert_eq!(b.annual_road_tax, 20.0);
        assert_eq!(b.monthly_fuel, 0.0);
    }

    #[test]
    fn test_invalid_mileage_means_no_fuel() {
        for mileage in [f64::NAN, -300.0] {
            let input = CarAffordabilityInput {
                monthly_mileage: mileage,
                ..financed_city_car()
            };
            let b = compute_car_affordability(&input).result;
            assert_eq!(b.monthly_fuel, 0.0);
            assert!(b.total_monthly_cost.is_finite());
        }
    }

    #[test]
    fn test_suv_body_type_flows_to_insurance_and_fuel() {
        let input = CarAffordabilityInput {
            body_type: "suv".to_string(),
            ..financed_city_car()
        };
        let b = compute_car_affordability(&input).result;

        assert_eq!(b.insurance.body_type_factor, 1.10);
        assert_abs_diff_eq!(b.fuel_efficiency, 10.5, epsilon = 1e-9);
    }

    #[test]
    fn test_unknown_segment() {
        let input = CarAffordabilityInput {
            segment: "X".to_string(),
            ..financed_city_car()
        };
        let calc = compute_car_affordability(&input);
        assert_eq!(calc.result, CarCostBreakdown::default());
        assert_eq!(calc.warnings.len(), 1);
    }
}
