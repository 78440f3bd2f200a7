//! Running costs: road tax by engine capacity and fuel by efficiency

use crate::tables::{CarCostTables, RoadTaxBand};

/// Annual road tax for an engine of `engine_cc`
///
/// Uses the first band whose upper bound is at or above the capacity.
pub fn road_tax(engine_cc: f64, bands: &[RoadTaxBand]) -> f64 {
    bands
        .iter()
        .find(|band| band.to_cc.map_or(true, |to| engine_cc <= to))
        .map(|band| band.base + (engine_cc - band.from_cc).max(0.0) * band.per_cc)
        .unwrap_or(0.0)
}

/// Effective km/L after the body-type adjustment, floored at the table minimum
pub fn fuel_efficiency(base_efficiency: f64, body_type: &str, tables: &CarCostTables) -> f64 {
    let efficiency = base_efficiency * tables.fuel_efficiency_factor.factor(body_type);
    efficiency.max(tables.min_fuel_efficiency)
}

/// Monthly fuel spend; zero for non-positive mileage
pub fn monthly_fuel_cost(monthly_mileage: f64, efficiency: f64, price_per_litre: f64) -> f64 {
    if monthly_mileage <= 0.0 || efficiency <= 0.0 {
        return 0.0;
    }
    monthly_mileage / efficiency * price_per_litre
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_road_tax_flat_bands() {
        let bands = CarCostTables::malaysia().road_tax;
        assert_eq!(road_tax(800.0, &bands), 20.0);
        assert_eq!(road_tax(1_000.0, &bands), 20.0);
        assert_eq!(road_tax(1_199.0, &bands), 55.0);
        assert_eq!(road_tax(1_500.0, &bands), 90.0);
    }

    #[test]
    fn test_road_tax_progressive_bands() {
        let bands = CarCostTables::malaysia().road_tax;
        assert_abs_diff_eq!(road_tax(1_700.0, &bands), 240.0, epsilon = 1e-9);
        assert_abs_diff_eq!(road_tax(2_000.0, &bands), 380.0, epsilon = 1e-9);
        assert_abs_diff_eq!(road_tax(2_400.0, &bands), 780.0, epsilon = 1e-9);
        assert_abs_diff_eq!(road_tax(3_000.0, &bands), 2_130.0, epsilon = 1e-9);
        assert_abs_diff_eq!(road_tax(3_500.0, &bands), 4_380.0, epsilon = 1e-9);
    }

    #[test]
    fn test_road_tax_without_bands() {
        assert_eq!(road_tax(1_500.0, &[]), 0.0);
    }

    #[test]
    fn test_fuel_efficiency_body_factor_and_floor() {
        let tables = CarCostTables::malaysia();
        assert_abs_diff_eq!(fuel_efficiency(14.0, "suv", &tables), 10.5, epsilon = 1e-9);
        assert_abs_diff_eq!(fuel_efficiency(8.0, "pickup", &tables), 6.8, epsilon = 1e-9);
        assert_eq!(fuel_efficiency(7.0, "suv", &tables), 6.0);
        assert_eq!(fuel_efficiency(13.0, "hatchback", &tables), 13.0);
    }

    #[test]
    fn test_monthly_fuel_cost() {
        assert_abs_diff_eq!(monthly_fuel_cost(1_000.0, 10.0, 2.5), 250.0, epsilon = 1e-9);
        assert_eq!(monthly_fuel_cost(0.0, 10.0, 2.5), 0.0);
        assert_eq!(monthly_fuel_cost(-50.0, 10.0, 2.5), 0.0);
    }
}
