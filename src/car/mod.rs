//! Car affordability: monthly cost of financing and running a car

mod affordability;
mod costs;

pub use affordability::{
    compute_car_affordability, CarAffordabilityCalculator, CarAffordabilityInput, CarCostBreakdown,
    Financing, DEFAULT_ENGINE_CC,
};
pub use costs::{fuel_efficiency, monthly_fuel_cost, road_tax};
