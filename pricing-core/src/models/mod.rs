mod cost_structure;
mod pricing_strategy;
mod theme;

pub use cost_structure::{CostPeriod, CostStructure, DirectCost, IndirectCost, TimeCost};
pub(crate) use cost_structure::to_f64;
pub use pricing_strategy::PricingStrategy;
pub use theme::Theme;
