//! Pricing calculations.
//!
//! [`formulas`] holds the closed-form building blocks; [`analysis`] combines
//! them into the metrics reported for a cost structure and pricing strategy.

pub mod analysis;
pub mod formulas;

pub use analysis::{CostAnalysis, PricingAnalysis, PricingReport, metric};
