use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Pricing decisions layered on top of a [`CostStructure`](super::CostStructure).
///
/// Zero values mean "not set": a zero `price` makes the analysis fall back to
/// the recommended price, a zero `investment` disables ROI and payback.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingStrategy {
    /// Selling price per unit.
    #[serde(default)]
    pub price: Decimal,
    /// Up-front investment recovered through profit.
    #[serde(default)]
    pub investment: Decimal,
    /// Observed proportional change in volume, e.g. `-0.2` for a 20% drop.
    #[serde(default)]
    pub volume_change_pct: Decimal,
    /// Proportional price change that caused `volume_change_pct`.
    #[serde(default)]
    pub price_change_pct: Decimal,
}

impl PricingStrategy {
    pub fn with_price(price: Decimal) -> Self {
        Self {
            price,
            ..Default::default()
        }
    }
}
