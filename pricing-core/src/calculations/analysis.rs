//! Derived pricing metrics for a cost structure and pricing strategy.
//!
//! [`PricingReport::analyze`] runs the formula library over a
//! [`CostStructure`] and a [`PricingStrategy`] and produces the named metrics
//! that are stored with a scenario and compared across scenarios.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use pricing_core::calculations::PricingReport;
//! use pricing_core::{CostPeriod, CostStructure, DirectCost, IndirectCost, PricingStrategy};
//!
//! let cost = CostStructure {
//!     direct_costs: vec![DirectCost { name: "Parts".into(), amount: dec!(5) }],
//!     indirect_costs: vec![IndirectCost {
//!         name: "Rent".into(),
//!         amount: dec!(500),
//!         period: CostPeriod::Month,
//!     }],
//!     target_margin: dec!(0.5),
//!     expected_volume: dec!(100),
//!     ..CostStructure::default()
//! };
//!
//! let report = PricingReport::analyze(&cost, &PricingStrategy::default());
//!
//! // unit cost = 5 + 500 / 100 = 10, recommended = 10 / (1 - 0.5) = 20
//! assert_eq!(report.cost.unit_cost, 10.0);
//! assert_eq!(report.cost.recommended_price, 20.0);
//! assert_eq!(report.pricing.revenue, 2000.0);
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calculations::formulas;
use crate::models::{CostStructure, PricingStrategy, to_f64};

/// Metric names as they appear in scenario snapshots and comparisons.
pub mod metric {
    pub const UNIT_VARIABLE_COST: &str = "unit_variable_cost";
    pub const TOTAL_FIXED_COST: &str = "total_fixed_cost";
    pub const UNIT_COST: &str = "unit_cost";
    pub const RECOMMENDED_PRICE: &str = "recommended_price";
    pub const BREAK_EVEN_VOLUME: &str = "break_even_volume";
    pub const BREAK_EVEN_PRICE: &str = "break_even_price";
    pub const PRICE: &str = "price";
    pub const MARGIN: &str = "margin";
    pub const MARKUP: &str = "markup";
    pub const REVENUE: &str = "revenue";
    pub const MONTHLY_PROFIT: &str = "monthly_profit";
    pub const TOTAL_COST: &str = "total_cost";
    pub const ROI: &str = "roi";
    pub const PAYBACK_PERIOD: &str = "payback_period";
    pub const ELASTICITY: &str = "elasticity";
    pub const OPTIMAL_PRICE: &str = "optimal_price";
}

/// Cost-side figures, all per month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostAnalysis {
    pub unit_variable_cost: f64,
    pub total_fixed_cost: f64,
    pub expected_volume: f64,
    /// Variable cost plus fixed cost spread over the expected volume.
    pub unit_cost: f64,
    pub target_margin: f64,
    /// Price that achieves the target margin on `unit_cost`.
    pub recommended_price: f64,
    /// Units needed to cover fixed costs at the recommended price.
    pub break_even_volume: f64,
    /// Price needed to cover all costs at the expected volume.
    pub break_even_price: f64,
}

impl CostAnalysis {
    pub fn from_cost_structure(cost: &CostStructure) -> Self {
        let unit_variable_cost = to_f64(cost.total_direct_cost());
        let total_fixed_cost = to_f64(cost.total_fixed_cost());
        let expected_volume = to_f64(cost.expected_volume);
        let target_margin = to_f64(cost.target_margin);

        let fixed_per_unit = if expected_volume > 0.0 {
            total_fixed_cost / expected_volume
        } else {
            0.0
        };
        let unit_cost = unit_variable_cost + fixed_per_unit;
        let recommended_price = formulas::price_from_margin(unit_cost, target_margin);

        Self {
            unit_variable_cost,
            total_fixed_cost,
            expected_volume,
            unit_cost,
            target_margin,
            recommended_price,
            break_even_volume: formulas::break_even_volume(
                total_fixed_cost,
                recommended_price,
                unit_variable_cost,
            ),
            break_even_price: formulas::break_even_price(
                total_fixed_cost,
                expected_volume,
                unit_variable_cost,
            ),
        }
    }
}

/// Price-side figures for one pricing strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingAnalysis {
    /// Effective selling price: the strategy's price, or the recommended one.
    pub price: f64,
    pub margin: f64,
    pub markup: f64,
    pub revenue: f64,
    pub monthly_profit: f64,
    pub total_cost: f64,
    /// Annual profit over investment.
    pub roi: f64,
    /// Years to recover the investment.
    pub payback_period: f64,
    pub elasticity: f64,
    pub optimal_price: f64,
}

impl PricingAnalysis {
    pub fn evaluate(
        cost: &CostAnalysis,
        strategy: &PricingStrategy,
    ) -> Self {
        let chosen = to_f64(strategy.price);
        let price = if chosen > 0.0 {
            chosen
        } else {
            cost.recommended_price
        };
        let volume = cost.expected_volume;
        let monthly_profit = formulas::profit(price, cost.unit_cost, volume);
        let annual_profit = monthly_profit * 12.0;
        let investment = to_f64(strategy.investment);
        let elasticity = formulas::elasticity(
            to_f64(strategy.volume_change_pct),
            to_f64(strategy.price_change_pct),
        );

        Self {
            price,
            margin: formulas::margin(price, cost.unit_cost),
            markup: formulas::markup_pct(price, cost.unit_cost),
            revenue: formulas::revenue(price, volume),
            monthly_profit,
            total_cost: formulas::total_cost(cost.total_fixed_cost, cost.unit_variable_cost, volume),
            roi: formulas::roi(annual_profit, investment),
            payback_period: formulas::payback_period(investment, annual_profit),
            elasticity,
            optimal_price: formulas::optimal_price(price, elasticity),
        }
    }
}

/// Cost and pricing analysis for one set of inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingReport {
    pub cost: CostAnalysis,
    pub pricing: PricingAnalysis,
}

impl PricingReport {
    pub fn analyze(
        cost: &CostStructure,
        strategy: &PricingStrategy,
    ) -> Self {
        let cost = CostAnalysis::from_cost_structure(cost);
        let pricing = PricingAnalysis::evaluate(&cost, strategy);
        Self { cost, pricing }
    }

    /// All metrics keyed by name, in the order they are listed in [`metric`].
    pub fn entries(&self) -> [(&'static str, f64); 16] {
        let c = &self.cost;
        let p = &self.pricing;
        [
            (metric::UNIT_VARIABLE_COST, c.unit_variable_cost),
            (metric::TOTAL_FIXED_COST, c.total_fixed_cost),
            (metric::UNIT_COST, c.unit_cost),
            (metric::RECOMMENDED_PRICE, c.recommended_price),
            (metric::BREAK_EVEN_VOLUME, c.break_even_volume),
            (metric::BREAK_EVEN_PRICE, c.break_even_price),
            (metric::PRICE, p.price),
            (metric::MARGIN, p.margin),
            (metric::MARKUP, p.markup),
            (metric::REVENUE, p.revenue),
            (metric::MONTHLY_PROFIT, p.monthly_profit),
            (metric::TOTAL_COST, p.total_cost),
            (metric::ROI, p.roi),
            (metric::PAYBACK_PERIOD, p.payback_period),
            (metric::ELASTICITY, p.elasticity),
            (metric::OPTIMAL_PRICE, p.optimal_price),
        ]
    }

    /// Finite metrics keyed by name.
    ///
    /// Unbounded values (an unreachable break-even volume, a payback period
    /// that never ends) are left out since they cannot be compared.
    pub fn metric_map(&self) -> BTreeMap<String, f64> {
        self.entries()
            .into_iter()
            .filter(|(name, value)| {
                let finite = value.is_finite();
                if !finite {
                    debug!(metric = name, "omitting unbounded metric");
                }
                finite
            })
            .map(|(name, value)| (name.to_string(), value))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::models::{CostPeriod, DirectCost, IndirectCost, TimeCost};

    fn bakery() -> CostStructure {
        CostStructure {
            direct_costs: vec![DirectCost {
                name: "Ingredients".to_string(),
                amount: dec!(4),
            }],
            indirect_costs: vec![IndirectCost {
                name: "Rent".to_string(),
                amount: dec!(600),
                period: CostPeriod::Month,
            }],
            time_costs: vec![TimeCost {
                name: "Baker".to_string(),
                rate: dec!(20),
                hours: dec!(20),
            }],
            target_margin: dec!(0.5),
            expected_volume: dec!(200),
        }
    }

    #[test]
    fn cost_analysis_spreads_fixed_costs_over_volume() {
        let analysis = CostAnalysis::from_cost_structure(&bakery());

        assert_eq!(analysis.unit_variable_cost, 4.0);
        assert_eq!(analysis.total_fixed_cost, 1000.0);
        assert_eq!(analysis.unit_cost, 9.0);
        assert_eq!(analysis.recommended_price, 18.0);
        // 1000 / (18 - 4)
        assert!((analysis.break_even_volume - 71.428_571_428_571_43).abs() < 1e-9);
        assert_eq!(analysis.break_even_price, 9.0);
    }

    #[test]
    fn unit_cost_without_fixed_costs_is_the_variable_cost() {
        let cost = CostStructure {
            indirect_costs: Vec::new(),
            time_costs: Vec::new(),
            ..bakery()
        };

        let analysis = CostAnalysis::from_cost_structure(&cost);

        assert_eq!(analysis.total_fixed_cost, 0.0);
        assert_eq!(analysis.unit_cost, 4.0);
        assert_eq!(analysis.recommended_price, 8.0);
    }

    #[test]
    fn pricing_falls_back_to_recommended_price() {
        let report = PricingReport::analyze(&bakery(), &PricingStrategy::default());

        assert_eq!(report.pricing.price, 18.0);
        assert_eq!(report.pricing.margin, 0.5);
        assert_eq!(report.pricing.revenue, 3600.0);
        assert_eq!(report.pricing.monthly_profit, 1800.0);
        assert_eq!(report.pricing.total_cost, 1800.0);
    }

    #[test]
    fn explicit_price_and_investment_drive_roi_and_payback() {
        let strategy = PricingStrategy {
            price: dec!(14),
            investment: dec!(12000),
            volume_change_pct: dec!(-0.3),
            price_change_pct: dec!(0.1),
        };

        let report = PricingReport::analyze(&bakery(), &strategy);

        assert_eq!(report.pricing.price, 14.0);
        assert_eq!(report.pricing.monthly_profit, 1000.0);
        assert_eq!(report.pricing.roi, 1.0);
        assert_eq!(report.pricing.payback_period, 1.0);
        assert!((report.pricing.elasticity - 3.0).abs() < 1e-9);
        assert!((report.pricing.optimal_price - 21.0).abs() < 1e-9);
    }

    #[test]
    fn metric_map_omits_unbounded_values() {
        let report = PricingReport::analyze(&bakery(), &PricingStrategy::default());
        let metrics = report.metric_map();

        // No investment: payback never ends.
        assert!(!metrics.contains_key(metric::PAYBACK_PERIOD));
        assert_eq!(metrics.get(metric::REVENUE), Some(&3600.0));
        assert_eq!(metrics.len(), report.entries().len() - 1);
    }

    #[test]
    fn empty_cost_structure_produces_neutral_metrics() {
        let report = PricingReport::analyze(&CostStructure::default(), &PricingStrategy::default());

        assert_eq!(report.cost.unit_cost, 0.0);
        assert_eq!(report.cost.recommended_price, 0.0);
        assert!(report.cost.break_even_volume.is_infinite());
        assert_eq!(report.pricing.revenue, 0.0);
    }
}
