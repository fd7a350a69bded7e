use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calculations::PricingReport;
use crate::models::{CostStructure, PricingStrategy};

/// Opaque, immutable scenario identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScenarioId(Uuid);

impl ScenarioId {
    /// A fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ScenarioId {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for ScenarioId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

/// Everything saved with a scenario: the inputs and the metrics they
/// produced at save time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScenarioState {
    pub cost_analysis: CostStructure,
    #[serde(default)]
    pub pricing_strategy: PricingStrategy,
    /// Finite derived metrics keyed by name.
    #[serde(default)]
    pub metrics: BTreeMap<String, f64>,
}

impl ScenarioState {
    /// Bundles the inputs with freshly derived metrics.
    pub fn capture(
        cost: &CostStructure,
        pricing: &PricingStrategy,
    ) -> Self {
        let metrics = PricingReport::analyze(cost, pricing).metric_map();
        Self {
            cost_analysis: cost.clone(),
            pricing_strategy: pricing.clone(),
            metrics,
        }
    }

    /// Re-runs the analysis on the saved inputs.
    pub fn report(&self) -> PricingReport {
        PricingReport::analyze(&self.cost_analysis, &self.pricing_strategy)
    }
}

/// A named snapshot of calculator state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub id: ScenarioId,
    pub name: String,
    pub state: ScenarioState,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
