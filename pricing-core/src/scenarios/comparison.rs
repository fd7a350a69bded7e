//! Side-by-side comparison of saved scenarios.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use super::error::ScenarioError;
use super::model::{Scenario, ScenarioId};
use super::store::ScenarioStore;
use crate::calculations::formulas::pct_difference;

/// Percentage difference of one metric between two scenarios.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairwiseDifference {
    pub first: ScenarioId,
    pub second: ScenarioId,
    pub pct_difference: f64,
}

/// One metric across every compared scenario.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MetricComparison {
    pub values: BTreeMap<ScenarioId, f64>,
    /// One entry per unordered pair, in request order.
    pub differences: Vec<PairwiseDifference>,
}

impl MetricComparison {
    /// Difference between `a` and `b`, regardless of the order they were
    /// requested in.
    pub fn difference(
        &self,
        a: ScenarioId,
        b: ScenarioId,
    ) -> Option<f64> {
        self.differences
            .iter()
            .find(|d| (d.first == a && d.second == b) || (d.first == b && d.second == a))
            .map(|d| d.pct_difference)
    }
}

/// Result of comparing two or more scenarios. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ComparisonResult {
    /// Compared scenarios, duplicates removed, in request order.
    pub scenario_ids: Vec<ScenarioId>,
    /// Metrics present in every compared scenario.
    pub metrics: BTreeMap<String, MetricComparison>,
}

impl ComparisonResult {
    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }

    pub fn metric(
        &self,
        name: &str,
    ) -> Option<&MetricComparison> {
        self.metrics.get(name)
    }
}

/// Compares the metrics saved with each of `ids`.
///
/// Fewer than two distinct ids produce an empty result. Only metrics with a
/// finite value in every scenario are compared. The store is read, never
/// modified.
///
/// # Errors
///
/// [`ScenarioError::NotFound`] if any id is not in `store`.
pub fn compare(
    store: &ScenarioStore,
    ids: &[ScenarioId],
) -> Result<ComparisonResult, ScenarioError> {
    let mut distinct: Vec<ScenarioId> = Vec::with_capacity(ids.len());
    for id in ids {
        if !distinct.contains(id) {
            distinct.push(*id);
        }
    }
    if distinct.len() < 2 {
        return Ok(ComparisonResult::default());
    }

    let scenarios = distinct
        .iter()
        .map(|&id| store.get(id).ok_or(ScenarioError::NotFound(id)))
        .collect::<Result<Vec<&Scenario>, _>>()?;

    let mut metrics = BTreeMap::new();
    for name in scenarios[0].state.metrics.keys() {
        let Some(values) = shared_values(&scenarios, name) else {
            continue;
        };
        metrics.insert(name.clone(), compare_metric(&values));
    }
    debug!(
        scenarios = distinct.len(),
        metrics = metrics.len(),
        "compared scenarios"
    );

    Ok(ComparisonResult {
        scenario_ids: distinct,
        metrics,
    })
}

fn shared_values(
    scenarios: &[&Scenario],
    name: &str,
) -> Option<Vec<(ScenarioId, f64)>> {
    scenarios
        .iter()
        .map(|s| {
            s.state
                .metrics
                .get(name)
                .copied()
                .filter(|v| v.is_finite())
                .map(|v| (s.id, v))
        })
        .collect()
}

fn compare_metric(values: &[(ScenarioId, f64)]) -> MetricComparison {
    let mut differences = Vec::new();
    for (i, &(first, a)) in values.iter().enumerate() {
        for &(second, b) in &values[i + 1..] {
            differences.push(PairwiseDifference {
                first,
                second,
                pct_difference: pct_difference(a, b),
            });
        }
    }
    MetricComparison {
        values: values.iter().copied().collect(),
        differences,
    }
}
