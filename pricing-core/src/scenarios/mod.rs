//! Saved scenarios and their comparison.

pub mod comparison;
mod error;
mod model;
pub mod snapshot;
mod store;

pub use comparison::{ComparisonResult, MetricComparison, PairwiseDifference, compare};
pub use error::ScenarioError;
pub use model::{Scenario, ScenarioId, ScenarioState};
pub use snapshot::{SnapshotError, deep_copy};
pub use store::{SCENARIOS_KEY, ScenarioStore};
