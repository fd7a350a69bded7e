use thiserror::Error;

use super::model::ScenarioId;
use super::snapshot::SnapshotError;
use crate::storage::StorageError;

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("Scenario not found: {0}")]
    NotFound(ScenarioId),

    #[error(transparent)]
    Snapshot(#[from] SnapshotError),

    #[error("Scenario serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Scenario storage error: {0}")]
    Storage(#[from] StorageError),
}
