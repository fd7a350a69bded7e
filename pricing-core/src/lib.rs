pub mod calculations;
pub mod export;
pub mod models;
pub mod preferences;
pub mod scenarios;
pub mod storage;

pub use models::*;
pub use scenarios::{Scenario, ScenarioError, ScenarioId, ScenarioState, ScenarioStore};
pub use storage::{KeyValueStore, StorageError};
