use std::collections::BTreeSet;

use chrono::Utc;
use tracing::{debug, info};

use super::comparison::{ComparisonResult, compare};
use super::error::ScenarioError;
use super::model::{Scenario, ScenarioId, ScenarioState};
use super::snapshot::deep_copy;
use crate::storage::KeyValueStore;

/// Key under which a persistent store keeps its scenarios.
pub const SCENARIOS_KEY: &str = "scenarios";

/// Ordered collection of saved scenarios plus the transient comparison
/// selection.
///
/// Scenarios are kept in creation order. Every stored state is a deep copy,
/// so callers can keep editing the value they saved. When opened over a
/// [`KeyValueStore`] the collection is written back after each mutation;
/// if that write fails the mutation is undone and the error returned.
/// The selection is never persisted or exported.
#[derive(Default)]
pub struct ScenarioStore {
    scenarios: Vec<Scenario>,
    selection: BTreeSet<ScenarioId>,
    backend: Option<Box<dyn KeyValueStore>>,
}

impl ScenarioStore {
    /// An empty, purely in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a store that persists to `backend`, loading whatever it already
    /// holds.
    pub fn open(backend: Box<dyn KeyValueStore>) -> Result<Self, ScenarioError> {
        let scenarios = match backend.get(SCENARIOS_KEY)? {
            Some(text) => serde_json::from_str(&text)?,
            None => Vec::new(),
        };
        debug!(count = scenarios.len(), "loaded saved scenarios");
        Ok(Self {
            scenarios,
            selection: BTreeSet::new(),
            backend: Some(backend),
        })
    }

    pub fn is_persistent(&self) -> bool {
        self.backend.is_some()
    }

    /// Saves a new scenario at the end of the collection.
    pub fn create(
        &mut self,
        name: impl Into<String>,
        state: &ScenarioState,
    ) -> Result<Scenario, ScenarioError> {
        let now = Utc::now();
        let scenario = Scenario {
            id: ScenarioId::generate(),
            name: name.into(),
            state: deep_copy(state)?,
            created_at: now,
            updated_at: now,
        };
        self.scenarios.push(scenario.clone());
        self.persist_or_undo(|store| {
            store.scenarios.pop();
        })?;

        info!(id = %scenario.id, name = %scenario.name, "scenario created");
        Ok(scenario)
    }

    /// Renames and/or replaces the state of an existing scenario.
    ///
    /// # Errors
    ///
    /// [`ScenarioError::NotFound`] when `id` is unknown; nothing changes.
    pub fn update(
        &mut self,
        id: ScenarioId,
        name: Option<String>,
        state: Option<&ScenarioState>,
    ) -> Result<(), ScenarioError> {
        let state = state.map(deep_copy).transpose()?;
        let index = self.index_of(id)?;
        let previous = self.scenarios[index].clone();

        let scenario = &mut self.scenarios[index];
        if let Some(name) = name {
            scenario.name = name;
        }
        if let Some(state) = state {
            scenario.state = state;
        }
        scenario.updated_at = Utc::now();

        self.persist_or_undo(move |store| store.scenarios[index] = previous)?;
        info!(%id, "scenario updated");
        Ok(())
    }

    /// Removes a scenario and drops it from the selection.
    pub fn delete(
        &mut self,
        id: ScenarioId,
    ) -> Result<(), ScenarioError> {
        let index = self.index_of(id)?;
        let removed = self.scenarios.remove(index);
        let was_selected = self.selection.remove(&id);

        self.persist_or_undo(move |store| {
            store.scenarios.insert(index, removed);
            if was_selected {
                store.selection.insert(id);
            }
        })?;
        info!(%id, "scenario deleted");
        Ok(())
    }

    pub fn get(
        &self,
        id: ScenarioId,
    ) -> Option<&Scenario> {
        self.scenarios.iter().find(|s| s.id == id)
    }

    /// All scenarios in creation order.
    pub fn list(&self) -> &[Scenario] {
        &self.scenarios
    }

    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }

    // ── selection ────────────────────────────────────────────────────────

    /// Adds `id` to the comparison selection.
    pub fn select(
        &mut self,
        id: ScenarioId,
    ) -> Result<(), ScenarioError> {
        self.index_of(id)?;
        self.selection.insert(id);
        Ok(())
    }

    /// Removes `id` from the selection, returning whether it was selected.
    pub fn deselect(
        &mut self,
        id: ScenarioId,
    ) -> bool {
        self.selection.remove(&id)
    }

    /// Flips the selection state of `id` and returns the new state.
    pub fn toggle_selection(
        &mut self,
        id: ScenarioId,
    ) -> Result<bool, ScenarioError> {
        if self.deselect(id) {
            return Ok(false);
        }
        self.select(id)?;
        Ok(true)
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn is_selected(
        &self,
        id: ScenarioId,
    ) -> bool {
        self.selection.contains(&id)
    }

    /// Selected ids in creation order.
    pub fn selected_ids(&self) -> Vec<ScenarioId> {
        self.scenarios
            .iter()
            .map(|s| s.id)
            .filter(|id| self.selection.contains(id))
            .collect()
    }

    /// Compares the currently selected scenarios.
    pub fn compare_selected(&self) -> Result<ComparisonResult, ScenarioError> {
        compare(self, &self.selected_ids())
    }

    // ── export / import ──────────────────────────────────────────────────

    /// Serializes the given scenarios (or all of them) as a JSON array.
    pub fn export(
        &self,
        ids: Option<&[ScenarioId]>,
    ) -> Result<String, ScenarioError> {
        let chosen: Vec<&Scenario> = match ids {
            Some(ids) => ids
                .iter()
                .map(|&id| self.get(id).ok_or(ScenarioError::NotFound(id)))
                .collect::<Result<_, _>>()?,
            None => self.scenarios.iter().collect(),
        };
        debug!(count = chosen.len(), "exporting scenarios");
        Ok(serde_json::to_string_pretty(&chosen)?)
    }

    /// Exports the selection, or every scenario when nothing is selected.
    pub fn export_selected(&self) -> Result<String, ScenarioError> {
        let selected = self.selected_ids();
        if selected.is_empty() {
            self.export(None)
        } else {
            self.export(Some(&selected))
        }
    }

    /// Appends scenarios from an export, giving each a fresh id.
    ///
    /// Names, timestamps and states are kept. Nothing is appended if the
    /// text does not parse.
    pub fn import(
        &mut self,
        text: &str,
    ) -> Result<Vec<ScenarioId>, ScenarioError> {
        let incoming: Vec<Scenario> = serde_json::from_str(text)?;
        let before = self.scenarios.len();

        let ids = incoming
            .into_iter()
            .map(|mut scenario| {
                scenario.id = ScenarioId::generate();
                let id = scenario.id;
                self.scenarios.push(scenario);
                id
            })
            .collect::<Vec<_>>();

        self.persist_or_undo(move |store| store.scenarios.truncate(before))?;
        info!(count = ids.len(), "scenarios imported");
        Ok(ids)
    }

    // ── internals ────────────────────────────────────────────────────────

    fn index_of(
        &self,
        id: ScenarioId,
    ) -> Result<usize, ScenarioError> {
        self.scenarios
            .iter()
            .position(|s| s.id == id)
            .ok_or(ScenarioError::NotFound(id))
    }

    fn persist_or_undo(
        &mut self,
        undo: impl FnOnce(&mut Self),
    ) -> Result<(), ScenarioError> {
        let Some(backend) = self.backend.as_mut() else {
            return Ok(());
        };
        let written = serde_json::to_string(&self.scenarios)
            .map_err(ScenarioError::from)
            .and_then(|text| Ok(backend.set(SCENARIOS_KEY, &text)?));
        if written.is_err() {
            undo(self);
        }
        written
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::{Arc, Mutex};

    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::models::{CostStructure, DirectCost, PricingStrategy};
    use crate::storage::{MemoryStore, StorageError};

    fn state_with_price(price: rust_decimal::Decimal) -> ScenarioState {
        let cost = CostStructure {
            direct_costs: vec![DirectCost {
                name: "Parts".to_string(),
                amount: dec!(10),
            }],
            ..CostStructure::default()
        };
        ScenarioState::capture(&cost, &PricingStrategy::with_price(price))
    }

    /// Store double whose writes always fail.
    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Ok(None)
        }
        fn set(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Format("read-only".to_string()))
        }
        fn remove(&mut self, _key: &str) -> Result<bool, StorageError> {
            Ok(false)
        }
        fn keys(&self) -> Result<Vec<String>, StorageError> {
            Ok(Vec::new())
        }
    }

    /// Store double that shares its contents between clones.
    #[derive(Clone, Default)]
    struct SharedStore(Arc<Mutex<MemoryStore>>);

    impl KeyValueStore for SharedStore {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.0.lock().unwrap().get(key)
        }
        fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
            self.0.lock().unwrap().set(key, value)
        }
        fn remove(&mut self, key: &str) -> Result<bool, StorageError> {
            self.0.lock().unwrap().remove(key)
        }
        fn keys(&self) -> Result<Vec<String>, StorageError> {
            self.0.lock().unwrap().keys()
        }
    }

    // =========================================================================
    // create / get
    // =========================================================================

    #[test]
    fn create_then_get_returns_equal_state() {
        let mut store = ScenarioStore::new();
        let state = state_with_price(dec!(25));

        let created = store.create("Baseline", &state).unwrap();
        let fetched = store.get(created.id).expect("scenario should exist");

        assert_eq!(fetched.state, state);
        assert_eq!(fetched.name, "Baseline");
        assert_eq!(fetched.created_at, fetched.updated_at);
    }

    #[test]
    fn mutating_input_after_save_does_not_change_stored_copy() {
        let mut store = ScenarioStore::new();
        let mut state = state_with_price(dec!(25));
        let id = store.create("Baseline", &state).unwrap().id;

        state.cost_analysis.direct_costs[0].amount = dec!(999);
        state.metrics.insert("revenue".to_string(), -1.0);

        let stored = &store.get(id).unwrap().state;
        assert_eq!(stored.cost_analysis.direct_costs[0].amount, dec!(10));
        assert_ne!(stored.metrics.get("revenue"), Some(&-1.0));
    }

    #[test]
    fn create_rejects_unrepresentable_state() {
        let mut store = ScenarioStore::new();
        let mut state = ScenarioState::default();
        state.metrics.insert("margin".to_string(), f64::NAN);

        let result = store.create("Broken", &state);

        assert!(matches!(result, Err(ScenarioError::Snapshot(_))));
        assert!(store.is_empty());
    }

    #[test]
    fn list_keeps_creation_order() {
        let mut store = ScenarioStore::new();
        for name in ["first", "second", "third"] {
            store.create(name, &ScenarioState::default()).unwrap();
        }

        let names: Vec<_> = store.list().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["first", "second", "third"]);
    }

    // =========================================================================
    // update / delete
    // =========================================================================

    #[test]
    fn update_renames_and_replaces_state() {
        let mut store = ScenarioStore::new();
        let id = store.create("Draft", &state_with_price(dec!(20))).unwrap().id;
        let replacement = state_with_price(dec!(30));

        store
            .update(id, Some("Final".to_string()), Some(&replacement))
            .unwrap();

        let scenario = store.get(id).unwrap();
        assert_eq!(scenario.name, "Final");
        assert_eq!(scenario.state, replacement);
        assert!(scenario.updated_at >= scenario.created_at);
    }

    #[test]
    fn update_with_only_name_keeps_state() {
        let mut store = ScenarioStore::new();
        let state = state_with_price(dec!(20));
        let id = store.create("Draft", &state).unwrap().id;

        store.update(id, Some("Renamed".to_string()), None).unwrap();

        assert_eq!(store.get(id).unwrap().state, state);
    }

    #[test]
    fn update_unknown_id_is_not_found() {
        let mut store = ScenarioStore::new();
        let missing = ScenarioId::generate();

        let result = store.update(missing, Some("x".to_string()), None);

        assert!(matches!(result, Err(ScenarioError::NotFound(id)) if id == missing));
    }

    #[test]
    fn delete_removes_scenario_and_selection() {
        let mut store = ScenarioStore::new();
        let id = store.create("Gone", &ScenarioState::default()).unwrap().id;
        store.select(id).unwrap();

        store.delete(id).unwrap();

        assert!(store.get(id).is_none());
        assert!(store.selected_ids().is_empty());
        assert!(matches!(store.delete(id), Err(ScenarioError::NotFound(_))));
    }

    // =========================================================================
    // selection
    // =========================================================================

    #[test]
    fn selection_is_reported_in_creation_order() {
        let mut store = ScenarioStore::new();
        let a = store.create("a", &ScenarioState::default()).unwrap().id;
        let b = store.create("b", &ScenarioState::default()).unwrap().id;
        let c = store.create("c", &ScenarioState::default()).unwrap().id;

        store.select(c).unwrap();
        store.select(a).unwrap();

        assert_eq!(store.selected_ids(), vec![a, c]);
        assert!(!store.is_selected(b));
    }

    #[test]
    fn toggle_selection_flips_state() {
        let mut store = ScenarioStore::new();
        let id = store.create("a", &ScenarioState::default()).unwrap().id;

        assert!(store.toggle_selection(id).unwrap());
        assert!(!store.toggle_selection(id).unwrap());
        assert!(store.toggle_selection(ScenarioId::generate()).is_err());
    }

    #[test]
    fn select_unknown_id_is_not_found() {
        let mut store = ScenarioStore::new();

        assert!(matches!(
            store.select(ScenarioId::generate()),
            Err(ScenarioError::NotFound(_))
        ));
    }

    // =========================================================================
    // export / import
    // =========================================================================

    #[test]
    fn export_then_import_appends_copies_with_fresh_ids() {
        let mut store = ScenarioStore::new();
        let original = store.create("Baseline", &state_with_price(dec!(25))).unwrap();
        let text = store.export(None).unwrap();

        let imported = store.import(&text).unwrap();

        assert_eq!(imported.len(), 1);
        assert_ne!(imported[0], original.id);
        let copy = store.get(imported[0]).unwrap();
        assert_eq!(copy.name, original.name);
        assert_eq!(copy.state, original.state);
        assert_eq!(copy.created_at, original.created_at);
        assert_eq!(store.len(), 2);
    }

    /// Long, non-terminating metric values like those derived from real
    /// cost data.
    fn state_with_computed_metrics() -> ScenarioState {
        let mut state = ScenarioState::default();
        state
            .metrics
            .insert("observed".to_string(), 488.557_572_227_492_76);
        for i in 1..500 {
            let value = (i as f64).sqrt() * 1234.567 / 7.0 + 1.0 / (i as f64 + 2.0);
            state.metrics.insert(format!("m{i}"), value);
        }
        state
    }

    fn metric_bits(state: &ScenarioState) -> Vec<(String, u64)> {
        state
            .metrics
            .iter()
            .map(|(name, value)| (name.clone(), value.to_bits()))
            .collect()
    }

    #[test]
    fn export_import_keeps_metrics_bit_for_bit() {
        let mut store = ScenarioStore::new();
        let state = state_with_computed_metrics();
        store.create("Computed", &state).unwrap();

        let mut other = ScenarioStore::new();
        let ids = other.import(&store.export(None).unwrap()).unwrap();

        assert_eq!(metric_bits(&other.get(ids[0]).unwrap().state), metric_bits(&state));
    }

    #[test]
    fn reopened_store_keeps_metrics_bit_for_bit() {
        let shared = SharedStore::default();
        let state = state_with_computed_metrics();
        let mut store = ScenarioStore::open(Box::new(shared.clone())).unwrap();
        store.create("Computed", &state).unwrap();

        let reopened = ScenarioStore::open(Box::new(shared)).unwrap();

        assert_eq!(metric_bits(&reopened.list()[0].state), metric_bits(&state));
    }

    #[test]
    fn export_selected_only_includes_selection() {
        let mut store = ScenarioStore::new();
        store.create("skip", &ScenarioState::default()).unwrap();
        let keep = store.create("keep", &ScenarioState::default()).unwrap().id;
        store.select(keep).unwrap();

        let mut other = ScenarioStore::new();
        other.import(&store.export_selected().unwrap()).unwrap();

        assert_eq!(other.len(), 1);
        assert_eq!(other.list()[0].name, "keep");
    }

    #[test]
    fn export_unknown_id_is_not_found() {
        let store = ScenarioStore::new();

        let result = store.export(Some(&[ScenarioId::generate()]));

        assert!(matches!(result, Err(ScenarioError::NotFound(_))));
    }

    #[test]
    fn import_of_malformed_text_appends_nothing() {
        let mut store = ScenarioStore::new();
        store.create("kept", &ScenarioState::default()).unwrap();

        let result = store.import("[{\"id\": 42}]");

        assert!(matches!(result, Err(ScenarioError::Serialization(_))));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn import_accepts_hand_written_records() {
        let text = r#"[{
            "id": "00000000-0000-4000-8000-000000000001",
            "name": "Handmade",
            "state": {
                "cost_analysis": { "target_margin": "0.4", "expected_volume": "50" },
                "metrics": { "revenue": 100.0 }
            },
            "created_at": "2025-01-01T00:00:00Z",
            "updated_at": "2025-01-02T00:00:00Z"
        }]"#;
        let mut store = ScenarioStore::new();

        let ids = store.import(text).unwrap();

        let scenario = store.get(ids[0]).unwrap();
        assert_eq!(scenario.state.cost_analysis.target_margin, dec!(0.4));
        assert_eq!(
            scenario.state.metrics,
            BTreeMap::from([("revenue".to_string(), 100.0)])
        );
        assert_ne!(scenario.id.to_string(), "00000000-0000-4000-8000-000000000001");
    }

    // =========================================================================
    // persistence
    // =========================================================================

    #[test]
    fn persistent_store_writes_through_and_reloads() {
        let shared = SharedStore::default();
        let mut store = ScenarioStore::open(Box::new(shared.clone())).unwrap();
        let id = store.create("saved", &state_with_price(dec!(25))).unwrap().id;
        store.update(id, Some("renamed".to_string()), None).unwrap();

        assert!(shared.get(SCENARIOS_KEY).unwrap().is_some());

        let reopened = ScenarioStore::open(Box::new(shared)).unwrap();
        assert_eq!(reopened.list(), store.list());
        assert_eq!(reopened.list()[0].name, "renamed");
        assert!(reopened.is_persistent());
    }

    #[test]
    fn failed_write_rolls_back_mutation() {
        let mut store = ScenarioStore::open(Box::new(BrokenStore)).unwrap();

        let result = store.create("lost", &ScenarioState::default());

        assert!(matches!(result, Err(ScenarioError::Storage(_))));
        assert!(store.is_empty());
    }
}
