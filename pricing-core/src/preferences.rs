//! User preferences kept in a [`KeyValueStore`].

use tracing::warn;

use crate::models::Theme;
use crate::storage::{KeyValueStore, StorageError};

pub const THEME_KEY: &str = "theme";

/// Reads the saved theme. Missing or unrecognised values fall back to
/// [`Theme::Light`].
pub fn load_theme(store: &dyn KeyValueStore) -> Result<Theme, StorageError> {
    let Some(raw) = store.get(THEME_KEY)? else {
        return Ok(Theme::default());
    };
    Ok(Theme::parse(&raw).unwrap_or_else(|| {
        warn!(value = %raw, "unrecognised theme preference; using light");
        Theme::default()
    }))
}

pub fn save_theme(
    store: &mut dyn KeyValueStore,
    theme: Theme,
) -> Result<(), StorageError> {
    store.set(THEME_KEY, theme.as_str())
}

/// Flips the saved theme and returns the new value.
pub fn toggle_theme(store: &mut dyn KeyValueStore) -> Result<Theme, StorageError> {
    let next = load_theme(store)?.toggled();
    save_theme(store, next)?;
    Ok(next)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn missing_theme_defaults_to_light() {
        let store = MemoryStore::new();

        assert_eq!(load_theme(&store).unwrap(), Theme::Light);
    }

    #[test]
    fn saved_theme_is_loaded() {
        let mut store = MemoryStore::new();
        save_theme(&mut store, Theme::Dark).unwrap();

        assert_eq!(load_theme(&store).unwrap(), Theme::Dark);
        assert_eq!(store.get(THEME_KEY).unwrap().as_deref(), Some("dark"));
    }

    #[test]
    fn garbage_theme_falls_back_to_light() {
        let mut store = MemoryStore::new();
        store.set(THEME_KEY, "solarized").unwrap();

        assert_eq!(load_theme(&store).unwrap(), Theme::Light);
    }

    #[test]
    fn toggle_flips_and_persists() {
        let mut store = MemoryStore::new();

        assert_eq!(toggle_theme(&mut store).unwrap(), Theme::Dark);
        assert_eq!(toggle_theme(&mut store).unwrap(), Theme::Light);
        assert_eq!(load_theme(&store).unwrap(), Theme::Light);
    }
}
