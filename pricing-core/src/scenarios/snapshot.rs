//! Structural deep copy for scenario state.
//!
//! Values are copied through a `serde_json::Value` tree, the same shape they
//! take in an export. Anything that cannot make that trip (non-finite floats,
//! for instance) is reported as an error rather than silently altered.

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("value cannot be snapshotted: {0}")]
pub struct SnapshotError(#[from] serde_json::Error);

/// Returns an independent copy of `value`.
///
/// # Errors
///
/// Returns [`SnapshotError`] when `value` does not survive a JSON round trip.
///
/// # Example
///
/// ```
/// use std::collections::BTreeMap;
/// use pricing_core::scenarios::snapshot::deep_copy;
///
/// let mut metrics = BTreeMap::new();
/// metrics.insert("revenue".to_string(), 100.0);
/// assert_eq!(deep_copy(&metrics).unwrap(), metrics);
///
/// metrics.insert("margin".to_string(), f64::NAN);
/// assert!(deep_copy(&metrics).is_err());
/// ```
pub fn deep_copy<T>(value: &T) -> Result<T, SnapshotError>
where
    T: Serialize + DeserializeOwned,
{
    let tree = serde_json::to_value(value)?;
    Ok(serde_json::from_value(tree)?)
}
