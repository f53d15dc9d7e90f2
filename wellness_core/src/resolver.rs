//! Recommendation resolution.
//!
//! A category label becomes a `RecommendationKey`, and the key is looked up
//! in a record store holding pre-authored guidance. A miss is an ordinary
//! outcome and resolves to fallback text. A store fault or timeout is
//! reported in the affected slot only, never for the whole report.

use crate::{
    diet, DietInput, Error, FoodGroup, IntakeCategory, RecommendationKey, RecordStore, Result,
};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::time::Duration;

/// Text returned when no record exists for a key
pub const FALLBACK_TEXT: &str = "No recommendation available";

/// Attribute holding the guidance text on a recommendation record
pub const RECOMMENDATION_ATTRIBUTE: &str = "recommendation";

/// Look up guidance text for a key, bounded by `timeout`
///
/// Returns `Ok(FALLBACK_TEXT)` on a miss; `Err` only for store faults and
/// timeouts.
pub async fn lookup(
    store: &dyn RecordStore,
    key: &RecommendationKey,
    timeout: Duration,
) -> Result<String> {
    let record = tokio::time::timeout(timeout, store.get(key.as_str()))
        .await
        .map_err(|_| Error::Timeout {
            operation: format!("lookup {}", key),
            timeout_ms: timeout.as_millis() as u64,
        })??;

    match record {
        Some(record) => match record.text(RECOMMENDATION_ATTRIBUTE) {
            Some(text) => Ok(text.to_string()),
            None => {
                tracing::warn!("Record {} has no recommendation text", key);
                Ok(FALLBACK_TEXT.to_string())
            }
        },
        None => {
            tracing::debug!("No recommendation record for {}", key);
            Ok(FALLBACK_TEXT.to_string())
        }
    }
}

/// Resolve one group's guidance, folding any fault into the returned text
pub async fn resolve(
    store: &dyn RecordStore,
    group: FoodGroup,
    category: IntakeCategory,
    timeout: Duration,
) -> String {
    resolve_key(store, &RecommendationKey::new(group, category), timeout).await
}

/// Resolve guidance for an already composed key, folding any fault into the text
pub async fn resolve_key(
    store: &dyn RecordStore,
    key: &RecommendationKey,
    timeout: Duration,
) -> String {
    match lookup(store, key, timeout).await {
        Ok(text) => text,
        Err(e) => {
            tracing::error!("Recommendation lookup for {} failed: {}", key, e);
            format!("Error fetching recommendation: {}", e)
        }
    }
}

/// Guidance for every food group, in presentation order
#[derive(Clone, Debug, PartialEq)]
pub struct DietReport {
    entries: Vec<(FoodGroup, String)>,
}

impl DietReport {
    pub fn get(&self, group: FoodGroup) -> Option<&str> {
        self.entries
            .iter()
            .find(|(g, _)| *g == group)
            .map(|(_, text)| text.as_str())
    }

    pub fn entries(&self) -> &[(FoodGroup, String)] {
        &self.entries
    }
}

impl Serialize for DietReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (group, text) in &self.entries {
            map.serialize_entry(group.field_name(), text)?;
        }
        map.end()
    }
}

/// Classify every food group and resolve all six lookups concurrently
pub async fn resolve_diet_report(
    store: &dyn RecordStore,
    input: &DietInput,
    timeout: Duration,
) -> DietReport {
    let lookups = diet::recommendation_keys(input)
        .into_iter()
        .map(|(group, key)| async move { (group, resolve_key(store, &key, timeout).await) });

    let entries = futures::future::join_all(lookups).await;
    tracing::debug!("Resolved {} diet recommendations", entries.len());
    DietReport { entries }
}
