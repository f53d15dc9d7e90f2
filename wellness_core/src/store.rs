//! Key-value record store abstractions.
//!
//! Handlers never reach for a global client: every store is constructed by
//! the caller and passed in, so tests can hand over a `MemoryStore`.

use crate::{Error, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::RwLock;

/// A single item in a record store: a flat JSON object of attributes
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style attribute setter
    pub fn with(mut self, attribute: &str, value: impl Into<Value>) -> Self {
        self.0.insert(attribute.to_string(), value.into());
        self
    }

    pub fn insert(&mut self, attribute: &str, value: impl Into<Value>) {
        self.0.insert(attribute.to_string(), value.into());
    }

    pub fn get(&self, attribute: &str) -> Option<&Value> {
        self.0.get(attribute)
    }

    /// Attribute as text, if it is a string
    pub fn text(&self, attribute: &str) -> Option<&str> {
        self.0.get(attribute).and_then(Value::as_str)
    }

    pub fn attributes(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl From<Map<String, Value>> for Record {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Read side of a record store
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Point lookup by partition key; `None` when no record exists
    async fn get(&self, key: &str) -> Result<Option<Record>>;

    /// Every record sharing the partition key
    async fn query(&self, partition: &str) -> Result<Vec<Record>>;
}

/// Write side of a record store
#[async_trait]
pub trait RecordSink: Send + Sync {
    async fn put(&self, record: Record) -> Result<()>;
}

/// In-process store keyed on one partition attribute
pub struct MemoryStore {
    partition_key: String,
    records: RwLock<Vec<Record>>,
}

impl MemoryStore {
    pub fn new(partition_key: impl Into<String>) -> Self {
        Self {
            partition_key: partition_key.into(),
            records: RwLock::new(Vec::new()),
        }
    }

    /// Seed the store with records
    pub fn with_records(partition_key: impl Into<String>, records: Vec<Record>) -> Self {
        Self {
            partition_key: partition_key.into(),
            records: RwLock::new(records),
        }
    }

    pub fn len(&self) -> usize {
        self.records.read().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of all records, in insertion order
    pub fn records(&self) -> Vec<Record> {
        self.records.read().map(|r| r.clone()).unwrap_or_default()
    }

    fn matching(&self, key: &str) -> Result<Vec<Record>> {
        let records = self
            .records
            .read()
            .map_err(|_| Error::Store("memory store lock poisoned".into()))?;
        Ok(records
            .iter()
            .filter(|r| partition_matches(r, &self.partition_key, key))
            .cloned()
            .collect())
    }
}

/// Whether `record`'s partition attribute equals `key`
pub(crate) fn partition_matches(record: &Record, partition_key: &str, key: &str) -> bool {
    match record.get(partition_key) {
        Some(Value::String(s)) => s == key,
        Some(Value::Number(n)) => n.to_string() == key,
        _ => false,
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Record>> {
        Ok(self.matching(key)?.into_iter().next())
    }

    async fn query(&self, partition: &str) -> Result<Vec<Record>> {
        self.matching(partition)
    }
}

#[async_trait]
impl RecordSink for MemoryStore {
    async fn put(&self, record: Record) -> Result<()> {
        let mut records = self
            .records
            .write()
            .map_err(|_| Error::Store("memory store lock poisoned".into()))?;
        records.push(record);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> MemoryStore {
        MemoryStore::with_records(
            "reportId",
            vec![
                Record::new()
                    .with("reportId", "veg-below")
                    .with("recommendation", "Eat more greens."),
                Record::new()
                    .with("reportId", "veg-above")
                    .with("recommendation", "Plenty of vegetables."),
            ],
        )
    }

    #[tokio::test]
    async fn test_get_hit_and_miss() {
        let store = store();
        let hit = store.get("veg-below").await.unwrap().unwrap();
        assert_eq!(hit.text("recommendation"), Some("Eat more greens."));
        assert!(store.get("veg-at").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_query_returns_partition_only() {
        let store = MemoryStore::new("RelationshipType");
        for (kind, id) in [("Partner", "Q1"), ("Friend", "Q2"), ("Partner", "Q3")] {
            store
                .put(Record::new().with("RelationshipType", kind).with("QuestionID", id))
                .await
                .unwrap();
        }

        let partner = store.query("Partner").await.unwrap();
        assert_eq!(partner.len(), 2);
        assert_eq!(partner[1].text("QuestionID"), Some("Q3"));
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_record_text_only_for_strings() {
        let record = Record::new().with("n", 4).with("s", "four");
        assert_eq!(record.text("s"), Some("four"));
        assert_eq!(record.text("n"), None);
    }
}
