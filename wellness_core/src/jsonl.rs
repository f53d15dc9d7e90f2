//! JSON Lines record store.
//!
//! Records are appended one JSON object per line with file locking so that
//! concurrent CLI invocations can share a store. Used for local runs and for
//! staging content before it is loaded into the hosted tables.

use crate::store::partition_matches;
use crate::{Error, Record, RecordSink, RecordStore, Result};
use async_trait::async_trait;
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

/// JSONL-backed store keyed on one partition attribute
pub struct JsonlStore {
    path: PathBuf,
    partition_key: String,
}

impl JsonlStore {
    /// Create a store over the given file; the file is created on first write
    pub fn new(path: impl Into<PathBuf>, partition_key: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            partition_key: partition_key.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn matching(&self, key: &str) -> Result<Vec<Record>> {
        let path = self.path.clone();
        let partition_key = self.partition_key.clone();
        let key = key.to_string();

        tokio::task::spawn_blocking(move || -> Result<Vec<Record>> {
            let records = read_records(&path)?;
            Ok(records
                .into_iter()
                .filter(|r| partition_matches(r, &partition_key, &key))
                .collect())
        })
        .await
        .map_err(|e| Error::Internal(format!("JSONL read task failed: {}", e)))?
    }
}

#[async_trait]
impl RecordStore for JsonlStore {
    async fn get(&self, key: &str) -> Result<Option<Record>> {
        Ok(self.matching(key).await?.into_iter().next())
    }

    async fn query(&self, partition: &str) -> Result<Vec<Record>> {
        self.matching(partition).await
    }
}

#[async_trait]
impl RecordSink for JsonlStore {
    async fn put(&self, record: Record) -> Result<()> {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || append_record(&path, &record))
            .await
            .map_err(|e| Error::Internal(format!("JSONL write task failed: {}", e)))?
    }
}

/// Append one record to a JSONL file under an exclusive lock
pub fn append_record(path: &Path, record: &Record) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = OpenOptions::new().create(true).append(true).open(path)?;
    file.lock_exclusive()?;

    let mut writer = std::io::BufWriter::new(&file);
    let line = serde_json::to_string(record)?;
    writer.write_all(line.as_bytes())?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    drop(writer);

    file.unlock()?;
    tracing::debug!("Appended record to {:?}", path);
    Ok(())
}

/// Read all records from a JSONL file
///
/// A missing file is an empty store. Lines that fail to parse are skipped
/// with a warning.
pub fn read_records(path: &Path) -> Result<Vec<Record>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let file = File::open(path)?;
    file.lock_shared()?;

    let reader = BufReader::new(&file);
    let mut records = Vec::new();

    for (line_num, line_result) in reader.lines().enumerate() {
        let line = line_result?;
        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<Record>(&line) {
            Ok(record) => records.push(record),
            Err(e) => {
                tracing::warn!("Failed to parse record at line {}: {}", line_num + 1, e);
            }
        }
    }

    file.unlock()?;
    tracing::debug!("Read {} records from {:?}", records.len(), path);
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_then_get() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = JsonlStore::new(temp_dir.path().join("diet.jsonl"), "reportId");

        store
            .put(
                Record::new()
                    .with("reportId", "grains-at")
                    .with("recommendation", "Right on target."),
            )
            .await
            .unwrap();

        let hit = store.get("grains-at").await.unwrap().unwrap();
        assert_eq!(hit.text("recommendation"), Some("Right on target."));
        assert!(store.get("grains-below").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_missing_file_is_empty() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = JsonlStore::new(temp_dir.path().join("none.jsonl"), "reportId");
        assert!(store.query("veg-at").await.unwrap().is_empty());
    }

    #[test]
    fn test_corrupt_lines_skipped() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("questions.jsonl");

        append_record(&path, &Record::new().with("RelationshipType", "Partner")).unwrap();
        std::fs::OpenOptions::new()
            .append(true)
            .open(&path)
            .unwrap()
            .write_all(b"{truncated\n")
            .unwrap();
        append_record(&path, &Record::new().with("RelationshipType", "Friend")).unwrap();

        let records = read_records(&path).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].text("RelationshipType"), Some("Friend"));
    }
}
