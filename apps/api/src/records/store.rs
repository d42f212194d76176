//! Record store: the collection source the filter and statistics read from.
//!
//! Handlers work on a [`RecordStore::snapshot`]; the lock is never held while
//! filtering or aggregating.

use std::path::Path;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Local;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::models::record::ENTRY_TIME_FORMAT;
use crate::models::{RecordId, RecordKey, ResumeRecord, StoredRecord};

/// Outcome of an insert: the stored record plus any existing records sharing
/// its legacy (name, entry time) key.
#[derive(Debug, Clone)]
pub struct Inserted {
    pub record: StoredRecord,
    pub key_collisions: Vec<RecordId>,
}

/// Backend-agnostic store. Carried in `AppState` as `Arc<dyn RecordStore>`.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Every record, in insertion order.
    async fn snapshot(&self) -> Vec<StoredRecord>;

    async fn get(&self, id: RecordId) -> Option<StoredRecord>;

    /// Stores a new record under a fresh id. A blank entry time is assigned now.
    async fn insert(&self, record: ResumeRecord) -> Inserted;

    /// Full replacement. The id and the original entry time are kept.
    async fn replace(&self, id: RecordId, record: ResumeRecord) -> Option<StoredRecord>;

    async fn delete(&self, id: RecordId) -> Option<StoredRecord>;

    /// Deletes every record matching the legacy key. Returns how many were removed.
    async fn delete_by_key(&self, key: &RecordKey) -> usize;
}

// ────────────────────────────────────────────────────────────────────────────
// In-memory backend
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct InMemoryStore {
    records: RwLock<Vec<StoredRecord>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store holding `records`, each under a fresh id.
    pub fn with_records(records: Vec<ResumeRecord>) -> Self {
        let records = records
            .into_iter()
            .map(|record| StoredRecord {
                id: RecordId::new(),
                record,
            })
            .collect();
        Self {
            records: RwLock::new(records),
        }
    }
}

fn now_entry_time() -> String {
    Local::now().format(ENTRY_TIME_FORMAT).to_string()
}

#[async_trait]
impl RecordStore for InMemoryStore {
    async fn snapshot(&self) -> Vec<StoredRecord> {
        self.records.read().await.clone()
    }

    async fn get(&self, id: RecordId) -> Option<StoredRecord> {
        self.records
            .read()
            .await
            .iter()
            .find(|r| r.id == id)
            .cloned()
    }

    async fn insert(&self, mut record: ResumeRecord) -> Inserted {
        if record.entry_time.trim().is_empty() {
            record.entry_time = now_entry_time();
        }
        let stored = StoredRecord {
            id: RecordId::new(),
            record,
        };

        let mut records = self.records.write().await;
        let key = stored.record.key();
        let key_collisions: Vec<RecordId> = records
            .iter()
            .filter(|r| r.record.matches_key(&key))
            .map(|r| r.id)
            .collect();
        if !key_collisions.is_empty() {
            warn!(
                "Record {} shares key ({}, {}) with {} existing record(s)",
                stored.id,
                key.name,
                key.entry_time,
                key_collisions.len()
            );
        }
        records.push(stored.clone());
        info!("Inserted record {} ({} total)", stored.id, records.len());

        Inserted {
            record: stored,
            key_collisions,
        }
    }

    async fn replace(&self, id: RecordId, mut record: ResumeRecord) -> Option<StoredRecord> {
        let mut records = self.records.write().await;
        let existing = records.iter_mut().find(|r| r.id == id)?;
        if record.entry_time.trim().is_empty() {
            record.entry_time = existing.record.entry_time.clone();
        }
        existing.record = record;
        info!("Replaced record {id}");
        Some(existing.clone())
    }

    async fn delete(&self, id: RecordId) -> Option<StoredRecord> {
        let mut records = self.records.write().await;
        let index = records.iter().position(|r| r.id == id)?;
        let removed = records.remove(index);
        info!("Deleted record {id}");
        Some(removed)
    }

    async fn delete_by_key(&self, key: &RecordKey) -> usize {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|r| !r.record.matches_key(key));
        let removed = before - records.len();
        if removed > 1 {
            warn!(
                "Key ({}, {}) matched {removed} records; all were deleted",
                key.name, key.entry_time
            );
        }
        info!("Deleted {removed} record(s) by key");
        removed
    }
}

/// Reads a JSON array of flat records, e.g. an export of the upstream store.
pub async fn load_seed(path: &Path) -> Result<Vec<ResumeRecord>> {
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read seed file {}", path.display()))?;
    let records: Vec<ResumeRecord> = serde_json::from_str(&text)
        .with_context(|| format!("Seed file {} is not a JSON array of records", path.display()))?;
    info!("Loaded {} seed record(s) from {}", records.len(), path.display());
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn named(name: &str, entry_time: &str) -> ResumeRecord {
        ResumeRecord {
            name: name.to_string(),
            entry_time: entry_time.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_insert_assigns_id_and_entry_time() {
        let store = InMemoryStore::new();
        let inserted = store.insert(named("张三", "")).await;
        assert!(inserted.record.record.entry_time().is_some());
        assert!(inserted.key_collisions.is_empty());
        assert_eq!(store.get(inserted.record.id).await, Some(inserted.record));
    }

    #[tokio::test]
    async fn test_insert_keeps_supplied_entry_time() {
        let store = InMemoryStore::new();
        let inserted = store.insert(named("张三", "2023-05-01 08:00:00")).await;
        assert_eq!(inserted.record.record.entry_time, "2023-05-01 08:00:00");
    }

    #[tokio::test]
    async fn test_snapshot_preserves_insertion_order() {
        let store = InMemoryStore::new();
        for name in ["甲", "乙", "丙"] {
            store.insert(named(name, "2024-01-01 00:00:00")).await;
        }
        let names: Vec<String> = store
            .snapshot()
            .await
            .into_iter()
            .map(|r| r.record.name)
            .collect();
        assert_eq!(names, vec!["甲", "乙", "丙"]);
    }

    #[tokio::test]
    async fn test_key_collision_reported_but_ids_stay_distinct() {
        let store = InMemoryStore::new();
        let first = store.insert(named("张三", "2024-01-01 09:00:00")).await;
        let second = store.insert(named("张三", "2024-01-01 09:00:00")).await;
        assert_eq!(second.key_collisions, vec![first.record.id]);
        assert_ne!(first.record.id, second.record.id);

        // Deleting by id removes only the targeted record.
        assert!(store.delete(first.record.id).await.is_some());
        assert_eq!(store.snapshot().await.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_by_key_removes_all_colliding_records() {
        let store = InMemoryStore::new();
        store.insert(named("张三", "2024-01-01 09:00:00")).await;
        store.insert(named("张三", "2024-01-01 09:00:00")).await;
        store.insert(named("李四", "2024-01-01 09:00:00")).await;
        let key = RecordKey {
            name: "张三".to_string(),
            entry_time: "2024-01-01 09:00:00".to_string(),
        };
        assert_eq!(store.delete_by_key(&key).await, 2);
        assert_eq!(store.delete_by_key(&key).await, 0);
        assert_eq!(store.snapshot().await.len(), 1);
    }

    #[tokio::test]
    async fn test_replace_keeps_id_and_entry_time() {
        let store = InMemoryStore::new();
        let inserted = store.insert(named("张三", "2024-01-01 09:00:00")).await;
        let replaced = store
            .replace(inserted.record.id, named("张三丰", ""))
            .await
            .unwrap();
        assert_eq!(replaced.id, inserted.record.id);
        assert_eq!(replaced.record.name, "张三丰");
        assert_eq!(replaced.record.entry_time, "2024-01-01 09:00:00");
    }

    #[tokio::test]
    async fn test_missing_ids() {
        let store = InMemoryStore::new();
        assert!(store.get(RecordId::new()).await.is_none());
        assert!(store.delete(RecordId::new()).await.is_none());
        assert!(store
            .replace(RecordId::new(), ResumeRecord::default())
            .await
            .is_none());
    }

    #[tokio::test]
    async fn test_load_seed_reads_upstream_rows() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"姓名": "张三", "年龄": 28, "录入时间": "2024-02-01 10:00:00"}}, {{"姓名": "李四"}}]"#
        )
        .unwrap();
        let records = load_seed(file.path()).await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].age(), Some(28));

        let store = InMemoryStore::with_records(records);
        assert_eq!(store.snapshot().await.len(), 2);
    }

    #[tokio::test]
    async fn test_load_seed_rejects_non_array() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"姓名": "张三"}}"#).unwrap();
        assert!(load_seed(file.path()).await.is_err());
    }
}
