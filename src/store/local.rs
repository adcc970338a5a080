use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::warn;

use super::{compare_field, Direction, DocumentStore, StoreError};

/// File-backed fallback store. Each collection is one JSON file holding the
/// entire collection as an array of records, so every single-record mutation
/// rewrites the whole blob. A configurable delay is applied before each
/// operation to keep callers honest about the async contract.
pub struct LocalStore {
    dir: PathBuf,
    latency: Duration,
}

const KEY_FIELD: &str = "id";

impl LocalStore {
    pub fn new(dir: PathBuf, latency_ms: u64) -> Self {
        Self {
            dir,
            latency: Duration::from_millis(latency_ms),
        }
    }

    fn collection_path(&self, collection: &str) -> PathBuf {
        self.dir.join(format!("{}.json", collection))
    }

    async fn delay(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    /// Missing or corrupt files read as an empty collection; the read path
    /// must never fail on bad serialized data.
    async fn read_collection(&self, collection: &str) -> Vec<Value> {
        let path = self.collection_path(collection);
        let raw = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(_) => return Vec::new(),
        };
        match serde_json::from_str::<Vec<Value>>(&raw) {
            Ok(records) => records,
            Err(e) => {
                warn!(collection, error = %e, "corrupt local collection, treating as empty");
                Vec::new()
            }
        }
    }

    async fn write_collection(
        &self,
        collection: &str,
        records: &[Value],
    ) -> Result<(), StoreError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let raw = serde_json::to_string(records).map_err(|e| StoreError::Encode {
            collection: collection.to_string(),
            source: e,
        })?;
        tokio::fs::write(self.collection_path(collection), raw).await?;
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for LocalStore {
    async fn get(&self, collection: &str, key: &str) -> Result<Option<Value>, StoreError> {
        self.delay().await;
        let records = self.read_collection(collection).await;
        Ok(records
            .into_iter()
            .find(|r| r.get(KEY_FIELD).and_then(|v| v.as_str()) == Some(key)))
    }

    async fn set(&self, collection: &str, key: &str, record: Value) -> Result<(), StoreError> {
        self.delay().await;
        let mut record = record;
        if let Some(obj) = record.as_object_mut() {
            obj.insert(KEY_FIELD.to_string(), Value::String(key.to_string()));
        }
        let mut records = self.read_collection(collection).await;
        match records
            .iter()
            .position(|r| r.get(KEY_FIELD).and_then(|v| v.as_str()) == Some(key))
        {
            Some(idx) => records[idx] = record,
            None => records.push(record),
        }
        self.write_collection(collection, &records).await
    }

    async fn query(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> Result<Vec<Value>, StoreError> {
        self.delay().await;
        let records = self.read_collection(collection).await;
        Ok(records
            .into_iter()
            .filter(|r| r.get(field) == Some(value))
            .collect())
    }

    async fn list_ordered(
        &self,
        collection: &str,
        field: &str,
        direction: Direction,
    ) -> Result<Vec<Value>, StoreError> {
        self.delay().await;
        let mut records = self.read_collection(collection).await;
        records.sort_by(|a, b| {
            let ord = compare_field(a, b, field);
            match direction {
                Direction::Asc => ord,
                Direction::Desc => ord.reverse(),
            }
        });
        Ok(records)
    }

    async fn delete(&self, collection: &str, key: &str) -> Result<(), StoreError> {
        self.delay().await;
        let mut records = self.read_collection(collection).await;
        records.retain(|r| r.get(KEY_FIELD).and_then(|v| v.as_str()) != Some(key));
        self.write_collection(collection, &records).await
    }
}
