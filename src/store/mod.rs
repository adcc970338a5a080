mod local;
mod remote;

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use tracing::info;

use crate::config::AppConfig;

pub use local::LocalStore;
pub use remote::RemoteStore;

/// Collection names shared by both backends.
pub mod collections {
    pub const STUDENTS: &str = "students";
    pub const RESULTS: &str = "results";
    pub const ATTENDANCE: &str = "attendance";
    pub const CONFIG: &str = "config";
    pub const FEES: &str = "fees";
    pub const NOTIFICATIONS: &str = "notifications";
    pub const FEEDBACK: &str = "feedback";
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("remote store request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("remote store rejected {collection}/{key}: status {status}")]
    Rejected {
        collection: String,
        key: String,
        status: u16,
    },

    #[error("failed to serialize record for {collection}: {source}")]
    Encode {
        collection: String,
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

/// Uniform get/set/query/delete over a keyed document collection. Documents
/// are JSON objects; the store never interprets them beyond the queried
/// field. Full-record overwrite, last writer wins, no transactions and no
/// compare-and-swap; callers tolerate lost updates between concurrent
/// read-modify-write cycles.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Absent keys are `Ok(None)`, never an error.
    async fn get(&self, collection: &str, key: &str) -> Result<Option<Value>, StoreError>;

    async fn set(&self, collection: &str, key: &str, record: Value) -> Result<(), StoreError>;

    /// Records whose top-level `field` equals `value`. No ordering guarantee.
    async fn query(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> Result<Vec<Value>, StoreError>;

    /// All records, ordered by a top-level field.
    async fn list_ordered(
        &self,
        collection: &str,
        field: &str,
        direction: Direction,
    ) -> Result<Vec<Value>, StoreError>;

    async fn delete(&self, collection: &str, key: &str) -> Result<(), StoreError>;
}

/// Pick the backend once at startup. Aggregators never branch on whether a
/// remote store is configured.
pub fn select_backend(config: &AppConfig) -> Arc<dyn DocumentStore> {
    match &config.remote {
        Some(remote) => {
            info!(base_url = %remote.base_url, app_id = %remote.app_id, "using remote document store");
            Arc::new(RemoteStore::new(remote.clone()))
        }
        None => {
            info!(dir = %config.data_dir.display(), "no remote store configured, using local file store");
            Arc::new(LocalStore::new(
                config.data_dir.clone(),
                config.local_latency_ms,
            ))
        }
    }
}

/// Compare two documents by a top-level field, for `list_ordered`. Numbers
/// compare numerically, strings lexicographically; anything else ties.
pub(crate) fn compare_field(a: &Value, b: &Value, field: &str) -> std::cmp::Ordering {
    use std::cmp::Ordering;
    let fa = a.get(field);
    let fb = b.get(field);
    match (fa, fb) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        _ => Ordering::Equal,
    }
}
