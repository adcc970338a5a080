mod attendance;
mod auth;
mod fees;
mod notices;
mod reports;
mod results;
mod students;
mod subjects;

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

use crate::config::AppConfig;
use crate::store::{DocumentStore, StoreError};

pub use attendance::ClassAttendanceOutcome;
pub use reports::{Marksheet, MarksheetRow};
pub use results::BulkMarksOutcome;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("student with contact {contact} already exists")]
    DuplicateStudent { contact: String },

    #[error("{entity} not found")]
    NotFound { entity: &'static str },
}

/// The data-access service all handlers call into. Holds the backend chosen
/// at startup; every operation is a sequential read, compute, write.
pub struct Api {
    store: Arc<dyn DocumentStore>,
    config: AppConfig,
}

impl Api {
    pub fn new(store: Arc<dyn DocumentStore>, config: AppConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub(crate) fn store(&self) -> &dyn DocumentStore {
        self.store.as_ref()
    }
}

/// Decode a stored document, skipping records that no longer parse instead
/// of failing the whole read.
pub(crate) fn decode<T: DeserializeOwned>(collection: &str, value: Value) -> Option<T> {
    match serde_json::from_value(value) {
        Ok(v) => Some(v),
        Err(e) => {
            warn!(collection, error = %e, "skipping malformed stored record");
            None
        }
    }
}

pub(crate) fn encode<T: serde::Serialize>(
    collection: &str,
    record: &T,
) -> Result<Value, StoreError> {
    serde_json::to_value(record).map_err(|e| StoreError::Encode {
        collection: collection.to_string(),
        source: e,
    })
}
