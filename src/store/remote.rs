use async_trait::async_trait;
use serde_json::Value;

use super::{Direction, DocumentStore, StoreError};
use crate::config::RemoteConfig;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// REST document-store client. Collections live under
/// `{base_url}/{app_id}/{collection}`; records are plain JSON objects
/// addressed by key. Failures surface once to the caller, no retries.
pub struct RemoteStore {
    config: RemoteConfig,
    client: reqwest::Client,
}

impl RemoteStore {
    pub fn new(config: RemoteConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .expect("failed to build HTTP client");
        Self { config, client }
    }

    fn collection_url(&self, collection: &str) -> String {
        format!(
            "{}/{}/{}",
            self.config.base_url, self.config.app_id, collection
        )
    }

    fn doc_url(&self, collection: &str, key: &str) -> String {
        format!("{}/{}", self.collection_url(collection), key)
    }

    fn check_status(
        collection: &str,
        key: &str,
        status: reqwest::StatusCode,
    ) -> Result<(), StoreError> {
        if status.is_success() {
            Ok(())
        } else {
            Err(StoreError::Rejected {
                collection: collection.to_string(),
                key: key.to_string(),
                status: status.as_u16(),
            })
        }
    }
}

#[async_trait]
impl DocumentStore for RemoteStore {
    async fn get(&self, collection: &str, key: &str) -> Result<Option<Value>, StoreError> {
        let response = self
            .client
            .get(self.doc_url(collection, key))
            .send()
            .await?;
        if response.status().as_u16() == 404 {
            return Ok(None);
        }
        Self::check_status(collection, key, response.status())?;
        let doc: Value = response.json().await?;
        Ok(Some(doc))
    }

    async fn set(&self, collection: &str, key: &str, record: Value) -> Result<(), StoreError> {
        let mut record = record;
        if let Some(obj) = record.as_object_mut() {
            obj.insert("id".to_string(), Value::String(key.to_string()));
        }
        let response = self
            .client
            .put(self.doc_url(collection, key))
            .json(&record)
            .send()
            .await?;
        Self::check_status(collection, key, response.status())
    }

    async fn query(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> Result<Vec<Value>, StoreError> {
        let value_param = match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        let response = self
            .client
            .get(self.collection_url(collection))
            .query(&[("field", field), ("value", value_param.as_str())])
            .send()
            .await?;
        Self::check_status(collection, "", response.status())?;
        let docs: Vec<Value> = response.json().await?;
        Ok(docs)
    }

    async fn list_ordered(
        &self,
        collection: &str,
        field: &str,
        direction: Direction,
    ) -> Result<Vec<Value>, StoreError> {
        let dir = match direction {
            Direction::Asc => "asc",
            Direction::Desc => "desc",
        };
        let response = self
            .client
            .get(self.collection_url(collection))
            .query(&[("orderBy", field), ("direction", dir)])
            .send()
            .await?;
        Self::check_status(collection, "", response.status())?;
        let docs: Vec<Value> = response.json().await?;
        Ok(docs)
    }

    async fn delete(&self, collection: &str, key: &str) -> Result<(), StoreError> {
        let response = self
            .client
            .delete(self.doc_url(collection, key))
            .send()
            .await?;
        if response.status().as_u16() == 404 {
            // Deleting an absent record is not an error.
            return Ok(());
        }
        Self::check_status(collection, key, response.status())
    }
}
