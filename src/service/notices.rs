use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use super::{decode, encode, Api, ServiceError};
use crate::model::{Feedback, Notification};
use crate::store::{collections, Direction};

impl Api {
    /// Notices, newest first.
    pub async fn notifications(&self) -> Result<Vec<Notification>, ServiceError> {
        let docs = self
            .store()
            .list_ordered(collections::NOTIFICATIONS, "timestamp", Direction::Desc)
            .await?;
        Ok(docs
            .into_iter()
            .filter_map(|v| decode(collections::NOTIFICATIONS, v))
            .collect())
    }

    pub async fn add_notification(
        &self,
        text: &str,
        image_url: Option<String>,
        pdf_url: Option<String>,
        pdf_name: Option<String>,
    ) -> Result<Notification, ServiceError> {
        let now = Utc::now();
        let notification = Notification {
            id: Uuid::new_v4().to_string(),
            text: text.to_string(),
            date: now.format("%Y-%m-%d").to_string(),
            timestamp: now.timestamp_millis(),
            image_url,
            pdf_url,
            pdf_name,
        };
        info!(id = %notification.id, "posting notice");
        let doc = encode(collections::NOTIFICATIONS, &notification)?;
        self.store()
            .set(collections::NOTIFICATIONS, &notification.id, doc)
            .await?;
        Ok(notification)
    }

    pub async fn delete_notification(&self, id: &str) -> Result<(), ServiceError> {
        self.store().delete(collections::NOTIFICATIONS, id).await?;
        Ok(())
    }

    pub async fn feedback(&self) -> Result<Vec<Feedback>, ServiceError> {
        let docs = self
            .store()
            .list_ordered(collections::FEEDBACK, "timestamp", Direction::Desc)
            .await?;
        Ok(docs
            .into_iter()
            .filter_map(|v| decode(collections::FEEDBACK, v))
            .collect())
    }

    pub async fn add_feedback(&self, name: &str, message: &str) -> Result<Feedback, ServiceError> {
        let now = Utc::now();
        let feedback = Feedback {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            message: message.to_string(),
            date: now.format("%Y-%m-%d").to_string(),
            timestamp: now.timestamp_millis(),
        };
        let doc = encode(collections::FEEDBACK, &feedback)?;
        self.store()
            .set(collections::FEEDBACK, &feedback.id, doc)
            .await?;
        Ok(feedback)
    }

    pub async fn delete_feedback(&self, id: &str) -> Result<(), ServiceError> {
        self.store().delete(collections::FEEDBACK, id).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::store::LocalStore;
    use std::sync::Arc;

    fn api(dir: &tempfile::TempDir) -> Api {
        let store = Arc::new(LocalStore::new(dir.path().to_path_buf(), 0));
        Api::new(store, AppConfig::default())
    }

    #[tokio::test]
    async fn notices_list_newest_first() {
        let dir = tempfile::tempdir().unwrap();
        let api = api(&dir);
        let a = api.add_notification("first", None, None, None).await.unwrap();
        // Force distinct timestamps without sleeping a full second.
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let b = api.add_notification("second", None, None, None).await.unwrap();
        assert!(b.timestamp >= a.timestamp);

        let list = api.notifications().await.unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].text, "second");
    }

    #[tokio::test]
    async fn delete_notice_is_hard() {
        let dir = tempfile::tempdir().unwrap();
        let api = api(&dir);
        let n = api
            .add_notification("exam schedule", Some("http://img".into()), None, None)
            .await
            .unwrap();
        api.delete_notification(&n.id).await.unwrap();
        assert!(api.notifications().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn feedback_append_and_delete() {
        let dir = tempfile::tempdir().unwrap();
        let api = api(&dir);
        let f = api.add_feedback("Guardian", "More notice board photos").await.unwrap();
        let list = api.feedback().await.unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].message, "More notice board photos");
        api.delete_feedback(&f.id).await.unwrap();
        assert!(api.feedback().await.unwrap().is_empty());
    }
}
