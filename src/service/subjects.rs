use serde::{Deserialize, Serialize};
use tracing::info;

use super::{decode, encode, Api, ServiceError};
use crate::model::SubjectConfig;
use crate::store::collections;

const SUBJECTS_KEY: &str = "subjects";

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubjectsDoc {
    active_subjects: Vec<SubjectConfig>,
}

impl Api {
    /// Active subject list. An empty or missing config document is seeded
    /// with the configured defaults and persisted, so the first reader
    /// initializes the school.
    pub async fn subjects(&self) -> Result<Vec<SubjectConfig>, ServiceError> {
        let doc = self.store().get(collections::CONFIG, SUBJECTS_KEY).await?;
        if let Some(doc) = doc {
            if let Some(parsed) = decode::<SubjectsDoc>(collections::CONFIG, doc) {
                if !parsed.active_subjects.is_empty() {
                    return Ok(parsed.active_subjects);
                }
            }
        }

        let defaults: Vec<SubjectConfig> = self
            .config()
            .default_subjects
            .iter()
            .map(|(name, max)| SubjectConfig {
                name: name.clone(),
                max_marks: *max,
            })
            .collect();
        info!(count = defaults.len(), "seeding default subject config");
        self.write_subjects(&defaults).await?;
        Ok(defaults)
    }

    /// Overwrite the subject list wholesale. Names are case-normalized
    /// upper; already-saved results are never touched retroactively.
    pub async fn update_subjects(
        &self,
        subjects: Vec<SubjectConfig>,
    ) -> Result<Vec<SubjectConfig>, ServiceError> {
        let normalized: Vec<SubjectConfig> = subjects
            .into_iter()
            .map(|s| SubjectConfig {
                name: s.name.trim().to_uppercase(),
                max_marks: s.max_marks,
            })
            .filter(|s| !s.name.is_empty())
            .collect();
        self.write_subjects(&normalized).await?;
        Ok(normalized)
    }

    async fn write_subjects(&self, subjects: &[SubjectConfig]) -> Result<(), ServiceError> {
        let doc = encode(
            collections::CONFIG,
            &SubjectsDoc {
                active_subjects: subjects.to_vec(),
            },
        )?;
        self.store()
            .set(collections::CONFIG, SUBJECTS_KEY, doc)
            .await?;
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
    async fn first_read_seeds_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let api = api(&dir);
        let subjects = api.subjects().await.unwrap();
        assert_eq!(subjects.len(), 4);
        assert!(subjects.iter().any(|s| s.name == "MATHEMATICS"));
        // Second read comes from the persisted document.
        let again = api.subjects().await.unwrap();
        assert_eq!(again, subjects);
    }

    #[tokio::test]
    async fn update_normalizes_names_upper() {
        let dir = tempfile::tempdir().unwrap();
        let api = api(&dir);
        let saved = api
            .update_subjects(vec![
                SubjectConfig {
                    name: " science ".into(),
                    max_marks: 50,
                },
                SubjectConfig {
                    name: "Bengali".into(),
                    max_marks: 100,
                },
            ])
            .await
            .unwrap();
        assert_eq!(saved[0].name, "SCIENCE");
        assert_eq!(saved[0].max_marks, 50);
        assert_eq!(saved[1].name, "BENGALI");

        let read_back = api.subjects().await.unwrap();
        assert_eq!(read_back, saved);
    }
}
