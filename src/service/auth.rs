use serde_json::json;
use tracing::info;

use super::{decode, Api, ServiceError};
use crate::model::{Student, User, UserRole};
use crate::store::collections;

impl Api {
    /// Contact-number login. Admin contacts resolve to TEACHER before any
    /// roster lookup, so an admin logs in even with no student record.
    pub async fn login(&self, contact: &str) -> Result<Option<User>, ServiceError> {
        if self.config().admin_contacts.iter().any(|c| c == contact) {
            info!(contact, "admin login");
            return Ok(Some(User {
                id: contact.to_string(),
                name: "Teacher (Admin)".to_string(),
                role: UserRole::Teacher,
                class: None,
            }));
        }

        let hits = self
            .store()
            .query(collections::STUDENTS, "contact", &json!(contact))
            .await?;
        let student = hits
            .into_iter()
            .filter_map(|v| decode::<Student>(collections::STUDENTS, v))
            .next();
        Ok(student.map(|s| User {
            id: s.contact,
            name: s.name,
            role: UserRole::Student,
            class: Some(s.class),
        }))
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
    async fn admin_contact_wins_over_roster() {
        let dir = tempfile::tempdir().unwrap();
        let api = api(&dir);
        // Even with a student record under the admin contact, the role is TEACHER.
        api.create_student(Student {
            contact: "9332039381".into(),
            name: "Shadowed".into(),
            father_name: "X".into(),
            class: "Class I".into(),
            roll_number: "1".into(),
            subjects: None,
        })
        .await
        .unwrap();

        let user = api.login("9332039381").await.unwrap().unwrap();
        assert_eq!(user.role, UserRole::Teacher);
    }

    #[tokio::test]
    async fn student_login_by_contact() {
        let dir = tempfile::tempdir().unwrap();
        let api = api(&dir);
        api.create_student(Student {
            contact: "9000000001".into(),
            name: "Rahim".into(),
            father_name: "Karim".into(),
            class: "Class III".into(),
            roll_number: "7".into(),
            subjects: None,
        })
        .await
        .unwrap();

        let user = api.login("9000000001").await.unwrap().unwrap();
        assert_eq!(user.role, UserRole::Student);
        assert_eq!(user.class.as_deref(), Some("Class III"));
        assert!(api.login("9999999999").await.unwrap().is_none());
    }
}
