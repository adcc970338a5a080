use serde_json::json;
use tracing::info;

use super::{decode, encode, Api, ServiceError};
use crate::model::Student;
use crate::store::collections;

impl Api {
    /// Register a new student. The contact number is the record key; an
    /// existing contact is a rejected operation, not a silent overwrite.
    pub async fn create_student(&self, student: Student) -> Result<(), ServiceError> {
        let existing = self
            .store()
            .get(collections::STUDENTS, &student.contact)
            .await?;
        if existing.is_some() {
            return Err(ServiceError::DuplicateStudent {
                contact: student.contact,
            });
        }
        info!(contact = %student.contact, class = %student.class, "registering student");
        let doc = encode(collections::STUDENTS, &student)?;
        self.store()
            .set(collections::STUDENTS, &student.contact, doc)
            .await?;
        Ok(())
    }

    /// Overwrite an existing student record. The contact number itself is
    /// immutable; edits arrive under the same key.
    pub async fn update_student(&self, student: Student) -> Result<(), ServiceError> {
        if self
            .store()
            .get(collections::STUDENTS, &student.contact)
            .await?
            .is_none()
        {
            return Err(ServiceError::NotFound { entity: "student" });
        }
        let doc = encode(collections::STUDENTS, &student)?;
        self.store()
            .set(collections::STUDENTS, &student.contact, doc)
            .await?;
        Ok(())
    }

    pub async fn students(&self) -> Result<Vec<Student>, ServiceError> {
        let docs = self
            .store()
            .list_ordered(collections::STUDENTS, "rollNumber", crate::store::Direction::Asc)
            .await?;
        Ok(docs
            .into_iter()
            .filter_map(|v| decode(collections::STUDENTS, v))
            .collect())
    }

    pub async fn students_by_class(&self, class_name: &str) -> Result<Vec<Student>, ServiceError> {
        let docs = self
            .store()
            .query(collections::STUDENTS, "class", &json!(class_name))
            .await?;
        Ok(docs
            .into_iter()
            .filter_map(|v| decode(collections::STUDENTS, v))
            .collect())
    }

    pub async fn student(&self, contact: &str) -> Result<Option<Student>, ServiceError> {
        let doc = self.store().get(collections::STUDENTS, contact).await?;
        Ok(doc.and_then(|v| decode(collections::STUDENTS, v)))
    }

    pub async fn delete_student(&self, contact: &str) -> Result<(), ServiceError> {
        info!(contact, "deleting student");
        self.store().delete(collections::STUDENTS, contact).await?;
        Ok(())
    }
}
