use serde::Serialize;

use super::{Api, ServiceError};
use crate::grading;
use crate::model::StudentResult;

/// One marksheet table row. The letter and level come from the grade table
/// applied to the raw mark, which is how issued marksheets have always read
/// even for subjects whose max is not 100.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarksheetRow {
    pub subject: String,
    pub max_marks: u32,
    pub obtained: f64,
    pub grade: String,
    pub level: String,
}

/// Everything the printable result document needs; rendering is the
/// caller's concern.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Marksheet {
    pub student_name: String,
    pub father_name: String,
    pub class: String,
    pub roll_number: String,
    pub exam_name: String,
    pub rows: Vec<MarksheetRow>,
    pub total_marks: f64,
    pub max_total_marks: f64,
    pub percentage: f64,
    pub overall_grade: String,
    pub is_pass: bool,
    pub rank: u32,
    pub total_classes: u32,
    pub present_days: u32,
    pub signatures: Vec<String>,
}

impl Api {
    /// Assemble the marksheet for one student and exam. Rows are limited to
    /// the student's enrolled subjects when an explicit enrollment exists;
    /// otherwise every configured subject appears, at zero if unmarked.
    pub async fn marksheet(
        &self,
        student_id: &str,
        exam_name: &str,
    ) -> Result<Marksheet, ServiceError> {
        let student = self
            .student(student_id)
            .await?
            .ok_or(ServiceError::NotFound { entity: "student" })?;
        let result = self
            .result(student_id, exam_name)
            .await?
            .unwrap_or_else(|| StudentResult::empty(student_id, exam_name));
        let subjects = self.subjects().await?;
        let rank = self.rank_of(exam_name, result.total_marks).await?;
        let attendance = self.attendance(student_id).await?;

        let rows: Vec<MarksheetRow> = subjects
            .iter()
            .filter(|s| match &student.subjects {
                Some(enrolled) if !enrolled.is_empty() => {
                    enrolled.iter().any(|e| e == &s.name)
                }
                _ => true,
            })
            .map(|s| {
                let obtained = result.marks.get(&s.name).copied().unwrap_or(0.0);
                let info = grading::grade_info(obtained);
                MarksheetRow {
                    subject: s.name.clone(),
                    max_marks: s.max_marks,
                    obtained,
                    grade: info.letter.to_string(),
                    level: info.level.to_string(),
                }
            })
            .collect();

        let (total_classes, present_days) = attendance
            .map(|a| (a.total_classes, a.present_days))
            .unwrap_or((0, 0));

        Ok(Marksheet {
            student_name: student.name,
            father_name: student.father_name,
            class: student.class,
            roll_number: student.roll_number,
            exam_name: exam_name.to_string(),
            rows,
            total_marks: result.total_marks,
            max_total_marks: result.max_total_marks,
            percentage: result.percentage,
            overall_grade: result.overall_grade.unwrap_or_else(|| "D".to_string()),
            is_pass: result.is_pass,
            rank,
            total_classes,
            present_days,
            signatures: vec!["Guardian Sign".to_string(), "Teacher Sign".to_string()],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::model::Student;
    use crate::store::LocalStore;
    use std::sync::Arc;

    fn api(dir: &tempfile::TempDir) -> Api {
        let store = Arc::new(LocalStore::new(dir.path().to_path_buf(), 0));
        Api::new(store, AppConfig::default())
    }

    async fn seed_student(api: &Api, subjects: Option<Vec<String>>) {
        api.create_student(Student {
            contact: "900".into(),
            name: "Rahim".into(),
            father_name: "Karim".into(),
            class: "Class III".into(),
            roll_number: "7".into(),
            subjects,
        })
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn marksheet_filters_rows_to_enrollment() {
        let dir = tempfile::tempdir().unwrap();
        let api = api(&dir);
        seed_student(&api, Some(vec!["BENGALI".into(), "MATHEMATICS".into()])).await;
        api.upsert_subject_mark("900", "Mid Term", "MATHEMATICS", 90.0)
            .await
            .unwrap();

        let sheet = api.marksheet("900", "Mid Term").await.unwrap();
        assert_eq!(sheet.rows.len(), 2);
        assert!(sheet.rows.iter().all(|r| r.subject != "ENGLISH"));
        let math = sheet.rows.iter().find(|r| r.subject == "MATHEMATICS").unwrap();
        assert_eq!(math.obtained, 90.0);
        assert_eq!(math.grade, "A+");
        assert_eq!(math.level, "OPL");
        // Unmarked enrolled subject shows as zero.
        let bengali = sheet.rows.iter().find(|r| r.subject == "BENGALI").unwrap();
        assert_eq!(bengali.obtained, 0.0);
        assert_eq!(bengali.grade, "D");
    }

    #[tokio::test]
    async fn marksheet_carries_rank_and_attendance() {
        let dir = tempfile::tempdir().unwrap();
        let api = api(&dir);
        seed_student(&api, None).await;
        api.upsert_subject_mark("900", "Mid Term", "MATHEMATICS", 90.0)
            .await
            .unwrap();
        api.upsert_subject_mark("901", "Mid Term", "MATHEMATICS", 95.0)
            .await
            .unwrap();
        api.mark_attendance("900", "2024-01-05", true).await.unwrap();
        api.mark_attendance("900", "2024-01-06", false).await.unwrap();

        let sheet = api.marksheet("900", "Mid Term").await.unwrap();
        assert_eq!(sheet.rank, 2);
        assert_eq!(sheet.total_classes, 2);
        assert_eq!(sheet.present_days, 1);
        assert_eq!(sheet.signatures.len(), 2);
        // No explicit enrollment: every configured subject appears.
        assert_eq!(sheet.rows.len(), 4);
    }

    #[tokio::test]
    async fn marksheet_for_unknown_student_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let api = api(&dir);
        let err = api.marksheet("nobody", "Mid Term").await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { .. }));
    }
}
