use std::collections::BTreeMap;

use serde_json::json;
use tracing::{info, warn};

use super::{decode, encode, Api, ServiceError};
use crate::grading;
use crate::model::{result_doc_id, StudentResult, SubjectConfig};
use crate::store::collections;

/// Outcome of a sequential bulk marks pass. Already-written students keep
/// their updates even when a later one fails; nothing is rolled back.
#[derive(Debug, Default)]
pub struct BulkMarksOutcome {
    pub updated: Vec<String>,
    pub failed: Vec<String>,
}

impl Api {
    pub async fn results(&self, student_id: Option<&str>) -> Result<Vec<StudentResult>, ServiceError> {
        let docs = match student_id {
            Some(id) => {
                self.store()
                    .query(collections::RESULTS, "studentId", &json!(id))
                    .await?
            }
            None => {
                self.store()
                    .list_ordered(collections::RESULTS, "studentId", crate::store::Direction::Asc)
                    .await?
            }
        };
        Ok(docs
            .into_iter()
            .filter_map(|v| decode(collections::RESULTS, v))
            .collect())
    }

    pub async fn result(
        &self,
        student_id: &str,
        exam_name: &str,
    ) -> Result<Option<StudentResult>, ServiceError> {
        let doc_id = result_doc_id(student_id, exam_name);
        let doc = self.store().get(collections::RESULTS, &doc_id).await?;
        Ok(doc.and_then(|v| decode(collections::RESULTS, v)))
    }

    /// Set one subject's mark for a student and exam, then run the full
    /// recompute pass over every subject currently in the map. Read-modify-
    /// write preserves the other subjects' entries; calling this twice with
    /// the same inputs is a no-op the second time.
    pub async fn upsert_subject_mark(
        &self,
        student_id: &str,
        exam_name: &str,
        subject_name: &str,
        mark: f64,
    ) -> Result<StudentResult, ServiceError> {
        let subjects = self.subjects().await?;
        self.upsert_with_subjects(student_id, exam_name, subject_name, mark, &subjects)
            .await
    }

    async fn upsert_with_subjects(
        &self,
        student_id: &str,
        exam_name: &str,
        subject_name: &str,
        mark: f64,
        subjects: &[SubjectConfig],
    ) -> Result<StudentResult, ServiceError> {
        let mut result = self
            .result(student_id, exam_name)
            .await?
            .unwrap_or_else(|| StudentResult::empty(student_id, exam_name));
        result.marks.insert(subject_name.to_string(), mark);
        grading::recompute(&mut result, subjects);
        self.write_result(&result).await?;
        Ok(result)
    }

    /// Persist a complete marks map (the individual-editor flow). The same
    /// recompute rule applies before the write; the caller's aggregates, if
    /// any, are ignored.
    pub async fn save_result(
        &self,
        student_id: &str,
        exam_name: &str,
        marks: BTreeMap<String, f64>,
    ) -> Result<StudentResult, ServiceError> {
        let subjects = self.subjects().await?;
        let mut result = StudentResult::empty(student_id, exam_name);
        result.marks = marks;
        grading::recompute(&mut result, &subjects);
        self.write_result(&result).await?;
        Ok(result)
    }

    /// One subject's marks for a whole roster. Students are processed one
    /// at a time, each a full read-modify-write round trip; one student's
    /// failure is recorded and does not block the rest.
    pub async fn bulk_update_marks(
        &self,
        exam_name: &str,
        subject_name: &str,
        updates: &[(String, f64)],
    ) -> Result<BulkMarksOutcome, ServiceError> {
        let subjects = self.subjects().await?;
        let mut outcome = BulkMarksOutcome::default();
        info!(exam_name, subject_name, count = updates.len(), "bulk marks entry");
        for (student_id, mark) in updates {
            match self
                .upsert_with_subjects(student_id, exam_name, subject_name, *mark, &subjects)
                .await
            {
                Ok(_) => outcome.updated.push(student_id.clone()),
                Err(e) => {
                    warn!(student_id = %student_id, error = %e, "bulk marks write failed");
                    outcome.failed.push(student_id.clone());
                }
            }
        }
        Ok(outcome)
    }

    /// Ordinal rank within an exam: totals of every result for the exam,
    /// sorted descending, first index of `my_total` plus one. An exam with
    /// no results (or a total not present) ranks 0.
    pub async fn rank_of(&self, exam_name: &str, my_total: f64) -> Result<u32, ServiceError> {
        let docs = self
            .store()
            .query(collections::RESULTS, "examName", &json!(exam_name))
            .await?;
        let totals: Vec<f64> = docs
            .iter()
            .filter_map(|d| d.get("totalMarks").and_then(|v| v.as_f64()))
            .collect();
        Ok(grading::rank_in(&totals, my_total))
    }

    async fn write_result(&self, result: &StudentResult) -> Result<(), ServiceError> {
        let doc = encode(collections::RESULTS, result)?;
        self.store()
            .set(collections::RESULTS, &result.id, doc)
            .await?;
        Ok(())
    }
}
