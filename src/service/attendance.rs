use tracing::{info, warn};

use super::{decode, encode, Api, ServiceError};
use crate::model::{AttendanceRecord, DayStatus, Student};
use crate::store::collections;

/// Per-student outcome of a class-wide attendance pass.
#[derive(Debug, Default)]
pub struct ClassAttendanceOutcome {
    pub updated: Vec<String>,
    pub failed: Vec<String>,
}

fn recount(record: &mut AttendanceRecord) {
    record.total_classes = record.history.len() as u32;
    record.present_days = record
        .history
        .values()
        .filter(|s| **s == DayStatus::Present)
        .count() as u32;
}

impl Api {
    pub async fn attendance(
        &self,
        student_id: &str,
    ) -> Result<Option<AttendanceRecord>, ServiceError> {
        let doc = self.store().get(collections::ATTENDANCE, student_id).await?;
        Ok(doc.and_then(|v| decode(collections::ATTENDANCE, v)))
    }

    pub async fn all_attendance(&self) -> Result<Vec<AttendanceRecord>, ServiceError> {
        let docs = self
            .store()
            .list_ordered(
                collections::ATTENDANCE,
                "studentId",
                crate::store::Direction::Asc,
            )
            .await?;
        Ok(docs
            .into_iter()
            .filter_map(|v| decode(collections::ATTENDANCE, v))
            .collect())
    }

    /// Records for a class roster, fetched one student at a time. Students
    /// with no record yet are simply absent from the output.
    pub async fn attendance_for_class(
        &self,
        student_ids: &[String],
    ) -> Result<Vec<AttendanceRecord>, ServiceError> {
        let mut records = Vec::new();
        for id in student_ids {
            if let Some(r) = self.attendance(id).await? {
                records.push(r);
            }
        }
        Ok(records)
    }

    /// Mark one student for one date. The date's entry is overwritten
    /// unconditionally and both counters are recomputed by scanning the full
    /// history map, so re-marking a date never double-counts and flipping a
    /// status shifts `presentDays` without touching `totalClasses`.
    pub async fn mark_attendance(
        &self,
        student_id: &str,
        date: &str,
        present: bool,
    ) -> Result<AttendanceRecord, ServiceError> {
        let mut record = self
            .attendance(student_id)
            .await?
            .unwrap_or_else(|| AttendanceRecord::empty(student_id));

        let status = if present {
            DayStatus::Present
        } else {
            DayStatus::Absent
        };
        record.history.insert(date.to_string(), status);
        recount(&mut record);
        record.last_updated = Some(date.to_string());

        let doc = encode(collections::ATTENDANCE, &record)?;
        self.store()
            .set(collections::ATTENDANCE, student_id, doc)
            .await?;
        Ok(record)
    }

    /// Apply the per-student transition to a whole roster for one date.
    /// Writes are independent and idempotent; a failed student is recorded
    /// and retryable individually without disturbing the rest.
    pub async fn mark_class_attendance(
        &self,
        roster: &[Student],
        present_ids: &[String],
        date: &str,
    ) -> Result<ClassAttendanceOutcome, ServiceError> {
        let mut outcome = ClassAttendanceOutcome::default();
        info!(date, roster = roster.len(), "marking class attendance");
        for student in roster {
            let present = present_ids.iter().any(|id| id == &student.contact);
            match self.mark_attendance(&student.contact, date, present).await {
                Ok(_) => outcome.updated.push(student.contact.clone()),
                Err(e) => {
                    warn!(student_id = %student.contact, error = %e, "attendance write failed");
                    outcome.failed.push(student.contact.clone());
                }
            }
        }
        Ok(outcome)
    }
}
