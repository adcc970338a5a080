use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserRole {
    #[serde(rename = "STUDENT")]
    Student,
    #[serde(rename = "TEACHER")]
    Teacher,
}

/// Authenticated session identity. `id` is the contact number.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub role: UserRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
}

/// Roster entry. The contact number doubles as the record key and login id;
/// it is unique and immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub contact: String,
    pub name: String,
    pub father_name: String,
    pub class: String,
    pub roll_number: String,
    /// Explicit enrollment; `None` means all configured subjects.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subjects: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectConfig {
    pub name: String,
    pub max_marks: u32,
}

/// One student's result for one exam. `marks` holds only subjects that have
/// been entered; every aggregate below is re-derived from it on each write.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentResult {
    pub id: String,
    pub student_id: String,
    pub exam_name: String,
    pub marks: BTreeMap<String, f64>,
    pub total_marks: f64,
    pub max_total_marks: f64,
    pub percentage: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overall_grade: Option<String>,
    pub is_pass: bool,
}

impl StudentResult {
    pub fn empty(student_id: &str, exam_name: &str) -> Self {
        Self {
            id: result_doc_id(student_id, exam_name),
            student_id: student_id.to_string(),
            exam_name: exam_name.to_string(),
            marks: BTreeMap::new(),
            total_marks: 0.0,
            max_total_marks: 0.0,
            percentage: 0.0,
            overall_grade: None,
            is_pass: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DayStatus {
    #[serde(rename = "present")]
    Present,
    #[serde(rename = "absent")]
    Absent,
}

/// Day-keyed presence history plus counters derived from it. The counters
/// are always a cardinality count over `history`, never a running total.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    pub student_id: String,
    pub total_classes: u32,
    pub present_days: u32,
    /// ISO date string -> status.
    #[serde(default)]
    pub history: BTreeMap<String, DayStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
}

impl AttendanceRecord {
    pub fn empty(student_id: &str) -> Self {
        Self {
            student_id: student_id.to_string(),
            total_classes: 0,
            present_days: 0,
            history: BTreeMap::new(),
            last_updated: None,
        }
    }
}

/// Month-name -> paid flag for one student and calendar year. Unpaid months
/// are simply absent from the map.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeePaymentRecord {
    pub student_id: String,
    pub year: String,
    #[serde(default)]
    pub payments: BTreeMap<String, bool>,
}

impl FeePaymentRecord {
    pub fn empty(student_id: &str, year: &str) -> Self {
        Self {
            student_id: student_id.to_string(),
            year: year.to_string(),
            payments: BTreeMap::new(),
        }
    }
}

/// Class-name -> monthly fee amount. Global singleton, overwritten wholesale.
pub type FeeStructure = BTreeMap<String, u32>;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    pub text: String,
    /// ISO date the notice was posted.
    pub date: String,
    pub timestamp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pdf_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pdf_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    pub id: String,
    pub name: String,
    pub message: String,
    pub date: String,
    pub timestamp: i64,
}

/// Result record id: student id plus the exam name with whitespace runs
/// collapsed to single underscores. Distinct exam names that collapse to the
/// same string share a record; callers own that trade-off.
pub fn result_doc_id(student_id: &str, exam_name: &str) -> String {
    let mut normalized = String::with_capacity(exam_name.len());
    let mut in_ws = false;
    for ch in exam_name.trim().chars() {
        if ch.is_whitespace() {
            in_ws = true;
        } else {
            if in_ws && !normalized.is_empty() {
                normalized.push('_');
            }
            in_ws = false;
            normalized.push(ch);
        }
    }
    format!("{}_{}", student_id, normalized)
}

pub fn fee_doc_id(student_id: &str, year: &str) -> String {
    format!("{}_{}", student_id, year)
}
