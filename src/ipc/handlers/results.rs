use std::collections::BTreeMap;

use serde_json::json;

use crate::ipc::error::ok;
use crate::ipc::helpers::{get_optional_str, get_required_f64, get_required_str, HandlerErr};
use crate::ipc::types::{AppState, Request};

fn marks_from_params(params: &serde_json::Value) -> Result<BTreeMap<String, f64>, HandlerErr> {
    let raw = params
        .get("marks")
        .cloned()
        .ok_or_else(|| HandlerErr::bad_params("missing marks"))?;
    serde_json::from_value(raw)
        .map_err(|e| HandlerErr::bad_params(format!("invalid marks: {}", e)))
}

async fn list(state: &AppState, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let student_id = get_optional_str(params, "studentId");
    let results = state.api.results(student_id.as_deref()).await?;
    Ok(json!({ "results": results }))
}

async fn upsert_subject_mark(
    state: &AppState,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let student_id = get_required_str(params, "studentId")?;
    let exam_name = get_required_str(params, "examName")?;
    let subject_name = get_required_str(params, "subjectName")?;
    let marks = get_required_f64(params, "marks")?;
    let result = state
        .api
        .upsert_subject_mark(&student_id, &exam_name, &subject_name, marks)
        .await?;
    Ok(json!({ "result": result }))
}

async fn save(state: &AppState, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let student_id = get_required_str(params, "studentId")?;
    let exam_name = get_required_str(params, "examName")?;
    let marks = marks_from_params(params)?;
    let result = state.api.save_result(&student_id, &exam_name, marks).await?;
    Ok(json!({ "result": result }))
}

async fn bulk_update_marks(
    state: &AppState,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let exam_name = get_required_str(params, "examName")?;
    let subject_name = get_required_str(params, "subjectName")?;
    let Some(items) = params.get("updates").and_then(|v| v.as_array()) else {
        return Err(HandlerErr::bad_params("missing updates"));
    };
    let mut updates = Vec::with_capacity(items.len());
    for item in items {
        let student_id = get_required_str(item, "studentId")?;
        let marks = get_required_f64(item, "marks")?;
        updates.push((student_id, marks));
    }
    let outcome = state
        .api
        .bulk_update_marks(&exam_name, &subject_name, &updates)
        .await?;
    Ok(json!({ "updated": outcome.updated, "failed": outcome.failed }))
}

async fn rank(state: &AppState, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let exam_name = get_required_str(params, "examName")?;
    let total_marks = get_required_f64(params, "totalMarks")?;
    let rank = state.api.rank_of(&exam_name, total_marks).await?;
    Ok(json!({ "rank": rank }))
}

pub async fn try_handle(state: &AppState, req: &Request) -> Option<serde_json::Value> {
    let result = match req.method.as_str() {
        "results.list" => list(state, &req.params).await,
        "results.upsertSubjectMark" => upsert_subject_mark(state, &req.params).await,
        "results.save" => save(state, &req.params).await,
        "results.bulkUpdateMarks" => bulk_update_marks(state, &req.params).await,
        "results.rank" => rank(state, &req.params).await,
        _ => return None,
    };
    Some(match result {
        Ok(value) => ok(&req.id, value),
        Err(e) => e.response(&req.id),
    })
}
