use serde_json::json;

use crate::ipc::error::ok;
use crate::ipc::helpers::{get_required_bool, get_required_str, get_string_list, HandlerErr};
use crate::ipc::types::{AppState, Request};

async fn get(state: &AppState, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let student_id = get_required_str(params, "studentId")?;
    let record = state.api.attendance(&student_id).await?;
    Ok(json!({ "record": record }))
}

async fn all(state: &AppState) -> Result<serde_json::Value, HandlerErr> {
    let records = state.api.all_attendance().await?;
    Ok(json!({ "records": records }))
}

async fn for_class(
    state: &AppState,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let student_ids = get_string_list(params, "studentIds")?;
    let records = state.api.attendance_for_class(&student_ids).await?;
    Ok(json!({ "records": records }))
}

async fn mark(state: &AppState, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let student_id = get_required_str(params, "studentId")?;
    let date = get_required_str(params, "date")?;
    let present = get_required_bool(params, "present")?;
    let record = state.api.mark_attendance(&student_id, &date, present).await?;
    Ok(json!({ "record": record }))
}

async fn mark_class(
    state: &AppState,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let class = get_required_str(params, "class")?;
    let present_ids = get_string_list(params, "presentIds")?;
    let date = get_required_str(params, "date")?;
    let roster = state.api.students_by_class(&class).await?;
    let outcome = state
        .api
        .mark_class_attendance(&roster, &present_ids, &date)
        .await?;
    Ok(json!({ "updated": outcome.updated, "failed": outcome.failed }))
}

pub async fn try_handle(state: &AppState, req: &Request) -> Option<serde_json::Value> {
    let result = match req.method.as_str() {
        "attendance.get" => get(state, &req.params).await,
        "attendance.all" => all(state).await,
        "attendance.forClass" => for_class(state, &req.params).await,
        "attendance.mark" => mark(state, &req.params).await,
        "attendance.markClass" => mark_class(state, &req.params).await,
        _ => return None,
    };
    Some(match result {
        Ok(value) => ok(&req.id, value),
        Err(e) => e.response(&req.id),
    })
}
