use serde_json::json;

use crate::ipc::error::ok;
use crate::ipc::helpers::HandlerErr;
use crate::ipc::types::{AppState, Request};
use crate::model::SubjectConfig;

async fn get(state: &AppState) -> Result<serde_json::Value, HandlerErr> {
    let subjects = state.api.subjects().await?;
    Ok(json!({ "activeSubjects": subjects }))
}

async fn update(state: &AppState, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let raw = params
        .get("subjects")
        .cloned()
        .ok_or_else(|| HandlerErr::bad_params("missing subjects"))?;
    let subjects: Vec<SubjectConfig> = serde_json::from_value(raw)
        .map_err(|e| HandlerErr::bad_params(format!("invalid subjects: {}", e)))?;
    let saved = state.api.update_subjects(subjects).await?;
    Ok(json!({ "activeSubjects": saved }))
}

pub async fn try_handle(state: &AppState, req: &Request) -> Option<serde_json::Value> {
    let result = match req.method.as_str() {
        "subjects.get" => get(state).await,
        "subjects.update" => update(state, &req.params).await,
        _ => return None,
    };
    Some(match result {
        Ok(value) => ok(&req.id, value),
        Err(e) => e.response(&req.id),
    })
}
