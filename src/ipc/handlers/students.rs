use serde_json::json;

use crate::ipc::error::ok;
use crate::ipc::helpers::{get_required_str, HandlerErr};
use crate::ipc::types::{AppState, Request};
use crate::model::Student;

fn student_from_params(params: &serde_json::Value) -> Result<Student, HandlerErr> {
    let raw = params
        .get("student")
        .cloned()
        .ok_or_else(|| HandlerErr::bad_params("missing student"))?;
    serde_json::from_value(raw)
        .map_err(|e| HandlerErr::bad_params(format!("invalid student: {}", e)))
}

async fn list(state: &AppState) -> Result<serde_json::Value, HandlerErr> {
    let students = state.api.students().await?;
    Ok(json!({ "students": students }))
}

async fn list_by_class(
    state: &AppState,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let class = get_required_str(params, "class")?;
    let students = state.api.students_by_class(&class).await?;
    Ok(json!({ "students": students }))
}

async fn create(state: &AppState, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let student = student_from_params(params)?;
    state.api.create_student(student).await?;
    Ok(json!({ "created": true }))
}

async fn update(state: &AppState, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let student = student_from_params(params)?;
    state.api.update_student(student).await?;
    Ok(json!({ "updated": true }))
}

async fn delete(state: &AppState, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let contact = get_required_str(params, "contact")?;
    state.api.delete_student(&contact).await?;
    Ok(json!({ "deleted": true }))
}

async fn recommended_subjects(
    state: &AppState,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let class = get_required_str(params, "class")?;
    let configured: Vec<String> = state
        .api
        .subjects()
        .await?
        .into_iter()
        .map(|s| s.name)
        .collect();
    let subjects = state.api.config().recommended_subjects(&class, &configured);
    Ok(json!({ "subjects": subjects }))
}

pub async fn try_handle(state: &AppState, req: &Request) -> Option<serde_json::Value> {
    let result = match req.method.as_str() {
        "students.list" => list(state).await,
        "students.listByClass" => list_by_class(state, &req.params).await,
        "students.create" => create(state, &req.params).await,
        "students.update" => update(state, &req.params).await,
        "students.delete" => delete(state, &req.params).await,
        "students.recommendedSubjects" => recommended_subjects(state, &req.params).await,
        _ => return None,
    };
    Some(match result {
        Ok(value) => ok(&req.id, value),
        Err(e) => e.response(&req.id),
    })
}
