use serde_json::json;

use crate::ipc::error::ok;
use crate::ipc::helpers::{get_optional_str, get_required_str, HandlerErr};
use crate::ipc::types::{AppState, Request};

async fn list(state: &AppState) -> Result<serde_json::Value, HandlerErr> {
    let notifications = state.api.notifications().await?;
    Ok(json!({ "notifications": notifications }))
}

async fn add(state: &AppState, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let text = get_required_str(params, "text")?;
    let image_url = get_optional_str(params, "imageUrl");
    let pdf_url = get_optional_str(params, "pdfUrl");
    let pdf_name = get_optional_str(params, "pdfName");
    let notification = state
        .api
        .add_notification(&text, image_url, pdf_url, pdf_name)
        .await?;
    Ok(json!({ "notification": notification }))
}

async fn delete(state: &AppState, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let id = get_required_str(params, "id")?;
    state.api.delete_notification(&id).await?;
    Ok(json!({ "deleted": true }))
}

async fn feedback_list(state: &AppState) -> Result<serde_json::Value, HandlerErr> {
    let feedback = state.api.feedback().await?;
    Ok(json!({ "feedback": feedback }))
}

async fn feedback_add(
    state: &AppState,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let name = get_required_str(params, "name")?;
    let message = get_required_str(params, "message")?;
    let feedback = state.api.add_feedback(&name, &message).await?;
    Ok(json!({ "feedback": feedback }))
}

async fn feedback_delete(
    state: &AppState,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let id = get_required_str(params, "id")?;
    state.api.delete_feedback(&id).await?;
    Ok(json!({ "deleted": true }))
}

pub async fn try_handle(state: &AppState, req: &Request) -> Option<serde_json::Value> {
    let result = match req.method.as_str() {
        "notices.list" => list(state).await,
        "notices.add" => add(state, &req.params).await,
        "notices.delete" => delete(state, &req.params).await,
        "feedback.list" => feedback_list(state).await,
        "feedback.add" => feedback_add(state, &req.params).await,
        "feedback.delete" => feedback_delete(state, &req.params).await,
        _ => return None,
    };
    Some(match result {
        Ok(value) => ok(&req.id, value),
        Err(e) => e.response(&req.id),
    })
}
