use base64::Engine;
use serde_json::json;

use crate::ipc::error::ok;
use crate::ipc::helpers::{get_required_str, HandlerErr};
use crate::ipc::types::{AppState, Request};

async fn upload(state: &AppState, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let encoded = get_required_str(params, "bytes")?;
    let folder = get_required_str(params, "folder")?;
    let content_type = get_required_str(params, "contentType")?;
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(encoded.as_bytes())
        .map_err(|e| HandlerErr::bad_params(format!("bytes is not valid base64: {}", e)))?;
    let url = state.uploader.upload(bytes, &folder, &content_type).await;
    Ok(json!({ "url": url }))
}

pub async fn try_handle(state: &AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "media.upload" => Some(match upload(state, &req.params).await {
            Ok(result) => ok(&req.id, result),
            Err(e) => e.response(&req.id),
        }),
        _ => None,
    }
}
