use serde::Deserialize;

use crate::service::Api;
use crate::upload::MediaUploader;

#[derive(Debug, Deserialize, Clone)]
pub struct Request {
    pub id: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

pub struct AppState {
    pub api: Api,
    pub uploader: MediaUploader,
}
