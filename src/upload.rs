use base64::Engine;
use chrono::Utc;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use tracing::warn;

use crate::config::MediaConfig;

const UPLOAD_TIMEOUT_SECS: u64 = 60;

/// Uploads binary payloads (notice images, marksheet PDFs) to the media
/// endpoint and hands back a retrievable URL. When the endpoint is missing
/// or the upload fails, the payload is embedded as an inline data URL so
/// the notice and marksheet features keep working offline.
pub struct MediaUploader {
    config: Option<MediaConfig>,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
}

impl MediaUploader {
    pub fn new(config: Option<MediaConfig>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(UPLOAD_TIMEOUT_SECS))
            .build()
            .expect("failed to build HTTP client");
        Self { config, client }
    }

    /// Upload `bytes` under a destination folder label. Never fails: the
    /// inline fallback absorbs endpoint and network errors.
    pub async fn upload(&self, bytes: Vec<u8>, folder: &str, content_type: &str) -> String {
        let Some(config) = &self.config else {
            return inline_data_url(&bytes, content_type);
        };
        match self.upload_remote(config, bytes.clone(), folder, content_type).await {
            Ok(url) => url,
            Err(e) => {
                warn!(folder, error = %e, "media upload failed, embedding inline");
                inline_data_url(&bytes, content_type)
            }
        }
    }

    async fn upload_remote(
        &self,
        config: &MediaConfig,
        bytes: Vec<u8>,
        folder: &str,
        content_type: &str,
    ) -> anyhow::Result<String> {
        let timestamp = Utc::now().timestamp();
        let signature = sign_params(folder, timestamp, &config.api_secret);

        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name("upload")
            .mime_str(content_type)?;
        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("api_key", config.api_key.clone())
            .text("timestamp", timestamp.to_string())
            .text("folder", folder.to_string())
            .text("signature", signature);

        let response = self
            .client
            .post(&config.endpoint)
            .multipart(form)
            .send()
            .await?;
        if !response.status().is_success() {
            anyhow::bail!("upload endpoint returned status {}", response.status());
        }
        let parsed: UploadResponse = response.json().await?;
        Ok(parsed.secure_url)
    }
}

/// Signature over the alphabetically-sorted request params plus the secret,
/// hex-encoded.
fn sign_params(folder: &str, timestamp: i64, secret: &str) -> String {
    let payload = format!("folder={}&timestamp={}{}", folder, timestamp, secret);
    let digest = Sha256::digest(payload.as_bytes());
    hex::encode(digest)
}

fn inline_data_url(bytes: &[u8], content_type: &str) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
    format!("data:{};base64,{}", content_type, encoded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn media(server: &MockServer) -> MediaConfig {
        MediaConfig {
            endpoint: format!("{}/upload", server.uri()),
            api_key: "key".into(),
            api_secret: "secret".into(),
        }
    }

    #[tokio::test]
    async fn successful_upload_returns_remote_url() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/upload"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "secure_url": "https://cdn.example/notice.png" })),
            )
            .mount(&server)
            .await;

        let uploader = MediaUploader::new(Some(media(&server)));
        let url = uploader.upload(vec![1, 2, 3], "notices", "image/png").await;
        assert_eq!(url, "https://cdn.example/notice.png");
    }

    #[tokio::test]
    async fn failed_upload_falls_back_to_data_url() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/upload"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let uploader = MediaUploader::new(Some(media(&server)));
        let url = uploader.upload(vec![1, 2, 3], "notices", "image/png").await;
        assert!(url.starts_with("data:image/png;base64,"));
    }

    #[tokio::test]
    async fn missing_endpoint_always_embeds_inline() {
        let uploader = MediaUploader::new(None);
        let url = uploader.upload(b"hello".to_vec(), "notices", "text/plain").await;
        assert_eq!(
            url,
            format!(
                "data:text/plain;base64,{}",
                base64::engine::general_purpose::STANDARD.encode(b"hello")
            )
        );
    }

    #[test]
    fn signature_is_stable_hex() {
        let a = sign_params("notices", 1700000000, "secret");
        let b = sign_params("notices", 1700000000, "secret");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
