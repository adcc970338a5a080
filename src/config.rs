use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Remote document-store endpoint. When absent the daemon runs entirely
/// against the local file store.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RemoteConfig {
    pub base_url: String,
    pub app_id: String,
}

/// Media upload endpoint (notices, marksheet attachments). When absent the
/// uploader always falls back to inline data URLs.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MediaConfig {
    pub endpoint: String,
    pub api_key: String,
    pub api_secret: String,
}

/// Process-wide configuration, loaded once at startup. School-specific
/// defaults (admin contacts, class list, subjects) all live here.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Contact numbers that log in as TEACHER regardless of the student roster.
    pub admin_contacts: Vec<String>,
    /// Ordered class list; also the key set of the fee structure.
    pub classes: Vec<String>,
    /// Subjects seeded into the config collection on first read.
    pub default_subjects: Vec<(String, u32)>,
    /// Subjects every class is enrolled in by default.
    pub base_subjects: Vec<String>,
    /// Classes that additionally get ENGLISH by default.
    pub english_classes: Vec<String>,
    /// Month names used as fee-ledger keys, calendar order.
    pub months: Vec<String>,
    /// Directory for the local file store (and media fallback).
    pub data_dir: PathBuf,
    /// Simulated latency of the local store, in milliseconds.
    pub local_latency_ms: u64,
    pub remote: Option<RemoteConfig>,
    pub media: Option<MediaConfig>,
}

const DEFAULT_DATA_DIR: &str = "./maktab-data";
const DEFAULT_LOCAL_LATENCY_MS: u64 = 300;

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            admin_contacts: vec!["9332039381".into(), "9832414854".into()],
            classes: vec![
                "Class I".into(),
                "Class II".into(),
                "Class III".into(),
                "Class IV".into(),
                "Class V".into(),
            ],
            default_subjects: vec![
                ("BENGALI".into(), 100),
                ("ENGLISH".into(), 100),
                ("ARABIC".into(), 100),
                ("MATHEMATICS".into(), 100),
            ],
            base_subjects: vec!["BENGALI".into(), "ARABIC".into(), "MATHEMATICS".into()],
            english_classes: vec!["Class III".into(), "Class IV".into(), "Class V".into()],
            months: [
                "January",
                "February",
                "March",
                "April",
                "May",
                "June",
                "July",
                "August",
                "September",
                "October",
                "November",
                "December",
            ]
            .iter()
            .map(|m| m.to_string())
            .collect(),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            local_latency_ms: DEFAULT_LOCAL_LATENCY_MS,
            remote: None,
            media: None,
        }
    }
}

impl AppConfig {
    /// Build configuration from the environment. Unset variables keep their
    /// documented defaults; a `.env` file is honored when present.
    ///
    /// Recognized variables:
    /// - `MAKTAB_ADMIN_CONTACTS`: comma-separated contact numbers
    /// - `MAKTAB_DATA_DIR`: local store directory
    /// - `MAKTAB_LOCAL_LATENCY_MS`: simulated local-store latency
    /// - `MAKTAB_REMOTE_URL` + `MAKTAB_APP_ID`: remote document store
    /// - `MAKTAB_MEDIA_ENDPOINT` + `MAKTAB_MEDIA_KEY` + `MAKTAB_MEDIA_SECRET`
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(raw) = std::env::var("MAKTAB_ADMIN_CONTACTS") {
            let contacts: Vec<String> = raw
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
            if !contacts.is_empty() {
                cfg.admin_contacts = contacts;
            }
        }
        if let Ok(dir) = std::env::var("MAKTAB_DATA_DIR") {
            if !dir.trim().is_empty() {
                cfg.data_dir = PathBuf::from(dir);
            }
        }
        if let Ok(raw) = std::env::var("MAKTAB_LOCAL_LATENCY_MS") {
            if let Ok(ms) = raw.trim().parse::<u64>() {
                cfg.local_latency_ms = ms;
            }
        }
        if let Ok(base_url) = std::env::var("MAKTAB_REMOTE_URL") {
            if !base_url.trim().is_empty() {
                let app_id = std::env::var("MAKTAB_APP_ID")
                    .ok()
                    .filter(|s| !s.trim().is_empty())
                    .unwrap_or_else(|| "maktab-default".to_string());
                cfg.remote = Some(RemoteConfig {
                    base_url: base_url.trim().trim_end_matches('/').to_string(),
                    app_id,
                });
            }
        }
        if let (Ok(endpoint), Ok(api_key), Ok(api_secret)) = (
            std::env::var("MAKTAB_MEDIA_ENDPOINT"),
            std::env::var("MAKTAB_MEDIA_KEY"),
            std::env::var("MAKTAB_MEDIA_SECRET"),
        ) {
            if !endpoint.trim().is_empty() {
                cfg.media = Some(MediaConfig {
                    endpoint: endpoint.trim().to_string(),
                    api_key,
                    api_secret,
                });
            }
        }

        cfg
    }

    /// Default enrollment for a class: the base subjects, plus ENGLISH for
    /// the classes configured to take it, filtered to subjects that exist.
    pub fn recommended_subjects(&self, class_name: &str, configured: &[String]) -> Vec<String> {
        let mut wanted = self.base_subjects.clone();
        if self.english_classes.iter().any(|c| c == class_name) {
            wanted.push("ENGLISH".to_string());
        }
        wanted.retain(|w| configured.iter().any(|c| c == w));
        wanted
    }
}
