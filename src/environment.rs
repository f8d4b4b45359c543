//! The locally persisted environment record, `local/environment.json`.
//!
//! "Environment" here means GovReady-Q's locally-created settings record,
//! not OS environment variables. The record is written exactly once; an
//! existing well-formed record is never touched again.

use std::fs;
use std::path::Path;

use rand::Rng as _;
use serde::{Deserialize, Serialize};

use crate::error::{InstallError, Result};
use crate::paths;

/// Default URL the configured instance will serve on.
pub const DEFAULT_GOVREADY_URL: &str = "http://localhost:8000";

/// Alphabet the generated secret key draws from.
pub const SECRET_KEY_ALPHABET: &str = "abcdefghijklmnopqrstuvwxyz0123456789!@#$%^&*(-_=+)";

/// Length of the generated secret key.
pub const SECRET_KEY_LEN: usize = 50;

/// Locally persisted settings record.
///
/// Field order matches the serialized key order (alphabetical), so a fresh
/// record is byte-identical to ones written by earlier installer releases.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    pub debug: bool,
    #[serde(rename = "govready-url")]
    pub govready_url: String,
    #[serde(rename = "secret-key")]
    pub secret_key: String,
    #[serde(rename = "static")]
    pub static_root: String,
    pub test_visible: bool,
}

impl EnvironmentConfig {
    /// Build a fresh record with documented defaults and a new secret key.
    pub fn generate() -> Self {
        Self {
            debug: true,
            govready_url: DEFAULT_GOVREADY_URL.to_string(),
            secret_key: generate_secret_key(),
            static_root: "static_root".to_string(),
            test_visible: false,
        }
    }
}

/// State of the record on disk, checked before any side effect.
#[derive(Debug)]
pub enum RecordStatus {
    /// A well-formed record is already present; it must not be rewritten.
    Present,
    /// No record exists yet.
    Absent,
    /// A record exists but is not valid JSON. Carries the raw content so
    /// the caller can show it for diagnosis.
    Malformed { content: String },
}

/// Inspect the record at `path` without modifying it.
///
/// Any syntactically valid JSON counts as well-formed. The record is not
/// validated against a schema, matching what the application accepts.
pub fn inspect_record(path: &Path) -> Result<RecordStatus> {
    if !path.exists() {
        return Ok(RecordStatus::Absent);
    }
    let content = fs::read_to_string(path)
        .map_err(|e| InstallError::io(format!("Failed to read '{}': {}", path.display(), e)))?;
    if serde_json::from_str::<serde_json::Value>(&content).is_ok() {
        Ok(RecordStatus::Present)
    } else {
        Ok(RecordStatus::Malformed { content })
    }
}

/// Generate a fresh record and persist it under `root`.
pub fn create_record(root: &Path) -> Result<()> {
    paths::ensure_local_dir(root)?;
    let record = EnvironmentConfig::generate();
    let content = serde_json::to_string_pretty(&record)
        .map_err(|e| InstallError::config(format!("Failed to serialize environment: {}", e)))?;
    fs::write(paths::environment_file(root), content).map_err(|e| {
        InstallError::io(format!(
            "Failed to write '{}': {}",
            paths::ENVIRONMENT_FILE,
            e
        ))
    })
}

fn generate_secret_key() -> String {
    let alphabet = SECRET_KEY_ALPHABET.as_bytes();
    let mut rng = rand::rng();
    (0..SECRET_KEY_LEN)
        .map(|_| alphabet[rng.random_range(0..alphabet.len())] as char)
        .collect()
}
