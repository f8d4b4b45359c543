//! Exclusive install lock for the installation directory.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{InstallError, Result};
use crate::paths;

/// On-disk content of the lock file.
#[derive(Debug, Serialize, Deserialize)]
struct LockRecord {
    acquired: String,
    pid: u32,
}

/// Guard holding the exclusive install lock.
///
/// The lock file is removed when the guard drops, so every exit path of
/// the sequence, including interrupts, releases it.
#[derive(Debug)]
pub struct InstallLock {
    path: PathBuf,
}

impl InstallLock {
    /// Acquire the lock for `root`, failing if another install holds it.
    pub fn acquire(root: &Path) -> Result<Self> {
        let path = paths::lock_file(root);
        let file = match fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
        {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                return Err(InstallError::locked(describe_held_lock(&path)));
            }
            Err(e) => {
                return Err(InstallError::io(format!(
                    "Failed to create install lock '{}': {}",
                    path.display(),
                    e
                )));
            }
        };
        tracing::debug!("Acquired install lock at {}", path.display());
        // The guard exists before the record is written, so a write failure
        // still removes the file on drop.
        let guard = Self { path };
        let record = LockRecord {
            acquired: chrono::Utc::now().to_rfc3339(),
            pid: std::process::id(),
        };
        serde_json::to_writer(&file, &record)
            .map_err(|e| InstallError::io(format!("Failed to write install lock: {}", e)))?;
        Ok(guard)
    }
}

impl Drop for InstallLock {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            tracing::warn!("Failed to remove install lock {:?}: {}", self.path, e);
        }
    }
}

/// Describe a held lock for the fatal message, naming the recorded holder
/// when the lock file is readable.
fn describe_held_lock(path: &Path) -> String {
    let record = fs::read_to_string(path)
        .ok()
        .and_then(|content| serde_json::from_str::<LockRecord>(&content).ok());
    match record {
        Some(record) => format!(
            "Another install appears to be running: '{}' was acquired {} by pid {}",
            path.display(),
            record.acquired,
            record.pid
        ),
        None => format!(
            "Another install appears to be running: remove '{}' if that is not the case",
            path.display()
        ),
    }
}
