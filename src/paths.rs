//! Centralized path utilities for the installation tree.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{InstallError, Result};

/// Directory for locally-created state, relative to the installation root.
pub const LOCAL_DIR: &str = "local";

/// Relative path of the environment record, as shown in narration and errors.
pub const ENVIRONMENT_FILE: &str = "local/environment.json";

/// File name of the exclusive install lock at the installation root.
pub const LOCK_FILE: &str = ".govready-install.lock";

/// Get the local state directory under the installation root.
pub fn local_dir(root: &Path) -> PathBuf {
    root.join(LOCAL_DIR)
}

/// Get the path of the environment record under the installation root.
pub fn environment_file(root: &Path) -> PathBuf {
    local_dir(root).join("environment.json")
}

/// Get the path of the install lock under the installation root.
pub fn lock_file(root: &Path) -> PathBuf {
    root.join(LOCK_FILE)
}

/// Ensure the local state directory exists.
pub fn ensure_local_dir(root: &Path) -> Result<()> {
    fs::create_dir_all(local_dir(root))
        .map_err(|e| InstallError::io(format!("Failed to create local directory: {}", e)))
}
