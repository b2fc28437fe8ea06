//! Unified path management for docqa configuration files.
//!
//! All docqa client state lives under the platform config directory.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/docqa/             # Config directory
//! └── session.json             # Persisted bearer token
//! ```

use std::path::PathBuf;

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Home directory could not be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

/// Unified path management for docqa.
pub struct DocqaPaths;

impl DocqaPaths {
    /// Returns the docqa configuration directory.
    ///
    /// # Returns
    ///
    /// - `Ok(PathBuf)`: Path to config directory (e.g., `~/.config/docqa/`)
    /// - `Err(PathError::HomeDirNotFound)`: Could not determine directory
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join("docqa"))
            .ok_or(PathError::HomeDirNotFound)
    }

    /// Returns the path to the persisted session file.
    ///
    /// # Security Note
    ///
    /// The file holds a bearer token in plaintext JSON; it should not be
    /// world-readable.
    pub fn session_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("session.json"))
    }
}
