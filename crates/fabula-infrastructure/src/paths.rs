//! Unified path management for fabula files.
//!
//! Configuration lives under the platform config directory, the session log
//! under the platform data directory, so the two can be backed up and synced
//! independently.

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

/// Unified path management for fabula.
///
/// # Directory Structure
///
/// ```text
/// ~/.config/fabula/            # Config directory
/// └── config.toml              # Application configuration
///
/// ~/.local/share/fabula/       # Data directory
/// ├── sessions.json            # The session log
/// ├── sessions.json.lock       # Lock sidecar
/// └── sessions.json.corrupt-*  # Corruption backup artifacts
/// ```
pub struct FabulaPaths;

impl FabulaPaths {
    /// Returns the fabula configuration directory.
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join("fabula"))
            .ok_or(PathError::HomeDirNotFound)
    }

    /// Returns the fabula data directory.
    pub fn data_dir() -> Result<PathBuf, PathError> {
        dirs::data_dir()
            .map(|dir| dir.join("fabula"))
            .ok_or(PathError::HomeDirNotFound)
    }

    /// Returns the path to the main configuration file.
    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }
}
