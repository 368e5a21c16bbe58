//! Configuration loading.
//!
//! Reads [`AppConfig`] from the TOML file at the default config path. A
//! missing or empty file yields the defaults; a file that exists but cannot
//! be parsed is an error, so a typo never silently reverts settings.

use std::path::Path;

use anyhow::{Context, Result};
use fabula_core::AppConfig;

use crate::paths::FabulaPaths;

/// Loads the configuration from the default location.
pub fn load_config() -> Result<AppConfig> {
    let config_path = FabulaPaths::config_file()
        .map_err(|e| anyhow::anyhow!("Failed to resolve config path: {}", e))?;
    load_config_from(&config_path)
}

/// Loads the configuration from a specific file.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        return Ok(AppConfig::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file at {:?}", path))?;

    if content.trim().is_empty() {
        return Ok(AppConfig::default());
    }

    toml::from_str(&content).with_context(|| format!("Failed to parse config file at {:?}", path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_missing_file_yields_defaults() {
        let config = load_config_from(Path::new("/nonexistent/config.toml")).unwrap();
        assert_eq!(config.ollama.model, "llama3.2");
    }

    #[test]
    fn test_empty_file_yields_defaults() {
        let file = NamedTempFile::new().unwrap();
        let config = load_config_from(file.path()).unwrap();
        assert_eq!(config.store.lock_timeout_ms, 5_000);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
data_dir = "/tmp/fabula-test"

[ollama]
model = "mistral"
"#
        )
        .unwrap();
        file.flush().unwrap();

        let config = load_config_from(file.path()).unwrap();
        assert_eq!(config.data_dir.as_deref(), Some(Path::new("/tmp/fabula-test")));
        assert_eq!(config.ollama.model, "mistral");
        assert_eq!(config.ollama.word_count, 150);
        assert_eq!(config.store.lock_timeout_ms, 5_000);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "this is not toml [").unwrap();
        file.flush().unwrap();

        assert!(load_config_from(file.path()).is_err());
    }
}
