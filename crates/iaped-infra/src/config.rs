//! Configuration loading for Iaped.
//!
//! The data directory holds the SQLite database and an optional
//! `config.toml` overriding the defaults in
//! [`iaped_types::config::AssistantConfig`]. The model backend API key is
//! taken from the environment only, never from the config file.

use std::path::{Path, PathBuf};

use secrecy::SecretString;
use tracing::debug;

use iaped_types::config::AssistantConfig;

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "IAPED_DATA_DIR";

/// Environment variable holding the model backend API key.
pub const API_KEY_ENV: &str = "IAPED_OPENAI_API_KEY";

/// Resolve the data directory: `$IAPED_DATA_DIR`, falling back to `~/.iaped`.
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".iaped")
}

/// Load the assistant configuration from `{data_dir}/config.toml`.
///
/// A missing file yields the defaults; a present but malformed file is an
/// error rather than a silent fallback.
pub fn load_config(data_dir: &Path) -> anyhow::Result<AssistantConfig> {
    let path = data_dir.join("config.toml");
    if !path.exists() {
        debug!(path = %path.display(), "No config file, using defaults");
        return Ok(AssistantConfig::default());
    }

    let raw = std::fs::read_to_string(&path)?;
    let config: AssistantConfig = toml::from_str(&raw)
        .map_err(|e| anyhow::anyhow!("invalid config at {}: {e}", path.display()))?;
    Ok(config)
}

/// Read the model backend API key from `$IAPED_OPENAI_API_KEY`.
pub fn api_key_from_env() -> Option<SecretString> {
    std::env::var(API_KEY_ENV)
        .ok()
        .filter(|key| !key.trim().is_empty())
        .map(SecretString::from)
}
