//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.brickyard.toml` files.

use crate::scout::transcript::{FileTranscriptStore, DEFAULT_HISTORY_LIMIT};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the configuration file looked up in the current directory.
pub const CONFIG_FILE: &str = ".brickyard.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Backend API settings.
    #[serde(default)]
    pub api: ApiConfig,

    /// Scout chat settings.
    #[serde(default)]
    pub chat: ChatConfig,
}

/// BrickyardBytes API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the REST backend.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Bearer token for authenticated endpoints.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            token: None,
            timeout_seconds: default_timeout(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:5050".to_string()
}

fn default_timeout() -> u64 {
    30
}

/// Scout chat settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Where the transcript is stored. Defaults to `~/.brickyard/`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transcript_path: Option<PathBuf>,

    /// Number of transcript messages kept.
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            transcript_path: None,
            history_limit: default_history_limit(),
        }
    }
}

fn default_history_limit() -> usize {
    DEFAULT_HISTORY_LIMIT
}

impl ChatConfig {
    /// Effective transcript location.
    pub fn transcript_path(&self) -> PathBuf {
        self.transcript_path
            .clone()
            .unwrap_or_else(FileTranscriptStore::default_path)
    }
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(CONFIG_FILE);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings, but only
    /// when they were actually given.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref base_url) = args.api_base {
            self.api.base_url = base_url.clone();
        }
        if let Some(ref token) = args.token {
            self.api.token = Some(token.clone());
        }
        if let Some(timeout) = args.timeout {
            self.api.timeout_seconds = timeout;
        }
        if let Some(ref transcript) = args.transcript {
            self.chat.transcript_path = Some(transcript.clone());
        }
    }

    /// Client settings derived from the API section.
    pub fn client_config(&self) -> crate::client::ClientConfig {
        crate::client::ClientConfig {
            base_url: self.api.base_url.clone(),
            token: self.api.token.clone(),
            timeout_seconds: self.api.timeout_seconds,
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.api.base_url, "http://localhost:5050");
        assert_eq!(config.api.timeout_seconds, 30);
        assert!(config.api.token.is_none());
        assert_eq!(config.chat.history_limit, 20);
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[api]
base_url = "https://brickyard.example.edu"
token = "abc123"

[chat]
transcript_path = "/tmp/scout.json"
history_limit = 10
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.api.base_url, "https://brickyard.example.edu");
        assert_eq!(config.api.token.as_deref(), Some("abc123"));
        assert_eq!(config.api.timeout_seconds, 30);
        assert_eq!(config.chat.transcript_path(), PathBuf::from("/tmp/scout.json"));
        assert_eq!(config.chat.history_limit, 10);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: Config = toml::from_str("[chat]\n").unwrap();
        assert_eq!(config.api.base_url, "http://localhost:5050");
        assert_eq!(config.chat.history_limit, 20);
        assert!(config
            .chat
            .transcript_path()
            .ends_with(".brickyard/hotspot_chat_history.json"));
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(toml_str.contains("[api]"));
        assert!(toml_str.contains("[chat]"));
        assert!(!toml_str.contains("token"));
    }
}
