use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::models;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PubseekConfig {
    #[serde(default)]
    pub webhook: WebhookConfig,

    #[serde(default)]
    pub search: SearchDefaults,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookConfig {
    /// Endpoint URL of the external search webhook. There is no built-in
    /// default endpoint; deployments must set this before the first search.
    #[serde(default)]
    pub url: String,

    /// Request timeout. A hung request fails after this instead of leaving
    /// the form disabled indefinitely.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchDefaults {
    #[serde(default = "default_limit")]
    pub default_limit: u32,

    #[serde(default = "default_min_year")]
    pub min_year: u16,
}

fn default_timeout() -> u64 {
    30
}
fn default_limit() -> u32 {
    models::DEFAULT_LIMIT
}
fn default_min_year() -> u16 {
    models::MIN_YEAR
}

impl Default for PubseekConfig {
    fn default() -> Self {
        Self {
            webhook: WebhookConfig::default(),
            search: SearchDefaults::default(),
        }
    }
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            timeout_secs: default_timeout(),
        }
    }
}

impl Default for SearchDefaults {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
            min_year: default_min_year(),
        }
    }
}

impl PubseekConfig {
    /// Load config from ~/.config/pubseek/config.toml, creating defaults if missing.
    pub fn load() -> crate::error::Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(|e| {
                crate::error::PubseekError::Config(format!("Failed to read config: {e}"))
            })?;
            let config: PubseekConfig = toml::from_str(&contents).map_err(|e| {
                crate::error::PubseekError::Config(format!("Failed to parse config: {e}"))
            })?;
            Ok(config)
        } else {
            let config = PubseekConfig::default();
            config.save()?;
            Ok(config)
        }
    }

    /// Save config to disk.
    pub fn save(&self) -> crate::error::Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self).map_err(|e| {
            crate::error::PubseekError::Config(format!("Failed to serialize config: {e}"))
        })?;
        std::fs::write(&config_path, contents)?;
        Ok(())
    }

    /// Get the config file path.
    pub fn config_path() -> crate::error::Result<PathBuf> {
        let config_dir = dirs::config_dir().ok_or_else(|| {
            crate::error::PubseekError::Config("Could not determine config directory".into())
        })?;
        Ok(config_dir.join("pubseek").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = PubseekConfig::default();
        assert!(config.webhook.url.is_empty());
        assert_eq!(config.webhook.timeout_secs, 30);
        assert_eq!(config.search.default_limit, 10);
        assert_eq!(config.search.min_year, 1900);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config: PubseekConfig = toml::from_str(
            r#"
            [webhook]
            url = "https://n8n.example.org/webhook/pubsearch"
            "#,
        )
        .unwrap();
        assert_eq!(config.webhook.url, "https://n8n.example.org/webhook/pubsearch");
        assert_eq!(config.webhook.timeout_secs, 30);
        assert_eq!(config.search.default_limit, 10);
    }

    #[test]
    fn toml_round_trip() {
        let mut config = PubseekConfig::default();
        config.webhook.url = "https://hooks.example.org/search".to_string();
        config.webhook.timeout_secs = 10;

        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: PubseekConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed.webhook.url, config.webhook.url);
        assert_eq!(parsed.webhook.timeout_secs, 10);
    }
}
