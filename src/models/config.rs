//! Configuration model.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Media server connection.
    pub emby: EmbyConfig,
    /// TMDB configuration.
    pub tmdb: TmdbConfig,
    /// Sync schedule.
    pub sync: SyncConfig,
    /// Telegram notification channel.
    pub telegram: TelegramConfig,
    /// Directory holding persisted state.
    pub data_dir: PathBuf,
}

/// Emby/Jellyfin server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbyConfig {
    /// Server base URL.
    pub server_url: String,
    /// API key.
    pub api_key: Option<String>,
    /// Restrict the catalog to one library.
    pub library_id: Option<String>,
}

/// TMDB configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TmdbConfig {
    /// API key or Bearer token (JWT).
    pub api_key: Option<String>,
    /// API base URL, overridable for proxies.
    pub base_url: String,
    /// Language for responses.
    pub language: String,
}

/// Sync schedule configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Minutes between sync cycles.
    pub interval_minutes: u32,
}

/// Telegram bot configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TelegramConfig {
    pub bot_token: Option<String>,
    pub chat_id: Option<String>,
}

impl EmbyConfig {
    /// Server URL without trailing slash.
    pub fn base_url(&self) -> &str {
        self.server_url.trim_end_matches('/')
    }

    pub fn is_configured(&self) -> bool {
        !self.server_url.is_empty() && self.api_key.as_deref().is_some_and(|k| !k.is_empty())
    }
}

impl TelegramConfig {
    pub fn is_configured(&self) -> bool {
        self.bot_token.as_deref().is_some_and(|t| !t.is_empty())
            && self.chat_id.as_deref().is_some_and(|c| !c.is_empty())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            emby: EmbyConfig::default(),
            tmdb: TmdbConfig::default(),
            sync: SyncConfig::default(),
            telegram: TelegramConfig {
                bot_token: env_var("TELEGRAM_BOT_TOKEN"),
                chat_id: env_var("TELEGRAM_CHAT_ID"),
            },
            data_dir: env_var("STREAMHUB_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| dirs_config_path().join("data")),
        }
    }
}

impl Default for EmbyConfig {
    fn default() -> Self {
        Self {
            server_url: env_var("EMBY_SERVER_URL").unwrap_or_default(),
            api_key: env_var("EMBY_API_KEY"),
            library_id: env_var("EMBY_LIBRARY_ID"),
        }
    }
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            api_key: env_var("TMDB_API_KEY"),
            base_url: env_var("TMDB_BASE_URL")
                .unwrap_or_else(|| "https://api.themoviedb.org/3".to_string()),
            language: "zh-CN".to_string(),
        }
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            interval_minutes: 60,
        }
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

/// Get the configuration directory path.
fn dirs_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("streamhub")
}

/// Load configuration from file.
pub fn load_config() -> Config {
    let config_path = dirs_config_path().join("config.toml");

    if config_path.exists() {
        match std::fs::read_to_string(&config_path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(config) => return config,
                Err(e) => {
                    tracing::warn!("Ignoring malformed {}: {}", config_path.display(), e);
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read {}: {}", config_path.display(), e);
            }
        }
    }

    Config::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
            [emby]
            server_url = "http://emby.local:8096/"
            api_key = "k"

            [sync]
            interval_minutes = 15
            "#,
        )
        .unwrap();
        assert_eq!(config.emby.base_url(), "http://emby.local:8096");
        assert!(config.emby.is_configured());
        assert_eq!(config.sync.interval_minutes, 15);
        assert_eq!(config.tmdb.language, "zh-CN");
    }

    #[test]
    fn test_telegram_requires_both_fields() {
        let telegram = TelegramConfig {
            bot_token: Some("t".to_string()),
            chat_id: None,
        };
        assert!(!telegram.is_configured());
    }
}
