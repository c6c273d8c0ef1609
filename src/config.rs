use crate::fetcher::yahoo::DEFAULT_BASE_URL;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::info;

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceConfig {
    Yahoo {
        #[serde(default = "default_base_url")]
        base_url: String,
        #[serde(default = "default_timeout_seconds")]
        timeout_seconds: u64,
    },
    Csv {
        dir: String,
    },
}

impl Default for SourceConfig {
    fn default() -> Self {
        SourceConfig::Yahoo {
            base_url: default_base_url(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub chat_id: i64,
    #[serde(default = "default_poll_interval_seconds")]
    pub poll_interval_seconds: u64,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Lookback range, e.g. `1y` or `6mo`.
    pub period: String,
    /// Default threshold multiplier, 1 to 10.
    pub threshold: u8,
    pub source: SourceConfig,
    pub last_ticker_path: String,
    pub telegram: Option<TelegramConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            period: "1y".to_string(),
            threshold: 2,
            source: SourceConfig::default(),
            last_ticker_path: "last_ticker.txt".to_string(),
            telegram: None,
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_seconds() -> u64 {
    15
}

fn default_poll_interval_seconds() -> u64 {
    1
}

/// Loads `path`, or the defaults when the file does not exist.
pub fn load_config(path: &str) -> Result<AppConfig, Box<dyn std::error::Error>> {
    if !Path::new(path).exists() {
        info!("No {} found, using defaults", path);
        return Ok(AppConfig::default());
    }
    let content = fs::read_to_string(path)?;
    let config: AppConfig = serde_json::from_str(&content)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn empty_object_is_all_defaults() {
        let config: AppConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.period, "1y");
        assert_eq!(config.threshold, 2);
    }

    #[test]
    fn csv_source_and_telegram() {
        let json = r#"{
            "period": "6mo",
            "threshold": 3,
            "source": { "kind": "csv", "dir": "data" },
            "telegram": { "bot_token": "123:abc", "chat_id": 42 }
        }"#;
        let config: AppConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.source, SourceConfig::Csv { dir: "data".into() });
        let telegram = config.telegram.unwrap();
        assert_eq!(telegram.chat_id, 42);
        assert_eq!(telegram.poll_interval_seconds, 1);
        assert_eq!(config.last_ticker_path, "last_ticker.txt");
    }

    #[test]
    fn yahoo_source_fills_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{ "source": { "kind": "yahoo", "timeout_seconds": 5 } }"#).unwrap();
        assert_eq!(
            config.source,
            SourceConfig::Yahoo {
                base_url: DEFAULT_BASE_URL.into(),
                timeout_seconds: 5
            }
        );
    }

    #[test]
    fn missing_file_gives_defaults_and_bad_json_fails() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("config.json");
        assert_eq!(
            load_config(missing.to_str().unwrap()).unwrap(),
            AppConfig::default()
        );

        fs::write(&missing, "{ not json").unwrap();
        assert!(load_config(missing.to_str().unwrap()).is_err());
    }
}
