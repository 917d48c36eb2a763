use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tadka_feed_core::Bucket;
use tracing::warn;

const CONFIG_FILE: &str = "~/.tadka-feed.json";

/// Settings remembered between runs: the last tab, the highlighted row and
/// where the feeds live.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct FeedConfig {
    pub bucket: Bucket,
    pub selected: usize,
    pub timezone: Option<String>,
    pub sources: Vec<String>,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            bucket: Bucket::Latest,
            selected: 0,
            timezone: None,
            sources: Vec::new(),
        }
    }
}

pub fn get_config_path() -> PathBuf {
    PathBuf::from(shellexpand::tilde(CONFIG_FILE).as_ref())
}

pub fn load_config_from(path: &Path) -> Result<FeedConfig> {
    if path.exists() {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config: FeedConfig = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;
        Ok(config)
    } else {
        Ok(FeedConfig::default())
    }
}

pub fn save_config_to(config: &FeedConfig, path: &Path) -> Result<()> {
    let content = serde_json::to_string_pretty(config)?;
    fs::write(path, content)
        .with_context(|| format!("Failed to write config: {}", path.display()))?;
    Ok(())
}

/// A config together with whether it may be written back. A file that
/// failed to load is never overwritten.
#[derive(Debug)]
pub struct LoadedConfig {
    pub config: FeedConfig,
    writable: bool,
}

impl LoadedConfig {
    pub fn load() -> Self {
        Self::load_from(&get_config_path())
    }

    pub fn load_from(path: &Path) -> Self {
        match load_config_from(path) {
            Ok(config) => Self {
                config,
                writable: true,
            },
            Err(e) => {
                warn!(error = %e, "could not load config, using defaults and leaving the file untouched");
                Self {
                    config: FeedConfig::default(),
                    writable: false,
                }
            }
        }
    }

    pub fn is_writable(&self) -> bool {
        self.writable
    }

    pub fn save(&self) -> Result<bool> {
        self.save_to(&get_config_path())
    }

    /// Returns whether anything was written.
    pub fn save_to(&self, path: &Path) -> Result<bool> {
        if !self.writable {
            return Ok(false);
        }
        save_config_to(&self.config, path)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_config_falls_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        let config = load_config_from(&dir.path().join("absent.json")).unwrap();
        assert_eq!(config, FeedConfig::default());
    }

    #[test]
    fn test_config_round_trips_through_disk() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        let config = FeedConfig {
            bucket: Bucket::ThisWeek,
            selected: 4,
            timezone: Some("Asia/Kolkata".to_string()),
            sources: vec!["/srv/feeds/primary.json".to_string()],
        };

        save_config_to(&config, &path).unwrap();
        assert_eq!(load_config_from(&path).unwrap(), config);
    }

    #[test]
    fn test_partial_config_uses_defaults_for_missing_keys() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"bucket": "last30Days"}"#).unwrap();

        let config = load_config_from(&path).unwrap();
        assert_eq!(config.bucket, Bucket::Last30Days);
        assert_eq!(config.selected, 0);
        assert!(config.sources.is_empty());
    }

    #[test]
    fn test_unknown_bucket_in_config_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"bucket": "forever"}"#).unwrap();

        assert!(load_config_from(&path).is_err());
    }

    #[test]
    fn test_unreadable_config_is_not_overwritten() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();

        let mut loaded = LoadedConfig::load_from(&path);
        assert!(!loaded.is_writable());
        assert_eq!(loaded.config, FeedConfig::default());

        loaded.config.bucket = Bucket::Today;
        assert!(!loaded.save_to(&path).unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), "{ not json");
    }

    #[test]
    fn test_loaded_config_saves_back() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");

        let mut loaded = LoadedConfig::load_from(&path);
        assert!(loaded.is_writable());

        loaded.config.bucket = Bucket::Upcoming;
        assert!(loaded.save_to(&path).unwrap());
        assert_eq!(load_config_from(&path).unwrap().bucket, Bucket::Upcoming);
    }
}
