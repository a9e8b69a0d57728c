//! Configuration handling for the booking TUI

use crate::scheduling::DEFAULT_BASE_URL;
use crate::workflow::LocalZone;
use anyhow::{bail, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable that overrides the scheduling service URL
pub const API_URL_ENV: &str = "VET_BOOKING_API_URL";

const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// User configuration for the TUI
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct BookingConfig {
    /// Scheduling service base URL
    pub api_base_url: Option<String>,
    /// File holding the bearer token written by the sign-in tool
    pub token_path: Option<PathBuf>,
    /// Per-request timeout
    pub request_timeout_secs: Option<u64>,
    /// IANA zone for entered times, e.g. `America/New_York`
    pub time_zone: Option<String>,
    /// Fixed UTC offset for entered times; the system zone when unset
    pub utc_offset_minutes: Option<i32>,
}

impl BookingConfig {
    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("io", "petbooking", "vet-booking-tui")
    }

    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Load configuration from the platform config directory
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from `path`, defaulting when the file is absent
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        let config: BookingConfig = serde_json::from_str(&content)?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Save configuration to file
    #[allow(dead_code)]
    pub fn save(&self) -> Result<()> {
        if let Some(path) = Self::config_path() {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            let content = serde_json::to_string_pretty(self)?;
            fs::write(&path, content)?;
        }
        Ok(())
    }

    /// Base URL after applying the environment override
    pub fn api_base_url(&self) -> String {
        self.api_base_url_with(std::env::var(API_URL_ENV).ok())
    }

    fn api_base_url_with(&self, env_override: Option<String>) -> String {
        env_override
            .filter(|url| !url.trim().is_empty())
            .or_else(|| self.api_base_url.clone())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
    }

    /// Token file location, if one can be determined
    pub fn token_path(&self) -> Option<PathBuf> {
        self.token_path
            .clone()
            .or_else(|| Self::project_dirs().map(|dirs| dirs.data_dir().join("token")))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }

    /// Zone used to interpret entered appointment times
    pub fn local_zone(&self) -> Result<LocalZone> {
        if let Some(name) = &self.time_zone {
            return match LocalZone::from_name(name) {
                Some(zone) => Ok(zone),
                None => bail!("unknown time_zone: {name}"),
            };
        }
        match self.utc_offset_minutes {
            None => Ok(LocalZone::System),
            Some(minutes) => match LocalZone::from_offset_minutes(minutes) {
                Some(zone) => Ok(zone),
                None => bail!("utc_offset_minutes out of range: {minutes}"),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BookingConfig::default();
        assert!(config.api_base_url.is_none());
        assert!(config.token_path.is_none());
        assert!(config.request_timeout_secs.is_none());
        assert!(config.time_zone.is_none());
        assert!(config.utc_offset_minutes.is_none());
        assert_eq!(config.request_timeout(), Duration::from_secs(15));
        assert_eq!(config.local_zone().unwrap(), LocalZone::System);
    }

    #[test]
    fn test_serialization() {
        let config = BookingConfig {
            api_base_url: Some("http://localhost:3000".to_string()),
            token_path: Some(PathBuf::from("/tmp/token")),
            request_timeout_secs: Some(5),
            time_zone: Some("Asia/Ho_Chi_Minh".to_string()),
            utc_offset_minutes: Some(420),
        };

        let json = serde_json::to_string(&config).unwrap();
        let parsed: BookingConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_deserialize_with_extra_fields() {
        // Should ignore unknown fields
        let json = r#"{"request_timeout_secs": 30, "unknown_field": "value"}"#;
        let parsed: BookingConfig = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_base_url_precedence() {
        let config = BookingConfig::default();
        assert_eq!(config.api_base_url_with(None), DEFAULT_BASE_URL);

        let config = BookingConfig {
            api_base_url: Some("http://file".to_string()),
            ..Default::default()
        };
        assert_eq!(config.api_base_url_with(None), "http://file");
        assert_eq!(
            config.api_base_url_with(Some("http://env".to_string())),
            "http://env"
        );
        assert_eq!(
            config.api_base_url_with(Some("  ".to_string())),
            "http://file"
        );
    }

    #[test]
    fn test_explicit_token_path_wins() {
        let config = BookingConfig {
            token_path: Some(PathBuf::from("/run/token")),
            ..Default::default()
        };
        assert_eq!(config.token_path(), Some(PathBuf::from("/run/token")));
    }

    #[test]
    fn test_local_zone_from_offset() {
        let config = BookingConfig {
            utc_offset_minutes: Some(-300),
            ..Default::default()
        };
        assert_eq!(
            config.local_zone().unwrap(),
            LocalZone::from_offset_minutes(-300).unwrap()
        );

        let config = BookingConfig {
            utc_offset_minutes: Some(100_000),
            ..Default::default()
        };
        assert!(config.local_zone().is_err());
    }

    #[test]
    fn test_named_zone_wins_over_offset() {
        let config = BookingConfig {
            time_zone: Some("America/New_York".to_string()),
            utc_offset_minutes: Some(420),
            ..Default::default()
        };
        assert_eq!(
            config.local_zone().unwrap(),
            LocalZone::from_name("America/New_York").unwrap()
        );

        let config = BookingConfig {
            time_zone: Some("Nowhere/Special".to_string()),
            ..Default::default()
        };
        assert!(config.local_zone().is_err());
    }

    #[test]
    fn test_load_from_missing_file_is_default() {
        let path = std::env::temp_dir().join(format!("vet-booking-missing-{}.json", uuid::Uuid::new_v4()));
        assert_eq!(BookingConfig::load_from(&path).unwrap(), BookingConfig::default());
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("vet-booking-config-{}.json", uuid::Uuid::new_v4()));
        fs::write(&path, r#"{"api_base_url": "http://localhost:9"}"#).unwrap();
        let config = BookingConfig::load_from(&path).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(config.api_base_url.as_deref(), Some("http://localhost:9"));
    }

    #[test]
    fn test_load_from_invalid_json_fails() {
        let path = std::env::temp_dir().join(format!("vet-booking-bad-{}.json", uuid::Uuid::new_v4()));
        fs::write(&path, "not json").unwrap();
        let result = BookingConfig::load_from(&path);
        fs::remove_file(&path).unwrap();
        assert!(result.is_err());
    }
}
