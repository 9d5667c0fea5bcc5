//! Configuration management for Spectral.
//!
//! Provides TOML-based configuration with XDG-compliant paths and
//! environment variable overrides.

use crate::error::{ConfigError, ConfigResult};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Default Dehashed search endpoint.
pub const DEFAULT_BREACH_ENDPOINT: &str = "https://api.dehashed.com/search";

/// Main application configuration.
///
/// This is loaded from `~/.config/spectral/config.toml` (or platform equivalent).
/// If the file doesn't exist, default values are used.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Scanning behavior settings
    pub scanning: ScanningConfig,
    /// Breach lookup (Dehashed) settings
    pub breach: BreachConfig,
}

impl AppConfig {
    /// Load configuration from disk, falling back to defaults if not found.
    ///
    /// # Errors
    /// Returns error if:
    /// - Config directory cannot be determined
    /// - File exists but cannot be read
    /// - File contents are not valid TOML
    pub fn load() -> ConfigResult<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            tracing::debug!("Loading config from {}", config_path.display());
            let contents = fs::read_to_string(&config_path)?;
            let config = toml::from_str(&contents)?;
            Ok(config)
        } else {
            tracing::debug!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load configuration with environment variable overrides.
    ///
    /// Supports the following environment variables:
    /// - `SPECTRAL_DEHASHED_EMAIL`: Dehashed account email
    /// - `SPECTRAL_DEHASHED_API_KEY`: Dehashed API key
    /// - `SPECTRAL_DEHASHED_MAX_PAGES`: Maximum number of pages to query
    /// - `SPECTRAL_USER_AGENT`: User agent sent with every request
    pub fn load_with_env() -> ConfigResult<Self> {
        let mut config = Self::load()?;
        config.apply_env_overrides(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    /// Apply overrides from an environment-like lookup.
    ///
    /// A non-numeric `SPECTRAL_DEHASHED_MAX_PAGES` is rejected rather than ignored.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> ConfigResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(email) = lookup("SPECTRAL_DEHASHED_EMAIL") {
            self.breach.email = email;
            tracing::debug!("Override breach.email from env");
        }

        if let Some(key) = lookup("SPECTRAL_DEHASHED_API_KEY") {
            self.breach.api_key = key;
            tracing::debug!("Override breach.api_key from env");
        }

        if let Some(val) = lookup("SPECTRAL_DEHASHED_MAX_PAGES") {
            let pages = val
                .trim()
                .parse::<u32>()
                .map_err(|e| ConfigError::InvalidValue {
                    field: "breach.max_pages".to_string(),
                    reason: format!("{val:?} is not a number: {e}"),
                })?;
            self.breach.max_pages = Some(pages);
            tracing::debug!("Override breach.max_pages from env: {}", pages);
        }

        if let Some(agent) = lookup("SPECTRAL_USER_AGENT") {
            tracing::debug!("Override scanning.user_agent from env: {}", agent);
            self.scanning.user_agent = agent;
        }

        Ok(())
    }

    /// Get the path to the configuration file.
    ///
    /// Uses XDG base directories: `~/.config/spectral/config.toml`
    pub fn config_path() -> ConfigResult<PathBuf> {
        let dirs =
            ProjectDirs::from("com", "spectral", "spectral").ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.config_dir().join("config.toml"))
    }
}

/// Scanning behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanningConfig {
    /// User agent string
    pub user_agent: String,
}

impl Default for ScanningConfig {
    fn default() -> Self {
        Self {
            user_agent: "Spectral/0.1.0 (+https://github.com/spectral-privacy/spectral)"
                .to_string(),
        }
    }
}

/// Dehashed breach lookup settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BreachConfig {
    /// Email of the Dehashed account
    pub email: String,
    /// Dehashed API key
    pub api_key: String,
    /// Maximum number of pages to query (required before a scan can run)
    pub max_pages: Option<u32>,
    /// Search endpoint
    pub endpoint: String,
}

impl BreachConfig {
    /// Return the configured page ceiling.
    ///
    /// # Errors
    /// Returns [`ConfigError::Missing`] when unset and
    /// [`ConfigError::InvalidValue`] when zero.
    pub fn page_ceiling(&self) -> ConfigResult<u32> {
        match self.max_pages {
            None => Err(ConfigError::Missing {
                field: "breach.max_pages".to_string(),
            }),
            Some(0) => Err(ConfigError::InvalidValue {
                field: "breach.max_pages".to_string(),
                reason: "must be a positive integer".to_string(),
            }),
            Some(pages) => Ok(pages),
        }
    }
}

impl Default for BreachConfig {
    fn default() -> Self {
        Self {
            email: String::new(),
            api_key: String::new(),
            max_pages: None,
            endpoint: DEFAULT_BREACH_ENDPOINT.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert!(config.scanning.user_agent.starts_with("Spectral/"));
        assert!(config.breach.email.is_empty());
        assert!(config.breach.api_key.is_empty());
        assert_eq!(config.breach.max_pages, None);
        assert_eq!(config.breach.endpoint, DEFAULT_BREACH_ENDPOINT);
    }

    #[test]
    fn test_config_serialization() {
        let mut config = AppConfig::default();
        config.breach.max_pages = Some(3);
        let toml_str = toml::to_string_pretty(&config).expect("serialize config");
        assert!(toml_str.contains("[scanning]"));
        assert!(toml_str.contains("[breach]"));

        let parsed: AppConfig = toml::from_str(&toml_str).expect("parse serialized config");
        assert_eq!(parsed.breach.max_pages, Some(3));
        assert_eq!(parsed.scanning.user_agent, config.scanning.user_agent);
    }

    #[test]
    fn test_config_file_load() {
        let tmp = TempDir::new().expect("create temp dir");
        let config_path = tmp.path().join("config.toml");

        let mut config = AppConfig::default();
        config.breach.email = "analyst@example.com".to_string();
        config.breach.max_pages = Some(5);

        let contents = toml::to_string_pretty(&config).expect("serialize config");
        fs::write(&config_path, contents).expect("write config file");

        let loaded_contents = fs::read_to_string(&config_path).expect("read config file");
        let loaded: AppConfig = toml::from_str(&loaded_contents).expect("parse loaded config");

        assert_eq!(loaded.breach.email, "analyst@example.com");
        assert_eq!(loaded.breach.max_pages, Some(5));
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("SPECTRAL_DEHASHED_EMAIL", "analyst@example.com"),
            ("SPECTRAL_DEHASHED_API_KEY", "secret"),
            ("SPECTRAL_DEHASHED_MAX_PAGES", "4"),
            ("SPECTRAL_USER_AGENT", "test-agent"),
        ]);

        let mut config = AppConfig::default();
        config
            .apply_env_overrides(|name| vars.get(name).map(ToString::to_string))
            .expect("apply overrides");

        assert_eq!(config.breach.email, "analyst@example.com");
        assert_eq!(config.breach.api_key, "secret");
        assert_eq!(config.breach.max_pages, Some(4));
        assert_eq!(config.scanning.user_agent, "test-agent");
    }

    #[test]
    fn test_env_override_rejects_non_numeric_pages() {
        let mut config = AppConfig::default();
        let result = config.apply_env_overrides(|name| {
            (name == "SPECTRAL_DEHASHED_MAX_PAGES").then(|| "many".to_string())
        });

        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
        assert_eq!(config.breach.max_pages, None);
    }

    #[test]
    fn test_page_ceiling() {
        let mut breach = BreachConfig::default();
        assert!(matches!(
            breach.page_ceiling(),
            Err(ConfigError::Missing { .. })
        ));

        breach.max_pages = Some(0);
        assert!(matches!(
            breach.page_ceiling(),
            Err(ConfigError::InvalidValue { .. })
        ));

        breach.max_pages = Some(2);
        assert_eq!(breach.page_ceiling().expect("valid ceiling"), 2);
    }

    #[test]
    fn test_partial_config() {
        let toml_str = r#"
[breach]
email = "analyst@example.com"
max_pages = 2
"#;

        let config: AppConfig = toml::from_str(toml_str).expect("parse partial config");
        assert_eq!(config.breach.email, "analyst@example.com");
        assert_eq!(config.breach.max_pages, Some(2));
        // These should be defaults
        assert_eq!(config.breach.endpoint, DEFAULT_BREACH_ENDPOINT);
        assert!(config.scanning.user_agent.starts_with("Spectral/"));
    }
}
