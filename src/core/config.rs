use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

use crate::core::conversion::ConversionRequest;

pub const DEFAULT_BASE_URL: &str = "https://v6.exchangerate-api.com";

/// Access key baked in at build time, used when the config carries none.
const BUILD_API_KEY: Option<&str> = option_env!("FXCONV_API_KEY");

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProviderConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl Default for ProviderConfig {
    fn default() -> Self {
        ProviderConfig {
            base_url: default_base_url(),
            api_key: None,
        }
    }
}

impl ProviderConfig {
    pub fn resolved_api_key(&self) -> Option<String> {
        self.api_key
            .as_deref()
            .into_iter()
            .chain(BUILD_API_KEY)
            .find(|k| !k.trim().is_empty())
            .map(str::to_string)
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct DefaultsConfig {
    pub from: String,
    pub to: String,
    pub amount: f64,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        DefaultsConfig {
            from: "USD".to_string(),
            to: "INR".to_string(),
            amount: 1.0,
        }
    }
}

impl DefaultsConfig {
    pub fn to_request(&self) -> ConversionRequest {
        ConversionRequest {
            base_currency: self.from.to_ascii_uppercase(),
            target_currency: self.to.to_ascii_uppercase(),
            amount: self.amount,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

impl AppConfig {
    /// Loads the config from the default location, falling back to built-in
    /// defaults when no file exists there.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!("No config at {}, using defaults", config_path.display());
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("io", "fxconv", "fxconv")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_deserialization() {
        let yaml_str = r#"
provider:
  base_url: "http://example.com/rates"
  api_key: "secret"
defaults:
  from: "eur"
  to: "GBP"
  amount: 25.5
"#;

        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(config.provider.base_url, "http://example.com/rates");
        assert_eq!(config.provider.resolved_api_key().as_deref(), Some("secret"));

        let request = config.defaults.to_request();
        assert_eq!(request.base_currency, "EUR");
        assert_eq!(request.target_currency, "GBP");
        assert_eq!(request.amount, 25.5);
    }

    #[test]
    fn test_config_defaults() {
        let config: AppConfig = serde_yaml::from_str("defaults:\n  to: JPY\n").unwrap();
        assert_eq!(config.provider.base_url, DEFAULT_BASE_URL);
        assert!(config.provider.api_key.is_none());
        assert_eq!(config.defaults.from, "USD");
        assert_eq!(config.defaults.to, "JPY");
        assert_eq!(config.defaults.amount, 1.0);

        let config = AppConfig::default();
        assert_eq!(config.defaults.to_request().target_currency, "INR");
    }

    #[test]
    fn test_blank_api_key_is_ignored() {
        let provider = ProviderConfig {
            base_url: default_base_url(),
            api_key: Some("  ".to_string()),
        };
        let expected = BUILD_API_KEY
            .filter(|k| !k.trim().is_empty())
            .map(str::to_string);
        assert_eq!(provider.resolved_api_key(), expected);
    }

    #[test]
    fn test_load_from_missing_path_fails() {
        let dir = tempfile::TempDir::new().unwrap();
        let result = AppConfig::load_from_path(dir.path().join("missing.yaml"));
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to read config file")
        );
    }
}
