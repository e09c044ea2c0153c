/*!
 * Application configuration.
 *
 * Configuration is a plain JSON file; every field has a default so an
 * empty object is a valid config. The component configs (normalizer and
 * validator thresholds) live next to the components themselves and are
 * re-exported here only as fields.
 */

use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::language::LanguageCode;
use crate::normalize::NormalizerConfig;
use crate::validation::ValidatorConfig;

/// Top-level application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Language assumed when detection has nothing to go on
    #[serde(default = "default_language")]
    pub default_language: LanguageCode,

    /// Language answers are generated and validated in
    #[serde(default = "default_working_language")]
    pub working_language: LanguageCode,

    /// Translation service settings
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Response validation thresholds
    #[serde(default)]
    pub validation: ValidatorConfig,

    /// Normalizer thresholds
    #[serde(default)]
    pub normalizer: NormalizerConfig,

    /// Conversation history settings
    #[serde(default)]
    pub history: HistoryConfig,
}

/// Translation service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Base URL of the translation service
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// API key for hosted instances
    #[serde(default)]
    pub api_key: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Conversation history settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Path of the SQLite database file
    #[serde(default = "default_db_path")]
    pub db_path: String,
}

fn default_language() -> LanguageCode {
    LanguageCode::DEFAULT_REGIONAL
}

fn default_working_language() -> LanguageCode {
    LanguageCode::WORKING
}

fn default_endpoint() -> String {
    "http://localhost:5000".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_db_path() -> String {
    "kisanvaani.db".to_string()
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_language: default_language(),
            working_language: default_working_language(),
            provider: ProviderConfig::default(),
            validation: ValidatorConfig::default(),
            normalizer: NormalizerConfig::default(),
            history: HistoryConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;
        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path.as_ref()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(&path, content)
            .with_context(|| format!("Failed to write config file: {:?}", path.as_ref()))?;
        Ok(())
    }

    /// Validate the configuration for consistency
    pub fn validate(&self) -> Result<()> {
        if !self.working_language.is_working() {
            return Err(anyhow!(
                "Unsupported working language: {}",
                self.working_language
            ));
        }
        if self.provider.endpoint.is_empty() {
            return Err(anyhow!("Translation endpoint must not be empty"));
        }
        if self.provider.timeout_secs == 0 {
            return Err(anyhow!("Translation timeout must be positive"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default_shouldValidate() {
        let config = Config::default();

        assert!(config.validate().is_ok());
        assert_eq!(config.default_language, LanguageCode::Hi);
        assert_eq!(config.working_language, LanguageCode::En);
    }

    #[test]
    fn test_config_fromEmptyJson_shouldUseDefaults() {
        let config: Config = serde_json::from_str("{}").unwrap();

        assert_eq!(config.provider.endpoint, "http://localhost:5000");
        assert_eq!(config.provider.timeout_secs, 30);
        assert_eq!(config.history.db_path, "kisanvaani.db");
    }

    #[test]
    fn test_config_withNonEnglishWorkingLanguage_shouldFailValidation() {
        let config = Config {
            working_language: LanguageCode::Hi,
            ..Config::default()
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_roundTrip_shouldPreserveValues() {
        let mut config = Config::default();
        config.provider.api_key = Some("secret".to_string());

        let json = serde_json::to_string(&config).unwrap();
        let parsed: Config = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.provider.api_key.as_deref(), Some("secret"));
        assert_eq!(parsed.default_language, config.default_language);
    }
}
