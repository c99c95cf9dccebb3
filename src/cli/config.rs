//! Configuration management for AskBuddy
//!
//! Provides TOML-based configuration with defaults and validation.
//! Location: ~/.askbuddy/config.toml

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::errors::{AskError, Result};

/// Environment variable overriding the web search API key
pub const SERPAPI_KEY_ENV: &str = "ASKBUDDY_SERPAPI_KEY";

/// Environment variable overriding the weather API key
pub const WEATHER_KEY_ENV: &str = "ASKBUDDY_WEATHER_KEY";

/// Complete configuration for AskBuddy
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub store: StoreConfig,
    pub providers: ProvidersConfig,
    pub speech: SpeechConfig,
    pub telemetry: TelemetryConfig,
}

/// Response store location
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub path: String,
}

/// Shared provider settings plus one table per source
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvidersConfig {
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub retry_base_delay_ms: u64,
    pub user_agent: String,
    pub encyclopedia: EncyclopediaConfig,
    pub web_search: WebSearchConfig,
    pub instant_answer: InstantAnswerConfig,
    pub weather: WeatherConfig,
}

/// Wikipedia summary lookup
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EncyclopediaConfig {
    pub enabled: bool,
    pub base_url: String,
    pub max_sentences: usize,
}

/// SerpAPI organic search
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WebSearchConfig {
    pub enabled: bool,
    pub base_url: String,
    pub api_key: Option<String>,
    pub num_results: u32,
}

/// DuckDuckGo instant answers
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InstantAnswerConfig {
    pub enabled: bool,
    pub base_url: String,
}

/// weatherapi.com current conditions
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    pub base_url: String,
    pub api_key: Option<String>,
}

/// Text-to-speech and speech-to-text commands
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    pub enabled: bool,
    pub command: String,
    pub args: Vec<String>,
    pub listen_command: Option<String>,
    pub listen_args: Vec<String>,
    pub listen_timeout_secs: u64,
}

/// Logging and display configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    pub default_verbosity: String,
    pub color_output: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: "~/.askbuddy/responses.txt".to_string(),
        }
    }
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 8,
            max_retries: 1,
            retry_base_delay_ms: 250,
            user_agent: format!("askbuddy/{}", env!("CARGO_PKG_VERSION")),
            encyclopedia: EncyclopediaConfig::default(),
            web_search: WebSearchConfig::default(),
            instant_answer: InstantAnswerConfig::default(),
            weather: WeatherConfig::default(),
        }
    }
}

impl Default for EncyclopediaConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: "https://en.wikipedia.org".to_string(),
            max_sentences: 3,
        }
    }
}

impl Default for WebSearchConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: "https://serpapi.com".to_string(),
            api_key: None,
            num_results: 5,
        }
    }
}

impl Default for InstantAnswerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: "https://api.duckduckgo.com".to_string(),
        }
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            base_url: "http://api.weatherapi.com".to_string(),
            api_key: None,
        }
    }
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            command: "espeak".to_string(),
            args: Vec::new(),
            listen_command: None,
            listen_args: Vec::new(),
            listen_timeout_secs: 10,
        }
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            default_verbosity: "normal".to_string(),
            color_output: true,
        }
    }
}

impl ProvidersConfig {
    /// Per-request timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    /// Load configuration from file or use defaults, then apply env overrides
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        let mut config = if let Some(config_path) = path {
            Self::load_from_file(&config_path)?
        } else {
            Self::load_default()?
        };

        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from specific file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| AskError::ConfigError(format!("Failed to read config: {}", e)))?;

        let config: Config = toml::from_str(&contents)
            .map_err(|e| AskError::ConfigError(format!("Failed to parse config: {}", e)))?;

        Ok(config)
    }

    /// Load default configuration from standard location or use built-in defaults
    pub fn load_default() -> Result<Self> {
        if let Some(path) = Self::default_path() {
            if path.exists() {
                return Self::load_from_file(&path);
            }
        }

        Ok(Config::default())
    }

    /// Standard config file location
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".askbuddy").join("config.toml"))
    }

    /// Overlay API keys from the environment
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup(SERPAPI_KEY_ENV).filter(|k| !k.trim().is_empty()) {
            self.providers.web_search.api_key = Some(key);
        }
        if let Some(key) = lookup(WEATHER_KEY_ENV).filter(|k| !k.trim().is_empty()) {
            self.providers.weather.api_key = Some(key);
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.providers.timeout_secs == 0 {
            return Err(AskError::ConfigError(
                "providers.timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.providers.web_search.num_results == 0 {
            return Err(AskError::ConfigError(
                "providers.web_search.num_results must be greater than 0".to_string(),
            ));
        }

        if self.providers.encyclopedia.max_sentences == 0 {
            return Err(AskError::ConfigError(
                "providers.encyclopedia.max_sentences must be greater than 0".to_string(),
            ));
        }

        if self.store.path.trim().is_empty() {
            return Err(AskError::ConfigError("store.path must not be empty".to_string()));
        }

        match self.telemetry.default_verbosity.as_str() {
            "quiet" | "normal" | "verbose" | "very_verbose" => {}
            _ => {
                return Err(AskError::ConfigError(format!(
                    "Invalid verbosity level: {}",
                    self.telemetry.default_verbosity
                )))
            }
        }

        Ok(())
    }

    /// Render as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| AskError::ConfigError(format!("Failed to serialize config: {}", e)))
    }

    /// Copy with API keys masked, for display
    pub fn redacted(&self) -> Self {
        let mut config = self.clone();
        config.providers.web_search.api_key = config.providers.web_search.api_key.as_deref().map(mask_secret);
        config.providers.weather.api_key = config.providers.weather.api_key.as_deref().map(mask_secret);
        config
    }

    /// Expand tilde in paths
    pub fn expand_path(path: &str) -> PathBuf {
        if let Some(rest) = path.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(rest);
            }
        }
        PathBuf::from(path)
    }

    /// Response store file path
    pub fn store_path(&self) -> PathBuf {
        Self::expand_path(&self.store.path)
    }
}

/// Keep at most the last four characters of a secret
fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 8 {
        return "****".to_string();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("****{}", tail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.providers.timeout_secs, 8);
        assert_eq!(config.providers.web_search.num_results, 5);
        assert_eq!(config.providers.encyclopedia.max_sentences, 3);
        assert!(!config.speech.enabled);
    }

    #[test]
    fn test_config_validation_success() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_config_validation_zero_timeout() {
        let mut config = Config::default();
        config.providers.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_verbosity() {
        let mut config = Config::default();
        config.telemetry.default_verbosity = "invalid".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
            [providers]
            timeout_secs = 3

            [providers.weather]
            api_key = "abc"
            "#,
        )
        .unwrap();

        assert_eq!(config.providers.timeout_secs, 3);
        assert_eq!(config.providers.weather.api_key.as_deref(), Some("abc"));
        assert_eq!(config.providers.max_retries, 1);
        assert_eq!(config.store.path, "~/.askbuddy/responses.txt");
    }

    #[test]
    fn test_env_overrides_api_keys() {
        let mut config = Config::default();
        config.providers.weather.api_key = Some("from-file".to_string());

        config.apply_env_overrides(|key| match key {
            SERPAPI_KEY_ENV => Some("serp".to_string()),
            WEATHER_KEY_ENV => Some("  ".to_string()),
            _ => None,
        });

        assert_eq!(config.providers.web_search.api_key.as_deref(), Some("serp"));
        assert_eq!(config.providers.weather.api_key.as_deref(), Some("from-file"));
    }

    #[test]
    fn test_rendered_toml_loads_back() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");

        let mut config = Config::default();
        config.store.path = "/var/lib/askbuddy/responses.txt".to_string();
        std::fs::write(&path, config.to_toml().unwrap()).unwrap();

        let loaded = Config::load_from_file(&path).unwrap();
        assert_eq!(loaded.store_path(), PathBuf::from("/var/lib/askbuddy/responses.txt"));
    }

    #[test]
    fn test_redacted_masks_api_keys() {
        let mut config = Config::default();
        config.apply_env_overrides(|key| match key {
            SERPAPI_KEY_ENV => Some("serp-secret-1234".to_string()),
            WEATHER_KEY_ENV => Some("abc".to_string()),
            _ => None,
        });

        let rendered = config.redacted().to_toml().unwrap();
        assert!(!rendered.contains("serp-secret-1234"));
        assert!(!rendered.contains("\"abc\""));
        assert!(rendered.contains("****1234"));
        assert_eq!(config.providers.web_search.api_key.as_deref(), Some("serp-secret-1234"));
        assert!(Config::default().redacted().providers.weather.api_key.is_none());
    }

    #[test]
    fn test_expand_path_with_tilde() {
        let expanded = Config::expand_path("~/.askbuddy");
        assert!(!expanded.to_string_lossy().contains('~'));
    }

    #[test]
    fn test_expand_path_without_tilde() {
        let expanded = Config::expand_path("/absolute/path");
        assert_eq!(expanded.to_string_lossy(), "/absolute/path");
    }
}
