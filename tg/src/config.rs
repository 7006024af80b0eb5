//! TravelGPT configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main TravelGPT configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// LLM provider configuration
    pub llm: LlmConfig,

    /// Storage configuration
    pub store: StoreConfig,

    /// Log level override ("info", "debug", ...)
    #[serde(rename = "log-level")]
    pub log_level: Option<String>,
}

impl Config {
    /// Validate configuration before use
    ///
    /// Call this early in startup to fail fast with clear error messages.
    pub fn validate(&self) -> Result<()> {
        self.llm.validate()
    }

    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project-local config: .travelgpt.yml
        let local_config = PathBuf::from(".travelgpt.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // Try user config: ~/.config/travelgpt/travelgpt.yml
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("travelgpt").join("travelgpt.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        // No config file found, use defaults
        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

/// LLM provider configuration
///
/// The `provider` key selects the variant, so each provider carries its
/// own defaults and an unknown provider fails at deserialization time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "provider", rename_all = "lowercase")]
pub enum LlmConfig {
    Anthropic(AnthropicSettings),
    OpenAi(OpenAiSettings),
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self::Anthropic(AnthropicSettings::default())
    }
}

impl LlmConfig {
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Anthropic(settings) => settings.validate(),
            Self::OpenAi(settings) => settings.validate(),
        }
    }

    /// Model identifier, for logging
    pub fn model(&self) -> &str {
        match self {
            Self::Anthropic(settings) => &settings.model,
            Self::OpenAi(settings) => &settings.model,
        }
    }
}

/// Anthropic provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnthropicSettings {
    /// Model identifier
    pub model: String,

    /// Environment variable containing the API key
    #[serde(rename = "api-key-env")]
    pub api_key_env: String,

    /// API base URL
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Maximum tokens per response
    #[serde(rename = "max-tokens")]
    pub max_tokens: u32,

    /// Request timeout in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,
}

impl Default for AnthropicSettings {
    fn default() -> Self {
        Self {
            model: "claude-sonnet-4-20250514".to_string(),
            api_key_env: "ANTHROPIC_API_KEY".to_string(),
            base_url: "https://api.anthropic.com".to_string(),
            max_tokens: 8192,
            timeout_ms: 120_000,
        }
    }
}

impl AnthropicSettings {
    pub fn validate(&self) -> Result<()> {
        validate_settings("anthropic", &self.model, &self.api_key_env, self.max_tokens)
    }

    /// Read the API key from the configured environment variable
    pub fn get_api_key(&self) -> Result<String> {
        get_api_key(&self.api_key_env)
    }
}

/// OpenAI provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenAiSettings {
    /// Model identifier
    pub model: String,

    /// Environment variable containing the API key
    #[serde(rename = "api-key-env")]
    pub api_key_env: String,

    /// API base URL
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Maximum tokens per response
    #[serde(rename = "max-tokens")]
    pub max_tokens: u32,

    /// Request timeout in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,
}

impl Default for OpenAiSettings {
    fn default() -> Self {
        Self {
            model: "gpt-4o".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            base_url: "https://api.openai.com".to_string(),
            max_tokens: 8192,
            timeout_ms: 120_000,
        }
    }
}

impl OpenAiSettings {
    pub fn validate(&self) -> Result<()> {
        validate_settings("openai", &self.model, &self.api_key_env, self.max_tokens)
    }

    /// Read the API key from the configured environment variable
    pub fn get_api_key(&self) -> Result<String> {
        get_api_key(&self.api_key_env)
    }
}

fn validate_settings(provider: &str, model: &str, api_key_env: &str, max_tokens: u32) -> Result<()> {
    if model.is_empty() {
        return Err(eyre::eyre!("{} model must not be empty", provider));
    }
    if max_tokens == 0 {
        return Err(eyre::eyre!("{} max-tokens must be positive", provider));
    }
    if std::env::var(api_key_env).is_err() {
        return Err(eyre::eyre!(
            "LLM API key not found. Set the {} environment variable.",
            api_key_env
        ));
    }
    Ok(())
}

fn get_api_key(api_key_env: &str) -> Result<String> {
    std::env::var(api_key_env).context(format!("API key environment variable {} not set", api_key_env))
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Path to the SQLite database file
    #[serde(rename = "db-path")]
    pub db_path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        // Use XDG data directory (~/.local/share/travelgpt on Linux)
        let db_path = dirs::data_dir()
            .map(|d| d.join("travelgpt"))
            .unwrap_or_else(|| PathBuf::from(".travelgpt"))
            .join("travelgpt.db");

        Self { db_path }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert!(matches!(config.llm, LlmConfig::Anthropic(_)));
        assert!(config.llm.model().contains("claude"));
        assert!(config.store.db_path.ends_with("travelgpt.db"));
        assert_eq!(config.log_level, None);
    }

    #[test]
    fn test_deserialize_anthropic_config() {
        let yaml = r#"
llm:
  provider: anthropic
  model: claude-opus-4
  api-key-env: MY_API_KEY
  base-url: https://api.example.com
  max-tokens: 4096
  timeout-ms: 60000

store:
  db-path: /tmp/plans.db
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();

        let LlmConfig::Anthropic(settings) = config.llm else {
            panic!("expected anthropic variant");
        };
        assert_eq!(settings.model, "claude-opus-4");
        assert_eq!(settings.api_key_env, "MY_API_KEY");
        assert_eq!(settings.max_tokens, 4096);
        assert_eq!(config.store.db_path, PathBuf::from("/tmp/plans.db"));
    }

    #[test]
    fn test_deserialize_openai_config() {
        let yaml = r#"
llm:
  provider: openai
  model: gpt-4o-mini
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();

        let LlmConfig::OpenAi(settings) = config.llm else {
            panic!("expected openai variant");
        };
        assert_eq!(settings.model, "gpt-4o-mini");

        // Defaults for unspecified
        assert_eq!(settings.api_key_env, "OPENAI_API_KEY");
        assert_eq!(settings.base_url, "https://api.openai.com");
    }

    #[test]
    fn test_unknown_provider_rejected() {
        let yaml = r#"
llm:
  provider: cohere
  model: command-r
"#;

        assert!(serde_yaml::from_str::<Config>(yaml).is_err());
    }

    #[test]
    fn test_validate_rejects_empty_model() {
        let settings = AnthropicSettings {
            model: String::new(),
            ..AnthropicSettings::default()
        };
        assert!(settings.validate().is_err());
    }
}
