//! proposalwriter configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::generator::ExtractionMode;

/// Main proposalwriter configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[serde(rename = "log-level")]
    pub log_level: Option<String>,

    /// LLM provider configuration
    pub llm: LlmConfig,

    /// Proposal generation settings
    pub generator: GeneratorConfig,

    /// HTTP server settings
    pub server: ServerConfig,

    /// Prompt and template overrides
    pub prompts: PromptsConfig,
}

impl Config {
    /// Validate configuration before use
    ///
    /// Only commands that call the LLM need this; `prompt`, `render` and
    /// `sample` work without an API key.
    pub fn validate(&self) -> Result<()> {
        if std::env::var(&self.llm.api_key_env).is_err() {
            return Err(eyre::eyre!(
                "LLM API key not found. Set the {} environment variable.",
                self.llm.api_key_env
            ));
        }
        Ok(())
    }

    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Project-local config: .proposalwriter.yml
        let local_config = PathBuf::from(".proposalwriter.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // User config: ~/.config/proposalwriter/proposalwriter.yml
        if let Some(user_config) = user_config_path()
            && user_config.exists()
        {
            match Self::load_from_file(&user_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                }
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Read just the log level, before logging is initialized
    ///
    /// Errors are swallowed; the full load reports them once logging is up.
    pub fn load_log_level(config_path: Option<&PathBuf>) -> Option<String> {
        let candidates = [
            config_path.cloned(),
            Some(PathBuf::from(".proposalwriter.yml")),
            user_config_path(),
        ];

        candidates
            .into_iter()
            .flatten()
            .find(|p| p.exists())
            .and_then(|p| Self::load_from_file(p).ok())
            .and_then(|c| c.log_level)
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("proposalwriter").join("proposalwriter.yml"))
}

/// LLM provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Provider name (currently only "anthropic" supported)
    pub provider: String,

    /// Model identifier
    pub model: String,

    /// Environment variable containing the API key
    #[serde(rename = "api-key-env")]
    pub api_key_env: String,

    /// API base URL
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Upper bound on max_tokens for any request
    #[serde(rename = "max-tokens")]
    pub max_tokens: u32,

    /// Request timeout in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,

    /// Extra attempts on transient upstream failures (0 = single attempt)
    #[serde(rename = "max-retries")]
    pub max_retries: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "anthropic".to_string(),
            model: "claude-sonnet-4-20250514".to_string(),
            api_key_env: "ANTHROPIC_API_KEY".to_string(),
            base_url: "https://api.anthropic.com".to_string(),
            max_tokens: 8192,
            timeout_ms: 300_000,
            max_retries: 0,
        }
    }
}

impl LlmConfig {
    /// Read the API key from the configured environment variable
    pub fn get_api_key(&self) -> Result<String> {
        let key = std::env::var(&self.api_key_env)
            .map_err(|_| eyre::eyre!("Environment variable {} is not set", self.api_key_env))?;
        if key.trim().is_empty() {
            return Err(eyre::eyre!("Environment variable {} is empty", self.api_key_env));
        }
        Ok(key)
    }
}

/// Proposal generation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// max_tokens sent with each generation request
    #[serde(rename = "max-tokens")]
    pub max_tokens: u32,

    /// How the JSON object is located in the model's reply
    pub extraction: ExtractionMode,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            max_tokens: 4096,
            extraction: ExtractionMode::Greedy,
        }
    }
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind
    pub bind: String,

    /// Port to listen on
    pub port: u16,

    /// Allowed CORS origins; empty allows any origin
    #[serde(rename = "cors-origins")]
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".to_string(),
            port: 3000,
            cors_origins: vec![],
        }
    }
}

/// Prompt and template overrides
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptsConfig {
    /// File replacing the built-in persona directive
    #[serde(rename = "system-file")]
    pub system_file: Option<PathBuf>,

    /// File replacing the built-in Markdown preview template
    #[serde(rename = "preview-template")]
    pub preview_template: Option<PathBuf>,
}
