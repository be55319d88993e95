use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} is required")]
    MissingCredential(&'static str),
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub anthropic: AnthropicConfig,
    #[serde(default)]
    pub hackmd: HackmdConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AnthropicConfig {
    pub api_key: String,
    pub model: String,
    pub max_tokens: u32,
    pub system_prompt: String,
    pub endpoint: String,
    pub api_version: String,
}

impl Default for AnthropicConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: "claude-3-haiku-20240307".to_string(),
            max_tokens: 1024,
            system_prompt: "You are a helpful agent for managing HackMD notes.".to_string(),
            endpoint: "https://api.anthropic.com".to_string(),
            api_version: "2023-06-01".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct HackmdConfig {
    pub api_token: String,
    pub endpoint: String,
}

impl Default for HackmdConfig {
    fn default() -> Self {
        Self {
            api_token: String::new(),
            endpoint: "https://api.hackmd.io/v1".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from an optional TOML file, then apply environment
    /// overrides and check that both credentials are present.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
                path: path.display().to_string(),
                source,
            })?;
            toml::from_str(&content)?
        } else {
            log::debug!("No config file at {}, using defaults", path.display());
            Config::default()
        };

        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Override file values with environment variables, when set.
    fn apply_env<F>(&mut self, var: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = var("ANTHROPIC_API_KEY") {
            self.anthropic.api_key = key;
        }
        if let Some(token) = var("HACKMD_API_TOKEN") {
            self.hackmd.api_token = token;
        }
        if let Some(model) = var("ANTHROPIC_MODEL") {
            self.anthropic.model = model;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.anthropic.api_key.trim().is_empty() {
            return Err(ConfigError::MissingCredential("ANTHROPIC_API_KEY"));
        }
        if self.hackmd.api_token.trim().is_empty() {
            return Err(ConfigError::MissingCredential("HACKMD_API_TOKEN"));
        }
        Ok(())
    }
}
