use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ResponderError, Result};
use crate::models::ModelFamily;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub models: ModelConfig,
    #[serde(default)]
    pub reply: ReplyConfig,
    #[serde(default)]
    pub escalation: EscalationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    #[serde(default = "default_model_dir")]
    pub dir: PathBuf,
    #[serde(default)]
    pub default_family: ModelFamily,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            dir: default_model_dir(),
            default_family: ModelFamily::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplyConfig {
    #[serde(default = "default_signature")]
    pub signature: String,
    #[serde(default = "default_excerpt_words")]
    pub excerpt_words: usize,
}

impl Default for ReplyConfig {
    fn default() -> Self {
        Self {
            signature: default_signature(),
            excerpt_words: default_excerpt_words(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EscalationConfig {
    #[serde(default = "default_recipient")]
    pub recipient: String,
    #[serde(default = "default_escalation_message")]
    pub message: String,
}

impl Default for EscalationConfig {
    fn default() -> Self {
        Self {
            recipient: default_recipient(),
            message: default_escalation_message(),
        }
    }
}

fn default_model_dir() -> PathBuf {
    PathBuf::from("models")
}

fn default_signature() -> String {
    "Admissions & Outreach Office".to_string()
}

fn default_excerpt_words() -> usize {
    12
}

fn default_recipient() -> String {
    "Head of Department (HOD)".to_string()
}

fn default_escalation_message() -> String {
    "This email will be forwarded to the Head of Department (HOD).".to_string()
}

impl Config {
    pub async fn load(path: &Path) -> Result<Self> {
        // If file doesn't exist, return default config with warning
        if !path.exists() {
            tracing::warn!("Config file not found at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| ResponderError::ConfigError(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content).map_err(|e| {
            ResponderError::ConfigError(format!("Failed to parse config file: {}", e))
        })?;

        config.validate()?;

        tracing::info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    pub async fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                ResponderError::ConfigError(format!("Failed to create config directory: {}", e))
            })?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| {
            ResponderError::ConfigError(format!("Failed to serialize config: {}", e))
        })?;

        tokio::fs::write(path, content)
            .await
            .map_err(|e| ResponderError::ConfigError(format!("Failed to write config file: {}", e)))?;

        tracing::info!("Saved configuration to {:?}", path);
        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.models.dir.as_os_str().is_empty() {
            return Err(ResponderError::ConfigError(
                "models.dir cannot be empty".to_string(),
            ));
        }

        if self.reply.signature.trim().is_empty() {
            return Err(ResponderError::ConfigError(
                "reply.signature cannot be empty".to_string(),
            ));
        }

        // Excerpts are quoted inline in the opening sentence
        if self.reply.excerpt_words == 0 {
            return Err(ResponderError::ConfigError(
                "reply.excerpt_words must be at least 1".to_string(),
            ));
        }
        if self.reply.excerpt_words > 64 {
            return Err(ResponderError::ConfigError(
                "reply.excerpt_words cannot exceed 64".to_string(),
            ));
        }

        if self.escalation.recipient.trim().is_empty() {
            return Err(ResponderError::ConfigError(
                "escalation.recipient cannot be empty".to_string(),
            ));
        }

        tracing::debug!("Configuration validation passed");
        Ok(())
    }

    /// Create an example configuration file
    pub async fn create_example(path: &Path) -> Result<()> {
        let config = Self::default();
        config.save(path).await
    }
}
