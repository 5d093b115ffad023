//! Suggestion-service configuration.
//!
//! Settings come from an optional TOML file; the API credential comes from
//! the environment (`OPENAI_API_KEY` or `ANTHROPIC_API_KEY`, loadable from a
//! `.env` file). A missing credential is not an error: it simply disables the
//! suggestion path and the engine plays on the local heuristic alone.

use crate::suggest::{Provider, ProviderConfig};
use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, instrument};

/// Settings for the move suggestion service.
#[derive(Debug, Clone, Getters, Serialize, Deserialize)]
pub struct Settings {
    /// LLM provider (openai or anthropic).
    #[serde(default = "default_provider")]
    provider: Provider,

    /// Model name (e.g., "gpt-4o-mini", "claude-3-5-haiku-20241022").
    #[serde(default = "default_model")]
    model: String,

    /// Maximum tokens for the reply; a single cell index needs very few.
    #[serde(default = "default_max_tokens")]
    max_tokens: u32,

    /// Sampling temperature; kept low for reproducible play.
    #[serde(default = "default_temperature")]
    temperature: f32,
}

fn default_provider() -> Provider {
    Provider::OpenAI
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_max_tokens() -> u32 {
    8
}

fn default_temperature() -> f32 {
    0.1
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: default_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
        }
    }
}

impl Settings {
    /// Loads settings from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading settings from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read settings file: {}", e)))?;

        let settings: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse settings: {}", e)))?;

        info!(model = %settings.model, "Settings loaded");
        Ok(settings)
    }

    /// Loads settings from an optional file path, defaulting when absent.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Resolves a provider configuration from the environment credential.
    ///
    /// Returns `None` when the credential for the configured provider is not
    /// set, which disables the suggestion path.
    #[instrument(skip(self), fields(provider = ?self.provider, model = %self.model))]
    pub fn resolve_provider(&self) -> Option<ProviderConfig> {
        let var = match self.provider {
            Provider::OpenAI => "OPENAI_API_KEY",
            Provider::Anthropic => "ANTHROPIC_API_KEY",
        };

        let api_key = match std::env::var(var) {
            Ok(key) if !key.is_empty() => key,
            _ => {
                debug!(var, "No API credential; suggestion service disabled");
                return None;
            }
        };

        info!("Suggestion service enabled");
        Some(ProviderConfig::new(
            self.provider,
            api_key,
            self.model.clone(),
            self.max_tokens,
            self.temperature,
        ))
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where the error occurred.
    pub line: u32,
    /// Source file where the error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.provider(), &Provider::OpenAI);
        assert_eq!(settings.model(), "gpt-4o-mini");
        assert_eq!(*settings.max_tokens(), 8);
    }

    #[test]
    fn test_parse_partial_toml() {
        let settings: Settings =
            toml::from_str("provider = \"anthropic\"\nmodel = \"claude-3-5-haiku-20241022\"")
                .unwrap();
        assert_eq!(settings.provider(), &Provider::Anthropic);
        assert_eq!(settings.model(), "claude-3-5-haiku-20241022");
        // Unspecified fields keep their defaults.
        assert_eq!(*settings.max_tokens(), 8);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(Settings::from_file("no/such/settings.toml").is_err());
    }
}
