//! Configuration for the integration layer
//!
//! Provides centralized configuration for all components.

use crate::llm::config::SessionConfig;

/// Environment variable that turns microphone input off (`0`, `false`, `off`)
pub const AUDIO_INPUT_ENV: &str = "OPAL_AUDIO_INPUT";

/// Configuration for the complete application
#[derive(Clone, Debug)]
pub struct IntegrationConfig {
    /// Chat session configuration
    pub session: SessionConfig,

    /// Whether to enable audio input
    pub enable_audio_input: bool,
}

impl Default for IntegrationConfig {
    fn default() -> Self {
        Self {
            session: SessionConfig::default(),
            enable_audio_input: true,
        }
    }
}

impl IntegrationConfig {
    /// Read the configuration from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let enable_audio_input = !matches!(
            lookup(AUDIO_INPUT_ENV)
                .map(|value| value.trim().to_ascii_lowercase())
                .as_deref(),
            Some("0" | "false" | "off" | "no")
        );

        Self {
            session: SessionConfig::from_lookup(lookup),
            enable_audio_input,
        }
    }

    /// Set the session configuration
    pub fn with_session(mut self, session: SessionConfig) -> Self {
        self.session = session;
        self
    }

    /// Disable audio input (text-only mode)
    pub fn without_audio_input(mut self) -> Self {
        self.enable_audio_input = false;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        self.session.validate()
    }
}
