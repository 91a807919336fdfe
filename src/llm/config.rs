//! Session configuration for the hosted tutor model

use crate::llm::prompts::TUTOR_SYSTEM_PROMPT;

/// Environment variable holding the API credential
pub const API_KEY_ENV: &str = "API_KEY";
/// Environment variable overriding the model id
pub const MODEL_ENV: &str = "OPAL_MODEL";
/// Environment variable overriding the API base URL
pub const API_BASE_ENV: &str = "OPAL_API_BASE";

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Configuration for the chat session
#[derive(Clone)]
pub struct SessionConfig {
    /// API credential, read once at startup
    pub api_key: Option<String>,

    /// Model identifier
    pub model: String,

    /// Base URL of the `models` collection
    pub base_url: String,

    /// Persona instruction handed to the model with every request
    pub system_instruction: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_API_BASE.to_string(),
            system_instruction: TUTOR_SYSTEM_PROMPT.to_string(),
        }
    }
}

impl std::fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl SessionConfig {
    /// Read the session configuration from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_blank = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let mut config = Self::default();
        config.api_key = non_blank(API_KEY_ENV);
        if let Some(model) = non_blank(MODEL_ENV) {
            config.model = model;
        }
        if let Some(base_url) = non_blank(API_BASE_ENV) {
            config.base_url = base_url.trim_end_matches('/').to_string();
        }
        config
    }

    /// Set the API key
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set the model
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the API base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Replace the persona instruction
    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = instruction.into();
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        match &self.api_key {
            Some(key) if !key.trim().is_empty() => {}
            _ => return Err(format!("{} environment variable not set.", API_KEY_ENV)),
        }

        if self.model.trim().is_empty() {
            return Err("Model id is required".to_string());
        }

        if self.base_url.trim().is_empty() {
            return Err("API base URL is required".to_string());
        }

        Ok(())
    }
}
