pub mod audio;
pub mod integration;
pub mod llm;
pub mod messages;
pub mod ui;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum OpalError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Bootstrap error: {0}")]
    BootstrapError(String),

    #[error("Request error (status {status:?}): {message}")]
    RequestError {
        status: Option<u16>,
        message: String,
    },

    #[error("Response error: {0}")]
    ResponseError(String),

    #[error("Microphone permission error: {0}")]
    MicrophonePermission(String),

    #[error("Audio device error: {0}")]
    AudioDeviceError(String),

    #[error("Audio processing error: {0}")]
    AudioProcessingError(String),

    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    #[error("A request is already in flight")]
    Busy,

    #[error("Message is empty")]
    EmptyMessage,

    #[error("Text input is disabled while recording")]
    RecordingActive,

    #[error("Chat session is not available")]
    SessionUnavailable,
}

impl From<std::io::Error> for OpalError {
    fn from(e: std::io::Error) -> Self {
        OpalError::AudioProcessingError(e.to_string())
    }
}

impl OpalError {
    /// Check if this error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            // The conversation can't start without a session
            OpalError::ConfigError(_) => false,
            OpalError::BootstrapError(_) => false,
            OpalError::SessionUnavailable => false,
            // A single failed turn leaves the session usable
            OpalError::RequestError { .. } => true,
            OpalError::ResponseError(_) => true,
            // The user can retry after granting access
            OpalError::MicrophonePermission(_) => true,
            OpalError::AudioDeviceError(_) => true,
            OpalError::AudioProcessingError(_) => true,
            OpalError::InvalidTransition(_) => true,
            OpalError::Busy => true,
            OpalError::EmptyMessage => true,
            OpalError::RecordingActive => true,
        }
    }

    /// Get a user-friendly description
    pub fn user_message(&self) -> String {
        match self {
            OpalError::ConfigError(_) => {
                "Failed to initialize the AI tutor. Please check your API key configuration."
                    .to_string()
            }
            OpalError::BootstrapError(_) => {
                "Failed to start a conversation with the AI tutor. Please check your API key and restart the app."
                    .to_string()
            }
            OpalError::RequestError { .. } | OpalError::ResponseError(_) => {
                "An error occurred while communicating with the AI. Please check the logs for details."
                    .to_string()
            }
            OpalError::MicrophonePermission(_) | OpalError::AudioDeviceError(_) => {
                "Microphone access is required for pronunciation practice. Please allow access in your system settings."
                    .to_string()
            }
            OpalError::AudioProcessingError(_) => {
                "An error occurred while processing the audio. Please check the logs for details."
                    .to_string()
            }
            OpalError::InvalidTransition(_) => "That action isn't available right now.".to_string(),
            OpalError::Busy => {
                "Please wait for the tutor to reply before sending another message.".to_string()
            }
            OpalError::EmptyMessage => "Type a message first.".to_string(),
            OpalError::RecordingActive => {
                "Stop the recording before sending a text message.".to_string()
            }
            OpalError::SessionUnavailable => {
                "Chat session is not available. Please restart the app.".to_string()
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, OpalError>;
