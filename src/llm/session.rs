//! The chat session contract and the payloads exchanged through it

use crate::audio::AudioClip;
use crate::llm::config::SessionConfig;
use crate::llm::gemini::GeminiSession;
use crate::llm::prompts::PRONUNCIATION_INSTRUCTION;
use crate::{OpalError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

/// Base64 audio attached to a turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

/// One part of a structured turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Part::Text { text: text.into() }
    }
}

/// Content of a single turn: plain text or an ordered list of parts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TurnPayload {
    Text(String),
    Parts(Vec<Part>),
}

/// Request envelope, `{ "message": ... }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundMessage {
    pub message: TurnPayload,
}

/// Reply from the session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionReply {
    /// Markdown-formatted reply text
    pub text: String,
}

/// A stateful conversation held by the hosted model.
///
/// Implementations keep the turn history themselves; callers only send the
/// new turn.
#[async_trait]
pub trait ChatSession: Send + Sync {
    async fn send_message(&self, message: TurnPayload) -> Result<SessionReply>;
}

/// Build the two-part payload for a recorded clip
pub fn voice_payload(clip: &AudioClip) -> TurnPayload {
    TurnPayload::Parts(vec![
        Part::text(PRONUNCIATION_INSTRUCTION),
        Part::InlineData {
            inline_data: clip.inline_data(),
        },
    ])
}

/// Construct the single chat session for this run.
///
/// Performs no network I/O; every failure here is a local configuration
/// problem.
pub fn initialize_session(config: &SessionConfig) -> Result<GeminiSession> {
    if let Err(e) = config.validate() {
        error!("Failed to initialize chat session: {}", e);
        return Err(OpalError::ConfigError(e));
    }

    let session = GeminiSession::new(config)?;
    info!("Chat session created for model {}", config.model);
    Ok(session)
}
