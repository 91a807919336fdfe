//! Chat session backed by the Gemini `generateContent` REST API
//!
//! The REST endpoint is stateless, so the session keeps the conversation
//! history itself and resends it with every turn.

use crate::llm::config::SessionConfig;
use crate::llm::session::{ChatSession, Part, SessionReply, TurnPayload};
use crate::{OpalError, Result};
use async_trait::async_trait;
use parking_lot::Mutex;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

const USER_ROLE: &str = "user";
const MODEL_ROLE: &str = "model";

/// Chat session talking to the Gemini HTTP API
pub struct GeminiSession {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    system_instruction: String,

    /// Completed turns, in order
    history: Mutex<Vec<Content>>,
}

impl std::fmt::Debug for GeminiSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiSession")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("history_len", &self.history_len())
            .finish_non_exhaustive()
    }
}

impl GeminiSession {
    /// Create a session from a validated configuration
    pub fn new(config: &SessionConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| OpalError::ConfigError("API_KEY environment variable not set.".into()))?;

        let client = Client::builder()
            .build()
            .map_err(|e| OpalError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key,
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            system_instruction: config.system_instruction.clone(),
            history: Mutex::new(Vec::new()),
        })
    }

    /// Get the model ID
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Number of contents retained (two per completed turn)
    pub fn history_len(&self) -> usize {
        self.history.lock().len()
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/{model}:generateContent?key={api_key}",
            self.base_url,
            model = self.model,
            api_key = self.api_key
        )
    }

    async fn send_request(&self, body: &GenerateContentRequest) -> Result<String> {
        let response = self
            .client
            .post(self.endpoint())
            .json(body)
            .send()
            .await
            // The URL carries the key, keep it out of error strings
            .map_err(|err| OpalError::RequestError {
                status: None,
                message: format!("Gemini API request failed: {}", err.without_url()),
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read Gemini error body".to_string());
            return Err(map_http_error(status, &body_text));
        }

        let parsed: GenerateContentResponse = response.json().await.map_err(|err| {
            OpalError::ResponseError(format!("Failed to parse Gemini response: {}", err.without_url()))
        })?;

        extract_text(parsed)
    }
}

#[async_trait]
impl ChatSession for GeminiSession {
    async fn send_message(&self, message: TurnPayload) -> Result<SessionReply> {
        let user_content = Content::user(message);

        let mut contents = self.history.lock().clone();
        contents.push(user_content.clone());

        let request = GenerateContentRequest {
            contents,
            system_instruction: Some(Content::instruction(&self.system_instruction)),
        };

        debug!(
            "Sending turn to {} with {} prior contents",
            self.model,
            request.contents.len() - 1
        );

        let text = self.send_request(&request).await?;

        let mut history = self.history.lock();
        history.push(user_content.without_audio());
        history.push(Content::model(&text));

        Ok(SessionReply { text })
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
}

#[derive(Debug, Clone, Serialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    parts: Vec<Part>,
}

impl Content {
    fn user(payload: TurnPayload) -> Self {
        let parts = match payload {
            TurnPayload::Text(text) => vec![Part::Text { text }],
            TurnPayload::Parts(parts) => parts,
        };
        Self {
            role: Some(USER_ROLE.to_string()),
            parts,
        }
    }

    /// History form of a user turn: audio is replaced by a short text note
    ///
    /// The model's reply already covers the clip, and resending every clip
    /// would grow each request until it hits the inline size limit.
    fn without_audio(self) -> Self {
        let parts = self
            .parts
            .into_iter()
            .map(|part| match part {
                Part::InlineData { inline_data } => Part::text(format!(
                    "[audio clip: {}, {} bytes]",
                    inline_data.mime_type,
                    decoded_len(&inline_data.data)
                )),
                text => text,
            })
            .collect();
        Self {
            role: self.role,
            parts,
        }
    }

    fn model(text: &str) -> Self {
        Self {
            role: Some(MODEL_ROLE.to_string()),
            parts: vec![Part::text(text)],
        }
    }

    fn instruction(text: &str) -> Self {
        Self {
            role: None,
            parts: vec![Part::text(text)],
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<ContentResponse>,
}

#[derive(Debug, Deserialize)]
struct ContentResponse {
    #[serde(default)]
    parts: Vec<PartResponse>,
}

#[derive(Debug, Deserialize)]
struct PartResponse {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    status: Option<String>,
}

/// Byte length of standard base64 without decoding it
fn decoded_len(data: &str) -> usize {
    let padding = data.bytes().rev().take_while(|&b| b == b'=').count();
    (data.len() / 4 * 3).saturating_sub(padding)
}

fn extract_text(response: GenerateContentResponse) -> Result<String> {
    let texts: Option<Vec<String>> = response
        .candidates
        .and_then(|candidates| candidates.into_iter().next())
        .and_then(|candidate| candidate.content)
        .map(|content| content.parts.into_iter().filter_map(|part| part.text).collect());

    match texts {
        Some(texts) if !texts.is_empty() => Ok(texts.concat()),
        _ => {
            if let Some(reason) = response.prompt_feedback.and_then(|f| f.block_reason) {
                warn!("Gemini blocked the prompt: {}", reason);
                return Err(OpalError::ResponseError(format!("Prompt blocked: {}", reason)));
            }
            Err(OpalError::ResponseError(
                "Gemini API returned no text in the response candidates".into(),
            ))
        }
    }
}

fn map_http_error(status: StatusCode, body: &str) -> OpalError {
    let message = serde_json::from_str::<ErrorWrapper>(body)
        .map(|wrapper| {
            let status_text = wrapper.error.status.unwrap_or_default();
            let msg = wrapper.error.message.unwrap_or_else(|| body.to_string());
            if status_text.is_empty() {
                msg
            } else {
                format!("{}: {}", status_text, msg)
            }
        })
        .unwrap_or_else(|_| body.to_string());

    OpalError::RequestError {
        status: Some(status.as_u16()),
        message,
    }
}
