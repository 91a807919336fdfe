use crate::llm::session::InlineData;
use crate::messages::AudioAttachment;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;

/// A finalized recording: the encoded bytes and their MIME type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioClip {
    mime_type: String,
    data: Vec<u8>,
}

impl AudioClip {
    pub fn new(mime_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data,
        }
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Base64 text form of the clip for transport
    pub fn to_base64(&self) -> String {
        BASE64_STANDARD.encode(&self.data)
    }

    /// Attachment part carrying this clip
    pub fn inline_data(&self) -> InlineData {
        InlineData {
            mime_type: self.mime_type.clone(),
            data: self.to_base64(),
        }
    }

    /// Descriptor stored with the user's message
    pub fn attachment(&self) -> AudioAttachment {
        AudioAttachment {
            mime_type: self.mime_type.clone(),
            byte_len: self.data.len(),
        }
    }
}
