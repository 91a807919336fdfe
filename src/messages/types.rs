use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sender {
    User,
    Assistant,
}

/// Descriptor of the audio that was transmitted with a voice turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioAttachment {
    pub mime_type: String,
    pub byte_len: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MessageContent {
    Text(String),
    /// A recorded turn: the caption shown in the thread plus what was sent.
    Voice {
        caption: String,
        attachment: AudioAttachment,
    },
}

impl MessageContent {
    pub fn display_text(&self) -> &str {
        match self {
            MessageContent::Text(text) => text,
            MessageContent::Voice { caption, .. } => caption,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub sender: Sender,
    pub content: MessageContent,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn new(sender: Sender, content: MessageContent) -> Self {
        Self {
            id: Uuid::new_v4(),
            sender,
            content,
            timestamp: Utc::now(),
        }
    }

    pub fn user_text(text: impl Into<String>) -> Self {
        Self::new(Sender::User, MessageContent::Text(text.into()))
    }

    pub fn assistant_text(text: impl Into<String>) -> Self {
        Self::new(Sender::Assistant, MessageContent::Text(text.into()))
    }

    pub fn is_user(&self) -> bool {
        self.sender == Sender::User
    }

    pub fn display_text(&self) -> &str {
        self.content.display_text()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique() {
        let a = Message::user_text("안녕");
        let b = Message::user_text("안녕");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_voice_message_displays_caption() {
        let msg = Message::new(
            Sender::User,
            MessageContent::Voice {
                caption: "🎤 Pronunciation practice".to_string(),
                attachment: AudioAttachment {
                    mime_type: "audio/wav".to_string(),
                    byte_len: 44,
                },
            },
        );

        assert!(msg.is_user());
        assert_eq!(msg.display_text(), "🎤 Pronunciation practice");
    }
}
