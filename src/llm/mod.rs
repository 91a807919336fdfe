//! Chat session against the hosted tutor model
//!
//! The session is the external collaborator: it owns the persona instruction
//! and the turn history, the rest of the crate only invokes it.

pub mod config;
pub mod gemini;
pub mod prompts;
pub mod session;

pub use config::SessionConfig;
pub use gemini::GeminiSession;
pub use session::{
    initialize_session, voice_payload, ChatSession, InlineData, OutboundMessage, Part,
    SessionReply, TurnPayload,
};
