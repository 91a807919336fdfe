pub mod config;
pub mod orchestrator;

pub use config::{IntegrationConfig, AUDIO_INPUT_ENV};
pub use orchestrator::{
    ChangeNotifier, ConversationPhase, ConversationSnapshot, Orchestrator, PendingTurn,
    TurnOutcome, TEXT_TURN_APOLOGY, TEXT_TURN_BANNER, VOICE_TURN_APOLOGY, VOICE_TURN_BANNER,
};
