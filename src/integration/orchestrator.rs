//! Conversation orchestrator
//!
//! Owns the conversation state and drives every turn against the chat
//! session: optimistic insert of the user message, one request, then the
//! reply or a fixed apology. The `busy` flag admits a single turn at a time.

use crate::audio::AudioClip;
use crate::llm::prompts::{BOOTSTRAP_MESSAGE, VOICE_TURN_CAPTION};
use crate::llm::session::{voice_payload, ChatSession, SessionReply, TurnPayload};
use crate::messages::{Message, MessageContent, MessageLog, Sender};
use crate::{OpalError, Result};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Stand-in reply appended when a text turn fails
pub const TEXT_TURN_APOLOGY: &str = "I'm sorry, I encountered an error. Please try again.";
/// Stand-in reply appended when a voice turn fails
pub const VOICE_TURN_APOLOGY: &str = "I'm sorry, I couldn't process the audio. Please try again.";
/// Banner shown after a failed text turn
pub const TEXT_TURN_BANNER: &str =
    "An error occurred while communicating with the AI. Please check the logs for details.";
/// Banner shown after a failed voice turn
pub const VOICE_TURN_BANNER: &str =
    "An error occurred while processing the audio. Please check the logs for details.";

/// Callback invoked after every state change
pub type ChangeNotifier = Arc<dyn Fn() + Send + Sync>;

/// Lifecycle of the conversation as a whole
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversationPhase {
    /// Waiting for the greeting
    Starting,
    /// Accepting turns
    Ready,
    /// The greeting failed; carries the blocking banner text
    Failed(String),
}

/// Read-only copy of the conversation state
#[derive(Debug, Clone)]
pub struct ConversationSnapshot {
    pub messages: Vec<Message>,
    pub busy: bool,
    pub last_error: Option<String>,
    pub phase: ConversationPhase,
}

impl ConversationSnapshot {
    /// Blocking banner text, if the conversation can't proceed
    pub fn blocking_error(&self) -> Option<&str> {
        match &self.phase {
            ConversationPhase::Failed(message) => Some(message),
            _ => None,
        }
    }
}

#[derive(Debug)]
struct ConversationState {
    messages: MessageLog,
    busy: bool,
    last_error: Option<String>,
    phase: ConversationPhase,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TurnKind {
    Text,
    Voice,
}

impl TurnKind {
    fn apology(self) -> &'static str {
        match self {
            TurnKind::Text => TEXT_TURN_APOLOGY,
            TurnKind::Voice => VOICE_TURN_APOLOGY,
        }
    }

    fn banner(self) -> &'static str {
        match self {
            TurnKind::Text => TEXT_TURN_BANNER,
            TurnKind::Voice => VOICE_TURN_BANNER,
        }
    }
}

enum TurnRequest {
    Text(String),
    Voice(AudioClip),
}

impl TurnRequest {
    fn kind(&self) -> TurnKind {
        match self {
            TurnRequest::Text(_) => TurnKind::Text,
            TurnRequest::Voice(_) => TurnKind::Voice,
        }
    }

    fn user_message(&self) -> Message {
        match self {
            TurnRequest::Text(text) => Message::user_text(text.clone()),
            TurnRequest::Voice(clip) => Message::new(
                Sender::User,
                MessageContent::Voice {
                    caption: VOICE_TURN_CAPTION.to_string(),
                    attachment: clip.attachment(),
                },
            ),
        }
    }

    fn into_payload(self) -> TurnPayload {
        match self {
            TurnRequest::Text(text) => TurnPayload::Text(text),
            TurnRequest::Voice(clip) => voice_payload(&clip),
        }
    }
}

/// Result of a completed turn
#[derive(Debug, Clone, PartialEq)]
pub enum TurnOutcome {
    /// The reply was appended
    Replied { message_id: Uuid },
    /// The apology was appended in place of a reply
    Failed { message_id: Uuid, error: OpalError },
}

impl TurnOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, TurnOutcome::Replied { .. })
    }

    /// Id of the assistant message appended for this turn
    pub fn message_id(&self) -> Uuid {
        match self {
            TurnOutcome::Replied { message_id } | TurnOutcome::Failed { message_id, .. } => {
                *message_id
            }
        }
    }
}

/// Releases `busy` if a turn is abandoned before it resolves
struct BusyGuard {
    state: Arc<Mutex<ConversationState>>,
    armed: bool,
}

impl BusyGuard {
    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        if self.armed {
            warn!("Turn dropped before completion, releasing busy flag");
            self.state.lock().busy = false;
        }
    }
}

/// A turn that has been accepted and whose user message is in the log
#[must_use = "a pending turn holds the busy flag until it is run"]
pub struct PendingTurn {
    orchestrator: Orchestrator,
    request: TurnRequest,
    user_message_id: Uuid,
    guard: BusyGuard,
}

impl PendingTurn {
    /// Id of the user message appended when the turn was accepted
    pub fn user_message_id(&self) -> Uuid {
        self.user_message_id
    }

    /// Send the turn and record its result
    pub async fn run(self) -> TurnOutcome {
        let PendingTurn {
            orchestrator,
            request,
            user_message_id,
            mut guard,
        } = self;

        let kind = request.kind();
        debug!("Sending {:?} turn for message {}", kind, user_message_id);

        let result = orchestrator.session.send_message(request.into_payload()).await;

        guard.disarm();
        orchestrator.finish_turn(kind, result)
    }
}

/// Handle to the single conversation; clones share the same state
#[derive(Clone)]
pub struct Orchestrator {
    session: Arc<dyn ChatSession>,
    state: Arc<Mutex<ConversationState>>,
    notifier: Option<ChangeNotifier>,
}

impl Orchestrator {
    pub fn new(session: Arc<dyn ChatSession>) -> Self {
        Self {
            session,
            state: Arc::new(Mutex::new(ConversationState {
                messages: MessageLog::new(),
                busy: false,
                last_error: None,
                phase: ConversationPhase::Starting,
            })),
            notifier: None,
        }
    }

    /// Call `notifier` after every state change
    pub fn with_notifier(mut self, notifier: ChangeNotifier) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn snapshot(&self) -> ConversationSnapshot {
        let state = self.state.lock();
        ConversationSnapshot {
            messages: state.messages.as_slice().to_vec(),
            busy: state.busy,
            last_error: state.last_error.clone(),
            phase: state.phase.clone(),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.state.lock().busy
    }

    pub fn phase(&self) -> ConversationPhase {
        self.state.lock().phase.clone()
    }

    pub fn message_count(&self) -> usize {
        self.state.lock().messages.len()
    }

    /// Hide the per-turn error banner
    pub fn dismiss_error(&self) {
        self.state.lock().last_error = None;
        self.notify();
    }

    /// Ask the persona for its opening greeting
    ///
    /// Runs once, before any user turn. A failure moves the conversation to
    /// [`ConversationPhase::Failed`] instead of adding a chat message.
    pub async fn bootstrap(&self) -> Result<()> {
        let mut guard = {
            let mut state = self.state.lock();
            if state.phase != ConversationPhase::Starting || state.busy || !state.messages.is_empty() {
                return Err(OpalError::InvalidTransition(
                    "Conversation has already started".into(),
                ));
            }
            state.busy = true;
            state.last_error = None;
            BusyGuard {
                state: Arc::clone(&self.state),
                armed: true,
            }
        };
        self.notify();

        info!("Requesting greeting");
        let result = self
            .session
            .send_message(TurnPayload::Text(BOOTSTRAP_MESSAGE.to_string()))
            .await;
        guard.disarm();

        let outcome = {
            let mut state = self.state.lock();
            state.busy = false;
            match result {
                Ok(SessionReply { text }) => {
                    state.messages.append(Message::assistant_text(text));
                    state.phase = ConversationPhase::Ready;
                    info!("Conversation started");
                    Ok(())
                }
                Err(e) => {
                    error!("Failed to start conversation: {}", e);
                    let err = OpalError::BootstrapError(e.to_string());
                    state.phase = ConversationPhase::Failed(err.user_message());
                    Err(err)
                }
            }
        };
        self.notify();
        outcome
    }

    /// Accept a text turn: append the user message and take the busy flag
    pub fn begin_text_turn(&self, text: &str) -> Result<PendingTurn> {
        let text = text.trim();
        if text.is_empty() {
            return Err(OpalError::EmptyMessage);
        }
        self.begin(TurnRequest::Text(text.to_string()))
    }

    /// Accept a recorded clip as a pronunciation-coaching turn
    pub fn begin_voice_turn(&self, clip: AudioClip) -> Result<PendingTurn> {
        self.begin(TurnRequest::Voice(clip))
    }

    /// Accept and run a text turn
    pub async fn send_text(&self, text: &str) -> Result<TurnOutcome> {
        Ok(self.begin_text_turn(text)?.run().await)
    }

    /// Accept and run a voice turn
    pub async fn send_voice(&self, clip: AudioClip) -> Result<TurnOutcome> {
        Ok(self.begin_voice_turn(clip)?.run().await)
    }

    fn begin(&self, request: TurnRequest) -> Result<PendingTurn> {
        let user_message_id = {
            let mut state = self.state.lock();
            if state.phase != ConversationPhase::Ready {
                return Err(OpalError::SessionUnavailable);
            }
            if state.busy {
                debug!("Rejecting turn while a request is in flight");
                return Err(OpalError::Busy);
            }

            let id = state.messages.append(request.user_message());
            state.busy = true;
            state.last_error = None;
            id
        };
        self.notify();

        Ok(PendingTurn {
            orchestrator: self.clone(),
            request,
            user_message_id,
            guard: BusyGuard {
                state: Arc::clone(&self.state),
                armed: true,
            },
        })
    }

    fn finish_turn(&self, kind: TurnKind, result: Result<SessionReply>) -> TurnOutcome {
        let outcome = {
            let mut state = self.state.lock();
            let outcome = match result {
                Ok(SessionReply { text }) => {
                    let message_id = state.messages.append(Message::assistant_text(text));
                    TurnOutcome::Replied { message_id }
                }
                Err(e) => {
                    error!("{:?} turn failed: {}", kind, e);
                    let message_id = state.messages.append(Message::assistant_text(kind.apology()));
                    state.last_error = Some(kind.banner().to_string());
                    TurnOutcome::Failed { message_id, error: e }
                }
            };
            state.busy = false;
            outcome
        };
        self.notify();
        outcome
    }

    fn notify(&self) {
        if let Some(notifier) = &self.notifier {
            notifier();
        }
    }
}
