//! Application state management
//!
//! Glue between the input widgets, the recorder and the conversation. The
//! conversation itself lives in the [`Orchestrator`]; this state only holds
//! what the window owns locally and forwards user actions.

use crate::audio::AudioRecorder;
use crate::integration::{ChangeNotifier, ConversationPhase, Orchestrator, TurnOutcome};
use crate::llm::{initialize_session, ChatSession, SessionConfig};
use crate::messages::Message;
use crate::{OpalError, Result};
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Everything the presentation layer renders in one frame
#[derive(Debug, Clone, Default)]
pub struct ChatView {
    pub messages: Vec<Message>,
    /// A request is in flight
    pub busy: bool,
    /// Dismissable banner for the last failed turn
    pub last_error: Option<String>,
    /// Configuration or greeting failure; the conversation can't proceed
    pub blocking_error: Option<String>,
    pub recording: bool,
    pub recording_seconds: f32,
    /// Short-lived hint, e.g. a recording discarded while busy
    pub notice: Option<String>,
}

/// Central application state
pub struct AppState {
    /// Current text input
    pub input_text: String,

    recorder: AudioRecorder,
    orchestrator: Option<Orchestrator>,

    /// Set when the session could not be created
    startup_error: Option<String>,

    /// Blocking alert (microphone access)
    alert: Option<String>,

    notice: Option<String>,
    runtime: Handle,
    notifier: Option<ChangeNotifier>,
}

impl AppState {
    /// Create a new application state
    ///
    /// Turns are spawned on `runtime`.
    pub fn new(runtime: Handle, recorder: AudioRecorder) -> Self {
        Self {
            input_text: String::new(),
            recorder,
            orchestrator: None,
            startup_error: None,
            alert: None,
            notice: None,
            runtime,
            notifier: None,
        }
    }

    /// Called whenever the conversation changes off the UI thread
    pub fn with_notifier(mut self, notifier: ChangeNotifier) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Create the session from configuration and start the conversation
    pub fn start_from_config(&mut self, config: &SessionConfig) -> Option<JoinHandle<Result<()>>> {
        let session = initialize_session(config).map(|s| Arc::new(s) as Arc<dyn ChatSession>);
        self.start(session)
    }

    /// Start the conversation on an initialized session
    ///
    /// A failed initialization is terminal for this run: the startup error
    /// is shown and no conversation is created. Otherwise the greeting is
    /// requested in the background.
    pub fn start(&mut self, session: Result<Arc<dyn ChatSession>>) -> Option<JoinHandle<Result<()>>> {
        if self.orchestrator.is_some() || self.startup_error.is_some() {
            warn!("Conversation already started");
            return None;
        }

        match session {
            Ok(session) => {
                let mut orchestrator = Orchestrator::new(session);
                if let Some(notifier) = &self.notifier {
                    orchestrator = orchestrator.with_notifier(Arc::clone(notifier));
                }
                self.orchestrator = Some(orchestrator.clone());
                info!("Starting conversation");
                Some(self.runtime.spawn(async move { orchestrator.bootstrap().await }))
            }
            Err(e) => {
                warn!("Conversation unavailable: {}", e);
                self.startup_error = Some(e.user_message());
                None
            }
        }
    }

    /// The conversation handle, once started
    pub fn orchestrator(&self) -> Option<&Orchestrator> {
        self.orchestrator.as_ref()
    }

    fn ready_orchestrator(&self) -> Result<&Orchestrator> {
        match &self.orchestrator {
            Some(o) if o.phase() == ConversationPhase::Ready => Ok(o),
            _ => Err(OpalError::SessionUnavailable),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.orchestrator.as_ref().is_some_and(Orchestrator::is_busy)
    }

    pub fn is_recording(&self) -> bool {
        self.recorder.is_recording()
    }

    /// Length of the current recording
    pub fn recording_seconds(&self) -> f32 {
        self.recorder.buffered_seconds()
    }

    /// Text input and the send button are usable
    pub fn can_send_text(&self) -> bool {
        self.ready_orchestrator().is_ok() && !self.is_busy() && !self.is_recording()
    }

    /// The microphone button is usable
    ///
    /// Stopping is always allowed so the device can be released.
    pub fn can_toggle_recording(&self) -> bool {
        self.is_recording() || self.ready_orchestrator().is_ok()
    }

    /// Send the current input as a text turn
    ///
    /// Rejected while recording, while a turn is in flight, or when the
    /// input is blank; the input is cleared only when the turn is accepted.
    pub fn submit_text(&mut self) -> Result<JoinHandle<TurnOutcome>> {
        if self.is_recording() {
            return Err(OpalError::RecordingActive);
        }

        let orchestrator = self.ready_orchestrator()?;
        let pending = orchestrator.begin_text_turn(&self.input_text).map_err(|e| {
            debug!("Text turn rejected: {}", e);
            e
        })?;

        self.input_text.clear();
        self.notice = None;
        Ok(self.runtime.spawn(pending.run()))
    }

    /// Start a recording, or stop the current one and send it
    ///
    /// Returns the spawned voice turn when a recording was stopped and
    /// accepted. A microphone failure raises the blocking alert.
    pub fn toggle_recording(&mut self) -> Result<Option<JoinHandle<TurnOutcome>>> {
        if !self.recorder.is_recording() {
            self.ready_orchestrator()?;
            return match self.recorder.start_recording() {
                Ok(()) => {
                    self.notice = None;
                    Ok(None)
                }
                Err(e) => {
                    if matches!(e, OpalError::MicrophonePermission(_) | OpalError::AudioDeviceError(_)) {
                        self.alert = Some(e.user_message());
                    }
                    Err(e)
                }
            };
        }

        let clip = match self.recorder.stop_recording() {
            Ok(clip) => clip,
            Err(e) => {
                warn!("Failed to finalize recording: {}", e);
                self.notice = Some(e.user_message());
                return Err(e);
            }
        };

        let orchestrator = self.ready_orchestrator()?;
        match orchestrator.begin_voice_turn(clip) {
            Ok(pending) => Ok(Some(self.runtime.spawn(pending.run()))),
            Err(e) => {
                warn!("Discarding recording: {}", e);
                self.notice = Some(e.user_message());
                Err(e)
            }
        }
    }

    /// Pump captured audio into the recorder; call once per frame
    pub fn poll(&mut self) {
        self.recorder.poll_chunks();
    }

    /// Blocking alert to show, if any
    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    /// Hide the per-turn error banner
    pub fn dismiss_error(&mut self) {
        if let Some(orchestrator) = &self.orchestrator {
            orchestrator.dismiss_error();
        }
    }

    /// Snapshot for rendering
    pub fn view(&self) -> ChatView {
        let mut view = ChatView {
            recording: self.recorder.is_recording(),
            recording_seconds: self.recording_seconds(),
            notice: self.notice.clone(),
            blocking_error: self.startup_error.clone(),
            ..Default::default()
        };

        if let Some(orchestrator) = &self.orchestrator {
            let snapshot = orchestrator.snapshot();
            view.blocking_error = snapshot.blocking_error().map(str::to_string);
            view.messages = snapshot.messages;
            view.busy = snapshot.busy;
            view.last_error = snapshot.last_error;
        }

        view
    }
}
