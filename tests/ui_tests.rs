//! UI tests using egui_kittest and AccessKit
//!
//! The window is driven with a scripted chat session and a fake microphone;
//! widgets are found through their accessibility labels.

mod common;

use common::{network_error, FakeMicrophone, FakeSession};
use egui_kittest::kittest::Queryable;
use egui_kittest::Harness;
use opal::audio::AudioRecorder;
use opal::integration::TEXT_TURN_APOLOGY;
use opal::llm::ChatSession;
use opal::messages::{MessageContent, Sender};
use opal::ui::{AppState, Theme, TutorApp};
use opal::OpalError;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Runtime;
use tokio::sync::Notify;

struct Fixture {
    runtime: Runtime,
    session: Arc<FakeSession>,
    microphone: FakeMicrophone,
}

impl Fixture {
    fn new(replies: Vec<opal::Result<String>>) -> Self {
        Self::with_microphone(replies, FakeMicrophone::default())
    }

    fn with_microphone(replies: Vec<opal::Result<String>>, microphone: FakeMicrophone) -> Self {
        Self {
            runtime: Runtime::new().unwrap(),
            session: Arc::new(FakeSession::new(replies)),
            microphone,
        }
    }

    /// Every reply waits for a `notify_one` on `gate`
    fn gated(replies: Vec<opal::Result<String>>, gate: Arc<Notify>) -> Self {
        Self {
            runtime: Runtime::new().unwrap(),
            session: Arc::new(FakeSession::new(replies).gated(gate)),
            microphone: FakeMicrophone::default(),
        }
    }

    /// State with the greeting already delivered
    fn started_state(&self) -> AppState {
        let recorder = AudioRecorder::new(Box::new(self.microphone.clone()));
        let mut state = AppState::new(self.runtime.handle().clone(), recorder);
        let session: Arc<dyn ChatSession> = self.session.clone();
        let boot = state.start(Ok(session)).unwrap();
        self.runtime.block_on(boot).unwrap().unwrap();
        state
    }

    fn harness(&self) -> Harness<'static, TutorApp> {
        let app = TutorApp::from_state(self.started_state(), Theme::dark());
        Harness::builder()
            .with_size(egui::Vec2::new(420.0, 640.0))
            .build_state(|ctx, app: &mut TutorApp| app.ui(ctx), app)
    }
}

/// Wait for the spawned turn to land
fn settle(harness: &mut Harness<'_, TutorApp>) {
    for _ in 0..200 {
        if !harness.state().state().is_busy() {
            break;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
    harness.run();
}

#[test]
fn test_greeting_is_rendered() {
    let fixture = Fixture::new(vec![Ok("안녕하세요!".into())]);
    let mut harness = fixture.harness();
    harness.run();

    let _greeting = harness.get_by_label("Assistant response: 안녕하세요!");
    let _status = harness.get_by_label("Status: Online");
}

#[test]
fn test_send_text_through_the_input_bar() {
    let fixture = Fixture::new(vec![Ok("Hi!".into()), Ok("잘 지냈어요!".into())]);
    let mut harness = fixture.harness();
    harness.run();

    harness.get_by_label("Message input").focus();
    harness.run();
    harness.get_by_label("Message input").type_text("안녕");
    harness.run();
    assert_eq!(harness.state().state().input_text, "안녕");

    harness.get_by_label("Send message").click();
    harness.run();
    assert!(harness.state().state().input_text.is_empty());

    settle(&mut harness);

    let _user = harness.get_by_label("User message: 안녕");
    let _reply = harness.get_by_label("Assistant response: 잘 지냈어요!");
    assert_eq!(harness.state().state().view().messages.len(), 3);
}

#[test]
fn test_failed_turn_shows_apology_and_dismissable_banner() {
    let fixture = Fixture::new(vec![Ok("Hi!".into()), Err(network_error())]);
    let mut harness = fixture.harness();
    harness.run();

    harness.state_mut().state_mut().input_text = "hello".into();
    harness.run();
    harness.get_by_label("Send message").click();
    harness.run();
    settle(&mut harness);

    let _apology = harness.get_by_label(&format!("Assistant response: {}", TEXT_TURN_APOLOGY));
    assert!(harness.state().state().view().last_error.is_some());

    harness.get_by_label("Dismiss").click();
    harness.run();
    assert!(harness.state().state().view().last_error.is_none());
}

#[test]
fn test_record_and_send_voice_turn() {
    let fixture = Fixture::new(vec![Ok("Hi!".into()), Ok("발음이 아주 좋아요!".into())]);
    let mut harness = fixture.harness();
    harness.run();

    harness.get_by_label("Start recording").click();
    harness.run();
    assert!(harness.state().state().is_recording());
    assert!(fixture.microphone.is_held());

    assert!(fixture.microphone.emit(vec![0.1; 1600]));
    assert!(fixture.microphone.emit(vec![-0.1; 1600]));
    harness.run();

    harness.get_by_label("Stop recording").click();
    harness.run();
    assert!(!harness.state().state().is_recording());
    assert!(!fixture.microphone.is_held());

    settle(&mut harness);

    let view = harness.state().state().view();
    assert_eq!(view.messages.len(), 3);
    match &view.messages[1].content {
        MessageContent::Voice { attachment, .. } => {
            assert_eq!(attachment.mime_type, "audio/wav");
            assert!(attachment.byte_len > 3200 * 2);
        }
        other => panic!("expected a voice message, got {:?}", other),
    }
    assert_eq!(view.messages[2].display_text(), "발음이 아주 좋아요!");
}

#[test]
fn test_permission_denied_raises_alert() {
    let fixture = Fixture::with_microphone(vec![Ok("Hi!".into())], FakeMicrophone::denied());
    let mut state = fixture.started_state();

    let err = state.toggle_recording().unwrap_err();
    assert!(matches!(err, OpalError::MicrophonePermission(_)));
    assert!(!state.is_recording());
    assert!(state.alert().is_some());
    assert_eq!(state.view().messages.len(), 1);

    // Text input stays usable
    assert!(state.can_send_text());

    let app = TutorApp::from_state(state, Theme::dark());
    let mut harness = Harness::builder()
        .with_size(egui::Vec2::new(420.0, 640.0))
        .build_state(|ctx, app: &mut TutorApp| app.ui(ctx), app);
    harness.run();

    harness.get_by_label("OK").click();
    harness.run();
    assert!(harness.state().state().alert().is_none());
}

#[test]
fn test_text_rejected_while_recording() {
    let fixture = Fixture::new(vec![Ok("Hi!".into())]);
    let mut state = fixture.started_state();

    state.toggle_recording().unwrap();
    state.input_text = "안녕".into();

    assert!(!state.can_send_text());
    assert!(matches!(state.submit_text(), Err(OpalError::RecordingActive)));
    assert_eq!(state.input_text, "안녕");
    assert_eq!(state.view().messages.len(), 1);
}

#[test]
fn test_clip_finished_while_busy_is_discarded() {
    let gate = Arc::new(Notify::new());
    let fixture = Fixture::gated(vec![Ok("Hi!".into()), Ok("reply".into())], gate.clone());
    gate.notify_one();
    let mut state = fixture.started_state();

    state.input_text = "안녕".into();
    let turn = state.submit_text().unwrap();
    assert!(state.is_busy());

    // The mic stays usable while a turn is in flight
    assert!(state.can_toggle_recording());
    assert!(state.toggle_recording().unwrap().is_none());
    assert!(state.is_recording());
    assert!(fixture.microphone.emit(vec![0.1; 160]));

    let err = state.toggle_recording().unwrap_err();
    assert_eq!(err, OpalError::Busy);
    assert!(!state.is_recording());
    assert!(!fixture.microphone.is_held());
    assert!(state.view().notice.is_some());
    assert_eq!(state.view().messages.len(), 2);

    gate.notify_one();
    assert!(fixture.runtime.block_on(turn).unwrap().is_success());
    assert_eq!(state.view().messages.len(), 3);
    // The discarded clip never reached the session
    assert_eq!(fixture.session.received().len(), 2);
}

#[test]
fn test_zero_chunk_recording_still_sends() {
    let fixture = Fixture::new(vec![Ok("Hi!".into()), Ok("I couldn't hear anything.".into())]);
    let mut state = fixture.started_state();

    state.toggle_recording().unwrap();
    let turn = state.toggle_recording().unwrap().unwrap();
    let outcome = fixture.runtime.block_on(turn).unwrap();
    assert!(outcome.is_success());

    let view = state.view();
    assert_eq!(view.messages.len(), 3);
    assert_eq!(view.messages[1].sender, Sender::User);
    assert!(!view.busy);
}

#[test]
fn test_blank_input_is_not_sent() {
    let fixture = Fixture::new(vec![Ok("Hi!".into())]);
    let mut state = fixture.started_state();

    state.input_text = "   ".into();
    assert!(matches!(state.submit_text(), Err(OpalError::EmptyMessage)));
    assert_eq!(state.view().messages.len(), 1);
    assert!(fixture.session.received().len() == 1);
}

#[test]
fn test_missing_configuration_blocks_the_window() {
    let runtime = Runtime::new().unwrap();
    let recorder = AudioRecorder::new(Box::new(FakeMicrophone::default()));
    let mut state = AppState::new(runtime.handle().clone(), recorder);

    let started = state.start_from_config(&opal::llm::SessionConfig::default());
    assert!(started.is_none());

    let view = state.view();
    assert!(view.blocking_error.is_some());
    assert!(view.messages.is_empty());
    assert!(!state.can_send_text());
    assert!(matches!(state.submit_text(), Err(OpalError::SessionUnavailable)));

    let app = TutorApp::from_state(state, Theme::dark());
    let mut harness = Harness::builder()
        .with_size(egui::Vec2::new(420.0, 640.0))
        .build_state(|ctx, app: &mut TutorApp| app.ui(ctx), app);
    harness.run();
    let _status = harness.get_by_label("Status: Offline");
}
