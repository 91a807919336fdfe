//! Shared fakes for the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use crossbeam_channel::Sender;
use opal::audio::{AudioSource, StreamFormat};
use opal::llm::{ChatSession, SessionReply, TurnPayload};
use opal::{OpalError, Result};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::Notify;

/// Chat session that replays scripted replies and records what it was sent
#[derive(Default)]
pub struct FakeSession {
    replies: Mutex<VecDeque<Result<String>>>,
    received: Mutex<Vec<TurnPayload>>,
    gate: Option<Arc<Notify>>,
}

impl FakeSession {
    pub fn new(replies: Vec<Result<String>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            ..Default::default()
        }
    }

    /// Hold every request until `gate` is notified
    pub fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn received(&self) -> Vec<TurnPayload> {
        self.received.lock().clone()
    }
}

#[async_trait]
impl ChatSession for FakeSession {
    async fn send_message(&self, message: TurnPayload) -> Result<SessionReply> {
        self.received.lock().push(message);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }

        let reply = self.replies.lock().pop_front().unwrap_or_else(|| {
            Err(OpalError::ResponseError("script exhausted".into()))
        });
        reply.map(|text| SessionReply { text })
    }
}

pub fn network_error() -> OpalError {
    OpalError::RequestError {
        status: None,
        message: "connection refused".into(),
    }
}

/// Audio source driven by the test
#[derive(Clone, Default)]
pub struct FakeMicrophone {
    pub deny: bool,
    sender: Arc<Mutex<Option<Sender<Vec<f32>>>>>,
}

impl FakeMicrophone {
    pub fn denied() -> Self {
        Self {
            deny: true,
            ..Default::default()
        }
    }

    /// Deliver a chunk as the device callback would
    pub fn emit(&self, chunk: Vec<f32>) -> bool {
        match self.sender.lock().as_ref() {
            Some(tx) => tx.send(chunk).is_ok(),
            None => false,
        }
    }

    pub fn is_held(&self) -> bool {
        self.sender.lock().is_some()
    }
}

impl AudioSource for FakeMicrophone {
    fn open(&mut self, chunk_tx: Sender<Vec<f32>>) -> Result<StreamFormat> {
        if self.deny {
            return Err(OpalError::MicrophonePermission("access denied".into()));
        }
        *self.sender.lock() = Some(chunk_tx);
        Ok(StreamFormat::default())
    }

    fn close(&mut self) {
        *self.sender.lock() = None;
    }

    fn is_open(&self) -> bool {
        self.is_held()
    }
}
