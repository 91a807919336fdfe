//! Recording state machine
//!
//! Turns a start/stop gesture into a finalized [`AudioClip`]. Chunk arrival
//! is an explicit event (`poll_chunks` / `push_chunk`) so the pipeline can be
//! driven without a real microphone.

use crate::audio::buffer::CaptureBuffer;
use crate::audio::clip::AudioClip;
use crate::audio::source::{AudioSource, StreamFormat};
use crate::audio::wav::{encode_wav, WAV_MIME_TYPE};
use crate::{OpalError, Result};
use crossbeam_channel::{unbounded, Receiver};
use tracing::{debug, info, warn};

/// Recording state for voice input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecorderState {
    /// Not recording, no device held
    Idle,
    /// Device held, buffering chunks
    Recording,
}

pub struct AudioRecorder {
    source: Box<dyn AudioSource>,
    state: RecorderState,
    buffer: CaptureBuffer,
    chunk_rx: Option<Receiver<Vec<f32>>>,
    format: StreamFormat,
}

impl AudioRecorder {
    pub fn new(source: Box<dyn AudioSource>) -> Self {
        Self {
            source,
            state: RecorderState::Idle,
            buffer: CaptureBuffer::new(),
            chunk_rx: None,
            format: StreamFormat::default(),
        }
    }

    pub fn state(&self) -> RecorderState {
        self.state
    }

    pub fn is_recording(&self) -> bool {
        self.state == RecorderState::Recording
    }

    /// Number of chunks buffered in the current recording
    pub fn buffered_chunks(&self) -> usize {
        self.buffer.chunk_count()
    }

    /// Length of the current recording in seconds
    pub fn buffered_seconds(&self) -> f32 {
        self.buffer.sample_count() as f32
            / (self.format.sample_rate as f32 * self.format.channels as f32)
    }

    /// Acquire the microphone and start buffering
    ///
    /// On failure the recorder stays idle and the error is returned for the
    /// caller to surface.
    pub fn start_recording(&mut self) -> Result<()> {
        if self.state == RecorderState::Recording {
            return Err(OpalError::InvalidTransition(
                "A recording is already in progress".into(),
            ));
        }

        let (chunk_tx, chunk_rx) = unbounded();
        match self.source.open(chunk_tx) {
            Ok(format) => {
                self.format = format;
                self.buffer.clear();
                self.chunk_rx = Some(chunk_rx);
                self.state = RecorderState::Recording;
                info!("Recording started ({} Hz)", format.sample_rate);
                Ok(())
            }
            Err(e) => {
                warn!("Microphone access failed: {}", e);
                Err(e)
            }
        }
    }

    /// Move chunks that have arrived from the device into the buffer
    /// Returns the number of chunks buffered
    pub fn poll_chunks(&mut self) -> usize {
        let Some(rx) = &self.chunk_rx else {
            return 0;
        };

        let mut buffered = 0;
        while let Ok(chunk) = rx.try_recv() {
            if self.buffer.push(chunk) {
                buffered += 1;
            }
        }
        buffered
    }

    /// Buffer a chunk directly
    pub fn push_chunk(&mut self, chunk: Vec<f32>) -> Result<()> {
        if self.state != RecorderState::Recording {
            return Err(OpalError::InvalidTransition("Not recording".into()));
        }
        self.buffer.push(chunk);
        Ok(())
    }

    /// Release the microphone and finalize the buffered audio into a clip
    ///
    /// A recording with no chunks still yields a valid (empty) clip.
    pub fn stop_recording(&mut self) -> Result<AudioClip> {
        if self.state != RecorderState::Recording {
            return Err(OpalError::InvalidTransition("Not recording".into()));
        }

        self.poll_chunks();
        self.source.close();
        self.chunk_rx = None;
        self.state = RecorderState::Idle;

        let chunks = self.buffer.chunk_count();
        let samples = self.buffer.take_samples();
        debug!("Recording stopped with {} chunks, {} samples", chunks, samples.len());

        let data = encode_wav(&samples, self.format.sample_rate, self.format.channels)?;
        info!("Recording finalized ({} bytes)", data.len());
        Ok(AudioClip::new(WAV_MIME_TYPE, data))
    }
}

impl Drop for AudioRecorder {
    fn drop(&mut self) {
        if self.state == RecorderState::Recording {
            self.source.close();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::Sender;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[derive(Default)]
    struct Probe {
        sender: Option<Sender<Vec<f32>>>,
        opened: usize,
        closed: usize,
    }

    struct FakeSource {
        deny: bool,
        probe: Arc<Mutex<Probe>>,
    }

    impl AudioSource for FakeSource {
        fn open(&mut self, chunk_tx: Sender<Vec<f32>>) -> Result<StreamFormat> {
            if self.deny {
                return Err(OpalError::MicrophonePermission("denied".into()));
            }
            let mut probe = self.probe.lock();
            probe.opened += 1;
            probe.sender = Some(chunk_tx);
            Ok(StreamFormat {
                sample_rate: 8000,
                channels: 1,
            })
        }

        fn close(&mut self) {
            let mut probe = self.probe.lock();
            probe.closed += 1;
            probe.sender = None;
        }

        fn is_open(&self) -> bool {
            self.probe.lock().sender.is_some()
        }
    }

    fn recorder(deny: bool) -> (AudioRecorder, Arc<Mutex<Probe>>) {
        let probe = Arc::new(Mutex::new(Probe::default()));
        let source = FakeSource {
            deny,
            probe: Arc::clone(&probe),
        };
        (AudioRecorder::new(Box::new(source)), probe)
    }

    #[test]
    fn test_record_and_finalize() {
        let (mut rec, probe) = recorder(false);
        rec.start_recording().unwrap();
        assert!(rec.is_recording());

        let tx = probe.lock().sender.clone().unwrap();
        tx.send(vec![0.1; 800]).unwrap();
        tx.send(Vec::new()).unwrap();
        tx.send(vec![-0.1; 800]).unwrap();

        assert_eq!(rec.poll_chunks(), 2);
        assert!((rec.buffered_seconds() - 0.2).abs() < 1e-6);

        let clip = rec.stop_recording().unwrap();
        assert_eq!(rec.state(), RecorderState::Idle);
        assert_eq!(clip.mime_type(), "audio/wav");
        assert!(clip.len() > 1600 * 2);

        let probe = probe.lock();
        assert_eq!(probe.opened, 1);
        assert_eq!(probe.closed, 1);
        assert!(probe.sender.is_none());
    }

    #[test]
    fn test_stop_drains_pending_chunks() {
        let (mut rec, probe) = recorder(false);
        rec.start_recording().unwrap();

        let tx = probe.lock().sender.clone().unwrap();
        tx.send(vec![0.5; 10]).unwrap();

        let clip = rec.stop_recording().unwrap();
        let empty = {
            rec.start_recording().unwrap();
            rec.stop_recording().unwrap()
        };
        assert_eq!(clip.len(), empty.len() + 20);
    }

    #[test]
    fn test_permission_denied_stays_idle() {
        let (mut rec, probe) = recorder(true);
        let err = rec.start_recording().unwrap_err();

        assert!(matches!(err, OpalError::MicrophonePermission(_)));
        assert_eq!(rec.state(), RecorderState::Idle);
        assert_eq!(probe.lock().opened, 0);
    }

    #[test]
    fn test_zero_chunks_yield_valid_clip() {
        let (mut rec, _probe) = recorder(false);
        rec.start_recording().unwrap();

        let clip = rec.stop_recording().unwrap();
        assert!(!clip.is_empty());
        assert_eq!(&clip.data()[0..4], b"RIFF");
    }

    #[test]
    fn test_invalid_transitions() {
        let (mut rec, probe) = recorder(false);
        assert!(matches!(rec.stop_recording(), Err(OpalError::InvalidTransition(_))));
        assert!(matches!(rec.push_chunk(vec![0.0]), Err(OpalError::InvalidTransition(_))));

        rec.start_recording().unwrap();
        assert!(matches!(rec.start_recording(), Err(OpalError::InvalidTransition(_))));
        assert_eq!(probe.lock().opened, 1);
    }

    #[test]
    fn test_injected_chunks() {
        let (mut rec, _probe) = recorder(false);
        rec.start_recording().unwrap();
        rec.push_chunk(vec![0.2; 4]).unwrap();
        rec.push_chunk(vec![0.2; 4]).unwrap();
        assert_eq!(rec.buffered_chunks(), 2);
    }

    #[test]
    fn test_drop_releases_device() {
        let (mut rec, probe) = recorder(false);
        rec.start_recording().unwrap();
        drop(rec);
        assert_eq!(probe.lock().closed, 1);
    }
}
