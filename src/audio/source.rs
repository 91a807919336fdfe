use crate::{OpalError, Result};
use crossbeam_channel::Sender;

/// Format of the mono chunks a source delivers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamFormat {
    pub sample_rate: u32,
    pub channels: u16,
}

impl Default for StreamFormat {
    fn default() -> Self {
        Self {
            sample_rate: 16000,
            channels: 1,
        }
    }
}

/// A capture device the recorder can acquire and release.
///
/// `open` acquires the device and starts delivering chunks on `chunk_tx`;
/// `close` must release the device. Acquisition failures are reported as
/// [`OpalError::MicrophonePermission`].
pub trait AudioSource {
    fn open(&mut self, chunk_tx: Sender<Vec<f32>>) -> Result<StreamFormat>;

    fn close(&mut self);

    fn is_open(&self) -> bool;
}

/// Source used when audio input is disabled; it can never be opened
#[derive(Debug, Default)]
pub struct NoMicrophone;

impl AudioSource for NoMicrophone {
    fn open(&mut self, _chunk_tx: Sender<Vec<f32>>) -> Result<StreamFormat> {
        Err(OpalError::MicrophonePermission(
            "Audio input is disabled".to_string(),
        ))
    }

    fn close(&mut self) {}

    fn is_open(&self) -> bool {
        false
    }
}
