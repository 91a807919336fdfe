use crate::audio::source::{AudioSource, StreamFormat};
use crate::{OpalError, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::Stream;
use crossbeam_channel::Sender;
use tracing::{debug, error, info};

/// Default system microphone
///
/// The device is looked up on every `open` so a microphone plugged in (or
/// access granted) after startup is picked up on the next attempt.
#[derive(Default)]
pub struct Microphone {
    stream: Option<Stream>,
}

impl Microphone {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AudioSource for Microphone {
    fn open(&mut self, chunk_tx: Sender<Vec<f32>>) -> Result<StreamFormat> {
        if self.stream.is_some() {
            return Err(OpalError::InvalidTransition("Microphone is already open".into()));
        }

        let host = cpal::default_host();

        let device = host
            .default_input_device()
            .ok_or_else(|| OpalError::MicrophonePermission("No input device available".into()))?;

        info!("Using input device: {}", device.name().unwrap_or_else(|_| "Unknown".to_string()));

        let config: cpal::StreamConfig = device
            .default_input_config()
            .map_err(|e| OpalError::MicrophonePermission(format!("Failed to get input config: {}", e)))?
            .into();

        let channels = config.channels as usize;

        let err_fn = |err| {
            error!("Audio input stream error: {}", err);
        };

        let stream = device
            .build_input_stream(
                &config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    // Convert to mono if necessary
                    let samples = if channels == 1 {
                        data.to_vec()
                    } else {
                        data.chunks(channels)
                            .map(|frame| frame.iter().sum::<f32>() / channels as f32)
                            .collect()
                    };

                    if let Err(e) = chunk_tx.send(samples) {
                        debug!("Recorder dropped, discarding chunk: {}", e);
                    }
                },
                err_fn,
                None,
            )
            .map_err(|e| OpalError::MicrophonePermission(format!("Failed to build input stream: {}", e)))?;

        stream
            .play()
            .map_err(|e| OpalError::MicrophonePermission(format!("Failed to start input stream: {}", e)))?;

        self.stream = Some(stream);

        info!("Microphone opened at {} Hz", config.sample_rate.0);
        Ok(StreamFormat {
            sample_rate: config.sample_rate.0,
            channels: 1,
        })
    }

    fn close(&mut self) {
        if let Some(stream) = self.stream.take() {
            drop(stream);
            info!("Microphone released");
        }
    }

    fn is_open(&self) -> bool {
        self.stream.is_some()
    }
}

impl Drop for Microphone {
    fn drop(&mut self) {
        self.close();
    }
}
