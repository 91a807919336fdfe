pub mod buffer;
pub mod clip;
#[cfg(feature = "audio-io")]
pub mod input;
pub mod recorder;
pub mod source;
pub mod wav;

pub use buffer::CaptureBuffer;
pub use clip::AudioClip;
#[cfg(feature = "audio-io")]
pub use input::Microphone;
pub use recorder::{AudioRecorder, RecorderState};
pub use source::{AudioSource, NoMicrophone, StreamFormat};
pub use wav::{encode_wav, WAV_MIME_TYPE};

/// The system microphone, or a source that always refuses when audio input
/// is compiled out or disabled
pub fn default_source(enable_audio_input: bool) -> Box<dyn AudioSource> {
    #[cfg(feature = "audio-io")]
    if enable_audio_input {
        return Box::new(Microphone::new());
    }

    if enable_audio_input {
        tracing::warn!("Built without audio-io, voice input is unavailable");
    }
    Box::new(NoMicrophone)
}
