use thiserror::Error;

pub type Result<T, E = VoiceError> = core::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum VoiceError {
    #[error("transcription request failed: {0}")]
    Request(String),
    #[error("transcription service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("timed out waiting for transcription")]
    Timeout,
    #[error("audio device error: {0}")]
    Device(String),
    #[error("WAV encoding error: {0}")]
    Wav(String),
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<hound::Error> for VoiceError {
    fn from(e: hound::Error) -> Self {
        VoiceError::Wav(e.to_string())
    }
}

#[cfg(feature = "whisper")]
impl From<reqwest::Error> for VoiceError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            VoiceError::Timeout
        } else {
            VoiceError::Request(e.to_string())
        }
    }
}
