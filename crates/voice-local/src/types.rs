use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Which Whisper route to call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WhisperEndpoint {
    /// `/audio/translations`: any spoken language comes back as English
    #[default]
    Translations,
    /// `/audio/transcriptions`: text in the spoken language
    Transcriptions,
}

impl WhisperEndpoint {
    pub fn path(&self) -> &'static str {
        match self {
            WhisperEndpoint::Translations => "audio/translations",
            WhisperEndpoint::Transcriptions => "audio/transcriptions",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptionConfig {
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Falls back to `OPENAI_API_KEY` when unset
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default)]
    pub endpoint: WhisperEndpoint,
    /// Optional ISO-639-1 hint, only sent to the transcriptions route
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_api_base() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "whisper-1".to_string()
}

fn default_timeout_ms() -> u64 {
    30_000
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            api_key: None,
            model: default_model(),
            endpoint: WhisperEndpoint::default(),
            language: None,
            timeout_ms: default_timeout_ms(),
        }
    }
}

/// Text recognised in one audio chunk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcript {
    pub text: String,
    /// Length of the transcribed audio
    pub audio_ms: u64,
    pub ts: Option<OffsetDateTime>,
}

impl Transcript {
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// One hypothesis from a streaming recogniser, timed against the audio
/// pushed so far.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AsrSegment {
    pub start_ms: u64,
    pub end_ms: u64,
    pub text: String,
    /// Interim hypotheses may still be revised by the recogniser
    pub is_final: bool,
    pub ts: Option<OffsetDateTime>,
}

impl AsrSegment {
    /// Final and non-blank: the only segments worth acting on.
    pub fn is_deliverable(&self) -> bool {
        self.is_final && !self.text.trim().is_empty()
    }
}

/// Mono PCM capture settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioFormat {
    pub sample_rate_hz: u32,
    pub channels: u16,
}

impl Default for AudioFormat {
    fn default() -> Self {
        Self {
            sample_rate_hz: 16_000,
            channels: 1,
        }
    }
}

impl AudioFormat {
    /// Duration of `samples` interleaved samples in milliseconds.
    pub fn duration_ms(&self, samples: usize) -> u64 {
        let frames = samples as u64 / u64::from(self.channels.max(1));
        frames * 1000 / u64::from(self.sample_rate_hz.max(1))
    }
}
