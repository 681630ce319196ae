//! voice-local: speech capture and transcription
//!
//! Audio is recorded in fixed-length chunks, encoded as WAV and handed to a
//! [`Transcriber`]. The Whisper backend calls the OpenAI audio API; the mock
//! backend replays scripted transcripts.
//!
//! Streaming recognisers implement [`AsrStream`]; wrap one in
//! [`FinalSegments`] to see only final, non-blank segments.

mod error;
pub use error::{Result, VoiceError};

mod types;
pub use types::{AsrSegment, AudioFormat, Transcript, TranscriptionConfig, WhisperEndpoint};

mod traits;
pub use traits::{AsrStream, Transcriber};

mod stream;
pub use stream::FinalSegments;

mod wav;
pub use wav::{encode_wav, write_wav_file};

#[cfg(feature = "mock")]
mod mock;
#[cfg(feature = "mock")]
pub use mock::{MockAsrStream, MockTranscriber, MOCK_SEGMENT_MS};

#[cfg(feature = "whisper")]
mod whisper;
#[cfg(feature = "whisper")]
pub use whisper::WhisperTranscriber;

#[cfg(feature = "audio")]
pub mod mic;

pub mod plugin;
pub use plugin::{new_asr_stream, new_transcriber, TranscriberKind};
