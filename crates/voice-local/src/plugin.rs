#[cfg(feature = "mock")]
use crate::{MockAsrStream, MockTranscriber};
#[cfg(feature = "whisper")]
use crate::WhisperTranscriber;
use crate::{AsrStream, AudioFormat, Result, Transcriber, TranscriptionConfig, VoiceError};
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TranscriberKind {
    Mock,
    Whisper,
}

/// Build a transcription backend. `script` feeds the mock backend.
pub fn new_transcriber(
    kind: TranscriberKind,
    cfg: TranscriptionConfig,
    script: Vec<String>,
) -> Result<Box<dyn Transcriber>> {
    match kind {
        TranscriberKind::Mock => {
            #[cfg(feature = "mock")]
            {
                let _ = cfg;
                Ok(Box::new(MockTranscriber::new(script)))
            }
            #[cfg(not(feature = "mock"))]
            {
                let _ = (cfg, script);
                Err(VoiceError::Config("mock feature not enabled".into()))
            }
        }
        TranscriberKind::Whisper => {
            #[cfg(feature = "whisper")]
            {
                let _ = script;
                WhisperTranscriber::new(cfg).map(|t| Box::new(t) as Box<dyn Transcriber>)
            }
            #[cfg(not(feature = "whisper"))]
            {
                let _ = (cfg, script);
                Err(VoiceError::Config("whisper feature not enabled".into()))
            }
        }
    }
}

/// Build a streaming recogniser. Only the mock backend streams; Whisper
/// works on whole chunks.
pub fn new_asr_stream(
    kind: TranscriberKind,
    format: AudioFormat,
    script: Vec<String>,
) -> Result<Box<dyn AsrStream>> {
    match kind {
        TranscriberKind::Mock => {
            #[cfg(feature = "mock")]
            {
                Ok(Box::new(MockAsrStream::from_utterances(format, script)))
            }
            #[cfg(not(feature = "mock"))]
            {
                let _ = (format, script);
                Err(VoiceError::Config("mock feature not enabled".into()))
            }
        }
        TranscriberKind::Whisper => {
            let _ = (format, script);
            Err(VoiceError::Config(
                "whisper has no streaming mode; use chunked capture".into(),
            ))
        }
    }
}

#[cfg(all(test, feature = "mock"))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_backend_uses_script() {
        let t = new_transcriber(
            TranscriberKind::Mock,
            TranscriptionConfig::default(),
            vec!["Spot, dance".into()],
        )
        .unwrap();
        assert_eq!(t.name(), "mock");
        assert_eq!(t.transcribe(b"").await.unwrap(), "Spot, dance");
    }

    #[test]
    fn test_kind_from_config_text() {
        let kind: TranscriberKind = serde_json::from_str("\"whisper\"").unwrap();
        assert_eq!(kind, TranscriberKind::Whisper);
    }

    #[test]
    fn test_mock_stream_yields_script_finals() {
        let stream = new_asr_stream(
            TranscriberKind::Mock,
            AudioFormat::default(),
            vec!["Spot, bow".into(), "".into()],
        )
        .unwrap();
        let mut finals = crate::FinalSegments::new(stream);
        finals.finish();
        assert_eq!(finals.poll().map(|s| s.text).as_deref(), Some("Spot, bow"));
        assert!(finals.poll().is_none());
        // interim "Spot," plus the empty utterance's interim and final
        assert_eq!(finals.dropped(), 3);
    }

    #[test]
    fn test_whisper_cannot_stream() {
        let err = new_asr_stream(TranscriberKind::Whisper, AudioFormat::default(), vec![])
            .err()
            .unwrap();
        assert!(matches!(err, VoiceError::Config(_)));
    }
}
