use crate::{AsrSegment, AsrStream, AudioFormat, Result, Transcriber, VoiceError};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use time::OffsetDateTime;

/// Spacing of utterances in [`MockAsrStream::from_utterances`].
pub const MOCK_SEGMENT_MS: u64 = 1000;

/// Returns scripted transcripts in order, then empty strings.
pub struct MockTranscriber {
    script: Mutex<VecDeque<String>>,
    failure: Option<String>,
}

impl MockTranscriber {
    pub fn new<I, S>(script: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            script: Mutex::new(script.into_iter().map(Into::into).collect()),
            failure: None,
        }
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            failure: Some(message.into()),
        }
    }

    /// Transcripts not yet handed out.
    pub fn remaining(&self) -> usize {
        self.script.lock().map(|s| s.len()).unwrap_or(0)
    }
}

#[async_trait]
impl Transcriber for MockTranscriber {
    async fn transcribe(&self, _wav: &[u8]) -> Result<String> {
        if let Some(msg) = &self.failure {
            return Err(VoiceError::Request(msg.clone()));
        }
        let next = self
            .script
            .lock()
            .map_err(|_| VoiceError::Request("mock script poisoned".into()))?
            .pop_front();
        Ok(next.unwrap_or_default())
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// Streaming recogniser that releases scripted segments once enough audio
/// has been pushed to cover them, or all at once after `finish`.
pub struct MockAsrStream {
    format: AudioFormat,
    pending: VecDeque<AsrSegment>,
    samples: u64,
    finished: bool,
}

impl MockAsrStream {
    pub fn new(format: AudioFormat, segments: impl IntoIterator<Item = AsrSegment>) -> Self {
        Self {
            format,
            pending: segments.into_iter().collect(),
            samples: 0,
            finished: false,
        }
    }

    /// One utterance per [`MOCK_SEGMENT_MS`], each preceded by an interim
    /// hypothesis holding its first word.
    pub fn from_utterances<I, S>(format: AudioFormat, utterances: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let half = MOCK_SEGMENT_MS / 2;
        let mut segments = Vec::new();
        for (i, text) in utterances.into_iter().enumerate() {
            let text: String = text.into();
            let start_ms = i as u64 * MOCK_SEGMENT_MS;
            let interim = text.split_whitespace().next().unwrap_or_default();
            segments.push(AsrSegment {
                start_ms,
                end_ms: start_ms + half,
                text: interim.to_string(),
                is_final: false,
                ts: Some(OffsetDateTime::now_utc()),
            });
            segments.push(AsrSegment {
                start_ms,
                end_ms: start_ms + MOCK_SEGMENT_MS,
                text,
                is_final: true,
                ts: Some(OffsetDateTime::now_utc()),
            });
        }
        Self::new(format, segments)
    }

    /// Milliseconds of audio pushed so far.
    pub fn heard_ms(&self) -> u64 {
        self.format.duration_ms(self.samples as usize)
    }
}

impl AsrStream for MockAsrStream {
    fn push_audio(&mut self, pcm: &[i16]) {
        self.samples += pcm.len() as u64;
    }

    fn poll(&mut self) -> Option<AsrSegment> {
        let ready = self
            .pending
            .front()
            .is_some_and(|s| self.finished || s.end_ms <= self.heard_ms());
        if ready {
            self.pending.pop_front()
        } else {
            None
        }
    }

    fn finish(&mut self) {
        self.finished = true;
    }

    fn name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_then_empty() {
        let asr = MockTranscriber::new(["Spot, walk forward", "Spot, bow"]);
        assert_eq!(asr.transcribe(b"").await.unwrap(), "Spot, walk forward");
        assert_eq!(asr.remaining(), 1);
        assert_eq!(asr.transcribe(b"").await.unwrap(), "Spot, bow");
        assert_eq!(asr.transcribe(b"").await.unwrap(), "");
    }

    #[tokio::test]
    async fn test_failing() {
        let asr = MockTranscriber::failing("offline");
        assert!(matches!(
            asr.transcribe(b"").await,
            Err(VoiceError::Request(_))
        ));
    }

    #[test]
    fn test_from_utterances_interleaves_interim() {
        let mut asr = MockAsrStream::from_utterances(AudioFormat::default(), ["Spot, sit down"]);
        asr.finish();
        let first = asr.poll().unwrap();
        assert!(!first.is_final);
        assert_eq!(first.text, "Spot,");
        let second = asr.poll().unwrap();
        assert!(second.is_deliverable());
        assert_eq!((second.start_ms, second.end_ms), (0, MOCK_SEGMENT_MS));
        assert!(asr.poll().is_none());
    }
}
