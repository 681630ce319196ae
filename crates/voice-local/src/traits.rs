use crate::{AsrSegment, Result};
use async_trait::async_trait;

/// Batch speech-to-text: a complete WAV file in, one transcript string out.
#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(&self, wav: &[u8]) -> Result<String>;

    /// Backend name for logs
    fn name(&self) -> &str;
}

#[async_trait]
impl<T: Transcriber + ?Sized> Transcriber for Box<T> {
    async fn transcribe(&self, wav: &[u8]) -> Result<String> {
        (**self).transcribe(wav).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Streaming speech-to-text: PCM is pushed as it is captured and segments
/// are polled out as the recogniser produces them.
pub trait AsrStream: Send {
    fn push_audio(&mut self, pcm: &[i16]);

    fn poll(&mut self) -> Option<AsrSegment>;

    /// No more audio will arrive; pending segments become pollable.
    fn finish(&mut self) {}

    fn name(&self) -> &str;
}

impl<T: AsrStream + ?Sized> AsrStream for Box<T> {
    fn push_audio(&mut self, pcm: &[i16]) {
        (**self).push_audio(pcm)
    }

    fn poll(&mut self) -> Option<AsrSegment> {
        (**self).poll()
    }

    fn finish(&mut self) {
        (**self).finish()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
