use crate::{AsrSegment, AsrStream};
use tracing::trace;

/// Passes through only final, non-blank segments of the wrapped stream.
/// Interim hypotheses and empty finals are counted and dropped.
pub struct FinalSegments<S> {
    inner: S,
    dropped: u64,
}

impl<S: AsrStream> FinalSegments<S> {
    pub fn new(inner: S) -> Self {
        Self { inner, dropped: 0 }
    }

    /// Segments filtered out so far.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: AsrStream> AsrStream for FinalSegments<S> {
    fn push_audio(&mut self, pcm: &[i16]) {
        self.inner.push_audio(pcm)
    }

    fn poll(&mut self) -> Option<AsrSegment> {
        while let Some(seg) = self.inner.poll() {
            if seg.is_deliverable() {
                return Some(seg);
            }
            trace!(text = %seg.text, is_final = seg.is_final, "segment dropped");
            self.dropped += 1;
        }
        None
    }

    fn finish(&mut self) {
        self.inner.finish()
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}
