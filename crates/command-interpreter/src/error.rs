use thiserror::Error;

pub type Result<T, E = InterpretError> = core::result::Result<T, E>;

/// Failures of the language-model step. Malformed command text is never
/// reported here; the parser drops it instead.
#[derive(Debug, Error)]
pub enum InterpretError {
    #[error("model request failed: {0}")]
    Model(String),
    #[error("model returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("timed out waiting for model")]
    Timeout,
    #[error("invalid model response: {0}")]
    InvalidResponse(String),
    #[error("configuration error: {0}")]
    Config(String),
}

#[cfg(feature = "openai")]
impl From<reqwest::Error> for InterpretError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            InterpretError::Timeout
        } else if e.is_decode() {
            InterpretError::InvalidResponse(e.to_string())
        } else {
            InterpretError::Model(e.to_string())
        }
    }
}
