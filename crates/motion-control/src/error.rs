use thiserror::Error;

pub type Result<T, E = MotionError> = core::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum MotionError {
    #[error("robot not available: {0}")]
    NotConnected(String),
    #[error("operation not supported by this controller: {0}")]
    Unsupported(&'static str),
    #[error("goal rejected: {0}")]
    Rejected(String),
    #[error("timeout")]
    Timeout,
}
