use core::fmt;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// One actuation request as issued to a controller.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum MotionRequest {
    Goal { x: f64, y: f64 },
    Bow,
    Dance,
}

impl fmt::Display for MotionRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MotionRequest::Goal { x, y } => write!(f, "goal ({x:.3}, {y:.3})"),
            MotionRequest::Bow => write!(f, "bow"),
            MotionRequest::Dance => write!(f, "dance"),
        }
    }
}

/// A request together with the time it was issued.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MotionEvent {
    pub request: MotionRequest,
    #[serde(with = "time::serde::rfc3339")]
    pub at: OffsetDateTime,
}
