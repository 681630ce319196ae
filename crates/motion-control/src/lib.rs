//! motion-control: actuation abstractions for the robot
//!
//! The planner emits goal waypoints; a [`MotionController`] executes them in
//! order through `move_to_goal(x, y)`. Leasing, stand-up and balance are the
//! robot SDK's job and stay behind this trait. The default build enables a
//! `mock` controller so binaries run without a robot.

mod types;
pub use types::{MotionEvent, MotionRequest};

mod error;
pub use error::{MotionError, Result};

mod traits;
pub use traits::MotionController;

#[cfg(feature = "mock")]
mod mock;

#[cfg(feature = "mock")]
pub use mock::MockController;
