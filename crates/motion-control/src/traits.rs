use crate::{MotionError, Result};

/// A robot that accepts goal positions in its odometry frame.
///
/// Goals are `x` metres forward and `y` metres left of the session origin.
/// Calls block until the controller accepts (or rejects) the goal.
pub trait MotionController {
    /// Controller name for logs.
    fn name(&self) -> &str;

    /// Walk to the goal position.
    fn move_to_goal(&mut self, x: f64, y: f64) -> Result<()>;

    /// Perform the bow gesture.
    fn bow(&mut self) -> Result<()> {
        Err(MotionError::Unsupported("bow"))
    }

    /// Perform the dance routine.
    fn dance(&mut self) -> Result<()> {
        Err(MotionError::Unsupported("dance"))
    }
}

impl<T: MotionController + ?Sized> MotionController for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn move_to_goal(&mut self, x: f64, y: f64) -> Result<()> {
        (**self).move_to_goal(x, y)
    }

    fn bow(&mut self) -> Result<()> {
        (**self).bow()
    }

    fn dance(&mut self) -> Result<()> {
        (**self).dance()
    }
}
