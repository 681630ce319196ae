use crate::{MotionController, MotionError, MotionEvent, MotionRequest, Result};
use time::OffsetDateTime;
use tracing::info;

/// In-process controller that records every request. Each instance is independent.
#[derive(Debug, Default)]
pub struct MockController {
    events: Vec<MotionEvent>,
    reject_goals: bool,
}

impl MockController {
    pub fn new() -> Self {
        Self::default()
    }

    /// A controller that rejects every goal, for exercising error paths.
    pub fn rejecting() -> Self {
        Self {
            events: Vec::new(),
            reject_goals: true,
        }
    }

    pub fn events(&self) -> &[MotionEvent] {
        &self.events
    }

    pub fn requests(&self) -> Vec<MotionRequest> {
        self.events.iter().map(|e| e.request.clone()).collect()
    }

    fn record(&mut self, request: MotionRequest) {
        info!(controller = "mock", "{request}");
        self.events.push(MotionEvent {
            request,
            at: OffsetDateTime::now_utc(),
        });
    }
}

impl MotionController for MockController {
    fn name(&self) -> &str {
        "mock"
    }

    fn move_to_goal(&mut self, x: f64, y: f64) -> Result<()> {
        if self.reject_goals {
            return Err(MotionError::Rejected(format!("({x}, {y})")));
        }
        self.record(MotionRequest::Goal { x, y });
        Ok(())
    }

    fn bow(&mut self) -> Result<()> {
        self.record(MotionRequest::Bow);
        Ok(())
    }

    fn dance(&mut self) -> Result<()> {
        self.record(MotionRequest::Dance);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_in_order() -> anyhow::Result<()> {
        let mut ctl = MockController::new();
        ctl.move_to_goal(1.0, 0.0)?;
        ctl.bow()?;
        ctl.move_to_goal(1.0, 2.0)?;
        ctl.dance()?;
        assert_eq!(
            ctl.requests(),
            vec![
                MotionRequest::Goal { x: 1.0, y: 0.0 },
                MotionRequest::Bow,
                MotionRequest::Goal { x: 1.0, y: 2.0 },
                MotionRequest::Dance,
            ]
        );
        Ok(())
    }

    #[test]
    fn test_rejecting_controller() {
        let mut ctl = MockController::rejecting();
        assert!(matches!(
            ctl.move_to_goal(3.0, 0.0),
            Err(MotionError::Rejected(_))
        ));
        assert!(ctl.events().is_empty());
    }

    #[test]
    fn test_boxed_controller_defaults() {
        struct GoalsOnly;
        impl MotionController for GoalsOnly {
            fn name(&self) -> &str {
                "goals-only"
            }
            fn move_to_goal(&mut self, _x: f64, _y: f64) -> Result<()> {
                Ok(())
            }
        }
        let mut ctl: Box<dyn MotionController> = Box::new(GoalsOnly);
        assert!(ctl.move_to_goal(0.0, 0.0).is_ok());
        assert!(matches!(ctl.bow(), Err(MotionError::Unsupported("bow"))));
        assert_eq!(ctl.name(), "goals-only");
    }
}
