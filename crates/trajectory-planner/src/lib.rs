//! trajectory-planner: command sequences to 2D waypoints
//!
//! Planning is pure and deterministic. The caller owns the [`Pose`] and feeds
//! the pose returned by one call into the next, one utterance at a time.

mod vec2;
pub use vec2::Vec2;

mod planner;
pub use planner::{plan, Plan, Pose, TrajectoryPlanner, MAX_WALK_DISTANCE_M};
