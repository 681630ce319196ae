//! Command sequence → waypoints

use command_interpreter::{Command, CommandKind};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::Vec2;

/// Per-command walk limit in metres. Longer walks are truncated, not rejected.
pub const MAX_WALK_DISTANCE_M: f64 = 3.0;

/// Robot position and facing, carried between planning calls by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Vec2,
    /// Facing direction; not re-normalised between calls
    pub heading: Vec2,
}

impl Pose {
    pub fn new(position: Vec2, heading: Vec2) -> Self {
        Self { position, heading }
    }
}

/// Session start: origin, facing +x.
impl Default for Pose {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            heading: Vec2::UNIT_X,
        }
    }
}

/// Output of one planning call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    /// One entry per WALK command, in command order
    pub waypoints: Vec<Vec2>,
    /// Pose after all commands; feed it into the next call
    pub pose: Pose,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrajectoryPlanner {
    max_walk_distance_m: f64,
}

impl Default for TrajectoryPlanner {
    fn default() -> Self {
        Self {
            max_walk_distance_m: MAX_WALK_DISTANCE_M,
        }
    }
}

impl TrajectoryPlanner {
    /// The limit is clamped into `0..=MAX_WALK_DISTANCE_M`. A NaN limit
    /// becomes 0, so a bad value can stop walks but never reverse or
    /// lengthen them.
    pub fn new(max_walk_distance_m: f64) -> Self {
        let limit = if max_walk_distance_m.is_nan() {
            0.0
        } else {
            max_walk_distance_m.clamp(0.0, MAX_WALK_DISTANCE_M)
        };
        if limit != max_walk_distance_m {
            warn!(
                requested = max_walk_distance_m,
                limit, "walk limit out of range; clamped"
            );
        }
        Self {
            max_walk_distance_m: limit,
        }
    }

    pub fn max_walk_distance_m(&self) -> f64 {
        self.max_walk_distance_m
    }

    /// Apply `commands` in order starting from `pose`.
    pub fn plan(&self, commands: &[Command], pose: Pose) -> Plan {
        let mut position = pose.position;
        let mut heading = pose.heading;
        let mut waypoints = Vec::new();

        for cmd in commands {
            match cmd.kind {
                CommandKind::Walk => {
                    let sign = if cmd.direction == "backward" { -1.0 } else { 1.0 };
                    let distance = cmd.amount.min(self.max_walk_distance_m);
                    if distance < cmd.amount {
                        debug!(
                            requested = cmd.amount,
                            limit = self.max_walk_distance_m,
                            "walk distance truncated"
                        );
                    }
                    position += heading.normalized() * (sign * distance);
                    waypoints.push(position);
                    trace!(%position, "walk waypoint");
                }
                CommandKind::Turn => {
                    let sign = if cmd.direction == "right" { -1.0 } else { 1.0 };
                    heading = heading.rotated_deg(cmd.amount.abs() * sign);
                    trace!(%heading, "turned");
                }
                // Gestures are handled by the actuation layer.
                _ => {}
            }
        }

        Plan {
            waypoints,
            pose: Pose { position, heading },
        }
    }
}

/// Plan with the default 3 m walk limit.
pub fn plan(commands: &[Command], pose: Pose) -> Plan {
    TrajectoryPlanner::default().plan(commands, pose)
}
