//! Typed robot commands exchanged between the interpreter and the planner

use core::fmt;
use serde::{Deserialize, Serialize};

/// Direction value used when the speaker gave none.
pub const UNKNOWN_DIRECTION: &str = "unknown";

/// Kind of a locomotion or gesture command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum CommandKind {
    /// Walk forward or backward by a distance in metres
    Walk,
    /// Turn in place by an angle in degrees
    Turn,
    /// Bow gesture
    Bow,
    /// Dance gesture (the `DUST_OFF` routine)
    #[serde(rename = "DUST_OFF", alias = "DANCE")]
    Dance,
}

impl CommandKind {
    /// Tag used on the canonical command line.
    pub fn tag(&self) -> &'static str {
        match self {
            CommandKind::Walk => "WALK",
            CommandKind::Turn => "TURN",
            CommandKind::Bow => "BOW",
            CommandKind::Dance => "DUST_OFF",
        }
    }

    /// Gestures are executed by the actuation layer and never move the pose.
    pub fn is_gesture(&self) -> bool {
        matches!(self, CommandKind::Bow | CommandKind::Dance)
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A single interpreted command.
///
/// `amount` is metres for [`CommandKind::Walk`], degrees for
/// [`CommandKind::Turn`] and zero otherwise. The serde field names match the
/// JSON shape the robot-side tooling already consumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Command {
    #[serde(rename = "command")]
    pub kind: CommandKind,
    #[serde(rename = "dir")]
    pub direction: String,
    pub amount: f64,
    #[serde(default)]
    pub duration: f64,
}

impl Command {
    pub fn walk(direction: impl Into<String>, distance_m: f64, duration_s: f64) -> Self {
        Self {
            kind: CommandKind::Walk,
            direction: direction.into(),
            amount: distance_m,
            duration: duration_s,
        }
    }

    pub fn turn(direction: impl Into<String>, angle_deg: f64) -> Self {
        Self {
            kind: CommandKind::Turn,
            direction: direction.into(),
            amount: angle_deg,
            duration: 0.0,
        }
    }

    pub fn bow() -> Self {
        Self::gesture(CommandKind::Bow)
    }

    pub fn dance() -> Self {
        Self::gesture(CommandKind::Dance)
    }

    fn gesture(kind: CommandKind) -> Self {
        Self {
            kind,
            direction: UNKNOWN_DIRECTION.to_string(),
            amount: 0.0,
            duration: 0.0,
        }
    }
}

/// Renders the canonical command line, e.g. `WALK forward 2 0`.
impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            CommandKind::Walk => write!(
                f,
                "{} {} {} {}",
                self.kind.tag(),
                self.direction,
                self.amount,
                self.duration
            ),
            CommandKind::Turn => {
                write!(f, "{} {} {}", self.kind.tag(), self.direction, self.amount)
            }
            CommandKind::Bow | CommandKind::Dance => f.write_str(self.kind.tag()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_matches_canonical_lines() {
        assert_eq!(Command::walk("forward", 2.0, 0.0).to_string(), "WALK forward 2 0");
        assert_eq!(Command::turn("left", 45.5).to_string(), "TURN left 45.5");
        assert_eq!(Command::bow().to_string(), "BOW");
        assert_eq!(Command::dance().to_string(), "DUST_OFF");
    }

    #[test]
    fn test_serde_field_names() {
        let json = serde_json::to_value(Command::turn("right", 90.0)).unwrap();
        assert_eq!(json["command"], "TURN");
        assert_eq!(json["dir"], "right");
        assert_eq!(json["amount"], 90.0);
        assert_eq!(json["duration"], 0.0);
    }

    #[test]
    fn test_dance_is_dust_off_on_the_wire() {
        let json = serde_json::to_value(Command::dance()).unwrap();
        assert_eq!(json["command"], "DUST_OFF");

        let cmd: Command =
            serde_json::from_str(r#"{"command":"DANCE","dir":"unknown","amount":0}"#).unwrap();
        assert_eq!(cmd.kind, CommandKind::Dance);
        assert_eq!(cmd.duration, 0.0);
        assert!(cmd.kind.is_gesture());
    }
}
