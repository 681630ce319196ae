//! Parser for canonical command lines
//!
//! Lines have the shape `WALK <dir> <distance> <duration>`,
//! `TURN <dir> <angle>`, `BOW` or `DUST_OFF`. Parsing is permissive: a line
//! with an unknown tag or the wrong number of tokens is dropped, and a
//! magnitude that does not parse as a number counts as zero. Nothing here
//! returns an error.

use crate::command::{Command, CommandKind};
use tracing::debug;

/// Parse canonical command lines into commands, preserving order.
pub fn parse_commands<I, S>(lines: I) -> Vec<Command>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    lines
        .into_iter()
        .filter_map(|line| parse_line(line.as_ref()))
        .collect()
}

/// Parse a single line, returning `None` when it carries nothing actionable.
pub fn parse_line(line: &str) -> Option<Command> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    let tag = *parts.first()?;

    match tag {
        "WALK" => {
            if parts.len() != 4 {
                debug!(line, "dropping WALK with {} tokens", parts.len());
                return None;
            }
            let distance = parse_magnitude(parts[2]);
            let duration = parse_magnitude(parts[3]);
            if distance <= 0.0 && duration <= 0.0 {
                debug!(line, "dropping WALK without distance or duration");
                return None;
            }
            Some(Command {
                kind: CommandKind::Walk,
                direction: parts[1].to_string(),
                amount: distance.max(0.0),
                duration: duration.max(0.0),
            })
        }
        "TURN" => {
            if parts.len() != 3 {
                debug!(line, "dropping TURN with {} tokens", parts.len());
                return None;
            }
            let angle = parse_magnitude(parts[2]);
            if angle <= 0.0 {
                debug!(line, "dropping TURN without a positive angle");
                return None;
            }
            Some(Command {
                kind: CommandKind::Turn,
                direction: parts[1].to_string(),
                amount: angle,
                duration: 0.0,
            })
        }
        "BOW" => Some(Command::bow()),
        "DUST_OFF" => Some(Command::dance()),
        other => {
            debug!(line, tag = other, "dropping line with unknown tag");
            None
        }
    }
}

/// Lenient float parsing: anything that is not a finite number is zero.
fn parse_magnitude(text: &str) -> f64 {
    match text.parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => 0.0,
    }
}
