//! Tool menu offered to the language model and rendering of its tool calls
//!
//! Each tool call is rendered to a canonical command line which is then fed to
//! [`crate::parse_commands`]. The line format is the boundary between the
//! non-deterministic model step and the deterministic parser.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::warn;

use crate::command::UNKNOWN_DIRECTION;
use crate::InterpretError;

pub const WALK_TOOL: &str = "walk_command";
pub const TURN_TOOL: &str = "turn_command";
pub const BOW_TOOL: &str = "bow_command";
pub const DANCE_TOOL: &str = "dance_command";

/// A callable tool exposed to the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    /// JSON Schema of the arguments, `None` for zero-argument tools
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Value>,
}

impl ToolSpec {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: None,
        }
    }

    pub fn with_parameters(mut self, parameters: Value) -> Self {
        self.parameters = Some(parameters);
        self
    }

    /// Entry for the `tools` array of a chat-completions request.
    pub fn to_openai_json(&self) -> Value {
        let mut function = json!({
            "name": self.name,
            "description": self.description,
        });
        if let (Some(params), Some(obj)) = (&self.parameters, function.as_object_mut()) {
            obj.insert("parameters".to_string(), params.clone());
        }
        json!({ "type": "function", "function": function })
    }
}

/// The standard Spot tool menu: walk, turn, bow and dance.
pub fn default_tools() -> Vec<ToolSpec> {
    vec![
        ToolSpec::new(
            WALK_TOOL,
            "Produces command object for walking forward or backward",
        )
        .with_parameters(json!({
            "type": "object",
            "properties": {
                "direction": {
                    "type": "string",
                    "description": "Direction to walk in",
                    "enum": ["forward", "backward", "unknown"]
                },
                "distance": {
                    "type": "number",
                    "description": "Distance in meters to traverse, if specified, else 0",
                    "minimum": 0
                },
                "duration": {
                    "type": "number",
                    "description": "Number of seconds to walk for, if specified, else 0",
                    "minimum": 0
                }
            },
            "required": ["direction", "distance", "duration"]
        })),
        ToolSpec::new(TURN_TOOL, "Produces command object for turning in place").with_parameters(
            json!({
                "type": "object",
                "properties": {
                    "direction": {
                        "type": "string",
                        "description": "Direction to turn, relative to Spot's facing direction",
                        "enum": ["left", "right", "unknown"]
                    },
                    "angle": {
                        "type": "number",
                        "description": "Angle in degrees to turn, a positive number between 0 and 360",
                        "minimum": 0,
                        "exclusiveMaximum": 360
                    }
                },
                "required": ["direction", "angle"]
            }),
        ),
        ToolSpec::new(BOW_TOOL, "Produces command object for bowing gesture"),
        ToolSpec::new(DANCE_TOOL, "Produces command object for dancing"),
    ]
}

/// One tool call emitted by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolInvocation {
    pub name: String,
    #[serde(default)]
    pub arguments: Value,
}

impl ToolInvocation {
    pub fn new(name: impl Into<String>, arguments: Value) -> Self {
        Self {
            name: name.into(),
            arguments,
        }
    }
}

/// Parses `name` or `name {json-arguments}`, the form used to script tool
/// calls on the command line.
impl std::str::FromStr for ToolInvocation {
    type Err = InterpretError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (name, args) = match s.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (s, ""),
        };
        if name.is_empty() {
            return Err(InterpretError::Config("empty tool call".into()));
        }
        let arguments = if args.is_empty() {
            Value::Object(Default::default())
        } else {
            serde_json::from_str(args).map_err(|e| {
                InterpretError::Config(format!("arguments for {name}: {e}"))
            })?
        };
        Ok(Self::new(name, arguments))
    }
}

/// Render a tool call to its canonical command line.
///
/// Returns `None` for tools outside the menu. Missing arguments fall back to
/// `unknown` / `0` so the parser decides whether the command is actionable.
pub fn render_invocation(invocation: &ToolInvocation) -> Option<String> {
    let args = &invocation.arguments;
    match invocation.name.as_str() {
        WALK_TOOL => Some(format!(
            "WALK {} {} {}",
            direction_arg(args),
            number_arg(args, "distance"),
            number_arg(args, "duration")
        )),
        TURN_TOOL => Some(format!(
            "TURN {} {}",
            direction_arg(args),
            number_arg(args, "angle")
        )),
        BOW_TOOL => Some("BOW".to_string()),
        DANCE_TOOL => Some("DUST_OFF".to_string()),
        other => {
            warn!(tool = other, "model called a tool outside the menu");
            None
        }
    }
}

fn direction_arg(args: &Value) -> &str {
    args.get("direction")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(UNKNOWN_DIRECTION)
}

fn number_arg(args: &Value, key: &str) -> f64 {
    match args.get(key) {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        // Some models quote numbers; keep them if they parse.
        Some(Value::String(s)) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_walk() {
        let inv = ToolInvocation::new(
            WALK_TOOL,
            json!({"direction": "forward", "distance": 2.5, "duration": 0}),
        );
        assert_eq!(render_invocation(&inv).as_deref(), Some("WALK forward 2.5 0"));
    }

    #[test]
    fn test_render_turn_with_missing_direction() {
        let inv = ToolInvocation::new(TURN_TOOL, json!({"angle": 90}));
        assert_eq!(render_invocation(&inv).as_deref(), Some("TURN unknown 90"));
    }

    #[test]
    fn test_render_gestures() {
        let bow = ToolInvocation::new(BOW_TOOL, Value::Null);
        let dance = ToolInvocation::new(DANCE_TOOL, json!({}));
        assert_eq!(render_invocation(&bow).as_deref(), Some("BOW"));
        assert_eq!(render_invocation(&dance).as_deref(), Some("DUST_OFF"));
    }

    #[test]
    fn test_render_unknown_tool() {
        let inv = ToolInvocation::new("sit_command", json!({}));
        assert_eq!(render_invocation(&inv), None);
    }

    #[test]
    fn test_render_quoted_and_garbage_numbers() {
        let inv = ToolInvocation::new(
            WALK_TOOL,
            json!({"direction": "backward", "distance": "1.5", "duration": "soon"}),
        );
        assert_eq!(render_invocation(&inv).as_deref(), Some("WALK backward 1.5 0"));
    }

    #[test]
    fn test_scripted_call_from_str() {
        let inv: ToolInvocation = r#"turn_command {"direction": "left", "angle": 30}"#
            .parse()
            .unwrap();
        assert_eq!(inv.name, TURN_TOOL);
        assert_eq!(render_invocation(&inv).as_deref(), Some("TURN left 30"));

        let bare: ToolInvocation = " bow_command ".parse().unwrap();
        assert_eq!(bare.name, BOW_TOOL);
        assert!(bare.arguments.as_object().is_some_and(|o| o.is_empty()));

        assert!("walk_command {oops".parse::<ToolInvocation>().is_err());
        assert!("   ".parse::<ToolInvocation>().is_err());
    }

    #[test]
    fn test_default_tools_openai_shape() {
        let tools = default_tools();
        let names: Vec<&str> = tools.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec![WALK_TOOL, TURN_TOOL, BOW_TOOL, DANCE_TOOL]);

        let walk = tools[0].to_openai_json();
        assert_eq!(walk["type"], "function");
        assert_eq!(walk["function"]["name"], WALK_TOOL);
        assert_eq!(
            walk["function"]["parameters"]["properties"]["direction"]["enum"],
            json!(["forward", "backward", "unknown"])
        );

        let bow = tools[2].to_openai_json();
        assert!(bow["function"].get("parameters").is_none());
    }
}
