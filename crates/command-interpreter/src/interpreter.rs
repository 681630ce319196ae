//! Utterance → commands, via the model's tool calls

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::command::Command;
use crate::model::{ToolCallModel, ToolCallRequest};
use crate::parser::parse_commands;
use crate::tools::{default_tools, render_invocation, ToolSpec};
use crate::Result;

pub const DEFAULT_PERSONA: &str = "You are a quadrupedal robot named Spot created by Boston Dynamics. \
You listen for commands from the user, which always mention your name, and respond only by \
calling the provided command tools, once per action, in the order the actions should happen. \
Distances are in meters and angles in degrees.";

/// Fixed persona and tool menu, set once when the interpreter is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterpreterConfig {
    #[serde(default = "default_persona")]
    pub persona: String,
    #[serde(default = "default_tools")]
    pub tools: Vec<ToolSpec>,
}

fn default_persona() -> String {
    DEFAULT_PERSONA.to_string()
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            persona: default_persona(),
            tools: default_tools(),
        }
    }
}

/// Interprets utterances as Spot commands.
pub struct CommandInterpreter<M> {
    config: InterpreterConfig,
    model: M,
}

impl<M: ToolCallModel> CommandInterpreter<M> {
    pub fn new(config: InterpreterConfig, model: M) -> Self {
        Self { config, model }
    }

    pub fn config(&self) -> &InterpreterConfig {
        &self.config
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    /// Ask the model for tool calls and render them to canonical lines.
    ///
    /// Unknown tools are dropped here; everything else is left to the parser.
    pub async fn command_lines(&self, utterance: &str) -> Result<Vec<String>> {
        let request = ToolCallRequest {
            persona: &self.config.persona,
            utterance,
            tools: &self.config.tools,
        };
        let invocations = self.model.call_tools(&request).await?;
        debug!(
            model = self.model.name(),
            calls = invocations.len(),
            "model returned tool calls"
        );
        for inv in &invocations {
            debug!(tool = %inv.name, args = %inv.arguments, "tool call");
        }
        Ok(invocations.iter().filter_map(render_invocation).collect())
    }

    /// Interpret one utterance. An utterance with no actionable content
    /// yields an empty list.
    pub async fn interpret(&self, utterance: &str) -> Result<Vec<Command>> {
        let lines = self.command_lines(utterance).await?;
        let commands = parse_commands(&lines);
        info!(
            utterance,
            lines = lines.len(),
            commands = commands.len(),
            "interpreted utterance"
        );
        Ok(commands)
    }
}

#[cfg(all(test, feature = "mock"))]
mod tests {
    use super::*;
    use crate::command::CommandKind;
    use crate::mock::ScriptedToolModel;
    use crate::tools::{ToolInvocation, BOW_TOOL, DANCE_TOOL, TURN_TOOL, WALK_TOOL};
    use crate::InterpretError;
    use serde_json::json;

    #[tokio::test]
    async fn test_interpret_multiple_tool_calls_in_order() {
        let model = ScriptedToolModel::new(vec![
            ToolInvocation::new(TURN_TOOL, json!({"direction": "left", "angle": 90})),
            ToolInvocation::new(
                WALK_TOOL,
                json!({"direction": "forward", "distance": 2, "duration": 0}),
            ),
            ToolInvocation::new(BOW_TOOL, json!({})),
        ]);
        let interpreter = CommandInterpreter::new(InterpreterConfig::default(), model);

        let cmds = interpreter
            .interpret("Spot, turn left, walk two meters and take a bow")
            .await
            .unwrap();

        let kinds: Vec<CommandKind> = cmds.iter().map(|c| c.kind).collect();
        assert_eq!(
            kinds,
            vec![CommandKind::Turn, CommandKind::Walk, CommandKind::Bow]
        );
        assert_eq!(cmds[1].amount, 2.0);
    }

    #[tokio::test]
    async fn test_interpret_no_tool_calls_is_empty() {
        let model = ScriptedToolModel::new(vec![]);
        let interpreter = CommandInterpreter::new(InterpreterConfig::default(), model);
        let cmds = interpreter.interpret("Spot, how are you?").await.unwrap();
        assert!(cmds.is_empty());
    }

    #[tokio::test]
    async fn test_interpret_drops_unusable_calls() {
        let model = ScriptedToolModel::new(vec![
            ToolInvocation::new(
                WALK_TOOL,
                json!({"direction": "forward", "distance": 0, "duration": 0}),
            ),
            ToolInvocation::new("fly_command", json!({})),
            ToolInvocation::new(DANCE_TOOL, json!({})),
        ]);
        let interpreter = CommandInterpreter::new(InterpreterConfig::default(), model);
        let cmds = interpreter.interpret("Spot, dance").await.unwrap();
        assert_eq!(cmds, vec![Command::dance()]);
    }

    #[tokio::test]
    async fn test_interpret_surfaces_model_failure() {
        let model = ScriptedToolModel::failing("connection reset");
        let interpreter = CommandInterpreter::new(InterpreterConfig::default(), model);
        let err = interpreter.interpret("Spot, sit").await.unwrap_err();
        assert!(matches!(err, InterpretError::Model(_)));
    }

    #[tokio::test]
    async fn test_request_carries_configured_persona_and_tools() {
        let config = InterpreterConfig {
            persona: "You are a test robot.".to_string(),
            tools: default_tools().into_iter().take(2).collect(),
        };
        let model = ScriptedToolModel::new(vec![]);
        let interpreter = CommandInterpreter::new(config, model);
        interpreter.interpret("Spot, walk").await.unwrap();

        let seen = interpreter.model().requests();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].persona, "You are a test robot.");
        assert_eq!(seen[0].utterance, "Spot, walk");
        assert_eq!(seen[0].tool_names, vec![WALK_TOOL, TURN_TOOL]);
    }

    #[test]
    fn test_config_defaults_when_empty() {
        let cfg: InterpreterConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg, InterpreterConfig::default());
        assert_eq!(cfg.tools.len(), 4);
    }
}
