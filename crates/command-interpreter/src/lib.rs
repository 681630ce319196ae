//! Command interpreter for Spot voice commands
//!
//! This crate turns a transcribed utterance into an ordered list of typed
//! [`Command`]s. The language model is asked to call tools from a closed menu
//! (walk, turn, bow, dance); every tool call is rendered to a canonical
//! command line and the lines are parsed by [`parse_commands`], which is pure
//! and can be exercised without any model.

mod command;
pub use command::{Command, CommandKind, UNKNOWN_DIRECTION};

mod error;
pub use error::{InterpretError, Result};

mod parser;
pub use parser::{parse_commands, parse_line};

mod tools;
pub use tools::{
    default_tools, render_invocation, ToolInvocation, ToolSpec, BOW_TOOL, DANCE_TOOL, TURN_TOOL,
    WALK_TOOL,
};

mod model;
pub use model::{ToolCallModel, ToolCallRequest};

mod interpreter;
pub use interpreter::{CommandInterpreter, InterpreterConfig, DEFAULT_PERSONA};

#[cfg(feature = "mock")]
mod mock;
#[cfg(feature = "mock")]
pub use mock::{RecordedRequest, ScriptedToolModel, MAX_RECORDED_REQUESTS};

#[cfg(feature = "openai")]
pub mod openai;
#[cfg(feature = "openai")]
pub use openai::{OpenAiConfig, OpenAiToolModel};
