use crate::tools::{ToolInvocation, ToolSpec};
use crate::Result;
use async_trait::async_trait;

/// What the interpreter sends to the model for one utterance.
#[derive(Debug, Clone, Copy)]
pub struct ToolCallRequest<'a> {
    /// System persona / instructions
    pub persona: &'a str,
    /// The transcribed user utterance
    pub utterance: &'a str,
    /// Closed menu of tools the model may call
    pub tools: &'a [ToolSpec],
}

/// A language model reachable through a tool-calling protocol.
///
/// Implementations return every tool call the model made, in order. A model
/// that answers without calling any tool yields an empty list; only transport
/// or service failures are errors.
#[async_trait]
pub trait ToolCallModel: Send + Sync {
    async fn call_tools(&self, request: &ToolCallRequest<'_>) -> Result<Vec<ToolInvocation>>;

    /// Short backend name for logs
    fn name(&self) -> &str;
}

#[async_trait]
impl<T: ToolCallModel + ?Sized> ToolCallModel for Box<T> {
    async fn call_tools(&self, request: &ToolCallRequest<'_>) -> Result<Vec<ToolInvocation>> {
        (**self).call_tools(request).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
