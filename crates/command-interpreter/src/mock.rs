//! Scripted tool-call model for development and testing

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::model::{ToolCallModel, ToolCallRequest};
use crate::tools::ToolInvocation;
use crate::{InterpretError, Result};

/// Requests kept by [`ScriptedToolModel`]; older ones are discarded.
pub const MAX_RECORDED_REQUESTS: usize = 64;

/// A request as seen by [`ScriptedToolModel`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub persona: String,
    pub utterance: String,
    pub tool_names: Vec<String>,
}

/// Returns the same tool calls for every utterance, or fails every call.
pub struct ScriptedToolModel {
    script: Vec<ToolInvocation>,
    failure: Option<String>,
    requests: Mutex<VecDeque<RecordedRequest>>,
}

impl ScriptedToolModel {
    pub fn new(script: Vec<ToolInvocation>) -> Self {
        Self {
            script,
            failure: None,
            requests: Mutex::new(VecDeque::new()),
        }
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            script: Vec::new(),
            failure: Some(message.into()),
            requests: Mutex::new(VecDeque::new()),
        }
    }

    /// The most recent requests, oldest first.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .map(|r| r.iter().cloned().collect())
            .unwrap_or_default()
    }
}

#[async_trait]
impl ToolCallModel for ScriptedToolModel {
    async fn call_tools(&self, request: &ToolCallRequest<'_>) -> Result<Vec<ToolInvocation>> {
        if let Ok(mut seen) = self.requests.lock() {
            if seen.len() == MAX_RECORDED_REQUESTS {
                seen.pop_front();
            }
            seen.push_back(RecordedRequest {
                persona: request.persona.to_string(),
                utterance: request.utterance.to_string(),
                tool_names: request.tools.iter().map(|t| t.name.clone()).collect(),
            });
        }
        if let Some(msg) = &self.failure {
            return Err(InterpretError::Model(msg.clone()));
        }
        Ok(self.script.clone())
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::default_tools;

    #[tokio::test]
    async fn test_recorded_requests_are_bounded() {
        let model = ScriptedToolModel::new(vec![]);
        let tools = default_tools();
        for i in 0..MAX_RECORDED_REQUESTS + 10 {
            let utterance = format!("Spot, utterance {i}");
            let request = ToolCallRequest {
                persona: "p",
                utterance: &utterance,
                tools: &tools,
            };
            model.call_tools(&request).await.unwrap();
        }
        let seen = model.requests();
        assert_eq!(seen.len(), MAX_RECORDED_REQUESTS);
        assert_eq!(seen[0].utterance, "Spot, utterance 10");
        assert_eq!(
            seen[MAX_RECORDED_REQUESTS - 1].utterance,
            format!("Spot, utterance {}", MAX_RECORDED_REQUESTS + 9)
        );
    }
}
