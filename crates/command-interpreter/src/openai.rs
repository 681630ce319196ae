//! Tool-calling backend for OpenAI-compatible chat-completions endpoints.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, error, warn};

use crate::model::{ToolCallModel, ToolCallRequest};
use crate::tools::ToolInvocation;
use crate::{InterpretError, Result};

pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenAiConfig {
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Falls back to `OPENAI_API_KEY` when empty
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_api_base() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_timeout_ms() -> u64 {
    15_000
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            api_key: None,
            model: default_model(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

pub struct OpenAiToolModel {
    config: OpenAiConfig,
    api_key: String,
    endpoint: String,
    client: reqwest::Client,
}

impl OpenAiToolModel {
    pub fn new(config: OpenAiConfig) -> Result<Self> {
        let api_key = match config.api_key.as_deref().filter(|k| !k.is_empty()) {
            Some(key) => key.to_string(),
            None => std::env::var(API_KEY_ENV).map_err(|_| {
                InterpretError::Config(format!("no API key configured and {API_KEY_ENV} unset"))
            })?,
        };
        let endpoint = format!("{}/chat/completions", config.api_base.trim_end_matches('/'));
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| InterpretError::Config(e.to_string()))?;
        Ok(Self {
            config,
            api_key,
            endpoint,
            client,
        })
    }

    pub fn config(&self) -> &OpenAiConfig {
        &self.config
    }

    fn request_body(&self, request: &ToolCallRequest<'_>) -> Value {
        let tools: Vec<Value> = request.tools.iter().map(|t| t.to_openai_json()).collect();
        json!({
            "model": self.config.model,
            "messages": [
                { "role": "system", "content": request.persona },
                { "role": "user", "content": request.utterance },
            ],
            "tools": tools,
            "tool_choice": "auto",
        })
    }
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    tool_calls: Option<Vec<ToolCall>>,
}

#[derive(Deserialize)]
struct ToolCall {
    function: FunctionCall,
}

#[derive(Deserialize)]
struct FunctionCall {
    name: String,
    /// JSON-encoded argument object, as sent by the API
    #[serde(default)]
    arguments: String,
}

/// Extract tool calls from a chat-completions response body.
fn invocations_from_response(body: ChatResponse) -> Result<Vec<ToolInvocation>> {
    let choice = body
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| InterpretError::InvalidResponse("response has no choices".into()))?;

    if let Some(text) = choice.message.content.as_deref() {
        debug!(content = text, "model replied with text");
    }

    let calls = choice.message.tool_calls.unwrap_or_default();
    Ok(calls
        .into_iter()
        .map(|call| {
            let arguments = if call.function.arguments.trim().is_empty() {
                Value::Object(Default::default())
            } else {
                serde_json::from_str(&call.function.arguments).unwrap_or_else(|e| {
                    warn!(
                        tool = %call.function.name,
                        "unparseable tool arguments ({e}); using defaults"
                    );
                    Value::Object(Default::default())
                })
            };
            ToolInvocation {
                name: call.function.name,
                arguments,
            }
        })
        .collect())
}

#[async_trait]
impl ToolCallModel for OpenAiToolModel {
    async fn call_tools(&self, request: &ToolCallRequest<'_>) -> Result<Vec<ToolInvocation>> {
        let body = self.request_body(request);
        let resp = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "chat completion request failed");
                InterpretError::from(e)
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            error!(status = %status, body = %body, "chat completion API error");
            return Err(InterpretError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = resp.json().await?;
        invocations_from_response(parsed)
    }

    fn name(&self) -> &str {
        "openai"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::{default_tools, WALK_TOOL};

    fn parse(raw: &str) -> Result<Vec<ToolInvocation>> {
        invocations_from_response(serde_json::from_str(raw).unwrap())
    }

    #[test]
    fn test_extracts_tool_calls_in_order() {
        let raw = r#"{
            "choices": [{
                "message": {
                    "role": "assistant",
                    "content": null,
                    "tool_calls": [
                        {"id": "a", "type": "function", "function": {"name": "turn_command", "arguments": "{\"direction\":\"right\",\"angle\":90}"}},
                        {"id": "b", "type": "function", "function": {"name": "bow_command", "arguments": "{}"}}
                    ]
                },
                "finish_reason": "tool_calls"
            }]
        }"#;
        let calls = parse(raw).unwrap();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].name, "turn_command");
        assert_eq!(calls[0].arguments["angle"], 90);
        assert_eq!(calls[1].name, "bow_command");
    }

    #[test]
    fn test_text_only_reply_is_empty() {
        let raw = r#"{"choices":[{"message":{"role":"assistant","content":"Hello!"}}]}"#;
        assert!(parse(raw).unwrap().is_empty());
    }

    #[test]
    fn test_malformed_arguments_become_empty_object() {
        let raw = r#"{"choices":[{"message":{"tool_calls":[
            {"function":{"name":"walk_command","arguments":"{not json"}}
        ]}}]}"#;
        let calls = parse(raw).unwrap();
        assert_eq!(calls[0].name, WALK_TOOL);
        assert!(calls[0].arguments.as_object().is_some_and(|o| o.is_empty()));
    }

    #[test]
    fn test_no_choices_is_invalid_response() {
        let err = parse(r#"{"choices":[]}"#).unwrap_err();
        assert!(matches!(err, InterpretError::InvalidResponse(_)));
    }

    #[test]
    fn test_request_body_shape() {
        let model = OpenAiToolModel::new(OpenAiConfig {
            api_key: Some("sk-test".into()),
            ..Default::default()
        })
        .unwrap();
        let tools = default_tools();
        let body = model.request_body(&ToolCallRequest {
            persona: "persona",
            utterance: "Spot, walk forward",
            tools: &tools,
        });
        assert_eq!(body["model"], "gpt-3.5-turbo");
        assert_eq!(body["tool_choice"], "auto");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "Spot, walk forward");
        assert_eq!(body["tools"].as_array().map(Vec::len), Some(4));
        assert_eq!(model.endpoint, "https://api.openai.com/v1/chat/completions");
    }
}
