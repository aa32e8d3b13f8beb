//! Direct Anthropic messages API client

use crate::config::LlmConfig;
use crate::error::{DoctorError, Result};
use crate::llm::{ChatMessage, ChatOptions, ChatRole};
use futures_util::StreamExt;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com/v1";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const API_KEY_ENV: &str = "ANTHROPIC_API_KEY";

/// Model alias table, friendly name to dated identifier
const MODELS: &[(&str, &str)] = &[
    ("opus_4", "claude-opus-4-20250514"),
    ("sonnet_4", "claude-sonnet-4-20250514"),
    ("sonnet_3_5", "claude-3-5-sonnet-20241022"),
    ("haiku", "claude-3-5-haiku-20241022"),
];

/// Resolve an alias to its model identifier; unknown names pass through
fn resolve_model(model: &str) -> &str {
    MODELS
        .iter()
        .find(|(alias, _)| *alias == model)
        .map(|(_, id)| *id)
        .unwrap_or(model)
}

/// Client for the Anthropic messages endpoint
#[derive(Debug, Clone)]
pub struct AnthropicClient {
    api_key: String,
    base_url: String,
    http_client: reqwest::Client,
}

impl AnthropicClient {
    /// Create a client; the key comes from the argument or `ANTHROPIC_API_KEY`
    pub fn new(api_key: Option<String>, base_url: Option<String>) -> Result<Self> {
        let api_key = match api_key.or_else(|| std::env::var(API_KEY_ENV).ok()) {
            Some(k) if !k.is_empty() => k,
            _ => {
                return Err(DoctorError::auth(format!(
                    "API key mancante: passa la chiave o imposta {} \
                     (https://console.anthropic.com/settings/keys)",
                    API_KEY_ENV
                )))
            }
        };

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| DoctorError::config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            api_key,
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            http_client,
        })
    }

    /// Build a client from the `llm` configuration block.
    ///
    /// The key comes from the variable `api_key_env` names, falling back to
    /// `ANTHROPIC_API_KEY` when the block leaves it unset.
    pub fn from_config(config: &LlmConfig) -> Result<Self> {
        let api_key = config
            .api_key_env
            .as_deref()
            .and_then(|var| std::env::var(var).ok())
            .filter(|k| !k.is_empty());
        Self::new(api_key, config.api_base_url.clone())
    }

    fn build_request(
        &self,
        messages: &[ChatMessage],
        model: &str,
        opts: &ChatOptions,
        stream: bool,
    ) -> Value {
        // System messages travel in the dedicated field, not the message list
        let body_messages: Vec<Value> = messages
            .iter()
            .filter(|m| m.role != ChatRole::System)
            .map(|m| json!({ "role": m.role, "content": m.content }))
            .collect();

        let mut request = json!({
            "model": resolve_model(model),
            "messages": body_messages,
            "max_tokens": opts.max_tokens.unwrap_or(4096),
            "temperature": opts.temperature.unwrap_or(1.0),
        });
        if let Some(system) = &opts.system {
            request["system"] = json!(system);
        }
        if stream {
            request["stream"] = json!(true);
        }
        request
    }

    async fn send(&self, request: &Value) -> Result<reqwest::Response> {
        let response = self
            .http_client
            .post(format!("{}/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| DoctorError::transient(format!("Anthropic API request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(DoctorError::transient(format!(
                "Anthropic API error ({}): {}",
                status, error_text
            )));
        }
        Ok(response)
    }

    /// Send a conversation and return the generated text
    pub async fn chat(
        &self,
        messages: &[ChatMessage],
        model: &str,
        opts: &ChatOptions,
    ) -> Result<String> {
        debug!("anthropic chat with model {}", resolve_model(model));
        let request = self.build_request(messages, model, opts, false);
        let response = self.send(&request).await?;

        let body: Value = response
            .json()
            .await
            .map_err(|e| DoctorError::transient(format!("Invalid Anthropic response: {}", e)))?;

        body.get("content")
            .and_then(Value::as_array)
            .and_then(|content| {
                content.iter().find_map(|item| {
                    if item.get("type")?.as_str()? == "text" {
                        item.get("text")?.as_str().map(str::to_string)
                    } else {
                        None
                    }
                })
            })
            .ok_or_else(|| DoctorError::transient("Anthropic response has no text content"))
    }

    /// Single-prompt convenience call
    pub async fn simple_prompt(
        &self,
        prompt: &str,
        model: &str,
        system: Option<&str>,
    ) -> Result<String> {
        let opts = ChatOptions {
            system: system.map(str::to_string),
            ..ChatOptions::default()
        };
        self.chat(&[ChatMessage::user(prompt)], model, &opts).await
    }

    /// Streaming chat: `on_delta` receives each text fragment as it arrives;
    /// the full concatenated text is returned at the end.
    pub async fn stream_chat<F>(
        &self,
        messages: &[ChatMessage],
        model: &str,
        opts: &ChatOptions,
        mut on_delta: F,
    ) -> Result<String>
    where
        F: FnMut(&str),
    {
        let request = self.build_request(messages, model, opts, true);
        let response = self.send(&request).await?;

        let mut full_text = String::new();
        let mut buffer = String::new();
        let mut stream = response.bytes_stream();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk
                .map_err(|e| DoctorError::transient(format!("Stream interrupted: {}", e)))?;
            buffer.push_str(&String::from_utf8_lossy(&chunk));

            // SSE frames are newline-delimited; keep any partial line buffered
            while let Some(newline) = buffer.find('\n') {
                let line = buffer[..newline].trim().to_string();
                buffer.drain(..=newline);

                let Some(data) = line.strip_prefix("data: ") else {
                    continue;
                };
                let Ok(event) = serde_json::from_str::<Value>(data) else {
                    continue;
                };
                if event.get("type").and_then(Value::as_str) == Some("content_block_delta") {
                    if let Some(text) = event
                        .get("delta")
                        .and_then(|d| d.get("text"))
                        .and_then(Value::as_str)
                    {
                        on_delta(text);
                        full_text.push_str(text);
                    }
                }
            }
        }

        Ok(full_text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_alias_resolution() {
        assert_eq!(resolve_model("opus_4"), "claude-opus-4-20250514");
        assert_eq!(resolve_model("haiku"), "claude-3-5-haiku-20241022");
        assert_eq!(
            resolve_model("claude-3-opus-20240229"),
            "claude-3-opus-20240229"
        );
    }

    #[test]
    fn test_system_messages_move_to_dedicated_field() {
        let client = AnthropicClient::new(
            Some("sk-ant-test".to_string()),
            Some("http://localhost:0".to_string()),
        )
        .unwrap();
        let messages = vec![
            ChatMessage {
                role: ChatRole::System,
                content: "be terse".to_string(),
            },
            ChatMessage::user("hi"),
        ];
        let opts = ChatOptions {
            system: Some("be terse".to_string()),
            ..ChatOptions::default()
        };
        let request = client.build_request(&messages, "opus_4", &opts, false);
        assert_eq!(request["system"], "be terse");
        let body_messages = request["messages"].as_array().unwrap();
        assert_eq!(body_messages.len(), 1);
        assert_eq!(body_messages[0]["role"], "user");
    }
}
