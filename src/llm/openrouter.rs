//! OpenRouter chat-completions client

use crate::config::LlmConfig;
use crate::error::{DoctorError, Result};
use crate::llm::{ChatMessage, ChatOptions, ChatRole};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Named key slots; each resolves to the `OPENROUTER_KEY_<NAME>` variable
pub const OPENROUTER_KEY_NAMES: &[&str] = &["ward", "claudio_no_limit", "claudio_desktop"];

/// Model alias table, friendly name to OpenRouter route
const MODELS: &[(&str, &str)] = &[
    ("opus_4", "anthropic/claude-opus-4"),
    ("sonnet_4", "anthropic/claude-sonnet-4"),
    ("sonnet_3_7", "anthropic/claude-3.7-sonnet"),
    ("haiku_3_5", "anthropic/claude-3.5-haiku"),
];

fn resolve_model(model: &str) -> &str {
    MODELS
        .iter()
        .find(|(alias, _)| *alias == model)
        .map(|(_, id)| *id)
        .unwrap_or(model)
}

/// Resolve a named key slot from the environment
fn key_from_env(name: &str) -> Option<String> {
    let var = format!("OPENROUTER_KEY_{}", name.to_uppercase());
    std::env::var(var).ok().filter(|v| !v.is_empty())
}

/// Client for the OpenRouter chat completions endpoint
#[derive(Debug, Clone)]
pub struct OpenRouterClient {
    api_key: String,
    base_url: String,
    referer: String,
    title: String,
    http_client: reqwest::Client,
}

impl OpenRouterClient {
    /// Create a client from a named key slot (see [`OPENROUTER_KEY_NAMES`])
    pub fn from_key_name(key_name: &str) -> Result<Self> {
        let api_key = key_from_env(key_name).ok_or_else(|| {
            DoctorError::auth(format!(
                "Chiave OpenRouter '{}' non configurata: imposta OPENROUTER_KEY_{} \
                 (slot disponibili: {})",
                key_name,
                key_name.to_uppercase(),
                OPENROUTER_KEY_NAMES.join(", ")
            ))
        })?;
        Self::new(api_key, None)
    }

    /// Build a client from the `llm` configuration block.
    ///
    /// `api_key_env` names the variable holding the key (one of the
    /// `OPENROUTER_KEY_<NAME>` slots, or any other variable).
    pub fn from_config(config: &LlmConfig) -> Result<Self> {
        let var = config.api_key_env.as_deref().unwrap_or("OPENROUTER_API_KEY");
        let api_key = std::env::var(var)
            .ok()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                DoctorError::auth(format!("Chiave OpenRouter mancante: imposta {}", var))
            })?;
        Self::new(api_key, config.api_base_url.clone())
    }

    pub fn new(api_key: String, base_url: Option<String>) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| DoctorError::config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            api_key,
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            referer: "https://localhost".to_string(),
            title: "gcpdoctor".to_string(),
            http_client,
        })
    }

    fn build_request(&self, messages: &[ChatMessage], model: &str, opts: &ChatOptions) -> Value {
        let mut body_messages: Vec<Value> = Vec::with_capacity(messages.len() + 1);
        // OpenRouter takes the system prompt as the leading message
        if let Some(system) = &opts.system {
            body_messages.push(json!({ "role": "system", "content": system }));
        }
        for message in messages {
            if message.role == ChatRole::System && opts.system.is_some() {
                continue;
            }
            body_messages.push(json!({ "role": message.role, "content": message.content }));
        }

        json!({
            "model": resolve_model(model),
            "messages": body_messages,
            "temperature": opts.temperature.unwrap_or(0.7),
            "max_tokens": opts.max_tokens.unwrap_or(4096),
        })
    }

    /// Full completion payload, for callers that need usage or routing metadata
    pub async fn chat_completion(
        &self,
        messages: &[ChatMessage],
        model: &str,
        opts: &ChatOptions,
    ) -> Result<Value> {
        debug!("openrouter chat with model {}", resolve_model(model));
        let request = self.build_request(messages, model, opts);

        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("HTTP-Referer", &self.referer)
            .header("X-Title", &self.title)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| DoctorError::transient(format!("OpenRouter request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(DoctorError::transient(format!(
                "OpenRouter error ({}): {}",
                status, error_text
            )));
        }

        response
            .json()
            .await
            .map_err(|e| DoctorError::transient(format!("Invalid OpenRouter response: {}", e)))
    }

    /// Send a conversation and return the generated text
    pub async fn chat(
        &self,
        messages: &[ChatMessage],
        model: &str,
        opts: &ChatOptions,
    ) -> Result<String> {
        let body = self.chat_completion(messages, model, opts).await?;
        body.get("choices")
            .and_then(Value::as_array)
            .and_then(|choices| choices.first())
            .and_then(|choice| choice.get("message"))
            .and_then(|message| message.get("content"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| DoctorError::transient("OpenRouter response has no message content"))
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
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_alias_resolution() {
        assert_eq!(resolve_model("opus_4"), "anthropic/claude-opus-4");
        assert_eq!(resolve_model("haiku_3_5"), "anthropic/claude-3.5-haiku");
        assert_eq!(resolve_model("mistralai/mistral-7b"), "mistralai/mistral-7b");
    }

    #[test]
    fn test_system_prompt_leads_message_list() {
        let client =
            OpenRouterClient::new("sk-or-test".to_string(), Some("http://localhost:0".into()))
                .unwrap();
        let opts = ChatOptions {
            system: Some("sii conciso".to_string()),
            ..ChatOptions::default()
        };
        let request = client.build_request(&[ChatMessage::user("ciao")], "opus_4", &opts);
        let body_messages = request["messages"].as_array().unwrap();
        assert_eq!(body_messages.len(), 2);
        assert_eq!(body_messages[0]["role"], "system");
        assert_eq!(body_messages[1]["role"], "user");
        assert_eq!(request["model"], "anthropic/claude-opus-4");
    }

    #[test]
    fn test_unknown_key_slot_fails() {
        let err = OpenRouterClient::from_key_name("no_such_slot").unwrap_err();
        assert!(err.to_string().contains("OPENROUTER_KEY_NO_SUCH_SLOT"));
    }
}
