//! LLM clients against mock provider endpoints

use gcpdoctor::config::{LlmConfig, LlmProvider};
use gcpdoctor::llm::{AnthropicClient, ChatMessage, ChatOptions, OpenRouterClient};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_anthropic_chat_extracts_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/messages"))
        .and(header("x-api-key", "sk-ant-test"))
        .and(header("anthropic-version", "2023-06-01"))
        .and(body_partial_json(json!({ "model": "claude-opus-4-20250514" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": [
                {"type": "text", "text": "Ciao! Come posso aiutarti?"}
            ],
            "model": "claude-opus-4-20250514",
            "stop_reason": "end_turn"
        })))
        .mount(&server)
        .await;

    let client = AnthropicClient::new(Some("sk-ant-test".to_string()), Some(server.uri())).unwrap();
    let reply = client
        .chat(
            &[ChatMessage::user("Ciao")],
            "opus_4",
            &ChatOptions::default(),
        )
        .await
        .unwrap();
    assert_eq!(reply, "Ciao! Come posso aiutarti?");
}

#[tokio::test]
async fn test_anthropic_error_status_surfaces() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/messages"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": {"type": "authentication_error", "message": "invalid x-api-key"}
        })))
        .mount(&server)
        .await;

    let client = AnthropicClient::new(Some("sk-ant-bad".to_string()), Some(server.uri())).unwrap();
    let err = client
        .simple_prompt("Ciao", "haiku", None)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("401"));
}

#[tokio::test]
async fn test_anthropic_stream_collects_deltas() {
    let server = MockServer::start().await;
    let sse_body = concat!(
        "event: message_start\n",
        "data: {\"type\":\"message_start\"}\n",
        "\n",
        "event: content_block_delta\n",
        "data: {\"type\":\"content_block_delta\",\"delta\":{\"type\":\"text_delta\",\"text\":\"Buon\"}}\n",
        "\n",
        "event: content_block_delta\n",
        "data: {\"type\":\"content_block_delta\",\"delta\":{\"type\":\"text_delta\",\"text\":\"giorno\"}}\n",
        "\n",
        "event: message_stop\n",
        "data: {\"type\":\"message_stop\"}\n",
        "\n",
    );
    Mock::given(method("POST"))
        .and(path("/messages"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(sse_body)
                .insert_header("Content-Type", "text/event-stream"),
        )
        .mount(&server)
        .await;

    let client = AnthropicClient::new(Some("sk-ant-test".to_string()), Some(server.uri())).unwrap();
    let mut seen = Vec::new();
    let full = client
        .stream_chat(
            &[ChatMessage::user("Saluta")],
            "sonnet_4",
            &ChatOptions::default(),
            |delta| seen.push(delta.to_string()),
        )
        .await
        .unwrap();
    assert_eq!(seen, vec!["Buon", "giorno"]);
    assert_eq!(full, "Buongiorno");
}

#[tokio::test]
async fn test_openrouter_chat_maps_alias_and_extracts_content() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("Authorization", "Bearer sk-or-test"))
        .and(body_partial_json(json!({ "model": "anthropic/claude-sonnet-4" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [
                {"message": {"role": "assistant", "content": "Risposta instradata"}}
            ],
            "model": "anthropic/claude-sonnet-4"
        })))
        .mount(&server)
        .await;

    let client = OpenRouterClient::new("sk-or-test".to_string(), Some(server.uri())).unwrap();
    let reply = client
        .chat(
            &[ChatMessage::user("Ciao")],
            "sonnet_4",
            &ChatOptions::default(),
        )
        .await
        .unwrap();
    assert_eq!(reply, "Risposta instradata");
}

#[tokio::test]
async fn test_anthropic_client_built_from_config_block() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/messages"))
        .and(header("x-api-key", "sk-ant-from-env"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": [{"type": "text", "text": "configurato"}]
        })))
        .mount(&server)
        .await;

    std::env::set_var("GCPDOCTOR_TEST_ANTHROPIC_KEY", "sk-ant-from-env");
    let llm = LlmConfig {
        provider: LlmProvider::Anthropic,
        model: "opus_4".to_string(),
        api_key_env: Some("GCPDOCTOR_TEST_ANTHROPIC_KEY".to_string()),
        api_base_url: Some(server.uri()),
        temperature: 0.2,
        max_tokens: 64,
    };

    let client = AnthropicClient::from_config(&llm).unwrap();
    let opts = ChatOptions {
        temperature: Some(llm.temperature),
        max_tokens: Some(llm.max_tokens),
        system: None,
    };
    let reply = client
        .chat(&[ChatMessage::user("Ciao")], &llm.model, &opts)
        .await
        .unwrap();
    assert_eq!(reply, "configurato");
}

#[test]
fn test_openrouter_from_config_requires_the_named_variable() {
    let llm = LlmConfig {
        provider: LlmProvider::OpenRouter,
        model: "opus_4".to_string(),
        api_key_env: Some("GCPDOCTOR_TEST_UNSET_SLOT".to_string()),
        api_base_url: None,
        temperature: 0.7,
        max_tokens: 4096,
    };
    let err = OpenRouterClient::from_config(&llm).unwrap_err();
    assert!(err.to_string().contains("GCPDOCTOR_TEST_UNSET_SLOT"));
}

#[tokio::test]
async fn test_openrouter_missing_content_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
        .mount(&server)
        .await;

    let client = OpenRouterClient::new("sk-or-test".to_string(), Some(server.uri())).unwrap();
    let err = client
        .simple_prompt("Ciao", "opus_4", None)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("no message content"));
}
