// Ollama adapter tests against a mocked local server

use genroute_core::config::GenerationDefaults;
use genroute_core::infrastructure::model::clients::OllamaClient;
use genroute_core::{
    AdapterTimeouts, BackendAdapter, BackendDescriptor, BackendKind, CostTier, GenerationRequest,
    ModelError,
};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> OllamaClient {
    let descriptor = BackendDescriptor::new(
        "local",
        BackendKind::Ollama,
        server.uri(),
        "llama3.2",
        CostTier::Local,
    );
    OllamaClient::new(
        descriptor,
        AdapterTimeouts {
            probe: Duration::from_millis(500),
            generation: Duration::from_secs(2),
        },
        GenerationDefaults::default(),
    )
}

#[tokio::test]
async fn generate_flattens_conversation_into_role_marked_prompt() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .and(body_partial_json(json!({
            "model": "llama3.2",
            "stream": false,
            "prompt": "System: You are a cinema trivia assistant\n\nUser: Name one 1950s Telugu classic\n\nAssistant:",
            "options": { "num_predict": 32 }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "model": "llama3.2",
            "response": "Mayabazar (1957)",
            "done": true,
            "prompt_eval_count": 20,
            "eval_count": 6
        })))
        .expect(1)
        .mount(&server)
        .await;

    let request = GenerationRequest::default()
        .system("You are a cinema trivia assistant")
        .user("Name one 1950s Telugu classic")
        .with_max_tokens(32);
    let response = client(&server).generate(&request).await.expect("response");

    assert_eq!(response.content, "Mayabazar (1957)");
    assert_eq!(response.provider, "local");
    assert_eq!(response.model, "llama3.2");
    assert_eq!(response.tokens_used, Some(26));
}

#[tokio::test]
async fn json_mode_sets_format() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .and(body_partial_json(json!({ "format": "json" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": "{\"title\":\"Mayabazar\"}"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let request = GenerationRequest::default().user("film as json").json();
    let response = client(&server).generate(&request).await.expect("response");
    assert_eq!(response.content, "{\"title\":\"Mayabazar\"}");
    assert_eq!(response.tokens_used, None);
}

#[tokio::test]
async fn oversized_token_counts_saturate() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": "ok",
            "prompt_eval_count": 4294967295u32,
            "eval_count": 1
        })))
        .mount(&server)
        .await;

    let response = client(&server)
        .generate(&GenerationRequest::default().user("hi"))
        .await
        .expect("response");
    assert_eq!(response.tokens_used, Some(u32::MAX));
}

#[tokio::test]
async fn server_error_is_reported_with_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(500).set_body_string("model crashed"))
        .mount(&server)
        .await;

    let err = client(&server)
        .generate(&GenerationRequest::default().user("hi"))
        .await
        .expect_err("status error");
    match err {
        ModelError::Status { status, body, .. } => {
            assert_eq!(status.as_u16(), 500);
            assert_eq!(body, "model crashed");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn probe_and_models_use_tag_listing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tags"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "models": [{ "name": "llama3.2:latest" }, { "name": "qwen2.5:7b" }]
        })))
        .mount(&server)
        .await;

    let client = client(&server);
    assert!(client.is_available().await);
    assert_eq!(
        client.get_models().await,
        vec!["llama3.2:latest".to_string(), "qwen2.5:7b".to_string()]
    );
}

#[tokio::test]
async fn probe_fails_when_tag_listing_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tags"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;
    let client = client(&server);

    assert!(!client.is_available().await);
    assert!(client.get_models().await.is_empty());
}

#[tokio::test]
async fn slow_tag_listing_is_bounded_by_probe_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tags"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "models": [] }))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    assert!(!client(&server).is_available().await);
}
