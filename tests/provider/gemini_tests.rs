// Gemini adapter tests against a mocked generateContent API

use genroute_core::config::GenerationDefaults;
use genroute_core::infrastructure::model::clients::GeminiClient;
use genroute_core::{
    AdapterTimeouts, BackendAdapter, BackendDescriptor, BackendKind, CostTier, GenerationRequest,
    ModelError,
};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer, api_key: Option<&str>) -> GeminiClient {
    let descriptor = BackendDescriptor::new(
        "capable-paid",
        BackendKind::Gemini,
        server.uri(),
        "gemini-1.5-pro",
        CostTier::Paid,
    );
    GeminiClient::new(
        descriptor,
        api_key.map(String::from),
        AdapterTimeouts {
            probe: Duration::from_millis(500),
            generation: Duration::from_secs(2),
        },
        GenerationDefaults::default(),
    )
}

#[tokio::test]
async fn generate_moves_system_text_into_system_instruction() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-1.5-pro:generateContent"))
        .and(query_param("key", "g-test"))
        .and(body_partial_json(json!({
            "system_instruction": { "parts": [{ "text": "You are a cinema trivia assistant" }] },
            "contents": [
                { "role": "user", "parts": [{ "text": "Name one 1950s Telugu classic" }] }
            ],
            "generationConfig": { "maxOutputTokens": 64 }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": "Mayabazar (1957)" }] }
            }],
            "usageMetadata": { "totalTokenCount": 19 }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let request = GenerationRequest::default()
        .system("You are a cinema trivia assistant")
        .user("Name one 1950s Telugu classic")
        .with_max_tokens(64);
    let response = client(&server, Some("g-test"))
        .generate(&request)
        .await
        .expect("response");

    assert_eq!(response.content, "Mayabazar (1957)");
    assert_eq!(response.provider, "capable-paid");
    assert_eq!(response.model, "gemini-1.5-pro");
    assert_eq!(response.tokens_used, Some(19));
}

#[tokio::test]
async fn json_mode_sets_response_mime_type() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-1.5-pro:generateContent"))
        .and(body_partial_json(json!({
            "generationConfig": { "responseMimeType": "application/json" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{ "content": { "parts": [{ "text": "[]" }] } }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = client(&server, Some("g-test"))
        .generate(&GenerationRequest::default().user("list").json())
        .await
        .expect("response");
    assert_eq!(response.content, "[]");
}

#[tokio::test]
async fn blocked_prompt_without_candidates_is_invalid_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-1.5-pro:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "promptFeedback": { "blockReason": "SAFETY" }
        })))
        .mount(&server)
        .await;

    let err = client(&server, Some("g-test"))
        .generate(&GenerationRequest::default().user("hi"))
        .await
        .expect_err("invalid");
    assert!(matches!(err, ModelError::InvalidResponse { .. }));
}

#[tokio::test]
async fn model_listing_strips_resource_prefix() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1beta/models"))
        .and(query_param("key", "g-test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "models": [{ "name": "models/gemini-1.5-pro" }, { "name": "models/gemini-1.5-flash" }]
        })))
        .mount(&server)
        .await;

    let client = client(&server, Some("g-test"));
    assert!(client.is_available().await);
    assert_eq!(
        client.get_models().await,
        vec!["gemini-1.5-pro".to_string(), "gemini-1.5-flash".to_string()]
    );
}

#[tokio::test]
async fn rejected_key_is_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1beta/models"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": { "status": "INVALID_ARGUMENT" }
        })))
        .mount(&server)
        .await;

    assert!(!client(&server, Some("wrong")).is_available().await);
    assert!(!client(&server, None).is_available().await);
}
