// Hugging Face adapter tests against a mocked inference API

use genroute_core::config::GenerationDefaults;
use genroute_core::infrastructure::model::clients::HuggingFaceClient;
use genroute_core::{
    AdapterTimeouts, BackendAdapter, BackendDescriptor, BackendKind, CostTier, GenerationRequest,
    ModelError,
};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const MODEL: &str = "mistralai/Mistral-7B-Instruct-v0.2";
const MODEL_PATH: &str = "/models/mistralai/Mistral-7B-Instruct-v0.2";

fn client(server: &MockServer, api_key: Option<&str>) -> HuggingFaceClient {
    let mut descriptor = BackendDescriptor::new(
        "free-cloud",
        BackendKind::HuggingFace,
        server.uri(),
        MODEL,
        CostTier::Free,
    );
    descriptor.models = vec!["google/gemma-7b-it".to_string()];
    HuggingFaceClient::new(
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
async fn generate_sends_instruction_prompt_with_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .and(header("authorization", "Bearer hf-test"))
        .and(body_partial_json(json!({
            "inputs": "<s>[INST] You are a cinema trivia assistant\n\nName one 1950s Telugu classic [/INST]",
            "parameters": { "return_full_text": false }
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([{ "generated_text": "  Mayabazar (1957)\n" }])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let request = GenerationRequest::default()
        .system("You are a cinema trivia assistant")
        .user("Name one 1950s Telugu classic");
    let response = client(&server, Some("hf-test"))
        .generate(&request)
        .await
        .expect("response");

    assert_eq!(response.content, "Mayabazar (1957)");
    assert_eq!(response.provider, "free-cloud");
    assert_eq!(response.model, MODEL);
}

#[tokio::test]
async fn empty_generation_list_is_invalid_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let err = client(&server, Some("hf-test"))
        .generate(&GenerationRequest::default().user("hi"))
        .await
        .expect_err("invalid");
    assert!(matches!(err, ModelError::InvalidResponse { .. }));
}

#[tokio::test]
async fn loading_model_still_counts_as_available() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({
            "error": "Model is currently loading",
            "estimated_time": 20.0
        })))
        .mount(&server)
        .await;

    assert!(client(&server, Some("hf-test")).is_available().await);
}

#[tokio::test]
async fn unauthorized_probe_is_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    assert!(!client(&server, Some("bad-key")).is_available().await);
}

#[tokio::test]
async fn missing_key_skips_network_entirely() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = client(&server, None);
    assert!(!client.is_available().await);
    let err = client
        .generate(&GenerationRequest::default().user("hi"))
        .await
        .expect_err("no key");
    assert!(matches!(err, ModelError::MissingApiKey { .. }));
}

#[tokio::test]
async fn models_come_from_configuration() {
    let server = MockServer::start().await;
    let models = client(&server, Some("hf-test")).get_models().await;
    assert_eq!(models, vec![MODEL.to_string(), "google/gemma-7b-it".to_string()]);
}
