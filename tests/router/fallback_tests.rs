// End-to-end routing tests: real adapters against mocked backends

use genroute_core::config::GenerationDefaults;
use genroute_core::{
    AdapterFactory, AdapterTimeouts, AttemptOutcome, BackendDescriptor, BackendKind, CostTier,
    GenerationRequest, GenerationService, Router, RouterConfig,
};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const HF_MODEL_PATH: &str = "/models/mistralai/Mistral-7B-Instruct-v0.2";

fn timeouts() -> AdapterTimeouts {
    AdapterTimeouts {
        probe: Duration::from_millis(500),
        generation: Duration::from_secs(2),
    }
}

fn trivia_request() -> GenerationRequest {
    GenerationRequest::default()
        .system("You are a cinema trivia assistant")
        .user("Name one 1950s Telugu classic")
}

fn ollama(server: &MockServer) -> BackendDescriptor {
    BackendDescriptor::new("local", BackendKind::Ollama, server.uri(), "llama3.2", CostTier::Local)
}

fn huggingface(server: &MockServer) -> BackendDescriptor {
    BackendDescriptor::new(
        "free-cloud",
        BackendKind::HuggingFace,
        server.uri(),
        "mistralai/Mistral-7B-Instruct-v0.2",
        CostTier::Free,
    )
}

async fn mount_down_ollama(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/tags"))
        .respond_with(ResponseTemplate::new(502))
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(server)
        .await;
}

#[tokio::test]
async fn local_down_falls_back_to_free_cloud() {
    let local_server = MockServer::start().await;
    mount_down_ollama(&local_server).await;

    let hf_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(HF_MODEL_PATH))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([{ "generated_text": "Mayabazar (1957)" }])),
        )
        .mount(&hf_server)
        .await;

    let defaults = GenerationDefaults::default();
    let router = Router::builder()
        .backend(AdapterFactory::create(&ollama(&local_server), timeouts(), defaults))
        .backend(AdapterFactory::create_with_key(
            &huggingface(&hf_server),
            Some("hf-test".into()),
            timeouts(),
            defaults,
        ))
        .build()
        .expect("router");

    let response = router.generate(&trivia_request()).await.expect("response");

    assert_eq!(response.content, "Mayabazar (1957)");
    assert_eq!(response.provider, "free-cloud");
    assert_eq!(response.model, "mistralai/Mistral-7B-Instruct-v0.2");
    assert!(!response.cached);
}

#[tokio::test]
async fn everything_down_names_every_backend() {
    let local_server = MockServer::start().await;
    mount_down_ollama(&local_server).await;

    let hf_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(HF_MODEL_PATH))
        .respond_with(ResponseTemplate::new(401))
        .mount(&hf_server)
        .await;

    let defaults = GenerationDefaults::default();
    let router = Router::builder()
        .backend(AdapterFactory::create(&ollama(&local_server), timeouts(), defaults))
        .backend(AdapterFactory::create_with_key(
            &huggingface(&hf_server),
            Some("hf-test".into()),
            timeouts(),
            defaults,
        ))
        .build()
        .expect("router");

    let err = router
        .generate(&trivia_request())
        .await
        .expect_err("exhausted");

    assert_eq!(err.tried_backends(), vec!["local", "free-cloud"]);
    assert_eq!(
        err.last_failure().map(|a| &a.outcome),
        Some(&AttemptOutcome::Unavailable)
    );
    let message = err.to_string();
    assert!(message.contains("local") && message.contains("free-cloud"), "{message}");
}

#[tokio::test]
async fn loading_model_that_then_fails_is_recorded_as_failure() {
    let hf_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(HF_MODEL_PATH))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({
            "error": "Model is currently loading"
        })))
        .mount(&hf_server)
        .await;

    let router = Router::builder()
        .backend(AdapterFactory::create_with_key(
            &huggingface(&hf_server),
            Some("hf-test".into()),
            timeouts(),
            GenerationDefaults::default(),
        ))
        .build()
        .expect("router");

    let err = router
        .generate(&trivia_request())
        .await
        .expect_err("exhausted");
    match err.last_failure().map(|a| &a.outcome) {
        Some(AttemptOutcome::Failed(reason)) => assert!(reason.contains("503"), "{reason}"),
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[tokio::test]
async fn service_from_config_routes_through_configured_chain() {
    let down = MockServer::start().await;
    mount_down_ollama(&down).await;

    let up = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tags"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "models": [{ "name": "qwen2.5:7b" }]
        })))
        .mount(&up)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": "మాయాబజార్ 1957లో విడుదలైంది."
        })))
        .expect(1)
        .mount(&up)
        .await;

    let config = RouterConfig::from_toml_str(&format!(
        r#"
priority = ["local", "lan-box"]
probe_timeout_ms = 500
generation_timeout_ms = 2000

[[backends]]
id = "local"
endpoint = "{down}"

[[backends]]
id = "lan-box"
type = "ollama"
endpoint = "{up}"
model = "qwen2.5:7b"
"#,
        down = down.uri(),
        up = up.uri(),
    ))
    .expect("config");

    let service = GenerationService::from_config(&config).expect("service");
    let response = service.generate_telugu("Mayabazar").await.expect("response");

    assert_eq!(response.provider, "lan-box");
    assert_eq!(response.model, "qwen2.5:7b");
    assert!(response.content.contains("మాయాబజార్"));
}

#[tokio::test]
async fn slow_backend_is_cut_off_by_router_timeout() {
    let slow = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tags"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "models": [] })))
        .mount(&slow)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "response": "too late" }))
                .set_delay(Duration::from_secs(10)),
        )
        .mount(&slow)
        .await;

    let router = Router::builder()
        .backend(AdapterFactory::create(
            &ollama(&slow),
            AdapterTimeouts {
                probe: Duration::from_millis(500),
                generation: Duration::from_secs(30),
            },
            GenerationDefaults::default(),
        ))
        .generation_timeout(Duration::from_millis(200))
        .build()
        .expect("router");

    let err = router
        .generate(&trivia_request())
        .await
        .expect_err("timed out");
    assert_eq!(
        err.last_failure().map(|a| &a.outcome),
        Some(&AttemptOutcome::TimedOut)
    );
}
