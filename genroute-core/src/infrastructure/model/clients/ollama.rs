//! Ollama client implementation (locally hosted models)

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use tracing::{debug, info};

use super::base::{Auth, HttpClientBase, elapsed_ms};
use crate::config::{BackendDescriptor, GenerationDefaults};
use crate::domain::{GenerationRequest, GenerationResponse};
use crate::infrastructure::model::adapter::MessageAdapter;
use crate::infrastructure::model::factory::AdapterTimeouts;
use crate::infrastructure::model::traits::BackendAdapter;
use crate::infrastructure::model::types::ModelError;

/// Ollama client for local LLM. No credential; the prompt is flattened with
/// role markers and sent to `/api/generate`.
pub struct OllamaClient {
    base: HttpClientBase,
}

impl OllamaClient {
    pub fn new(
        descriptor: BackendDescriptor,
        timeouts: AdapterTimeouts,
        defaults: GenerationDefaults,
    ) -> Self {
        Self {
            base: HttpClientBase::new(descriptor, None, timeouts, defaults),
        }
    }

    async fn installed_models(&self) -> Result<Vec<String>, ModelError> {
        let url = self.base.build_url("/api/tags");
        let response: OllamaTags = self.base.get_json(&url, Auth::None).await?;
        Ok(response.models.into_iter().map(|m| m.name).collect())
    }
}

#[async_trait]
impl BackendAdapter for OllamaClient {
    fn id(&self) -> &str {
        self.base.id()
    }

    fn descriptor(&self) -> &BackendDescriptor {
        &self.base.descriptor
    }

    fn current_model(&self) -> String {
        self.base.current_model()
    }

    fn set_model(&self, model: &str) {
        self.base.set_model(model);
    }

    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResponse, ModelError> {
        let url = self.base.build_url("/api/generate");
        let model = self.base.current_model();

        let payload = OllamaRequest {
            model: model.clone(),
            prompt: MessageAdapter::to_role_marked_prompt(&request.messages),
            stream: false,
            format: request.options.json_mode.then_some("json"),
            options: OllamaOptions {
                temperature: self.base.temperature(&request.options),
                num_predict: self.base.max_tokens(&request.options),
            },
        };

        info!(
            provider = self.base.id(),
            model = model.as_str(),
            messages = request.messages.len(),
            "Sending request to Ollama"
        );

        let started = Instant::now();
        let response: OllamaResponse = self.base.post_json(&url, &payload, Auth::None).await?;
        let latency_ms = elapsed_ms(started);
        debug!(latency_ms, "Received response from Ollama");

        let tokens = match (response.prompt_eval_count, response.eval_count) {
            (None, None) => None,
            (prompt, completion) => {
                Some(prompt.unwrap_or(0).saturating_add(completion.unwrap_or(0)))
            }
        };

        Ok(GenerationResponse::new(response.response, self.base.id(), model)
            .with_tokens(tokens)
            .with_latency_ms(latency_ms))
    }

    async fn is_available(&self) -> bool {
        match self.installed_models().await {
            Ok(models) => {
                let wanted = self.base.current_model();
                if !models.iter().any(|name| same_model(name, &wanted)) {
                    debug!(
                        provider = self.base.id(),
                        model = wanted.as_str(),
                        "Ollama is up but the model is not installed yet"
                    );
                }
                true
            }
            Err(err) => {
                debug!(provider = self.base.id(), %err, "Ollama probe failed");
                false
            }
        }
    }

    async fn get_models(&self) -> Vec<String> {
        self.installed_models().await.unwrap_or_default()
    }
}

/// `llama3.2` and `llama3.2:latest` name the same model.
fn same_model(installed: &str, wanted: &str) -> bool {
    installed == wanted || installed.strip_suffix(":latest") == Some(wanted)
}

#[derive(Serialize)]
struct OllamaRequest {
    model: String,
    prompt: String,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<&'static str>,
    options: OllamaOptions,
}

#[derive(Serialize)]
struct OllamaOptions {
    temperature: f32,
    num_predict: u32,
}

#[derive(Deserialize)]
struct OllamaResponse {
    response: String,
    #[serde(default)]
    prompt_eval_count: Option<u32>,
    #[serde(default)]
    eval_count: Option<u32>,
}

#[derive(Deserialize)]
struct OllamaTags {
    #[serde(default)]
    models: Vec<OllamaModel>,
}

#[derive(Deserialize)]
struct OllamaModel {
    name: String,
}
