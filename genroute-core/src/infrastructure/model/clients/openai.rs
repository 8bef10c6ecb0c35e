//! OpenAI-compatible client implementation

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tokio::time::Instant;
use tracing::{debug, info};

use super::base::{Auth, HttpClientBase, elapsed_ms};
use crate::config::{BackendDescriptor, GenerationDefaults};
use crate::constants::DEFAULT_OPENAI_API_PATH;
use crate::domain::{GenerationRequest, GenerationResponse};
use crate::infrastructure::model::adapter::MessageAdapter;
use crate::infrastructure::model::factory::AdapterTimeouts;
use crate::infrastructure::model::traits::BackendAdapter;
use crate::infrastructure::model::types::ModelError;

const MODELS_PATH: &str = "/v1/models";

/// OpenAI-compatible client (works with OpenAI, Groq, OpenRouter, etc.)
pub struct OpenAIClient {
    base: HttpClientBase,
    api_path: String,
    models_path: String,
}

impl OpenAIClient {
    pub fn new(
        descriptor: BackendDescriptor,
        api_key: Option<String>,
        timeouts: AdapterTimeouts,
        defaults: GenerationDefaults,
    ) -> Self {
        let api_path = descriptor
            .api_path
            .clone()
            .unwrap_or_else(|| DEFAULT_OPENAI_API_PATH.to_string());
        let models_path = models_path_for(&api_path);
        Self {
            base: HttpClientBase::new(descriptor, api_key, timeouts, defaults),
            api_path,
            models_path,
        }
    }

    async fn list_models(&self) -> Result<Vec<String>, ModelError> {
        let url = self.base.build_url(&self.models_path);
        let response: OpenAIModelList = self.base.get_json(&url, Auth::Bearer).await?;
        Ok(response.data.into_iter().map(|m| m.id).collect())
    }
}

/// Model listing lives next to the completions route, e.g.
/// `/api/v1/chat/completions` lists at `/api/v1/models`.
fn models_path_for(api_path: &str) -> String {
    match api_path.trim_end_matches('/').strip_suffix("chat/completions") {
        Some(prefix) => format!("{prefix}models"),
        None => MODELS_PATH.to_string(),
    }
}

#[async_trait]
impl BackendAdapter for OpenAIClient {
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
        self.base.require_api_key()?;
        let url = self.base.build_url(&self.api_path);
        let model = self.base.current_model();

        let payload = OpenAIRequest {
            model: model.clone(),
            messages: MessageAdapter::to_openai_format(&request.messages),
            temperature: self.base.temperature(&request.options),
            max_tokens: self.base.max_tokens(&request.options),
            stream: false,
            response_format: request
                .options
                .json_mode
                .then(|| json!({"type": "json_object"})),
        };

        info!(
            provider = self.base.id(),
            model = model.as_str(),
            messages = request.messages.len(),
            "Sending request to OpenAI-compatible provider"
        );

        let started = Instant::now();
        let response: OpenAIResponse = self.base.post_json(&url, &payload, Auth::Bearer).await?;
        let latency_ms = elapsed_ms(started);
        debug!(latency_ms, "Received response from OpenAI-compatible provider");

        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .map(|m| m.content.unwrap_or_default())
            .ok_or_else(|| ModelError::invalid_response(self.base.id(), "missing choices"))?;

        Ok(GenerationResponse::new(content, self.base.id(), model)
            .with_tokens(response.usage.map(|u| u.total_tokens))
            .with_latency_ms(latency_ms))
    }

    async fn is_available(&self) -> bool {
        if !self.base.has_api_key() {
            debug!(provider = self.base.id(), "No credential, skipping probe");
            return false;
        }
        match self.list_models().await {
            Ok(_) => true,
            Err(err) => {
                debug!(provider = self.base.id(), %err, "Probe failed");
                false
            }
        }
    }

    async fn get_models(&self) -> Vec<String> {
        if !self.base.has_api_key() {
            return Vec::new();
        }
        self.list_models().await.unwrap_or_default()
    }
}

#[derive(Serialize)]
struct OpenAIRequest {
    model: String,
    messages: Vec<Value>,
    temperature: f32,
    max_tokens: u32,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<Value>,
}

#[derive(Deserialize)]
struct OpenAIResponse {
    choices: Vec<OpenAIChoice>,
    #[serde(default)]
    usage: Option<OpenAIUsage>,
}

#[derive(Deserialize)]
struct OpenAIChoice {
    message: Option<OpenAIMessage>,
}

#[derive(Deserialize)]
struct OpenAIMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct OpenAIUsage {
    total_tokens: u32,
}

#[derive(Deserialize)]
struct OpenAIModelList {
    #[serde(default)]
    data: Vec<OpenAIModel>,
}

#[derive(Deserialize)]
struct OpenAIModel {
    id: String,
}
