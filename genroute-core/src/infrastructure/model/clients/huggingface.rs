//! Hugging Face Inference API client (free, rate-limited tier)

use async_trait::async_trait;
use reqwest::StatusCode;
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

/// Hugging Face text-generation client. There is no cheap health endpoint,
/// so the probe is a one-token generation; a `503` (model loading) still
/// counts as available.
pub struct HuggingFaceClient {
    base: HttpClientBase,
}

impl HuggingFaceClient {
    pub fn new(
        descriptor: BackendDescriptor,
        api_key: Option<String>,
        timeouts: AdapterTimeouts,
        defaults: GenerationDefaults,
    ) -> Self {
        Self {
            base: HttpClientBase::new(descriptor, api_key, timeouts, defaults),
        }
    }

    fn model_url(&self, model: &str) -> String {
        self.base.build_url(&format!("models/{model}"))
    }
}

#[async_trait]
impl BackendAdapter for HuggingFaceClient {
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
        let model = self.base.current_model();
        let url = self.model_url(&model);

        let payload = HuggingFaceRequest {
            inputs: MessageAdapter::to_instruction_prompt(&request.messages),
            parameters: HuggingFaceParameters {
                max_new_tokens: self.base.max_tokens(&request.options),
                temperature: Some(self.base.temperature(&request.options)),
                return_full_text: false,
            },
            options: HuggingFaceOptions {
                wait_for_model: false,
            },
        };

        info!(
            provider = self.base.id(),
            model = model.as_str(),
            messages = request.messages.len(),
            "Sending request to Hugging Face"
        );

        let started = Instant::now();
        let response: Vec<HuggingFaceGeneration> =
            self.base.post_json(&url, &payload, Auth::Bearer).await?;
        let latency_ms = elapsed_ms(started);
        debug!(latency_ms, "Received response from Hugging Face");

        let content = response
            .into_iter()
            .next()
            .map(|g| g.generated_text)
            .ok_or_else(|| ModelError::invalid_response(self.base.id(), "empty generation list"))?;

        Ok(GenerationResponse::new(content.trim(), self.base.id(), model)
            .with_latency_ms(latency_ms))
    }

    async fn is_available(&self) -> bool {
        if !self.base.has_api_key() {
            debug!(provider = self.base.id(), "No credential, skipping probe");
            return false;
        }

        let payload = HuggingFaceRequest {
            inputs: "ping".to_string(),
            parameters: HuggingFaceParameters {
                max_new_tokens: 1,
                temperature: None,
                return_full_text: false,
            },
            options: HuggingFaceOptions {
                wait_for_model: false,
            },
        };
        let url = self.model_url(&self.base.current_model());

        match self.base.post_status(&url, &payload, Auth::Bearer).await {
            Ok(status) if status.is_success() => true,
            Ok(StatusCode::SERVICE_UNAVAILABLE) => {
                debug!(provider = self.base.id(), "Model is loading, treating as available");
                true
            }
            Ok(status) => {
                debug!(provider = self.base.id(), %status, "Probe rejected");
                false
            }
            Err(err) => {
                debug!(provider = self.base.id(), %err, "Probe failed");
                false
            }
        }
    }

    async fn get_models(&self) -> Vec<String> {
        self.base.descriptor.known_models()
    }
}

#[derive(Serialize)]
struct HuggingFaceRequest {
    inputs: String,
    parameters: HuggingFaceParameters,
    options: HuggingFaceOptions,
}

#[derive(Serialize)]
struct HuggingFaceParameters {
    max_new_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    return_full_text: bool,
}

#[derive(Serialize)]
struct HuggingFaceOptions {
    wait_for_model: bool,
}

#[derive(Deserialize)]
struct HuggingFaceGeneration {
    generated_text: String,
}
