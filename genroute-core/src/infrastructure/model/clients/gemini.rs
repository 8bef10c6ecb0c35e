//! Gemini client implementation

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tokio::time::Instant;
use tracing::{debug, info};

use super::base::{Auth, HttpClientBase, elapsed_ms};
use crate::config::{BackendDescriptor, GenerationDefaults};
use crate::constants::DEFAULT_GEMINI_API_PATH;
use crate::domain::{GenerationRequest, GenerationResponse};
use crate::infrastructure::model::adapter::MessageAdapter;
use crate::infrastructure::model::factory::AdapterTimeouts;
use crate::infrastructure::model::traits::BackendAdapter;
use crate::infrastructure::model::types::ModelError;

/// Gemini client for Google AI
pub struct GeminiClient {
    base: HttpClientBase,
    api_path: String,
}

impl GeminiClient {
    pub fn new(
        descriptor: BackendDescriptor,
        api_key: Option<String>,
        timeouts: AdapterTimeouts,
        defaults: GenerationDefaults,
    ) -> Self {
        let api_path = descriptor
            .api_path
            .clone()
            .unwrap_or_else(|| DEFAULT_GEMINI_API_PATH.to_string());
        Self {
            base: HttpClientBase::new(descriptor, api_key, timeouts, defaults),
            api_path,
        }
    }

    fn build_model_url(&self, model: &str) -> String {
        self.base
            .build_url(&format!("{}/{model}:generateContent", self.api_path))
    }

    async fn list_models(&self) -> Result<Vec<String>, ModelError> {
        let url = self.base.build_url(&self.api_path);
        let response: GeminiModelList = self.base.get_json(&url, Auth::QueryKey).await?;
        Ok(response
            .models
            .into_iter()
            .map(|m| {
                m.name
                    .strip_prefix("models/")
                    .map(String::from)
                    .unwrap_or(m.name)
            })
            .collect())
    }
}

#[async_trait]
impl BackendAdapter for GeminiClient {
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
        let url = self.build_model_url(&model);
        let (system_text, contents) = MessageAdapter::to_gemini_format(&request.messages);

        let mut generation_config = json!({
            "temperature": self.base.temperature(&request.options),
            "maxOutputTokens": self.base.max_tokens(&request.options),
        });
        if request.options.json_mode {
            generation_config["responseMimeType"] = json!("application/json");
        }

        let mut payload = json!({
            "contents": contents,
            "generationConfig": generation_config,
        });

        if let Some(system) = system_text {
            payload["system_instruction"] = json!({
                "parts": [{"text": system}]
            });
        }

        info!(
            provider = self.base.id(),
            model = model.as_str(),
            messages = request.messages.len(),
            "Sending request to Gemini"
        );

        let started = Instant::now();
        let response: GeminiResponse = self
            .base
            .post_json(&url, &payload, Auth::QueryKey)
            .await?;
        let latency_ms = elapsed_ms(started);
        debug!(latency_ms, "Received response from Gemini");

        let tokens = response
            .usage_metadata
            .as_ref()
            .and_then(|usage| usage.total_token_count);

        let content = response
            .candidates
            .unwrap_or_default()
            .into_iter()
            .flat_map(|c| c.content)
            .flat_map(|c| c.parts)
            .find_map(|p| p.text)
            .ok_or_else(|| ModelError::invalid_response(self.base.id(), "missing text"))?;

        Ok(GenerationResponse::new(content, self.base.id(), model)
            .with_tokens(tokens)
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

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    candidates: Option<Vec<GeminiCandidate>>,
    #[serde(default)]
    usage_metadata: Option<GeminiUsage>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContent>,
}

#[derive(Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Deserialize)]
struct GeminiPart {
    text: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiUsage {
    total_token_count: Option<u32>,
}

#[derive(Deserialize)]
struct GeminiModelList {
    #[serde(default)]
    models: Vec<GeminiModel>,
}

#[derive(Deserialize)]
struct GeminiModel {
    name: String,
}
