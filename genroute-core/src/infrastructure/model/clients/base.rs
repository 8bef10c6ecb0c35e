//! Base HTTP client with shared logic

use crate::config::{BackendDescriptor, GenerationDefaults};
use crate::constants::MAX_ERROR_BODY_CHARS;
use crate::domain::GenerationOptions;
use crate::infrastructure::model::factory::AdapterTimeouts;
use crate::infrastructure::model::types::ModelError;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::RwLock;
use std::time::Duration;
use tokio::time::Instant;

/// How a request carries the backend credential
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Auth {
    None,
    Bearer,
    /// `?key=...` query parameter (Gemini)
    QueryKey,
}

/// Base HTTP client with shared functionality
pub struct HttpClientBase {
    pub descriptor: BackendDescriptor,
    pub api_key: Option<String>,
    pub http: Client,
    pub timeouts: AdapterTimeouts,
    pub defaults: GenerationDefaults,
    model: RwLock<String>,
}

impl HttpClientBase {
    pub fn new(
        descriptor: BackendDescriptor,
        api_key: Option<String>,
        timeouts: AdapterTimeouts,
        defaults: GenerationDefaults,
    ) -> Self {
        let model = RwLock::new(descriptor.model.clone());
        Self {
            descriptor,
            api_key,
            http: Client::new(),
            timeouts,
            defaults,
            model,
        }
    }

    pub fn id(&self) -> &str {
        &self.descriptor.id
    }

    /// Build URL from endpoint and path
    pub fn build_url(&self, path: &str) -> String {
        let base = self.descriptor.endpoint.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{base}/{path}")
    }

    pub fn current_model(&self) -> String {
        match self.model.read() {
            Ok(model) => model.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn set_model(&self, model: &str) {
        let mut guard = match self.model.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *guard = model.to_string();
    }

    pub fn temperature(&self, options: &GenerationOptions) -> f32 {
        options.temperature.unwrap_or(self.defaults.temperature)
    }

    pub fn max_tokens(&self, options: &GenerationOptions) -> u32 {
        options.max_tokens.unwrap_or(self.defaults.max_tokens)
    }

    pub fn has_api_key(&self) -> bool {
        self.require_api_key().is_ok()
    }

    pub fn require_api_key(&self) -> Result<&str, ModelError> {
        self.api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| ModelError::missing_api_key(self.id()))
    }

    /// Post JSON with the generation timeout and decode the reply
    pub async fn post_json<Req, Res>(&self, url: &str, body: &Req, auth: Auth) -> Result<Res, ModelError>
    where
        Req: Serialize + ?Sized,
        Res: DeserializeOwned,
    {
        let builder = self
            .http
            .post(url)
            .json(body)
            .timeout(self.timeouts.generation);
        let builder = self.authorize(builder, auth)?;
        self.execute(builder).await
    }

    /// GET with the probe timeout and decode the reply
    pub async fn get_json<Res>(&self, url: &str, auth: Auth) -> Result<Res, ModelError>
    where
        Res: DeserializeOwned,
    {
        let builder = self.http.get(url).timeout(self.timeouts.probe);
        let builder = self.authorize(builder, auth)?;
        self.execute(builder).await
    }

    /// Post JSON with the probe timeout and report only the status code
    pub async fn post_status<Req>(&self, url: &str, body: &Req, auth: Auth) -> Result<StatusCode, ModelError>
    where
        Req: Serialize + ?Sized,
    {
        let builder = self.http.post(url).json(body).timeout(self.timeouts.probe);
        let builder = self.authorize(builder, auth)?;
        let response = builder
            .send()
            .await
            .map_err(|e| ModelError::network(self.id(), e))?;
        Ok(response.status())
    }

    fn authorize(&self, builder: RequestBuilder, auth: Auth) -> Result<RequestBuilder, ModelError> {
        match auth {
            Auth::None => Ok(builder),
            Auth::Bearer => {
                let api_key = self.require_api_key()?;
                Ok(builder.bearer_auth(api_key))
            }
            Auth::QueryKey => {
                let api_key = self.require_api_key()?;
                Ok(builder.query(&[("key", api_key)]))
            }
        }
    }

    async fn execute<Res>(&self, builder: RequestBuilder) -> Result<Res, ModelError>
    where
        Res: DeserializeOwned,
    {
        let response = builder
            .send()
            .await
            .map_err(|e| ModelError::network(self.id(), e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ModelError::status(self.id(), status, truncate(&body)));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ModelError::network(self.id(), e))?;
        serde_json::from_slice(&bytes)
            .map_err(|e| ModelError::invalid_response(self.id(), e.to_string()))
    }
}

/// Milliseconds since `started`
pub fn elapsed_ms(started: Instant) -> u64 {
    duration_ms(started.elapsed())
}

pub fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

fn truncate(body: &str) -> String {
    if body.chars().count() <= MAX_ERROR_BODY_CHARS {
        return body.to_string();
    }
    let mut cut: String = body.chars().take(MAX_ERROR_BODY_CHARS).collect();
    cut.push('…');
    cut
}
