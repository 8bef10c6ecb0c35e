//! Adapter factory - creates backend adapters from descriptors

use super::clients::{GeminiClient, HuggingFaceClient, OllamaClient, OpenAIClient};
use super::traits::BackendAdapter;
use crate::config::{BackendDescriptor, BackendKind, GenerationDefaults, RouterConfig};
use crate::constants::{DEFAULT_GENERATION_TIMEOUT_MS, DEFAULT_PROBE_TIMEOUT_MS};
use std::env;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

/// Per-call timeouts applied by every adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdapterTimeouts {
    pub probe: Duration,
    pub generation: Duration,
}

impl Default for AdapterTimeouts {
    fn default() -> Self {
        Self {
            probe: Duration::from_millis(DEFAULT_PROBE_TIMEOUT_MS),
            generation: Duration::from_millis(DEFAULT_GENERATION_TIMEOUT_MS),
        }
    }
}

/// Resolve API key from the environment variable named by `var_name`
pub fn resolve_api_key(provider: &str, var_name: Option<&str>) -> Option<String> {
    let Some(raw) = var_name.map(str::trim) else {
        return None;
    };
    if raw.is_empty() {
        return None;
    }
    match env::var(raw) {
        Ok(value) => Some(value),
        Err(err) => {
            warn!(
                provider,
                env_var = raw,
                %err,
                "API key environment variable is not set"
            );
            None
        }
    }
}

/// Factory for creating backend adapters.
pub struct AdapterFactory;

impl AdapterFactory {
    /// Creates an adapter for the descriptor's wire format, resolving its
    /// credential from the environment.
    pub fn create(
        descriptor: &BackendDescriptor,
        timeouts: AdapterTimeouts,
        defaults: GenerationDefaults,
    ) -> Arc<dyn BackendAdapter> {
        let api_key = if descriptor.kind.requires_api_key() {
            resolve_api_key(&descriptor.id, descriptor.api_key.as_deref())
        } else {
            None
        };
        Self::create_with_key(descriptor, api_key, timeouts, defaults)
    }

    /// Creates an adapter with an already resolved credential.
    pub fn create_with_key(
        descriptor: &BackendDescriptor,
        api_key: Option<String>,
        timeouts: AdapterTimeouts,
        defaults: GenerationDefaults,
    ) -> Arc<dyn BackendAdapter> {
        let descriptor = descriptor.clone();
        match descriptor.kind {
            BackendKind::Ollama => Arc::new(OllamaClient::new(descriptor, timeouts, defaults)),
            BackendKind::HuggingFace => Arc::new(HuggingFaceClient::new(
                descriptor, api_key, timeouts, defaults,
            )),
            BackendKind::OpenAi => {
                Arc::new(OpenAIClient::new(descriptor, api_key, timeouts, defaults))
            }
            BackendKind::Gemini => {
                Arc::new(GeminiClient::new(descriptor, api_key, timeouts, defaults))
            }
        }
    }

    /// Adapters for the configured fallback chain, in priority order.
    pub fn from_config(
        config: &RouterConfig,
    ) -> Result<Vec<Arc<dyn BackendAdapter>>, crate::config::ConfigError> {
        let timeouts = AdapterTimeouts {
            probe: config.probe_timeout,
            generation: config.generation_timeout,
        };
        Ok(config
            .ordered_descriptors()?
            .into_iter()
            .map(|descriptor| Self::create(descriptor, timeouts, config.defaults_for(descriptor)))
            .collect())
    }
}
