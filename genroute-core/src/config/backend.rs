//! # Backend Descriptors
//!
//! One descriptor per inference backend: identity, wire format, endpoint,
//! credential source, default model and cost tier.
//!
//! | Kind | Wire format | Credential |
//! |------|-------------|------------|
//! | `ollama` | flattened prompt, `/api/generate` | none |
//! | `huggingface` | instruction markers, `/models/{model}` | bearer |
//! | `openai` | chat completions | bearer |
//! | `gemini` | `generateContent` | query key |

use super::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Wire format family of a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendKind {
    Ollama,
    HuggingFace,
    OpenAi,
    Gemini,
}

impl BackendKind {
    /// Parse a configured type string (case-insensitive, with aliases).
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "ollama" | "localai" => Some(BackendKind::Ollama),
            "huggingface" | "hf" => Some(BackendKind::HuggingFace),
            "openai" | "groq" | "openai-compatible" => Some(BackendKind::OpenAi),
            "gemini" | "google" => Some(BackendKind::Gemini),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BackendKind::Ollama => "ollama",
            BackendKind::HuggingFace => "huggingface",
            BackendKind::OpenAi => "openai",
            BackendKind::Gemini => "gemini",
        }
    }

    /// Whether the backend needs a credential to be called at all.
    pub fn requires_api_key(self) -> bool {
        !matches!(self, BackendKind::Ollama)
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declared cost of calling a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CostTier {
    /// Free, runs on local hardware.
    Local,
    /// Free but rate-limited cloud endpoint.
    Free,
    Paid,
}

impl CostTier {
    pub fn as_str(self) -> &'static str {
        match self {
            CostTier::Local => "local",
            CostTier::Free => "free",
            CostTier::Paid => "paid",
        }
    }
}

impl fmt::Display for CostTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static description of one backend. Built once at startup; immutable
/// afterwards.
///
/// # Example
///
/// ```toml
/// [[backends]]
/// id = "free-cloud"
/// type = "huggingface"
/// endpoint = "https://api-inference.huggingface.co"
/// model = "mistralai/Mistral-7B-Instruct-v0.2"
/// api_key = "HUGGINGFACE_API_KEY"
/// cost_tier = "free"
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct BackendDescriptor {
    /// Stable key, e.g. "local" or "free-cloud"
    pub id: String,
    pub kind: BackendKind,
    /// Base URL of the backend
    pub endpoint: String,
    /// Default model requested from this backend
    pub model: String,
    /// Additional known model names, used for discovery fallbacks
    pub models: Vec<String>,
    /// Name of the environment variable that holds the credential
    pub api_key: Option<String>,
    /// Custom API path override
    pub api_path: Option<String>,
    pub cost_tier: CostTier,
    /// Backend-specific default temperature
    pub temperature: Option<f32>,
    /// Backend-specific default output budget
    pub max_tokens: Option<u32>,
}

impl BackendDescriptor {
    pub fn new(
        id: impl Into<String>,
        kind: BackendKind,
        endpoint: impl Into<String>,
        model: impl Into<String>,
        cost_tier: CostTier,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            endpoint: endpoint.into(),
            model: model.into(),
            models: Vec::new(),
            api_key: None,
            api_path: None,
            cost_tier,
            temperature: None,
            max_tokens: None,
        }
    }

    pub fn with_api_key_env(mut self, var: impl Into<String>) -> Self {
        self.api_key = Some(var.into());
        self
    }

    pub fn with_api_path(mut self, path: impl Into<String>) -> Self {
        self.api_path = Some(path.into());
        self
    }

    /// Known model names, with the default model first.
    pub fn known_models(&self) -> Vec<String> {
        let mut names = vec![self.model.clone()];
        for name in &self.models {
            if !names.contains(name) {
                names.push(name.clone());
            }
        }
        names
    }

    /// Key fragment used in `GENROUTE_<ID>_*` environment overrides.
    pub fn env_key(&self) -> String {
        self.id.to_uppercase().replace(['-', '.', ' '], "_")
    }
}

/// One `[[backends]]` entry as written in the config file. Every field except
/// `id` is optional so an entry can patch a builtin descriptor.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub(super) struct RawBackend {
    pub(super) id: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub(super) backend_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(super) endpoint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(super) model: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub(super) models: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(super) api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(super) api_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(super) cost_tier: Option<CostTier>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(super) temperature: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(super) max_tokens: Option<u32>,
}

impl RawBackend {
    /// Overlay this entry on an existing descriptor.
    pub(super) fn apply_to(
        self,
        mut descriptor: BackendDescriptor,
    ) -> Result<BackendDescriptor, ConfigError> {
        if let Some(raw_type) = self.backend_type {
            descriptor.kind = parse_kind(&self.id, &raw_type)?;
        }
        if let Some(endpoint) = self.endpoint {
            descriptor.endpoint = expand(&self.id, &endpoint)?;
        }
        if let Some(model) = self.model {
            descriptor.model = model;
        }
        if !self.models.is_empty() {
            descriptor.models = self.models;
        }
        if self.api_key.is_some() {
            descriptor.api_key = self.api_key;
        }
        if self.api_path.is_some() {
            descriptor.api_path = self.api_path;
        }
        if let Some(tier) = self.cost_tier {
            descriptor.cost_tier = tier;
        }
        if self.temperature.is_some() {
            descriptor.temperature = self.temperature;
        }
        if self.max_tokens.is_some() {
            descriptor.max_tokens = self.max_tokens;
        }
        Ok(descriptor)
    }

    /// Build a descriptor for a backend the builtin registry does not know.
    pub(super) fn into_descriptor(self) -> Result<BackendDescriptor, ConfigError> {
        let raw_type = self.backend_type.clone().ok_or_else(|| ConfigError::MissingType {
            backend: self.id.clone(),
        })?;
        let kind = parse_kind(&self.id, &raw_type)?;
        let endpoint = self.endpoint.clone().ok_or_else(|| ConfigError::MissingEndpoint {
            backend: self.id.clone(),
        })?;
        let model = self.model.clone().ok_or_else(|| ConfigError::MissingModel {
            backend: self.id.clone(),
        })?;
        let tier = self.cost_tier.unwrap_or(match kind {
            BackendKind::Ollama => CostTier::Local,
            _ => CostTier::Paid,
        });
        let base = BackendDescriptor::new(self.id.clone(), kind, endpoint, model, tier);
        self.apply_to(base)
    }
}

impl From<&BackendDescriptor> for RawBackend {
    fn from(descriptor: &BackendDescriptor) -> Self {
        Self {
            id: descriptor.id.clone(),
            backend_type: Some(descriptor.kind.as_str().to_string()),
            endpoint: Some(descriptor.endpoint.clone()),
            model: Some(descriptor.model.clone()),
            models: descriptor.models.clone(),
            api_key: descriptor.api_key.clone(),
            api_path: descriptor.api_path.clone(),
            cost_tier: Some(descriptor.cost_tier),
            temperature: descriptor.temperature,
            max_tokens: descriptor.max_tokens,
        }
    }
}

fn parse_kind(backend: &str, raw: &str) -> Result<BackendKind, ConfigError> {
    BackendKind::parse(raw).ok_or_else(|| ConfigError::UnsupportedBackendType {
        backend: backend.to_string(),
        backend_type: raw.to_string(),
    })
}

fn expand(backend: &str, value: &str) -> Result<String, ConfigError> {
    shellexpand::full(value)
        .map(|expanded| expanded.into_owned())
        .map_err(|err| ConfigError::InvalidValue {
            key: format!("backends.{backend}.endpoint"),
            value: err.to_string(),
        })
}
