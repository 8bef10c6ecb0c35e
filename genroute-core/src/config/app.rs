use super::backend::BackendDescriptor;
use super::error::ConfigError;
use super::registry::CapabilityRegistry;
use crate::config::defaults::{DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE};
use crate::constants::{DEFAULT_GENERATION_TIMEOUT_MS, DEFAULT_PROBE_TIMEOUT_MS};
use std::path::Path;
use std::time::Duration;

/// Fallback generation parameters applied when a request leaves them unset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationDefaults {
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for GenerationDefaults {
    fn default() -> Self {
        Self {
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

/// Router configuration loaded once at startup from `router.toml` and the
/// process environment.
#[derive(Debug, Clone, PartialEq)]
pub struct RouterConfig {
    pub registry: CapabilityRegistry,
    /// Fallback chain, highest priority first
    pub priority: Vec<String>,
    /// Backend moved to the front of the chain, if set
    pub active_provider: Option<String>,
    pub defaults: GenerationDefaults,
    pub probe_timeout: Duration,
    pub generation_timeout: Duration,
    /// Probe every backend concurrently before dispatching
    pub parallel_probes: bool,
}

impl Default for RouterConfig {
    fn default() -> Self {
        let registry = CapabilityRegistry::builtin();
        Self {
            priority: registry.ids(),
            registry,
            active_provider: None,
            defaults: GenerationDefaults::default(),
            probe_timeout: Duration::from_millis(DEFAULT_PROBE_TIMEOUT_MS),
            generation_timeout: Duration::from_millis(DEFAULT_GENERATION_TIMEOUT_MS),
            parallel_probes: false,
        }
    }
}

impl RouterConfig {
    /// Load configuration from a file path (or default path if None), then
    /// apply environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        super::loader::load_config(path)
    }

    /// Like [`RouterConfig::load`], reading overrides through `lookup`
    /// instead of the process environment.
    pub fn load_with_env<F>(path: Option<&Path>, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        super::loader::load_config_with(path, lookup)
    }

    /// Parse a TOML document without consulting the environment.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        super::loader::parse_config(content, Path::new("<inline>"))
    }

    /// Apply `GENROUTE_*` overrides read through `lookup`.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        super::env::apply_overrides(self, lookup)
    }

    /// The fallback chain actually used by the router.
    pub fn effective_priority(&self) -> Vec<String> {
        let mut order = Vec::with_capacity(self.priority.len() + 1);
        if let Some(active) = &self.active_provider {
            order.push(active.clone());
        }
        for id in &self.priority {
            if !order.contains(id) {
                order.push(id.clone());
            }
        }
        order
    }

    /// Descriptors of the effective chain, in order.
    pub fn ordered_descriptors(&self) -> Result<Vec<&BackendDescriptor>, ConfigError> {
        self.effective_priority()
            .iter()
            .map(|id| {
                self.registry
                    .get(id)
                    .ok_or_else(|| ConfigError::UnknownBackend {
                        backend: id.clone(),
                    })
            })
            .collect()
    }

    /// Per-backend defaults layered over the global ones.
    pub fn defaults_for(&self, descriptor: &BackendDescriptor) -> GenerationDefaults {
        GenerationDefaults {
            temperature: descriptor.temperature.unwrap_or(self.defaults.temperature),
            max_tokens: descriptor.max_tokens.unwrap_or(self.defaults.max_tokens),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.priority.is_empty() && self.active_provider.is_none() {
            return Err(ConfigError::NoBackendsConfigured);
        }
        self.ordered_descriptors()?;

        let temperature = self.defaults.temperature;
        if !temperature.is_finite() || !(0.0..=2.0).contains(&temperature) {
            return Err(ConfigError::InvalidValue {
                key: "default_temperature".into(),
                value: temperature.to_string(),
            });
        }
        if self.defaults.max_tokens == 0 {
            return Err(ConfigError::InvalidValue {
                key: "default_max_tokens".into(),
                value: "0".into(),
            });
        }
        if self.probe_timeout.is_zero() {
            return Err(ConfigError::InvalidValue {
                key: "probe_timeout_ms".into(),
                value: "0".into(),
            });
        }
        if self.generation_timeout.is_zero() {
            return Err(ConfigError::InvalidValue {
                key: "generation_timeout_ms".into(),
                value: "0".into(),
            });
        }
        Ok(())
    }

    /// Convert configuration to TOML string
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        super::serializer::to_toml_string(self)
    }
}
