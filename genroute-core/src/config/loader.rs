use super::app::{GenerationDefaults, RouterConfig};
use super::backend::RawBackend;
use super::error::ConfigError;
use super::registry::CapabilityRegistry;
use crate::constants::{CONFIG_PATH, ENV_PATH};
use dotenvy::from_filename;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io;
use std::path::Path;
use std::sync::Once;
use std::time::Duration;
use tracing::{debug, info};

static ENV_LOADER: Once = Once::new();

/// Raw configuration structure for (de)serialization from TOML
#[derive(Debug, Default, Deserialize, Serialize)]
pub(super) struct RawConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_provider: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_temperature: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_max_tokens: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub probe_timeout_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generation_timeout_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parallel_probes: Option<bool>,
    #[serde(default)]
    pub backends: Vec<RawBackend>,
}

/// Ensures environment variables are loaded from config/.env
pub fn ensure_env_loaded() {
    ENV_LOADER.call_once(|| {
        let _ = from_filename(ENV_PATH);
    });
}

/// Load file configuration, apply environment overrides and validate.
///
/// An explicitly named file must exist. When no path is given and the
/// default file is absent, the builtin registry is used.
pub fn load_config(path: Option<&Path>) -> Result<RouterConfig, ConfigError> {
    ensure_env_loaded();
    load_config_with(path, |key| env::var(key).ok())
}

/// Same as [`load_config`] with environment values read through `lookup`.
/// Validation runs once, after overrides, so the environment can repair the file.
pub fn load_config_with<F>(path: Option<&Path>, lookup: F) -> Result<RouterConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match path {
        Some(path) => read_config(path)?,
        None => {
            let default_path = Path::new(CONFIG_PATH);
            if default_path.exists() {
                read_config(default_path)?
            } else {
                info!(
                    path = CONFIG_PATH,
                    "No configuration file found, using builtin backends"
                );
                RouterConfig::default()
            }
        }
    };
    config.apply_env_overrides(lookup)?;
    config.validate()?;
    Ok(config)
}

fn read_config(path: &Path) -> Result<RouterConfig, ConfigError> {
    debug!(path = %path.display(), "Reading router configuration file");

    let content = fs::read_to_string(path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            ConfigError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    parse_unvalidated(&content, path)
}

pub(super) fn parse_config(content: &str, path: &Path) -> Result<RouterConfig, ConfigError> {
    let config = parse_unvalidated(content, path)?;
    config.validate()?;
    Ok(config)
}

fn parse_unvalidated(content: &str, path: &Path) -> Result<RouterConfig, ConfigError> {
    let parsed: RawConfig = toml::from_str(content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    build(parsed)
}

fn build(parsed: RawConfig) -> Result<RouterConfig, ConfigError> {
    let mut registry = CapabilityRegistry::builtin();
    for raw in parsed.backends {
        let descriptor = match registry.get(&raw.id) {
            Some(existing) => raw.apply_to(existing.clone())?,
            None => raw.into_descriptor()?,
        };
        registry.upsert(descriptor);
    }

    let priority = parsed.priority.unwrap_or_else(|| registry.ids());
    let defaults = RouterConfig::default();

    Ok(RouterConfig {
        registry,
        priority,
        active_provider: parsed.active_provider,
        defaults: GenerationDefaults {
            temperature: parsed.default_temperature.unwrap_or(defaults.defaults.temperature),
            max_tokens: parsed.default_max_tokens.unwrap_or(defaults.defaults.max_tokens),
        },
        probe_timeout: parsed
            .probe_timeout_ms
            .map(Duration::from_millis)
            .unwrap_or(defaults.probe_timeout),
        generation_timeout: parsed
            .generation_timeout_ms
            .map(Duration::from_millis)
            .unwrap_or(defaults.generation_timeout),
        parallel_probes: parsed.parallel_probes.unwrap_or(defaults.parallel_probes),
    })
}
