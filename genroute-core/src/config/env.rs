//! `GENROUTE_*` environment overrides.
//!
//! Keys: `ACTIVE_PROVIDER`, `PRIORITY` (comma separated), `DEFAULT_TEMPERATURE`,
//! `DEFAULT_MAX_TOKENS`, `PARALLEL_PROBES`, `PROBE_TIMEOUT_MS`,
//! `GENERATION_TIMEOUT_MS`, and per backend `<ID>_ENDPOINT`, `<ID>_MODEL`,
//! `<ID>_API_KEY_ENV`.

use super::app::RouterConfig;
use super::error::ConfigError;
use crate::constants::ENV_PREFIX;
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

pub(super) fn apply_overrides<F>(config: &mut RouterConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let read = |suffix: &str| -> Option<(String, String)> {
        let key = format!("{ENV_PREFIX}{suffix}");
        lookup(&key)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .map(|value| (key, value))
    };

    if let Some((_, value)) = read("ACTIVE_PROVIDER") {
        info!(provider = %value, "Active provider set from environment");
        config.active_provider = Some(value);
    }
    if let Some((_, value)) = read("PRIORITY") {
        config.priority = value
            .split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(String::from)
            .collect();
        info!(priority = ?config.priority, "Priority set from environment");
    }
    if let Some((key, value)) = read("DEFAULT_TEMPERATURE") {
        config.defaults.temperature = parse(&key, &value)?;
    }
    if let Some((key, value)) = read("DEFAULT_MAX_TOKENS") {
        config.defaults.max_tokens = parse(&key, &value)?;
    }
    if let Some((key, value)) = read("PARALLEL_PROBES") {
        config.parallel_probes = parse_bool(&key, &value)?;
    }
    if let Some((key, value)) = read("PROBE_TIMEOUT_MS") {
        config.probe_timeout = Duration::from_millis(parse(&key, &value)?);
    }
    if let Some((key, value)) = read("GENERATION_TIMEOUT_MS") {
        config.generation_timeout = Duration::from_millis(parse(&key, &value)?);
    }

    for id in config.registry.ids() {
        let Some(descriptor) = config.registry.get_mut(&id) else {
            continue;
        };
        let env_key = descriptor.env_key();
        if let Some((_, value)) = read(&format!("{env_key}_ENDPOINT")) {
            descriptor.endpoint = value;
        }
        if let Some((_, value)) = read(&format!("{env_key}_MODEL")) {
            descriptor.model = value;
        }
        if let Some((_, value)) = read(&format!("{env_key}_API_KEY_ENV")) {
            descriptor.api_key = Some(value);
        }
    }

    Ok(())
}

fn parse<T: FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}
