use super::app::RouterConfig;
use super::backend::RawBackend;
use super::error::ConfigError;
use super::loader::RawConfig;

/// Render the effective configuration in the shape the loader reads.
pub fn to_toml_string(config: &RouterConfig) -> Result<String, ConfigError> {
    let raw = RawConfig {
        active_provider: config.active_provider.clone(),
        priority: Some(config.priority.clone()),
        default_temperature: Some(config.defaults.temperature),
        default_max_tokens: Some(config.defaults.max_tokens),
        probe_timeout_ms: Some(millis(config.probe_timeout)),
        generation_timeout_ms: Some(millis(config.generation_timeout)),
        parallel_probes: Some(config.parallel_probes),
        backends: config.registry.iter().map(RawBackend::from).collect(),
    };
    Ok(toml::to_string_pretty(&raw)?)
}

fn millis(duration: std::time::Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
