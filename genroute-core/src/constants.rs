//! Application constants
//!
//! Single source of truth for paths and other constants.

/// Default configuration file path
pub const CONFIG_PATH: &str = "config/router.toml";

/// Default environment file path
pub const ENV_PATH: &str = "config/.env";

/// Prefix for every environment override key
pub const ENV_PREFIX: &str = "GENROUTE_";

/// Default Gemini API path (fallback when not specified in config)
pub const DEFAULT_GEMINI_API_PATH: &str = "v1beta/models";

/// Default OpenAI-compatible chat completions path
pub const DEFAULT_OPENAI_API_PATH: &str = "/v1/chat/completions";

/// Default probe timeout in milliseconds
pub const DEFAULT_PROBE_TIMEOUT_MS: u64 = 5_000;

/// Default full generation timeout in milliseconds
pub const DEFAULT_GENERATION_TIMEOUT_MS: u64 = 60_000;

/// Longest error body kept from a failed backend response
pub const MAX_ERROR_BODY_CHARS: usize = 512;
