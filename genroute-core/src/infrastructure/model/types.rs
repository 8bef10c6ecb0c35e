//! Adapter error type

use reqwest::StatusCode;
use thiserror::Error;

/// Failure of a single backend call. The router treats every variant the
/// same way: try the next backend.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("provider '{provider}' requires an API key")]
    MissingApiKey { provider: String },
    #[error("network error calling provider '{provider}': {source}")]
    Network {
        provider: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("provider '{provider}' returned status {status}: {body}")]
    Status {
        provider: String,
        status: StatusCode,
        body: String,
    },
    #[error("provider '{provider}' returned invalid response: {reason}")]
    InvalidResponse { provider: String, reason: String },
}

impl ModelError {
    pub fn missing_api_key(provider: impl Into<String>) -> Self {
        Self::MissingApiKey {
            provider: provider.into(),
        }
    }

    pub fn network(provider: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Network {
            provider: provider.into(),
            source,
        }
    }

    pub fn status(provider: impl Into<String>, status: StatusCode, body: impl Into<String>) -> Self {
        Self::Status {
            provider: provider.into(),
            status,
            body: body.into(),
        }
    }

    pub fn invalid_response(provider: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidResponse {
            provider: provider.into(),
            reason: reason.into(),
        }
    }

    pub fn provider(&self) -> &str {
        match self {
            ModelError::MissingApiKey { provider }
            | ModelError::Network { provider, .. }
            | ModelError::Status { provider, .. }
            | ModelError::InvalidResponse { provider, .. } => provider,
        }
    }

    /// Short operator-facing description
    pub fn user_message(&self) -> String {
        match self {
            ModelError::MissingApiKey { provider } => {
                format!("Provider '{provider}' needs an API key; set its credential variable.")
            }
            ModelError::Network { provider, source } => {
                if source.is_connect() {
                    format!("Cannot connect to provider '{provider}'. Is the service running?")
                } else if source.is_timeout() {
                    format!("Request to provider '{provider}' timed out.")
                } else {
                    format!("Network error while calling provider '{provider}'.")
                }
            }
            ModelError::Status {
                provider, status, ..
            } => match *status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    format!("Provider '{provider}' rejected the credential.")
                }
                StatusCode::TOO_MANY_REQUESTS => {
                    format!("Provider '{provider}' is rate limiting requests.")
                }
                StatusCode::SERVICE_UNAVAILABLE | StatusCode::BAD_GATEWAY => {
                    format!("Provider '{provider}' is temporarily unavailable.")
                }
                _ => format!(
                    "Request to provider '{provider}' failed with status {}.",
                    status.as_u16()
                ),
            },
            ModelError::InvalidResponse { provider, .. } => {
                format!("Provider '{provider}' returned a response that could not be read.")
            }
        }
    }
}
