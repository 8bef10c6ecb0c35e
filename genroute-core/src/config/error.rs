use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration file not found at {path:?}")]
    NotFound { path: PathBuf },

    #[error("failed to read config from {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config from {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to render config: {0}")]
    Render(#[from] toml::ser::Error),

    #[error("no backends configured - the priority list is empty")]
    NoBackendsConfigured,

    #[error("backend '{backend}' is referenced but not defined")]
    UnknownBackend { backend: String },

    #[error("backend '{backend}' has unsupported type '{backend_type}'")]
    UnsupportedBackendType {
        backend: String,
        backend_type: String,
    },

    #[error("backend '{backend}' is missing required field 'type'")]
    MissingType { backend: String },

    #[error("backend '{backend}' is missing required field 'endpoint'")]
    MissingEndpoint { backend: String },

    #[error("backend '{backend}' is missing required field 'model'")]
    MissingModel { backend: String },

    #[error("invalid value '{value}' for {key}")]
    InvalidValue { key: String, value: String },
}
