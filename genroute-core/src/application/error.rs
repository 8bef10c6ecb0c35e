use crate::config::ConfigError;
use crate::domain::RequestError;
use std::fmt;
use thiserror::Error;

/// What happened to one backend during a `generate` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// The availability probe said no (or timed out)
    Unavailable,
    /// The usage tracker refused the call
    BudgetDenied,
    /// The backend was called and failed
    Failed(String),
    /// The backend was called and did not answer in time
    TimedOut,
}

impl fmt::Display for AttemptOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttemptOutcome::Unavailable => f.write_str("unavailable"),
            AttemptOutcome::BudgetDenied => f.write_str("budget denied"),
            AttemptOutcome::Failed(reason) => write!(f, "failed: {reason}"),
            AttemptOutcome::TimedOut => f.write_str("timed out"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteAttempt {
    pub backend: String,
    pub outcome: AttemptOutcome,
}

impl RouteAttempt {
    pub fn new(backend: impl Into<String>, outcome: AttemptOutcome) -> Self {
        Self {
            backend: backend.into(),
            outcome,
        }
    }
}

impl fmt::Display for RouteAttempt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.backend, self.outcome)
    }
}

#[derive(Debug, Error)]
pub enum RouterError {
    #[error("invalid request: {0}")]
    InvalidRequest(#[from] RequestError),

    #[error("no backends configured")]
    NoBackends,

    #[error("backend '{0}' is not registered with the router")]
    UnknownBackend(String),

    #[error("all backends exhausted (tried: {}){}", tried_list(.attempts), last_failure_suffix(.attempts))]
    Exhausted { attempts: Vec<RouteAttempt> },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

fn tried_list(attempts: &[RouteAttempt]) -> String {
    attempts
        .iter()
        .map(|a| a.backend.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn last_failure_suffix(attempts: &[RouteAttempt]) -> String {
    attempts
        .last()
        .map(|attempt| format!("; last: {attempt}"))
        .unwrap_or_default()
}

impl RouterError {
    /// Backend ids attempted before giving up, in order.
    pub fn tried_backends(&self) -> Vec<&str> {
        match self {
            RouterError::Exhausted { attempts } => {
                attempts.iter().map(|a| a.backend.as_str()).collect()
            }
            _ => Vec::new(),
        }
    }

    pub fn last_failure(&self) -> Option<&RouteAttempt> {
        match self {
            RouterError::Exhausted { attempts } => attempts.last(),
            _ => None,
        }
    }

    pub fn is_exhausted(&self) -> bool {
        matches!(self, RouterError::Exhausted { .. })
    }

    pub fn user_message(&self) -> String {
        match self {
            RouterError::InvalidRequest(err) => format!("The request is invalid: {err}."),
            RouterError::NoBackends => {
                "No generation backends are configured. Check router.toml or GENROUTE_PRIORITY."
                    .to_string()
            }
            RouterError::UnknownBackend(id) => {
                format!("Backend '{id}' is not part of the configured chain.")
            }
            RouterError::Exhausted { attempts } => {
                let all_unavailable = attempts
                    .iter()
                    .all(|a| a.outcome == AttemptOutcome::Unavailable);
                if all_unavailable {
                    format!(
                        "No backend is reachable right now (tried {}). Is the local server running \
                         and are the cloud credentials set?",
                        tried_list(attempts)
                    )
                } else {
                    format!(
                        "Every backend failed (tried {}){}.",
                        tried_list(attempts),
                        last_failure_suffix(attempts)
                    )
                }
            }
            RouterError::Config(err) => format!("Configuration error: {err}."),
        }
    }
}
