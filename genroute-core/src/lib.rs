//! Provider-agnostic text generation with ordered fallback.
//!
//! A [`Router`] holds backend adapters in priority order and serves each
//! request from the first backend that is available and answers. Build one at
//! startup (usually through [`GenerationService::from_config`]) and share it.

pub mod application;
pub mod config;
pub mod constants;
pub mod domain;
pub mod infrastructure;

pub use application::{
    AttemptOutcome, GenerationService, NoopUsageTracker, RouteAttempt, Router, RouterBuilder,
    RouterError, UsageTracker,
};
pub use config::{BackendDescriptor, BackendKind, CapabilityRegistry, CostTier, RouterConfig};
pub use domain::{ChatMessage, GenerationOptions, GenerationRequest, GenerationResponse, MessageRole};
pub use infrastructure::model::{AdapterFactory, AdapterTimeouts, BackendAdapter, ModelError};
