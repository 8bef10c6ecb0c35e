//! Token budget and usage accounting hook.

use crate::config::BackendDescriptor;
use crate::domain::{GenerationRequest, GenerationResponse};

/// Consulted by the router before and after each dispatch.
pub trait UsageTracker: Send + Sync {
    /// Whether `backend` may serve `request`. A `false` skips the backend.
    fn check_budget(&self, backend: &BackendDescriptor, request: &GenerationRequest) -> bool;

    /// Called once per successful response.
    fn record_usage(&self, backend: &BackendDescriptor, response: &GenerationResponse);
}

/// Allows everything and records nothing. The default tracker.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopUsageTracker;

impl UsageTracker for NoopUsageTracker {
    fn check_budget(&self, _backend: &BackendDescriptor, _request: &GenerationRequest) -> bool {
        true
    }

    fn record_usage(&self, _backend: &BackendDescriptor, _response: &GenerationResponse) {}
}
