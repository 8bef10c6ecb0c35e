//! Backend adapter trait

use super::types::ModelError;
use crate::config::BackendDescriptor;
use crate::domain::{GenerationRequest, GenerationResponse};
use async_trait::async_trait;

/// One inference backend behind the normalized contract.
///
/// Adapters translate and call; they never retry. Fallback belongs to the
/// router.
#[async_trait]
pub trait BackendAdapter: Send + Sync {
    /// Stable backend identifier
    fn id(&self) -> &str;

    fn descriptor(&self) -> &BackendDescriptor;

    /// Model currently requested from this backend
    fn current_model(&self) -> String;

    /// Replace the model used for subsequent calls
    fn set_model(&self, model: &str);

    /// Run one generation call. `latency_ms` covers the outbound call only.
    async fn generate(&self, request: &GenerationRequest)
    -> Result<GenerationResponse, ModelError>;

    /// Cheap, time-bounded reachability check. Never fails; errors mean `false`.
    async fn is_available(&self) -> bool;

    /// Best-effort model discovery; empty on error or when unsupported.
    async fn get_models(&self) -> Vec<String>;
}
