//! Call-site facade over a shared [`Router`].

use std::sync::Arc;

use super::error::RouterError;
use super::router::Router;
use crate::config::RouterConfig;
use crate::domain::{GenerationRequest, GenerationResponse};

/// Cheap to clone; every clone routes through the same [`Router`].
///
/// Build one at startup and hand it to whatever needs text generation.
#[derive(Clone)]
pub struct GenerationService {
    router: Arc<Router>,
}

impl GenerationService {
    pub fn new(router: Router) -> Self {
        Self {
            router: Arc::new(router),
        }
    }

    pub fn from_shared(router: Arc<Router>) -> Self {
        Self { router }
    }

    pub fn from_config(config: &RouterConfig) -> Result<Self, RouterError> {
        Ok(Self::new(Router::from_config(config)?))
    }

    pub fn router(&self) -> &Arc<Router> {
        &self.router
    }

    pub async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResponse, RouterError> {
        self.router.generate(request).await
    }

    pub async fn generate_telugu(&self, topic: &str) -> Result<GenerationResponse, RouterError> {
        self.router.generate_telugu(topic).await
    }
}
