//! Ordered fallback router.
//!
//! One pass per call: for each backend in priority order, check the budget,
//! probe, dispatch. The first success is returned; if the chain runs out the
//! call fails with [`RouterError::Exhausted`]. Dispatch is strictly
//! sequential so a paid backend is never called while a cheaper one is
//! still in play.

use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{Instant, timeout};
use tracing::{Instrument, debug, info, info_span, warn};
use uuid::Uuid;

use super::error::{AttemptOutcome, RouteAttempt, RouterError};
use super::prompts;
use super::usage::{NoopUsageTracker, UsageTracker};
use crate::config::{CostTier, RouterConfig};
use crate::domain::{GenerationRequest, GenerationResponse};
use crate::infrastructure::model::clients::duration_ms;
use crate::infrastructure::model::{AdapterFactory, AdapterTimeouts, BackendAdapter};

/// Availability snapshot of one backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendStatus {
    pub id: String,
    pub cost_tier: CostTier,
    pub model: String,
    pub available: bool,
}

pub struct Router {
    backends: Vec<Arc<dyn BackendAdapter>>,
    usage: Arc<dyn UsageTracker>,
    probe_timeout: Duration,
    generation_timeout: Duration,
    parallel_probes: bool,
}

impl Router {
    pub fn builder() -> RouterBuilder {
        RouterBuilder::default()
    }

    /// Build the adapters for the configured chain and wrap them in a router.
    pub fn from_config(config: &RouterConfig) -> Result<Self, RouterError> {
        let adapters = AdapterFactory::from_config(config)?;
        Router::builder()
            .backends(adapters)
            .probe_timeout(config.probe_timeout)
            .generation_timeout(config.generation_timeout)
            .parallel_probes(config.parallel_probes)
            .build()
    }

    /// Backend ids in the order they are tried.
    pub fn backend_ids(&self) -> Vec<&str> {
        self.backends.iter().map(|b| b.id()).collect()
    }

    pub fn backend(&self, id: &str) -> Option<&Arc<dyn BackendAdapter>> {
        self.backends.iter().find(|b| b.id() == id)
    }

    /// Operator override of one backend's model.
    pub fn set_model(&self, backend: &str, model: &str) -> Result<(), RouterError> {
        let adapter = self
            .backend(backend)
            .ok_or_else(|| RouterError::UnknownBackend(backend.to_string()))?;
        info!(provider = backend, model, "Switching backend model");
        adapter.set_model(model);
        Ok(())
    }

    pub async fn models(&self, backend: &str) -> Result<Vec<String>, RouterError> {
        let adapter = self
            .backend(backend)
            .ok_or_else(|| RouterError::UnknownBackend(backend.to_string()))?;
        Ok(adapter.get_models().await)
    }

    /// Probe every backend concurrently.
    pub async fn probe_all(&self) -> Vec<BackendStatus> {
        let results = join_all(self.backends.iter().map(|b| self.probe(b.as_ref()))).await;
        self.backends
            .iter()
            .zip(results)
            .map(|(backend, available)| BackendStatus {
                id: backend.id().to_string(),
                cost_tier: backend.descriptor().cost_tier,
                model: backend.current_model(),
                available,
            })
            .collect()
    }

    /// Route one request through the fallback chain.
    ///
    /// Dropping the returned future cancels the in-flight backend call and
    /// stops the chain.
    pub async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResponse, RouterError> {
        request.validate()?;
        if self.backends.is_empty() {
            return Err(RouterError::NoBackends);
        }

        let span = info_span!(
            "generate",
            request_id = %Uuid::new_v4(),
            messages = request.messages.len()
        );
        self.run_chain(request).instrument(span).await
    }

    /// Canned Telugu cinema prompt for `topic`.
    pub async fn generate_telugu(&self, topic: &str) -> Result<GenerationResponse, RouterError> {
        let request = prompts::telugu_request(topic)?;
        self.generate(&request).await
    }

    async fn run_chain(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResponse, RouterError> {
        // Parallel mode settles budgets up front so denied backends are never probed.
        let precomputed = if self.parallel_probes {
            let allowed: Vec<bool> = self
                .backends
                .iter()
                .map(|b| self.usage.check_budget(b.descriptor(), request))
                .collect();
            let checks = self
                .backends
                .iter()
                .zip(&allowed)
                .map(|(b, allowed)| async move { *allowed && self.probe(b.as_ref()).await });
            let probes = join_all(checks).await;
            Some((allowed, probes))
        } else {
            None
        };

        let mut attempts = Vec::with_capacity(self.backends.len());
        for (index, backend) in self.backends.iter().enumerate() {
            let id = backend.id();

            let allowed = match &precomputed {
                Some((allowed, _)) => allowed[index],
                None => self.usage.check_budget(backend.descriptor(), request),
            };
            if !allowed {
                warn!(provider = id, "Usage tracker denied backend, skipping");
                attempts.push(RouteAttempt::new(id, AttemptOutcome::BudgetDenied));
                continue;
            }

            let available = match &precomputed {
                Some((_, probes)) => probes[index],
                None => self.probe(backend.as_ref()).await,
            };
            if !available {
                warn!(provider = id, "Backend unavailable, trying next");
                attempts.push(RouteAttempt::new(id, AttemptOutcome::Unavailable));
                continue;
            }

            info!(provider = id, model = %backend.current_model(), "Dispatching request");
            let started = Instant::now();
            match timeout(self.generation_timeout, backend.generate(request)).await {
                Ok(Ok(mut response)) => {
                    response.latency_ms = duration_ms(started.elapsed());
                    response.cached = false;
                    self.usage.record_usage(backend.descriptor(), &response);
                    info!(
                        provider = id,
                        model = response.model.as_str(),
                        latency_ms = response.latency_ms,
                        tokens = ?response.tokens_used,
                        fallbacks = attempts.len(),
                        "Generation succeeded"
                    );
                    return Ok(response);
                }
                Ok(Err(err)) => {
                    warn!(
                        provider = err.provider(),
                        hint = %err.user_message(),
                        %err,
                        "Backend call failed, trying next"
                    );
                    attempts.push(RouteAttempt::new(id, AttemptOutcome::Failed(err.to_string())));
                }
                Err(_) => {
                    warn!(
                        provider = id,
                        timeout_ms = duration_ms(self.generation_timeout),
                        "Backend call timed out, trying next"
                    );
                    attempts.push(RouteAttempt::new(id, AttemptOutcome::TimedOut));
                }
            }
        }

        Err(RouterError::Exhausted { attempts })
    }

    async fn probe(&self, backend: &dyn BackendAdapter) -> bool {
        let available = timeout(self.probe_timeout, backend.is_available())
            .await
            .unwrap_or(false);
        debug!(provider = backend.id(), available, "Probe finished");
        available
    }
}

/// Explicit construction of a [`Router`] from injected adapters.
pub struct RouterBuilder {
    backends: Vec<Arc<dyn BackendAdapter>>,
    priority: Option<Vec<String>>,
    usage: Arc<dyn UsageTracker>,
    timeouts: AdapterTimeouts,
    parallel_probes: bool,
}

impl Default for RouterBuilder {
    fn default() -> Self {
        Self {
            backends: Vec::new(),
            priority: None,
            usage: Arc::new(NoopUsageTracker),
            timeouts: AdapterTimeouts::default(),
            parallel_probes: false,
        }
    }
}

impl RouterBuilder {
    pub fn backend(mut self, adapter: Arc<dyn BackendAdapter>) -> Self {
        self.backends.push(adapter);
        self
    }

    pub fn backends<I>(mut self, adapters: I) -> Self
    where
        I: IntoIterator<Item = Arc<dyn BackendAdapter>>,
    {
        self.backends.extend(adapters);
        self
    }

    /// Reorder (and restrict) the chain by backend id.
    pub fn priority<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.priority = Some(ids.into_iter().map(Into::into).collect());
        self
    }

    pub fn usage_tracker(mut self, tracker: Arc<dyn UsageTracker>) -> Self {
        self.usage = tracker;
        self
    }

    pub fn probe_timeout(mut self, probe: Duration) -> Self {
        self.timeouts.probe = probe;
        self
    }

    pub fn generation_timeout(mut self, generation: Duration) -> Self {
        self.timeouts.generation = generation;
        self
    }

    pub fn parallel_probes(mut self, enabled: bool) -> Self {
        self.parallel_probes = enabled;
        self
    }

    pub fn build(self) -> Result<Router, RouterError> {
        let mut unique: Vec<Arc<dyn BackendAdapter>> = Vec::with_capacity(self.backends.len());
        for adapter in self.backends {
            if unique.iter().any(|b| b.id() == adapter.id()) {
                warn!(provider = adapter.id(), "Duplicate backend id ignored");
                continue;
            }
            unique.push(adapter);
        }

        let backends = match self.priority {
            None => unique,
            Some(order) => {
                let mut ordered = Vec::with_capacity(order.len());
                for id in order {
                    let adapter = unique
                        .iter()
                        .find(|b| b.id() == id)
                        .ok_or_else(|| RouterError::UnknownBackend(id.clone()))?;
                    if !ordered
                        .iter()
                        .any(|b: &Arc<dyn BackendAdapter>| b.id() == id)
                    {
                        ordered.push(Arc::clone(adapter));
                    }
                }
                ordered
            }
        };

        debug!(
            chain = ?backends.iter().map(|b| b.id()).collect::<Vec<_>>(),
            "Router built"
        );

        Ok(Router {
            backends,
            usage: self.usage,
            probe_timeout: self.timeouts.probe,
            generation_timeout: self.timeouts.generation,
            parallel_probes: self.parallel_probes,
        })
    }
}
