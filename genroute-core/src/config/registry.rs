//! Capability registry: the ordered table of known backends.

use super::backend::{BackendDescriptor, BackendKind, CostTier};
use super::defaults::*;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CapabilityRegistry {
    descriptors: Vec<BackendDescriptor>,
}

impl CapabilityRegistry {
    pub fn new(descriptors: Vec<BackendDescriptor>) -> Self {
        let mut registry = Self::default();
        for descriptor in descriptors {
            registry.upsert(descriptor);
        }
        registry
    }

    /// The four backends known out of the box, cheapest first.
    pub fn builtin() -> Self {
        Self::new(vec![
            BackendDescriptor::new(
                LOCAL_BACKEND_ID,
                BackendKind::Ollama,
                DEFAULT_OLLAMA_ENDPOINT,
                DEFAULT_OLLAMA_MODEL,
                CostTier::Local,
            ),
            BackendDescriptor::new(
                FREE_CLOUD_BACKEND_ID,
                BackendKind::HuggingFace,
                DEFAULT_HUGGINGFACE_ENDPOINT,
                DEFAULT_HUGGINGFACE_MODEL,
                CostTier::Free,
            )
            .with_api_key_env(DEFAULT_HUGGINGFACE_KEY_ENV),
            BackendDescriptor::new(
                FAST_PAID_BACKEND_ID,
                BackendKind::OpenAi,
                DEFAULT_GROQ_ENDPOINT,
                DEFAULT_GROQ_MODEL,
                CostTier::Paid,
            )
            .with_api_key_env(DEFAULT_GROQ_KEY_ENV),
            BackendDescriptor::new(
                CAPABLE_PAID_BACKEND_ID,
                BackendKind::Gemini,
                DEFAULT_GEMINI_ENDPOINT,
                DEFAULT_GEMINI_MODEL,
                CostTier::Paid,
            )
            .with_api_key_env(DEFAULT_GEMINI_KEY_ENV),
        ])
    }

    pub fn get(&self, id: &str) -> Option<&BackendDescriptor> {
        self.descriptors.iter().find(|d| d.id == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut BackendDescriptor> {
        self.descriptors.iter_mut().find(|d| d.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Insert a descriptor, replacing any existing one with the same id in place.
    pub fn upsert(&mut self, descriptor: BackendDescriptor) {
        match self.get_mut(&descriptor.id) {
            Some(existing) => *existing = descriptor,
            None => self.descriptors.push(descriptor),
        }
    }

    pub fn ids(&self) -> Vec<String> {
        self.descriptors.iter().map(|d| d.id.clone()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BackendDescriptor> {
        self.descriptors.iter()
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}
