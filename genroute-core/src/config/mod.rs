pub mod app;
pub mod backend;
pub mod defaults;
pub mod env;
pub mod error;
pub mod loader;
pub mod registry;
pub mod serializer;

pub use app::{GenerationDefaults, RouterConfig};
pub use backend::{BackendDescriptor, BackendKind, CostTier};
pub use error::ConfigError;
pub use registry::CapabilityRegistry;
