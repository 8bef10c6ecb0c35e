pub mod error;
pub mod prompts;
pub mod router;
pub mod service;
pub mod usage;

pub use error::{AttemptOutcome, RouteAttempt, RouterError};
pub use router::{Router, RouterBuilder};
pub use service::GenerationService;
pub use usage::{NoopUsageTracker, UsageTracker};
