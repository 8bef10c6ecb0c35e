//! Model infrastructure module
//!
//! Backend adapters that translate the normalized request into each
//! provider's wire format.
//!
//! # Structure
//! - `types` - Adapter error type
//! - `traits` - BackendAdapter trait
//! - `adapter` - Message format translators
//! - `factory` - Builds adapters from descriptors
//! - `clients` - Individual adapter implementations

pub mod adapter;
pub mod clients;
pub mod factory;
pub mod traits;
pub mod types;

pub use factory::{AdapterFactory, AdapterTimeouts};
pub use traits::BackendAdapter;
pub use types::ModelError;
