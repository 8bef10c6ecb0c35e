pub mod types;

pub use types::{
    ChatMessage, GenerationOptions, GenerationRequest, GenerationResponse, MessageRole,
    RequestError,
};
