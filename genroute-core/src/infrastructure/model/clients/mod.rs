//! Backend adapter implementations

mod base;
mod gemini;
mod huggingface;
mod ollama;
mod openai;

pub use base::{Auth, HttpClientBase, duration_ms, elapsed_ms};
pub use gemini::GeminiClient;
pub use huggingface::HuggingFaceClient;
pub use ollama::OllamaClient;
pub use openai::OpenAIClient;
