pub const LOCAL_BACKEND_ID: &str = "local";
pub const FREE_CLOUD_BACKEND_ID: &str = "free-cloud";
pub const FAST_PAID_BACKEND_ID: &str = "fast-paid";
pub const CAPABLE_PAID_BACKEND_ID: &str = "capable-paid";

pub const DEFAULT_OLLAMA_ENDPOINT: &str = "http://127.0.0.1:11434";
pub const DEFAULT_OLLAMA_MODEL: &str = "llama3.2";

pub const DEFAULT_HUGGINGFACE_ENDPOINT: &str = "https://api-inference.huggingface.co";
pub const DEFAULT_HUGGINGFACE_MODEL: &str = "mistralai/Mistral-7B-Instruct-v0.2";
pub const DEFAULT_HUGGINGFACE_KEY_ENV: &str = "HUGGINGFACE_API_KEY";

pub const DEFAULT_GROQ_ENDPOINT: &str = "https://api.groq.com/openai";
pub const DEFAULT_GROQ_MODEL: &str = "llama-3.1-8b-instant";
pub const DEFAULT_GROQ_KEY_ENV: &str = "GROQ_API_KEY";

pub const DEFAULT_GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-pro";
pub const DEFAULT_GEMINI_KEY_ENV: &str = "GEMINI_API_KEY";

pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_MAX_TOKENS: u32 = 1024;
