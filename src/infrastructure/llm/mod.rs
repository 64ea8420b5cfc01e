//! LLM provider implementations

mod openai;

pub use openai::{DEFAULT_OPENAI_BASE_URL, OpenAiProvider};
