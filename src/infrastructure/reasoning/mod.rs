//! Reasoning gateway implementations

mod llm_reasoning;
mod prompts;

pub use llm_reasoning::LlmReasoningGateway;
