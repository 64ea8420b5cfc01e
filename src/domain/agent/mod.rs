//! Agent domain: context, policy and failure taxonomy of the step loop

mod context;
mod error;
mod policy;

pub use context::{ContextAccumulator, ContextFragment, FragmentIntent};
pub use error::AgentError;
pub use policy::{
    AgentEngineConfig, DEFAULT_CONTEXT_CHAR_LIMIT, DEFAULT_MAX_STEPS, DEFAULT_RETRIEVAL_TOP_K,
    RetryPolicy,
};
