//! Tunables of the step loop

use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_STEPS: u32 = 5;
pub const DEFAULT_CONTEXT_CHAR_LIMIT: usize = 3750;
pub const DEFAULT_RETRIEVAL_TOP_K: u32 = 5;

/// How the retry budget is spent and refilled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Reasoning iterations allowed before giving up
    pub max_steps: u32,
    /// Refill the budget after a human rejects a draft with feedback
    pub reset_on_feedback: bool,
    /// Count an unparsable reasoning response against the budget
    pub parse_failure_consumes_step: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_steps: DEFAULT_MAX_STEPS,
            reset_on_feedback: true,
            parse_failure_consumes_step: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentEngineConfig {
    pub retry: RetryPolicy,
    /// Upper bound, in characters, of one packed retrieval block
    pub context_char_limit: usize,
    pub retrieval_top_k: u32,
}

impl Default for AgentEngineConfig {
    fn default() -> Self {
        Self {
            retry: RetryPolicy::default(),
            context_char_limit: DEFAULT_CONTEXT_CHAR_LIMIT,
            retrieval_top_k: DEFAULT_RETRIEVAL_TOP_K,
        }
    }
}

impl AgentEngineConfig {
    pub fn with_max_steps(mut self, max_steps: u32) -> Self {
        self.retry.max_steps = max_steps;
        self
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_context_char_limit(mut self, limit: usize) -> Self {
        self.context_char_limit = limit;
        self
    }
}
