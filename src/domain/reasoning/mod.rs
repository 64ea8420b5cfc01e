//! Reasoning domain

mod gateway;

pub use gateway::{NextAction, ReasoningGateway};

#[cfg(test)]
pub use gateway::mock;
