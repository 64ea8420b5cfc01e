//! Infrastructure services

mod agent_service;

pub use agent_service::{AgentService, AgentServiceTrait, INTERRUPTED_ERROR, StartOutcome};
