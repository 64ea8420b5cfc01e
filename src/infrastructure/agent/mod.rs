//! Agent workflow engine

mod engine;

pub use engine::AgentEngine;
