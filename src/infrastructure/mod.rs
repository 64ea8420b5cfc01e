//! Infrastructure layer - gateway adapters, storage backends and the workflow engine

pub mod agent;
pub mod approval;
pub mod http_client;
pub mod llm;
pub mod logging;
pub mod observability;
pub mod reasoning;
pub mod retrieval;
pub mod services;
pub mod storage;
pub mod work_item;
