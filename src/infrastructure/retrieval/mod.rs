//! Retrieval gateway implementations

mod http;
mod in_memory;

pub use http::HttpRetrievalGateway;
pub use in_memory::{InMemoryRetrievalGateway, IndexedDocument};
