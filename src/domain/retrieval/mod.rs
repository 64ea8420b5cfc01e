//! Retrieval domain: snippets, source filters and prompt packing

mod gateway;
mod packing;
mod snippet;

pub use gateway::RetrievalGateway;
pub use packing::{SNIPPET_SEPARATOR, pack_snippets};
pub use snippet::{RetrievedSnippet, SourceFilter, SourceKind};

#[cfg(test)]
pub use gateway::mock;
