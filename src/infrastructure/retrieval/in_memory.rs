//! In-memory keyword index for development and tests

use std::collections::{HashMap, HashSet};
use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::info;

use crate::domain::DomainError;
use crate::domain::retrieval::{RetrievalGateway, RetrievedSnippet, SourceFilter, SourceKind};

/// A document as stored in the seed file
#[derive(Debug, Clone, Deserialize)]
pub struct IndexedDocument {
    pub id: String,
    pub text: String,
    pub source: SourceKind,
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
}

/// Ranks documents by the share of query terms they contain
#[derive(Debug, Default)]
pub struct InMemoryRetrievalGateway {
    documents: RwLock<Vec<(IndexedDocument, HashSet<String>)>>,
}

fn terms(text: &str) -> HashSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.chars().count() > 1)
        .map(str::to_lowercase)
        .collect()
}

impl InMemoryRetrievalGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_documents(&self, documents: Vec<IndexedDocument>) {
        let mut index = self.documents.write().await;
        for doc in documents {
            let doc_terms = terms(&doc.text);
            index.push((doc, doc_terms));
        }
    }

    /// Load a JSON array of documents
    pub async fn from_json_file(path: impl AsRef<Path>) -> Result<Self, DomainError> {
        let path = path.as_ref();
        let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
            DomainError::configuration(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let documents: Vec<IndexedDocument> = serde_json::from_str(&raw).map_err(|e| {
            DomainError::configuration(format!("Invalid documents file {}: {}", path.display(), e))
        })?;

        info!(path = %path.display(), count = documents.len(), "Loaded retrieval documents");

        let gateway = Self::new();
        gateway.add_documents(documents).await;
        Ok(gateway)
    }
}

#[async_trait]
impl RetrievalGateway for InMemoryRetrievalGateway {
    async fn retrieve(
        &self,
        query: &str,
        sources: &SourceFilter,
        top_k: u32,
    ) -> Result<Vec<RetrievedSnippet>, DomainError> {
        let query_terms = terms(query);
        if query_terms.is_empty() {
            return Ok(Vec::new());
        }

        let index = self.documents.read().await;
        let mut scored: Vec<(f64, &IndexedDocument)> = index
            .iter()
            .filter(|(doc, _)| sources.allows(doc.source))
            .filter_map(|(doc, doc_terms)| {
                let hits = query_terms.intersection(doc_terms).count();
                (hits > 0).then(|| (hits as f64 / query_terms.len() as f64, doc))
            })
            .collect();

        // stable: equal scores keep insertion order
        scored.sort_by(|a, b| b.0.total_cmp(&a.0));

        Ok(scored
            .into_iter()
            .take(top_k as usize)
            .map(|(score, doc)| {
                let mut snippet = RetrievedSnippet::new(doc.text.clone(), doc.source)
                    .with_metadata("id", serde_json::json!(doc.id))
                    .with_metadata("score", serde_json::json!(score));
                for (key, value) in &doc.metadata {
                    snippet = snippet.with_metadata(key.clone(), value.clone());
                }
                snippet
            })
            .collect())
    }

    fn gateway_name(&self) -> &'static str {
        "in_memory"
    }
}
