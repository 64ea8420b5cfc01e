//! Retrieval over an external search endpoint

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::DomainError;
use crate::domain::retrieval::{RetrievalGateway, RetrievedSnippet, SourceFilter};
use crate::infrastructure::http_client::HttpClientTrait;

/// POSTs `{query, sources, top_k}` and expects `{results: [snippet]}`
#[derive(Debug)]
pub struct HttpRetrievalGateway<C: HttpClientTrait> {
    client: C,
    endpoint: String,
    auth_header: Option<String>,
}

#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    query: &'a str,
    sources: &'a SourceFilter,
    top_k: u32,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    results: Vec<RetrievedSnippet>,
}

impl<C: HttpClientTrait> HttpRetrievalGateway<C> {
    pub fn new(client: C, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            auth_header: None,
        }
    }

    pub fn with_api_key(mut self, api_key: impl AsRef<str>) -> Self {
        self.auth_header = Some(format!("Bearer {}", api_key.as_ref()));
        self
    }
}

#[async_trait]
impl<C: HttpClientTrait> RetrievalGateway for HttpRetrievalGateway<C> {
    async fn retrieve(
        &self,
        query: &str,
        sources: &SourceFilter,
        top_k: u32,
    ) -> Result<Vec<RetrievedSnippet>, DomainError> {
        let body = serde_json::to_value(SearchRequest {
            query,
            sources,
            top_k,
        })
        .map_err(|e| DomainError::internal(format!("Failed to encode search request: {}", e)))?;

        let mut headers = vec![("Content-Type", "application/json")];
        if let Some(auth) = &self.auth_header {
            headers.push(("Authorization", auth.as_str()));
        }

        let response = self.client.post_json(&self.endpoint, headers, &body).await?;
        let parsed: SearchResponse = serde_json::from_value(response).map_err(|e| {
            DomainError::provider("retrieval", format!("Invalid search response: {}", e))
        })?;

        debug!(query, results = parsed.results.len(), "Retrieved snippets");

        Ok(parsed.results.into_iter().take(top_k as usize).collect())
    }

    fn gateway_name(&self) -> &'static str {
        "http"
    }
}
