//! rag-agent
//!
//! An asynchronous question-answering agent. Each question becomes a
//! persisted work item driven through a bounded loop of:
//! - deciding with an LLM whether the gathered context is enough
//! - retrieving more context from the knowledge store
//! - asking a human to approve the drafted answer

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, bail};
use tracing::{info, warn};

use api::state::AppState;
use config::{ApprovalMode, LlmSettings, RetrievalSettings, StorageSettings};
use domain::approval::ApprovalGateway;
use domain::reasoning::ReasoningGateway;
use domain::retrieval::RetrievalGateway;
use domain::work_item::{WorkItem, WorkItemRepository};
use infrastructure::agent::AgentEngine;
use infrastructure::approval::{AutoApprovalGateway, ChannelApprovalGateway};
use infrastructure::http_client::HttpClient;
use infrastructure::llm::OpenAiProvider;
use infrastructure::reasoning::LlmReasoningGateway;
use infrastructure::retrieval::{HttpRetrievalGateway, InMemoryRetrievalGateway};
use infrastructure::services::AgentService;
use infrastructure::storage::{PostgresConfig, StorageConfig, StorageFactory, StorageType};
use infrastructure::work_item::{StorageWorkItemRepository, WORK_ITEMS_TABLE};

/// Collaborators shared by every workflow, independent of how approval works
#[derive(Debug, Clone)]
pub struct Components {
    pub repository: Arc<dyn WorkItemRepository>,
    pub reasoning: Arc<dyn ReasoningGateway>,
    pub retrieval: Arc<dyn RetrievalGateway>,
}

impl Components {
    pub async fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        Ok(Self {
            repository: create_repository(&config.storage).await?,
            reasoning: create_reasoning(&config.llm)?,
            retrieval: create_retrieval(&config.retrieval).await?,
        })
    }

    pub fn agent_service(
        &self,
        approval: Arc<dyn ApprovalGateway>,
        config: &AppConfig,
    ) -> AgentService {
        info!(approval = approval.gateway_name(), "Building agent engine");
        let engine = AgentEngine::new(
            self.repository.clone(),
            self.reasoning.clone(),
            self.retrieval.clone(),
            approval,
            config.agent.engine_config(),
        );
        AgentService::new(self.repository.clone(), Arc::new(engine))
    }
}

/// Create the application state with all services initialized
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let components = Components::from_config(config).await?;

    let state = match config.approval.mode {
        ApprovalMode::Channel => {
            let approvals = Arc::new(ChannelApprovalGateway::new());
            let service = components.agent_service(approvals.clone(), config);
            AppState::new(Arc::new(service)).with_approvals(approvals)
        }
        ApprovalMode::Auto => {
            warn!("Approval mode is 'auto': drafts are published without review");
            let service = components.agent_service(Arc::new(AutoApprovalGateway), config);
            AppState::new(Arc::new(service))
        }
    };

    Ok(state)
}

async fn create_repository(
    settings: &StorageSettings,
) -> anyhow::Result<Arc<dyn WorkItemRepository>> {
    let storage_config = match StorageType::parse(&settings.backend) {
        Some(StorageType::InMemory) => StorageConfig::InMemory,
        Some(StorageType::Postgres) => {
            let url = settings
                .database_url
                .clone()
                .or_else(|| std::env::var("DATABASE_URL").ok())
                .context("storage.database_url or DATABASE_URL is required for postgres")?;
            StorageConfig::Postgres(
                PostgresConfig::new(url).with_max_connections(settings.max_connections),
            )
        }
        None => bail!("Unknown storage backend '{}'", settings.backend),
    };

    info!(backend = ?storage_config.storage_type(), "Initializing work item storage");
    let storage = StorageFactory::create::<WorkItem>(&storage_config, WORK_ITEMS_TABLE)
        .await
        .context("Failed to initialize work item storage")?;

    Ok(Arc::new(StorageWorkItemRepository::new(storage)))
}

fn create_reasoning(settings: &LlmSettings) -> anyhow::Result<Arc<dyn ReasoningGateway>> {
    if settings.provider != "openai" {
        bail!("Unsupported LLM provider '{}'", settings.provider);
    }

    let api_key = settings
        .api_key
        .clone()
        .or_else(|| std::env::var("OPENAI_API_KEY").ok())
        .context("llm.api_key or OPENAI_API_KEY is required")?;
    let client = HttpClient::with_timeout(Duration::from_secs(settings.timeout_secs))?;

    let provider = match &settings.base_url {
        Some(base_url) => OpenAiProvider::with_base_url(client, api_key, base_url),
        None => OpenAiProvider::new(client, api_key),
    };

    let mut gateway = LlmReasoningGateway::new(Arc::new(provider), &settings.model);
    if let Some(temperature) = settings.temperature {
        gateway = gateway.with_temperature(temperature);
    }

    info!(model = %settings.model, "Reasoning gateway ready");
    Ok(Arc::new(gateway))
}

async fn create_retrieval(
    settings: &RetrievalSettings,
) -> anyhow::Result<Arc<dyn RetrievalGateway>> {
    match settings.backend.to_lowercase().as_str() {
        "memory" => match &settings.documents_path {
            Some(path) => {
                let gateway = InMemoryRetrievalGateway::from_json_file(path)
                    .await
                    .with_context(|| format!("Failed to load documents from '{}'", path))?;
                Ok(Arc::new(gateway))
            }
            None => {
                warn!("No retrieval.documents_path configured; research steps will find nothing");
                Ok(Arc::new(InMemoryRetrievalGateway::new()))
            }
        },
        "http" => {
            let endpoint = settings
                .endpoint
                .clone()
                .context("retrieval.endpoint is required for the http backend")?;
            let client = HttpClient::with_timeout(Duration::from_secs(30))?;
            let mut gateway = HttpRetrievalGateway::new(client, endpoint);
            if let Some(api_key) = &settings.api_key {
                gateway = gateway.with_api_key(api_key);
            }
            Ok(Arc::new(gateway))
        }
        other => bail!("Unknown retrieval backend '{}'", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.llm.api_key = Some("sk-test".to_string());
        config
    }

    #[tokio::test]
    async fn test_channel_mode_exposes_approvals() {
        let state = create_app_state_with_config(&memory_config()).await.unwrap();

        assert!(state.approvals.is_some());
        assert!(state.agent_service.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_auto_mode_has_no_channel() {
        let mut config = memory_config();
        config.approval.mode = ApprovalMode::Auto;

        let state = create_app_state_with_config(&config).await.unwrap();

        assert!(state.approvals.is_none());
    }

    #[tokio::test]
    async fn test_unknown_backends_are_rejected() {
        let mut config = memory_config();
        config.storage.backend = "mongo".to_string();
        assert!(create_app_state_with_config(&config).await.is_err());

        let mut config = memory_config();
        config.retrieval.backend = "elastic".to_string();
        assert!(create_app_state_with_config(&config).await.is_err());

        let mut config = memory_config();
        config.retrieval.backend = "http".to_string();
        assert!(create_app_state_with_config(&config).await.is_err());
    }

    #[test]
    fn test_unsupported_llm_provider() {
        let settings = LlmSettings {
            provider: "cohere".to_string(),
            ..LlmSettings::default()
        };

        assert!(create_reasoning(&settings).is_err());
    }
}
