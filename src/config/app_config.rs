use serde::Deserialize;

use crate::domain::agent::{
    AgentEngineConfig, DEFAULT_CONTEXT_CHAR_LIMIT, DEFAULT_MAX_STEPS, DEFAULT_RETRIEVAL_TOP_K,
    RetryPolicy,
};
use crate::infrastructure::observability::ObservabilityConfig;

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
    #[serde(default)]
    pub storage: StorageSettings,
    #[serde(default)]
    pub agent: AgentSettings,
    #[serde(default)]
    pub llm: LlmSettings,
    #[serde(default)]
    pub retrieval: RetrievalSettings,
    #[serde(default)]
    pub approval: ApprovalSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Empty allows any origin
    pub cors_allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// `memory` or `postgres`
    pub backend: String,
    pub database_url: Option<String>,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AgentSettings {
    pub max_steps: u32,
    pub context_char_limit: usize,
    pub retrieval_top_k: u32,
    pub reset_on_feedback: bool,
    pub parse_failure_consumes_step: bool,
    /// Fail every `running` or `paused` item found at startup. Assumes this
    /// process is the only one driving workflows in the store: with a shared
    /// postgres backend, disable it on all but one instance, or a restart will
    /// fail items another instance is still running.
    pub recover_interrupted_on_startup: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    pub provider: String,
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub model: String,
    pub temperature: Option<f32>,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RetrievalSettings {
    /// `memory` or `http`
    pub backend: String,
    /// JSON array of documents loaded by the `memory` backend
    pub documents_path: Option<String>,
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalMode {
    /// Reviewers answer through the HTTP API
    #[default]
    Channel,
    /// Every draft is approved as-is
    Auto,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ApprovalSettings {
    pub mode: ApprovalMode,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            cors_allowed_origins: Vec::new(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            backend: "memory".to_string(),
            database_url: None,
            max_connections: 10,
        }
    }
}

impl Default for AgentSettings {
    fn default() -> Self {
        let retry = RetryPolicy::default();
        Self {
            max_steps: DEFAULT_MAX_STEPS,
            context_char_limit: DEFAULT_CONTEXT_CHAR_LIMIT,
            retrieval_top_k: DEFAULT_RETRIEVAL_TOP_K,
            reset_on_feedback: retry.reset_on_feedback,
            parse_failure_consumes_step: retry.parse_failure_consumes_step,
            recover_interrupted_on_startup: true,
        }
    }
}

impl AgentSettings {
    pub fn engine_config(&self) -> AgentEngineConfig {
        AgentEngineConfig {
            retry: RetryPolicy {
                max_steps: self.max_steps,
                reset_on_feedback: self.reset_on_feedback,
                parse_failure_consumes_step: self.parse_failure_consumes_step,
            },
            context_char_limit: self.context_char_limit,
            retrieval_top_k: self.retrieval_top_k,
        }
    }
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            base_url: None,
            api_key: None,
            model: "gpt-4o-mini".to_string(),
            temperature: Some(0.0),
            timeout_secs: 60,
        }
    }
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self {
            backend: "memory".to_string(),
            documents_path: None,
            endpoint: None,
            api_key: None,
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("server.cors_allowed_origins")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
