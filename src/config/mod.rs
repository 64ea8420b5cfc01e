//! Application configuration

mod app_config;

pub use app_config::{
    AgentSettings, AppConfig, ApprovalMode, ApprovalSettings, LlmSettings, LogFormat,
    LoggingConfig, RetrievalSettings, ServerConfig, StorageSettings,
};
