//! Storage factory for runtime backend selection

use std::sync::Arc;

use crate::domain::DomainError;
use crate::domain::storage::{Storage, StorageEntity};

use super::in_memory::InMemoryStorage;
use super::postgres::{PostgresConfig, PostgresStorage};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageType {
    InMemory,
    Postgres,
}

impl StorageType {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "memory" | "inmemory" | "in-memory" | "in_memory" => Some(Self::InMemory),
            "postgres" | "postgresql" | "pg" => Some(Self::Postgres),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub enum StorageConfig {
    InMemory,
    Postgres(PostgresConfig),
}

impl StorageConfig {
    pub fn storage_type(&self) -> StorageType {
        match self {
            Self::InMemory => StorageType::InMemory,
            Self::Postgres(_) => StorageType::Postgres,
        }
    }
}

#[derive(Debug)]
pub struct StorageFactory;

impl StorageFactory {
    /// Build the configured backend; PostgreSQL tables are created on demand
    pub async fn create<E>(
        config: &StorageConfig,
        table_name: &str,
    ) -> Result<Arc<dyn Storage<E>>, DomainError>
    where
        E: StorageEntity + 'static,
    {
        match config {
            StorageConfig::InMemory => Ok(Arc::new(InMemoryStorage::<E>::new())),
            StorageConfig::Postgres(pg_config) => {
                let storage = PostgresStorage::<E>::connect(pg_config, table_name).await?;
                storage.ensure_table().await?;
                Ok(Arc::new(storage))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::work_item::WorkItem;

    #[test]
    fn test_storage_type_parse() {
        assert_eq!(StorageType::parse("memory"), Some(StorageType::InMemory));
        assert_eq!(StorageType::parse("In-Memory"), Some(StorageType::InMemory));
        assert_eq!(StorageType::parse("postgresql"), Some(StorageType::Postgres));
        assert_eq!(StorageType::parse("pg"), Some(StorageType::Postgres));
        assert_eq!(StorageType::parse("redis"), None);
    }

    #[tokio::test]
    async fn test_factory_builds_in_memory() {
        let storage = StorageFactory::create::<WorkItem>(&StorageConfig::InMemory, "work_items")
            .await
            .unwrap();
        assert!(storage.list().await.unwrap().is_empty());
    }
}
