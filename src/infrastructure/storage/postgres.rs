//! PostgreSQL storage: one JSONB document per key

use std::fmt::Debug;
use std::marker::PhantomData;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::Row;
use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::domain::DomainError;
use crate::domain::storage::{Storage, StorageEntity, StorageKey};

#[derive(Debug, Clone)]
pub struct PostgresConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout_secs: u64,
    pub idle_timeout_secs: u64,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            url: "postgres://localhost/rag_agent".to_string(),
            max_connections: 10,
            min_connections: 1,
            connect_timeout_secs: 30,
            idle_timeout_secs: 600,
        }
    }
}

impl PostgresConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn with_max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }
}

/// Table layout: `key` primary key, `data` JSONB, and bookkeeping timestamps.
pub struct PostgresStorage<E>
where
    E: StorageEntity,
{
    pool: PgPool,
    table_name: String,
    _phantom: PhantomData<E>,
}

impl<E> Debug for PostgresStorage<E>
where
    E: StorageEntity,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgresStorage")
            .field("table_name", &self.table_name)
            .finish()
    }
}

impl<E> PostgresStorage<E>
where
    E: StorageEntity,
{
    pub fn new(pool: PgPool, table_name: impl Into<String>) -> Self {
        Self {
            pool,
            table_name: table_name.into(),
            _phantom: PhantomData,
        }
    }

    pub async fn connect(
        config: &PostgresConfig,
        table_name: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
            .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
            .connect(&config.url)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to connect to PostgreSQL: {}", e)))?;

        Ok(Self::new(pool, table_name))
    }

    pub async fn ensure_table(&self) -> Result<(), DomainError> {
        let query = format!(
            r#"
            CREATE TABLE IF NOT EXISTS {} (
                key VARCHAR(255) PRIMARY KEY,
                data JSONB NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
            self.table_name
        );

        sqlx::query(&query)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to create table: {}", e)))?;

        Ok(())
    }

    fn encode(entity: &E) -> Result<serde_json::Value, DomainError> {
        serde_json::to_value(entity)
            .map_err(|e| DomainError::storage(format!("Failed to serialize entity: {}", e)))
    }

    fn decode(data: serde_json::Value) -> Result<E, DomainError> {
        serde_json::from_value(data)
            .map_err(|e| DomainError::storage(format!("Failed to deserialize entity: {}", e)))
    }
}

#[async_trait]
impl<E> Storage<E> for PostgresStorage<E>
where
    E: StorageEntity + 'static,
{
    async fn get(&self, key: &E::Key) -> Result<Option<E>, DomainError> {
        let query = format!("SELECT data FROM {} WHERE key = $1", self.table_name);

        let row = sqlx::query(&query)
            .bind(key.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get entity: {}", e)))?;

        row.map(|row| Self::decode(row.get("data"))).transpose()
    }

    async fn list(&self) -> Result<Vec<E>, DomainError> {
        let query = format!("SELECT data FROM {} ORDER BY created_at DESC", self.table_name);

        let rows = sqlx::query(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to list entities: {}", e)))?;

        rows.into_iter()
            .map(|row| Self::decode(row.get("data")))
            .collect()
    }

    async fn create(&self, entity: E) -> Result<E, DomainError> {
        let key = entity.key().as_str().to_string();
        let data = Self::encode(&entity)?;
        let query = format!("INSERT INTO {} (key, data) VALUES ($1, $2)", self.table_name);

        sqlx::query(&query)
            .bind(&key)
            .bind(&data)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if e.to_string().contains("duplicate key") {
                    DomainError::conflict(format!("Entity with key '{}' already exists", key))
                } else {
                    DomainError::storage(format!("Failed to create entity: {}", e))
                }
            })?;

        Ok(entity)
    }

    async fn update(&self, entity: E) -> Result<E, DomainError> {
        let key = entity.key().as_str().to_string();
        let data = Self::encode(&entity)?;
        let query = format!(
            "UPDATE {} SET data = $2, updated_at = NOW() WHERE key = $1",
            self.table_name
        );

        let result = sqlx::query(&query)
            .bind(&key)
            .bind(&data)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to update entity: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(format!(
                "Entity with key '{}' not found",
                key
            )));
        }

        Ok(entity)
    }

    async fn save(&self, entity: E) -> Result<E, DomainError> {
        let key = entity.key().as_str().to_string();
        let data = Self::encode(&entity)?;
        let query = format!(
            r#"
            INSERT INTO {} (key, data) VALUES ($1, $2)
            ON CONFLICT (key) DO UPDATE SET data = EXCLUDED.data, updated_at = NOW()
            "#,
            self.table_name
        );

        sqlx::query(&query)
            .bind(&key)
            .bind(&data)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to save entity: {}", e)))?;

        Ok(entity)
    }
}
