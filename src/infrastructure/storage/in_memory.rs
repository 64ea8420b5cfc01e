//! In-memory storage implementation

use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::DomainError;
use crate::domain::storage::{Storage, StorageEntity, StorageKey};

/// Process-local document storage. Contents are lost on exit.
#[derive(Debug)]
pub struct InMemoryStorage<E>
where
    E: StorageEntity,
{
    entities: RwLock<HashMap<String, E>>,
}

impl<E> Default for InMemoryStorage<E>
where
    E: StorageEntity,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<E> InMemoryStorage<E>
where
    E: StorageEntity,
{
    pub fn new() -> Self {
        Self {
            entities: RwLock::new(HashMap::new()),
        }
    }
}

fn lock_error(e: impl std::fmt::Display) -> DomainError {
    DomainError::storage(format!("Failed to acquire storage lock: {}", e))
}

#[async_trait]
impl<E> Storage<E> for InMemoryStorage<E>
where
    E: StorageEntity + 'static,
{
    async fn get(&self, key: &E::Key) -> Result<Option<E>, DomainError> {
        let entities = self.entities.read().map_err(lock_error)?;
        Ok(entities.get(key.as_str()).cloned())
    }

    async fn list(&self) -> Result<Vec<E>, DomainError> {
        let entities = self.entities.read().map_err(lock_error)?;
        Ok(entities.values().cloned().collect())
    }

    async fn create(&self, entity: E) -> Result<E, DomainError> {
        let key = entity.key().as_str().to_string();
        let mut entities = self.entities.write().map_err(lock_error)?;

        if entities.contains_key(&key) {
            return Err(DomainError::conflict(format!(
                "Entity with key '{}' already exists",
                key
            )));
        }

        entities.insert(key, entity.clone());
        Ok(entity)
    }

    async fn update(&self, entity: E) -> Result<E, DomainError> {
        let key = entity.key().as_str().to_string();
        let mut entities = self.entities.write().map_err(lock_error)?;

        if !entities.contains_key(&key) {
            return Err(DomainError::not_found(format!(
                "Entity with key '{}' not found",
                key
            )));
        }

        entities.insert(key, entity.clone());
        Ok(entity)
    }

    async fn save(&self, entity: E) -> Result<E, DomainError> {
        let mut entities = self.entities.write().map_err(lock_error)?;
        entities.insert(entity.key().as_str().to_string(), entity.clone());
        Ok(entity)
    }
}
