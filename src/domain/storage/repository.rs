//! Storage trait definition

use std::fmt::Debug;

use async_trait::async_trait;

use crate::domain::DomainError;

use super::entity::StorageEntity;

/// Key-value document storage.
///
/// Every write is a full-document overwrite. Backends make no attempt at
/// optimistic concurrency: the last writer wins.
#[async_trait]
pub trait Storage<E>: Send + Sync + Debug
where
    E: StorageEntity + 'static,
{
    async fn get(&self, key: &E::Key) -> Result<Option<E>, DomainError>;

    async fn list(&self) -> Result<Vec<E>, DomainError>;

    /// Inserts a new document, failing with `Conflict` if the key is taken
    async fn create(&self, entity: E) -> Result<E, DomainError>;

    /// Overwrites an existing document, failing with `NotFound` if absent
    async fn update(&self, entity: E) -> Result<E, DomainError>;

    /// Upsert
    async fn save(&self, entity: E) -> Result<E, DomainError> {
        if self.exists(entity.key()).await? {
            self.update(entity).await
        } else {
            self.create(entity).await
        }
    }

    async fn exists(&self, key: &E::Key) -> Result<bool, DomainError> {
        Ok(self.get(key).await?.is_some())
    }
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use crate::domain::storage::StorageKey;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Mock storage that can be told to start failing after a number of writes
    #[derive(Debug)]
    pub struct MockStorage<E>
    where
        E: StorageEntity,
    {
        entities: Mutex<HashMap<String, E>>,
        writes_before_failure: Mutex<Option<usize>>,
        writes: Mutex<Vec<E>>,
    }

    impl<E> Default for MockStorage<E>
    where
        E: StorageEntity,
    {
        fn default() -> Self {
            Self::new()
        }
    }

    impl<E> MockStorage<E>
    where
        E: StorageEntity,
    {
        pub fn new() -> Self {
            Self {
                entities: Mutex::new(HashMap::new()),
                writes_before_failure: Mutex::new(None),
                writes: Mutex::new(Vec::new()),
            }
        }

        /// Allow `writes` successful writes, then fail every later write
        pub fn fail_after_writes(self, writes: usize) -> Self {
            *self.writes_before_failure.lock().unwrap() = Some(writes);
            self
        }

        /// Every entity successfully written, in order
        pub fn writes(&self) -> Vec<E> {
            self.writes.lock().unwrap().clone()
        }

        fn check_write(&self) -> Result<(), DomainError> {
            let mut remaining = self.writes_before_failure.lock().unwrap();
            match remaining.as_mut() {
                Some(0) => Err(DomainError::storage("mock storage unavailable")),
                Some(n) => {
                    *n -= 1;
                    Ok(())
                }
                None => Ok(()),
            }
        }
    }

    #[async_trait]
    impl<E> Storage<E> for MockStorage<E>
    where
        E: StorageEntity + 'static,
    {
        async fn get(&self, key: &E::Key) -> Result<Option<E>, DomainError> {
            Ok(self.entities.lock().unwrap().get(key.as_str()).cloned())
        }

        async fn list(&self) -> Result<Vec<E>, DomainError> {
            Ok(self.entities.lock().unwrap().values().cloned().collect())
        }

        async fn create(&self, entity: E) -> Result<E, DomainError> {
            self.check_write()?;
            let key = entity.key().as_str().to_string();
            let mut entities = self.entities.lock().unwrap();

            if entities.contains_key(&key) {
                return Err(DomainError::conflict(format!(
                    "Entity with key '{}' already exists",
                    key
                )));
            }

            entities.insert(key, entity.clone());
            self.writes.lock().unwrap().push(entity.clone());
            Ok(entity)
        }

        async fn update(&self, entity: E) -> Result<E, DomainError> {
            self.check_write()?;
            let key = entity.key().as_str().to_string();
            let mut entities = self.entities.lock().unwrap();

            if !entities.contains_key(&key) {
                return Err(DomainError::not_found(format!(
                    "Entity with key '{}' not found",
                    key
                )));
            }

            entities.insert(key, entity.clone());
            self.writes.lock().unwrap().push(entity.clone());
            Ok(entity)
        }
    }
}
