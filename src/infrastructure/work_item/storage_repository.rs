//! Work item repository over the generic storage layer

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::DomainError;
use crate::domain::storage::Storage;
use crate::domain::work_item::{InitialInput, WorkItem, WorkItemId, WorkItemRepository};

pub const WORK_ITEMS_TABLE: &str = "work_items";

#[derive(Debug)]
pub struct StorageWorkItemRepository {
    storage: Arc<dyn Storage<WorkItem>>,
}

impl StorageWorkItemRepository {
    pub fn new(storage: Arc<dyn Storage<WorkItem>>) -> Self {
        Self { storage }
    }
}

#[async_trait]
impl WorkItemRepository for StorageWorkItemRepository {
    async fn create(&self, initial_input: InitialInput) -> Result<WorkItem, DomainError> {
        let item = self.storage.create(WorkItem::new(initial_input)).await?;
        debug!(work_item_id = %item.id(), "Work item created");
        Ok(item)
    }

    async fn load(&self, id: &WorkItemId) -> Result<WorkItem, DomainError> {
        self.storage
            .get(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Work item '{}' not found", id)))
    }

    async fn save(&self, item: &WorkItem) -> Result<(), DomainError> {
        self.storage.save(item.clone()).await?;
        Ok(())
    }

    async fn list(&self) -> Result<Vec<WorkItem>, DomainError> {
        let mut items = self.storage.list().await?;
        items.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        Ok(items)
    }
}
