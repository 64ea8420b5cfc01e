//! Work item repository trait

use std::fmt::Debug;

use async_trait::async_trait;

use super::{InitialInput, WorkItem, WorkItemId};
use crate::domain::error::DomainError;

/// Durable store of work items
#[async_trait]
pub trait WorkItemRepository: Send + Sync + Debug {
    /// Allocate an id and persist a fresh `running` item
    async fn create(&self, initial_input: InitialInput) -> Result<WorkItem, DomainError>;

    /// Fails with `NotFound` for an unknown id
    async fn load(&self, id: &WorkItemId) -> Result<WorkItem, DomainError>;

    /// Full-document overwrite
    async fn save(&self, item: &WorkItem) -> Result<(), DomainError>;

    /// Every item, newest first
    async fn list(&self) -> Result<Vec<WorkItem>, DomainError>;
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::domain::work_item::{ActionType, WorkItemState};

    pub async fn test_repository_create_and_load<R: WorkItemRepository>(repo: &R) {
        let created = repo
            .create(InitialInput::from_question("What is X?"))
            .await
            .expect("create should succeed");
        assert_eq!(created.state(), WorkItemState::Running);
        assert!(created.actions().is_empty());

        let loaded = repo.load(created.id()).await.expect("load should succeed");
        assert_eq!(loaded.id(), created.id());
        assert_eq!(loaded.initial_input().question(), "What is X?");
    }

    pub async fn test_repository_load_unknown<R: WorkItemRepository>(repo: &R) {
        let result = repo.load(&WorkItemId::generate()).await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    pub async fn test_repository_save_overwrites<R: WorkItemRepository>(repo: &R) {
        let mut item = repo
            .create(InitialInput::from_question("How do I deploy?"))
            .await
            .unwrap();

        item.record_action(ActionType::RagQuery, "deploy docs").unwrap();
        repo.save(&item).await.expect("save should succeed");
        item.cancel("No answer found").unwrap();
        repo.save(&item).await.expect("save should succeed");

        let loaded = repo.load(item.id()).await.unwrap();
        assert_eq!(loaded.state(), WorkItemState::Cancelled);
        assert_eq!(loaded.actions().len(), 1);
        assert_eq!(loaded.result(), Some("No answer found"));
    }

    pub async fn test_repository_list_newest_first<R: WorkItemRepository>(repo: &R) {
        let first = repo
            .create(InitialInput::from_question("first"))
            .await
            .unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let second = repo
            .create(InitialInput::from_question("second"))
            .await
            .unwrap();

        let items = repo.list().await.unwrap();
        let first_pos = items.iter().position(|i| i.id() == first.id()).unwrap();
        let second_pos = items.iter().position(|i| i.id() == second.id()).unwrap();
        assert!(second_pos < first_pos);
    }
}
