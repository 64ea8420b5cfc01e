//! Work item persistence over the storage layer
mod storage_repository;

pub use storage_repository::{StorageWorkItemRepository, WORK_ITEMS_TABLE};
