//! Work item domain: the persisted record of one workflow run

mod action;
mod entity;
mod error;
mod input;
pub mod repository;

pub use action::{Action, ActionType};
pub use entity::{
    FALLBACK_RESULT, MAX_ID_LENGTH, WorkItem, WorkItemId, WorkItemState, validate_work_item_id,
};
pub use error::WorkItemError;
pub use input::{Classification, DEFAULT_USER_ID, InitialInput, InputMessage};
pub use repository::WorkItemRepository;
