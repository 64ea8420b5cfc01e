//! Work item entity and its state machine

use std::fmt;

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::action::{Action, ActionType};
use super::error::WorkItemError;
use super::input::InitialInput;
use crate::domain::storage::{StorageEntity, StorageKey};

/// Valid work item IDs: wi-{uuid}
static ID_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^wi-[a-f0-9]{8}-[a-f0-9]{4}-[a-f0-9]{4}-[a-f0-9]{4}-[a-f0-9]{12}$").unwrap()
});

pub const MAX_ID_LENGTH: usize = 39;

/// Result reported for a terminal item that carries no explicit message
pub const FALLBACK_RESULT: &str = "sorry, I couldn't get an answer";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WorkItemId(String);

impl WorkItemId {
    pub fn new(id: impl Into<String>) -> Result<Self, WorkItemError> {
        let id = id.into();
        validate_work_item_id(&id)?;
        Ok(Self(id))
    }

    pub fn generate() -> Self {
        Self(format!("wi-{}", uuid::Uuid::new_v4()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for WorkItemId {
    type Error = WorkItemError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<WorkItemId> for String {
    fn from(id: WorkItemId) -> Self {
        id.0
    }
}

impl fmt::Display for WorkItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl StorageKey for WorkItemId {
    fn as_str(&self) -> &str {
        &self.0
    }
}

pub fn validate_work_item_id(id: &str) -> Result<(), WorkItemError> {
    if id.is_empty() {
        return Err(WorkItemError::invalid_id("Work item ID cannot be empty"));
    }

    if id.len() > MAX_ID_LENGTH {
        return Err(WorkItemError::invalid_id(format!(
            "Work item ID exceeds maximum length of {} characters",
            MAX_ID_LENGTH
        )));
    }

    if !ID_PATTERN.is_match(id) {
        return Err(WorkItemError::invalid_id(format!(
            "Invalid work item ID '{}': must be in format wi-{{uuid}}",
            id
        )));
    }

    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WorkItemState {
    #[default]
    Running,

    /// Waiting on a human decision
    Paused,

    Completed,

    /// Ended with a user-facing explanation in `result`
    Cancelled,

    /// Ended on an internal error recorded in `error`
    Failed,
}

impl WorkItemState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled | Self::Failed)
    }

    pub fn can_transition_to(&self, target: WorkItemState) -> bool {
        match (self, target) {
            (Self::Running, _) => true,

            (Self::Paused, Self::Running) => true,
            (Self::Paused, Self::Cancelled) => true,
            (Self::Paused, Self::Failed) => true,

            _ => false,
        }
    }
}

impl fmt::Display for WorkItemState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Running => write!(f, "running"),
            Self::Paused => write!(f, "paused"),
            Self::Completed => write!(f, "completed"),
            Self::Cancelled => write!(f, "cancelled"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// Persisted state of one workflow run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkItem {
    id: WorkItemId,
    state: WorkItemState,
    initial_input: InitialInput,
    #[serde(default)]
    actions: Vec<Action>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    result: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl StorageEntity for WorkItem {
    type Key = WorkItemId;

    fn key(&self) -> &Self::Key {
        &self.id
    }
}

impl WorkItem {
    pub fn new(initial_input: InitialInput) -> Self {
        let now = Utc::now();
        Self {
            id: WorkItemId::generate(),
            state: WorkItemState::Running,
            initial_input,
            actions: Vec::new(),
            result: None,
            error: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn id(&self) -> &WorkItemId {
        &self.id
    }

    pub fn state(&self) -> WorkItemState {
        self.state
    }

    pub fn initial_input(&self) -> &InitialInput {
        &self.initial_input
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn result(&self) -> Option<&str> {
        self.result.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    /// What a poller sees: nothing while in flight, the result (or the
    /// generic fallback) once terminal
    pub fn poll_result(&self) -> Option<String> {
        if !self.is_terminal() {
            return None;
        }
        Some(
            self.result
                .clone()
                .unwrap_or_else(|| FALLBACK_RESULT.to_string()),
        )
    }

    /// Append an entry to the audit trail
    pub fn record_action(
        &mut self,
        action_type: ActionType,
        content: impl Into<String>,
    ) -> Result<(), WorkItemError> {
        if self.is_terminal() {
            return Err(WorkItemError::terminal(self.state));
        }
        self.actions.push(Action::new(action_type, content));
        self.touch();
        Ok(())
    }

    pub fn pause(&mut self) -> Result<(), WorkItemError> {
        self.transition(WorkItemState::Paused)
    }

    pub fn resume(&mut self) -> Result<(), WorkItemError> {
        self.transition(WorkItemState::Running)
    }

    pub fn complete(&mut self, answer: impl Into<String>) -> Result<(), WorkItemError> {
        self.transition(WorkItemState::Completed)?;
        self.result = Some(answer.into());
        Ok(())
    }

    /// End the run with a message the asker will see
    pub fn cancel(&mut self, message: impl Into<String>) -> Result<(), WorkItemError> {
        self.transition(WorkItemState::Cancelled)?;
        self.result = Some(message.into());
        Ok(())
    }

    pub fn fail(&mut self, error: impl Into<String>) -> Result<(), WorkItemError> {
        self.transition(WorkItemState::Failed)?;
        self.error = Some(error.into());
        Ok(())
    }

    fn transition(&mut self, target: WorkItemState) -> Result<(), WorkItemError> {
        if self.is_terminal() {
            return Err(WorkItemError::terminal(self.state));
        }
        if !self.state.can_transition_to(target) {
            return Err(WorkItemError::invalid_transition(self.state, target));
        }
        self.state = target;
        self.touch();
        Ok(())
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
