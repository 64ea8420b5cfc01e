//! Errors raised inside a workflow run

use thiserror::Error;

use crate::domain::DomainError;
use crate::domain::work_item::WorkItemError;

#[derive(Debug, Error)]
pub enum AgentError {
    /// Reasoning output could not be parsed into the expected shape
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("No answer found")]
    NoAnswerFound,

    #[error("Human took over")]
    HumanTakeover,

    #[error("Work item not found: {0}")]
    NotFound(String),

    /// The store rejected a read or write; the run cannot continue safely
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// A collaborator (LLM, retrieval backend, approval channel) failed
    #[error("Gateway error: {0}")]
    Gateway(String),

    #[error("Invalid transition: {0}")]
    InvalidTransition(String),
}

impl AgentError {
    /// Failures that end the run as `cancelled` with a user-visible message
    pub fn is_terminating(&self) -> bool {
        matches!(self, Self::NoAnswerFound | Self::HumanTakeover)
    }
}

impl From<DomainError> for AgentError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Storage { message } => Self::StoreUnavailable(message),
            DomainError::NotFound { message } => Self::NotFound(message),
            DomainError::Validation { message } => Self::Validation(message),
            other => Self::Gateway(other.to_string()),
        }
    }
}

impl From<WorkItemError> for AgentError {
    fn from(err: WorkItemError) -> Self {
        Self::InvalidTransition(err.to_string())
    }
}

impl From<AgentError> for DomainError {
    fn from(err: AgentError) -> Self {
        match err {
            AgentError::Validation(message) => DomainError::validation(message),
            AgentError::NotFound(message) => DomainError::not_found(message),
            AgentError::StoreUnavailable(message) => DomainError::storage(message),
            other => DomainError::internal(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_visible_messages() {
        assert_eq!(AgentError::NoAnswerFound.to_string(), "No answer found");
        assert_eq!(AgentError::HumanTakeover.to_string(), "Human took over");
    }

    #[test]
    fn test_terminating_classification() {
        assert!(AgentError::NoAnswerFound.is_terminating());
        assert!(AgentError::HumanTakeover.is_terminating());
        assert!(!AgentError::Gateway("timeout".into()).is_terminating());
        assert!(!AgentError::StoreUnavailable("down".into()).is_terminating());
    }

    #[test]
    fn test_from_domain_error() {
        assert!(matches!(
            AgentError::from(DomainError::storage("connection reset")),
            AgentError::StoreUnavailable(_)
        ));
        assert!(matches!(
            AgentError::from(DomainError::validation("not json")),
            AgentError::Validation(_)
        ));
        assert!(matches!(
            AgentError::from(DomainError::provider("openai", "502")),
            AgentError::Gateway(_)
        ));
    }

    #[test]
    fn test_into_domain_error() {
        assert!(DomainError::from(AgentError::StoreUnavailable("down".into())).is_storage());
        assert!(matches!(
            DomainError::from(AgentError::NoAnswerFound),
            DomainError::Internal { .. }
        ));
    }
}
