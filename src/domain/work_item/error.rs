//! Work item errors

use std::fmt;

/// Errors raised by work item identity checks and state transitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkItemError {
    InvalidId(String),

    InvalidStateTransition { from: String, to: String },

    /// Mutation attempted after the item reached a terminal state
    Terminal { state: String },
}

impl WorkItemError {
    pub fn invalid_id(message: impl Into<String>) -> Self {
        Self::InvalidId(message.into())
    }

    pub fn invalid_transition(from: impl fmt::Display, to: impl fmt::Display) -> Self {
        Self::InvalidStateTransition {
            from: from.to_string(),
            to: to.to_string(),
        }
    }

    pub fn terminal(state: impl fmt::Display) -> Self {
        Self::Terminal {
            state: state.to_string(),
        }
    }
}

impl fmt::Display for WorkItemError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidId(msg) => write!(f, "Invalid work item ID: {}", msg),
            Self::InvalidStateTransition { from, to } => {
                write!(f, "Invalid state transition from '{}' to '{}'", from, to)
            }
            Self::Terminal { state } => {
                write!(f, "Work item is already {} and cannot be modified", state)
            }
        }
    }
}

impl std::error::Error for WorkItemError {}

impl From<WorkItemError> for crate::domain::DomainError {
    fn from(err: WorkItemError) -> Self {
        match err {
            WorkItemError::InvalidId(msg) => Self::invalid_id(msg),
            other => Self::conflict(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DomainError;

    #[test]
    fn test_error_display() {
        let err = WorkItemError::invalid_transition("paused", "completed");
        assert_eq!(
            err.to_string(),
            "Invalid state transition from 'paused' to 'completed'"
        );

        let err = WorkItemError::terminal("cancelled");
        assert!(err.to_string().contains("already cancelled"));
    }

    #[test]
    fn test_into_domain_error() {
        let err: DomainError = WorkItemError::invalid_id("nope").into();
        assert!(matches!(err, DomainError::InvalidId { .. }));

        let err: DomainError = WorkItemError::terminal("completed").into();
        assert!(matches!(err, DomainError::Conflict { .. }));
    }
}
