//! Audit trail entries

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of step recorded on a work item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionType {
    /// Reasoning decided it can answer; content is its reason
    #[serde(rename = "formulate_response")]
    FormulateResponse,

    /// A draft answer was produced
    #[serde(rename = "ReadyToAnswer")]
    ReadyToAnswer,

    /// A human approved the draft
    #[serde(rename = "FinalAnswer")]
    FinalAnswer,

    #[serde(rename = "Incorporating Feedback")]
    IncorporatingFeedback,

    #[serde(rename = "RAGQuery")]
    RagQuery,

    #[serde(rename = "RAGResult")]
    RagResult,

    /// Reasoning output could not be parsed
    #[serde(rename = "ValidationError")]
    ValidationError,
}

impl ActionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FormulateResponse => "formulate_response",
            Self::ReadyToAnswer => "ReadyToAnswer",
            Self::FinalAnswer => "FinalAnswer",
            Self::IncorporatingFeedback => "Incorporating Feedback",
            Self::RagQuery => "RAGQuery",
            Self::RagResult => "RAGResult",
            Self::ValidationError => "ValidationError",
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    #[serde(rename = "type")]
    pub action_type: ActionType,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl Action {
    pub fn new(action_type: ActionType, content: impl Into<String>) -> Self {
        Self {
            action_type,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialized_names_match_display() {
        for action_type in [
            ActionType::FormulateResponse,
            ActionType::ReadyToAnswer,
            ActionType::FinalAnswer,
            ActionType::IncorporatingFeedback,
            ActionType::RagQuery,
            ActionType::RagResult,
            ActionType::ValidationError,
        ] {
            let json = serde_json::to_value(action_type).unwrap();
            assert_eq!(json, action_type.as_str());
        }
    }
}
