//! Approval requests and outcomes

use serde::{Deserialize, Serialize};

use crate::domain::work_item::WorkItemId;

/// Feedback value that means a human is taking over the conversation
pub const TAKEOVER_SENTINEL: &str = "__human_takeover__";

pub const INCORPORATE_FEEDBACK_OPTION: &str = "incorporate_feedback";
pub const TAKE_OVER_OPTION: &str = "take_over";

/// A way for the reviewer to reject a draft
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectOption {
    pub name: String,
    pub title: String,
    pub description: String,
    /// Fixed feedback sent when this option is picked; free text otherwise
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
}

/// Reject options offered on every approval request
pub fn default_reject_options() -> Vec<RejectOption> {
    vec![
        RejectOption {
            name: INCORPORATE_FEEDBACK_OPTION.to_string(),
            title: "Request changes".to_string(),
            description: "Send feedback and let the agent revise its answer".to_string(),
            feedback: None,
        },
        RejectOption {
            name: TAKE_OVER_OPTION.to_string(),
            title: "Take over".to_string(),
            description: "Answer the user yourself and stop the agent".to_string(),
            feedback: Some(TAKEOVER_SENTINEL.to_string()),
        },
    ]
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalRequest {
    pub work_item_id: WorkItemId,
    pub question: String,
    pub answer: String,
    pub reject_options: Vec<RejectOption>,
}

impl ApprovalRequest {
    pub fn new(
        work_item_id: WorkItemId,
        question: impl Into<String>,
        answer: impl Into<String>,
    ) -> Self {
        Self {
            work_item_id,
            question: question.into(),
            answer: answer.into(),
            reject_options: default_reject_options(),
        }
    }

    /// Feedback preset by the named reject option, if any
    pub fn option_feedback(&self, option: &str) -> Option<&str> {
        self.reject_options
            .iter()
            .find(|o| o.name == option)
            .and_then(|o| o.feedback.as_deref())
    }
}

/// The human decision after sentinel interpretation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalOutcome {
    pub approved: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
    pub takeover: bool,
}

impl ApprovalOutcome {
    pub fn approved() -> Self {
        Self {
            approved: true,
            feedback: None,
            takeover: false,
        }
    }

    /// Build an outcome from a raw reviewer response
    pub fn from_response(approved: bool, feedback: Option<String>) -> Self {
        let takeover = !approved && feedback.as_deref() == Some(TAKEOVER_SENTINEL);
        Self {
            approved,
            feedback,
            takeover,
        }
    }

    pub fn rejected(feedback: impl Into<String>) -> Self {
        Self::from_response(false, Some(feedback.into()))
    }

    pub fn takeover() -> Self {
        Self::from_response(false, Some(TAKEOVER_SENTINEL.to_string()))
    }
}
