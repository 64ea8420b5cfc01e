//! What the caller asked

use serde::{Deserialize, Serialize};

/// User id assigned to questions submitted as a bare string
pub const DEFAULT_USER_ID: &str = "web_app";

/// One message of the user turn that triggered the workflow
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputMessage {
    pub user_id: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

impl InputMessage {
    pub fn new(user_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            message: message.into(),
            name: None,
            avatar_url: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Verdict of an upstream classifier, attached before the workflow starts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Classification {
    Question {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
    },
    Ignore {
        reason: String,
    },
}

impl Classification {
    pub fn title(&self) -> Option<&str> {
        match self {
            Self::Question { title } => title.as_deref(),
            Self::Ignore { .. } => None,
        }
    }

    pub fn ignore_reason(&self) -> Option<&str> {
        match self {
            Self::Ignore { reason } => Some(reason),
            Self::Question { .. } => None,
        }
    }
}

/// Immutable input of a work item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitialInput {
    pub messages: Vec<InputMessage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classification: Option<Classification>,
}

impl InitialInput {
    pub fn new(messages: Vec<InputMessage>) -> Self {
        Self {
            messages,
            classification: None,
        }
    }

    /// Single question typed into the web form
    pub fn from_question(question: impl Into<String>) -> Self {
        Self::new(vec![InputMessage::new(DEFAULT_USER_ID, question)])
    }

    pub fn with_classification(mut self, classification: Classification) -> Self {
        self.classification = Some(classification);
        self
    }

    /// The question handed to the reasoning component: every message, one per line
    pub fn question(&self) -> String {
        self.messages
            .iter()
            .map(|m| m.message.trim())
            .filter(|m| !m.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }
}
