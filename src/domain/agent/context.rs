//! Context accumulated over one workflow run

use std::fmt;

use serde::{Deserialize, Serialize};

/// Label of a context fragment, shown to the reasoning component verbatim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FragmentIntent {
    #[serde(rename = "RAGQuery")]
    RagQuery,
    #[serde(rename = "Draft Answer")]
    DraftAnswer,
    #[serde(rename = "Feedback from admin")]
    AdminFeedback,
    #[serde(rename = "Note")]
    Note,
}

impl FragmentIntent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RagQuery => "RAGQuery",
            Self::DraftAnswer => "Draft Answer",
            Self::AdminFeedback => "Feedback from admin",
            Self::Note => "Note",
        }
    }
}

impl fmt::Display for FragmentIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextFragment {
    pub intent: FragmentIntent,
    pub text: String,
}

/// Append-only list of fragments owned by a single run.
///
/// Gateways only ever see a [`snapshot`](Self::snapshot), never the
/// accumulator itself.
#[derive(Debug, Default)]
pub struct ContextAccumulator {
    fragments: Vec<ContextFragment>,
}

impl ContextAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, intent: FragmentIntent, text: impl Into<String>) {
        self.fragments.push(ContextFragment {
            intent,
            text: text.into(),
        });
    }

    pub fn snapshot(&self) -> Vec<ContextFragment> {
        self.fragments.clone()
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }
}
