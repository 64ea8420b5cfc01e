//! Retrieved context snippets

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Index a snippet was retrieved from
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Product documentation
    Docs,
    /// Previously answered community threads
    ChatHistory,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Docs => "docs",
            Self::ChatHistory => "chat_history",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "docs" | "documentation" => Ok(Self::Docs),
            "chat_history" | "chat" | "discord" | "threads" => Ok(Self::ChatHistory),
            other => Err(DomainError::validation(format!(
                "Unknown source kind '{}'",
                other
            ))),
        }
    }
}

/// Set of sources a query is restricted to. Empty means every source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceFilter(BTreeSet<SourceKind>);

impl SourceFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn only(kinds: impl IntoIterator<Item = SourceKind>) -> Self {
        Self(kinds.into_iter().collect())
    }

    pub fn allows(&self, kind: SourceKind) -> bool {
        self.0.is_empty() || self.0.contains(&kind)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SourceKind> {
        self.0.iter()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievedSnippet {
    pub text: String,
    pub source: SourceKind,
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl RetrievedSnippet {
    pub fn new(text: impl Into<String>, source: SourceKind) -> Self {
        Self {
            text: text.into(),
            source,
            metadata: HashMap::new(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_filter_allows_everything() {
        let filter = SourceFilter::all();
        assert!(filter.allows(SourceKind::Docs));
        assert!(filter.allows(SourceKind::ChatHistory));
    }

    #[test]
    fn test_restricted_filter() {
        let filter = SourceFilter::only([SourceKind::Docs]);
        assert!(filter.allows(SourceKind::Docs));
        assert!(!filter.allows(SourceKind::ChatHistory));
        assert_eq!(serde_json::to_string(&filter).unwrap(), r#"["docs"]"#);
    }

    #[test]
    fn test_source_kind_aliases() {
        assert_eq!("discord".parse::<SourceKind>().unwrap(), SourceKind::ChatHistory);
        assert_eq!("Docs".parse::<SourceKind>().unwrap(), SourceKind::Docs);
        assert!("wiki".parse::<SourceKind>().is_err());
    }
}
