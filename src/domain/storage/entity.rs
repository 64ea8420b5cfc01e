//! Storage entity traits

use std::fmt::Debug;

use serde::{Serialize, de::DeserializeOwned};

/// Key of a persisted document
pub trait StorageKey: Clone + Debug + Send + Sync + Eq + std::hash::Hash {
    /// The key as stored by string-keyed backends
    fn as_str(&self) -> &str;
}

/// A document that can be persisted as a single flat JSON value
pub trait StorageEntity: Clone + Debug + Send + Sync + Serialize + DeserializeOwned {
    type Key: StorageKey;

    fn key(&self) -> &Self::Key;
}
