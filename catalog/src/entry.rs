use serde::{Deserialize, Serialize};

/// A single record returned by a catalog's wildcard listing.
/// `path` is `/`-delimited, `value` is opaque to everything in here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlatEntry {
    pub path: String,
    #[serde(default)]
    pub value: serde_json::Value,
}

impl FlatEntry {
    pub fn new(path: impl Into<String>, value: serde_json::Value) -> Self {
        Self {
            path: path.into(),
            value,
        }
    }

    /// Returns the path with its last `/`-delimited segment removed.
    /// Entries without any separator live directly below the root, and get
    /// the empty string.
    pub fn parent_key(&self) -> &str {
        match self.path.rsplit_once('/') {
            Some((parent, _name)) => parent,
            None => "",
        }
    }
}

/// A higher-level grouping object returned by a typed catalog query,
/// such as a project collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    pub name: String,
    pub kind: String,
    #[serde(default)]
    pub value: serde_json::Value,
}
