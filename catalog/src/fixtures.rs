use lazy_static::lazy_static;
use serde_json::json;

use crate::{Collection, FlatEntry};

pub const CATALOG_NAME: &str = "DefaultCollection";

lazy_static! {
    /// A small registry-like listing, spread over a few projects.
    pub static ref WIDGET_ENTRIES: Vec<FlatEntry> = vec![
        FlatEntry::new("/proj/widgets/build", json!({"definition": "ci"})),
        FlatEntry::new("/proj/widgets/release", json!({"definition": "cd"})),
        FlatEntry::new("/proj/gadgets/build", json!({"definition": "ci"})),
        FlatEntry::new("/config/retention", json!(30)),
        FlatEntry::new("/config/owners/primary", json!("alice")),
        FlatEntry::new("/motd", json!("hello")),
    ];

    pub static ref COLLECTIONS: Vec<Collection> = vec![
        Collection {
            name: "DefaultCollection".into(),
            kind: "ProjectCollection".into(),
            value: json!({"state": "online"}),
        },
        Collection {
            name: "Archive".into(),
            kind: "ProjectCollection".into(),
            value: json!({"state": "offline"}),
        },
    ];
}

/// Builds entries with null values from a list of paths.
pub fn entries(paths: &[&str]) -> Vec<FlatEntry> {
    paths
        .iter()
        .map(|p| FlatEntry::new(*p, serde_json::Value::Null))
        .collect()
}
