use async_trait::async_trait;
use serde::Deserialize;
use tracing::{instrument, warn};

use super::CatalogService;
use crate::{Collection, Credential, Error, FlatEntry};

fn default_name() -> String {
    "memory".to_string()
}

/// The contents of an in-process catalog, as read from a JSON document.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogDocument {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default)]
    pub entries: Vec<FlatEntry>,
    #[serde(default)]
    pub collections: Vec<Collection>,
    /// If non-empty, connecting requires one of these credentials.
    #[serde(default)]
    pub users: Vec<Credential>,
}

/// URL query parameters accepted for `memory://`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MemoryCatalogServiceConfig {
    #[serde(default = "default_name")]
    pub name: String,
}

/// A catalog service keeping all its entries in memory.
#[derive(Clone, Debug, Default)]
pub struct MemoryCatalogService {
    name: String,
    entries: Vec<FlatEntry>,
    collections: Vec<Collection>,
}

impl MemoryCatalogService {
    pub fn new(name: impl Into<String>, entries: Vec<FlatEntry>) -> Self {
        Self {
            name: name.into(),
            entries,
            collections: Vec::new(),
        }
    }

    pub fn with_collections(mut self, collections: Vec<Collection>) -> Self {
        self.collections = collections;
        self
    }

    /// "Connects" to a catalog document, checking the credential against
    /// the document's users, if it has any.
    pub fn from_document(
        document: CatalogDocument,
        credential: Option<&Credential>,
    ) -> Result<Self, Error> {
        if !document.users.is_empty() {
            let Some(credential) = credential else {
                return Err(Error::Connection(format!(
                    "{} requires a credential",
                    document.name
                )));
            };

            if !document.users.contains(credential) {
                warn!(username = %credential.username, catalog = %document.name, "credential rejected");
                return Err(Error::Connection(format!(
                    "{} rejected the credential for {}",
                    document.name, credential.username
                )));
            }
        }

        Ok(Self::new(document.name, document.entries).with_collections(document.collections))
    }
}

#[async_trait]
impl CatalogService for MemoryCatalogService {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(skip(self), err)]
    async fn list_entries(&self, pattern: &str) -> Result<Vec<FlatEntry>, Error> {
        let pattern = glob::Pattern::new(pattern)
            .map_err(|e| Error::RemoteQuery(format!("invalid pattern {}: {}", pattern, e)))?;

        Ok(self
            .entries
            .iter()
            .filter(|entry| pattern.matches(&entry.path))
            .cloned()
            .collect())
    }

    #[instrument(skip(self), err)]
    async fn collections(&self, kind: &str) -> Result<Vec<Collection>, Error> {
        Ok(self
            .collections
            .iter()
            .filter(|collection| collection.kind == kind)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::{CatalogDocument, MemoryCatalogService};
    use crate::catalogservice::{CatalogService, WILDCARD};
    use crate::fixtures::{entries, COLLECTIONS, WIDGET_ENTRIES};
    use crate::{Credential, Error};
    use rstest::rstest;

    #[rstest]
    #[case::everything(WILDCARD, 6)]
    #[case::one_project("/proj/widgets/*", 2)]
    #[case::all_builds("/proj/*/build", 2)]
    #[case::exact("/motd", 1)]
    #[case::nothing("/nope/*", 0)]
    #[tokio::test]
    async fn list_entries(#[case] pattern: &str, #[case] exp_len: usize) {
        let svc = MemoryCatalogService::new("test", WIDGET_ENTRIES.clone());
        let resp = svc.list_entries(pattern).await.expect("must succeed");

        assert_eq!(exp_len, resp.len());
    }

    #[tokio::test]
    async fn list_entries_invalid_pattern() {
        let svc = MemoryCatalogService::new("test", entries(&["/a"]));
        let err = svc.list_entries("[").await.expect_err("must fail");

        assert!(matches!(err, Error::RemoteQuery(_)));
    }

    #[tokio::test]
    async fn collections_by_kind() {
        let svc = MemoryCatalogService::new("test", vec![]).with_collections(COLLECTIONS.clone());

        assert_eq!(2, svc.collections("ProjectCollection").await.unwrap().len());
        assert!(svc.collections("TeamProject").await.unwrap().is_empty());
    }

    #[rstest]
    #[case::anonymous_allowed(vec![], None, true)]
    #[case::anonymous_rejected(vec![Credential::new("alice", "hunter2")], None, false)]
    #[case::matching(vec![Credential::new("alice", "hunter2")], Some(Credential::new("alice", "hunter2")), true)]
    #[case::wrong_secret(vec![Credential::new("alice", "hunter2")], Some(Credential::new("alice", "nope")), false)]
    fn from_document(
        #[case] users: Vec<Credential>,
        #[case] credential: Option<Credential>,
        #[case] exp_succeed: bool,
    ) {
        let document = CatalogDocument {
            name: "doc".into(),
            users,
            ..Default::default()
        };

        let resp = MemoryCatalogService::from_document(document, credential.as_ref());
        if exp_succeed {
            assert_eq!("doc", resp.expect("must succeed").name());
        } else {
            assert!(matches!(resp, Err(Error::Connection(_))));
        }
    }
}
