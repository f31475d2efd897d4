use std::sync::Arc;

use async_trait::async_trait;
use url::Url;

use crate::{Collection, Credential, Error, FlatEntry};

mod from_addr;
mod http;
mod memory;

pub use self::from_addr::from_addr;
pub use self::http::{HttpCatalogService, HttpCatalogServiceConfig};
pub use self::memory::{CatalogDocument, MemoryCatalogService, MemoryCatalogServiceConfig};

/// The pattern matching every entry of a catalog.
pub const WILDCARD: &str = "*";

/// The base trait all catalog services need to implement.
///
/// A catalog service is a live, authenticated handle to a remote catalog.
/// It is only ever queried, never mutated, so handles can be shared freely.
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// The canonical display name the service reported when connecting.
    fn name(&self) -> &str;

    /// Returns all entries whose path matches the given wildcard pattern,
    /// in no particular order.
    async fn list_entries(&self, pattern: &str) -> Result<Vec<FlatEntry>, Error>;

    /// Looks up the higher-level grouping objects of a given kind.
    ///
    /// Not every service has a typed catalog. The default implementation
    /// fails with [Error::RemoteQuery].
    async fn collections(&self, kind: &str) -> Result<Vec<Collection>, Error> {
        Err(Error::RemoteQuery(format!(
            "{} does not support typed catalog queries (kind {})",
            self.name(),
            kind
        )))
    }
}

#[async_trait]
impl<A> CatalogService for A
where
    A: AsRef<dyn CatalogService> + Send + Sync,
{
    fn name(&self) -> &str {
        self.as_ref().name()
    }

    async fn list_entries(&self, pattern: &str) -> Result<Vec<FlatEntry>, Error> {
        self.as_ref().list_entries(pattern).await
    }

    async fn collections(&self, kind: &str) -> Result<Vec<Collection>, Error> {
        self.as_ref().collections(kind).await
    }
}

/// Establishes connections to catalog services.
#[async_trait]
pub trait Connector: Send + Sync {
    /// Connects (and authenticates, if a credential is passed) to the
    /// catalog service at the given URL.
    async fn connect(
        &self,
        url: &Url,
        credential: Option<&Credential>,
    ) -> Result<Arc<dyn CatalogService>, Error>;
}

/// Connects by dispatching on the URL scheme, see [from_addr].
#[derive(Clone, Copy, Debug, Default)]
pub struct AddrConnector;

#[async_trait]
impl Connector for AddrConnector {
    async fn connect(
        &self,
        url: &Url,
        credential: Option<&Credential>,
    ) -> Result<Arc<dyn CatalogService>, Error> {
        Ok(from_addr(url, credential).await?.into())
    }
}
