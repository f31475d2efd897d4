use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use catnav_catalog::catalogservice::{CatalogService, Connector, MemoryCatalogService};
use catnav_catalog::fixtures::{CATALOG_NAME, COLLECTIONS, WIDGET_ENTRIES};
use catnav_catalog::{Collection, Credential, FlatEntry};
use url::Url;

use crate::{encode, PathResolver, ResolverConfig};

mod resolve;

pub const CATALOG_URI: &str = "http://tfs:8080/tfs";

/// Counts the calls made against the catalog, across all connections.
#[derive(Debug, Default)]
pub struct Calls {
    pub connect: AtomicUsize,
    pub list_entries: AtomicUsize,
    pub collections: AtomicUsize,
}

impl Calls {
    pub fn get(&self) -> (usize, usize, usize) {
        (
            self.connect.load(Ordering::SeqCst),
            self.list_entries.load(Ordering::SeqCst),
            self.collections.load(Ordering::SeqCst),
        )
    }
}

/// How the fake catalog misbehaves, if at all.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Failure {
    #[default]
    None,
    Connect,
    List,
}

/// Hands out connections to an in-memory catalog holding the widget
/// fixtures, counting every call.
pub struct CountingConnector {
    pub calls: Arc<Calls>,
    pub failure: Failure,
    /// The credential passed with the last connection attempt.
    pub last_username: std::sync::Mutex<Option<String>>,
}

impl CountingConnector {
    pub fn new(failure: Failure) -> Arc<Self> {
        Arc::new(Self {
            calls: Arc::new(Calls::default()),
            failure,
            last_username: Default::default(),
        })
    }
}

#[async_trait]
impl Connector for CountingConnector {
    async fn connect(
        &self,
        _url: &Url,
        credential: Option<&Credential>,
    ) -> Result<Arc<dyn CatalogService>, catnav_catalog::Error> {
        self.calls.connect.fetch_add(1, Ordering::SeqCst);
        *self.last_username.lock().unwrap() = credential.map(|c| c.username.clone());

        if self.failure == Failure::Connect {
            return Err(catnav_catalog::Error::Connection(
                "credential rejected".into(),
            ));
        }

        Ok(Arc::new(CountingService {
            inner: MemoryCatalogService::new(CATALOG_NAME, WIDGET_ENTRIES.clone())
                .with_collections(COLLECTIONS.clone()),
            calls: self.calls.clone(),
            failure: self.failure,
        }))
    }
}

struct CountingService {
    inner: MemoryCatalogService,
    calls: Arc<Calls>,
    failure: Failure,
}

#[async_trait]
impl CatalogService for CountingService {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn list_entries(&self, pattern: &str) -> Result<Vec<FlatEntry>, catnav_catalog::Error> {
        self.calls.list_entries.fetch_add(1, Ordering::SeqCst);

        if self.failure == Failure::List {
            return Err(catnav_catalog::Error::RemoteQuery("listing timed out".into()));
        }
        self.inner.list_entries(pattern).await
    }

    async fn collections(&self, kind: &str) -> Result<Vec<Collection>, catnav_catalog::Error> {
        self.calls.collections.fetch_add(1, Ordering::SeqCst);
        self.inner.collections(kind).await
    }
}

/// Builds a virtual path to `rest` in the fake catalog.
pub fn path(rest: &str) -> String {
    format!("Root[{}]\\{}", encode(CATALOG_URI), rest)
}

pub fn resolver(config: ResolverConfig, connector: Arc<CountingConnector>) -> PathResolver {
    PathResolver::new(config, connector)
}
