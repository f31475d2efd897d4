use std::sync::Arc;

use catnav_catalog::catalogservice::{CatalogService, Connector};
use catnav_catalog::{collate, ContainerKind, ContainerNode, LeafNode, Node, NodeValue};
use tokio::sync::OnceCell;
use tracing::{debug, info, instrument};
use url::Url;

use crate::{CollectionsConfig, ConnectionIdentity, Error};

/// The root node of a resolution session, standing for the catalog service
/// itself.
///
/// Creating it doesn't talk to the service. The connection is established
/// by [ServerNode::ensure_connected], the first time the name or the
/// children are requested, and reused for the rest of the node's lifetime.
/// The same holds for the entry listing: it is fetched once, the first time
/// children are requested.
pub struct ServerNode {
    identity: ConnectionIdentity,
    connector: Arc<dyn Connector>,
    entry_pattern: String,
    collections: Option<CollectionsConfig>,

    handle: OnceCell<Arc<dyn CatalogService>>,
    tree: OnceCell<ContainerNode>,
}

impl ServerNode {
    pub fn new(
        identity: ConnectionIdentity,
        connector: Arc<dyn Connector>,
        entry_pattern: impl Into<String>,
        collections: Option<CollectionsConfig>,
    ) -> Self {
        Self {
            identity,
            connector,
            entry_pattern: entry_pattern.into(),
            collections,
            handle: OnceCell::new(),
            tree: OnceCell::new(),
        }
    }

    pub fn identity(&self) -> &ConnectionIdentity {
        &self.identity
    }

    pub fn url(&self) -> &Url {
        &self.identity.url
    }

    /// Whether a connection has been established already.
    pub fn is_connected(&self) -> bool {
        self.handle.initialized()
    }

    /// Returns the connection to the catalog service, connecting first if
    /// that didn't happen yet.
    /// A failed attempt is not remembered, but also not retried here.
    #[instrument(skip(self), err, fields(url = %self.identity.url, indicatif.pb_show = 1))]
    pub async fn ensure_connected(&self) -> Result<&Arc<dyn CatalogService>, Error> {
        self.handle
            .get_or_try_init(|| async {
                info!(
                    username = self.identity.credential.as_ref().map(|c| c.username.as_str()),
                    "connecting"
                );
                self.connector
                    .connect(&self.identity.url, self.identity.credential.as_ref())
                    .await
                    .map_err(|source| Error::Connection {
                        url: self.identity.url.clone(),
                        source,
                    })
            })
            .await
    }

    /// The name the catalog service reported for itself.
    pub async fn name(&self) -> Result<&str, Error> {
        Ok(self.ensure_connected().await?.name())
    }

    pub async fn value(&self) -> Result<NodeValue<'_>, Error> {
        Ok(NodeValue::Server {
            name: self.name().await?,
            url: self.identity.url.as_str(),
        })
    }

    pub async fn children(&self) -> Result<&[Node], Error> {
        Ok(self.container().await?.children())
    }

    /// Returns the tree materialized from the catalog's entry listing,
    /// fetching the listing if needed.
    pub(crate) async fn container(&self) -> Result<&ContainerNode, Error> {
        self.tree.get_or_try_init(|| self.fetch_tree()).await
    }

    #[instrument(
        skip(self),
        err,
        fields(url = %self.identity.url, pattern = %self.entry_pattern, indicatif.pb_show = 1)
    )]
    async fn fetch_tree(&self) -> Result<ContainerNode, Error> {
        let handle = self.ensure_connected().await?;

        let entries = handle
            .list_entries(&self.entry_pattern)
            .await
            .map_err(|source| Error::RemoteQuery {
                url: self.identity.url.clone(),
                source,
            })?;
        debug!(entries.len = entries.len(), "fetched entries");

        let mut root = collate(entries);

        if let Some(config) = &self.collections {
            let collections =
                handle
                    .collections(&config.kind)
                    .await
                    .map_err(|source| Error::RemoteQuery {
                        url: self.identity.url.clone(),
                        source,
                    })?;
            debug!(collections.len = collections.len(), kind = %config.kind, "fetched collections");

            root.push(Node::Container(ContainerNode::with_children(
                config.container_name.clone(),
                ContainerKind::Collections,
                collections
                    .into_iter()
                    .map(|c| Node::Leaf(LeafNode::from_collection(c))),
            )));
        }

        Ok(root)
    }
}
