use std::str::FromStr;
use std::sync::Arc;

use catnav_catalog::catalogservice::{AddrConnector, Connector, WILDCARD};
use catnav_catalog::{ContainerKind, ContainerNode, Credential, Node, NodeValue};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::{locate, Drive, Error, Separator, ServerNode};

/// How path segments are compared to node names while descending.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseSensitivity {
    #[default]
    Sensitive,
    Insensitive,
}

impl CaseSensitivity {
    pub fn matches(self, segment: &str, name: &str) -> bool {
        match self {
            CaseSensitivity::Sensitive => segment == name,
            CaseSensitivity::Insensitive => segment.to_lowercase() == name.to_lowercase(),
        }
    }
}

impl FromStr for CaseSensitivity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sensitive" => Ok(CaseSensitivity::Sensitive),
            "insensitive" => Ok(CaseSensitivity::Insensitive),
            _ => Err(format!("unknown case sensitivity: {}", s)),
        }
    }
}

/// Adds a container with the results of a typed catalog query to the
/// children of the root.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CollectionsConfig {
    /// Name of the container below the root.
    pub container_name: String,
    /// The resource type to query for.
    pub kind: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResolverConfig {
    pub separator: Separator,
    pub case_sensitivity: CaseSensitivity,
    /// The wildcard pattern passed to the catalog's entry listing.
    pub entry_pattern: String,
    pub collections: Option<CollectionsConfig>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            separator: Separator::default(),
            case_sensitivity: CaseSensitivity::default(),
            entry_pattern: WILDCARD.to_string(),
            collections: None,
        }
    }
}

/// Resolves virtual paths into nodes.
///
/// Every call starts a fresh [Session], nothing is shared between calls.
#[derive(Clone)]
pub struct PathResolver {
    config: ResolverConfig,
    connector: Arc<dyn Connector>,
}

impl Default for PathResolver {
    fn default() -> Self {
        Self::new(ResolverConfig::default(), Arc::new(AddrConnector))
    }
}

impl PathResolver {
    pub fn new(config: ResolverConfig, connector: Arc<dyn Connector>) -> Self {
        Self { config, connector }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Starts a resolution session for a path.
    ///
    /// This extracts the connection identity from the path root, but doesn't
    /// connect yet. `drive` provides the fallback credential, if the path was
    /// built below a mounted [Drive].
    pub fn session(
        &self,
        path: &str,
        call_credential: Option<&Credential>,
        drive: Option<&Drive>,
    ) -> Result<Session, Error> {
        let (identity, remainder) = locate(
            path,
            self.config.separator,
            call_credential,
            drive.and_then(Drive::credential),
        )?;

        Ok(Session {
            root: ServerNode::new(
                identity,
                self.connector.clone(),
                self.config.entry_pattern.clone(),
                self.config.collections.clone(),
            ),
            remainder: remainder.to_owned(),
            separator: self.config.separator,
            case_sensitivity: self.config.case_sensitivity,
        })
    }

    /// Describes the node a path points to.
    pub async fn get(
        &self,
        path: &str,
        call_credential: Option<&Credential>,
        drive: Option<&Drive>,
    ) -> Result<NodeInfo, Error> {
        let session = self.session(path, call_credential, drive)?;
        let resolved = session.resolve().await?;
        resolved.info().await
    }

    /// Describes the children of the node a path points to.
    /// A leaf lists as itself.
    pub async fn list(
        &self,
        path: &str,
        call_credential: Option<&Credential>,
        drive: Option<&Drive>,
    ) -> Result<Vec<NodeInfo>, Error> {
        let session = self.session(path, call_credential, drive)?;
        let resolved = session.resolve().await?;

        match resolved.children().await? {
            Some(children) => Ok(children.iter().map(NodeInfo::from_node).collect()),
            None => Ok(vec![resolved.info().await?]),
        }
    }
}

/// A single resolution of a single path.
///
/// It owns the root node, and with it the (lazily established) connection,
/// which all nodes resolved in this session share.
pub struct Session {
    root: ServerNode,
    remainder: String,
    separator: Separator,
    case_sensitivity: CaseSensitivity,
}

impl Session {
    pub fn root(&self) -> &ServerNode {
        &self.root
    }

    /// The part of the path following the root.
    pub fn remainder(&self) -> &str {
        &self.remainder
    }

    /// Descends from the root along the segments of the remainder.
    ///
    /// An empty remainder resolves to the root itself, without any remote
    /// calls. Otherwise the root's children are fetched, which connects and
    /// lists the catalog.
    #[instrument(skip(self), err, fields(url = %self.root.url(), remainder = %self.remainder))]
    pub async fn resolve(&self) -> Result<Resolved<'_>, Error> {
        let sep = self.separator.as_char();
        let mut segments = self.remainder.split(sep).filter(|s| !s.is_empty());

        let Some(first) = segments.next() else {
            return Ok(Resolved::Server(&self.root));
        };

        let mut container = self.root.container().await?;
        let mut resolved: Vec<&str> = Vec::new();
        let mut segment = first;

        loop {
            let node = self
                .lookup(container, segment)
                .ok_or_else(|| self.not_found(segment, &resolved))?;
            resolved.push(segment);

            let Some(next) = segments.next() else {
                return Ok(Resolved::Node(node));
            };

            match node {
                Node::Container(c) => container = c,
                Node::Leaf(_) => {
                    debug!(segment = next, "segment below a leaf");
                    return Err(self.not_found(next, &resolved));
                }
            }
            segment = next;
        }
    }

    fn lookup<'a>(&self, container: &'a ContainerNode, segment: &str) -> Option<&'a Node> {
        match self.case_sensitivity {
            CaseSensitivity::Sensitive => container.child(segment),
            policy => container.child_matching(|name| policy.matches(segment, name)),
        }
    }

    fn not_found(&self, segment: &str, resolved: &[&str]) -> Error {
        Error::PathNotFound {
            segment: segment.to_owned(),
            resolved: resolved.join(&self.separator.as_char().to_string()),
        }
    }
}

/// The result of resolving a path: the root or a node below it.
#[derive(Clone, Copy)]
pub enum Resolved<'a> {
    Server(&'a ServerNode),
    Node(&'a Node),
}

impl<'a> Resolved<'a> {
    /// The name of the resolved node. Connects, if this is the root.
    pub async fn name(&self) -> Result<&'a str, Error> {
        match *self {
            Resolved::Server(server) => server.name().await,
            Resolved::Node(node) => Ok(node.name()),
        }
    }

    /// The children of the resolved node, None for a leaf.
    pub async fn children(&self) -> Result<Option<&'a [Node]>, Error> {
        match *self {
            Resolved::Server(server) => Ok(Some(server.children().await?)),
            Resolved::Node(node) => Ok(node.children()),
        }
    }

    pub async fn info(&self) -> Result<NodeInfo, Error> {
        match *self {
            Resolved::Server(server) => Ok(NodeInfo::from_value(server.value().await?)),
            Resolved::Node(node) => Ok(NodeInfo::from_node(node)),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Server,
    Folder,
    Collections,
    Entry,
    Collection,
}

/// An owned description of a node, as returned to the host.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NodeInfo {
    pub name: String,
    pub kind: NodeKind,
    pub value: serde_json::Value,
}

impl NodeInfo {
    pub fn from_node(node: &Node) -> Self {
        Self::from_value(node.value())
    }

    fn from_value(value: NodeValue<'_>) -> Self {
        match value {
            NodeValue::Server { name, url } => Self {
                name: name.to_owned(),
                kind: NodeKind::Server,
                value: serde_json::json!({ "url": url }),
            },
            NodeValue::Container { name, kind } => Self {
                name: name.to_owned(),
                kind: match kind {
                    ContainerKind::Folder => NodeKind::Folder,
                    ContainerKind::Collections => NodeKind::Collections,
                },
                value: serde_json::Value::Null,
            },
            NodeValue::Entry(entry) => Self {
                name: entry.path.clone(),
                kind: NodeKind::Entry,
                value: entry.value.clone(),
            },
            NodeValue::Collection(collection) => Self {
                name: collection.name.clone(),
                kind: NodeKind::Collection,
                value: serde_json::json!({
                    "kind": collection.kind,
                    "value": collection.value,
                }),
            },
        }
    }
}
