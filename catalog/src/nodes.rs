//! This holds the node types a catalog listing is materialized into.
use std::collections::HashMap;

use serde::Serialize;

use crate::{Collection, FlatEntry};

/// A Node is either a [ContainerNode] or a [LeafNode].
/// Only containers have children. Names are not unique among siblings,
/// see [ContainerNode::child] for how lookups deal with that.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Container(ContainerNode),
    Leaf(LeafNode),
}

impl Node {
    pub fn name(&self) -> &str {
        match self {
            Node::Container(c) => c.name(),
            Node::Leaf(l) => l.name(),
        }
    }

    pub fn value(&self) -> NodeValue<'_> {
        match self {
            Node::Container(c) => c.value(),
            Node::Leaf(l) => l.value(),
        }
    }

    /// Returns the children of a container, or None for a leaf.
    pub fn children(&self) -> Option<&[Node]> {
        match self {
            Node::Container(c) => Some(c.children()),
            Node::Leaf(_) => None,
        }
    }

    pub fn is_container(&self) -> bool {
        matches!(self, Node::Container(_))
    }
}

/// Distinguishes the different kinds of containers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContainerKind {
    /// An intermediate container synthesized from shared entry path prefixes.
    Folder,
    /// Holds the results of a typed catalog query.
    Collections,
}

/// A node holding other nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct ContainerNode {
    name: String,
    kind: ContainerKind,
    children: Vec<Node>,
    /// Position of each child container in `children`, by name.
    containers: HashMap<String, usize>,
}

impl ContainerNode {
    pub fn new(name: impl Into<String>, kind: ContainerKind) -> Self {
        Self {
            name: name.into(),
            kind,
            children: Vec::new(),
            containers: HashMap::new(),
        }
    }

    /// Constructs a container with the given children, in order.
    pub fn with_children(
        name: impl Into<String>,
        kind: ContainerKind,
        children: impl IntoIterator<Item = Node>,
    ) -> Self {
        let mut container = Self::new(name, kind);
        for child in children {
            container.push(child);
        }
        container
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ContainerKind {
        self.kind
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn value(&self) -> NodeValue<'_> {
        NodeValue::Container {
            name: &self.name,
            kind: self.kind,
        }
    }

    /// Looks up a direct child by its exact name.
    ///
    /// Containers are found through an index. If no container has that
    /// name, the first leaf with that name in listing order is returned.
    pub fn child(&self, name: &str) -> Option<&Node> {
        if let Some(idx) = self.containers.get(name) {
            return Some(&self.children[*idx]);
        }

        self.children
            .iter()
            .find(|node| !node.is_container() && node.name() == name)
    }

    /// Looks up a direct child using a custom name comparison.
    /// This is a linear scan, containers are preferred over leaves.
    pub fn child_matching(&self, mut matches: impl FnMut(&str) -> bool) -> Option<&Node> {
        self.children
            .iter()
            .filter(|node| node.is_container())
            .chain(self.children.iter().filter(|node| !node.is_container()))
            .find(|node| matches(node.name()))
    }

    /// Appends a node to the children.
    /// Containers with a name already used by another container are still
    /// added, but lookups keep resolving to the first one.
    pub fn push(&mut self, node: Node) {
        if let Node::Container(c) = &node {
            self.containers
                .entry(c.name.clone())
                .or_insert(self.children.len());
        }
        self.children.push(node);
    }

    /// Returns the child [ContainerKind::Folder] container with the given
    /// name, creating it if there's no child container with that name yet.
    pub(crate) fn folder_mut(&mut self, name: &str) -> &mut ContainerNode {
        let idx = match self.containers.get(name) {
            Some(idx) => *idx,
            None => {
                self.push(Node::Container(ContainerNode::new(
                    name,
                    ContainerKind::Folder,
                )));
                self.children.len() - 1
            }
        };

        match &mut self.children[idx] {
            Node::Container(container) => container,
            Node::Leaf(_) => unreachable!("container index points to a leaf"),
        }
    }
}

/// A terminal node, wrapping a single record returned by the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct LeafNode {
    name: String,
    payload: LeafPayload,
}

#[derive(Debug, Clone, PartialEq)]
enum LeafPayload {
    Entry(FlatEntry),
    Collection(Collection),
}

impl LeafNode {
    /// Wraps a flat entry. The leaf is named by the full entry path.
    pub fn from_entry(entry: FlatEntry) -> Self {
        Self {
            name: entry.path.clone(),
            payload: LeafPayload::Entry(entry),
        }
    }

    pub fn from_collection(collection: Collection) -> Self {
        Self {
            name: collection.name.clone(),
            payload: LeafPayload::Collection(collection),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn entry(&self) -> Option<&FlatEntry> {
        match &self.payload {
            LeafPayload::Entry(entry) => Some(entry),
            LeafPayload::Collection(_) => None,
        }
    }

    pub fn value(&self) -> NodeValue<'_> {
        match &self.payload {
            LeafPayload::Entry(entry) => NodeValue::Entry(entry),
            LeafPayload::Collection(collection) => NodeValue::Collection(collection),
        }
    }
}

/// The value exposed by a node, as handed to whatever displays it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodeValue<'a> {
    /// The connected catalog service itself.
    Server { name: &'a str, url: &'a str },
    Container {
        name: &'a str,
        kind: ContainerKind,
    },
    Entry(&'a FlatEntry),
    Collection(&'a Collection),
}
