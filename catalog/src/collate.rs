use std::collections::BTreeMap;

use tracing::{instrument, trace};

use crate::nodes::{ContainerKind, ContainerNode, LeafNode, Node};
use crate::FlatEntry;

/// Turns a flat, unordered list of entries into a tree of nodes, returning
/// the (unnamed) synthetic root container.
///
/// Entries are grouped by their [FlatEntry::parent_key]. Every group walks
/// down from the root one [ContainerKind::Folder] per non-empty segment of
/// that key, reusing a container that already exists at that level, and the
/// group's entries are attached as leaves to the container it ends up in.
///
/// Groups are visited in key order, and entries within a group keep the
/// order they were passed in, so listings are deterministic for a given
/// input. Entries sharing the exact same path are all kept.
#[instrument(skip_all, fields(entries.len = entries.len()))]
pub fn collate(entries: Vec<FlatEntry>) -> ContainerNode {
    let mut groups: BTreeMap<String, Vec<FlatEntry>> = BTreeMap::new();
    for entry in entries {
        groups
            .entry(entry.parent_key().to_owned())
            .or_default()
            .push(entry);
    }

    let mut root = ContainerNode::new("", ContainerKind::Folder);
    for (parent_key, group) in groups {
        trace!(parent_key = %parent_key, group.len = group.len(), "attaching group");

        let mut container = &mut root;
        for segment in parent_key.split('/').filter(|s| !s.is_empty()) {
            container = container.folder_mut(segment);
        }

        for entry in group {
            container.push(Node::Leaf(LeafNode::from_entry(entry)));
        }
    }

    root
}
