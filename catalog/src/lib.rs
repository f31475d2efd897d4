mod collate;
mod credential;
mod entry;
mod errors;

pub mod catalogservice;
pub mod fixtures;
pub mod nodes;

pub use collate::collate;
pub use credential::Credential;
pub use entry::{Collection, FlatEntry};
pub use errors::Error;
pub use nodes::{ContainerKind, ContainerNode, LeafNode, Node, NodeValue};
