//! Resolves virtual paths carrying an encoded connection identity in their
//! root into nodes of a remote catalog.
//!
//! A virtual path looks like `<prefix>[<token>]\<segment>\<segment>…`, where
//! `<token>` is the percent-encoded URL of the catalog service (see
//! [encode]), and the segments address nodes in the tree materialized from
//! the catalog's flat entry listing.
mod codec;
mod drive;
mod errors;
mod locator;
mod resolver;
mod server;

pub use codec::{decode, encode};
pub use drive::Drive;
pub use errors::Error;
pub use locator::{effective_credential, locate, split_root, ConnectionIdentity, Separator};
pub use resolver::{
    CaseSensitivity, CollectionsConfig, NodeInfo, NodeKind, PathResolver, Resolved,
    ResolverConfig, Session,
};
pub use server::ServerNode;

#[cfg(test)]
mod tests;
