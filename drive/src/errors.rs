use thiserror::Error;
use url::Url;

/// Errors returned while resolving a virtual path.
/// All of them are terminal for the resolution they occur in.
#[derive(Debug, Error)]
pub enum Error {
    /// A connection token contains an invalid escape sequence, or doesn't
    /// decode to UTF-8.
    #[error("malformed connection token {token:?}: {reason}")]
    MalformedToken { token: String, reason: String },

    /// The path doesn't have a `[<token>]` root followed by a separator.
    #[error("path root value is not valid: {path:?}")]
    InvalidPathRoot { path: String },

    /// The decoded connection token is not a valid URL.
    #[error("invalid connection identity {uri:?}: {source}")]
    InvalidConnectionIdentity {
        uri: String,
        #[source]
        source: url::ParseError,
    },

    /// The catalog service could not be reached, or rejected the credential.
    #[error("unable to connect to {url}: {source}")]
    Connection {
        url: Url,
        #[source]
        source: catnav_catalog::Error,
    },

    /// Listing or querying the catalog failed after connecting.
    #[error("querying {url} failed: {source}")]
    RemoteQuery {
        url: Url,
        #[source]
        source: catnav_catalog::Error,
    },

    /// A path segment didn't match any child of the node resolved so far.
    #[error("{segment:?} not found below {resolved:?}")]
    PathNotFound { segment: String, resolved: String },
}
