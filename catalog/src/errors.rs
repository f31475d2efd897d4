use thiserror::Error;

/// Errors related to communication with a catalog service.
#[derive(Debug, Error, PartialEq)]
pub enum Error {
    /// The backend address or a request parameter was unusable.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The service could not be reached, or rejected the credential.
    #[error("connection error: {0}")]
    Connection(String),

    /// A listing or catalog query failed on an established connection.
    #[error("remote query error: {0}")]
    RemoteQuery(String),
}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        if value.kind() == std::io::ErrorKind::InvalidInput {
            Error::InvalidRequest(value.to_string())
        } else {
            Error::Connection(value.to_string())
        }
    }
}
