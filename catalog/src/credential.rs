use std::fmt::{self, Debug};

use serde::Deserialize;

/// A username/secret pair presented to a catalog service.
///
/// The secret never shows up in [Debug] output, so credentials can be
/// recorded as span fields.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct Credential {
    pub username: String,
    pub secret: String,
}

impl Credential {
    pub fn new(username: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            secret: secret.into(),
        }
    }

    /// A credential with an empty username doesn't identify anybody, and is
    /// skipped when picking the effective credential for a request.
    pub fn has_identity(&self) -> bool {
        !self.username.is_empty()
    }
}

impl Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Credential")
            .field("username", &self.username)
            .field("secret", &"<redacted>")
            .finish()
    }
}
