use catnav_catalog::Credential;
use url::Url;

use crate::{codec, Error, Separator};

/// A mounted virtual drive.
///
/// Its root is the encoded connection URL wrapped in brackets, so every
/// path below it starts with a valid connection token. The credential it
/// was mounted with is used whenever a call doesn't bring its own.
#[derive(Clone, Debug)]
pub struct Drive {
    name: String,
    root: String,
    credential: Option<Credential>,
}

impl Drive {
    /// Mounts a drive for the catalog service at `uri`.
    pub fn mount(
        name: impl Into<String>,
        uri: &str,
        credential: Option<Credential>,
    ) -> Result<Self, Error> {
        Url::parse(uri).map_err(|source| Error::InvalidConnectionIdentity {
            uri: uri.to_owned(),
            source,
        })?;

        Ok(Self {
            name: name.into(),
            root: format!("[{}]", codec::encode(uri)),
            credential,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn credential(&self) -> Option<&Credential> {
        self.credential.as_ref()
    }

    /// Builds the virtual path of `rest` below the drive root.
    pub fn join(&self, separator: Separator, rest: &str) -> String {
        let sep = separator.as_char();
        format!("{}{}{}", self.root, sep, rest.trim_start_matches(sep))
    }
}
