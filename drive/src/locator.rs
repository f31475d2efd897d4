use std::str::FromStr;

use catnav_catalog::Credential;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;
use tracing::{debug, instrument};
use url::Url;

use crate::{codec, Error};

lazy_static! {
    // Anchored at the start, the greedy prefix makes the last bracketed
    // token followed by a separator win.
    static ref ROOT_BACKSLASH: Regex =
        Regex::new(r"^.*\[(.+?)\]\\").expect("invalid root pattern");
    static ref ROOT_SLASH: Regex = Regex::new(r"^.*\[(.+?)\]/").expect("invalid root pattern");
}

/// The separator the host uses between the segments of a virtual path.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Separator {
    #[default]
    Backslash,
    Slash,
}

impl Separator {
    pub fn as_char(self) -> char {
        match self {
            Separator::Backslash => '\\',
            Separator::Slash => '/',
        }
    }

    fn root_pattern(self) -> &'static Regex {
        match self {
            Separator::Backslash => &ROOT_BACKSLASH,
            Separator::Slash => &ROOT_SLASH,
        }
    }
}

impl FromStr for Separator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "\\" | "backslash" => Ok(Separator::Backslash),
            "/" | "slash" => Ok(Separator::Slash),
            _ => Err(format!("unknown separator: {}", s)),
        }
    }
}

/// Everything needed to connect to a catalog service.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConnectionIdentity {
    pub url: Url,
    pub credential: Option<Credential>,
}

/// Splits a virtual path into the (still encoded) connection token and the
/// remainder following the separator after its closing bracket.
pub fn split_root(path: &str, separator: Separator) -> Result<(&str, &str), Error> {
    let captures = separator
        .root_pattern()
        .captures(path)
        .ok_or_else(|| Error::InvalidPathRoot {
            path: path.to_owned(),
        })?;

    // both groups always participate in a match.
    let (Some(root), Some(token)) = (captures.get(0), captures.get(1)) else {
        return Err(Error::InvalidPathRoot {
            path: path.to_owned(),
        });
    };

    Ok((token.as_str(), &path[root.end()..]))
}

/// Picks the credential to connect with: the one passed with the current
/// call if it has an identity, otherwise the one the drive was mounted
/// with, otherwise none.
/// The drive credential is taken as is, so token-only credentials with an
/// empty username still reach the service.
pub fn effective_credential<'a>(
    call_credential: Option<&'a Credential>,
    drive_credential: Option<&'a Credential>,
) -> Option<&'a Credential> {
    call_credential
        .filter(|c| c.has_identity())
        .or(drive_credential)
}

/// Extracts the connection identity from a virtual path, returning it
/// together with the remainder of the path.
/// This doesn't connect to anything.
#[instrument(skip(call_credential, drive_credential), err)]
pub fn locate<'p>(
    path: &'p str,
    separator: Separator,
    call_credential: Option<&Credential>,
    drive_credential: Option<&Credential>,
) -> Result<(ConnectionIdentity, &'p str), Error> {
    let (token, remainder) = split_root(path, separator)?;
    let uri = codec::decode(token)?;
    let url = Url::parse(&uri).map_err(|source| Error::InvalidConnectionIdentity {
        uri: uri.clone(),
        source,
    })?;

    let credential = effective_credential(call_credential, drive_credential).cloned();
    debug!(%url, remainder, username = credential.as_ref().map(|c| c.username.as_str()), "located connection");

    Ok((ConnectionIdentity { url, credential }, remainder))
}
