use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, instrument, warn};
use url::Url;

use super::CatalogService;
use crate::{Collection, Credential, Error, FlatEntry};

/// URL query parameters accepted for `http://` and `https://`.
#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct HttpCatalogServiceConfig {
    /// Per-request timeout, in seconds.
    pub timeout: Option<u64>,
}

/// What the service answers when connecting.
#[derive(Deserialize)]
struct CatalogInfo {
    name: String,
}

/// Talks to a remote catalog service over HTTP, exchanging JSON.
///
/// - `GET <base>/catalog` returns the catalog name, and is used to
///   establish (and authenticate) the connection.
/// - `GET <base>/catalog/entries?pattern=<pattern>` returns a list of
///   [FlatEntry].
/// - `GET <base>/catalog/collections?kind=<kind>` returns a list of
///   [Collection].
///
/// The credential, if any, is sent as HTTP basic auth with every request.
pub struct HttpCatalogService {
    base_url: Url,
    http_client: reqwest::Client,
    credential: Option<Credential>,
    name: String,
}

/// Splits the service parameters off the URL, and makes sure the remaining
/// base URL can be joined with relative paths.
fn parse_url(url: &Url) -> Result<(Url, HttpCatalogServiceConfig), Error> {
    let config: HttpCatalogServiceConfig = serde_qs::from_str(url.query().unwrap_or_default())
        .map_err(|e| Error::InvalidRequest(format!("failed to parse parameters: {}", e)))?;

    let mut base_url = url.clone();
    base_url.set_query(None);
    if !base_url.path().ends_with('/') {
        let path = format!("{}/", base_url.path());
        base_url.set_path(&path);
    }

    Ok((base_url, config))
}

impl HttpCatalogService {
    /// Connects to the catalog at the given URL, failing if it can't be
    /// reached or doesn't accept the credential.
    #[instrument(skip(url, credential), err, fields(%url))]
    pub async fn connect(url: &Url, credential: Option<&Credential>) -> Result<Self, Error> {
        let (base_url, config) = parse_url(url)?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(Duration::from_secs(timeout));
        }
        let http_client = builder
            .build()
            .map_err(|e| Error::InvalidRequest(format!("unable to build http client: {}", e)))?;

        let mut service = Self {
            base_url,
            http_client,
            credential: credential.cloned(),
            name: String::new(),
        };

        let resp = service
            .request("catalog", &[])?
            .send()
            .await
            .map_err(|e| {
                warn!(e = %e, "unable to send catalog request");
                Error::Connection(format!("unable to reach {}: {}", service.base_url, e))
            })?;

        match resp.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(Error::Connection(format!(
                    "{} rejected the credential ({})",
                    service.base_url,
                    resp.status()
                )))
            }
            status if !status.is_success() => {
                return Err(Error::Connection(format!(
                    "{} answered with {}",
                    service.base_url, status
                )))
            }
            _ => {}
        }

        let info: CatalogInfo = resp.json().await.map_err(|e| {
            Error::Connection(format!("unable to parse catalog info: {}", e))
        })?;
        debug!(name = %info.name, "connected");

        service.name = info.name;
        Ok(service)
    }

    fn request(&self, path: &str, query: &[(&str, &str)]) -> Result<reqwest::RequestBuilder, Error> {
        let url = self.base_url.join(path).map_err(|e| {
            warn!(e = %e, "unable to join URL");
            Error::InvalidRequest(format!("unable to join url: {}", e))
        })?;

        let mut req = self.http_client.get(url).query(query);
        if let Some(credential) = &self.credential {
            req = req.basic_auth(&credential.username, Some(&credential.secret));
        }

        Ok(req)
    }

    /// Sends a query on the established connection, decoding the JSON answer.
    async fn query<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, Error> {
        let resp = self
            .request(path, query)?
            .send()
            .await
            .map_err(|e| Error::RemoteQuery(format!("unable to send request: {}", e)))?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Err(Error::RemoteQuery(format!(
                "{} is not supported by {}",
                path, self.name
            )));
        }

        resp.error_for_status()
            .map_err(|e| Error::RemoteQuery(e.to_string()))?
            .json()
            .await
            .map_err(|e| Error::RemoteQuery(format!("unable to parse response: {}", e)))
    }
}

#[async_trait]
impl CatalogService for HttpCatalogService {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(skip(self), err, fields(base_url = %self.base_url))]
    async fn list_entries(&self, pattern: &str) -> Result<Vec<FlatEntry>, Error> {
        self.query("catalog/entries", &[("pattern", pattern)]).await
    }

    #[instrument(skip(self), err, fields(base_url = %self.base_url))]
    async fn collections(&self, kind: &str) -> Result<Vec<Collection>, Error> {
        self.query("catalog/collections", &[("kind", kind)]).await
    }
}
