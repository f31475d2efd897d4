use tracing::instrument;
use url::Url;

use super::{
    CatalogDocument, CatalogService, HttpCatalogService, MemoryCatalogService,
    MemoryCatalogServiceConfig,
};
use crate::{Credential, Error};

/// Connects to a [CatalogService] identified by an URL.
///
/// The following URLs are supported:
/// - `memory://`, `memory://?name=<name>`
///   An empty, in-process catalog.
/// - `file:///absolute/path/to/catalog.json`
///   Loads a [CatalogDocument] from disk and serves it from memory.
/// - `http://host:port/some/path`, `https://…`
///   Connects to a remote catalog over HTTP. An optional `timeout=<seconds>`
///   query parameter bounds every request.
///
/// The credential is checked while connecting, a rejected credential fails
/// the connection.
#[instrument(skip(url, credential), err, fields(%url))]
pub async fn from_addr(
    url: &Url,
    credential: Option<&Credential>,
) -> Result<Box<dyn CatalogService>, Error> {
    let catalog_service: Box<dyn CatalogService> = match url.scheme() {
        "memory" => {
            // memory doesn't support host or path in the URL.
            if !url.host_str().unwrap_or_default().is_empty() || !url.path().is_empty() {
                return Err(Error::InvalidRequest("invalid url".to_string()));
            }

            let config: MemoryCatalogServiceConfig =
                serde_qs::from_str(url.query().unwrap_or_default()).map_err(|e| {
                    Error::InvalidRequest(format!("failed to parse parameters: {}", e))
                })?;

            Box::new(MemoryCatalogService::from_document(
                CatalogDocument {
                    name: config.name,
                    ..Default::default()
                },
                credential,
            )?)
        }
        "file" => {
            // file doesn't support a host, and needs a path to the document.
            if !url.host_str().unwrap_or_default().is_empty() {
                return Err(Error::InvalidRequest("no host allowed".to_string()));
            }

            let path = url
                .to_file_path()
                .map_err(|_| Error::InvalidRequest("invalid file path".to_string()))?;

            if path.parent().is_none() {
                return Err(Error::InvalidRequest(
                    "a catalog document path is required".to_string(),
                ));
            }

            let data = tokio::fs::read(&path).await?;
            let document: CatalogDocument = serde_json::from_slice(&data).map_err(|e| {
                Error::Connection(format!(
                    "unable to parse catalog document {}: {}",
                    path.display(),
                    e
                ))
            })?;

            Box::new(MemoryCatalogService::from_document(document, credential)?)
        }
        "http" | "https" => Box::new(HttpCatalogService::connect(url, credential).await?),
        _ => {
            return Err(Error::InvalidRequest(format!(
                "unknown scheme: {}",
                url.scheme()
            )))
        }
    };

    Ok(catalog_service)
}
