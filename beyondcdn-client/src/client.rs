//! HTTP client for a single storage zone.
//!
//! Every request carries the zone's access key. Listings are requested by
//! path with a trailing slash, downloads with the `download` query marker.

use std::fmt;
use std::io;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use futures::TryStreamExt;
use reqwest::header::{ACCEPT, CONTENT_LENGTH, CONTENT_TYPE};
use reqwest::{Client, Method, RequestBuilder, Response};
use tokio_util::io::StreamReader;
use tracing::debug;

use crate::error::{Error, Result};
use crate::path::{encode_path, normalize_path};
use crate::record::RemoteObject;
use crate::region::Region;
use crate::storage::{ByteStream, StorageApi};

const ACCESS_KEY_HEADER: &str = "AccessKey";
const UPLOAD_CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=UTF-8";

#[derive(Clone)]
pub struct ClientConfig {
    pub storage_zone_name: String,
    pub api_key: String,
    pub region: Region,
    /// Overrides the region hostname, e.g. for a local test server.
    pub endpoint: Option<String>,
    pub timeout: Option<Duration>,
}

impl ClientConfig {
    pub fn new(storage_zone_name: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            storage_zone_name: storage_zone_name.into(),
            api_key: api_key.into(),
            region: Region::default(),
            endpoint: None,
            timeout: None,
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("storage_zone_name", &self.storage_zone_name)
            .field("region", &self.region)
            .field("endpoint", &self.endpoint)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone)]
pub struct StorageClient {
    config: ClientConfig,
    client: Client,
}

impl StorageClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            config,
        })
    }

    pub fn storage_zone_name(&self) -> &str {
        &self.config.storage_zone_name
    }

    pub fn region(&self) -> Region {
        self.config.region
    }

    fn base_url(&self) -> String {
        match &self.config.endpoint {
            Some(endpoint) => format!("{}/", endpoint.trim_end_matches('/')),
            None => self.config.region.base_url().to_string(),
        }
    }

    /// Full URL of `path` within the storage zone. The path is normalized,
    /// so `..` can never leave the zone. A trailing slash on `path` is kept,
    /// since it selects directory semantics.
    pub fn object_url(&self, path: &str) -> Result<String> {
        let zone = normalize_path(&self.config.storage_zone_name)?;
        let mut relative = normalize_path(path)?;
        if !relative.is_empty() && (path.ends_with('/') || path.ends_with('\\')) {
            relative.push('/');
        }
        Ok(format!(
            "{}{}/{}",
            self.base_url(),
            encode_path(&zone),
            encode_path(&relative)
        ))
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.client
            .request(method, url)
            .header(ACCEPT, "*/*")
            .header(ACCESS_KEY_HEADER, &self.config.api_key)
    }
}

async fn status_error(resp: Response) -> Error {
    let status = resp.status().as_u16();
    let body = resp.text().await.unwrap_or_default();
    Error::Status { status, body }
}

/// Directory-shaped JSON bodies are re-encoded to compact text; anything
/// else is returned untouched.
fn flatten_structured_body(body: Bytes) -> Bytes {
    match serde_json::from_slice::<serde_json::Value>(&body) {
        Ok(value @ (serde_json::Value::Array(_) | serde_json::Value::Object(_))) => {
            match serde_json::to_vec(&value) {
                Ok(encoded) => Bytes::from(encoded),
                Err(_) => body,
            }
        }
        _ => body,
    }
}

#[async_trait]
impl StorageApi for StorageClient {
    async fn list(&self, path: &str) -> Result<Vec<RemoteObject>> {
        let dir = format!("{}/", normalize_path(path)?);
        let resp = self
            .request(Method::GET, &self.object_url(&dir)?)
            .send()
            .await?;

        match resp.status().as_u16() {
            200..=299 => {}
            404 => return Err(Error::NotFound(dir)),
            _ => return Err(status_error(resp).await),
        }

        let body = resp.bytes().await?;
        let listing = match serde_json::from_slice::<serde_json::Value>(&body) {
            Ok(value @ serde_json::Value::Array(_)) => value,
            _ => return Err(Error::NotFound("File is not a directory".to_string())),
        };
        let entries: Vec<RemoteObject> = serde_json::from_value(listing)?;
        debug!(path = %dir, entries = entries.len(), "Listed directory");
        Ok(entries)
    }

    async fn download(&self, path: &str) -> Result<Bytes> {
        let url = format!("{}?download", self.object_url(path)?);
        let resp = self.request(Method::GET, &url).send().await?;

        match resp.status().as_u16() {
            200..=299 => {
                let body = flatten_structured_body(resp.bytes().await?);
                debug!(path = %path, len = body.len(), "Download complete");
                Ok(body)
            }
            404 => Err(Error::NotFound(path.to_string())),
            _ => Err(status_error(resp).await),
        }
    }

    async fn stream(&self, path: &str) -> Result<ByteStream> {
        let resp = self
            .request(Method::GET, &self.object_url(path)?)
            .send()
            .await?;

        match resp.status().as_u16() {
            200..=299 => {
                debug!(path = %path, "Opened stream");
                let body = resp.bytes_stream().map_err(io::Error::other);
                Ok(Box::pin(StreamReader::new(body)))
            }
            404 => Err(Error::NotFound(path.to_string())),
            _ => Err(status_error(resp).await),
        }
    }

    async fn upload(&self, path: &str, contents: Bytes) -> Result<()> {
        let len = contents.len();
        let resp = self
            .request(Method::PUT, &self.object_url(path)?)
            .header(CONTENT_TYPE, UPLOAD_CONTENT_TYPE)
            .body(contents)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(status_error(resp).await);
        }
        debug!(path = %path, len, "Upload complete");
        Ok(())
    }

    async fn make_directory(&self, path: &str) -> Result<()> {
        let dir = format!("{}/", normalize_path(path)?);
        let resp = self
            .request(Method::PUT, &self.object_url(&dir)?)
            .header(CONTENT_LENGTH, 0)
            .body(Bytes::new())
            .send()
            .await?;

        match resp.status().as_u16() {
            200..=299 => {
                debug!(path = %dir, "Created directory");
                Ok(())
            }
            400 => Err(Error::AlreadyExists(dir)),
            _ => Err(status_error(resp).await),
        }
    }

    async fn delete(&self, path: &str) -> Result<()> {
        let resp = self
            .request(Method::DELETE, &self.object_url(path)?)
            .send()
            .await?;

        match resp.status().as_u16() {
            200..=299 => {
                debug!(path = %path, "Delete complete");
                Ok(())
            }
            404 => Err(Error::NotFound(path.to_string())),
            400 => Err(Error::DirectoryNotEmpty(path.to_string())),
            _ => Err(status_error(resp).await),
        }
    }
}
