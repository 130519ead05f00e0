use std::pin::Pin;

use bytes::Bytes;
use tokio::io::AsyncRead;

use crate::error::Result;
use crate::record::RemoteObject;

/// A caller-owned reader over remote content. Dropping it releases the
/// underlying connection.
pub type ByteStream = Pin<Box<dyn AsyncRead + Send>>;

/// Operations offered by a storage zone.
///
/// [`crate::StorageClient`] implements this over HTTP. The filesystem
/// adapter is written against the trait so it can also run over an
/// in-memory store.
#[async_trait::async_trait]
pub trait StorageApi: Send + Sync {
    /// List the immediate children of a directory.
    async fn list(&self, path: &str) -> Result<Vec<RemoteObject>>;

    /// Download the complete content of a file.
    async fn download(&self, path: &str) -> Result<Bytes>;

    /// Open a reader over a file without buffering the whole body.
    async fn stream(&self, path: &str) -> Result<ByteStream>;

    /// Create or replace a file.
    async fn upload(&self, path: &str, contents: Bytes) -> Result<()>;

    /// Create a directory marker at `path/`.
    async fn make_directory(&self, path: &str) -> Result<()>;

    /// Delete a file, or an empty directory if `path` ends in `/`.
    async fn delete(&self, path: &str) -> Result<()>;
}
