//! The generic filesystem contract.
//!
//! Expected failures such as a missing file are reported as `false` or
//! `None`. Operations that decode remote listings return a `Result` so that
//! malformed data from the service is not mistaken for absence.

use std::fmt;

use async_trait::async_trait;
use beyondcdn_client::ByteStream;
use bytes::Bytes;
use tokio::io::AsyncReadExt;
use tracing::warn;

use crate::error::AdapterError;
use crate::metadata::Metadata;

/// Metadata of a file together with its complete content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileContents {
    pub metadata: Metadata,
    pub contents: Bytes,
}

/// An open reader over a stored file. The caller owns the stream.
pub struct StreamedFile {
    pub stream: ByteStream,
}

impl fmt::Debug for StreamedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamedFile").finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Private,
}

#[async_trait]
pub trait Filesystem: Send + Sync {
    /// Create or replace a file.
    async fn write(&self, path: &str, contents: Bytes) -> bool;

    async fn update(&self, path: &str, contents: Bytes) -> bool {
        self.write(path, contents).await
    }

    /// Write a file from a reader, buffering it in memory first.
    async fn write_stream(&self, path: &str, mut stream: ByteStream) -> bool {
        let mut buf = Vec::new();
        if let Err(e) = stream.read_to_end(&mut buf).await {
            warn!(path = %path, error = %e, "Failed to read source stream");
            return false;
        }
        self.write(path, Bytes::from(buf)).await
    }

    async fn update_stream(&self, path: &str, stream: ByteStream) -> bool {
        self.write_stream(path, stream).await
    }

    /// Move a file: copy, then delete the source. A failed delete leaves the
    /// copy in place.
    async fn rename(&self, path: &str, new_path: &str) -> Result<bool, AdapterError>;

    async fn copy(&self, path: &str, new_path: &str) -> Result<bool, AdapterError>;

    /// Delete a file. Deleting a file that does not exist succeeds.
    async fn delete(&self, path: &str) -> bool;

    /// Delete an empty directory.
    async fn delete_dir(&self, dirname: &str) -> bool;

    /// Create a directory. Creating an existing directory succeeds.
    async fn create_dir(&self, dirname: &str) -> bool;

    async fn has(&self, path: &str) -> Result<bool, AdapterError>;

    async fn read(&self, path: &str) -> Result<Option<FileContents>, AdapterError>;

    async fn read_stream(&self, path: &str) -> Option<StreamedFile>;

    /// List a directory, optionally descending depth-first into
    /// subdirectories. Children follow their directory entry.
    async fn list_contents(
        &self,
        directory: &str,
        recursive: bool,
    ) -> Result<Option<Vec<Metadata>>, AdapterError>;

    async fn get_metadata(&self, path: &str) -> Result<Option<Metadata>, AdapterError>;

    // The next three return the whole record, not just the named field.

    async fn get_size(&self, path: &str) -> Result<Option<Metadata>, AdapterError> {
        self.get_metadata(path).await
    }

    async fn get_mimetype(&self, path: &str) -> Result<Option<Metadata>, AdapterError> {
        self.get_metadata(path).await
    }

    async fn get_timestamp(&self, path: &str) -> Result<Option<Metadata>, AdapterError> {
        self.get_metadata(path).await
    }

    async fn get_visibility(&self, _path: &str) -> Result<Visibility, AdapterError> {
        Err(AdapterError::VisibilityUnsupported)
    }

    async fn set_visibility(
        &self,
        _path: &str,
        _visibility: Visibility,
    ) -> Result<bool, AdapterError> {
        Err(AdapterError::VisibilityUnsupported)
    }
}
