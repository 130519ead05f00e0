//! Filesystem adapter over a BeyondCDN storage zone.
//!
//! Each operation scopes its path under the configured prefix, calls the
//! storage API and converts client errors into `false`/`None`. Copy and
//! rename are composed from read, write and delete, executed in sequence.

use async_trait::async_trait;
use beyondcdn_client::{dirname, normalize_path, ErrorKind, StorageApi, StorageClient};
use bytes::Bytes;
use tracing::{debug, warn};

use crate::error::AdapterError;
use crate::filesystem::{FileContents, Filesystem, StreamedFile};
use crate::metadata::{normalize_object, Metadata};
use crate::prefix::PathPrefix;

pub struct BeyondCdnAdapter<S = StorageClient> {
    client: S,
    pull_zone_url: Option<String>,
    prefix: PathPrefix,
}

impl<S: StorageApi> BeyondCdnAdapter<S> {
    pub fn new(client: S) -> Self {
        Self {
            client,
            pull_zone_url: None,
            prefix: PathPrefix::default(),
        }
    }

    /// Public base URL of the pull zone serving this storage zone.
    pub fn with_pull_zone_url(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        self.pull_zone_url = if url.is_empty() { None } else { Some(url) };
        self
    }

    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.prefix = PathPrefix::new(prefix);
        self
    }

    pub fn prefix(&self) -> &PathPrefix {
        &self.prefix
    }

    pub fn client(&self) -> &S {
        &self.client
    }

    /// Public URL of a stored object, built from the pull zone URL.
    pub fn get_url(&self, path: &str) -> Result<String, AdapterError> {
        let base = self
            .pull_zone_url
            .as_deref()
            .ok_or(AdapterError::MissingPullZoneUrl)?;
        let path = self.prefix.prepend(path.trim_start_matches('/'));
        Ok(format!(
            "{}/{}",
            base.trim_end_matches('/'),
            path.trim_start_matches('/')
        ))
    }

    async fn write_scoped(&self, path: &str, contents: Bytes) -> bool {
        match self.client.upload(path, contents).await {
            Ok(()) => true,
            Err(e) => {
                warn!(path = %path, error = %e, "Write failed");
                false
            }
        }
    }

    async fn read_scoped(&self, path: &str) -> Result<Option<FileContents>, AdapterError> {
        let Some(metadata) = self.metadata_scoped(path).await? else {
            return Ok(None);
        };
        match self.client.download(path).await {
            Ok(contents) => Ok(Some(FileContents { metadata, contents })),
            Err(e) => {
                warn!(path = %path, error = %e, "Read failed");
                Ok(None)
            }
        }
    }

    async fn copy_scoped(&self, from: &str, to: &str) -> Result<bool, AdapterError> {
        let Some(source) = self.read_scoped(from).await? else {
            debug!(from = %from, "Copy source unreadable");
            return Ok(false);
        };
        Ok(self.write_scoped(to, source.contents).await)
    }

    /// Metadata for an already-prefixed path, found by listing its parent.
    async fn metadata_scoped(&self, path: &str) -> Result<Option<Metadata>, AdapterError> {
        let path = match normalize_path(path) {
            Ok(p) => p,
            Err(e) => {
                debug!(path = %path, error = %e, "Unusable metadata path");
                return Ok(None);
            }
        };
        let Some(entries) = self.list_scoped(dirname(&path), false).await? else {
            return Ok(None);
        };

        let target = self.prefix.remove(&path);
        let mut matches = entries.into_iter().filter(|entry| {
            normalize_path(&entry.path).is_ok_and(|entry_path| entry_path == target)
        });
        match (matches.next(), matches.next()) {
            (Some(entry), None) => Ok(Some(entry)),
            (None, _) => Ok(None),
            (Some(_), Some(_)) => {
                warn!(path = %path, "Ambiguous listing: more than one entry matches");
                Ok(None)
            }
        }
    }

    /// Depth-first listing of an already-prefixed directory.
    ///
    /// Only a failure to list `directory` itself yields `None`; subdirectories
    /// that cannot be listed are skipped.
    async fn list_scoped(
        &self,
        directory: &str,
        recursive: bool,
    ) -> Result<Option<Vec<Metadata>>, AdapterError> {
        let top = match self.client.list(directory).await {
            Ok(entries) => entries,
            Err(e) => {
                warn!(directory = %directory, error = %e, "Listing failed");
                return Ok(None);
            }
        };

        let mut contents = Vec::new();
        let mut pending = vec![top.into_iter()];
        while let Some(level) = pending.last_mut() {
            let Some(object) = level.next() else {
                pending.pop();
                continue;
            };
            let entry = normalize_object(&object, &self.prefix)?;
            if recursive && entry.is_dir() {
                let child = self.prefix.join(&entry.path);
                match self.client.list(&child).await {
                    Ok(children) => pending.push(children.into_iter()),
                    Err(e) => warn!(directory = %child, error = %e, "Skipping unlistable directory"),
                }
            }
            contents.push(entry);
        }
        Ok(Some(contents))
    }
}

#[async_trait]
impl<S: StorageApi> Filesystem for BeyondCdnAdapter<S> {
    async fn write(&self, path: &str, contents: Bytes) -> bool {
        self.write_scoped(&self.prefix.prepend(path), contents).await
    }

    async fn rename(&self, path: &str, new_path: &str) -> Result<bool, AdapterError> {
        let from = self.prefix.prepend(path);
        let to = self.prefix.prepend(new_path);

        if !self.copy_scoped(&from, &to).await? {
            return Ok(false);
        }
        match self.client.delete(&from).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(true),
            Err(e) => {
                warn!(from = %from, to = %to, error = %e, "Rename left the source in place");
                Ok(false)
            }
        }
    }

    async fn copy(&self, path: &str, new_path: &str) -> Result<bool, AdapterError> {
        self.copy_scoped(&self.prefix.prepend(path), &self.prefix.prepend(new_path))
            .await
    }

    async fn delete(&self, path: &str) -> bool {
        let path = self.prefix.prepend(path);
        match self.client.delete(&path).await {
            Ok(()) => true,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path, "Delete of missing file");
                true
            }
            Err(e) => {
                warn!(path = %path, error = %e, "Delete failed");
                false
            }
        }
    }

    async fn delete_dir(&self, dirname: &str) -> bool {
        let dir = format!("{}/", self.prefix.prepend(dirname).trim_end_matches('/'));
        match self.client.delete(&dir).await {
            Ok(()) => true,
            Err(e) => {
                warn!(path = %dir, error = %e, "Directory delete failed");
                false
            }
        }
    }

    async fn create_dir(&self, dirname: &str) -> bool {
        let dir = self.prefix.prepend(dirname);
        match self.client.make_directory(&dir).await {
            Ok(()) => true,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => true,
            Err(e) => {
                warn!(path = %dir, error = %e, "Directory create failed");
                false
            }
        }
    }

    async fn has(&self, path: &str) -> Result<bool, AdapterError> {
        Ok(self.get_metadata(path).await?.is_some())
    }

    async fn read(&self, path: &str) -> Result<Option<FileContents>, AdapterError> {
        self.read_scoped(&self.prefix.prepend(path)).await
    }

    async fn read_stream(&self, path: &str) -> Option<StreamedFile> {
        let path = self.prefix.prepend(path);
        match self.client.stream(&path).await {
            Ok(stream) => Some(StreamedFile { stream }),
            Err(e) => {
                warn!(path = %path, error = %e, "Stream open failed");
                None
            }
        }
    }

    async fn list_contents(
        &self,
        directory: &str,
        recursive: bool,
    ) -> Result<Option<Vec<Metadata>>, AdapterError> {
        self.list_scoped(&self.prefix.prepend(directory), recursive)
            .await
    }

    async fn get_metadata(&self, path: &str) -> Result<Option<Metadata>, AdapterError> {
        self.metadata_scoped(&self.prefix.prepend(path)).await
    }
}
