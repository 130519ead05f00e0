//! In-memory storage zone for adapter tests.
//!
//! Behaves like the storage API: directories are implied by the files under
//! them or created explicitly, listings return records shaped like the
//! service's, and every call is logged so tests can check sequencing.

use std::collections::{BTreeMap, BTreeSet};
use std::io::Cursor;
use std::sync::Mutex;

use async_trait::async_trait;
use beyondcdn_client::{normalize_path, ByteStream, Error, RemoteObject, Result, StorageApi};
use bytes::Bytes;

const TIMESTAMP: &str = "2023-05-01T12:00:00.123456";

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Call {
    pub verb: Verb,
    /// Path as passed by the caller.
    pub path: String,
}

impl Call {
    pub(crate) fn new<P: ToString>(verb: Verb, path: P) -> Self {
        Self {
            verb,
            path: path.to_string(),
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum Verb {
    List,
    Download,
    Stream,
    Upload,
    MakeDirectory,
    Delete,
}

#[derive(Default)]
struct State {
    files: BTreeMap<String, Bytes>,
    dirs: BTreeSet<String>,
    broken: BTreeSet<String>,
    broken_deletes: BTreeSet<String>,
    duplicated: BTreeSet<String>,
    last_changed: Option<String>,
    calls: Vec<Call>,
}

impl State {
    fn dir_exists(&self, key: &str) -> bool {
        let prefix = format!("{key}/");
        key.is_empty()
            || self.dirs.contains(key)
            || self.files.keys().any(|k| k.starts_with(&prefix))
            || self.dirs.iter().any(|d| d.starts_with(&prefix))
    }

    fn is_broken(&self, key: &str) -> bool {
        self.broken
            .iter()
            .any(|b| key == b || key.starts_with(&format!("{b}/")))
    }

    fn children(&self, key: &str) -> (BTreeSet<String>, Vec<(String, u64)>) {
        let prefix = if key.is_empty() {
            String::new()
        } else {
            format!("{key}/")
        };
        let mut dirs = BTreeSet::new();
        let mut files = Vec::new();
        for (k, v) in &self.files {
            if let Some(rest) = k.strip_prefix(&prefix) {
                match rest.split_once('/') {
                    Some((dir, _)) => {
                        dirs.insert(dir.to_string());
                    }
                    None => files.push((rest.to_string(), v.len() as u64)),
                }
            }
        }
        for d in &self.dirs {
            if let Some(rest) = d.strip_prefix(&prefix) {
                if let Some(first) = rest.split('/').next().filter(|s| !s.is_empty()) {
                    dirs.insert(first.to_string());
                }
            }
        }
        (dirs, files)
    }
}

pub(crate) struct MemoryStorage {
    zone: String,
    state: Mutex<State>,
}

impl MemoryStorage {
    pub(crate) fn new(zone: &str) -> Self {
        Self {
            zone: zone.to_string(),
            state: Mutex::new(State::default()),
        }
    }

    /// Make every request on `path` or below it fail with a server error.
    pub(crate) fn break_path(&self, path: &str) {
        self.state.lock().unwrap().broken.insert(path.to_string());
    }

    /// Make deletes of exactly `path` fail with a server error.
    pub(crate) fn break_deletes(&self, path: &str) {
        self.state.lock().unwrap().broken_deletes.insert(path.to_string());
    }

    /// Emit the listing record for `path` twice.
    pub(crate) fn duplicate_entry(&self, path: &str) {
        self.state.lock().unwrap().duplicated.insert(path.to_string());
    }

    /// Report this `LastChanged` value for every listed object.
    pub(crate) fn set_last_changed(&self, value: &str) {
        self.state.lock().unwrap().last_changed = Some(value.to_string());
    }

    pub(crate) fn contains(&self, path: &str) -> bool {
        self.state.lock().unwrap().files.contains_key(path)
    }

    pub(crate) fn take_calls(&self) -> Vec<Call> {
        std::mem::take(&mut self.state.lock().unwrap().calls)
    }

    fn record(
        &self,
        dir: &str,
        name: &str,
        length: u64,
        is_directory: bool,
        last_changed: &str,
    ) -> RemoteObject {
        let path = if dir.is_empty() {
            format!("/{}/", self.zone)
        } else {
            format!("/{}/{}/", self.zone, dir)
        };
        RemoteObject {
            guid: format!("guid-{name}"),
            storage_zone_name: self.zone.clone(),
            path,
            object_name: name.to_string(),
            length,
            last_changed: last_changed.to_string(),
            date_created: TIMESTAMP.to_string(),
            server_id: 7,
            is_directory,
            user_id: "user-1".to_string(),
            content_type: String::new(),
            storage_zone_id: 99,
            checksum: None,
            replicated_zones: None,
        }
    }

    /// Log the call and resolve its key, failing for broken paths.
    fn begin(&self, verb: Verb, path: &str) -> Result<String> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::new(verb, path));
        let key = normalize_path(path)?;
        if state.is_broken(&key) {
            return Err(Error::Status {
                status: 500,
                body: "injected failure".to_string(),
            });
        }
        Ok(key)
    }
}

#[async_trait]
impl StorageApi for MemoryStorage {
    async fn list(&self, path: &str) -> Result<Vec<RemoteObject>> {
        let key = self.begin(Verb::List, path)?;
        let state = self.state.lock().unwrap();
        if state.files.contains_key(&key) {
            return Err(Error::NotFound("File is not a directory".to_string()));
        }
        if !state.dir_exists(&key) {
            return Err(Error::NotFound(format!("{key}/")));
        }

        let last_changed = state.last_changed.as_deref().unwrap_or(TIMESTAMP);
        let (dirs, files) = state.children(&key);
        let mut entries = Vec::new();
        for name in dirs {
            entries.push(self.record(&key, &name, 0, true, last_changed));
        }
        for (name, len) in files {
            let entry = self.record(&key, &name, len, false, last_changed);
            let full = if key.is_empty() {
                name.clone()
            } else {
                format!("{key}/{name}")
            };
            if state.duplicated.contains(&full) {
                entries.push(entry.clone());
            }
            entries.push(entry);
        }
        Ok(entries)
    }

    async fn download(&self, path: &str) -> Result<Bytes> {
        let key = self.begin(Verb::Download, path)?;
        let state = self.state.lock().unwrap();
        state
            .files
            .get(&key)
            .cloned()
            .ok_or_else(|| Error::NotFound(path.to_string()))
    }

    async fn stream(&self, path: &str) -> Result<ByteStream> {
        let content = {
            let key = self.begin(Verb::Stream, path)?;
            let state = self.state.lock().unwrap();
            state
                .files
                .get(&key)
                .cloned()
                .ok_or_else(|| Error::NotFound(path.to_string()))?
        };
        Ok(Box::pin(Cursor::new(content)))
    }

    async fn upload(&self, path: &str, contents: Bytes) -> Result<()> {
        let key = self.begin(Verb::Upload, path)?;
        self.state.lock().unwrap().files.insert(key, contents);
        Ok(())
    }

    async fn make_directory(&self, path: &str) -> Result<()> {
        let key = self.begin(Verb::MakeDirectory, path)?;
        let mut state = self.state.lock().unwrap();
        if state.dir_exists(&key) {
            return Err(Error::AlreadyExists(format!("{key}/")));
        }
        state.dirs.insert(key);
        Ok(())
    }

    async fn delete(&self, path: &str) -> Result<()> {
        let key = self.begin(Verb::Delete, path)?;
        let mut state = self.state.lock().unwrap();
        if state.broken_deletes.contains(path) {
            return Err(Error::Status {
                status: 500,
                body: "injected delete failure".to_string(),
            });
        }
        if !path.ends_with('/') {
            return match state.files.remove(&key) {
                Some(_) => Ok(()),
                None => Err(Error::NotFound(path.to_string())),
            };
        }

        if !state.dir_exists(&key) {
            return Err(Error::NotFound(path.to_string()));
        }
        let prefix = format!("{key}/");
        let occupied = state.files.keys().any(|k| k.starts_with(&prefix))
            || state.dirs.iter().any(|d| d.starts_with(&prefix));
        if occupied {
            return Err(Error::DirectoryNotEmpty(path.to_string()));
        }
        state.dirs.remove(&key);
        Ok(())
    }
}
