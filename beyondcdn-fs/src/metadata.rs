//! Canonical metadata for stored objects.
//!
//! Listing records from the storage API carry the zone name and the full
//! remote directory in their path. Normalization strips both, together with
//! the adapter prefix, so that callers only ever see adapter-visible paths.

use beyondcdn_client::{normalize_path, PathError, RemoteObject};
use chrono::NaiveDateTime;
use serde::Serialize;

use crate::prefix::PathPrefix;

const TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Dir,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Metadata {
    #[serde(rename = "type")]
    pub kind: EntryKind,
    /// Parent directory, without leading or trailing slash.
    pub dirname: String,
    /// Adapter-visible path, always starting with `/`.
    pub path: String,
    pub mimetype: String,
    pub size: u64,
    /// Unix seconds; same as `last_changed`.
    pub timestamp: i64,
    pub last_changed: i64,
    pub date_created: i64,
    pub object_name: String,
    pub guid: String,
    pub server_id: i64,
    pub user_id: String,
    pub storage_zone_name: String,
    pub storage_zone_id: i64,
    pub checksum: Option<String>,
    pub replicated_zones: Option<String>,
}

impl Metadata {
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Dir
    }

    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MetadataError {
    #[error("Unrecognized timestamp {0:?}")]
    Timestamp(String),
    #[error(transparent)]
    Path(#[from] PathError),
}

/// Parse a storage API timestamp into Unix seconds, UTC.
///
/// Both `2023-05-01T12:00:00.123456` and `2023-05-01T12:00:00` occur.
pub fn parse_timestamp(value: &str) -> Result<i64, MetadataError> {
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .map(|dt| dt.and_utc().timestamp())
        .ok_or_else(|| MetadataError::Timestamp(value.to_string()))
}

/// Strip `/{zone}/` and the adapter prefix from a remote path.
fn visible_path<'a>(raw: &'a str, zone: &str, prefix: &PathPrefix) -> &'a str {
    let rest = raw.trim_start_matches('/');
    let rest = rest
        .strip_prefix(zone)
        .filter(|r| r.is_empty() || r.starts_with('/'))
        .unwrap_or(rest)
        .trim_start_matches('/');
    prefix.remove(rest)
}

pub fn normalize_object(
    object: &RemoteObject,
    prefix: &PathPrefix,
) -> Result<Metadata, MetadataError> {
    let zone = object.storage_zone_name.as_str();
    let dirname = normalize_path(visible_path(&object.path, zone, prefix))?;
    let full = format!("{}{}", object.path, object.object_name);
    let path = format!("/{}", normalize_path(visible_path(&full, zone, prefix))?);
    let last_changed = parse_timestamp(&object.last_changed)?;

    Ok(Metadata {
        kind: if object.is_directory {
            EntryKind::Dir
        } else {
            EntryKind::File
        },
        dirname,
        path,
        mimetype: object.content_type.clone(),
        size: object.length,
        timestamp: last_changed,
        last_changed,
        date_created: parse_timestamp(&object.date_created)?,
        object_name: object.object_name.clone(),
        guid: object.guid.clone(),
        server_id: object.server_id,
        user_id: object.user_id.clone(),
        storage_zone_name: object.storage_zone_name.clone(),
        storage_zone_id: object.storage_zone_id,
        checksum: object.checksum.clone(),
        replicated_zones: object.replicated_zones.clone(),
    })
}
