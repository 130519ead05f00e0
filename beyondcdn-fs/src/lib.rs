//! Filesystem-style access to a BeyondCDN storage zone.
//!
//! [`BeyondCdnAdapter`] implements the [`Filesystem`] contract on top of a
//! [`beyondcdn_client::StorageApi`], optionally scoped under a path prefix.

pub mod adapter;
pub mod error;
pub mod filesystem;
pub mod metadata;
pub mod prefix;

#[cfg(test)]
mod memory;

pub use adapter::BeyondCdnAdapter;
pub use error::AdapterError;
pub use filesystem::{FileContents, Filesystem, StreamedFile, Visibility};
pub use metadata::{normalize_object, parse_timestamp, EntryKind, Metadata, MetadataError};
pub use prefix::PathPrefix;
