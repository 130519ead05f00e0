//! Client for the BeyondCDN storage API.
//!
//! A [`StorageClient`] talks to one storage zone in one region and maps HTTP
//! failures onto [`Error`] variants with a stable [`ErrorKind`].

pub mod client;
pub mod error;
pub mod path;
pub mod record;
pub mod region;
pub mod storage;

pub use client::{ClientConfig, StorageClient};
pub use error::{Error, ErrorKind, Result};
pub use path::{dirname, normalize_path, PathError};
pub use record::RemoteObject;
pub use region::Region;
pub use storage::{ByteStream, StorageApi};
