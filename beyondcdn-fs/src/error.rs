use crate::metadata::MetadataError;

/// Failures that are not an expected outcome of a filesystem operation.
///
/// Missing files, existing directories and the like are reported through
/// `false`/`None` results instead.
#[derive(Debug, thiserror::Error)]
pub enum AdapterError {
    #[error(
        "A pull zone URL must be configured to build public URLs for BeyondCDN objects"
    )]
    MissingPullZoneUrl,
    #[error("BeyondCDN storage does not support visibility settings")]
    VisibilityUnsupported,
    #[error("Malformed object in listing: {0}")]
    Metadata(#[from] MetadataError),
}
