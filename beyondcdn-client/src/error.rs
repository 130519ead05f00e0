use crate::path::PathError;

/// Coarse categories of storage errors, for callers that need to branch on
/// the outcome of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    AlreadyExists,
    DirectoryNotEmpty,
    Other,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Directory not empty: {0}")]
    DirectoryNotEmpty(String),
    #[error("Directory already exists")]
    AlreadyExists(String),
    #[error("Storage error: HTTP {status} - {body}")]
    Status { status: u16, body: String },
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Invalid listing response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error(transparent)]
    InvalidPath(#[from] PathError),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::NotFound(_) => ErrorKind::NotFound,
            Error::AlreadyExists(_) => ErrorKind::AlreadyExists,
            Error::DirectoryNotEmpty(_) => ErrorKind::DirectoryNotEmpty,
            Error::Status { .. } | Error::Http(_) | Error::Decode(_) | Error::InvalidPath(_) => {
                ErrorKind::Other
            }
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }
}

pub type Result<T> = std::result::Result<T, Error>;
