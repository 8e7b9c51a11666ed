// Error taxonomy for the customer book
//
// Validation and duplicate errors are user-correctable and never touch disk.
// Storage errors come from writes only: unreadable data on load is recovered
// inside the store and never reaches callers.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("all fields required")]
    MissingFields,
    #[error("invalid balance")]
    InvalidBalance(String),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("could not create directory `{path}`: {source}")]
    CreateDir { path: PathBuf, source: std::io::Error },
    #[error("could not write customer file `{path}`: {source}")]
    Write { path: PathBuf, source: std::io::Error },
    #[error("could not encode customer records: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("balance of account `{account_number}` is not a finite number")]
    NonFiniteBalance { account_number: String },
}

/// Reasons a customer file is treated as empty on load.
#[derive(Debug, Error)]
pub enum StorageCorruption {
    #[error("file is empty")]
    Empty,
    #[error("malformed customer file: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("unknown file format tag `{0}`")]
    UnknownFormat(String),
    #[error("schema version {found} is newer than supported version {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },
    #[error("checksum mismatch (expected {expected}, computed {computed})")]
    ChecksumMismatch { expected: String, computed: String },
}

#[derive(Debug, Error)]
pub enum CustomerError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("account number `{0}` already exists")]
    Duplicate(String),
    #[error(transparent)]
    Storage(#[from] StoreError),
}

impl CustomerError {
    /// True when the user can fix the problem by editing the form.
    pub fn is_user_error(&self) -> bool {
        matches!(self, CustomerError::Validation(_) | CustomerError::Duplicate(_))
    }
}
