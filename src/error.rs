use std::path::{Path, PathBuf};

use crate::{header::HeaderError, render::RenderError};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("cannot read {}: {source}", .path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed header in {}: {source}", .path.display())]
    MalformedHeader {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(
        "invalid timestamp {value:?} in {}, expected YYYY/MM/DD HH:MM",
        .path.display()
    )]
    InvalidTimestamp { path: PathBuf, value: String },

    #[error("failed to render {}: {source}", .path.display())]
    Rendering {
        path: PathBuf,
        #[source]
        source: RenderError,
    },

    #[error("database open error: {0}")]
    RedbDatabase(#[from] redb::DatabaseError),

    #[error("database storage error: {0}")]
    RedbStorage(#[from] redb::StorageError),

    #[error("database transaction error: {0}")]
    RedbTransaction(#[from] redb::TransactionError),

    #[error("database table error: {0}")]
    RedbTable(#[from] redb::TableError),

    #[error("database commit error: {0}")]
    RedbCommit(#[from] redb::CommitError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("{kind} not found: {name}")]
    NotFound { kind: &'static str, name: String },

    #[error("data directory does not exist and could not be created: {0}")]
    DataDir(PathBuf),
}

impl Error {
    pub(crate) fn file_access(path: &Path, source: std::io::Error) -> Self {
        Self::FileAccess {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Attach the offending file to a header parse failure.
    pub(crate) fn header(path: &Path, err: HeaderError) -> Self {
        let path = path.to_path_buf();
        match err {
            HeaderError::Malformed(source) => {
                Self::MalformedHeader { path, source }
            }
            HeaderError::InvalidTimestamp { value } => {
                Self::InvalidTimestamp { path, value }
            }
        }
    }

    /// The document that caused the failure, if the error is tied to one.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::FileAccess { path, .. }
            | Self::MalformedHeader { path, .. }
            | Self::InvalidTimestamp { path, .. }
            | Self::Rendering { path, .. } => Some(path.as_path()),
            _ => None,
        }
    }
}
