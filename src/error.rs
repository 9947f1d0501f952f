// Error taxonomy for the library engine
// Validation errors fire before anything is mutated, so a failed call leaves state untouched

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Blank or otherwise unusable input (song fields, ids, directories)
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A song identity could not be derived from the given path
    #[error("cannot derive song identity: {0}")]
    InvalidIdentity(String),

    #[error("playlist name must not be blank")]
    BlankName,

    #[error("playlist not found: {0}")]
    NotFound(String),

    #[error("playlist already exists: {0}")]
    DuplicateName(String),

    /// The song's file disappeared since it was imported
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("failed to persist library to {}: {source}", path.display())]
    PersistenceFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("playback device error: {0}")]
    Device(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn persistence(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::PersistenceFailure {
            path: path.into(),
            source,
        }
    }
}
