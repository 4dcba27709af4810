use nuget_project_model::ProjectModelError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while checking projects on disk.
///
/// A stale lock file is not an error; see [`crate::check::CheckOutcome`].
#[derive(Error, Debug)]
pub enum MetaError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to read {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    ProjectModel(#[from] ProjectModelError),

    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Result type alias for orchestration operations.
pub type Result<T> = std::result::Result<T, MetaError>;

impl MetaError {
    pub fn read_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ReadFile {
            path: path.into(),
            source,
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}
