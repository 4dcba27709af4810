//! Errors specific to project specifications and lock files.
//!
//! A lock file that disagrees with its project is not an error; see
//! [`crate::validation`]. These variants cover documents that cannot be
//! read at all.

use nuget_core::CoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProjectModelError {
    /// Failed to parse a JSON document
    #[error("Failed to parse {file_type}: {source}")]
    JsonParseError {
        file_type: String,
        #[source]
        source: serde_json::Error,
    },

    /// The document parsed but does not have the expected shape
    #[error("Invalid {file_type} structure: {message}")]
    InvalidStructure { file_type: String, message: String },

    /// A project declares the same target framework twice
    #[error("Duplicate target framework '{framework}'")]
    DuplicateFramework { framework: String },

    /// A declared dependency has an unparseable version
    #[error("Invalid dependency '{name}': {source}")]
    InvalidDependency {
        name: String,
        #[source]
        source: CoreError,
    },

    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Result type alias for project model operations.
pub type Result<T> = std::result::Result<T, ProjectModelError>;

impl ProjectModelError {
    /// Helper for creating invalid structure errors
    pub fn invalid_structure(file_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidStructure {
            file_type: file_type.into(),
            message: message.into(),
        }
    }

    /// Helper for creating JSON parse errors
    pub fn json(file_type: impl Into<String>, source: serde_json::Error) -> Self {
        Self::JsonParseError {
            file_type: file_type.into(),
            source,
        }
    }
}
