//! Errors specific to package manifest handling.

use nuget_core::CoreError;
use thiserror::Error;

/// Errors that can occur while reading or resolving a package manifest.
///
/// Any of these aborts the whole resolve call; no partial manifest is
/// returned.
#[derive(Error, Debug)]
pub enum ManifestError {
    /// Failed to parse the structured manifest document
    #[error("Failed to parse manifest document: {source}")]
    JsonParseError {
        #[source]
        source: serde_json::Error,
    },

    /// A required element is missing or empty
    #[error("Missing required element '{element}'")]
    MissingElement { element: String },

    /// A required attribute is missing or empty on an element
    #[error("Missing required attribute '{attribute}' on <{element}>")]
    MissingAttribute { element: String, attribute: String },

    /// A dependency declares a version range that does not parse
    #[error("Invalid version for dependency '{id}': {source}")]
    InvalidDependencyVersion {
        id: String,
        #[source]
        source: CoreError,
    },

    /// The package's own version does not parse
    #[error("Invalid package version: {source}")]
    InvalidPackageVersion {
        #[source]
        source: CoreError,
    },
}

/// Result type alias for manifest operations.
pub type Result<T> = std::result::Result<T, ManifestError>;

impl ManifestError {
    /// Helper for creating missing attribute errors
    pub fn missing_attribute(element: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self::MissingAttribute {
            element: element.into(),
            attribute: attribute.into(),
        }
    }

    /// Helper for creating missing element errors
    pub fn missing_element(element: impl Into<String>) -> Self {
        Self::MissingElement {
            element: element.into(),
        }
    }
}
