use thiserror::Error;

/// Core error types for NuGet value parsing.
///
/// Version, version range and library range parsing all fail with one of
/// these variants. Every variant carries the offending text so callers can
/// surface it without re-threading the input.
///
/// # Examples
///
/// ```
/// use nuget_core::error::CoreError;
/// use nuget_core::VersionRange;
///
/// let err = VersionRange::parse("[1.0, 2.0").unwrap_err();
/// assert!(matches!(err, CoreError::InvalidVersionRange { .. }));
/// assert!(err.to_string().contains("[1.0, 2.0"));
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("invalid version '{version}': {message}")]
    InvalidVersion { version: String, message: String },

    #[error("invalid version range '{range}': {message}")]
    InvalidVersionRange { range: String, message: String },

    #[error("invalid library range '{range}': {message}")]
    InvalidLibraryRange { range: String, message: String },
}

impl CoreError {
    /// Helper for creating invalid version errors
    pub fn invalid_version(version: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidVersion {
            version: version.into(),
            message: message.into(),
        }
    }

    /// Helper for creating invalid version range errors
    pub fn invalid_range(range: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidVersionRange {
            range: range.into(),
            message: message.into(),
        }
    }

    /// Helper for creating invalid library range errors
    pub fn invalid_library_range(range: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidLibraryRange {
            range: range.into(),
            message: message.into(),
        }
    }
}

/// Convenience type alias for `Result<T, CoreError>`.
pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_version_display() {
        let error = CoreError::invalid_version("1.a", "non-numeric component 'a'");
        assert_eq!(
            error.to_string(),
            "invalid version '1.a': non-numeric component 'a'"
        );
    }

    #[test]
    fn test_invalid_range_display() {
        let error = CoreError::invalid_range("(1.0)", "exclusive exact range");
        assert_eq!(
            error.to_string(),
            "invalid version range '(1.0)': exclusive exact range"
        );
    }

    #[test]
    fn test_invalid_library_range_display() {
        let error = CoreError::invalid_library_range("", "empty name");
        assert!(error.to_string().starts_with("invalid library range"));
    }
}
