//! Library ranges and their canonical lock file rendering.
//!
//! A lock file records each declared dependency as a single string of the
//! form `"<Name> >= <bound>[<=|< <bound>]"`. Project specifications are
//! rendered the same way so the two can be compared textually.

use crate::error::{CoreError, Result};
use crate::float_range::FloatRange;
use crate::range::VersionRange;
use crate::version::NuGetVersion;
use std::fmt;

/// A named dependency constraint. A missing range accepts any version.
///
/// # Examples
///
/// ```
/// use nuget_core::{LibraryRange, VersionRange};
///
/// let range = LibraryRange::new("PackageC", Some(VersionRange::parse("[1.1.0, 2.0.1)").unwrap())).unwrap();
/// assert_eq!(range.to_lock_file_string(), "PackageC >= 1.1.0< 2.0.1");
///
/// let any = LibraryRange::new("jQuery", None).unwrap();
/// assert_eq!(any.to_lock_file_string(), "jQuery ");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LibraryRange {
    name: String,
    version_range: Option<VersionRange>,
}

impl LibraryRange {
    pub fn new(name: impl Into<String>, version_range: Option<VersionRange>) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(CoreError::invalid_library_range(name, "library name is empty"));
        }
        Ok(Self {
            name,
            version_range,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version_range(&self) -> Option<&VersionRange> {
        self.version_range.as_ref()
    }

    /// Renders the canonical lock file string.
    pub fn to_lock_file_string(&self) -> String {
        runtime_style_range_string(&self.name, self.version_range.as_ref())
    }

    /// Parses a canonical lock file string back into a library range.
    ///
    /// The canonical form only records inclusive lower bounds, so a range
    /// with an exclusive minimum comes back inclusive.
    pub fn parse_canonical(text: &str) -> Result<Self> {
        let invalid = |message: &str| CoreError::invalid_library_range(text, message);

        let Some((name, rest)) = text.split_once(' ') else {
            return Err(invalid("missing separator after library name"));
        };
        let rest = rest.trim();
        if rest.is_empty() {
            return Self::new(name, None);
        }

        let bounds = rest
            .strip_prefix(">=")
            .ok_or_else(|| invalid("expected '>=' after library name"))?
            .trim_start();

        let (min_token, max_bound) = match bounds.split_once('<') {
            None => (bounds.trim_end(), None),
            Some((min, upper)) => {
                let (include_max, max_token) = match upper.strip_prefix('=') {
                    Some(max) => (true, max),
                    None => (false, upper),
                };
                let max_token = max_token.trim();
                if max_token.is_empty() {
                    return Err(invalid("missing upper bound"));
                }
                if max_token.contains(char::is_whitespace) {
                    return Err(invalid("unexpected trailing content"));
                }
                (min, Some((NuGetVersion::parse(max_token)?, include_max)))
            }
        };
        if min_token.is_empty() {
            return Err(invalid("missing lower bound"));
        }
        if min_token.contains(char::is_whitespace) {
            return Err(invalid("expected '<=' or '<' before upper bound"));
        }
        let (max_version, include_max) = match max_bound {
            Some((max, include_max)) => (Some(max), include_max),
            None => (None, false),
        };

        let range = if min_token.contains('*') {
            let float = FloatRange::parse(min_token)?;
            VersionRange::new(None, true, max_version, include_max, Some(float))?
        } else {
            let min = NuGetVersion::parse(min_token)?;
            VersionRange::new(Some(min), true, max_version, include_max, None)?
        };

        Self::new(name, Some(range))
    }
}

impl fmt::Display for LibraryRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version_range {
            Some(range) => write!(f, "{} {}", self.name, range),
            None => f.write_str(&self.name),
        }
    }
}

/// Renders `name` and `range` in the canonical lock file form.
///
/// - Always starts with `"<name> "`.
/// - Without a range or a lower bound nothing else is written.
/// - Otherwise `">= "` and the float pattern (floating) or the literal
///   minimum version follow.
/// - An upper bound appends `"<= "` (inclusive) or `"< "` (exclusive)
///   directly after the lower bound, then the numeric part of the
///   maximum without release label: `"A >= 1.0< 2.0"`.
pub fn runtime_style_range_string(name: &str, range: Option<&VersionRange>) -> String {
    let mut out = String::with_capacity(name.len() + 24);
    out.push_str(name);
    out.push(' ');

    let Some(range) = range else {
        return out;
    };
    let Some(min) = range.min_version() else {
        return out;
    };

    out.push_str(">= ");
    match range.float_range() {
        Some(float) => out.push_str(&float.to_string()),
        None => out.push_str(&min.to_string()),
    }

    if let Some(max) = range.max_version() {
        out.push_str(if range.is_max_inclusive() { "<= " } else { "< " });
        out.push_str(max.numeric_string());
    }

    out
}

/// How a declared dependency participates in the build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LibraryDependencyType {
    /// Referenced at compile time and flowed to consumers.
    #[default]
    Default,
    /// Used only while building; not flowed to consumers.
    Build,
    /// Supplied by the platform.
    Platform,
}

impl LibraryDependencyType {
    /// Parses the `type` value of a project dependency. Unknown values map
    /// to `None`.
    pub fn parse(text: &str) -> Option<Self> {
        match text.trim().to_ascii_lowercase().as_str() {
            "" | "default" => Some(Self::Default),
            "build" => Some(Self::Build),
            "platform" => Some(Self::Platform),
            _ => None,
        }
    }
}

/// A dependency declared by a project.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LibraryDependency {
    pub library_range: LibraryRange,
    pub dependency_type: LibraryDependencyType,
}

impl LibraryDependency {
    pub fn new(library_range: LibraryRange) -> Self {
        Self {
            library_range,
            dependency_type: LibraryDependencyType::Default,
        }
    }

    pub fn name(&self) -> &str {
        self.library_range.name()
    }
}
