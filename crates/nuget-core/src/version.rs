//! NuGet package versions.
//!
//! A NuGet version has one to four numeric components followed by optional
//! dot-separated release labels and optional build metadata:
//! `major[.minor[.patch[.revision]]][-label(.label)*][+metadata]`.
//!
//! Comparison is semantic: `1.0` and `1.0.0` are the same version, release
//! labels sort below the release they precede and metadata is ignored.

use crate::error::{CoreError, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// A parsed NuGet version that remembers the text it was parsed from.
///
/// `Display` writes the original text, which is the literal form recorded in
/// lock files. Use [`NuGetVersion::to_normalized_string`] for the canonical
/// `major.minor.patch[.revision][-label]` rendering.
///
/// # Examples
///
/// ```
/// use nuget_core::NuGetVersion;
///
/// let v = NuGetVersion::parse("1.0-beta.2").unwrap();
/// assert_eq!(v.to_string(), "1.0-beta.2");
/// assert_eq!(v.to_normalized_string(), "1.0.0-beta.2");
/// assert!(v.is_prerelease());
/// assert_eq!(v, NuGetVersion::parse("1.0.0-BETA.2").unwrap());
/// ```
#[derive(Debug, Clone)]
pub struct NuGetVersion {
    major: u64,
    minor: u64,
    patch: u64,
    revision: u64,
    release_labels: Vec<String>,
    metadata: Option<String>,
    original: String,
}

impl NuGetVersion {
    /// Creates a release version from its first three components.
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self::from_parts(major, minor, patch, 0, Vec::new())
    }

    fn from_parts(
        major: u64,
        minor: u64,
        patch: u64,
        revision: u64,
        release_labels: Vec<String>,
    ) -> Self {
        let mut version = Self {
            major,
            minor,
            patch,
            revision,
            release_labels,
            metadata: None,
            original: String::new(),
        };
        version.original = version.to_normalized_string();
        version
    }

    /// Parses a version string.
    ///
    /// Surrounding whitespace is ignored. Fails on empty input, more than
    /// four numeric components, non-numeric components and empty or
    /// malformed release labels.
    pub fn parse(text: &str) -> Result<Self> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(CoreError::invalid_version(text, "empty version"));
        }

        let (without_metadata, metadata) = match trimmed.split_once('+') {
            Some((rest, meta)) => {
                if !is_valid_label(meta.split('.')) {
                    return Err(CoreError::invalid_version(text, "malformed build metadata"));
                }
                (rest, Some(meta.to_string()))
            }
            None => (trimmed, None),
        };

        let (numeric, release) = match without_metadata.split_once('-') {
            Some((numeric, release)) => (numeric, Some(release)),
            None => (without_metadata, None),
        };

        let mut parts = [0u64; 4];
        let mut count = 0;
        for component in numeric.split('.') {
            if count == 4 {
                return Err(CoreError::invalid_version(
                    text,
                    "more than four numeric components",
                ));
            }
            if component.is_empty() || !component.bytes().all(|b| b.is_ascii_digit()) {
                return Err(CoreError::invalid_version(
                    text,
                    format!("non-numeric component '{}'", component),
                ));
            }
            parts[count] = component.parse().map_err(|_| {
                CoreError::invalid_version(text, format!("component '{}' overflows", component))
            })?;
            count += 1;
        }

        let release_labels = match release {
            Some(release) => {
                if !is_valid_label(release.split('.')) {
                    return Err(CoreError::invalid_version(text, "malformed release label"));
                }
                release.split('.').map(str::to_string).collect()
            }
            None => Vec::new(),
        };

        Ok(Self {
            major: parts[0],
            minor: parts[1],
            patch: parts[2],
            revision: parts[3],
            release_labels,
            metadata,
            original: trimmed.to_string(),
        })
    }

    pub fn major(&self) -> u64 {
        self.major
    }

    pub fn minor(&self) -> u64 {
        self.minor
    }

    pub fn patch(&self) -> u64 {
        self.patch
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn release_labels(&self) -> &[String] {
        &self.release_labels
    }

    /// Release labels joined with `.`, empty for a release version.
    pub fn release(&self) -> String {
        self.release_labels.join(".")
    }

    pub fn metadata(&self) -> Option<&str> {
        self.metadata.as_deref()
    }

    pub fn is_prerelease(&self) -> bool {
        !self.release_labels.is_empty()
    }

    /// The text this version was parsed from.
    pub fn original(&self) -> &str {
        &self.original
    }

    /// The numeric part of the original text, without release label or
    /// metadata (`"2.0.1-rc+abc"` → `"2.0.1"`).
    pub fn numeric_string(&self) -> &str {
        let end = self
            .original
            .find(['-', '+'])
            .unwrap_or(self.original.len());
        &self.original[..end]
    }

    /// Renders `major.minor.patch[.revision][-label]`.
    pub fn to_normalized_string(&self) -> String {
        let mut out = format!("{}.{}.{}", self.major, self.minor, self.patch);
        if self.revision > 0 {
            out.push_str(&format!(".{}", self.revision));
        }
        if self.is_prerelease() {
            out.push('-');
            out.push_str(&self.release());
        }
        out
    }

    /// Compares only the four numeric components.
    pub fn cmp_numeric(&self, other: &Self) -> Ordering {
        (self.major, self.minor, self.patch, self.revision).cmp(&(
            other.major,
            other.minor,
            other.patch,
            other.revision,
        ))
    }
}

fn is_valid_label<'a>(mut parts: impl Iterator<Item = &'a str>) -> bool {
    parts.all(|part| {
        !part.is_empty()
            && part
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'-')
    })
}

fn compare_labels(left: &[String], right: &[String]) -> Ordering {
    match (left.is_empty(), right.is_empty()) {
        (true, true) => return Ordering::Equal,
        (true, false) => return Ordering::Greater,
        (false, true) => return Ordering::Less,
        (false, false) => {}
    }

    for (l, r) in left.iter().zip(right.iter()) {
        let ordering = match (l.parse::<u64>(), r.parse::<u64>()) {
            (Ok(a), Ok(b)) => a.cmp(&b),
            (Ok(_), Err(_)) => Ordering::Less,
            (Err(_), Ok(_)) => Ordering::Greater,
            (Err(_), Err(_)) => l.to_ascii_lowercase().cmp(&r.to_ascii_lowercase()),
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }

    left.len().cmp(&right.len())
}

impl PartialEq for NuGetVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for NuGetVersion {}

impl PartialOrd for NuGetVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for NuGetVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.cmp_numeric(other)
            .then_with(|| compare_labels(&self.release_labels, &other.release_labels))
    }
}

impl Hash for NuGetVersion {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (self.major, self.minor, self.patch, self.revision).hash(state);
        for label in &self.release_labels {
            match label.parse::<u64>() {
                Ok(n) => n.hash(state),
                Err(_) => label.to_ascii_lowercase().hash(state),
            }
        }
    }
}

impl fmt::Display for NuGetVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.original)
    }
}

impl FromStr for NuGetVersion {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for NuGetVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for NuGetVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::parse(&text).map_err(serde::de::Error::custom)
    }
}
