//! Floating version patterns (`1.0.*`, `1.0.0-beta*`, `*`).

use crate::error::{CoreError, Result};
use crate::version::NuGetVersion;
use std::fmt;

/// Which trailing part of a version floats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NuGetVersionFloatBehavior {
    /// Nothing floats; the pattern is a plain version.
    None,
    /// `1.0.0-beta*`: the release label floats after a fixed prefix.
    Prerelease,
    /// `1.0.0.*`
    Revision,
    /// `1.0.*`
    Patch,
    /// `1.*`
    Minor,
    /// `*`
    Major,
}

/// A floating lower bound.
///
/// The minimum version is derived from the pattern by substituting `0` for
/// the wildcard, so `1.0.*` has a minimum of `1.0.0` and `1.0.0-beta.*` a
/// minimum of `1.0.0-beta.0`.
///
/// # Examples
///
/// ```
/// use nuget_core::{FloatRange, NuGetVersion, NuGetVersionFloatBehavior};
///
/// let range = FloatRange::parse("1.2.*").unwrap();
/// assert_eq!(range.behavior(), NuGetVersionFloatBehavior::Patch);
/// assert_eq!(range.min_version(), &NuGetVersion::new(1, 2, 0));
/// assert_eq!(range.to_string(), "1.2.*");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FloatRange {
    behavior: NuGetVersionFloatBehavior,
    min_version: NuGetVersion,
    release_prefix: String,
}

impl FloatRange {
    /// Parses a floating pattern. Text without a `*` is a non-floating
    /// range over exactly that version.
    pub fn parse(text: &str) -> Result<Self> {
        let trimmed = text.trim();
        let invalid = |message: &str| CoreError::invalid_range(text, message);

        if trimmed == "*" {
            return Ok(Self {
                behavior: NuGetVersionFloatBehavior::Major,
                min_version: NuGetVersion::new(0, 0, 0),
                release_prefix: String::new(),
            });
        }

        let Some(pattern) = trimmed.strip_suffix('*') else {
            let min_version = NuGetVersion::parse(trimmed)?;
            return Ok(Self {
                behavior: NuGetVersionFloatBehavior::None,
                min_version,
                release_prefix: String::new(),
            });
        };

        if pattern.contains('*') {
            return Err(invalid("only the last component may float"));
        }

        if let Some((numeric, prefix)) = pattern.split_once('-') {
            // A prefix ending in a separator still needs a label to parse.
            let label = if prefix.is_empty() || prefix.ends_with('.') || prefix.ends_with('-') {
                format!("{}0", prefix)
            } else {
                prefix.to_string()
            };
            let min_version = NuGetVersion::parse(&format!("{}-{}", numeric, label))
                .map_err(|_| invalid("malformed prerelease float"))?;
            return Ok(Self {
                behavior: NuGetVersionFloatBehavior::Prerelease,
                min_version,
                release_prefix: prefix.to_string(),
            });
        }

        let Some(fixed) = pattern.strip_suffix('.') else {
            return Err(invalid("wildcard must replace a whole component"));
        };

        let behavior = match fixed.split('.').count() {
            1 => NuGetVersionFloatBehavior::Minor,
            2 => NuGetVersionFloatBehavior::Patch,
            3 => NuGetVersionFloatBehavior::Revision,
            _ => return Err(invalid("too many fixed components before wildcard")),
        };

        let min_version = NuGetVersion::parse(&format!("{}.0", fixed))
            .map_err(|_| invalid("non-numeric fixed component"))?;

        Ok(Self {
            behavior,
            min_version,
            release_prefix: String::new(),
        })
    }

    pub fn behavior(&self) -> NuGetVersionFloatBehavior {
        self.behavior
    }

    pub fn min_version(&self) -> &NuGetVersion {
        &self.min_version
    }

    /// Release label prefix for prerelease floats (`beta` for `1.0.0-beta*`).
    pub fn release_prefix(&self) -> &str {
        &self.release_prefix
    }

    pub fn is_floating(&self) -> bool {
        self.behavior != NuGetVersionFloatBehavior::None
    }

    /// Returns true if `version` is one this pattern would float to.
    pub fn satisfies(&self, version: &NuGetVersion) -> bool {
        let min = &self.min_version;
        match self.behavior {
            NuGetVersionFloatBehavior::None => version == min,
            NuGetVersionFloatBehavior::Prerelease => {
                version.cmp_numeric(min).is_eq()
                    && version >= min
                    && (!version.is_prerelease()
                        || version
                            .release()
                            .to_ascii_lowercase()
                            .starts_with(&self.release_prefix.to_ascii_lowercase()))
            }
            NuGetVersionFloatBehavior::Revision => {
                !version.is_prerelease()
                    && (version.major(), version.minor(), version.patch())
                        == (min.major(), min.minor(), min.patch())
            }
            NuGetVersionFloatBehavior::Patch => {
                !version.is_prerelease()
                    && (version.major(), version.minor()) == (min.major(), min.minor())
            }
            NuGetVersionFloatBehavior::Minor => {
                !version.is_prerelease() && version.major() == min.major()
            }
            NuGetVersionFloatBehavior::Major => !version.is_prerelease(),
        }
    }
}

impl fmt::Display for FloatRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let min = &self.min_version;
        match self.behavior {
            NuGetVersionFloatBehavior::None => write!(f, "{}", min),
            NuGetVersionFloatBehavior::Prerelease => {
                write!(f, "{}-{}*", min.numeric_string(), self.release_prefix)
            }
            NuGetVersionFloatBehavior::Revision => {
                write!(f, "{}.{}.{}.*", min.major(), min.minor(), min.patch())
            }
            NuGetVersionFloatBehavior::Patch => write!(f, "{}.{}.*", min.major(), min.minor()),
            NuGetVersionFloatBehavior::Minor => write!(f, "{}.*", min.major()),
            NuGetVersionFloatBehavior::Major => f.write_str("*"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(text: &str) -> NuGetVersion {
        NuGetVersion::parse(text).unwrap()
    }

    #[test]
    fn test_parse_behaviors() {
        let cases = [
            ("*", NuGetVersionFloatBehavior::Major, "0.0.0"),
            ("2.*", NuGetVersionFloatBehavior::Minor, "2.0.0"),
            ("2.1.*", NuGetVersionFloatBehavior::Patch, "2.1.0"),
            ("2.1.3.*", NuGetVersionFloatBehavior::Revision, "2.1.3"),
            ("2.1.3-beta*", NuGetVersionFloatBehavior::Prerelease, "2.1.3-beta"),
            ("2.1.3-*", NuGetVersionFloatBehavior::Prerelease, "2.1.3-0"),
            ("2.1.3", NuGetVersionFloatBehavior::None, "2.1.3"),
        ];
        for (text, behavior, min) in cases {
            let range = FloatRange::parse(text).unwrap();
            assert_eq!(range.behavior(), behavior, "{text}");
            assert_eq!(range.min_version(), &v(min), "{text}");
        }
    }

    #[test]
    fn test_display_reproduces_pattern() {
        for text in ["*", "2.*", "2.1.*", "2.1.3.*", "2.1.3-beta*", "2.1.3-beta.*", "2.1.3-*"] {
            assert_eq!(FloatRange::parse(text).unwrap().to_string(), text);
        }
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for text in ["1.*.0", "1*", "1.2.3.4.*", "a.*", "**"] {
            assert!(FloatRange::parse(text).is_err(), "accepted {text:?}");
        }
    }

    #[test]
    fn test_satisfies_patch_float() {
        let range = FloatRange::parse("1.2.*").unwrap();
        assert!(range.satisfies(&v("1.2.0")));
        assert!(range.satisfies(&v("1.2.9")));
        assert!(!range.satisfies(&v("1.3.0")));
        assert!(!range.satisfies(&v("1.2.5-beta")));
    }

    #[test]
    fn test_satisfies_prerelease_float() {
        let range = FloatRange::parse("1.0.0-beta*").unwrap();
        assert!(range.satisfies(&v("1.0.0-beta")));
        assert!(range.satisfies(&v("1.0.0-beta2")));
        assert!(range.satisfies(&v("1.0.0")));
        assert!(!range.satisfies(&v("1.0.0-alpha")));
        assert!(!range.satisfies(&v("1.0.1-beta")));
    }

    #[test]
    fn test_satisfies_major_float() {
        let range = FloatRange::parse("*").unwrap();
        assert!(range.satisfies(&v("99.0")));
        assert!(!range.satisfies(&v("1.0-rc")));
    }
}
