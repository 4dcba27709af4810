//! Version ranges.
//!
//! Accepted syntax:
//!
//! | Text            | Meaning                 |
//! |-----------------|-------------------------|
//! | `1.0`           | `1.0 <= x`              |
//! | `1.0.*`         | floating, `1.0.0 <= x`  |
//! | `[1.0]`         | `x == 1.0`              |
//! | `(1.0,)`        | `1.0 < x`               |
//! | `[1.0, 2.0)`    | `1.0 <= x < 2.0`        |
//! | `(,2.0]`        | `x <= 2.0`              |
//! | `(, )`          | any version             |

use crate::error::{CoreError, Result};
use crate::float_range::FloatRange;
use crate::version::NuGetVersion;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// An interval of acceptable versions with an optional floating lower bound.
///
/// Equality is structural: two ranges are equal only when both bounds, both
/// inclusivity flags and the float pattern all match. `[1.0, 2.0)` and
/// `[1.0, 1.9.9]` are different ranges even where they accept the same
/// published versions.
///
/// # Examples
///
/// ```
/// use nuget_core::{NuGetVersion, VersionRange};
///
/// let range = VersionRange::parse("[1.1.0, 2.0.1)").unwrap();
/// assert!(range.is_min_inclusive());
/// assert!(!range.is_max_inclusive());
/// assert!(range.satisfies(&NuGetVersion::parse("2.0.0").unwrap()));
/// assert!(!range.satisfies(&NuGetVersion::parse("2.0.1").unwrap()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VersionRange {
    min_version: Option<NuGetVersion>,
    max_version: Option<NuGetVersion>,
    include_min: bool,
    include_max: bool,
    float_range: Option<FloatRange>,
}

impl VersionRange {
    /// Builds a range from its parts, validating bound order.
    ///
    /// A floating range takes its minimum from the float pattern and is
    /// always min-inclusive.
    pub fn new(
        min_version: Option<NuGetVersion>,
        include_min: bool,
        max_version: Option<NuGetVersion>,
        include_max: bool,
        float_range: Option<FloatRange>,
    ) -> Result<Self> {
        let float_range = float_range.filter(FloatRange::is_floating);
        let (min_version, include_min) = match &float_range {
            Some(float) => (Some(float.min_version().clone()), true),
            None => (min_version, include_min),
        };

        let range = Self {
            min_version,
            max_version,
            include_min,
            include_max,
            float_range,
        };
        range.validate_bounds()?;
        Ok(range)
    }

    /// The range accepting every version.
    pub fn all() -> Self {
        Self {
            min_version: None,
            max_version: None,
            include_min: true,
            include_max: true,
            float_range: None,
        }
    }

    /// `[version]`
    pub fn exact(version: NuGetVersion) -> Self {
        Self {
            min_version: Some(version.clone()),
            max_version: Some(version),
            include_min: true,
            include_max: true,
            float_range: None,
        }
    }

    /// `[version, )`
    pub fn at_least(version: NuGetVersion) -> Self {
        Self {
            min_version: Some(version),
            max_version: None,
            include_min: true,
            include_max: false,
            float_range: None,
        }
    }

    /// Parses the interval, bare-version and floating syntaxes.
    pub fn parse(text: &str) -> Result<Self> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(CoreError::invalid_range(text, "empty range"));
        }

        let first = trimmed.as_bytes()[0];
        if first != b'[' && first != b'(' {
            return if trimmed.contains('*') {
                let float = FloatRange::parse(trimmed)?;
                Self::new(None, true, None, false, Some(float))
            } else {
                let min = parse_bound(text, trimmed)?;
                Ok(Self::at_least(min))
            };
        }

        let include_min = first == b'[';
        let include_max = match trimmed.as_bytes()[trimmed.len() - 1] {
            b']' => true,
            b')' => false,
            _ => return Err(CoreError::invalid_range(text, "missing closing bracket")),
        };
        let inner = &trimmed[1..trimmed.len() - 1];
        if inner.contains(['[', ']', '(', ')']) {
            return Err(CoreError::invalid_range(text, "mismatched brackets"));
        }

        let Some((min_text, max_text)) = inner.split_once(',') else {
            if !(include_min && include_max) {
                return Err(CoreError::invalid_range(
                    text,
                    "an exact version must use square brackets",
                ));
            }
            let version = parse_bound(text, inner.trim())?;
            return Ok(Self::exact(version));
        };
        if max_text.contains(',') {
            return Err(CoreError::invalid_range(text, "more than one comma"));
        }

        let (min_text, max_text) = (min_text.trim(), max_text.trim());
        if min_text.is_empty() && max_text.is_empty() {
            return if !include_min && !include_max {
                Ok(Self::all())
            } else {
                Err(CoreError::invalid_range(text, "range has no bounds"))
            };
        }

        let mut float_range = None;
        let mut min_version = None;
        if !min_text.is_empty() {
            if min_text.contains('*') {
                if !include_min {
                    return Err(CoreError::invalid_range(
                        text,
                        "a floating lower bound must be inclusive",
                    ));
                }
                float_range = Some(FloatRange::parse(min_text)?);
            } else {
                min_version = Some(parse_bound(text, min_text)?);
            }
        }

        let max_version = if max_text.is_empty() {
            None
        } else {
            Some(parse_bound(text, max_text)?)
        };

        Self::new(min_version, include_min, max_version, include_max, float_range)
            .map_err(|e| match e {
                CoreError::InvalidVersionRange { message, .. } => {
                    CoreError::invalid_range(text, message)
                }
                other => other,
            })
    }

    fn validate_bounds(&self) -> Result<()> {
        if let (Some(min), Some(max)) = (&self.min_version, &self.max_version) {
            let rendered = self.to_normalized_string();
            if max < min {
                return Err(CoreError::invalid_range(
                    rendered,
                    "upper bound is below lower bound",
                ));
            }
            if max == min && !(self.include_min && self.include_max) {
                return Err(CoreError::invalid_range(rendered, "range is empty"));
            }
        }
        Ok(())
    }

    pub fn min_version(&self) -> Option<&NuGetVersion> {
        self.min_version.as_ref()
    }

    pub fn max_version(&self) -> Option<&NuGetVersion> {
        self.max_version.as_ref()
    }

    pub fn has_lower_bound(&self) -> bool {
        self.min_version.is_some()
    }

    pub fn has_upper_bound(&self) -> bool {
        self.max_version.is_some()
    }

    pub fn is_min_inclusive(&self) -> bool {
        self.include_min
    }

    pub fn is_max_inclusive(&self) -> bool {
        self.include_max
    }

    pub fn is_floating(&self) -> bool {
        self.float_range.is_some()
    }

    pub fn float_range(&self) -> Option<&FloatRange> {
        self.float_range.as_ref()
    }

    /// Returns true if `version` lies inside the range.
    pub fn satisfies(&self, version: &NuGetVersion) -> bool {
        let above_min = match (&self.float_range, &self.min_version) {
            (Some(float), _) => float.satisfies(version),
            (None, Some(min)) if self.include_min => version >= min,
            (None, Some(min)) => version > min,
            (None, None) => true,
        };
        let below_max = match &self.max_version {
            Some(max) if self.include_max => version <= max,
            Some(max) => version < max,
            None => true,
        };
        above_min && below_max
    }

    /// Picks the version a restore would choose from `versions`: the highest
    /// match for a floating range, the lowest match otherwise.
    pub fn find_best_match<'a, I>(&self, versions: I) -> Option<&'a NuGetVersion>
    where
        I: IntoIterator<Item = &'a NuGetVersion>,
    {
        let candidates = versions.into_iter().filter(|v| self.satisfies(v));
        if self.is_floating() {
            candidates.max()
        } else {
            candidates.min()
        }
    }

    /// Renders the bracket form, which parses back to an equal range.
    pub fn to_normalized_string(&self) -> String {
        if let Some(float) = &self.float_range
            && self.max_version.is_none()
        {
            return float.to_string();
        }

        match (&self.min_version, &self.max_version) {
            (None, None) => "(, )".to_string(),
            (Some(min), Some(max)) if min == max && self.include_min && self.include_max => {
                format!("[{}]", min.to_normalized_string())
            }
            (min, max) => {
                let min_text = match (&self.float_range, min) {
                    (Some(float), _) => float.to_string(),
                    (None, Some(min)) => min.to_normalized_string(),
                    (None, None) => String::new(),
                };
                let max_text = max
                    .as_ref()
                    .map(NuGetVersion::to_normalized_string)
                    .unwrap_or_default();
                format!(
                    "{}{}, {}{}",
                    if self.include_min { '[' } else { '(' },
                    min_text,
                    max_text,
                    if self.include_max { ']' } else { ')' },
                )
            }
        }
    }
}

fn parse_bound(range_text: &str, bound: &str) -> Result<NuGetVersion> {
    NuGetVersion::parse(bound).map_err(|e| match e {
        CoreError::InvalidVersion { message, .. } => {
            CoreError::invalid_range(range_text, format!("bound '{}': {}", bound, message))
        }
        other => other,
    })
}

impl fmt::Display for VersionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_normalized_string())
    }
}

impl FromStr for VersionRange {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for VersionRange {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for VersionRange {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::parse(&text).map_err(serde::de::Error::custom)
    }
}
