//! Target framework identities.
//!
//! Parses short monikers (`net45`, `net40-client`, `sl4-wp`,
//! `portable-net45+win8`) and long framework names
//! (`.NETFramework,Version=v4.5,Profile=Client`). Anything else becomes
//! [`FrameworkIdentity::Unsupported`], which keeps the raw text.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Short identifier → long identifier.
const IDENTIFIERS: &[(&str, &str)] = &[
    ("net", ".NETFramework"),
    ("netcore", ".NETCore"),
    ("netmf", ".NETMicroFramework"),
    ("win", "Windows"),
    ("wp", "WindowsPhone"),
    ("wpa", "WindowsPhoneApp"),
    ("sl", "Silverlight"),
    ("uap", "UAP"),
    ("dnx", "DNX"),
    ("dnxcore", "DNXCore"),
    ("aspnet", "ASP.NET"),
    ("aspnetcore", "ASP.NETCore"),
    ("netstandard", ".NETStandard"),
    ("netcoreapp", ".NETCoreApp"),
    ("monoandroid", "MonoAndroid"),
    ("monotouch", "MonoTouch"),
    ("monomac", "MonoMac"),
    ("xamarinios", "Xamarin.iOS"),
    ("portable", ".NETPortable"),
];

/// Short profile → long profile.
const PROFILES: &[(&str, &str)] = &[
    ("client", "Client"),
    ("full", ""),
    ("cf", "CompactFramework"),
    ("wp", "WindowsPhone"),
    ("wp71", "WindowsPhone71"),
];

const ANY_FRAMEWORK: &str = "Any";

static SHORT_FORM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?i)([a-z]+)([0-9]+(?:\.[0-9]+)*)?(?:-([a-z0-9+.]+))?$").unwrap()
});

/// A framework version with up to four components.
///
/// Missing components are zero, so `4.5` and `4.5.0.0` are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FrameworkVersion([u32; 4]);

impl FrameworkVersion {
    pub fn new(major: u32, minor: u32, build: u32, revision: u32) -> Self {
        Self([major, minor, build, revision])
    }

    pub fn major(&self) -> u32 {
        self.0[0]
    }

    pub fn minor(&self) -> u32 {
        self.0[1]
    }

    /// Parses `4.5.1` (dotted) or `451` (one digit per component).
    fn parse_short(digits: &str) -> Option<Self> {
        let mut parts = [0u32; 4];
        if digits.contains('.') {
            let components: Vec<&str> = digits.split('.').collect();
            if components.len() > 4 {
                return None;
            }
            for (slot, component) in parts.iter_mut().zip(components) {
                *slot = component.parse().ok()?;
            }
        } else {
            if digits.len() > 4 {
                return None;
            }
            for (slot, digit) in parts.iter_mut().zip(digits.chars()) {
                *slot = digit.to_digit(10)?;
            }
        }
        Some(Self(parts))
    }

    /// Parses the `v4.5` value of a long-form `Version=` key.
    fn parse_long(text: &str) -> Option<Self> {
        let text = text.strip_prefix(['v', 'V']).unwrap_or(text);
        if text.is_empty() {
            return None;
        }
        let components: Vec<&str> = text.split('.').collect();
        if components.len() > 4 {
            return None;
        }
        let mut parts = [0u32; 4];
        for (slot, component) in parts.iter_mut().zip(components) {
            *slot = component.parse().ok()?;
        }
        Some(Self(parts))
    }

    /// Number of components worth printing, never fewer than `min`.
    fn significant(&self, min: usize) -> usize {
        let mut len = 4;
        while len > min && self.0[len - 1] == 0 {
            len -= 1;
        }
        len
    }

    fn short_string(&self, min: usize) -> String {
        if self.0.iter().all(|p| *p < 10) {
            self.0[..self.significant(min)]
                .iter()
                .map(u32::to_string)
                .collect()
        } else {
            self.0[..self.significant(min.max(2))]
                .iter()
                .map(u32::to_string)
                .collect::<Vec<_>>()
                .join(".")
        }
    }
}

impl fmt::Display for FrameworkVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0[..self.significant(2)]
            .iter()
            .map(u32::to_string)
            .collect();
        f.write_str(&parts.join("."))
    }
}

/// A resolved target framework, or a marker for text that could not be
/// resolved.
///
/// Equality is defined per variant:
///
/// - `Known` identities compare identifier and profile case-insensitively
///   and versions numerically.
/// - `Unsupported` identities compare their raw strings exactly, so two
///   different unparseable strings stay distinct.
/// - `Any` (the "no framework" marker for ungrouped items) equals only
///   itself.
///
/// # Examples
///
/// ```
/// use nuget_core::FrameworkIdentity;
///
/// let net40 = FrameworkIdentity::parse("net40");
/// assert_eq!(net40, FrameworkIdentity::parse(".NETFramework,Version=v4.0"));
/// assert_eq!(net40.to_string(), ".NETFramework,Version=v4.0");
/// assert_ne!(net40, FrameworkIdentity::parse("net40-client"));
///
/// let a = FrameworkIdentity::parse("future51");
/// let b = FrameworkIdentity::parse("future50");
/// assert!(a.is_unsupported() && b.is_unsupported());
/// assert_ne!(a, b);
/// ```
#[derive(Debug, Clone)]
pub enum FrameworkIdentity {
    Known {
        identifier: String,
        version: FrameworkVersion,
        profile: String,
    },
    Unsupported(String),
    Any,
}

impl FrameworkIdentity {
    /// Builds a known identity from a long identifier.
    pub fn known(
        identifier: impl Into<String>,
        version: FrameworkVersion,
        profile: impl Into<String>,
    ) -> Self {
        Self::Known {
            identifier: identifier.into(),
            version,
            profile: profile.into(),
        }
    }

    /// Parses a short moniker or long framework name.
    ///
    /// Empty text and the `any` moniker are [`FrameworkIdentity::Any`].
    /// Unrecognised text is [`FrameworkIdentity::Unsupported`]; parsing
    /// never fails.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Self::Any;
        }

        let parsed = if trimmed.contains(',') {
            parse_long_form(trimmed)
        } else {
            parse_short_form(trimmed)
        };

        parsed.unwrap_or_else(|| {
            tracing::debug!("unsupported target framework '{}'", raw);
            Self::Unsupported(raw.to_string())
        })
    }

    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::Unsupported(_))
    }

    pub fn is_any(&self) -> bool {
        matches!(self, Self::Any)
    }

    pub fn is_known(&self) -> bool {
        matches!(self, Self::Known { .. })
    }

    /// Long identifier of a known framework (`.NETFramework`).
    pub fn identifier(&self) -> Option<&str> {
        match self {
            Self::Known { identifier, .. } => Some(identifier),
            _ => None,
        }
    }

    pub fn version(&self) -> Option<FrameworkVersion> {
        match self {
            Self::Known { version, .. } => Some(*version),
            _ => None,
        }
    }

    pub fn profile(&self) -> Option<&str> {
        match self {
            Self::Known { profile, .. } => Some(profile),
            _ => None,
        }
    }

    /// Exact-match compatibility. Fallback between related frameworks is
    /// left to the dependency resolver.
    pub fn is_compatible_with(&self, candidate: &Self) -> bool {
        self == candidate
    }

    /// The short moniker (`net45`, `net40-client`, `portable-net45+win8`).
    ///
    /// Unsupported identities return their raw text and `Any` returns
    /// `any`.
    pub fn short_folder_name(&self) -> String {
        match self {
            Self::Known {
                identifier,
                version,
                profile,
            } => {
                let short = IDENTIFIERS
                    .iter()
                    .find(|(_, long)| long.eq_ignore_ascii_case(identifier))
                    .map_or_else(|| identifier.to_ascii_lowercase(), |(s, _)| (*s).to_string());

                let mut out = short;
                let is_portable = identifier.eq_ignore_ascii_case(".NETPortable");
                if !(is_portable && *version == FrameworkVersion::default()) {
                    let min = if identifier.eq_ignore_ascii_case(".NETFramework") {
                        2
                    } else {
                        1
                    };
                    out.push_str(&version.short_string(min));
                }
                if !profile.is_empty() {
                    let short_profile = PROFILES
                        .iter()
                        .find(|(_, long)| !long.is_empty() && long.eq_ignore_ascii_case(profile))
                        .map_or_else(|| profile.clone(), |(s, _)| (*s).to_string());
                    out.push('-');
                    out.push_str(&short_profile);
                }
                out
            }
            Self::Unsupported(raw) => raw.clone(),
            Self::Any => "any".to_string(),
        }
    }
}

fn parse_short_form(text: &str) -> Option<FrameworkIdentity> {
    if text.eq_ignore_ascii_case("any") {
        return Some(FrameworkIdentity::Any);
    }

    let captures = SHORT_FORM.captures(text)?;
    let short = captures.get(1)?.as_str().to_ascii_lowercase();
    let (_, identifier) = IDENTIFIERS.iter().find(|(s, _)| *s == short)?;

    let version = match captures.get(2) {
        Some(digits) => FrameworkVersion::parse_short(digits.as_str())?,
        None => FrameworkVersion::default(),
    };

    let profile = captures
        .get(3)
        .map(|p| expand_profile(p.as_str()))
        .unwrap_or_default();

    Some(FrameworkIdentity::known(*identifier, version, profile))
}

fn parse_long_form(text: &str) -> Option<FrameworkIdentity> {
    let mut parts = text.split(',').map(str::trim);
    let name = parts.next()?;

    let mut version = None;
    let mut profile = String::new();
    for part in parts {
        let (key, value) = part.split_once('=')?;
        match key.trim().to_ascii_lowercase().as_str() {
            "version" => version = Some(FrameworkVersion::parse_long(value.trim())?),
            "profile" => profile = expand_profile(value.trim()),
            _ => return None,
        }
    }
    let version = version?;

    if name.eq_ignore_ascii_case(ANY_FRAMEWORK) {
        return Some(FrameworkIdentity::Any);
    }

    let (_, identifier) = IDENTIFIERS
        .iter()
        .find(|(_, long)| long.eq_ignore_ascii_case(name))?;
    Some(FrameworkIdentity::known(*identifier, version, profile))
}

fn expand_profile(profile: &str) -> String {
    PROFILES
        .iter()
        .find(|(short, long)| short.eq_ignore_ascii_case(profile) || long.eq_ignore_ascii_case(profile))
        .map_or_else(|| profile.to_string(), |(_, long)| (*long).to_string())
}

impl PartialEq for FrameworkIdentity {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (
                Self::Known {
                    identifier: a_id,
                    version: a_version,
                    profile: a_profile,
                },
                Self::Known {
                    identifier: b_id,
                    version: b_version,
                    profile: b_profile,
                },
            ) => {
                a_id.eq_ignore_ascii_case(b_id)
                    && a_version == b_version
                    && a_profile.eq_ignore_ascii_case(b_profile)
            }
            (Self::Unsupported(a), Self::Unsupported(b)) => a == b,
            (Self::Any, Self::Any) => true,
            _ => false,
        }
    }
}

impl Eq for FrameworkIdentity {}

impl Hash for FrameworkIdentity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Self::Known {
                identifier,
                version,
                profile,
            } => {
                identifier.to_ascii_lowercase().hash(state);
                version.hash(state);
                profile.to_ascii_lowercase().hash(state);
            }
            Self::Unsupported(raw) => raw.hash(state),
            Self::Any => {}
        }
    }
}

impl fmt::Display for FrameworkIdentity {
    /// Writes the long framework name used as a lock file key.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Known {
                identifier,
                version,
                profile,
            } => {
                write!(f, "{},Version=v{}", identifier, version)?;
                if !profile.is_empty() {
                    write!(f, ",Profile={}", profile)?;
                }
                Ok(())
            }
            Self::Unsupported(raw) => f.write_str(raw),
            Self::Any => write!(f, "{},Version=v0.0", ANY_FRAMEWORK),
        }
    }
}

impl Serialize for FrameworkIdentity {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for FrameworkIdentity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Ok(Self::parse(&text))
    }
}
