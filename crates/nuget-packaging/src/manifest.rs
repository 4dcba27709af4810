//! Structured package manifest document.
//!
//! The manifest arrives already tokenized: an external reader turns the
//! nuspec XML into this fixed shape, and everything downstream works on
//! typed records rather than querying an open-ended document tree.
//!
//! # Document shape
//!
//! ```json
//! {
//!   "metadata": { "id": "packageA", "version": "1.0.1-alpha", "language": "en-US" },
//!   "elements": [
//!     { "dependencyGroup": { "targetFramework": "net40", "items": [{ "id": "jQuery" }] } },
//!     { "referenceGroup": { "items": [{ "file": "a.dll" }] } },
//!     { "frameworkAssembly": { "assemblyName": "System.Web", "targetFramework": "net40" } }
//!   ]
//! }
//! ```

use crate::error::{ManifestError, Result};
use nuget_core::NuGetVersion;
use serde::{Deserialize, Serialize};

/// Package-level metadata.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestMetadata {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    /// Comma-separated author list, as written in the manifest.
    #[serde(default)]
    pub authors: Option<String>,
    /// Comma-separated owner list, as written in the manifest.
    #[serde(default)]
    pub owners: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub require_license_acceptance: bool,
}

/// A `<dependency>` record.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDependency {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    /// Comma-separated asset types to include.
    #[serde(default)]
    pub include: Option<String>,
    /// Comma-separated asset types to exclude.
    #[serde(default)]
    pub exclude: Option<String>,
}

/// A `<reference>` record.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RawReference {
    #[serde(default)]
    pub file: Option<String>,
}

/// A `<group>` element and the items declared inside it.
///
/// Items declared directly under `<dependencies>` or `<references>` come
/// through as a group without a target framework.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RawGroup<T> {
    #[serde(default)]
    pub target_framework: Option<String>,
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

impl<T> RawGroup<T> {
    pub fn new(target_framework: Option<&str>, items: Vec<T>) -> Self {
        Self {
            target_framework: target_framework.map(str::to_string),
            items,
        }
    }
}

/// A `<frameworkAssembly>` element.
///
/// `target_framework` may list several frameworks separated by commas.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RawFrameworkAssembly {
    #[serde(default)]
    pub assembly_name: Option<String>,
    #[serde(default)]
    pub target_framework: Option<String>,
}

/// One grouping element of the manifest, in document order.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ManifestElement {
    DependencyGroup(RawGroup<RawDependency>),
    ReferenceGroup(RawGroup<RawReference>),
    FrameworkAssembly(RawFrameworkAssembly),
}

/// The manifest document handed over by the external reader.
///
/// # Examples
///
/// ```
/// use nuget_packaging::Manifest;
///
/// let manifest = Manifest::from_json(r#"{
///     "metadata": { "id": "packageA", "version": "1.0.1-alpha", "language": "en-US" },
///     "elements": []
/// }"#).unwrap();
///
/// assert_eq!(manifest.id().unwrap(), "packageA");
/// assert_eq!(manifest.language(), Some("en-US"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    #[serde(default)]
    pub metadata: ManifestMetadata,
    #[serde(default)]
    pub elements: Vec<ManifestElement>,
}

impl Manifest {
    /// Deserializes a manifest document from JSON.
    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|source| ManifestError::JsonParseError { source })
    }

    /// Package id. Missing or blank ids are a format error.
    pub fn id(&self) -> Result<&str> {
        non_empty(self.metadata.id.as_deref()).ok_or_else(|| ManifestError::missing_element("id"))
    }

    /// Package version.
    pub fn version(&self) -> Result<NuGetVersion> {
        let text = non_empty(self.metadata.version.as_deref())
            .ok_or_else(|| ManifestError::missing_element("version"))?;
        NuGetVersion::parse(text).map_err(|source| ManifestError::InvalidPackageVersion { source })
    }

    pub fn title(&self) -> Option<&str> {
        non_empty(self.metadata.title.as_deref())
    }

    pub fn authors(&self) -> Vec<&str> {
        split_list(self.metadata.authors.as_deref())
    }

    pub fn owners(&self) -> Vec<&str> {
        split_list(self.metadata.owners.as_deref())
    }

    pub fn description(&self) -> Option<&str> {
        non_empty(self.metadata.description.as_deref())
    }

    pub fn language(&self) -> Option<&str> {
        non_empty(self.metadata.language.as_deref())
    }

    pub fn require_license_acceptance(&self) -> bool {
        self.metadata.require_license_acceptance
    }

    pub fn dependency_elements(&self) -> impl Iterator<Item = &RawGroup<RawDependency>> {
        self.elements.iter().filter_map(|e| match e {
            ManifestElement::DependencyGroup(group) => Some(group),
            _ => None,
        })
    }

    pub fn reference_elements(&self) -> impl Iterator<Item = &RawGroup<RawReference>> {
        self.elements.iter().filter_map(|e| match e {
            ManifestElement::ReferenceGroup(group) => Some(group),
            _ => None,
        })
    }

    pub fn framework_assembly_elements(&self) -> impl Iterator<Item = &RawFrameworkAssembly> {
        self.elements.iter().filter_map(|e| match e {
            ManifestElement::FrameworkAssembly(assembly) => Some(assembly),
            _ => None,
        })
    }
}

pub(crate) fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

pub(crate) fn split_list(value: Option<&str>) -> Vec<&str> {
    value
        .map(|v| {
            v.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .collect()
        })
        .unwrap_or_default()
}
