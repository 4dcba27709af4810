use nuget_core::{CoreError, FrameworkIdentity, LibraryRange, VersionRange};
use serde::Serialize;

/// A package dependency declared in a manifest.
///
/// # Examples
///
/// ```
/// use nuget_core::VersionRange;
/// use nuget_packaging::PackageDependency;
///
/// let dep = PackageDependency {
///     id: "PackageC".into(),
///     version_range: Some(VersionRange::parse("[1.1.0, 2.0.1)").unwrap()),
///     include: vec![],
///     exclude: vec![],
/// };
///
/// assert_eq!(dep.to_library_range().unwrap().to_lock_file_string(), "PackageC >= 1.1.0< 2.0.1");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PackageDependency {
    pub id: String,
    pub version_range: Option<VersionRange>,
    pub include: Vec<String>,
    pub exclude: Vec<String>,
}

impl PackageDependency {
    pub fn to_library_range(&self) -> Result<LibraryRange, CoreError> {
        LibraryRange::new(self.id.clone(), self.version_range.clone())
    }
}

/// Dependencies that apply to one target framework.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PackageDependencyGroup {
    pub target_framework: FrameworkIdentity,
    pub packages: Vec<PackageDependency>,
}

/// Named items (reference files or framework assemblies) that apply to one
/// target framework.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameworkSpecificGroup {
    pub target_framework: FrameworkIdentity,
    pub items: Vec<String>,
}

/// All groups of a manifest, one ordered list per group kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedManifest {
    pub dependency_groups: Vec<PackageDependencyGroup>,
    pub reference_groups: Vec<FrameworkSpecificGroup>,
    pub framework_reference_groups: Vec<FrameworkSpecificGroup>,
}
