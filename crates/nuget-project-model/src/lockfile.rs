//! Lock file model.
//!
//! A lock file records what a restore resolved: the dependency groups the
//! project declared at the time, every library that was resolved and, per
//! target framework and runtime identifier, the libraries that apply.

use crate::spec::PackageSpec;
use nuget_core::{FrameworkIdentity, LibraryRange, NuGetVersion};

/// The lock file format version this crate reads and writes.
///
/// A lock file with any other version is stale and must be regenerated.
pub const LOCK_FILE_FORMAT_VERSION: i32 = 1;

/// One row of the lock file's declared-dependency list.
///
/// An empty `framework_name` holds the dependencies shared by all
/// frameworks. Dependencies are canonical library range strings
/// (`"Name >= 1.0< 2.0"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectFileDependencyGroup {
    pub framework_name: String,
    pub dependencies: Vec<String>,
}

impl ProjectFileDependencyGroup {
    pub fn new(framework_name: impl Into<String>, dependencies: Vec<String>) -> Self {
        Self {
            framework_name: framework_name.into(),
            dependencies,
        }
    }

    /// Returns true for the group shared by all frameworks.
    pub fn is_shared(&self) -> bool {
        self.framework_name.is_empty()
    }

    /// Builds the groups a restore records for `spec`: the shared group
    /// first, then one group per declared framework.
    pub fn from_package_spec(spec: &PackageSpec) -> Vec<Self> {
        let render = |deps: &[nuget_core::LibraryDependency]| -> Vec<String> {
            deps.iter()
                .map(|d| d.library_range.to_lock_file_string())
                .collect()
        };

        std::iter::once(Self::new("", render(&spec.dependencies)))
            .chain(spec.target_frameworks.iter().map(|f| {
                Self::new(f.framework_name.to_string(), render(&f.dependencies))
            }))
            .collect()
    }
}

/// A resolved package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockFileLibrary {
    pub name: String,
    pub version: NuGetVersion,
    pub sha512: Option<String>,
    pub files: Vec<String>,
}

impl LockFileLibrary {
    pub fn new(name: impl Into<String>, version: NuGetVersion) -> Self {
        Self {
            name: name.into(),
            version,
            sha512: None,
            files: Vec::new(),
        }
    }
}

/// A resolved package as it applies to one target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockFileTargetLibrary {
    pub name: String,
    pub version: NuGetVersion,
    pub dependencies: Vec<LibraryRange>,
    pub framework_assemblies: Vec<String>,
    pub compile_time_assemblies: Vec<String>,
    pub runtime_assemblies: Vec<String>,
}

impl LockFileTargetLibrary {
    pub fn new(name: impl Into<String>, version: NuGetVersion) -> Self {
        Self {
            name: name.into(),
            version,
            dependencies: Vec::new(),
            framework_assemblies: Vec::new(),
            compile_time_assemblies: Vec::new(),
            runtime_assemblies: Vec::new(),
        }
    }
}

/// Resolution result for one (framework, runtime identifier) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct LockFileTarget {
    pub target_framework: FrameworkIdentity,
    pub runtime_identifier: Option<String>,
    pub libraries: Vec<LockFileTargetLibrary>,
}

impl LockFileTarget {
    pub fn new(target_framework: FrameworkIdentity, runtime_identifier: Option<&str>) -> Self {
        Self {
            target_framework,
            runtime_identifier: runtime_identifier.map(str::to_string),
            libraries: Vec::new(),
        }
    }

    /// Runtime identifier with an empty string treated as absent.
    pub fn runtime_identifier(&self) -> Option<&str> {
        self.runtime_identifier.as_deref().filter(|r| !r.is_empty())
    }

    fn matches(&self, framework: &FrameworkIdentity, runtime_identifier: Option<&str>) -> bool {
        if &self.target_framework != framework {
            return false;
        }
        match (
            runtime_identifier.filter(|r| !r.is_empty()),
            self.runtime_identifier(),
        ) {
            (None, None) => true,
            (Some(wanted), Some(actual)) => wanted.eq_ignore_ascii_case(actual),
            _ => false,
        }
    }
}

/// The lock file document.
///
/// # Examples
///
/// ```
/// use nuget_core::{FrameworkIdentity, NuGetVersion};
/// use nuget_project_model::{LockFile, LockFileLibrary, LockFileTarget};
///
/// let mut lock_file = LockFile::new();
/// lock_file.targets.push(LockFileTarget::new(FrameworkIdentity::parse("net45"), Some("win7-x86")));
/// lock_file
///     .libraries
///     .push(LockFileLibrary::new("Newtonsoft.Json", NuGetVersion::parse("6.0.4").unwrap()));
///
/// let net45 = FrameworkIdentity::parse("net45");
/// assert!(lock_file.get_target(&net45, Some("WIN7-X86")).is_some());
/// assert!(lock_file.get_target(&net45, None).is_none());
/// assert!(lock_file
///     .get_library("Newtonsoft.Json", &NuGetVersion::parse("6.0.4.0").unwrap())
///     .is_some());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LockFile {
    pub is_locked: bool,
    pub version: i32,
    pub project_file_dependency_groups: Vec<ProjectFileDependencyGroup>,
    pub libraries: Vec<LockFileLibrary>,
    pub targets: Vec<LockFileTarget>,
}

impl Default for LockFile {
    fn default() -> Self {
        Self::new()
    }
}

impl LockFile {
    /// Creates an empty, unlocked lock file at the current format version.
    pub fn new() -> Self {
        Self {
            is_locked: false,
            version: LOCK_FILE_FORMAT_VERSION,
            project_file_dependency_groups: Vec::new(),
            libraries: Vec::new(),
            targets: Vec::new(),
        }
    }

    /// Finds the first target for `framework` and `runtime_identifier`.
    ///
    /// Runtime identifiers compare case-insensitively; `None` and `""`
    /// both mean "no runtime identifier".
    pub fn get_target(
        &self,
        framework: &FrameworkIdentity,
        runtime_identifier: Option<&str>,
    ) -> Option<&LockFileTarget> {
        self.targets
            .iter()
            .find(|t| t.matches(framework, runtime_identifier))
    }

    /// Finds the first library with exactly `name` and an equal `version`.
    pub fn get_library(&self, name: &str, version: &NuGetVersion) -> Option<&LockFileLibrary> {
        self.libraries
            .iter()
            .find(|l| l.name == name && &l.version == version)
    }

    /// Returns the shared dependency group, if recorded.
    pub fn shared_dependency_group(&self) -> Option<&ProjectFileDependencyGroup> {
        self.project_file_dependency_groups
            .iter()
            .find(|g| g.is_shared())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::PackageSpec;

    fn v(text: &str) -> NuGetVersion {
        NuGetVersion::parse(text).unwrap()
    }

    fn lock_with_targets() -> LockFile {
        let mut lock_file = LockFile::new();
        lock_file.targets = vec![
            LockFileTarget::new(FrameworkIdentity::parse("net45"), None),
            LockFileTarget::new(FrameworkIdentity::parse("net45"), Some("win7-x86")),
            LockFileTarget::new(FrameworkIdentity::parse("net45"), Some("WIN7-X86")),
            LockFileTarget::new(FrameworkIdentity::parse("dnxcore50"), Some("")),
        ];
        lock_file
    }

    #[test]
    fn test_new_uses_current_format_version() {
        assert_eq!(LockFile::new().version, LOCK_FILE_FORMAT_VERSION);
        assert_eq!(LockFile::default(), LockFile::new());
    }

    #[test]
    fn test_get_target_without_rid() {
        let lock_file = lock_with_targets();
        let target = lock_file
            .get_target(&FrameworkIdentity::parse("net45"), None)
            .unwrap();
        assert_eq!(target.runtime_identifier(), None);
    }

    #[test]
    fn test_get_target_rid_case_insensitive_first_match() {
        let lock_file = lock_with_targets();
        let target = lock_file
            .get_target(&FrameworkIdentity::parse("net45"), Some("Win7-X86"))
            .unwrap();
        assert_eq!(target.runtime_identifier(), Some("win7-x86"));
    }

    #[test]
    fn test_get_target_empty_and_none_rid_equivalent() {
        let lock_file = lock_with_targets();
        let dnx = FrameworkIdentity::parse("dnxcore50");
        assert!(lock_file.get_target(&dnx, None).is_some());
        assert!(lock_file.get_target(&dnx, Some("")).is_some());
        assert!(
            lock_file
                .get_target(&FrameworkIdentity::parse("net45"), Some(""))
                .is_some()
        );
    }

    #[test]
    fn test_get_target_miss() {
        let lock_file = lock_with_targets();
        assert!(
            lock_file
                .get_target(&FrameworkIdentity::parse("net40"), None)
                .is_none()
        );
        assert!(
            lock_file
                .get_target(&FrameworkIdentity::parse("dnxcore50"), Some("win7-x86"))
                .is_none()
        );
    }

    #[test]
    fn test_get_library() {
        let mut lock_file = LockFile::new();
        lock_file.libraries = vec![
            LockFileLibrary::new("jQuery", v("1.8.2")),
            LockFileLibrary::new("jQuery", v("2.0.0")),
        ];
        assert_eq!(
            lock_file.get_library("jQuery", &v("2.0")).map(|l| &l.version),
            Some(&v("2.0.0"))
        );
        assert!(lock_file.get_library("jquery", &v("2.0.0")).is_none());
        assert!(lock_file.get_library("jQuery", &v("3.0.0")).is_none());
    }

    #[test]
    fn test_groups_from_package_spec() {
        let spec = PackageSpec::from_json(
            r#"{
                "dependencies": { "Newtonsoft.Json": "6.0.4" },
                "frameworks": { "net45": { "dependencies": { "jQuery": "[1.8, 2.0)" } }, "dnxcore50": {} }
            }"#,
            "App",
        )
        .unwrap();

        let groups = ProjectFileDependencyGroup::from_package_spec(&spec);

        assert_eq!(
            groups,
            vec![
                ProjectFileDependencyGroup::new("", vec!["Newtonsoft.Json >= 6.0.4".into()]),
                ProjectFileDependencyGroup::new(
                    ".NETFramework,Version=v4.5",
                    vec!["jQuery >= 1.8< 2.0".into()]
                ),
                ProjectFileDependencyGroup::new("DNXCore,Version=v5.0", vec![]),
            ]
        );
        assert!(groups[0].is_shared());
    }

    #[test]
    fn test_shared_dependency_group() {
        let mut lock_file = LockFile::new();
        assert!(lock_file.shared_dependency_group().is_none());
        lock_file.project_file_dependency_groups = vec![
            ProjectFileDependencyGroup::new(".NETFramework,Version=v4.5", vec![]),
            ProjectFileDependencyGroup::new("", vec!["A ".into()]),
        ];
        assert_eq!(
            lock_file.shared_dependency_group().map(|g| g.dependencies.len()),
            Some(1)
        );
    }
}
