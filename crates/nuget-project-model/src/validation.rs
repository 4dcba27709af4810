//! Lock file consistency validation.
//!
//! A lock file is current for a project when it was written by this format
//! version and its recorded dependency groups match what the project
//! declares now. Each group's dependencies are compared as canonical
//! library range strings, independent of order. One mismatching group
//! makes the whole lock file stale.
//!
//! A stale lock file is an expected state, not an error: validation
//! returns a verdict and never fails.

use crate::lockfile::{LOCK_FILE_FORMAT_VERSION, LockFile, ProjectFileDependencyGroup};
use crate::spec::PackageSpec;
use nuget_core::LibraryDependency;
use std::fmt;

/// The first reason a lock file disagrees with a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LockFileMismatch {
    /// The lock file was written by a different format version.
    FormatVersion { expected: i32, actual: i32 },

    /// The lock file does not have one group per framework plus the shared group.
    GroupCount { expected: usize, actual: usize },

    /// A group names a framework the project does not declare.
    UnknownFramework { framework_name: String },

    /// A group's dependencies differ from the project's declaration.
    Dependencies {
        framework_name: String,
        missing: Vec<String>,
        unexpected: Vec<String>,
    },
}

impl fmt::Display for LockFileMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FormatVersion { expected, actual } => {
                write!(f, "lock file version {} (expected {})", actual, expected)
            }
            Self::GroupCount { expected, actual } => {
                write!(
                    f,
                    "lock file has {} dependency groups (expected {})",
                    actual, expected
                )
            }
            Self::UnknownFramework { framework_name } => {
                write!(f, "project does not target '{}'", framework_name)
            }
            Self::Dependencies {
                framework_name,
                missing,
                unexpected,
            } => {
                let group = if framework_name.is_empty() {
                    "shared"
                } else {
                    framework_name.as_str()
                };
                write!(
                    f,
                    "dependencies of {} group changed (missing: [{}], unexpected: [{}])",
                    group,
                    missing.join(", "),
                    unexpected.join(", ")
                )
            }
        }
    }
}

/// Compares lock files against project specifications.
///
/// # Examples
///
/// ```
/// use nuget_project_model::{LockFile, LockFileConsistencyValidator, PackageSpec, ProjectFileDependencyGroup};
///
/// let spec = PackageSpec::from_json(r#"{
///     "dependencies": { "Newtonsoft.Json": "6.0.4" },
///     "frameworks": { "net45": {} }
/// }"#, "App").unwrap();
///
/// let mut lock_file = LockFile::new();
/// lock_file.project_file_dependency_groups = ProjectFileDependencyGroup::from_package_spec(&spec);
///
/// let validator = LockFileConsistencyValidator::new();
/// assert!(validator.is_valid(&lock_file, &spec));
///
/// lock_file.version = 2;
/// assert!(!validator.is_valid(&lock_file, &spec));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockFileConsistencyValidator {
    expected_version: i32,
}

impl Default for LockFileConsistencyValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl LockFileConsistencyValidator {
    /// Creates a validator for the current lock file format version.
    pub fn new() -> Self {
        Self::with_expected_version(LOCK_FILE_FORMAT_VERSION)
    }

    pub fn with_expected_version(expected_version: i32) -> Self {
        Self { expected_version }
    }

    pub fn expected_version(&self) -> i32 {
        self.expected_version
    }

    /// Returns true when `lock_file` is current for `spec`.
    pub fn is_valid(&self, lock_file: &LockFile, spec: &PackageSpec) -> bool {
        self.find_mismatch(lock_file, spec).is_none()
    }

    /// Returns the first reason `lock_file` is stale for `spec`, if any.
    ///
    /// Checks run in a fixed order: format version, group count, then each
    /// group in lock file order.
    pub fn find_mismatch(
        &self,
        lock_file: &LockFile,
        spec: &PackageSpec,
    ) -> Option<LockFileMismatch> {
        if lock_file.version != self.expected_version {
            return Some(LockFileMismatch::FormatVersion {
                expected: self.expected_version,
                actual: lock_file.version,
            });
        }

        let expected_groups = spec.target_frameworks.len() + 1;
        if lock_file.project_file_dependency_groups.len() != expected_groups {
            return Some(LockFileMismatch::GroupCount {
                expected: expected_groups,
                actual: lock_file.project_file_dependency_groups.len(),
            });
        }

        lock_file
            .project_file_dependency_groups
            .iter()
            .find_map(|group| check_group(group, spec))
    }
}

fn check_group(group: &ProjectFileDependencyGroup, spec: &PackageSpec) -> Option<LockFileMismatch> {
    let declared = if group.is_shared() {
        &spec.dependencies
    } else {
        let framework = spec.target_frameworks.iter().find(|f| {
            f.framework_name
                .to_string()
                .eq_ignore_ascii_case(&group.framework_name)
        });
        match framework {
            Some(framework) => &framework.dependencies,
            None => {
                return Some(LockFileMismatch::UnknownFramework {
                    framework_name: group.framework_name.clone(),
                });
            }
        }
    };

    compare_dependencies(&group.framework_name, declared, &group.dependencies)
}

/// Multiset comparison of declared dependencies against recorded strings.
fn compare_dependencies(
    framework_name: &str,
    declared: &[LibraryDependency],
    recorded: &[String],
) -> Option<LockFileMismatch> {
    let mut expected: Vec<String> = declared
        .iter()
        .map(|d| d.library_range.to_lock_file_string())
        .collect();
    let mut actual: Vec<&str> = recorded.iter().map(String::as_str).collect();
    expected.sort_unstable();
    actual.sort_unstable();

    if expected.iter().map(String::as_str).eq(actual.iter().copied()) {
        return None;
    }

    let mut missing = Vec::new();
    let mut unexpected = Vec::new();
    let (mut i, mut j) = (0, 0);
    while i < expected.len() || j < actual.len() {
        match (expected.get(i), actual.get(j)) {
            (Some(e), Some(a)) if e.as_str() == *a => {
                i += 1;
                j += 1;
            }
            (Some(e), Some(a)) if e.as_str() < *a => {
                missing.push(e.clone());
                i += 1;
            }
            (Some(e), None) => {
                missing.push(e.clone());
                i += 1;
            }
            (_, Some(a)) => {
                unexpected.push((*a).to_string());
                j += 1;
            }
            (None, None) => break,
        }
    }

    Some(LockFileMismatch::Dependencies {
        framework_name: framework_name.to_string(),
        missing,
        unexpected,
    })
}

impl LockFile {
    /// Returns the first reason this lock file is stale for `spec`, if any.
    pub fn staleness(&self, spec: &PackageSpec) -> Option<LockFileMismatch> {
        let mismatch = LockFileConsistencyValidator::new().find_mismatch(self, spec);
        if let Some(reason) = &mismatch {
            tracing::debug!("Lock file is stale for '{}': {}", spec.name, reason);
        }
        mismatch
    }

    /// Returns true when this lock file is current for `spec`.
    pub fn is_valid_for_package_spec(&self, spec: &PackageSpec) -> bool {
        self.staleness(spec).is_none()
    }
}
