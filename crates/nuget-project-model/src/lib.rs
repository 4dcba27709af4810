//! Project specifications, lock files and lock file validation.
//!
//! A project declares its target frameworks and dependencies in a
//! [`PackageSpec`]. A restore records what it resolved in a [`LockFile`],
//! including a copy of the declared dependencies rendered as canonical
//! library range strings. [`LockFileConsistencyValidator`] compares the two
//! to decide whether the lock file can still be trusted.
//!
//! # Examples
//!
//! ```
//! use nuget_project_model::{PackageSpec, read_lock_file};
//!
//! let spec = PackageSpec::from_json(r#"{
//!     "dependencies": { "jQuery": "[1.8, 2.0)" },
//!     "frameworks": { "net45": {} }
//! }"#, "App").unwrap();
//!
//! let lock_file = read_lock_file(r#"{
//!     "locked": false,
//!     "version": 1,
//!     "projectFileDependencyGroups": {
//!         "": ["jQuery >= 1.8< 2.0"],
//!         ".NETFramework,Version=v4.5": []
//!     }
//! }"#).unwrap();
//!
//! assert!(lock_file.is_valid_for_package_spec(&spec));
//! ```

pub mod error;
pub mod format;
pub mod lockfile;
pub mod spec;
pub mod validation;

pub use error::{ProjectModelError, Result};
pub use format::{read_lock_file, write_lock_file};
pub use lockfile::{
    LOCK_FILE_FORMAT_VERSION, LockFile, LockFileLibrary, LockFileTarget, LockFileTargetLibrary,
    ProjectFileDependencyGroup,
};
pub use spec::{PackageSpec, TargetFrameworkInformation};
pub use validation::{LockFileConsistencyValidator, LockFileMismatch};
