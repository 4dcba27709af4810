//! Core value types for the NuGet metadata workspace.
//!
//! This crate provides the immutable building blocks shared by manifest
//! resolution and lock file validation:
//!
//! - **Versions**: [`NuGetVersion`] with semantic comparison
//! - **Ranges**: [`VersionRange`] and floating [`FloatRange`] patterns
//! - **Frameworks**: [`FrameworkIdentity`], including the `Unsupported`
//!   marker for unparseable framework strings
//! - **Libraries**: [`LibraryRange`] and the canonical lock file string
//!
//! All types are plain values; they can be shared across threads freely.
//!
//! # Examples
//!
//! ```
//! use nuget_core::{FrameworkIdentity, LibraryRange, VersionRange};
//!
//! let range = VersionRange::parse("[1.1.0, 2.0.1)").unwrap();
//! let library = LibraryRange::new("PackageC", Some(range)).unwrap();
//! assert_eq!(library.to_lock_file_string(), "PackageC >= 1.1.0< 2.0.1");
//!
//! let framework = FrameworkIdentity::parse("net45");
//! assert_eq!(framework.to_string(), ".NETFramework,Version=v4.5");
//! ```

pub mod error;
pub mod float_range;
pub mod framework;
pub mod library;
pub mod range;
pub mod version;

pub use error::{CoreError, Result};
pub use float_range::{FloatRange, NuGetVersionFloatBehavior};
pub use framework::{FrameworkIdentity, FrameworkVersion};
pub use library::{
    LibraryDependency, LibraryDependencyType, LibraryRange, runtime_style_range_string,
};
pub use range::VersionRange;
pub use version::NuGetVersion;
