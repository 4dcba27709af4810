//! Package manifest support.
//!
//! This crate holds the structured manifest document produced by an
//! external nuspec reader and resolves its dependency, reference and
//! framework assembly elements into groups keyed by target framework.

pub mod error;
pub mod groups;
pub mod manifest;
pub mod types;

pub use error::{ManifestError, Result};
pub use groups::ManifestGroupResolver;
pub use manifest::{
    Manifest, ManifestElement, ManifestMetadata, RawDependency, RawFrameworkAssembly, RawGroup,
    RawReference,
};
pub use types::{
    FrameworkSpecificGroup, PackageDependency, PackageDependencyGroup, ResolvedManifest,
};
