//! Project specifications (`project.json`).
//!
//! A project specification declares the target frameworks a project builds
//! for, the dependencies shared by all of them and the dependencies of each
//! framework.
//!
//! # project.json Format
//!
//! ```json
//! {
//!   "version": "1.0.0",
//!   "dependencies": {
//!     "Newtonsoft.Json": "6.0.4",
//!     "Microsoft.Bcl.Build": { "version": "[1.0, 2.0)", "type": "build" }
//!   },
//!   "frameworks": {
//!     "net45": { "dependencies": { "jQuery": "" } },
//!     "dnxcore50": {}
//!   }
//! }
//! ```

use crate::error::{ProjectModelError, Result};
use nuget_core::{
    FrameworkIdentity, LibraryDependency, LibraryDependencyType, LibraryRange, VersionRange,
};
use serde_json::{Map, Value};

const FILE_TYPE: &str = "project.json";

/// Dependencies declared for one target framework.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetFrameworkInformation {
    pub framework_name: FrameworkIdentity,
    pub dependencies: Vec<LibraryDependency>,
}

impl TargetFrameworkInformation {
    pub fn new(framework_name: FrameworkIdentity, dependencies: Vec<LibraryDependency>) -> Self {
        Self {
            framework_name,
            dependencies,
        }
    }
}

/// A project's declared target frameworks and direct dependencies.
///
/// Target frameworks are unique by identity and keep declaration order.
///
/// # Examples
///
/// ```
/// use nuget_project_model::PackageSpec;
///
/// let spec = PackageSpec::from_json(r#"{
///     "dependencies": { "Newtonsoft.Json": "6.0.4" },
///     "frameworks": { "net45": {}, "dnxcore50": {} }
/// }"#, "MyProject").unwrap();
///
/// assert_eq!(spec.name, "MyProject");
/// assert_eq!(spec.target_frameworks.len(), 2);
/// assert_eq!(spec.dependencies[0].name(), "Newtonsoft.Json");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PackageSpec {
    pub name: String,
    pub version: Option<String>,
    pub dependencies: Vec<LibraryDependency>,
    pub target_frameworks: Vec<TargetFrameworkInformation>,
}

impl PackageSpec {
    /// Builds a specification, rejecting duplicate target frameworks.
    pub fn new(
        name: impl Into<String>,
        dependencies: Vec<LibraryDependency>,
        target_frameworks: Vec<TargetFrameworkInformation>,
    ) -> Result<Self> {
        for (index, framework) in target_frameworks.iter().enumerate() {
            if target_frameworks[..index]
                .iter()
                .any(|earlier| earlier.framework_name == framework.framework_name)
            {
                return Err(ProjectModelError::DuplicateFramework {
                    framework: framework.framework_name.to_string(),
                });
            }
        }

        Ok(Self {
            name: name.into(),
            version: None,
            dependencies,
            target_frameworks,
        })
    }

    /// Reads a specification from `project.json` content.
    pub fn from_json(content: &str, name: &str) -> Result<Self> {
        let root: Value =
            serde_json::from_str(content).map_err(|e| ProjectModelError::json(FILE_TYPE, e))?;
        let root = root
            .as_object()
            .ok_or_else(|| ProjectModelError::invalid_structure(FILE_TYPE, "root is not an object"))?;

        let dependencies = match root.get("dependencies") {
            Some(value) => parse_dependencies(value, "dependencies")?,
            None => Vec::new(),
        };

        let mut target_frameworks = Vec::new();
        if let Some(frameworks) = root.get("frameworks") {
            let frameworks = as_object(frameworks, "frameworks")?;
            for (moniker, body) in frameworks {
                let body = as_object(body, moniker)?;
                let dependencies = match body.get("dependencies") {
                    Some(value) => parse_dependencies(value, moniker)?,
                    None => Vec::new(),
                };
                target_frameworks.push(TargetFrameworkInformation::new(
                    FrameworkIdentity::parse(moniker),
                    dependencies,
                ));
            }
        }

        let mut spec = Self::new(name, dependencies, target_frameworks)?;
        spec.version = root
            .get("version")
            .and_then(Value::as_str)
            .map(str::to_string);

        tracing::debug!(
            "Parsed {} for '{}': {} shared dependencies, {} frameworks",
            FILE_TYPE,
            spec.name,
            spec.dependencies.len(),
            spec.target_frameworks.len()
        );

        Ok(spec)
    }

    /// Finds the declared framework equal to `framework`.
    pub fn get_target_framework(
        &self,
        framework: &FrameworkIdentity,
    ) -> Option<&TargetFrameworkInformation> {
        self.target_frameworks
            .iter()
            .find(|f| &f.framework_name == framework)
    }
}

fn as_object<'a>(value: &'a Value, section: &str) -> Result<&'a Map<String, Value>> {
    value.as_object().ok_or_else(|| {
        ProjectModelError::invalid_structure(FILE_TYPE, format!("'{}' is not an object", section))
    })
}

fn parse_dependencies(value: &Value, section: &str) -> Result<Vec<LibraryDependency>> {
    as_object(value, section)?
        .iter()
        .map(|(name, value)| parse_dependency(name, value))
        .collect()
}

fn parse_dependency(name: &str, value: &Value) -> Result<LibraryDependency> {
    let (version, dependency_type) = match value {
        Value::String(version) => (Some(version.as_str()), None),
        Value::Object(body) => (
            body.get("version").and_then(Value::as_str),
            body.get("type").and_then(Value::as_str),
        ),
        _ => {
            return Err(ProjectModelError::invalid_structure(
                FILE_TYPE,
                format!("dependency '{}' must be a string or an object", name),
            ));
        }
    };

    let invalid = |source| ProjectModelError::InvalidDependency {
        name: name.to_string(),
        source,
    };

    let version_range = version
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(VersionRange::parse)
        .transpose()
        .map_err(invalid)?;

    let library_range = LibraryRange::new(name, version_range).map_err(invalid)?;

    let dependency_type = match dependency_type {
        Some(text) => LibraryDependencyType::parse(text).ok_or_else(|| {
            ProjectModelError::invalid_structure(
                FILE_TYPE,
                format!("dependency '{}' has unknown type '{}'", name, text),
            )
        })?,
        None => LibraryDependencyType::Default,
    };

    Ok(LibraryDependency {
        library_range,
        dependency_type,
    })
}
