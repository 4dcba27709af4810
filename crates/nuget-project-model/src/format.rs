//! `project.lock.json` reading and writing.
//!
//! # Lock File Format
//!
//! ```json
//! {
//!   "locked": false,
//!   "version": 1,
//!   "targets": {
//!     ".NETFramework,Version=v4.5": {
//!       "Newtonsoft.Json/6.0.4": {
//!         "dependencies": { "System.Runtime": "[4.0.0, )" },
//!         "frameworkAssemblies": ["System.Xml"],
//!         "compile": { "lib/net45/Newtonsoft.Json.dll": {} },
//!         "runtime": { "lib/net45/Newtonsoft.Json.dll": {} }
//!       }
//!     },
//!     ".NETFramework,Version=v4.5/win7-x86": {}
//!   },
//!   "libraries": {
//!     "Newtonsoft.Json/6.0.4": { "sha512": "...", "files": ["lib/net45/Newtonsoft.Json.dll"] }
//!   },
//!   "projectFileDependencyGroups": {
//!     "": ["Newtonsoft.Json >= 6.0.4"],
//!     ".NETFramework,Version=v4.5": []
//!   }
//! }
//! ```
//!
//! Object keys keep document order, so writing and reading back yields an
//! equal model.

use crate::error::{ProjectModelError, Result};
use crate::lockfile::{
    LockFile, LockFileLibrary, LockFileTarget, LockFileTargetLibrary, ProjectFileDependencyGroup,
};
use nuget_core::{FrameworkIdentity, LibraryRange, NuGetVersion, VersionRange};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

const FILE_TYPE: &str = "project.lock.json";

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct RawLockFile {
    #[serde(default)]
    locked: bool,
    version: i32,
    #[serde(default)]
    targets: Map<String, Value>,
    #[serde(default)]
    libraries: Map<String, Value>,
    #[serde(default)]
    project_file_dependency_groups: Map<String, Value>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct RawTargetLibrary {
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    dependencies: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    framework_assemblies: Vec<String>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    compile: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    runtime: Map<String, Value>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
struct RawLibrary {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    sha512: Option<String>,
    #[serde(default)]
    files: Vec<String>,
}

/// Parses `project.lock.json` content.
///
/// # Errors
///
/// Returns an error if the content is not JSON, lacks `version`, or has a
/// malformed library key, version or dependency range.
///
/// # Examples
///
/// ```
/// use nuget_project_model::read_lock_file;
///
/// let lock_file = read_lock_file(r#"{
///     "locked": false,
///     "version": 1,
///     "libraries": { "jQuery/1.8.2": { "files": [] } },
///     "projectFileDependencyGroups": { "": ["jQuery >= 1.8.2"] }
/// }"#).unwrap();
///
/// assert_eq!(lock_file.libraries[0].name, "jQuery");
/// assert_eq!(lock_file.project_file_dependency_groups[0].dependencies, vec!["jQuery >= 1.8.2"]);
/// ```
pub fn read_lock_file(content: &str) -> Result<LockFile> {
    let raw: RawLockFile =
        serde_json::from_str(content).map_err(|e| ProjectModelError::json(FILE_TYPE, e))?;

    let targets = raw
        .targets
        .into_iter()
        .map(|(key, body)| read_target(&key, body))
        .collect::<Result<Vec<_>>>()?;

    let libraries = raw
        .libraries
        .into_iter()
        .map(|(key, body)| {
            let (name, version) = split_library_key(&key)?;
            let body: RawLibrary = from_value(body)?;
            Ok(LockFileLibrary {
                name,
                version,
                sha512: body.sha512,
                files: body.files,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let project_file_dependency_groups = raw
        .project_file_dependency_groups
        .into_iter()
        .map(|(framework_name, dependencies)| {
            Ok(ProjectFileDependencyGroup::new(
                framework_name,
                from_value(dependencies)?,
            ))
        })
        .collect::<Result<Vec<_>>>()?;

    tracing::debug!(
        "Parsed {}: version {}, {} targets, {} libraries, {} dependency groups",
        FILE_TYPE,
        raw.version,
        targets.len(),
        libraries.len(),
        project_file_dependency_groups.len()
    );

    Ok(LockFile {
        is_locked: raw.locked,
        version: raw.version,
        project_file_dependency_groups,
        libraries,
        targets,
    })
}

/// Serializes a lock file as pretty-printed JSON.
pub fn write_lock_file(lock_file: &LockFile) -> Result<String> {
    let targets = lock_file
        .targets
        .iter()
        .map(|target| Ok((target_key(target), write_target(target)?)))
        .collect::<Result<Map<_, _>>>()?;

    let libraries = lock_file
        .libraries
        .iter()
        .map(|library| {
            let body = RawLibrary {
                sha512: library.sha512.clone(),
                files: library.files.clone(),
            };
            Ok((
                library_key(&library.name, &library.version),
                to_value(&body)?,
            ))
        })
        .collect::<Result<Map<_, _>>>()?;

    let project_file_dependency_groups = lock_file
        .project_file_dependency_groups
        .iter()
        .map(|group| {
            (
                group.framework_name.clone(),
                Value::from(group.dependencies.clone()),
            )
        })
        .collect();

    let raw = RawLockFile {
        locked: lock_file.is_locked,
        version: lock_file.version,
        targets,
        libraries,
        project_file_dependency_groups,
    };

    serde_json::to_string_pretty(&raw).map_err(|e| ProjectModelError::json(FILE_TYPE, e))
}

fn read_target(key: &str, body: Value) -> Result<LockFileTarget> {
    let (framework, runtime_identifier) = match key.split_once('/') {
        Some((framework, rid)) => (framework, Some(rid)),
        None => (key, None),
    };

    let libraries: Map<String, Value> = from_value(body)?;
    let mut target = LockFileTarget::new(FrameworkIdentity::parse(framework), runtime_identifier);
    target.libraries = libraries
        .into_iter()
        .map(|(key, body)| {
            let (name, version) = split_library_key(&key)?;
            let body: RawTargetLibrary = from_value(body)?;
            let dependencies = body
                .dependencies
                .into_iter()
                .map(|(name, range)| read_dependency(name, range))
                .collect::<Result<Vec<_>>>()?;
            Ok(LockFileTargetLibrary {
                name,
                version,
                dependencies,
                framework_assemblies: body.framework_assemblies,
                compile_time_assemblies: body.compile.into_iter().map(|(path, _)| path).collect(),
                runtime_assemblies: body.runtime.into_iter().map(|(path, _)| path).collect(),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(target)
}

fn read_dependency(name: String, range: Value) -> Result<LibraryRange> {
    let range: String = from_value(range)?;
    let version_range = match range.trim() {
        "" => None,
        text => Some(VersionRange::parse(text).map_err(|source| {
            ProjectModelError::InvalidDependency {
                name: name.clone(),
                source,
            }
        })?),
    };
    Ok(LibraryRange::new(name, version_range)?)
}

fn write_target(target: &LockFileTarget) -> Result<Value> {
    let libraries = target
        .libraries
        .iter()
        .map(|library| {
            let body = RawTargetLibrary {
                dependencies: library
                    .dependencies
                    .iter()
                    .map(|d| {
                        let range = d
                            .version_range()
                            .map(VersionRange::to_normalized_string)
                            .unwrap_or_default();
                        (d.name().to_string(), Value::from(range))
                    })
                    .collect(),
                framework_assemblies: library.framework_assemblies.clone(),
                compile: asset_map(&library.compile_time_assemblies),
                runtime: asset_map(&library.runtime_assemblies),
            };
            Ok((
                library_key(&library.name, &library.version),
                to_value(&body)?,
            ))
        })
        .collect::<Result<Map<_, _>>>()?;

    Ok(Value::Object(libraries))
}

fn asset_map(paths: &[String]) -> Map<String, Value> {
    paths
        .iter()
        .map(|path| (path.clone(), Value::Object(Map::new())))
        .collect()
}

fn target_key(target: &LockFileTarget) -> String {
    match target.runtime_identifier() {
        Some(rid) => format!("{}/{}", target.target_framework, rid),
        None => target.target_framework.to_string(),
    }
}

fn library_key(name: &str, version: &NuGetVersion) -> String {
    format!("{}/{}", name, version)
}

fn split_library_key(key: &str) -> Result<(String, NuGetVersion)> {
    let (name, version) = key.split_once('/').ok_or_else(|| {
        ProjectModelError::invalid_structure(
            FILE_TYPE,
            format!("library key '{}' is not 'name/version'", key),
        )
    })?;
    Ok((name.to_string(), NuGetVersion::parse(version)?))
}

fn from_value<T: serde::de::DeserializeOwned>(value: Value) -> Result<T> {
    serde_json::from_value(value).map_err(|e| ProjectModelError::json(FILE_TYPE, e))
}

fn to_value<T: Serialize>(value: &T) -> Result<Value> {
    serde_json::to_value(value).map_err(|e| ProjectModelError::json(FILE_TYPE, e))
}
