//! Target-framework group resolution.
//!
//! Turns the grouping elements of a [`Manifest`] into ordered lists of
//! groups keyed by [`FrameworkIdentity`]:
//!
//! - Groups whose framework resolves to the same recognised identity are
//!   merged. Items are de-duplicated by name, case-insensitively; a later
//!   occurrence replaces the earlier one in place.
//! - Groups whose framework is unsupported are never merged, even with a
//!   group carrying the same raw text.
//! - Groups without items are kept.
//! - A missing or empty framework attribute is the "no framework" group.
//! - Framework assembly elements may name several frameworks separated by
//!   commas; the assembly is added under each of them. Framework assembly
//!   groups are sorted by name, the other kinds keep first-seen order.
//!
//! Output groups appear in the order their framework was first seen.

use crate::error::{ManifestError, Result};
use crate::manifest::{Manifest, RawDependency, non_empty, split_list};
use crate::types::{
    FrameworkSpecificGroup, PackageDependency, PackageDependencyGroup, ResolvedManifest,
};
use nuget_core::{FrameworkIdentity, VersionRange};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Resolves manifest grouping elements into framework-keyed groups.
///
/// # Examples
///
/// ```
/// use nuget_core::FrameworkIdentity;
/// use nuget_packaging::{Manifest, ManifestGroupResolver};
///
/// let manifest = Manifest::from_json(r#"{
///     "elements": [
///         { "frameworkAssembly": { "assemblyName": "System.Web", "targetFramework": "net40" } },
///         { "frameworkAssembly": { "assemblyName": "System.Net", "targetFramework": "net40-client, net40" } }
///     ]
/// }"#).unwrap();
///
/// let groups = ManifestGroupResolver::new().framework_reference_groups(&manifest).unwrap();
/// assert_eq!(groups.len(), 2);
/// assert_eq!(groups[0].target_framework, FrameworkIdentity::parse("net40"));
/// assert_eq!(groups[0].items, vec!["System.Net", "System.Web"]);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ManifestGroupResolver;

impl ManifestGroupResolver {
    pub fn new() -> Self {
        Self
    }

    /// Resolves all three group kinds.
    pub fn resolve(&self, manifest: &Manifest) -> Result<ResolvedManifest> {
        let resolved = ResolvedManifest {
            dependency_groups: self.dependency_groups(manifest)?,
            reference_groups: self.reference_groups(manifest)?,
            framework_reference_groups: self.framework_reference_groups(manifest)?,
        };

        tracing::debug!(
            "Resolved manifest groups: {} dependency, {} reference, {} framework assembly",
            resolved.dependency_groups.len(),
            resolved.reference_groups.len(),
            resolved.framework_reference_groups.len()
        );

        Ok(resolved)
    }

    pub fn dependency_groups(&self, manifest: &Manifest) -> Result<Vec<PackageDependencyGroup>> {
        let mut groups = GroupAccumulator::new();

        for element in manifest.dependency_elements() {
            let framework = parse_framework(element.target_framework.as_deref());
            let slot = groups.slot(framework);
            for raw in &element.items {
                let dependency = to_package_dependency(raw)?;
                merge_item(slot, dependency, |d| d.id.as_str());
            }
        }

        Ok(groups
            .into_groups()
            .map(|(target_framework, packages)| PackageDependencyGroup {
                target_framework,
                packages,
            })
            .collect())
    }

    pub fn reference_groups(&self, manifest: &Manifest) -> Result<Vec<FrameworkSpecificGroup>> {
        let mut groups = GroupAccumulator::new();

        for element in manifest.reference_elements() {
            let framework = parse_framework(element.target_framework.as_deref());
            let slot = groups.slot(framework);
            for raw in &element.items {
                let file = non_empty(raw.file.as_deref())
                    .ok_or_else(|| ManifestError::missing_attribute("reference", "file"))?;
                merge_item(slot, file.to_string(), String::as_str);
            }
        }

        Ok(groups
            .into_groups()
            .map(|(target_framework, items)| FrameworkSpecificGroup {
                target_framework,
                items,
            })
            .collect())
    }

    pub fn framework_reference_groups(
        &self,
        manifest: &Manifest,
    ) -> Result<Vec<FrameworkSpecificGroup>> {
        let mut groups = GroupAccumulator::new();

        for element in manifest.framework_assembly_elements() {
            let name = non_empty(element.assembly_name.as_deref()).ok_or_else(|| {
                ManifestError::missing_attribute("frameworkAssembly", "assemblyName")
            })?;

            let frameworks = split_list(element.target_framework.as_deref());
            if frameworks.is_empty() {
                let slot = groups.slot(FrameworkIdentity::Any);
                merge_item(slot, name.to_string(), String::as_str);
                continue;
            }
            for framework in frameworks {
                let slot = groups.slot(FrameworkIdentity::parse(framework));
                merge_item(slot, name.to_string(), String::as_str);
            }
        }

        Ok(groups
            .into_groups()
            .map(|(target_framework, mut items)| {
                items.sort_by(|a, b| compare_names(a, b));
                FrameworkSpecificGroup {
                    target_framework,
                    items,
                }
            })
            .collect())
    }
}

/// Ordered groups with a lookup for recognised frameworks.
///
/// Unsupported frameworks never enter the lookup, so each of them gets a
/// slot of its own.
struct GroupAccumulator<T> {
    groups: Vec<(FrameworkIdentity, Vec<T>)>,
    recognized: HashMap<FrameworkIdentity, usize>,
}

impl<T> GroupAccumulator<T> {
    fn new() -> Self {
        Self {
            groups: Vec::new(),
            recognized: HashMap::new(),
        }
    }

    fn slot(&mut self, framework: FrameworkIdentity) -> &mut Vec<T> {
        let index = match self.recognized.get(&framework) {
            Some(&index) => {
                tracing::trace!("Merging group into existing '{}'", framework);
                index
            }
            None => {
                let index = self.groups.len();
                if !framework.is_unsupported() {
                    self.recognized.insert(framework.clone(), index);
                }
                self.groups.push((framework, Vec::new()));
                index
            }
        };
        &mut self.groups[index].1
    }

    fn into_groups(self) -> impl Iterator<Item = (FrameworkIdentity, Vec<T>)> {
        self.groups.into_iter()
    }
}

fn merge_item<T>(items: &mut Vec<T>, item: T, name: impl Fn(&T) -> &str) {
    match items
        .iter_mut()
        .find(|existing| name(existing).eq_ignore_ascii_case(name(&item)))
    {
        Some(existing) => *existing = item,
        None => items.push(item),
    }
}

fn parse_framework(raw: Option<&str>) -> FrameworkIdentity {
    raw.map_or(FrameworkIdentity::Any, FrameworkIdentity::parse)
}

fn to_package_dependency(raw: &RawDependency) -> Result<PackageDependency> {
    let id = non_empty(raw.id.as_deref())
        .ok_or_else(|| ManifestError::missing_attribute("dependency", "id"))?;

    let version_range = non_empty(raw.version.as_deref())
        .map(VersionRange::parse)
        .transpose()
        .map_err(|source| ManifestError::InvalidDependencyVersion {
            id: id.to_string(),
            source,
        })?;

    Ok(PackageDependency {
        id: id.to_string(),
        version_range,
        include: to_owned_list(raw.include.as_deref()),
        exclude: to_owned_list(raw.exclude.as_deref()),
    })
}

fn to_owned_list(value: Option<&str>) -> Vec<String> {
    split_list(value).into_iter().map(str::to_string).collect()
}

fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_ascii_lowercase()
        .cmp(&b.to_ascii_lowercase())
        .then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::{ManifestElement, RawFrameworkAssembly, RawGroup, RawReference};
    use insta::assert_json_snapshot;

    fn fw(text: &str) -> FrameworkIdentity {
        FrameworkIdentity::parse(text)
    }

    fn dep(id: &str, version: Option<&str>) -> RawDependency {
        RawDependency {
            id: Some(id.into()),
            version: version.map(str::to_string),
            ..Default::default()
        }
    }

    fn dependency_group(framework: Option<&str>, ids: &[&str]) -> ManifestElement {
        ManifestElement::DependencyGroup(RawGroup::new(
            framework,
            ids.iter().map(|id| dep(id, None)).collect(),
        ))
    }

    fn reference_group(framework: Option<&str>, files: &[&str]) -> ManifestElement {
        ManifestElement::ReferenceGroup(RawGroup::new(
            framework,
            files
                .iter()
                .map(|f| RawReference {
                    file: Some((*f).into()),
                })
                .collect(),
        ))
    }

    fn assembly(name: &str, framework: &str) -> ManifestElement {
        ManifestElement::FrameworkAssembly(RawFrameworkAssembly {
            assembly_name: Some(name.into()),
            target_framework: Some(framework.into()),
        })
    }

    fn manifest(elements: Vec<ManifestElement>) -> Manifest {
        Manifest {
            elements,
            ..Default::default()
        }
    }

    fn comma_delimited_manifest() -> Manifest {
        manifest(vec![
            assembly("System.Web", "net40"),
            assembly("System.Net", "net40-client, net40"),
            assembly("Microsoft.Devices.Sensors", "sl4-wp"),
            assembly("System.Json", "sl3"),
            assembly("System.Windows.Controls.DomainServices", "sl4"),
        ])
    }

    #[test]
    fn test_dependency_groups_keep_order() {
        let manifest = manifest(vec![
            ManifestElement::DependencyGroup(RawGroup::new(
                Some("net40"),
                vec![
                    dep("jQuery", None),
                    dep("WebActivator", Some("1.1.0")),
                    dep("PackageC", Some("[1.1.0, 2.0.1)")),
                ],
            )),
            dependency_group(Some("wp8"), &["jQuery"]),
        ]);

        let groups = ManifestGroupResolver::new()
            .dependency_groups(&manifest)
            .unwrap();

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].target_framework, fw("net40"));
        assert_eq!(groups[1].target_framework, fw("wp8"));
        let ids: Vec<_> = groups[0].packages.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["jQuery", "WebActivator", "PackageC"]);
    }

    #[test]
    fn test_empty_groups_are_kept() {
        let manifest = manifest(vec![
            reference_group(None, &["a.dll"]),
            reference_group(Some("net45"), &[]),
            dependency_group(Some("net40"), &["jQuery", "WebActivator", "PackageC"]),
            dependency_group(Some("net45"), &[]),
        ]);

        let resolved = ManifestGroupResolver::new().resolve(&manifest).unwrap();

        assert_eq!(resolved.reference_groups.len(), 2);
        assert_eq!(resolved.reference_groups[0].target_framework, FrameworkIdentity::Any);
        assert_eq!(resolved.reference_groups[0].items, vec!["a.dll"]);
        assert_eq!(resolved.reference_groups[1].target_framework, fw("net45"));
        assert!(resolved.reference_groups[1].items.is_empty());
        assert_eq!(resolved.dependency_groups.len(), 2);
        assert!(resolved.dependency_groups[1].packages.is_empty());
    }

    #[test]
    fn test_duplicate_unsupported_groups_stay_separate() {
        let manifest = manifest(vec![
            dependency_group(
                Some(".NETPortable0.0-net403+sl5+netcore45+wp8+MonoAndroid1+MonoTouch1"),
                &["Microsoft.Bcl.Async", "Microsoft.Net.Http", "Microsoft.Bcl.Build"],
            ),
            dependency_group(
                Some(".NETPortable0.0-net403+sl5+netcore45+wp8"),
                &["Microsoft.Bcl.Async", "Microsoft.Net.Http", "Microsoft.Bcl.Build"],
            ),
        ]);

        let groups = ManifestGroupResolver::new()
            .dependency_groups(&manifest)
            .unwrap();

        assert_eq!(groups.len(), 2);
        assert!(groups.iter().all(|g| g.target_framework.is_unsupported()));
    }

    #[test]
    fn test_identical_unsupported_raw_strings_not_merged() {
        let manifest = manifest(vec![
            dependency_group(Some("future51"), &["jQuery"]),
            dependency_group(Some("future51"), &["jQuery"]),
        ]);

        let groups = ManifestGroupResolver::new()
            .dependency_groups(&manifest)
            .unwrap();

        assert_eq!(groups.len(), 2);
    }

    #[test]
    fn test_unsupported_dependency_groups() {
        let manifest = manifest(vec![
            dependency_group(Some("net45"), &["jQuery"]),
            dependency_group(Some("future51"), &["jQuery"]),
            dependency_group(Some("future50"), &["jQuery"]),
            dependency_group(Some("futurevnext10.0"), &["jQuery"]),
            dependency_group(Some("some4~new5^conventions10"), &["jQuery"]),
        ]);

        let groups = ManifestGroupResolver::new()
            .dependency_groups(&manifest)
            .unwrap();

        assert_eq!(groups.len(), 5);
        assert_eq!(
            groups
                .iter()
                .filter(|g| g.target_framework.is_unsupported())
                .count(),
            4
        );
        assert_eq!(groups[0].target_framework, fw("net45"));
    }

    #[test]
    fn test_recognised_groups_merge() {
        let manifest = manifest(vec![
            ManifestElement::DependencyGroup(RawGroup::new(
                Some("net45"),
                vec![dep("A", Some("1.0")), dep("B", None)],
            )),
            dependency_group(Some("wp8"), &["C"]),
            ManifestElement::DependencyGroup(RawGroup::new(
                Some(".NETFramework,Version=v4.5"),
                vec![dep("a", Some("2.0")), dep("D", None)],
            )),
        ]);

        let groups = ManifestGroupResolver::new()
            .dependency_groups(&manifest)
            .unwrap();

        assert_eq!(groups.len(), 2);
        let merged = &groups[0];
        let ids: Vec<_> = merged.packages.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "B", "D"]);
        assert_eq!(
            merged.packages[0].version_range,
            Some(VersionRange::parse("2.0").unwrap())
        );
    }

    #[test]
    fn test_ungrouped_items_merge_into_any() {
        let manifest = manifest(vec![
            dependency_group(None, &["A"]),
            dependency_group(Some(""), &["B"]),
        ]);

        let groups = ManifestGroupResolver::new()
            .dependency_groups(&manifest)
            .unwrap();

        assert_eq!(groups.len(), 1);
        assert!(groups[0].target_framework.is_any());
        assert_eq!(groups[0].packages.len(), 2);
    }

    #[test]
    fn test_framework_assembly_groups() {
        let groups = ManifestGroupResolver::new()
            .framework_reference_groups(&comma_delimited_manifest())
            .unwrap();

        assert_eq!(groups.len(), 5);
        let net40: Vec<_> = groups
            .iter()
            .filter(|g| g.target_framework == fw("net40"))
            .collect();
        assert_eq!(net40.len(), 1);
        assert_eq!(net40[0].items, vec!["System.Net", "System.Web"]);
    }

    #[test]
    fn test_framework_assembly_groups_snapshot() {
        let groups = ManifestGroupResolver::new()
            .framework_reference_groups(&comma_delimited_manifest())
            .unwrap();

        assert_json_snapshot!(groups, @r#"
        [
          {
            "target_framework": ".NETFramework,Version=v4.0",
            "items": [
              "System.Net",
              "System.Web"
            ]
          },
          {
            "target_framework": ".NETFramework,Version=v4.0,Profile=Client",
            "items": [
              "System.Net"
            ]
          },
          {
            "target_framework": "Silverlight,Version=v4.0,Profile=WindowsPhone",
            "items": [
              "Microsoft.Devices.Sensors"
            ]
          },
          {
            "target_framework": "Silverlight,Version=v3.0",
            "items": [
              "System.Json"
            ]
          },
          {
            "target_framework": "Silverlight,Version=v4.0",
            "items": [
              "System.Windows.Controls.DomainServices"
            ]
          }
        ]
        "#);
    }

    #[test]
    fn test_framework_assembly_without_framework() {
        let manifest = manifest(vec![ManifestElement::FrameworkAssembly(RawFrameworkAssembly {
            assembly_name: Some("System.Xml".into()),
            target_framework: None,
        })]);

        let groups = ManifestGroupResolver::new()
            .framework_reference_groups(&manifest)
            .unwrap();

        assert_eq!(groups.len(), 1);
        assert!(groups[0].target_framework.is_any());
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let manifest = comma_delimited_manifest();
        let resolver = ManifestGroupResolver::new();
        assert_eq!(
            resolver.resolve(&manifest).unwrap(),
            resolver.resolve(&manifest).unwrap()
        );
    }

    #[test]
    fn test_missing_dependency_id() {
        let manifest = manifest(vec![ManifestElement::DependencyGroup(RawGroup::new(
            Some("net45"),
            vec![RawDependency::default()],
        ))]);

        let err = ManifestGroupResolver::new()
            .dependency_groups(&manifest)
            .unwrap_err();

        assert!(matches!(
            err,
            ManifestError::MissingAttribute { ref element, ref attribute }
                if element == "dependency" && attribute == "id"
        ));
    }

    #[test]
    fn test_missing_assembly_name() {
        let manifest = manifest(vec![ManifestElement::FrameworkAssembly(
            RawFrameworkAssembly::default(),
        )]);

        assert!(matches!(
            ManifestGroupResolver::new().framework_reference_groups(&manifest),
            Err(ManifestError::MissingAttribute { .. })
        ));
    }

    #[test]
    fn test_invalid_version_names_dependency() {
        let manifest = manifest(vec![ManifestElement::DependencyGroup(RawGroup::new(
            Some("net45"),
            vec![dep("PackageC", Some("[1.1.0, 2.0.1"))],
        ))]);

        let err = ManifestGroupResolver::new().resolve(&manifest).unwrap_err();

        match err {
            ManifestError::InvalidDependencyVersion { id, .. } => assert_eq!(id, "PackageC"),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_include_exclude_lists() {
        let manifest = manifest(vec![ManifestElement::DependencyGroup(RawGroup::new(
            None,
            vec![RawDependency {
                id: Some("A".into()),
                version: Some(" ".into()),
                include: Some("Compile, Runtime".into()),
                exclude: Some("Build".into()),
            }],
        ))]);

        let groups = ManifestGroupResolver::new()
            .dependency_groups(&manifest)
            .unwrap();

        let package = &groups[0].packages[0];
        assert_eq!(package.version_range, None);
        assert_eq!(package.include, vec!["Compile", "Runtime"]);
        assert_eq!(package.exclude, vec!["Build"]);
    }
}
