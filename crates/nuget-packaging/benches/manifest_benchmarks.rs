//! Benchmarks for manifest deserialization and group resolution.
//!
//! Performance targets:
//! - Small manifests (a handful of groups): < 20μs
//! - Large manifests (50 groups, 500 dependencies): < 1ms

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use nuget_packaging::{Manifest, ManifestGroupResolver};
use std::hint::black_box;

const SMALL_MANIFEST: &str = r#"{
  "metadata": { "id": "PackageWithGacReferences", "version": "1.0" },
  "elements": [
    { "dependencyGroup": { "targetFramework": "net40", "items": [
      { "id": "jQuery" },
      { "id": "WebActivator", "version": "1.1.0" },
      { "id": "PackageC", "version": "[1.1.0, 2.0.1)" }
    ] } },
    { "dependencyGroup": { "targetFramework": "wp8", "items": [{ "id": "jQuery" }] } },
    { "frameworkAssembly": { "assemblyName": "System.Web", "targetFramework": "net40" } },
    { "frameworkAssembly": { "assemblyName": "System.Net", "targetFramework": "net40-client, net40" } },
    { "frameworkAssembly": { "assemblyName": "System.Json", "targetFramework": "sl3" } }
  ]
}"#;

fn large_manifest() -> String {
    let frameworks = ["net40", "net45", "wp8", "sl4", "future51"];
    let groups: Vec<String> = (0..50)
        .map(|g| {
            let items: Vec<String> = (0..10)
                .map(|i| format!(r#"{{ "id": "Package{}", "version": "[{}.0, {}.0)" }}"#, i, i + 1, i + 2))
                .collect();
            format!(
                r#"{{ "dependencyGroup": {{ "targetFramework": "{}", "items": [{}] }} }}"#,
                frameworks[g % frameworks.len()],
                items.join(", ")
            )
        })
        .collect();
    format!(
        r#"{{ "metadata": {{ "id": "Large", "version": "1.0" }}, "elements": [{}] }}"#,
        groups.join(", ")
    )
}

fn bench_manifest_parse(c: &mut Criterion) {
    let large = large_manifest();
    let mut group = c.benchmark_group("manifest_parse");

    group.bench_with_input(BenchmarkId::new("small", "5_elements"), &SMALL_MANIFEST, |b, json| {
        b.iter(|| Manifest::from_json(black_box(json)))
    });
    group.bench_with_input(BenchmarkId::new("large", "50_groups"), &large.as_str(), |b, json| {
        b.iter(|| Manifest::from_json(black_box(json)))
    });

    group.finish();
}

fn bench_group_resolution(c: &mut Criterion) {
    let resolver = ManifestGroupResolver::new();
    let small = Manifest::from_json(SMALL_MANIFEST).unwrap();
    let large = Manifest::from_json(&large_manifest()).unwrap();
    let mut group = c.benchmark_group("group_resolution");

    group.bench_function("small", |b| b.iter(|| resolver.resolve(black_box(&small))));
    group.bench_function("large", |b| b.iter(|| resolver.resolve(black_box(&large))));

    group.finish();
}

criterion_group!(benches, bench_manifest_parse, bench_group_resolution);
criterion_main!(benches);
