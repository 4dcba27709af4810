//! Benchmarks for lock file parsing and validation.
//!
//! Validation runs on every project open, so it must stay far below the
//! cost of reading the lock file from disk.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use nuget_project_model::{
    LockFile, LockFileConsistencyValidator, PackageSpec, ProjectFileDependencyGroup,
    read_lock_file, write_lock_file,
};
use std::fmt::Write;
use std::hint::black_box;

const FRAMEWORKS: &[&str] = &["net45", "net451", "dnx451", "dnxcore50", "netstandard1.3"];

fn project_json(dependencies: usize) -> String {
    let mut deps = String::new();
    for i in 0..dependencies {
        if i > 0 {
            deps.push(',');
        }
        let _ = write!(deps, r#""Package{i}": "[{i}.0, {}.0)""#, i + 1);
    }
    let frameworks = FRAMEWORKS
        .iter()
        .map(|f| format!(r#""{f}": {{ "dependencies": {{ {deps} }} }}"#))
        .collect::<Vec<_>>()
        .join(",");
    format!(r#"{{ "dependencies": {{ {deps} }}, "frameworks": {{ {frameworks} }} }}"#)
}

fn lock_file_for(spec: &PackageSpec) -> LockFile {
    let mut lock_file = LockFile::new();
    lock_file.project_file_dependency_groups = ProjectFileDependencyGroup::from_package_spec(spec);
    lock_file
}

fn bench_validate(c: &mut Criterion) {
    let mut group = c.benchmark_group("validate");
    let validator = LockFileConsistencyValidator::new();
    for size in [5usize, 50, 200] {
        let spec = PackageSpec::from_json(&project_json(size), "Bench").unwrap();
        let lock_file = lock_file_for(&spec);
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| validator.is_valid(black_box(&lock_file), black_box(&spec)))
        });
    }
    group.finish();
}

fn bench_read_lock_file(c: &mut Criterion) {
    let mut group = c.benchmark_group("read_lock_file");
    for size in [5usize, 50, 200] {
        let spec = PackageSpec::from_json(&project_json(size), "Bench").unwrap();
        let content = write_lock_file(&lock_file_for(&spec)).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(size), &content, |b, content| {
            b.iter(|| read_lock_file(black_box(content)))
        });
    }
    group.finish();
}

fn bench_read_project_json(c: &mut Criterion) {
    let content = project_json(50);
    c.bench_function("read_project_json_50", |b| {
        b.iter(|| PackageSpec::from_json(black_box(&content), "Bench"))
    });
}

criterion_group!(
    benches,
    bench_validate,
    bench_read_lock_file,
    bench_read_project_json
);
criterion_main!(benches);
