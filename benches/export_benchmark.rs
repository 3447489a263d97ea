//! Benchmarks for purl normalization and BOM export.

use bd_spdx_export::config::{ExportConfig, ExportPreset};
use bd_spdx_export::pipeline::Exporter;
use bd_spdx_export::purl::normalize;
use bd_spdx_export::source::SnapshotSource;
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use serde_json::{Value, json};
use std::hint::black_box;

const ORIGINS: &[(&str, &str)] = &[
    ("npmjs", "@types/node/18.0.0"),
    ("maven", "org.apache.commons:commons-lang3:3.12.0"),
    ("pypi", "My_Package.Name/2.0"),
    ("debian", "curl/7.68.0-1:amd64"),
    ("centos", "openssl/1:1.1.1k-5.el8/x86_64"),
    ("golang", "github.com/pkg/errors:v0.9.1"),
    ("sourceforge", "foo/1.0"),
];

fn component(i: usize) -> Value {
    json!({
        "componentName": format!("comp-{i}"),
        "componentVersionName": "1.0.0",
        "componentVersion": format!("cv-{i}"),
        "matchTypes": ["FILE_DEPENDENCY_TRANSITIVE"],
        "origins": [{"externalNamespace": "npmjs", "externalId": format!("comp-{i}/1.0.0")}],
        "licenses": [{"spdxId": "MIT", "licenseDisplay": "MIT License"}]
    })
}

/// A snapshot whose tree is a chain of fan-out nodes sharing a common leaf.
fn synthetic_snapshot(size: usize) -> String {
    let components: Vec<Value> = (0..size).map(component).collect();
    let hierarchy: Vec<Value> = (0..size / 2)
        .map(|i| {
            let mut node = component(i);
            node["children"] = json!([component(size - 1), component(size / 2 + i)]);
            node
        })
        .collect();

    json!({
        "projects": [{
            "name": "bench",
            "versions": [{
                "versionName": "1.0",
                "createdAt": "2024-01-01T00:00:00Z",
                "components": components,
                "hierarchy": hierarchy
            }]
        }]
    })
    .to_string()
}

fn benchmark_normalize(c: &mut Criterion) {
    c.bench_function("purl_normalize", |b| {
        b.iter(|| {
            for (ecosystem, id) in ORIGINS {
                black_box(normalize(black_box(ecosystem), black_box(id)));
            }
        });
    });
}

fn benchmark_export(c: &mut Criterion) {
    let mut group = c.benchmark_group("export");
    let config = ExportConfig::from_preset(ExportPreset::Basic);

    for size in [100, 1000] {
        let json = synthetic_snapshot(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &json, |b, json| {
            b.iter(|| {
                let source = SnapshotSource::from_json(json).expect("valid snapshot");
                let outcome = Exporter::new(&source, &config)
                    .export("bench", "1.0")
                    .expect("export succeeds");
                black_box(outcome.document.packages().len());
            });
        });
    }
    group.finish();
}

criterion_group!(benches, benchmark_normalize, benchmark_export);
criterion_main!(benches);
