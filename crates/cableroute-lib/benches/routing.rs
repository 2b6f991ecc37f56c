use criterion::{criterion_group, criterion_main, Criterion};
use cableroute_lib::{
    load_cables, route_cables, CableRecord, ContainmentElement, ContainmentKind, Equipment,
    Point3, Project, RouteConfig,
};
use once_cell::sync::Lazy;
use std::hint::black_box;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../docs/fixtures")
}

static PROJECT: Lazy<Project> =
    Lazy::new(|| Project::from_path(&fixtures_dir().join("project.json")).expect("fixture loads"));
static CABLES: Lazy<Vec<CableRecord>> =
    Lazy::new(|| load_cables(&fixtures_dir().join("cables.csv")).expect("fixture loads"));

/// A 400-element tray run broken into 20 islands, all tagged for one cable.
static FRAGMENTED: Lazy<Project> = Lazy::new(|| {
    let containment: Vec<ContainmentElement> = (0..400)
        .map(|i| {
            let x = i as f64 * 2.0 + (i / 20) as f64 * 5.0;
            ContainmentElement::new(i, ContainmentKind::CableTray, 2.0)
                .with_curve(vec![Point3::new(x, 0.0, 0.0), Point3::new(x + 2.0, 0.0, 0.0)])
                .with_cable_tag("LONG")
        })
        .collect();
    let connections = (0..400)
        .filter(|i| i % 20 != 19)
        .map(|i| (i, i + 1))
        .collect();
    Project {
        equipment: vec![
            Equipment::new(1, "START").with_anchor(Point3::new(-1.0, 0.0, 0.0)),
            Equipment::new(2, "END").with_anchor(Point3::new(1000.0, 0.0, 0.0)),
        ],
        containment,
        connections,
    }
});

fn benchmark_routing(c: &mut Criterion) {
    let config = RouteConfig::default();
    let cancel = AtomicBool::new(false);

    c.bench_function("fixture_batch", |b| {
        let project = &*PROJECT;
        let cables = &*CABLES;
        b.iter(|| {
            let report = route_cables(project, cables, &config, &cancel, |_| {})
                .expect("batch runs");
            black_box(report.records.len())
        });
    });

    c.bench_function("fragmented_400_elements", |b| {
        let project = &*FRAGMENTED;
        let cables = [CableRecord::new("LONG", "START", "END")];
        b.iter(|| {
            let report = route_cables(project, &cables, &config, &cancel, |_| {})
                .expect("batch runs");
            black_box(report.records[0].total_length)
        });
    });
}

criterion_group!(benches, benchmark_routing);
criterion_main!(benches);
