//! Common test utilities and fixture helpers.
//!
//! Provides the paths of the shared JSON/CSV fixtures and small hand-built
//! projects for scenarios that need exact geometry.

use std::path::PathBuf;

use cableroute_lib::{
    CableRecord, ContainmentElement, ContainmentKind, ElementId, Equipment, Point3, Project,
};

/// Path to fixtures directory used by tests (project file and cable schedule).
#[allow(dead_code)]
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../docs/fixtures")
}

#[allow(dead_code)]
pub fn fixture_project() -> Project {
    Project::from_path(&fixtures_dir().join("project.json")).expect("fixture project loads")
}

#[allow(dead_code)]
pub fn fixture_cables() -> Vec<CableRecord> {
    cableroute_lib::load_cables(&fixtures_dir().join("cables.csv")).expect("fixture cables load")
}

/// Straight tray run along the x axis at y = 0.
#[allow(dead_code)]
pub fn tray(id: ElementId, length: f64, from_x: f64, label: &str) -> ContainmentElement {
    ContainmentElement::new(id, ContainmentKind::CableTray, length)
        .with_curve(vec![
            Point3::new(from_x, 0.0, 0.0),
            Point3::new(from_x + length, 0.0, 0.0),
        ])
        .with_label(label)
}

#[allow(dead_code)]
pub fn panel(id: i64, tag: &str, x: f64) -> Equipment {
    Equipment::new(id, format!("{tag} panel"))
        .with_tag(tag)
        .with_anchor(Point3::new(x, 0.0, 0.0))
}

/// PANEL-A and PANEL-B one unit beyond each end of E1 (length 5) and E2
/// (length 7), both tagged for cable C1. Pass `connected = false` to leave the
/// two elements in separate islands.
#[allow(dead_code)]
pub fn e1_e2_project(connected: bool) -> Project {
    Project {
        equipment: vec![panel(1, "PANEL-A", -1.0), panel(2, "PANEL-B", 13.0)],
        containment: vec![
            tray(1, 5.0, 0.0, "E1").with_cable_tag("C1"),
            tray(2, 7.0, 5.0, "E2").with_cable_tag("C1"),
        ],
        connections: if connected { vec![(1, 2)] } else { Vec::new() },
    }
}
