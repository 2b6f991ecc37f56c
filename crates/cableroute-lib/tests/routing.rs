mod common;

use std::sync::atomic::{AtomicBool, Ordering};

use cableroute_lib::{
    route_cable, route_cables, CableRecord, ContainmentElement, ContainmentKind, Equipment,
    LengthUnit, MatchStatus, Project, ProjectIndex, RouteConfig, RouteStatus,
};

use common::{e1_e2_project, fixture_cables, fixture_project, panel, tray};

fn route_one(project: &Project, cable: &CableRecord) -> cableroute_lib::CableRouteRecord {
    let index = ProjectIndex::new(project);
    route_cable(&index, cable, &RouteConfig::default())
}

fn approx(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn connected_e1_e2_is_confirmed() {
    let project = e1_e2_project(true);
    let record = route_one(&project, &CableRecord::new("C1", "PANEL-A", "PANEL-B"));

    assert_eq!(record.status, RouteStatus::Confirmed);
    assert_eq!(record.from_status, MatchStatus::Found { matches: 1 });
    approx(record.supported_length, 5.0);
    approx(record.unsupported_length, 0.0);
    approx(record.total_length, 5.0);
    assert_eq!(record.island_count, 1);
    assert_eq!(record.branch_sequence, "1-2");
    assert_eq!(record.routing_sequence, "PANEL-A>>E1-E2>>PANEL-B");
}

#[test]
fn disconnected_e1_e2_is_virtual() {
    let project = e1_e2_project(false);
    let record = route_one(&project, &CableRecord::new("C1", "PANEL-A", "PANEL-B"));

    assert_eq!(record.status, RouteStatus::Unconfirmed);
    assert_eq!(record.island_count, 2);
    assert!(record.unsupported_length > 0.0);
    // Touching islands, so only the final metre to PANEL-B is inferred.
    approx(record.unsupported_length, 1.2);
    assert_eq!(record.routing_sequence, "PANEL-A>>E1>>E2>>PANEL-B");
    assert_eq!(record.branch_sequence, "1 | 2");
}

#[test]
fn contingency_inflates_inferred_gap() {
    // Two singleton islands, 10 apart, with both panels touching their trays.
    let project = Project {
        equipment: vec![panel(1, "PANEL-A", 0.0), panel(2, "PANEL-B", 22.0)],
        containment: vec![
            tray(1, 5.0, 0.0, "T1").with_cable_tag("C1"),
            tray(2, 7.0, 15.0, "T2").with_cable_tag("C1"),
        ],
        connections: Vec::new(),
    };
    let record = route_one(&project, &CableRecord::new("C1", "PANEL-A", "PANEL-B"));

    assert_eq!(record.status, RouteStatus::Unconfirmed);
    approx(record.supported_length, 0.0);
    approx(record.unsupported_length, 12.0);
    approx(record.total_length, 12.0);
}

#[test]
fn routes_never_borrow_unassigned_containment() {
    // A bridge element links the two tagged trays but is not tagged itself.
    let mut project = e1_e2_project(false);
    project
        .containment
        .push(ContainmentElement::new(3, ContainmentKind::CableTrayFitting, 0.1));
    project.connections = vec![(1, 3), (3, 2)];

    let record = route_one(&project, &CableRecord::new("C1", "PANEL-A", "PANEL-B"));
    assert_eq!(record.island_count, 2);
    assert_eq!(record.graphed_containment, vec![1, 2]);
    assert!(!record.branch_sequence.contains('3'));
}

#[test]
fn unknown_end_equipment_is_incomplete() {
    let project = e1_e2_project(false);
    let record = route_one(&project, &CableRecord::new("C1", "PANEL-A", "PANEL-Z"));

    assert_eq!(record.to_status, MatchStatus::NotFound);
    assert_eq!(record.status, RouteStatus::Incomplete);
    assert_eq!(record.routing_sequence, "PANEL-A>>E1>>E2>>PANEL-Z");
}

#[test]
fn unknown_start_equipment_is_a_virtual_path_error() {
    let project = e1_e2_project(true);
    let record = route_one(&project, &CableRecord::new("C1", "PANEL-Z", "PANEL-B"));

    assert_eq!(record.from_status, MatchStatus::NotFound);
    assert_eq!(record.status, RouteStatus::VirtualPathError);
    approx(record.total_length, 0.0);
}

#[test]
fn anchorless_end_equipment_is_a_virtual_path_error() {
    for connected in [true, false] {
        let mut project = e1_e2_project(connected);
        project.equipment[1] = Equipment::new(2, "PANEL-B panel").with_tag("PANEL-B");
        let record = route_one(&project, &CableRecord::new("C1", "PANEL-A", "PANEL-B"));

        assert_eq!(record.to_status, MatchStatus::Found { matches: 1 });
        assert_eq!(record.status, RouteStatus::VirtualPathError, "connected = {connected}");
        assert!(record.routing_sequence.contains("near end equipment 'PANEL-B'"));
        assert!(record.branch_sequence.is_empty());
        approx(record.total_length, 0.0);
    }
}

#[test]
fn untagged_cable_has_no_containment() {
    let project = e1_e2_project(true);
    let record = route_one(&project, &CableRecord::new("C9", "PANEL-A", "PANEL-B"));

    assert_eq!(record.status, RouteStatus::NoContainment);
    approx(record.total_length, 0.0);
    assert_eq!(record.island_count, 0);
    assert!(record.assigned_containment.is_empty());
}

#[test]
fn invalid_length_becomes_processing_error() {
    let mut project = e1_e2_project(true);
    project.containment[1].length = f64::NAN;
    let record = route_one(&project, &CableRecord::new("C1", "PANEL-A", "PANEL-B"));

    assert_eq!(record.status, RouteStatus::ProcessingError);
    assert!(record.routing_sequence.starts_with("Error: "));
    assert_eq!(record.assigned_containment, vec![1, 2]);
}

#[test]
fn display_unit_conversion_happens_last() {
    let project = e1_e2_project(true);
    let config = RouteConfig {
        native_unit: LengthUnit::Metres,
        display_unit: LengthUnit::Millimetres,
        ..RouteConfig::default()
    };
    let index = ProjectIndex::new(&project);
    let record = route_cable(&index, &CableRecord::new("C1", "PANEL-A", "PANEL-B"), &config);
    approx(record.supported_length, 5000.0);
}

#[test]
fn fixture_batch_produces_expected_statuses() {
    let project = fixture_project();
    let cables = fixture_cables();
    let cancel = AtomicBool::new(false);
    let report = route_cables(&project, &cables, &RouteConfig::default(), &cancel, |_| {})
        .expect("batch runs");

    let statuses: Vec<_> = report.records.iter().map(|r| r.status).collect();
    assert_eq!(
        statuses,
        vec![
            RouteStatus::Confirmed,
            RouteStatus::Unconfirmed,
            RouteStatus::NoContainment,
            RouteStatus::Incomplete,
            RouteStatus::ProcessingError,
            RouteStatus::Confirmed,
        ]
    );
    assert!(!report.cancelled);

    let c2 = &report.records[1];
    approx(c2.supported_length, 10.5);
    approx(c2.unsupported_length, (15.0 + 5f64.sqrt()) * 1.2);
    assert_eq!(c2.routing_sequence, "MSB-01>>TR-01>>TR-03-TR-04>>DB-02");
    assert_eq!(c2.branch_sequence, "101 | 202-203-204");
    assert_eq!(c2.tray_systems, vec!["LV", "LV-HD"]);
    assert_eq!(c2.containment_ratings, vec!["IP54", "IP65"]);

    let c4 = &report.records[3];
    approx(c4.unsupported_length, 6.0);

    let c6 = &report.records[5];
    assert_eq!(c6.assigned_containment, vec![101, 102]);
    approx(c6.supported_length, 5.0);
}

#[test]
fn batch_output_is_idempotent() {
    let project = fixture_project();
    let cables = fixture_cables();
    let cancel = AtomicBool::new(false);
    let config = RouteConfig::default();

    let first = route_cables(&project, &cables, &config, &cancel, |_| {}).unwrap();
    let second = route_cables(&project, &cables, &config, &cancel, |_| {}).unwrap();
    assert_eq!(first.records, second.records);
}

#[test]
fn cancellation_stops_between_cables() {
    let project = fixture_project();
    let cables = fixture_cables();
    let cancel = AtomicBool::new(false);
    let mut seen = Vec::new();

    let report = route_cables(&project, &cables, &RouteConfig::default(), &cancel, |progress| {
        seen.push((progress.completed, progress.total));
        if progress.completed == 2 {
            cancel.store(true, Ordering::Relaxed);
        }
    })
    .unwrap();

    assert!(report.cancelled);
    assert_eq!(report.records.len(), 2);
    assert_eq!(seen, vec![(1, 6), (2, 6)]);
}

#[test]
fn duplicate_project_ids_fail_the_batch() {
    let mut project = e1_e2_project(true);
    project.containment.push(tray(1, 1.0, 50.0, "DUP"));
    let cancel = AtomicBool::new(false);
    let result = route_cables(
        &project,
        &[CableRecord::new("C1", "PANEL-A", "PANEL-B")],
        &RouteConfig::default(),
        &cancel,
        |_| {},
    );
    assert!(matches!(
        result,
        Err(cableroute_lib::Error::DuplicateElement { id: 1 })
    ));
}
