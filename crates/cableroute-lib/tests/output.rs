mod common;

use std::sync::atomic::AtomicBool;

use cableroute_lib::{route_cables, write_report, ReportFormat, RouteConfig, REPORT_HEADER};

use common::{fixture_cables, fixture_project};

fn render(format: ReportFormat) -> String {
    let project = fixture_project();
    let cables = fixture_cables();
    let cancel = AtomicBool::new(false);
    let report = route_cables(&project, &cables, &RouteConfig::default(), &cancel, |_| {})
        .expect("batch runs");

    let mut buffer = Vec::new();
    write_report(&report.records, format, &mut buffer).expect("report writes");
    String::from_utf8(buffer).expect("report is utf-8")
}

#[test]
fn csv_report_lists_every_cable_in_order() {
    let text = render(ReportFormat::Csv);
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines.len(), 7);
    assert_eq!(lines[0], REPORT_HEADER.join(","));
    assert_eq!(
        lines[1],
        "C1,MSB-01,DB-01,Found,Found,Route Confirmed,5.00,5.00,0.00,101-102,\
         MSB-01>>TR-01-TR-02>>DB-01,\"101, 102\",\"101, 102\",1,LV,IP54"
    );
    assert!(lines[3].starts_with("C3,MSB-01,DB-03,Found,Found,No Containment Assigned,0.00,"));
    assert!(lines[4].contains("Not Found,Route Incomplete (Start/End Not Found),6.00,0.00,6.00"));
    assert!(lines[5].contains("Processing Error"));
    assert!(lines[5].contains("invalid length"));
}

#[test]
fn csv_report_is_byte_identical_across_runs() {
    assert_eq!(render(ReportFormat::Csv), render(ReportFormat::Csv));
}

#[test]
fn json_report_uses_status_labels() {
    let text = render(ReportFormat::Json);
    let value: serde_json::Value = serde_json::from_str(&text).expect("valid json");
    let records = value.as_array().expect("array of records");

    assert_eq!(records.len(), 6);
    assert_eq!(records[0]["reference"], "C1");
    assert_eq!(records[0]["status"], "Route Confirmed");
    assert_eq!(records[1]["status"], "Route Unconfirmed (Virtual Path)");
    assert_eq!(records[1]["island_count"], 2);
    assert_eq!(records[3]["to_status"], "Not Found");
    assert_eq!(records[5]["assigned_containment"], serde_json::json!([101, 102]));
}
