use std::collections::HashMap;
use std::fmt;
use std::io::Write;
use std::str::FromStr;

use crate::error::Result;
use crate::model::{ContainmentElement, ElementId};
use crate::routing::CableRouteRecord;

/// Separator between endpoints and segment descriptions in a routing sequence.
pub const SEQUENCE_SEPARATOR: &str = ">>";

/// Separator between segments in a branch sequence.
pub const BRANCH_SEPARATOR: &str = " | ";

/// Separator between entries of a listing column.
pub const LISTING_SEPARATOR: &str = ", ";

/// Column order of the CSV report.
pub const REPORT_HEADER: [&str; 16] = [
    "Cable Reference",
    "From",
    "To",
    "From Status",
    "To Status",
    "Status",
    "Total Length",
    "Supported Length",
    "Unsupported Length",
    "Branch Sequence",
    "Routing Sequence",
    "Assigned Containment",
    "Graphed Containment",
    "Island Count",
    "Tray Systems",
    "Containment Ratings",
];

/// Renders element paths as human-readable sequences.
#[derive(Debug, Clone, Default)]
pub struct RouteFormatter {
    labels: HashMap<ElementId, String>,
}

impl RouteFormatter {
    pub fn new(elements: &[&ContainmentElement]) -> Self {
        Self {
            labels: elements
                .iter()
                .map(|element| (element.id, element.display_label()))
                .collect(),
        }
    }

    /// Label for an element; unknown elements render as their identifier.
    pub fn label(&self, id: ElementId) -> String {
        self.labels
            .get(&id)
            .cloned()
            .unwrap_or_else(|| id.to_string())
    }

    /// Describe one segment. Consecutive elements sharing a label (a run and
    /// its fittings usually do) collapse into one entry.
    pub fn segment(&self, elements: &[ElementId]) -> String {
        let mut labels: Vec<String> = Vec::with_capacity(elements.len());
        for &id in elements {
            let label = self.label(id);
            if labels.last() != Some(&label) {
                labels.push(label);
            }
        }
        labels.join("-")
    }

    /// `start>>segment>>...>>end`.
    pub fn routing_sequence(&self, start: &str, segments: &[String], end: &str) -> String {
        std::iter::once(start)
            .chain(segments.iter().map(String::as_str))
            .chain(std::iter::once(end))
            .collect::<Vec<_>>()
            .join(SEQUENCE_SEPARATOR)
    }

    /// Element identifiers per segment, segments separated by ` | `.
    pub fn branch_sequence<'p, I>(&self, segments: I) -> String
    where
        I: IntoIterator<Item = &'p [ElementId]>,
    {
        segments
            .into_iter()
            .map(|segment| {
                segment
                    .iter()
                    .map(ElementId::to_string)
                    .collect::<Vec<_>>()
                    .join("-")
            })
            .collect::<Vec<_>>()
            .join(BRANCH_SEPARATOR)
    }
}

/// Serialisation format for a batch report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[default]
    Csv,
    Json,
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            ReportFormat::Csv => "csv",
            ReportFormat::Json => "json",
        };
        f.write_str(value)
    }
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(ReportFormat::Csv),
            "json" => Ok(ReportFormat::Json),
            other => Err(format!("unknown report format '{other}' (expected csv or json)")),
        }
    }
}

/// Write `records` to `writer` in the requested format.
///
/// Output depends only on the records, so identical batches produce identical
/// bytes.
pub fn write_report<W: Write>(
    records: &[CableRouteRecord],
    format: ReportFormat,
    writer: W,
) -> Result<()> {
    match format {
        ReportFormat::Csv => write_csv(records, writer),
        ReportFormat::Json => write_json(records, writer),
    }
}

fn write_csv<W: Write>(records: &[CableRouteRecord], writer: W) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(REPORT_HEADER)?;
    for record in records {
        csv.write_record(csv_row(record))?;
    }
    csv.flush()?;
    Ok(())
}

fn write_json<W: Write>(records: &[CableRouteRecord], mut writer: W) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, records)?;
    writeln!(writer)?;
    Ok(())
}

fn csv_row(record: &CableRouteRecord) -> [String; 16] {
    [
        record.reference.clone(),
        record.from.clone(),
        record.to.clone(),
        record.from_status.to_string(),
        record.to_status.to_string(),
        record.status.to_string(),
        format_length(record.total_length),
        format_length(record.supported_length),
        format_length(record.unsupported_length),
        record.branch_sequence.clone(),
        record.routing_sequence.clone(),
        join_listing(&record.assigned_containment),
        join_listing(&record.graphed_containment),
        record.island_count.to_string(),
        join_listing(&record.tray_systems),
        join_listing(&record.containment_ratings),
    ]
}

fn format_length(value: f64) -> String {
    format!("{value:.2}")
}

fn join_listing<T: ToString>(values: &[T]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(LISTING_SEPARATOR)
}
