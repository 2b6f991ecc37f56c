//! Per-cable route resolution and the batch driver.
//!
//! This module provides:
//! - [`route_cable`] - Resolve one cable into a [`CableRouteRecord`]
//! - [`route_cables`] - Route a schedule in order with progress and cancellation
//! - [`inspect_islands`] - Diagnostic view of a cable's containment islands
//! - [`find_confirmed_path`] / [`find_best_disconnected_sequence`] - The two
//!   routing strategies
//!
//! # Strategy selection
//!
//! A cable whose assigned containment forms one island and whose endpoints
//! both resolve is routed through the connected network and reported as
//! confirmed. Everything else goes through the island stitcher, which bridges
//! gaps with inferred lengths.
//!
//! # Example
//!
//! ```ignore
//! use cableroute_lib::{route_cables, Project, RouteConfig, load_cables};
//!
//! let project = Project::from_path("project.json".as_ref())?;
//! let cables = load_cables("cables.csv".as_ref())?;
//! let cancel = AtomicBool::new(false);
//! let report = route_cables(&project, &cables, &RouteConfig::default(), &cancel, |_| {})?;
//! ```

mod confirmed;
mod virtual_path;

pub use confirmed::find_confirmed_path;
pub use virtual_path::{find_best_disconnected_sequence, VirtualPathResult};

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Serialize, Serializer};
use tracing::{debug, info, warn};

use crate::config::RouteConfig;
use crate::entry::find_entry_points;
use crate::error::{Error, Result};
use crate::geometry::{Accuracy, Point3};
use crate::graph::ContainmentGraph;
use crate::islands::{group_into_islands, Island};
use crate::model::{CableRecord, ContainmentElement, ElementId, Equipment};
use crate::output::RouteFormatter;
use crate::path::Path;
use crate::project::{Assignment, Project, ProjectIndex};

/// Number of suggestions offered for an unmatched equipment label.
const MAX_SUGGESTIONS: usize = 3;

/// Outcome classification of a routed cable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RouteStatus {
    /// A single connected path joins both endpoints.
    Confirmed,
    /// Both endpoints found, route bridges gaps between islands.
    Unconfirmed,
    /// Route stitched but one endpoint could not be resolved.
    Incomplete,
    /// The stitcher could not produce a route.
    VirtualPathError,
    /// No containment is assigned to the cable.
    NoContainment,
    /// Routing failed on malformed input.
    ProcessingError,
}

impl RouteStatus {
    pub fn label(self) -> &'static str {
        match self {
            RouteStatus::Confirmed => "Route Confirmed",
            RouteStatus::Unconfirmed => "Route Unconfirmed (Virtual Path)",
            RouteStatus::Incomplete => "Route Incomplete (Start/End Not Found)",
            RouteStatus::VirtualPathError => "Virtual Path Error",
            RouteStatus::NoContainment => "No Containment Assigned",
            RouteStatus::ProcessingError => "Processing Error",
        }
    }
}

impl fmt::Display for RouteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for RouteStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// Whether an endpoint label resolved to equipment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStatus {
    Found { matches: usize },
    NotFound,
}

impl MatchStatus {
    pub fn is_found(self) -> bool {
        matches!(self, MatchStatus::Found { .. })
    }
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchStatus::Found { matches } if *matches > 1 => {
                write!(f, "Found ({matches} matches)")
            }
            MatchStatus::Found { .. } => f.write_str("Found"),
            MatchStatus::NotFound => f.write_str("Not Found"),
        }
    }
}

impl Serialize for MatchStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One end of a cable and the equipment its label resolved to.
#[derive(Debug, Clone)]
pub struct Endpoint<'a> {
    pub label: &'a str,
    /// Matches in project order. Only the first supplies the anchor.
    pub matches: Vec<&'a Equipment>,
}

impl<'a> Endpoint<'a> {
    pub fn new(label: &'a str, matches: Vec<&'a Equipment>) -> Self {
        Self { label, matches }
    }

    pub fn is_found(&self) -> bool {
        !self.matches.is_empty()
    }

    pub fn anchor(&self) -> Option<Point3> {
        self.matches.first().and_then(|equipment| equipment.anchor)
    }

    /// Name used in routing sequences: the first match, else the raw label.
    pub fn display_name(&self) -> &str {
        match self.matches.first().map(|equipment| equipment.display_name()) {
            Some(name) if !name.is_empty() => name,
            _ => self.label.trim(),
        }
    }

    pub fn match_status(&self) -> MatchStatus {
        if self.is_found() {
            MatchStatus::Found {
                matches: self.matches.len(),
            }
        } else {
            MatchStatus::NotFound
        }
    }
}

/// Inputs shared by both routing strategies for a single cable.
#[derive(Debug, Clone, Copy)]
pub struct RouteContext<'a> {
    pub start: &'a Endpoint<'a>,
    pub end: &'a Endpoint<'a>,
    /// The cable's assigned containment, in assignment order.
    pub assigned: &'a [&'a ContainmentElement],
    pub graph: &'a ContainmentGraph,
    pub accuracy: Accuracy,
}

/// Report row for one cable. Lengths are in the display unit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CableRouteRecord {
    pub reference: String,
    pub from: String,
    pub to: String,
    pub from_status: MatchStatus,
    pub to_status: MatchStatus,
    pub status: RouteStatus,
    pub total_length: f64,
    pub supported_length: f64,
    pub unsupported_length: f64,
    pub branch_sequence: String,
    pub routing_sequence: String,
    pub assigned_containment: Vec<ElementId>,
    pub graphed_containment: Vec<ElementId>,
    pub island_count: usize,
    pub tray_systems: Vec<String>,
    pub containment_ratings: Vec<String>,
}

/// Native-unit result of a successful strategy run.
#[derive(Debug)]
struct RouteOutcome {
    status: RouteStatus,
    segments: Vec<Path>,
    routing_sequence: String,
    supported: f64,
    unsupported: f64,
    graphed: Vec<ElementId>,
    island_count: usize,
}

/// Route a single cable. Never fails: malformed input is reported as
/// [`RouteStatus::ProcessingError`].
pub fn route_cable(
    index: &ProjectIndex<'_>,
    cable: &CableRecord,
    config: &RouteConfig,
) -> CableRouteRecord {
    let start = resolve_endpoint(index, &cable.from, &cable.reference);
    let end = resolve_endpoint(index, &cable.to, &cable.reference);
    let assignment = index.assigned_containment(cable);

    let mut record = CableRouteRecord {
        reference: cable.reference.trim().to_string(),
        from: cable.from.trim().to_string(),
        to: cable.to.trim().to_string(),
        from_status: start.match_status(),
        to_status: end.match_status(),
        status: RouteStatus::NoContainment,
        total_length: 0.0,
        supported_length: 0.0,
        unsupported_length: 0.0,
        branch_sequence: String::new(),
        routing_sequence: String::new(),
        assigned_containment: assignment.ids(),
        graphed_containment: Vec::new(),
        island_count: 0,
        tray_systems: Vec::new(),
        containment_ratings: Vec::new(),
    };

    if assignment.is_empty() {
        debug!(cable = %cable.reference, "no containment assigned");
        return record;
    }

    match resolve_route(index, &start, &end, &assignment, config) {
        Ok(outcome) => {
            let routed: Vec<ElementId> = outcome
                .segments
                .iter()
                .flat_map(|segment| segment.elements.iter().copied())
                .collect();
            let listed = if routed.is_empty() {
                assignment.ids()
            } else {
                routed
            };
            let formatter = RouteFormatter::new(&assignment.elements);

            record.status = outcome.status;
            record.supported_length = config.to_display(outcome.supported);
            record.unsupported_length = config.to_display(outcome.unsupported);
            record.total_length = config.to_display(outcome.supported + outcome.unsupported);
            record.branch_sequence = formatter.branch_sequence(
                outcome
                    .segments
                    .iter()
                    .map(|segment| segment.elements.as_slice()),
            );
            record.routing_sequence = outcome.routing_sequence;
            record.graphed_containment = outcome.graphed;
            record.island_count = outcome.island_count;
            record.tray_systems = distinct(index, &listed, |e| e.tray_system.as_deref());
            record.containment_ratings = distinct(index, &listed, |e| e.rating.as_deref());
        }
        Err(err) => {
            warn!(cable = %cable.reference, error = %err, "cable routing failed");
            let assigned = assignment.ids();
            record.status = RouteStatus::ProcessingError;
            record.routing_sequence = format!("Error: {err}");
            record.tray_systems = distinct(index, &assigned, |e| e.tray_system.as_deref());
            record.containment_ratings = distinct(index, &assigned, |e| e.rating.as_deref());
        }
    }

    debug!(
        cable = %record.reference,
        status = %record.status,
        islands = record.island_count,
        total = record.total_length,
        "cable routed"
    );
    record
}

fn resolve_endpoint<'a>(index: &ProjectIndex<'a>, label: &'a str, cable: &str) -> Endpoint<'a> {
    let endpoint = Endpoint::new(label, index.resolve_equipment(label));
    if !endpoint.is_found() {
        let suggestions = index.equipment_suggestions(label, MAX_SUGGESTIONS);
        warn!(
            cable,
            label = label.trim(),
            suggestions = ?suggestions,
            "unknown equipment"
        );
    }
    endpoint
}

fn resolve_route(
    index: &ProjectIndex<'_>,
    start: &Endpoint<'_>,
    end: &Endpoint<'_>,
    assignment: &Assignment<'_>,
    config: &RouteConfig,
) -> Result<RouteOutcome> {
    let accuracy = select_accuracy(start, end, config)?;
    let graph = ContainmentGraph::scoped(&assignment.elements, index.connectivity())?;
    let island_count = group_into_islands(&graph).len();
    let formatter = RouteFormatter::new(&assignment.elements);
    let ctx = RouteContext {
        start,
        end,
        assigned: &assignment.elements,
        graph: &graph,
        accuracy,
    };

    let force_virtual = island_count > 1 || !start.is_found() || !end.is_found();
    if !force_virtual {
        if let Some(path) = find_confirmed_path(&ctx) {
            let description = formatter.segment(&path.elements);
            let routing_sequence = formatter.routing_sequence(
                start.display_name(),
                &[description],
                end.display_name(),
            );
            return Ok(RouteOutcome {
                status: RouteStatus::Confirmed,
                supported: path.cost,
                unsupported: 0.0,
                segments: vec![path],
                routing_sequence,
                graphed: graph.ids().to_vec(),
                island_count,
            });
        }
        debug!("no confirmed path, falling back to island stitching");
    }

    let result = find_best_disconnected_sequence(&ctx, &formatter);
    let (status, routing_sequence) = match result.status_message {
        Some(message) => (RouteStatus::VirtualPathError, message),
        None if start.is_found() && end.is_found() => {
            (RouteStatus::Unconfirmed, result.routing_sequence)
        }
        None => (RouteStatus::Incomplete, result.routing_sequence),
    };

    Ok(RouteOutcome {
        status,
        supported: result.supported_length,
        unsupported: result.virtual_length * config.contingency_factor,
        segments: result.segments,
        routing_sequence,
        graphed: graph.ids().to_vec(),
        island_count,
    })
}

/// High accuracy applies when both anchors are known and close together.
fn select_accuracy(
    start: &Endpoint<'_>,
    end: &Endpoint<'_>,
    config: &RouteConfig,
) -> Result<Accuracy> {
    for endpoint in [start, end] {
        if let Some(anchor) = endpoint.anchor() {
            if !anchor.is_finite() {
                return Err(Error::MalformedGeometry {
                    owner: format!("equipment '{}'", endpoint.display_name()),
                    message: "anchor coordinates are not finite".to_string(),
                });
            }
        }
    }

    let accuracy = match (start.anchor(), end.anchor()) {
        (Some(a), Some(b)) if a.distance_to(&b) < config.high_accuracy_threshold() => {
            Accuracy::High
        }
        _ => Accuracy::Standard,
    };
    Ok(accuracy)
}

/// Distinct non-empty values of `field` over `ids`, in first-seen order.
fn distinct<F>(index: &ProjectIndex<'_>, ids: &[ElementId], field: F) -> Vec<String>
where
    F: for<'e> Fn(&'e ContainmentElement) -> Option<&'e str>,
{
    let mut seen = HashSet::new();
    ids.iter()
        .filter_map(|id| index.element(*id))
        .filter_map(|element| field(element).map(str::trim))
        .filter(|value| !value.is_empty() && seen.insert(value.to_string()))
        .map(str::to_string)
        .collect()
}

/// Progress notification emitted after each cable.
#[derive(Debug, Clone, Copy)]
pub struct BatchProgress<'a> {
    pub completed: usize,
    pub total: usize,
    pub reference: &'a str,
    pub status: RouteStatus,
}

/// Records produced by a batch run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    pub records: Vec<CableRouteRecord>,
    /// Set when the run stopped early on request.
    pub cancelled: bool,
}

impl BatchReport {
    /// Number of records per status, ordered by status.
    pub fn status_counts(&self) -> BTreeMap<RouteStatus, usize> {
        let mut counts = BTreeMap::new();
        for record in &self.records {
            *counts.entry(record.status).or_insert(0) += 1;
        }
        counts
    }
}

/// Route every cable in order.
///
/// `cancel` is checked before each cable; once set, the records produced so
/// far are returned with [`BatchReport::cancelled`] set. Fails only when the
/// project itself is invalid.
pub fn route_cables<F>(
    project: &Project,
    cables: &[CableRecord],
    config: &RouteConfig,
    cancel: &AtomicBool,
    mut on_progress: F,
) -> Result<BatchReport>
where
    F: FnMut(&BatchProgress<'_>),
{
    project.validate()?;
    let index = ProjectIndex::new(project);
    let mut report = BatchReport {
        records: Vec::with_capacity(cables.len()),
        cancelled: false,
    };

    for cable in cables {
        if cancel.load(Ordering::Relaxed) {
            info!(
                completed = report.records.len(),
                total = cables.len(),
                "routing cancelled"
            );
            report.cancelled = true;
            break;
        }

        let record = route_cable(&index, cable, config);
        on_progress(&BatchProgress {
            completed: report.records.len() + 1,
            total: cables.len(),
            reference: &record.reference,
            status: record.status,
        });
        report.records.push(record);
    }

    info!(
        cables = report.records.len(),
        cancelled = report.cancelled,
        "routing batch finished"
    );
    Ok(report)
}

/// Island breakdown of a single cable's containment.
#[derive(Debug, Clone, Serialize)]
pub struct IslandReport {
    pub reference: String,
    pub accuracy: Accuracy,
    pub islands: Vec<Island>,
    /// Pre-assigned ids missing from the project.
    pub unknown_containment: Vec<ElementId>,
}

/// Group a cable's containment into islands and attach entry and exit
/// candidates to each, without routing.
pub fn inspect_islands(
    index: &ProjectIndex<'_>,
    cable: &CableRecord,
    config: &RouteConfig,
) -> Result<IslandReport> {
    let start = resolve_endpoint(index, &cable.from, &cable.reference);
    let end = resolve_endpoint(index, &cable.to, &cable.reference);
    let assignment = index.assigned_containment(cable);
    let accuracy = select_accuracy(&start, &end, config)?;
    let graph = ContainmentGraph::scoped(&assignment.elements, index.connectivity())?;

    let mut islands = group_into_islands(&graph);
    for island in &mut islands {
        let members: Vec<&ContainmentElement> = island
            .elements
            .iter()
            .filter_map(|id| index.element(*id))
            .collect();
        island.entry_points = find_entry_points(&start.matches, &members, accuracy);
        island.exit_points = find_entry_points(&end.matches, &members, accuracy);
    }

    Ok(IslandReport {
        reference: cable.reference.trim().to_string(),
        accuracy,
        islands,
        unknown_containment: assignment.unknown,
    })
}
