//! Cable containment routing library.
//!
//! This crate resolves how each cable in a schedule travels through the tray
//! and conduit network of a building model. It loads the project and the
//! cable schedule, builds a per-cable containment graph, and produces a report
//! row per cable with a routing sequence and a length estimate, even when the
//! containment is fragmented. Higher-level consumers (the CLI) should only
//! depend on the functions exported here instead of reimplementing behavior.
//!

#![deny(warnings)]

pub mod config;
pub mod entry;
pub mod error;
pub mod geometry;
pub mod graph;
pub mod islands;
pub mod model;
pub mod output;
pub mod path;
pub mod project;
pub mod routing;
pub mod schedule;

pub use config::{LengthUnit, RouteConfig, CONTINGENCY_FACTOR, HIGH_ACCURACY_THRESHOLD_M};
pub use entry::{find_entry_points, Candidate, MAX_CANDIDATES};
pub use error::{Error, Result};
pub use geometry::{Accuracy, BoundingBox, Point3};
pub use graph::{Connectivity, ContainmentGraph};
pub use islands::{group_into_islands, Island};
pub use model::{CableRecord, ContainmentElement, ContainmentKind, ElementId, Equipment};
pub use output::{write_report, ReportFormat, RouteFormatter, REPORT_HEADER};
pub use path::{shortest_path, Path};
pub use project::{Assignment, Project, ProjectIndex};
pub use routing::{
    find_best_disconnected_sequence, find_confirmed_path, inspect_islands, route_cable,
    route_cables, BatchProgress, BatchReport, CableRouteRecord, Endpoint, IslandReport,
    MatchStatus, RouteContext, RouteStatus, VirtualPathResult,
};
pub use schedule::{load_cables, CableSchedule};
