use std::path::PathBuf;

use thiserror::Error;

use crate::model::ElementId;

/// Convenient result alias for the cable routing library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
///
/// Expected routing outcomes (missing containment, unreachable islands,
/// equipment that cannot be found) are reported through
/// [`RouteStatus`](crate::routing::RouteStatus) instead. The variants below are
/// either batch-fatal input problems or per-cable failures that the batch loop
/// downgrades to a `Processing Error` record.
#[derive(Debug, Error)]
pub enum Error {
    /// Project file could not be located at the given path.
    #[error("project file not found at {path}")]
    ProjectNotFound { path: PathBuf },

    /// Cable schedule could not be located at the given path.
    #[error("cable schedule not found at {path}")]
    CableScheduleNotFound { path: PathBuf },

    /// The cable schedule header lacks a required column.
    #[error("cable schedule missing required columns: {missing}. Available: {available}")]
    MissingColumns { missing: String, available: String },

    /// A cable schedule row could not be interpreted.
    #[error("invalid cable schedule row {row}: {message}")]
    InvalidCableRow { row: u64, message: String },

    /// The same containment identifier appears more than once in a project.
    #[error("duplicate containment element id {id}")]
    DuplicateElement { id: ElementId },

    /// A containment element carries a length the shortest-path engine cannot use.
    #[error("containment element {id} has invalid length {length}")]
    InvalidLength { id: ElementId, length: f64 },

    /// Geometry attached to an element or equipment is unusable.
    #[error("malformed geometry on {owner}: {message}")]
    MalformedGeometry { owner: String, message: String },

    /// An equipment label that matched nothing, with the closest identifiers.
    ///
    /// Batch routing never returns this: an unresolved endpoint is recorded on
    /// the cable's row and logged. Callers that need a hard failure for a label
    /// build it from [`ProjectIndex::equipment_suggestions`].
    ///
    /// [`ProjectIndex::equipment_suggestions`]: crate::ProjectIndex::equipment_suggestions
    #[error("unknown equipment: {label}{}", format_suggestions(.suggestions))]
    UnknownEquipment {
        label: String,
        suggestions: Vec<String>,
    },

    /// Raised when a cable reference is not present in the schedule.
    #[error("cable {reference} not found in schedule")]
    UnknownCable { reference: String },

    /// Wrapper for IO errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Wrapper for CSV parsing and writing errors.
    #[error(transparent)]
    Csv(#[from] csv::Error),

    /// Wrapper for JSON parsing and writing errors.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

fn format_suggestions(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else if suggestions.len() == 1 {
        format!(". Did you mean '{}'?", suggestions[0])
    } else {
        format!(
            ". Did you mean one of: {}?",
            suggestions
                .iter()
                .map(|s| format!("'{}'", s))
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}
