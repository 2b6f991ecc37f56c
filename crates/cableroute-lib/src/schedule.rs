//! Cable schedule loading.
//!
//! Schedules are CSV exports from whatever tool the electrical designer uses,
//! so headers are matched loosely against a list of synonyms.

use std::collections::BTreeMap;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, Trim};
use tracing::debug;

use crate::error::{Error, Result};
use crate::model::{CableRecord, ElementId};

/// Canonical field name and the header spellings accepted for it.
const SYNONYMS: &[(&str, &[&str])] = &[
    (
        "reference",
        &["cable reference", "cable_reference", "cable ref", "reference", "cable"],
    ),
    ("from", &["from", "swb from", "source"]),
    ("to", &["to", "swb to", "destination"]),
    (
        "containment",
        &["containment", "containment ids", "containment_ids"],
    ),
];

const REQUIRED: [&str; 3] = ["reference", "from", "to"];

/// Cables read from a schedule file, in file order.
#[derive(Debug, Clone, Default)]
pub struct CableSchedule {
    cables: Vec<CableRecord>,
    source: Option<PathBuf>,
}

impl CableSchedule {
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::CableScheduleNotFound {
                path: path.to_path_buf(),
            });
        }
        let file = fs::File::open(path)?;
        let mut schedule = Self::from_reader(file)?;
        schedule.source = Some(path.to_path_buf());
        debug!(path = %path.display(), cables = schedule.len(), "loaded cable schedule");
        Ok(schedule)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = ReaderBuilder::new()
            .trim(Trim::Fields)
            .flexible(true)
            .from_reader(reader);
        let headers = csv_reader.headers()?.clone();

        let normalized_headers: Vec<String> = headers.iter().map(normalize).collect();
        let mut index_map: BTreeMap<&str, usize> = BTreeMap::new();
        for (canon, alts) in SYNONYMS {
            'outer: for alt in *alts {
                let alt = normalize(alt);
                for (i, header) in normalized_headers.iter().enumerate() {
                    if *header == alt {
                        index_map.insert(*canon, i);
                        break 'outer;
                    }
                }
            }
        }

        let missing: Vec<&str> = REQUIRED
            .into_iter()
            .filter(|field| !index_map.contains_key(field))
            .collect();
        if !missing.is_empty() {
            return Err(Error::MissingColumns {
                missing: missing.join(", "),
                available: headers
                    .iter()
                    .map(|header| header.trim_start_matches('\u{feff}'))
                    .collect::<Vec<_>>()
                    .join(", "),
            });
        }

        let mut cables = Vec::new();
        let mut row: u64 = 1;
        for result in csv_reader.records() {
            row += 1;
            let record = result?;
            let get = |field: &str| -> String {
                index_map
                    .get(field)
                    .and_then(|&i| record.get(i))
                    .map(|s| s.trim().to_string())
                    .unwrap_or_default()
            };

            let (reference, from, to) = (get("reference"), get("from"), get("to"));
            if reference.is_empty() && from.is_empty() && to.is_empty() {
                continue;
            }
            if reference.is_empty() {
                return Err(Error::InvalidCableRow {
                    row,
                    message: "missing cable reference".to_string(),
                });
            }

            let containment = parse_containment(&get("containment")).map_err(|message| {
                Error::InvalidCableRow {
                    row,
                    message: format!("cable '{reference}': {message}"),
                }
            })?;
            cables.push(CableRecord::new(reference, from, to).with_containment(containment));
        }

        Ok(Self {
            cables,
            source: None,
        })
    }

    pub fn cables(&self) -> &[CableRecord] {
        &self.cables
    }

    pub fn into_cables(self) -> Vec<CableRecord> {
        self.cables
    }

    pub fn len(&self) -> usize {
        self.cables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cables.is_empty()
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Look up a cable by reference, ignoring case and surrounding whitespace.
    pub fn find(&self, reference: &str) -> Result<&CableRecord> {
        let wanted = reference.trim();
        self.cables
            .iter()
            .find(|cable| cable.reference.eq_ignore_ascii_case(wanted))
            .ok_or_else(|| Error::UnknownCable {
                reference: wanted.to_string(),
            })
    }
}

/// Load every cable from a schedule file.
pub fn load_cables(path: &Path) -> Result<Vec<CableRecord>> {
    CableSchedule::from_path(path).map(CableSchedule::into_cables)
}

fn normalize(header: &str) -> String {
    header
        .trim_start_matches('\u{feff}')
        .to_ascii_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect()
}

fn parse_containment(value: &str) -> std::result::Result<Vec<ElementId>, String> {
    value
        .split(|c: char| c == ';' || c == ',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<ElementId>()
                .map_err(|err| format!("invalid containment id '{part}': {err}"))
        })
        .collect()
}
