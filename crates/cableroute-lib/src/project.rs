//! Project files and the lookup index built over them.

use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::graph::Connectivity;
use crate::model::{CableRecord, ContainmentElement, ElementId, Equipment};

/// Minimum similarity for an equipment identifier to be offered as a suggestion.
const SUGGESTION_THRESHOLD: f64 = 0.7;

/// Everything the router needs to know about a building model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Project {
    #[serde(default)]
    pub equipment: Vec<Equipment>,
    #[serde(default)]
    pub containment: Vec<ContainmentElement>,
    /// Undirected adjacency between containment elements.
    #[serde(default)]
    pub connections: Vec<(ElementId, ElementId)>,
}

impl Project {
    /// Load and validate a JSON project file.
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::ProjectNotFound {
                path: path.to_path_buf(),
            });
        }
        let file = File::open(path)?;
        let project = Self::from_reader(BufReader::new(file))?;
        debug!(
            path = %path.display(),
            equipment = project.equipment.len(),
            containment = project.containment.len(),
            connections = project.connections.len(),
            "loaded project"
        );
        Ok(project)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let project: Self = serde_json::from_reader(reader)?;
        project.validate()?;
        Ok(project)
    }

    /// Reject projects whose containment identifiers are not unique.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::with_capacity(self.containment.len());
        for element in &self.containment {
            if !seen.insert(element.id) {
                return Err(Error::DuplicateElement { id: element.id });
            }
        }
        Ok(())
    }
}

/// Containment selected for one cable.
#[derive(Debug, Clone, Default)]
pub struct Assignment<'a> {
    /// Tag matches in project order, then pre-assigned ids in record order.
    pub elements: Vec<&'a ContainmentElement>,
    /// Pre-assigned ids with no matching element in the project.
    pub unknown: Vec<ElementId>,
}

impl Assignment<'_> {
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn ids(&self) -> Vec<ElementId> {
        self.elements.iter().map(|element| element.id).collect()
    }
}

/// Read-only lookups over a [`Project`], shared by every cable in a batch.
#[derive(Debug, Clone)]
pub struct ProjectIndex<'a> {
    project: &'a Project,
    elements: HashMap<ElementId, &'a ContainmentElement>,
    connectivity: Connectivity,
}

impl<'a> ProjectIndex<'a> {
    pub fn new(project: &'a Project) -> Self {
        let elements = project
            .containment
            .iter()
            .map(|element| (element.id, element))
            .collect();
        let connectivity = Connectivity::from_pairs(project.connections.iter().copied());
        Self {
            project,
            elements,
            connectivity,
        }
    }

    pub fn project(&self) -> &'a Project {
        self.project
    }

    pub fn element(&self, id: ElementId) -> Option<&'a ContainmentElement> {
        self.elements.get(&id).copied()
    }

    pub fn connectivity(&self) -> &Connectivity {
        &self.connectivity
    }

    /// Every equipment whose tag or name matches `label`, in project order.
    pub fn resolve_equipment(&self, label: &str) -> Vec<&'a Equipment> {
        self.project
            .equipment
            .iter()
            .filter(|equipment| equipment.matches_label(label))
            .collect()
    }

    /// Up to `limit` equipment identifiers resembling `label`, best first.
    pub fn equipment_suggestions(&self, label: &str, limit: usize) -> Vec<String> {
        let needle = label.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        let mut scored: Vec<(f64, &str)> = self
            .project
            .equipment
            .iter()
            .flat_map(Equipment::identifiers)
            .map(|identifier| {
                let score = strsim::jaro_winkler(&needle, &identifier.to_lowercase());
                (score, identifier)
            })
            .filter(|(score, _)| *score >= SUGGESTION_THRESHOLD)
            .collect();
        scored.sort_by(|a, b| b.0.total_cmp(&a.0));

        let mut suggestions: Vec<String> = Vec::new();
        for (_, identifier) in scored {
            if !suggestions.iter().any(|existing| existing == identifier) {
                suggestions.push(identifier.to_string());
            }
            if suggestions.len() == limit {
                break;
            }
        }
        suggestions
    }

    /// Containment assigned to `cable`: elements tagged with its reference
    /// followed by any pre-assigned ids not already included.
    pub fn assigned_containment(&self, cable: &CableRecord) -> Assignment<'a> {
        let mut assignment = Assignment::default();
        let mut seen = HashSet::new();

        for element in &self.project.containment {
            if element.is_tagged_for(&cable.reference) && seen.insert(element.id) {
                assignment.elements.push(element);
            }
        }

        for &id in &cable.containment {
            match self.element(id) {
                Some(element) => {
                    if seen.insert(id) {
                        assignment.elements.push(element);
                    }
                }
                None => {
                    if !assignment.unknown.contains(&id) {
                        assignment.unknown.push(id);
                    }
                }
            }
        }

        if !assignment.unknown.is_empty() {
            warn!(
                cable = %cable.reference,
                unknown = ?assignment.unknown,
                "cable lists containment ids missing from the project"
            );
        }
        assignment
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ContainmentKind;

    fn tray(id: ElementId, tag: &str) -> ContainmentElement {
        ContainmentElement::new(id, ContainmentKind::CableTray, 1.0).with_cable_tag(tag)
    }

    fn sample() -> Project {
        Project {
            equipment: vec![
                Equipment::new(1, "Main Switchboard").with_tag("MSB-01"),
                Equipment::new(2, "Distribution Board 2").with_tag("DB-02"),
                Equipment::new(3, "Distribution Board 20").with_tag("DB-20"),
            ],
            containment: vec![tray(10, "C1"), tray(11, "C2"), tray(12, "c1"), tray(13, "")],
            connections: vec![(10, 11), (11, 12)],
        }
    }

    #[test]
    fn parses_json_project() {
        let json = r#"{
            "equipment": [{ "id": 1, "tag": "MSB", "name": "Main", "anchor": [0.0, 0.0, 0.0] }],
            "containment": [
                { "id": 5, "kind": "cable_tray", "length": 2.5,
                  "curve": [[0.0, 0.0, 0.0], [2.5, 0.0, 0.0]], "cable_tags": ["C1"] }
            ],
            "connections": [[5, 6]]
        }"#;
        let project = Project::from_reader(json.as_bytes()).unwrap();
        assert_eq!(project.equipment[0].display_name(), "MSB");
        assert_eq!(project.containment[0].kind, ContainmentKind::CableTray);
        assert_eq!(project.connections, vec![(5, 6)]);
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let json = r#"{ "containment": [
            { "id": 1, "kind": "conduit", "length": 1.0 },
            { "id": 1, "kind": "conduit", "length": 2.0 }
        ] }"#;
        let err = Project::from_reader(json.as_bytes()).unwrap_err();
        assert!(matches!(err, Error::DuplicateElement { id: 1 }));
    }

    #[test]
    fn missing_file_is_reported() {
        let err = Project::from_path(Path::new("/nonexistent/project.json")).unwrap_err();
        assert!(matches!(err, Error::ProjectNotFound { .. }));
    }

    #[test]
    fn resolves_all_matching_equipment_in_order() {
        let project = sample();
        let index = ProjectIndex::new(&project);
        let ids: Vec<_> = index
            .resolve_equipment("db-0")
            .iter()
            .map(|equipment| equipment.id)
            .collect();
        assert_eq!(ids, vec![2]);
        assert_eq!(index.resolve_equipment("Distribution Board 2").len(), 2);
        assert!(index.resolve_equipment("   ").is_empty());
    }

    #[test]
    fn suggestions_rank_close_identifiers() {
        let project = sample();
        let index = ProjectIndex::new(&project);
        let suggestions = index.equipment_suggestions("MSB-10", 3);
        assert_eq!(suggestions.first().map(String::as_str), Some("MSB-01"));
        assert!(index.equipment_suggestions("", 3).is_empty());
    }

    #[test]
    fn assignment_unions_tags_then_record_ids() {
        let project = sample();
        let index = ProjectIndex::new(&project);
        let cable = CableRecord::new("C1", "MSB", "DB-02").with_containment([12, 13, 99, 99]);

        let assignment = index.assigned_containment(&cable);
        assert_eq!(assignment.ids(), vec![10, 12, 13]);
        assert_eq!(assignment.unknown, vec![99]);
    }

    #[test]
    fn untagged_cable_has_empty_assignment() {
        let project = sample();
        let index = ProjectIndex::new(&project);
        let assignment = index.assigned_containment(&CableRecord::new("C9", "MSB", "DB-02"));
        assert!(assignment.is_empty());
        assert!(assignment.unknown.is_empty());
    }
}
