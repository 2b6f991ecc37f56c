//! Domain types shared across the routing pipeline.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geometry::{BoundingBox, Point3};

/// Numeric identifier for a containment element.
pub type ElementId = i64;

/// Physical category of a containment element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContainmentKind {
    CableTray,
    Conduit,
    CableTrayFitting,
    ConduitFitting,
}

impl ContainmentKind {
    /// Runs (trays and conduits) carry a centre-line curve; fittings do not.
    pub fn is_linear(self) -> bool {
        matches!(self, ContainmentKind::CableTray | ContainmentKind::Conduit)
    }
}

impl fmt::Display for ContainmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            ContainmentKind::CableTray => "cable tray",
            ContainmentKind::Conduit => "conduit",
            ContainmentKind::CableTrayFitting => "cable tray fitting",
            ContainmentKind::ConduitFitting => "conduit fitting",
        };
        f.write_str(value)
    }
}

/// A tray, conduit or fitting capable of carrying cables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainmentElement {
    pub id: ElementId,
    pub kind: ContainmentKind,
    /// Length in the graph's native unit.
    pub length: f64,
    /// Centre-line polyline of a run.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub curve: Vec<Point3>,
    /// Insertion point, usually present on fittings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Point3>,
    /// Connector origins.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub connectors: Vec<Point3>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounding_box: Option<BoundingBox>,
    /// Cable reference slots used to assign the element to cables.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cable_tags: Vec<String>,
    /// Short label shown in routing sequences.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tray_system: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<String>,
}

impl ContainmentElement {
    pub fn new(id: ElementId, kind: ContainmentKind, length: f64) -> Self {
        Self {
            id,
            kind,
            length,
            curve: Vec::new(),
            location: None,
            connectors: Vec::new(),
            bounding_box: None,
            cable_tags: Vec::new(),
            label: None,
            tray_system: None,
            rating: None,
        }
    }

    pub fn with_curve(mut self, curve: Vec<Point3>) -> Self {
        self.curve = curve;
        self
    }

    pub fn with_location(mut self, location: Point3) -> Self {
        self.location = Some(location);
        self
    }

    pub fn with_connectors(mut self, connectors: Vec<Point3>) -> Self {
        self.connectors = connectors;
        self
    }

    pub fn with_bounding_box(mut self, bounds: BoundingBox) -> Self {
        self.bounding_box = Some(bounds);
        self
    }

    pub fn with_cable_tag(mut self, tag: impl Into<String>) -> Self {
        self.cable_tags.push(tag.into());
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_tray_system(mut self, system: impl Into<String>) -> Self {
        self.tray_system = Some(system.into());
        self
    }

    pub fn with_rating(mut self, rating: impl Into<String>) -> Self {
        self.rating = Some(rating.into());
        self
    }

    /// Explicit bounding box, or one derived from the curve, location and
    /// connectors when none was supplied.
    pub fn bounds(&self) -> Option<BoundingBox> {
        if let Some(bounds) = self.bounding_box {
            return Some(BoundingBox::new(bounds.min, bounds.max));
        }
        BoundingBox::from_points(
            self.curve
                .iter()
                .chain(self.location.iter())
                .chain(self.connectors.iter()),
        )
    }

    /// Whether any tag slot names `reference` (trimmed, case-insensitive).
    pub fn is_tagged_for(&self, reference: &str) -> bool {
        let reference = reference.trim();
        !reference.is_empty()
            && self
                .cable_tags
                .iter()
                .any(|tag| tag.trim().eq_ignore_ascii_case(reference))
    }

    /// Label used in routing sequences; falls back to the identifier.
    pub fn display_label(&self) -> String {
        match self.label.as_deref().map(str::trim) {
            Some(label) if !label.is_empty() => label.to_string(),
            _ => self.id.to_string(),
        }
    }
}

/// A piece of equipment a cable starts or ends at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Equipment {
    pub id: i64,
    /// Preferred identifier, such as a panel tag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    /// Fallback display name.
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchor: Option<Point3>,
}

impl Equipment {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            tag: None,
            name: name.into(),
            anchor: None,
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn with_anchor(mut self, anchor: Point3) -> Self {
        self.anchor = Some(anchor);
        self
    }

    /// Identifying strings in preference order: tag, then display name.
    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.tag
            .as_deref()
            .into_iter()
            .chain(std::iter::once(self.name.as_str()))
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }

    /// Fuzzy match used to resolve cable endpoints: either string contains the
    /// other after trimming, ignoring case.
    pub fn matches_label(&self, label: &str) -> bool {
        let label = label.trim().to_lowercase();
        if label.is_empty() {
            return false;
        }
        self.identifiers().any(|identifier| {
            let identifier = identifier.to_lowercase();
            identifier.contains(&label) || label.contains(&identifier)
        })
    }

    pub fn display_name(&self) -> &str {
        self.identifiers().next().unwrap_or("")
    }
}

/// One row of the cable schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CableRecord {
    pub reference: String,
    pub from: String,
    pub to: String,
    /// Containment identifiers assigned up front, in addition to tag matches.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub containment: Vec<ElementId>,
}

impl CableRecord {
    pub fn new(
        reference: impl Into<String>,
        from: impl Into<String>,
        to: impl Into<String>,
    ) -> Self {
        Self {
            reference: reference.into(),
            from: from.into(),
            to: to.into(),
            containment: Vec::new(),
        }
    }

    pub fn with_containment(mut self, ids: impl IntoIterator<Item = ElementId>) -> Self {
        self.containment.extend(ids);
        self
    }
}
