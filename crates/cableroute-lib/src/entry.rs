//! Ranking containment elements by proximity to a piece of equipment.

use serde::Serialize;

use crate::geometry::{element_distance, Accuracy};
use crate::model::{ContainmentElement, ElementId, Equipment};

/// Number of entry/exit candidates kept per query.
pub const MAX_CANDIDATES: usize = 3;

/// A containment element proposed as the connection point to equipment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Candidate {
    pub id: ElementId,
    pub distance: f64,
}

/// Return up to [`MAX_CANDIDATES`] elements nearest to the equipment anchor,
/// ordered by ascending distance. Equal distances keep input order.
///
/// Only the first equipment in `anchor_equipment` is consulted, even when a
/// label matched several. Elements whose distance cannot be computed are left
/// out. An anchorless first match yields no candidates.
pub fn find_entry_points(
    anchor_equipment: &[&Equipment],
    candidates: &[&ContainmentElement],
    accuracy: Accuracy,
) -> Vec<Candidate> {
    let Some(anchor) = anchor_equipment.first().and_then(|equipment| equipment.anchor) else {
        return Vec::new();
    };

    let mut ranked: Vec<Candidate> = candidates
        .iter()
        .filter_map(|element| {
            element_distance(&anchor, element, accuracy).map(|distance| Candidate {
                id: element.id,
                distance,
            })
        })
        .collect();

    ranked.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    ranked.truncate(MAX_CANDIDATES);
    ranked
}
