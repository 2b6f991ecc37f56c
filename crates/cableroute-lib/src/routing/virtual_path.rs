//! Best-effort routes across disconnected containment islands.
//!
//! When the start and end equipment do not sit on one connected network the
//! stitcher walks the islands greedily. It begins at the island closest to the
//! start equipment, routes through it, then jumps across the smallest gap to
//! the nearest island not yet visited. Gap lengths are inferred rather than
//! backed by modelled containment, so they are accumulated separately as the
//! virtual length.

use std::collections::HashMap;

use serde::Serialize;
use tracing::{debug, warn};

use crate::entry::find_entry_points;
use crate::geometry::BoundingBox;
use crate::islands::{group_into_islands, Island};
use crate::model::{ContainmentElement, ElementId};
use crate::output::RouteFormatter;
use crate::path::{shortest_path, Path};

use super::RouteContext;

/// Outcome of stitching a route across islands.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VirtualPathResult {
    /// Every routed element, segment after segment.
    pub stitched_path: Vec<ElementId>,
    /// One shortest path per visited island.
    pub segments: Vec<Path>,
    pub routing_sequence: String,
    /// Sum of inter-island jumps plus the final exit-to-equipment distance,
    /// before any contingency.
    pub virtual_length: f64,
    /// Node-weighted length routed through modelled containment.
    pub supported_length: f64,
    pub island_count: usize,
    /// Set when no stitched route could be produced.
    pub status_message: Option<String>,
}

impl VirtualPathResult {
    fn failed(island_count: usize, message: String) -> Self {
        warn!(island_count, %message, "virtual path failed");
        Self {
            island_count,
            status_message: Some(message),
            ..Self::default()
        }
    }

    pub fn is_success(&self) -> bool {
        self.status_message.is_none()
    }
}

/// Closest pair of elements between the current island and a remaining one.
#[derive(Debug, Clone, Copy)]
struct IslandHop {
    from: ElementId,
    island: usize,
    to: ElementId,
    distance: f64,
}

/// Stitch a route across the islands of the cable's assigned containment.
///
/// Expected failures (no islands, nothing near the start equipment, gaps that
/// cannot be measured) are reported through
/// [`VirtualPathResult::status_message`].
pub fn find_best_disconnected_sequence(
    ctx: &RouteContext<'_>,
    formatter: &RouteFormatter,
) -> VirtualPathResult {
    let mut islands = group_into_islands(ctx.graph);
    let island_count = islands.len();
    if islands.is_empty() {
        return VirtualPathResult::failed(0, "No containment islands to route through".into());
    }

    let lookup: HashMap<ElementId, &ContainmentElement> = ctx
        .assigned
        .iter()
        .map(|element| (element.id, *element))
        .collect();
    for island in &mut islands {
        let members: Vec<&ContainmentElement> = island
            .elements
            .iter()
            .filter_map(|id| lookup.get(id).copied())
            .collect();
        island.entry_points = find_entry_points(&ctx.start.matches, &members, ctx.accuracy);
        island.exit_points = find_entry_points(&ctx.end.matches, &members, ctx.accuracy);
    }

    let mut remaining: Vec<Island> = islands
        .into_iter()
        .filter(|island| !island.entry_points.is_empty())
        .collect();
    let Some(first) = closest_to_start(&remaining) else {
        return VirtualPathResult::failed(
            island_count,
            format!("No containment found near start equipment '{}'", ctx.start.label),
        );
    };

    let bounds: HashMap<ElementId, BoundingBox> = lookup
        .iter()
        .filter_map(|(id, element)| element.bounds().map(|bounds| (*id, bounds)))
        .collect();

    let mut current = remaining.remove(first);
    let Some(mut entry) = current.best_entry().map(|candidate| candidate.id) else {
        return VirtualPathResult::failed(island_count, "Start island has no entry point".into());
    };
    let mut segments = Vec::new();
    let mut virtual_length = 0.0;

    loop {
        if remaining.is_empty() {
            // An unresolved end label stops the route at the island's entry
            // element. Resolved equipment with nothing nearby is a failure.
            let (exit, tail) = match current.best_exit() {
                Some(candidate) => (candidate.id, candidate.distance),
                None if ctx.end.is_found() => {
                    return VirtualPathResult::failed(
                        island_count,
                        format!(
                            "No containment found near end equipment '{}'",
                            ctx.end.label
                        ),
                    );
                }
                None => (entry, 0.0),
            };
            let Some(segment) = shortest_path(ctx.graph, entry, exit) else {
                return VirtualPathResult::failed(
                    island_count,
                    format!("No path between elements {entry} and {exit}"),
                );
            };
            segments.push(segment);
            virtual_length += tail;
            break;
        }

        let Some(hop) = nearest_island(&current, &remaining, &bounds) else {
            return VirtualPathResult::failed(
                island_count,
                "Unable to measure the gap to the next containment island".into(),
            );
        };
        let Some(segment) = shortest_path(ctx.graph, entry, hop.from) else {
            return VirtualPathResult::failed(
                island_count,
                format!("No path between elements {entry} and {}", hop.from),
            );
        };
        debug!(
            from = hop.from,
            to = hop.to,
            gap = hop.distance,
            "jumping to next island"
        );
        segments.push(segment);
        virtual_length += hop.distance;
        current = remaining.remove(hop.island);
        entry = hop.to;
    }

    let descriptions: Vec<String> = segments
        .iter()
        .map(|segment| formatter.segment(&segment.elements))
        .collect();
    let routing_sequence = formatter.routing_sequence(
        ctx.start.display_name(),
        &descriptions,
        ctx.end.display_name(),
    );

    VirtualPathResult {
        stitched_path: segments
            .iter()
            .flat_map(|segment| segment.elements.iter().copied())
            .collect(),
        supported_length: segments.iter().map(|segment| segment.cost).sum(),
        segments,
        routing_sequence,
        virtual_length,
        island_count,
        status_message: None,
    }
}

/// Index of the island whose best entry point is nearest the start equipment.
fn closest_to_start(islands: &[Island]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (index, island) in islands.iter().enumerate() {
        let Some(entry) = island.best_entry() else {
            continue;
        };
        if best.map_or(true, |(_, distance)| entry.distance < distance) {
            best = Some((index, entry.distance));
        }
    }
    best.map(|(index, _)| index)
}

/// Nearest bounding-box pair between `current` and any island in `remaining`.
/// Every element pair is compared; the first minimum wins ties.
fn nearest_island(
    current: &Island,
    remaining: &[Island],
    bounds: &HashMap<ElementId, BoundingBox>,
) -> Option<IslandHop> {
    let mut best: Option<IslandHop> = None;
    for (index, other) in remaining.iter().enumerate() {
        for from in &current.elements {
            let Some(from_bounds) = bounds.get(from) else {
                continue;
            };
            for to in &other.elements {
                let Some(to_bounds) = bounds.get(to) else {
                    continue;
                };
                let distance = from_bounds.distance_to_box(to_bounds);
                if !distance.is_finite() {
                    continue;
                }
                if best.map_or(true, |hop| distance < hop.distance) {
                    best = Some(IslandHop {
                        from: *from,
                        island: index,
                        to: *to,
                        distance,
                    });
                }
            }
        }
    }
    best
}
