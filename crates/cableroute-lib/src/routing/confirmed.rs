//! Best path inside a single connected containment network.

use tracing::debug;

use crate::entry::find_entry_points;
use crate::path::{shortest_path, Path};

use super::RouteContext;

/// Try every entry × exit combination (at most nine searches) and keep the
/// path whose summed element length is lowest. The first minimum found wins
/// ties.
///
/// Entry and exit candidates often overlap, and a path that starts and ends
/// on the same element carries no routed length. Such single-element paths
/// only win when no combination spans two or more elements.
///
/// Returns `None` when either endpoint has no candidates or no combination is
/// connected.
pub fn find_confirmed_path(ctx: &RouteContext<'_>) -> Option<Path> {
    let entries = find_entry_points(&ctx.start.matches, ctx.assigned, ctx.accuracy);
    let exits = find_entry_points(&ctx.end.matches, ctx.assigned, ctx.accuracy);
    if entries.is_empty() || exits.is_empty() {
        debug!(
            entries = entries.len(),
            exits = exits.len(),
            "no confirmed path candidates"
        );
        return None;
    }

    let mut best: Option<((bool, f64), Path)> = None;
    for entry in &entries {
        for exit in &exits {
            let Some(path) = shortest_path(ctx.graph, entry.id, exit.id) else {
                continue;
            };
            let key = (path.len() < 2, ctx.graph.path_length(&path.elements));
            if best.as_ref().map_or(true, |(current, _)| ranks_before(key, *current)) {
                best = Some((key, path));
            }
        }
    }

    best.map(|((_, total), path)| {
        debug!(
            from = ?path.first(),
            to = ?path.last(),
            total,
            cost = path.cost,
            "confirmed path selected"
        );
        path
    })
}

fn ranks_before((single, total): (bool, f64), (best_single, best_total): (bool, f64)) -> bool {
    match (single, best_single) {
        (false, true) => true,
        (true, false) => false,
        _ => total < best_total,
    }
}
