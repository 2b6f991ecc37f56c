use std::cmp::Ordering;
use std::collections::BinaryHeap;

use serde::Serialize;

use crate::graph::ContainmentGraph;
use crate::model::ElementId;

/// Walk through the containment graph from a start element to an end element.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Path {
    pub elements: Vec<ElementId>,
    /// Accumulated node-weighted cost of reaching the last element. Every
    /// element except the last contributes its own length.
    pub cost: f64,
}

impl Path {
    pub fn first(&self) -> Option<ElementId> {
        self.elements.first().copied()
    }

    pub fn last(&self) -> Option<ElementId> {
        self.elements.last().copied()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

/// Run Dijkstra's algorithm from `start` to `end`.
///
/// Containment length is a node attribute, so leaving node `u` for any
/// neighbour costs `length_of(u)`. The start element is charged only when it is
/// left, and the end element is never charged. Ties between equal tentative
/// costs go to the element inserted into the graph first.
///
/// Returns `None` when either element is missing from the graph or `end` is
/// unreachable.
pub fn shortest_path(graph: &ContainmentGraph, start: ElementId, end: ElementId) -> Option<Path> {
    let source = graph.node_of(start)?;
    let target = graph.node_of(end)?;

    if source == target {
        return Some(Path {
            elements: vec![start],
            cost: 0.0,
        });
    }

    let mut distances = vec![f64::INFINITY; graph.len()];
    let mut parents: Vec<Option<usize>> = vec![None; graph.len()];
    let mut settled = vec![false; graph.len()];
    let mut queue = BinaryHeap::new();

    distances[source] = 0.0;
    queue.push(QueueEntry::new(source, 0.0));

    while let Some(entry) = queue.pop() {
        if settled[entry.node] {
            continue;
        }
        settled[entry.node] = true;

        if entry.node == target {
            return Some(Path {
                elements: reconstruct_path(graph, &parents, source, target),
                cost: distances[target],
            });
        }

        let leave_cost = distances[entry.node] + graph.length_at(entry.node);
        for &next in graph.neighbour_nodes(entry.node) {
            if settled[next] {
                continue;
            }
            if leave_cost < distances[next] {
                distances[next] = leave_cost;
                parents[next] = Some(entry.node);
                queue.push(QueueEntry::new(next, leave_cost));
            }
        }
    }

    None
}

fn reconstruct_path(
    graph: &ContainmentGraph,
    parents: &[Option<usize>],
    source: usize,
    target: usize,
) -> Vec<ElementId> {
    let mut path = Vec::new();
    let mut current = Some(target);
    while let Some(node) = current {
        path.push(graph.id_at(node));
        if node == source {
            break;
        }
        current = parents[node];
    }
    path.reverse();
    path
}

#[derive(Copy, Clone, Debug, Default)]
struct FloatOrd(f64);

impl PartialEq for FloatOrd {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FloatOrd {}

impl PartialOrd for FloatOrd {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FloatOrd {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
struct QueueEntry {
    node: usize,
    cost: FloatOrd,
}

impl QueueEntry {
    fn new(node: usize, cost: f64) -> Self {
        Self {
            node,
            cost: FloatOrd(cost),
        }
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering so BinaryHeap becomes a min-heap by cost, then by
        // insertion index.
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
