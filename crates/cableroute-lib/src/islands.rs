//! Partitioning a cable's containment into connected islands.

use std::collections::VecDeque;

use serde::Serialize;

use crate::entry::Candidate;
use crate::graph::ContainmentGraph;
use crate::model::ElementId;

/// A maximal set of containment elements reachable from one another without
/// leaving the cable's assigned subset.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Island {
    /// Members in breadth-first discovery order.
    pub elements: Vec<ElementId>,
    /// Candidates nearest the start equipment.
    pub entry_points: Vec<Candidate>,
    /// Candidates nearest the end equipment.
    pub exit_points: Vec<Candidate>,
}

impl Island {
    pub fn contains(&self, id: ElementId) -> bool {
        self.elements.contains(&id)
    }

    pub fn best_entry(&self) -> Option<Candidate> {
        self.entry_points.first().copied()
    }

    pub fn best_exit(&self) -> Option<Candidate> {
        self.exit_points.first().copied()
    }
}

/// Group every element of `graph` into islands.
///
/// Seeds are taken in the graph's insertion order and neighbours are enqueued
/// in insertion order, so the result is deterministic. Elements without
/// neighbours form singleton islands. An empty graph yields no islands.
pub fn group_into_islands(graph: &ContainmentGraph) -> Vec<Island> {
    let mut visited = vec![false; graph.len()];
    let mut islands = Vec::new();
    let mut queue = VecDeque::new();

    for seed in 0..graph.len() {
        if visited[seed] {
            continue;
        }
        visited[seed] = true;
        queue.push_back(seed);

        let mut elements = Vec::new();
        while let Some(node) = queue.pop_front() {
            elements.push(graph.id_at(node));
            for &next in graph.neighbour_nodes(node) {
                if !visited[next] {
                    visited[next] = true;
                    queue.push_back(next);
                }
            }
        }

        islands.push(Island {
            elements,
            ..Island::default()
        });
    }

    islands
}
