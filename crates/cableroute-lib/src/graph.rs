use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::model::{ContainmentElement, ElementId};

/// Project-wide "which element touches which" relation.
///
/// This is supplied with the project rather than derived from geometry. It is
/// symmetric: declaring `(a, b)` also links `b` to `a`.
#[derive(Debug, Clone, Default)]
pub struct Connectivity {
    adjacency: Arc<HashMap<ElementId, Vec<ElementId>>>,
}

impl Connectivity {
    /// Build the relation from undirected pairs. Self-links and repeated pairs
    /// are dropped; neighbour lists keep first-declared order.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (ElementId, ElementId)>,
    {
        let mut adjacency: HashMap<ElementId, Vec<ElementId>> = HashMap::new();
        for (a, b) in pairs {
            if a == b {
                continue;
            }
            link(&mut adjacency, a, b);
            link(&mut adjacency, b, a);
        }
        Self {
            adjacency: Arc::new(adjacency),
        }
    }

    /// Return the neighbours of an element.
    pub fn neighbours(&self, id: ElementId) -> &[ElementId] {
        self.adjacency.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(Vec::len).sum::<usize>() / 2
    }
}

fn link(adjacency: &mut HashMap<ElementId, Vec<ElementId>>, from: ElementId, to: ElementId) {
    let entry = adjacency.entry(from).or_default();
    if !entry.contains(&to) {
        entry.push(to);
    }
}

/// Containment graph scoped to the elements assigned to a single cable.
///
/// Nodes live in an index arena in insertion order. Insertion order is the
/// order the assigned elements were supplied in, and every traversal that needs
/// a tie-break uses it. Adjacency lists hold arena indices sorted ascending.
#[derive(Debug, Clone, Default)]
pub struct ContainmentGraph {
    ids: Vec<ElementId>,
    lengths: Vec<f64>,
    index: HashMap<ElementId, usize>,
    adjacency: Vec<Vec<usize>>,
}

impl ContainmentGraph {
    /// Build the graph for one cable from its assigned elements and the
    /// project connectivity. Links to elements outside `elements` are ignored.
    pub fn scoped(elements: &[&ContainmentElement], connectivity: &Connectivity) -> Result<Self> {
        let mut graph = Self::default();
        for element in elements {
            graph.insert(element.id, element.length)?;
        }
        for node in 0..graph.ids.len() {
            let id = graph.ids[node];
            for neighbour in connectivity.neighbours(id) {
                if let Some(&other) = graph.index.get(neighbour) {
                    graph.connect(node, other);
                }
            }
        }
        graph.finish();
        Ok(graph)
    }

    /// Build a graph directly from `(id, length)` nodes and undirected edges.
    /// Edges naming unknown nodes are ignored.
    pub fn from_parts<N, E>(nodes: N, edges: E) -> Result<Self>
    where
        N: IntoIterator<Item = (ElementId, f64)>,
        E: IntoIterator<Item = (ElementId, ElementId)>,
    {
        let mut graph = Self::default();
        for (id, length) in nodes {
            graph.insert(id, length)?;
        }
        for (a, b) in edges {
            if let (Some(&a), Some(&b)) = (graph.index.get(&a), graph.index.get(&b)) {
                graph.connect(a, b);
            }
        }
        graph.finish();
        Ok(graph)
    }

    fn insert(&mut self, id: ElementId, length: f64) -> Result<()> {
        if !length.is_finite() || length < 0.0 {
            return Err(Error::InvalidLength { id, length });
        }
        if self.index.contains_key(&id) {
            return Ok(());
        }
        self.index.insert(id, self.ids.len());
        self.ids.push(id);
        self.lengths.push(length);
        self.adjacency.push(Vec::new());
        Ok(())
    }

    fn connect(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        self.adjacency[a].push(b);
        self.adjacency[b].push(a);
    }

    fn finish(&mut self) {
        for neighbours in &mut self.adjacency {
            neighbours.sort_unstable();
            neighbours.dedup();
        }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.index.contains_key(&id)
    }

    /// Element identifiers in insertion order.
    pub fn ids(&self) -> &[ElementId] {
        &self.ids
    }

    pub fn length_of(&self, id: ElementId) -> Option<f64> {
        self.index.get(&id).map(|&node| self.lengths[node])
    }

    /// Return the neighbours of an element in insertion order.
    pub fn neighbours(&self, id: ElementId) -> impl Iterator<Item = ElementId> + '_ {
        self.index
            .get(&id)
            .map(|&node| self.adjacency[node].as_slice())
            .unwrap_or(&[])
            .iter()
            .map(|&other| self.ids[other])
    }

    /// Sum of the lengths of every element on `path`. Unknown ids count as zero.
    pub fn path_length(&self, path: &[ElementId]) -> f64 {
        path.iter().filter_map(|&id| self.length_of(id)).sum()
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(Vec::len).sum::<usize>() / 2
    }

    pub(crate) fn node_of(&self, id: ElementId) -> Option<usize> {
        self.index.get(&id).copied()
    }

    pub(crate) fn id_at(&self, node: usize) -> ElementId {
        self.ids[node]
    }

    pub(crate) fn length_at(&self, node: usize) -> f64 {
        self.lengths[node]
    }

    pub(crate) fn neighbour_nodes(&self, node: usize) -> &[usize] {
        &self.adjacency[node]
    }
}
