//! Secondary lookup index over one graph snapshot.
//!
//! # Responsibility
//! - Map element ids to their node/edge slot in the owning `Graph`.
//! - Map sub-part ids (labels) to their enclosing node or edge.
//! - Answer incident-edge queries per node.
//!
//! # Invariants
//! - After `rebuild` or any engine mutation the index holds exactly the ids
//!   present in the graph; no stale or missing entries.
//! - Incident edges are returned in edge source order.

use crate::model::graph::{ElementId, Edge, Graph, Node};
use crate::view::label_id;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Node(usize),
    Edge(usize),
}

/// Borrowed view of one indexed element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ElementRef<'g> {
    Node(&'g Node),
    Edge(&'g Edge),
}

impl<'g> ElementRef<'g> {
    pub fn id(&self) -> &'g str {
        match self {
            Self::Node(node) => node.id.as_str(),
            Self::Edge(edge) => edge.id.as_str(),
        }
    }

    pub fn as_node(&self) -> Option<&'g Node> {
        match self {
            Self::Node(node) => Some(node),
            Self::Edge(_) => None,
        }
    }

    pub fn as_edge(&self) -> Option<&'g Edge> {
        match self {
            Self::Node(_) => None,
            Self::Edge(edge) => Some(edge),
        }
    }
}

/// Edge direction relative to one node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Incoming,
    Outgoing,
    Both,
}

/// Id → element index for one graph.
#[derive(Debug, Clone, Default)]
pub struct ModelIndex {
    slots: HashMap<ElementId, Slot>,
    sub_parts: HashMap<ElementId, ElementId>,
}

impl ModelIndex {
    /// Builds a fresh index for `graph`.
    pub fn new(graph: &Graph) -> Self {
        let mut index = Self::default();
        index.rebuild(graph);
        index
    }

    /// Clears and repopulates the index from every node and edge of `graph`.
    pub fn rebuild(&mut self, graph: &Graph) {
        self.slots.clear();
        self.sub_parts.clear();
        self.slots.reserve(graph.element_count());

        for (position, node) in graph.nodes.iter().enumerate() {
            self.register_node(node, position);
        }
        for (position, edge) in graph.edges.iter().enumerate() {
            self.register_edge(edge, position);
        }
    }

    /// Registers the node appended last to `graph.nodes`.
    pub(crate) fn push_node(&mut self, graph: &Graph) {
        if let Some(node) = graph.nodes.last() {
            self.register_node(node, graph.nodes.len() - 1);
        }
    }

    /// Registers the edge appended last to `graph.edges`.
    pub(crate) fn push_edge(&mut self, graph: &Graph) {
        if let Some(edge) = graph.edges.last() {
            self.register_edge(edge, graph.edges.len() - 1);
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.slots.contains_key(id)
    }

    /// Resolves `id` to the node or edge it names directly.
    pub fn lookup<'g>(&self, graph: &'g Graph, id: &str) -> Option<ElementRef<'g>> {
        match self.slots.get(id)? {
            Slot::Node(position) => graph
                .nodes
                .get(*position)
                .filter(|node| node.id == id)
                .map(ElementRef::Node),
            Slot::Edge(position) => graph
                .edges
                .get(*position)
                .filter(|edge| edge.id == id)
                .map(ElementRef::Edge),
        }
    }

    /// Resolves `id` directly, then falls back to the node or edge that
    /// encloses a sub-part such as a label.
    pub fn resolve_enclosing<'g>(&self, graph: &'g Graph, id: &str) -> Option<ElementRef<'g>> {
        if let Some(element) = self.lookup(graph, id) {
            return Some(element);
        }
        let owner = self.sub_parts.get(id)?;
        self.lookup(graph, owner)
    }

    /// Returns edges incident to `node_id` in edge source order.
    ///
    /// `Direction::Both` yields incoming edges first, then outgoing edges;
    /// a self-loop appears once.
    pub fn incident_edges<'g>(
        &self,
        graph: &'g Graph,
        node_id: &str,
        direction: Direction,
    ) -> Vec<&'g Edge> {
        if !matches!(self.slots.get(node_id), Some(Slot::Node(_))) {
            return Vec::new();
        }

        let incoming = graph.edges.iter().filter(|edge| edge.target_id == node_id);
        let outgoing = graph.edges.iter().filter(|edge| edge.source_id == node_id);
        match direction {
            Direction::Incoming => incoming.collect(),
            Direction::Outgoing => outgoing.collect(),
            Direction::Both => {
                let mut edges: Vec<&Edge> = incoming.collect();
                edges.extend(outgoing.filter(|edge| edge.target_id != node_id));
                edges
            }
        }
    }

    fn register_node(&mut self, node: &Node, position: usize) {
        self.slots.insert(node.id.clone(), Slot::Node(position));
        self.sub_parts.insert(label_id(&node.id), node.id.clone());
    }

    fn register_edge(&mut self, edge: &Edge, position: usize) {
        self.slots.insert(edge.id.clone(), Slot::Edge(position));
        if edge.label.is_some() {
            self.sub_parts.insert(label_id(&edge.id), edge.id.clone());
        }
    }
}
