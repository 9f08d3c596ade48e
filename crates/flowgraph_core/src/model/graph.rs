//! Graph, node and edge records.
//!
//! # Responsibility
//! - Own every node and edge of one diagram.
//! - Provide structural validation used at every load boundary.
//!
//! # Invariants
//! - `id` values are unique across nodes and edges of one graph.
//! - Edge endpoints reference nodes of the same graph.
//! - Nodes and edges never exist outside a `Graph`.

use crate::model::kind::{EdgeKind, NodeKind, Probability};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Opaque element identifier, unique within one graph.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type ElementId = String;

/// Generates a fresh element or graph id.
pub fn generate_id() -> ElementId {
    Uuid::new_v4().to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn is_finite(&self) -> bool {
        self.width.is_finite() && self.height.is_finite()
    }
}

/// Task, category or activity node.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: ElementId,
    pub kind: NodeKind,
    pub name: String,
    pub position: Position,
    /// `None` leaves sizing to the client layout.
    pub size: Option<Size>,
}

impl Node {
    pub fn new(
        id: impl Into<ElementId>,
        kind: NodeKind,
        name: impl Into<String>,
        position: Position,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            name: name.into(),
            position,
            size: None,
        }
    }

    pub fn with_size(mut self, size: Size) -> Self {
        self.size = Some(size);
        self
    }
}

/// Directed edge between two nodes of the same graph.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub id: ElementId,
    pub kind: EdgeKind,
    pub source_id: ElementId,
    pub target_id: ElementId,
    pub label: Option<String>,
    /// Meaningful only when `kind.is_weighted()`.
    pub probability: Option<Probability>,
}

impl Edge {
    pub fn new(
        id: impl Into<ElementId>,
        kind: EdgeKind,
        source_id: impl Into<ElementId>,
        target_id: impl Into<ElementId>,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            source_id: source_id.into(),
            target_id: target_id.into(),
            label: None,
            probability: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_probability(mut self, probability: Probability) -> Self {
        self.probability = Some(probability);
        self
    }

    /// Returns whether `node_id` is either endpoint of this edge.
    pub fn touches(&self, node_id: &str) -> bool {
        self.source_id == node_id || self.target_id == node_id
    }
}

/// Structural invariant violations found by `Graph::validate`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphValidationError {
    /// Graph, node or edge id is blank.
    EmptyId,
    /// Two elements share one id.
    DuplicateId(ElementId),
    /// Edge source does not reference a node of the graph.
    DanglingSource { edge_id: ElementId, source_id: ElementId },
    /// Edge target does not reference a node of the graph.
    DanglingTarget { edge_id: ElementId, target_id: ElementId },
    /// Node position or size is NaN or infinite.
    NonFiniteGeometry(ElementId),
}

impl Display for GraphValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyId => write!(f, "graph element id must not be blank"),
            Self::DuplicateId(id) => write!(f, "duplicate element id `{id}`"),
            Self::DanglingSource { edge_id, source_id } => write!(
                f,
                "edge `{edge_id}` references missing source node `{source_id}`"
            ),
            Self::DanglingTarget { edge_id, target_id } => write!(
                f,
                "edge `{edge_id}` references missing target node `{target_id}`"
            ),
            Self::NonFiniteGeometry(id) => {
                write!(f, "node `{id}` has a non-finite position or size")
            }
        }
    }
}

impl Error for GraphValidationError {}

/// Complete domain model of one diagram.
#[derive(Debug, Clone, PartialEq)]
pub struct Graph {
    pub id: ElementId,
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl Graph {
    /// Creates an empty graph with a freshly generated id.
    pub fn empty() -> Self {
        Self::with_id(generate_id())
    }

    /// Creates an empty graph with a caller-provided id.
    pub fn with_id(id: impl Into<ElementId>) -> Self {
        Self {
            id: id.into(),
            nodes: Vec::new(),
            edges: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    pub fn element_count(&self) -> usize {
        self.nodes.len() + self.edges.len()
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn edge(&self, id: &str) -> Option<&Edge> {
        self.edges.iter().find(|edge| edge.id == id)
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.node(id).is_some()
    }

    /// Removes one node without touching its incident edges.
    ///
    /// Callers must drop edges touching the node to keep endpoints valid.
    pub(crate) fn remove_node(&mut self, id: &str) -> Option<Node> {
        let position = self.nodes.iter().position(|node| node.id == id)?;
        Some(self.nodes.remove(position))
    }

    pub(crate) fn remove_edge(&mut self, id: &str) -> Option<Edge> {
        let position = self.edges.iter().position(|edge| edge.id == id)?;
        Some(self.edges.remove(position))
    }

    /// Checks id uniqueness, finite node geometry and edge endpoint integrity.
    ///
    /// # Errors
    /// - Returns the first violation in source order.
    pub fn validate(&self) -> Result<(), GraphValidationError> {
        if self.id.trim().is_empty() {
            return Err(GraphValidationError::EmptyId);
        }

        let mut seen = HashSet::with_capacity(self.element_count());
        let mut node_ids = HashSet::with_capacity(self.nodes.len());
        for node in &self.nodes {
            if node.id.trim().is_empty() {
                return Err(GraphValidationError::EmptyId);
            }
            if !seen.insert(node.id.as_str()) {
                return Err(GraphValidationError::DuplicateId(node.id.clone()));
            }
            if !node.position.is_finite() || !node.size.map_or(true, |size| size.is_finite()) {
                return Err(GraphValidationError::NonFiniteGeometry(node.id.clone()));
            }
            node_ids.insert(node.id.as_str());
        }

        for edge in &self.edges {
            if edge.id.trim().is_empty() {
                return Err(GraphValidationError::EmptyId);
            }
            if !seen.insert(edge.id.as_str()) {
                return Err(GraphValidationError::DuplicateId(edge.id.clone()));
            }
            if !node_ids.contains(edge.source_id.as_str()) {
                return Err(GraphValidationError::DanglingSource {
                    edge_id: edge.id.clone(),
                    source_id: edge.source_id.clone(),
                });
            }
            if !node_ids.contains(edge.target_id.as_str()) {
                return Err(GraphValidationError::DanglingTarget {
                    edge_id: edge.id.clone(),
                    target_id: edge.target_id.clone(),
                });
            }
        }

        Ok(())
    }
}
