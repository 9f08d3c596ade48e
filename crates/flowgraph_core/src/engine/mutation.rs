//! Structural edit operations over one diagram session.
//!
//! # Responsibility
//! - Apply delete/create edits to the session graph and keep its index in
//!   step.
//! - Enforce edge endpoint integrity on every structural edit.
//!
//! # Invariants
//! - Deleting a node removes all of its incident edges first.
//! - Deleting an unknown id is a no-op, never an error.
//! - A rejected `create_edge` leaves the graph untouched.

use crate::engine::checker::EdgeCreationChecker;
use crate::index::{Direction, ElementRef};
use crate::model::graph::{generate_id, Edge, ElementId, Node, Position, Size};
use crate::model::kind::{EdgeKind, NodeKind, Probability};
use crate::session::DiagramSession;
use log::{debug, info, warn};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors from structural edit operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationError {
    /// Source id does not name a node of the session graph.
    MissingSource(ElementId),
    /// Target id does not name a node of the session graph.
    MissingTarget(ElementId),
    /// The edge-creation policy refused this kind combination.
    KindNotAllowed {
        edge_kind: EdgeKind,
        source_kind: NodeKind,
        target_kind: NodeKind,
    },
}

impl Display for MutationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingSource(id) => write!(f, "edge source node not found: {id}"),
            Self::MissingTarget(id) => write!(f, "edge target node not found: {id}"),
            Self::KindNotAllowed {
                edge_kind,
                source_kind,
                target_kind,
            } => write!(
                f,
                "edge `{}` is not allowed from `{}` to `{}`",
                edge_kind.type_id(),
                source_kind.type_id(),
                target_kind.type_id()
            ),
        }
    }
}

impl Error for MutationError {}

/// Result of one `delete_element` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// Id resolved to nothing; graph unchanged.
    NotFound,
    /// Removed element ids: incident edges first, then the target itself.
    Deleted { removed_ids: Vec<ElementId> },
}

impl DeleteOutcome {
    pub fn removed_ids(&self) -> &[ElementId] {
        match self {
            Self::NotFound => &[],
            Self::Deleted { removed_ids } => removed_ids,
        }
    }
}

/// Request model for `create_node`.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateNodeRequest {
    pub kind: NodeKind,
    pub position: Position,
    pub size: Option<Size>,
    /// Falls back to the kind's default name when `None` or blank.
    pub name: Option<String>,
}

impl CreateNodeRequest {
    pub fn new(kind: NodeKind, position: Position) -> Self {
        Self {
            kind,
            position,
            size: None,
            name: None,
        }
    }
}

/// Request model for `create_edge`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateEdgeRequest {
    pub kind: EdgeKind,
    pub source_id: ElementId,
    pub target_id: ElementId,
    pub label: Option<String>,
}

impl CreateEdgeRequest {
    pub fn new(
        kind: EdgeKind,
        source_id: impl Into<ElementId>,
        target_id: impl Into<ElementId>,
    ) -> Self {
        Self {
            kind,
            source_id: source_id.into(),
            target_id: target_id.into(),
            label: None,
        }
    }
}

/// Applies structural edits to a `DiagramSession`.
pub struct MutationEngine<C: EdgeCreationChecker> {
    checker: C,
}

impl<C: EdgeCreationChecker> MutationEngine<C> {
    /// Creates an engine consulting `checker` for edge kind compatibility.
    pub fn new(checker: C) -> Self {
        Self { checker }
    }

    pub fn checker(&self) -> &C {
        &self.checker
    }

    /// Deletes one node (with its incident edges) or one edge.
    ///
    /// `id` is resolved directly first, then as a sub-part (label) of an
    /// enclosing node or edge.
    pub fn delete_element(&self, session: &mut DiagramSession, id: &str) -> DeleteOutcome {
        let (target_id, edge_ids) = match session.index.resolve_enclosing(&session.graph, id) {
            None => {
                debug!("event=element_delete module=engine status=skipped reason=not_found id={id}");
                return DeleteOutcome::NotFound;
            }
            Some(ElementRef::Node(node)) => {
                let edge_ids = session
                    .index
                    .incident_edges(&session.graph, &node.id, Direction::Both)
                    .into_iter()
                    .map(|edge| edge.id.clone())
                    .collect::<Vec<_>>();
                (node.id.clone(), edge_ids)
            }
            Some(ElementRef::Edge(edge)) => (edge.id.clone(), Vec::new()),
        };

        let doomed: HashSet<&str> = edge_ids.iter().map(String::as_str).collect();
        session
            .graph
            .edges
            .retain(|edge| !doomed.contains(edge.id.as_str()));
        if session.graph.remove_node(&target_id).is_none() {
            session.graph.remove_edge(&target_id);
        }
        session.index.rebuild(&session.graph);

        info!(
            "event=element_delete module=engine status=ok id={} cascaded_edges={}",
            target_id,
            edge_ids.len()
        );

        let mut removed_ids = edge_ids;
        removed_ids.push(target_id);
        DeleteOutcome::Deleted { removed_ids }
    }

    /// Deletes each id in order; unknown ids are skipped.
    pub fn delete_elements<I, S>(&self, session: &mut DiagramSession, ids: I) -> Vec<ElementId>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut removed = Vec::new();
        for id in ids {
            if let DeleteOutcome::Deleted { removed_ids } =
                self.delete_element(session, id.as_ref())
            {
                removed.extend(removed_ids);
            }
        }
        removed
    }

    /// Appends one node with a freshly generated id.
    pub fn create_node(&self, session: &mut DiagramSession, request: CreateNodeRequest) -> Node {
        let name = request
            .name
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| request.kind.default_name())
            .to_string();

        let mut node = Node::new(generate_id(), request.kind, name, request.position);
        node.size = request.size;

        session.graph.nodes.push(node.clone());
        session.index.push_node(&session.graph);

        info!(
            "event=node_create module=engine status=ok id={} type={}",
            node.id,
            node.kind.type_id()
        );
        node
    }

    /// Appends one edge between two existing nodes.
    ///
    /// # Errors
    /// - `MissingSource`/`MissingTarget` when an endpoint is not a node.
    /// - `KindNotAllowed` when the edge-creation policy refuses the pair.
    pub fn create_edge(
        &self,
        session: &mut DiagramSession,
        request: CreateEdgeRequest,
    ) -> Result<Edge, MutationError> {
        let source_kind = session
            .lookup(&request.source_id)
            .and_then(|element| element.as_node())
            .map(|node| node.kind)
            .ok_or_else(|| MutationError::MissingSource(request.source_id.clone()));
        let target_kind = session
            .lookup(&request.target_id)
            .and_then(|element| element.as_node())
            .map(|node| node.kind)
            .ok_or_else(|| MutationError::MissingTarget(request.target_id.clone()));

        let (source_kind, target_kind) = match (source_kind, target_kind) {
            (Ok(source_kind), Ok(target_kind)) => (source_kind, target_kind),
            (Err(err), _) | (_, Err(err)) => {
                warn!("event=edge_create module=engine status=rejected error={err}");
                return Err(err);
            }
        };

        if !self.checker.is_valid_source(request.kind, source_kind)
            || !self
                .checker
                .is_valid_target(request.kind, source_kind, target_kind)
        {
            let err = MutationError::KindNotAllowed {
                edge_kind: request.kind,
                source_kind,
                target_kind,
            };
            warn!("event=edge_create module=engine status=rejected error={err}");
            return Err(err);
        }

        let mut edge = Edge::new(
            generate_id(),
            request.kind,
            request.source_id,
            request.target_id,
        );
        edge.label = request.label.filter(|value| !value.trim().is_empty());
        if edge.kind.is_weighted() {
            edge.probability = Some(Probability::Medium);
        }

        session.graph.edges.push(edge.clone());
        session.index.push_edge(&session.graph);

        info!(
            "event=edge_create module=engine status=ok id={} type={}",
            edge.id,
            edge.kind.type_id()
        );
        Ok(edge)
    }
}
