//! Edge-creation kind policy.
//!
//! The mutation engine only checks endpoint existence; which source/target
//! kind pairs are acceptable for an edge kind is decided here.

use crate::model::kind::{EdgeKind, NodeFamily, NodeKind};

/// Declarative kind-compatibility policy consulted by `create_edge`.
pub trait EdgeCreationChecker {
    /// Returns whether `source` may start an edge of `edge_kind`.
    fn is_valid_source(&self, edge_kind: EdgeKind, source: NodeKind) -> bool;
    /// Returns whether `target` may end an edge of `edge_kind` from `source`.
    fn is_valid_target(&self, edge_kind: EdgeKind, source: NodeKind, target: NodeKind) -> bool;
}

impl<C: EdgeCreationChecker + ?Sized> EdgeCreationChecker for &C {
    fn is_valid_source(&self, edge_kind: EdgeKind, source: NodeKind) -> bool {
        (**self).is_valid_source(edge_kind, source)
    }

    fn is_valid_target(&self, edge_kind: EdgeKind, source: NodeKind, target: NodeKind) -> bool {
        (**self).is_valid_target(edge_kind, source, target)
    }
}

impl<C: EdgeCreationChecker + ?Sized> EdgeCreationChecker for Box<C> {
    fn is_valid_source(&self, edge_kind: EdgeKind, source: NodeKind) -> bool {
        (**self).is_valid_source(edge_kind, source)
    }

    fn is_valid_target(&self, edge_kind: EdgeKind, source: NodeKind, target: NodeKind) -> bool {
        (**self).is_valid_target(edge_kind, source, target)
    }
}

/// Accepts every kind pair.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAllEdges;

impl EdgeCreationChecker for AllowAllEdges {
    fn is_valid_source(&self, _edge_kind: EdgeKind, _source: NodeKind) -> bool {
        true
    }

    fn is_valid_target(&self, _edge_kind: EdgeKind, _source: NodeKind, _target: NodeKind) -> bool {
        true
    }
}

/// Workflow diagram edge rules.
///
/// - Weighted edges start at decision nodes and end at tasks, forks or joins.
/// - Every other edge kind connects any two nodes.
#[derive(Debug, Clone, Copy, Default)]
pub struct WorkflowEdgeCreationChecker;

impl EdgeCreationChecker for WorkflowEdgeCreationChecker {
    fn is_valid_source(&self, edge_kind: EdgeKind, source: NodeKind) -> bool {
        match edge_kind {
            EdgeKind::Weighted | EdgeKind::WeightedCp => source.is_decision(),
            EdgeKind::CategoryEdge | EdgeKind::Transition | EdgeKind::EdgeCp => true,
        }
    }

    fn is_valid_target(&self, edge_kind: EdgeKind, source: NodeKind, target: NodeKind) -> bool {
        if !self.is_valid_source(edge_kind, source) {
            return false;
        }
        match edge_kind {
            EdgeKind::Weighted | EdgeKind::WeightedCp => {
                target.family() == NodeFamily::Task
                    || matches!(
                        target,
                        NodeKind::Fork | NodeKind::Join | NodeKind::ForkCp | NodeKind::JoinCp
                    )
            }
            EdgeKind::CategoryEdge | EdgeKind::Transition | EdgeKind::EdgeCp => true,
        }
    }
}
