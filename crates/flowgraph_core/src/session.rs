//! Explicit editing-session context.
//!
//! # Responsibility
//! - Own the live `Graph` together with the `ModelIndex` derived from it.
//! - Bridge persistence (`open`/`save`) and the mutation engine.
//!
//! # Invariants
//! - The index is rebuilt whenever the graph is replaced.
//! - Mutations go through `MutationEngine`, which borrows the session
//!   mutably, so readers never observe a half-applied edit.

use crate::index::{Direction, ElementRef, ModelIndex};
use crate::model::graph::{Edge, Graph};
use crate::store::{PersistenceStore, StoreResult};
use crate::view::{ViewTree, ViewTreeFactory};

/// Graph + index pair for one editing session.
#[derive(Debug, Clone)]
pub struct DiagramSession {
    pub(crate) graph: Graph,
    pub(crate) index: ModelIndex,
}

impl DiagramSession {
    /// Wraps an already validated graph and indexes it.
    pub fn new(graph: Graph) -> Self {
        let index = ModelIndex::new(&graph);
        Self { graph, index }
    }

    /// Loads a graph through `store` and indexes it.
    pub fn open<S: PersistenceStore + ?Sized>(
        store: &S,
        locator: &S::Locator,
    ) -> StoreResult<Self> {
        let graph = store.load(locator)?;
        Ok(Self::new(graph))
    }

    /// Writes the current graph through `store`.
    pub fn save<S: PersistenceStore + ?Sized>(
        &self,
        store: &S,
        locator: &S::Locator,
    ) -> StoreResult<()> {
        store.save(locator, &self.graph)
    }

    /// Replaces the session graph, e.g. after a reload.
    pub fn replace_graph(&mut self, graph: Graph) {
        self.index.rebuild(&graph);
        self.graph = graph;
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn index(&self) -> &ModelIndex {
        &self.index
    }

    pub fn into_graph(self) -> Graph {
        self.graph
    }

    pub fn lookup(&self, id: &str) -> Option<ElementRef<'_>> {
        self.index.lookup(&self.graph, id)
    }

    pub fn incident_edges(&self, node_id: &str, direction: Direction) -> Vec<&Edge> {
        self.index.incident_edges(&self.graph, node_id, direction)
    }

    pub fn view_tree(&self) -> ViewTree {
        ViewTreeFactory::build(&self.graph)
    }
}
