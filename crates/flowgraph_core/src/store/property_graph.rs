//! Property-graph-backed persistence store.
//!
//! # Responsibility
//! - Translate a `Graph` into diagram/node/edge records of a property graph.
//! - Reload a diagram from the stored transport-schema payload.
//!
//! # Invariants
//! - One `save` runs inside one backend session; the session is released on
//!   every exit path and rolled back unless explicitly committed.
//! - Saving a graph without children removes the diagram record entirely.
//! - Node/edge records are fully rewritten on every save (no diffing).
//! - Concurrent saves of one diagram from different sessions are not
//!   coordinated; the later commit wins.

use crate::model::graph::{Edge, Graph, Node};
use crate::store::schema::DiagramSchema;
use crate::store::{PersistenceStore, StoreError, StoreResult};
use log::{error, info};
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Default label of diagram records.
pub const DIAGRAM_LABEL: &str = "WorkflowDiagram";
pub const NODE_LABEL: &str = "Node";
pub const EDGE_LABEL: &str = "Edge";
pub const HAS_NODE: &str = "HAS_NODE";
pub const HAS_EDGE: &str = "HAS_EDGE";

const DEFAULT_NODE_WIDTH: f64 = 100.0;
const DEFAULT_NODE_HEIGHT: f64 = 50.0;

/// Properties of one `Node` record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub id: String,
    #[serde(rename = "type")]
    pub type_id: String,
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl From<&Node> for NodeRecord {
    fn from(node: &Node) -> Self {
        Self {
            id: node.id.clone(),
            type_id: node.kind.type_id().to_string(),
            name: node.name.trim().to_string(),
            x: node.position.x,
            y: node.position.y,
            w: node.size.map_or(DEFAULT_NODE_WIDTH, |size| size.width),
            h: node.size.map_or(DEFAULT_NODE_HEIGHT, |size| size.height),
        }
    }
}

/// Properties of one `Edge` record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeRecord {
    pub id: String,
    #[serde(rename = "type")]
    pub type_id: String,
    pub source_id: String,
    pub target_id: String,
}

impl From<&Edge> for EdgeRecord {
    fn from(edge: &Edge) -> Self {
        Self {
            id: edge.id.clone(),
            type_id: edge.kind.type_id().to_string(),
            source_id: edge.source_id.clone(),
            target_id: edge.target_id.clone(),
        }
    }
}

/// Connection-level handle that hands out sessions.
pub trait PropertyGraphBackend {
    type Session<'a>: PropertyGraphSession
    where
        Self: 'a;

    /// Opens one unit of work. Dropping it without `commit` discards writes.
    fn open_session(&self) -> StoreResult<Self::Session<'_>>;

    /// Opens a session that only reads. Backends may skip write locking.
    fn open_read_session(&self) -> StoreResult<Self::Session<'_>> {
        self.open_session()
    }
}

/// Statement surface used by `PropertyGraphStore` inside one session.
///
/// `label` is the diagram record label; `diagram_id` keys the record.
pub trait PropertyGraphSession {
    /// Returns the `json` payload of the first diagram record with `label`.
    fn find_diagram_payload(&mut self, label: &str) -> StoreResult<Option<String>>;
    /// Creates or updates the diagram record and its `json` payload.
    fn upsert_diagram(&mut self, label: &str, diagram_id: &str, payload: &str)
        -> StoreResult<()>;
    /// Detach-deletes every node/edge record contained in the diagram.
    /// Returns the number of removed records.
    fn detach_delete_children(&mut self, label: &str, diagram_id: &str) -> StoreResult<usize>;
    /// Detach-deletes the diagram record. Returns whether it existed.
    fn detach_delete_diagram(&mut self, label: &str, diagram_id: &str) -> StoreResult<bool>;
    /// Upserts one `Node` record and links it with `HAS_NODE`.
    fn merge_node_record(
        &mut self,
        label: &str,
        diagram_id: &str,
        record: &NodeRecord,
    ) -> StoreResult<()>;
    /// Upserts one `Edge` record and links it with `HAS_EDGE`.
    fn merge_edge_record(
        &mut self,
        label: &str,
        diagram_id: &str,
        record: &EdgeRecord,
    ) -> StoreResult<()>;
    /// Lists `Node` records contained in the diagram.
    fn node_records(&mut self, label: &str, diagram_id: &str) -> StoreResult<Vec<NodeRecord>>;
    /// Lists `Edge` records contained in the diagram.
    fn edge_records(&mut self, label: &str, diagram_id: &str) -> StoreResult<Vec<EdgeRecord>>;
    /// Makes every write of this session durable.
    fn commit(self) -> StoreResult<()>
    where
        Self: Sized;
}

/// Persistence store over any property-graph backend.
#[derive(Debug)]
pub struct PropertyGraphStore<B: PropertyGraphBackend> {
    backend: B,
}

impl<B: PropertyGraphBackend> PropertyGraphStore<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Reads back the stored `Node` and `Edge` records of one diagram.
    pub fn records(
        &self,
        label: &str,
        diagram_id: &str,
    ) -> StoreResult<(Vec<NodeRecord>, Vec<EdgeRecord>)> {
        let mut session = self.backend.open_read_session()?;
        let nodes = session.node_records(label, diagram_id)?;
        let edges = session.edge_records(label, diagram_id)?;
        Ok((nodes, edges))
    }

    fn load_in_session(&self, label: &str) -> StoreResult<(Graph, bool)> {
        let mut session = self.backend.open_read_session()?;
        match session.find_diagram_payload(label)? {
            Some(payload) => Ok((DiagramSchema::parse_graph(&payload)?, false)),
            // Not written until the next explicit save.
            None => Ok((Graph::empty(), true)),
        }
    }

    /// Returns whether the diagram was removed instead of written.
    fn save_in_session(&self, label: &str, graph: &Graph) -> StoreResult<bool> {
        graph.validate()?;

        let schema = DiagramSchema::from_graph(graph);
        let payload = serde_json::to_string(&schema).map_err(StoreError::Serialization)?;

        let mut session = self.backend.open_session()?;
        if schema.children.is_empty() {
            session.detach_delete_children(label, &schema.id)?;
            session.detach_delete_diagram(label, &schema.id)?;
            session.commit()?;
            return Ok(true);
        }

        session.upsert_diagram(label, &schema.id, &payload)?;
        session.detach_delete_children(label, &schema.id)?;
        for node in &graph.nodes {
            session.merge_node_record(label, &schema.id, &NodeRecord::from(node))?;
        }
        for edge in &graph.edges {
            session.merge_edge_record(label, &schema.id, &EdgeRecord::from(edge))?;
        }
        session.commit()?;
        Ok(false)
    }
}

impl<B: PropertyGraphBackend> PersistenceStore for PropertyGraphStore<B> {
    /// Diagram record label, usually `DIAGRAM_LABEL`.
    type Locator = str;

    fn load(&self, label: &str) -> StoreResult<Graph> {
        let started_at = Instant::now();
        match self.load_in_session(label) {
            Ok((graph, created)) => {
                info!(
                    "event=graph_load module=store status=ok store=property_graph label={} created={} graph_id={} nodes={} edges={} duration_ms={}",
                    label,
                    created,
                    graph.id,
                    graph.nodes.len(),
                    graph.edges.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(graph)
            }
            Err(err) => {
                error!(
                    "event=graph_load module=store status=error store=property_graph label={} duration_ms={} error={}",
                    label,
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }

    fn save(&self, label: &str, graph: &Graph) -> StoreResult<()> {
        let started_at = Instant::now();
        match self.save_in_session(label, graph) {
            Ok(removed) => {
                info!(
                    "event=graph_save module=store status=ok store=property_graph label={} graph_id={} removed={} nodes={} edges={} duration_ms={}",
                    label,
                    graph.id,
                    removed,
                    graph.nodes.len(),
                    graph.edges.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=graph_save module=store status=error store=property_graph label={} graph_id={} duration_ms={} error={}",
                    label,
                    graph.id,
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }
}
