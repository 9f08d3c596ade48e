//! JSON file document format.
//!
//! Shape: `{id, tasks, categories, transitions, categoryEdges}` plus the
//! optional `activityNodes` array. The four base arrays are required; a
//! document missing any of them is malformed.
//!
//! `type` is written only when it differs from the collection default, so
//! plain task lists stay in the minimal format.

use crate::model::graph::{Edge, Graph, Node, Position, Size};
use crate::model::kind::{EdgeKind, NodeFamily, NodeKind, Probability};
use crate::store::{malformed, StoreError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskListDocument {
    pub id: String,
    pub tasks: Vec<DocumentNode>,
    pub categories: Vec<DocumentNode>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub activity_nodes: Vec<DocumentNode>,
    pub transitions: Vec<DocumentEdge>,
    pub category_edges: Vec<DocumentEdge>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentNode {
    pub id: String,
    pub name: String,
    pub position: Position,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<Size>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<NodeKind>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentEdge {
    pub id: String,
    pub source_task_id: String,
    pub target_task_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<EdgeKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub probability: Option<Probability>,
}

impl DocumentNode {
    fn from_node(node: &Node, collection_default: Option<NodeKind>) -> Self {
        Self {
            id: node.id.clone(),
            name: node.name.clone(),
            position: node.position,
            size: node.size,
            kind: Some(node.kind).filter(|kind| Some(*kind) != collection_default),
        }
    }

    fn into_node(self, collection_default: NodeKind) -> Node {
        Node {
            id: self.id,
            kind: self.kind.unwrap_or(collection_default),
            name: self.name,
            position: self.position,
            size: self.size,
        }
    }
}

impl DocumentEdge {
    fn from_edge(edge: &Edge, collection_default: EdgeKind) -> Self {
        Self {
            id: edge.id.clone(),
            source_task_id: edge.source_id.clone(),
            target_task_id: edge.target_id.clone(),
            label: edge.label.clone(),
            kind: Some(edge.kind).filter(|kind| *kind != collection_default),
            probability: edge.probability,
        }
    }

    fn into_edge(self, collection_default: EdgeKind) -> Edge {
        Edge {
            id: self.id,
            kind: self.kind.unwrap_or(collection_default),
            source_id: self.source_task_id,
            target_id: self.target_task_id,
            label: self.label,
            probability: self.probability,
        }
    }
}

impl From<&Graph> for TaskListDocument {
    fn from(graph: &Graph) -> Self {
        let mut document = Self {
            id: graph.id.clone(),
            tasks: Vec::new(),
            categories: Vec::new(),
            activity_nodes: Vec::new(),
            transitions: Vec::new(),
            category_edges: Vec::new(),
        };

        for node in &graph.nodes {
            match node.kind.family() {
                NodeFamily::Task => document
                    .tasks
                    .push(DocumentNode::from_node(node, Some(NodeKind::Task))),
                NodeFamily::Category => document
                    .categories
                    .push(DocumentNode::from_node(node, Some(NodeKind::Category))),
                NodeFamily::Activity => document
                    .activity_nodes
                    .push(DocumentNode::from_node(node, None)),
            }
        }

        for edge in &graph.edges {
            match edge.kind {
                EdgeKind::CategoryEdge => document
                    .category_edges
                    .push(DocumentEdge::from_edge(edge, EdgeKind::CategoryEdge)),
                EdgeKind::Transition | EdgeKind::EdgeCp | EdgeKind::Weighted | EdgeKind::WeightedCp => {
                    document
                        .transitions
                        .push(DocumentEdge::from_edge(edge, EdgeKind::Transition))
                }
            }
        }

        document
    }
}

impl TryFrom<TaskListDocument> for Graph {
    type Error = StoreError;

    /// Builds and validates a graph: categories, tasks and activity nodes in
    /// that order, then transitions and category edges.
    fn try_from(document: TaskListDocument) -> Result<Self, Self::Error> {
        if let Some(record) = document
            .activity_nodes
            .iter()
            .find(|record| record.kind.is_none())
        {
            return Err(StoreError::MalformedSource(format!(
                "activity node `{}` has no type",
                record.id
            )));
        }

        let mut graph = Graph::with_id(document.id);
        graph.nodes.extend(
            document
                .categories
                .into_iter()
                .map(|record| record.into_node(NodeKind::Category)),
        );
        graph.nodes.extend(
            document
                .tasks
                .into_iter()
                .map(|record| record.into_node(NodeKind::Task)),
        );
        graph.nodes.extend(
            document
                .activity_nodes
                .into_iter()
                .map(|record| record.into_node(NodeKind::Decision)),
        );
        graph.edges.extend(
            document
                .transitions
                .into_iter()
                .map(|record| record.into_edge(EdgeKind::Transition)),
        );
        graph.edges.extend(
            document
                .category_edges
                .into_iter()
                .map(|record| record.into_edge(EdgeKind::CategoryEdge)),
        );

        graph
            .validate()
            .map_err(|err| malformed("task list document", err))?;
        Ok(graph)
    }
}
