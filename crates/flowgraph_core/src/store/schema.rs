//! Transportable diagram schema stored as the property-graph `json` payload.
//!
//! Shape: `{id, type: "graph", children: [...]}`. Node children carry
//! `{id, type, name, position, size?}`, edge children carry
//! `{id, type, sourceId, targetId, label?, probability?}`; the `type` value
//! decides which one a child is.

use crate::model::graph::{Edge, Graph, Node, Position, Size};
use crate::model::kind::{EdgeKind, NodeKind, Probability};
use crate::store::{malformed, StoreError};
use serde::{Deserialize, Serialize};

pub const GRAPH_SCHEMA_TYPE: &str = "graph";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagramSchema {
    pub id: String,
    #[serde(rename = "type")]
    pub type_id: String,
    #[serde(default)]
    pub children: Vec<SchemaElement>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SchemaElement {
    Node(SchemaNode),
    Edge(SchemaEdge),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaNode {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub name: String,
    pub position: Position,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<Size>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaEdge {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: EdgeKind,
    pub source_id: String,
    pub target_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub probability: Option<Probability>,
}

impl DiagramSchema {
    /// Translates a graph: node children first, then edge children.
    pub fn from_graph(graph: &Graph) -> Self {
        let nodes = graph.nodes.iter().map(|node| {
            SchemaElement::Node(SchemaNode {
                id: node.id.clone(),
                kind: node.kind,
                name: node.name.clone(),
                position: node.position,
                size: node.size,
            })
        });
        let edges = graph.edges.iter().map(|edge| {
            SchemaElement::Edge(SchemaEdge {
                id: edge.id.clone(),
                kind: edge.kind,
                source_id: edge.source_id.clone(),
                target_id: edge.target_id.clone(),
                label: edge.label.clone(),
                probability: edge.probability,
            })
        });

        Self {
            id: graph.id.clone(),
            type_id: GRAPH_SCHEMA_TYPE.to_string(),
            children: nodes.chain(edges).collect(),
        }
    }

    /// Parses a stored payload and validates the resulting graph.
    pub fn parse_graph(payload: &str) -> Result<Graph, StoreError> {
        let schema: DiagramSchema =
            serde_json::from_str(payload).map_err(|err| malformed("diagram payload", err))?;
        Graph::try_from(schema)
    }
}

impl TryFrom<DiagramSchema> for Graph {
    type Error = StoreError;

    fn try_from(schema: DiagramSchema) -> Result<Self, Self::Error> {
        if schema.type_id != GRAPH_SCHEMA_TYPE {
            return Err(StoreError::MalformedSource(format!(
                "diagram payload root type `{}` is not `{GRAPH_SCHEMA_TYPE}`",
                schema.type_id
            )));
        }

        let mut graph = Graph::with_id(schema.id);
        for child in schema.children {
            match child {
                SchemaElement::Node(node) => graph.nodes.push(Node {
                    id: node.id,
                    kind: node.kind,
                    name: node.name,
                    position: node.position,
                    size: node.size,
                }),
                SchemaElement::Edge(edge) => graph.edges.push(Edge {
                    id: edge.id,
                    kind: edge.kind,
                    source_id: edge.source_id,
                    target_id: edge.target_id,
                    label: edge.label,
                    probability: edge.probability,
                }),
            }
        }

        graph
            .validate()
            .map_err(|err| malformed("diagram payload", err))?;
        Ok(graph)
    }
}
