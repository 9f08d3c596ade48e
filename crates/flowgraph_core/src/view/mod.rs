//! Renderable view tree derived from the graph model.
//!
//! # Responsibility
//! - Translate one `Graph` into positioned, styled view elements.
//! - Serialize to JSON for the external renderer.
//!
//! # Invariants
//! - `ViewTreeFactory::build` is pure: it never mutates the graph and yields
//!   structurally identical output for equal graphs.
//! - Children are ordered nodes first, then edges, each in source order.

use crate::model::graph::{Edge, Graph, Node, Position, Size};
use crate::model::kind::{EdgeKind, NodeFamily, NodeKind, Probability};
use serde::Serialize;

const GRAPH_TYPE: &str = "graph";
const LABEL_TYPE: &str = "label:heading";
const NODE_LAYOUT: &str = "hbox";
const NODE_PADDING_LEFT: f64 = 5.0;

/// Returns the id of the label sub-part owned by `owner_id`.
pub fn label_id(owner_id: &str) -> String {
    format!("{owner_id}_label")
}

/// Root of one rendered diagram.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewTree {
    pub id: String,
    #[serde(rename = "type")]
    pub type_id: &'static str,
    pub children: Vec<ViewElement>,
}

impl ViewTree {
    pub fn nodes(&self) -> impl Iterator<Item = &ViewNode> {
        self.children.iter().filter_map(|child| match child {
            ViewElement::Node(node) => Some(node),
            ViewElement::Edge(_) => None,
        })
    }

    pub fn edges(&self) -> impl Iterator<Item = &ViewEdge> {
        self.children.iter().filter_map(|child| match child {
            ViewElement::Node(_) => None,
            ViewElement::Edge(edge) => Some(edge),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ViewElement {
    Node(ViewNode),
    Edge(ViewEdge),
}

impl ViewElement {
    pub fn id(&self) -> &str {
        match self {
            Self::Node(node) => node.id.as_str(),
            Self::Edge(edge) => edge.id.as_str(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewLabel {
    pub id: String,
    #[serde(rename = "type")]
    pub type_id: &'static str,
    pub text: String,
}

impl ViewLabel {
    pub fn new(owner_id: &str, text: impl Into<String>) -> Self {
        Self {
            id: label_id(owner_id),
            type_id: LABEL_TYPE,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutOptions {
    pub padding_left: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pref_width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pref_height: Option<f64>,
}

/// Fully specified input for `ViewNode::new`.
#[derive(Debug, Clone)]
pub struct ViewNodeParams {
    pub id: String,
    pub kind: NodeKind,
    pub label: String,
    pub position: Position,
    pub size: Option<Size>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewNode {
    pub id: String,
    #[serde(rename = "type")]
    pub type_id: &'static str,
    pub position: Position,
    /// `None` means auto-sized by the client layout.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<Size>,
    pub css_classes: Vec<String>,
    pub layout: &'static str,
    pub layout_options: LayoutOptions,
    pub children: Vec<ViewLabel>,
}

impl ViewNode {
    pub fn new(params: ViewNodeParams) -> Self {
        let layout_options = LayoutOptions {
            padding_left: NODE_PADDING_LEFT,
            pref_width: params.size.map(|size| size.width),
            pref_height: params.size.map(|size| size.height),
        };
        let label = ViewLabel::new(&params.id, params.label);
        Self {
            type_id: params.kind.type_id(),
            css_classes: node_css_classes(params.kind),
            position: params.position,
            size: params.size,
            layout: NODE_LAYOUT,
            layout_options,
            children: vec![label],
            id: params.id,
        }
    }

    pub fn label(&self) -> Option<&ViewLabel> {
        self.children.first()
    }
}

/// Fully specified input for `ViewEdge::new`.
#[derive(Debug, Clone)]
pub struct ViewEdgeParams {
    pub id: String,
    pub kind: EdgeKind,
    pub source_id: String,
    pub target_id: String,
    pub label: Option<String>,
    pub probability: Option<Probability>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewEdge {
    pub id: String,
    #[serde(rename = "type")]
    pub type_id: &'static str,
    pub source_id: String,
    pub target_id: String,
    pub css_classes: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ViewLabel>,
}

impl ViewEdge {
    pub fn new(params: ViewEdgeParams) -> Self {
        let children = params
            .label
            .map(|text| vec![ViewLabel::new(&params.id, text)])
            .unwrap_or_default();
        Self {
            type_id: params.kind.type_id(),
            css_classes: edge_css_classes(params.kind, params.probability),
            source_id: params.source_id,
            target_id: params.target_id,
            children,
            id: params.id,
        }
    }
}

/// Stateless graph → view tree transform.
#[derive(Debug, Clone, Copy, Default)]
pub struct ViewTreeFactory;

impl ViewTreeFactory {
    /// Builds the view tree for a graph satisfying id uniqueness and edge
    /// endpoint integrity.
    pub fn build(graph: &Graph) -> ViewTree {
        let mut children = Vec::with_capacity(graph.element_count());
        children.extend(graph.nodes.iter().map(|node| ViewElement::Node(view_node(node))));
        children.extend(graph.edges.iter().map(|edge| ViewElement::Edge(view_edge(edge))));

        ViewTree {
            id: graph.id.clone(),
            type_id: GRAPH_TYPE,
            children,
        }
    }
}

fn view_node(node: &Node) -> ViewNode {
    ViewNode::new(ViewNodeParams {
        id: node.id.clone(),
        kind: node.kind,
        label: node.name.clone(),
        position: node.position,
        size: node.size,
    })
}

fn view_edge(edge: &Edge) -> ViewEdge {
    ViewEdge::new(ViewEdgeParams {
        id: edge.id.clone(),
        kind: edge.kind,
        source_id: edge.source_id.clone(),
        target_id: edge.target_id.clone(),
        label: edge.label.clone(),
        probability: edge.probability,
    })
}

fn node_css_classes(kind: NodeKind) -> Vec<String> {
    let primary = match kind.family() {
        NodeFamily::Task => "tasklist-node",
        NodeFamily::Category => "category-node",
        NodeFamily::Activity => "activity-node",
    };
    let mut classes = vec![primary.to_string()];
    if kind != NodeKind::Task && kind != NodeKind::Category {
        classes.push(kind.short_name().to_string());
    }
    classes
}

fn edge_css_classes(kind: EdgeKind, probability: Option<Probability>) -> Vec<String> {
    match kind {
        EdgeKind::Transition => vec!["tasklist-transition".to_string()],
        EdgeKind::CategoryEdge => vec!["category-edge".to_string()],
        EdgeKind::EdgeCp => vec!["edge".to_string()],
        EdgeKind::Weighted | EdgeKind::WeightedCp => vec![
            "weighted-edge".to_string(),
            probability.unwrap_or_default().as_str().to_string(),
        ],
    }
}
