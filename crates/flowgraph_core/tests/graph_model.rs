use flowgraph_core::{
    Edge, EdgeKind, Graph, GraphValidationError, Node, NodeFamily, NodeKind, Position,
    Size,
};

fn node(id: &str, kind: NodeKind) -> Node {
    Node::new(id, kind, id.to_uppercase(), Position::new(0.0, 0.0))
}

#[test]
fn empty_graphs_get_distinct_fresh_ids() {
    let first = Graph::empty();
    let second = Graph::empty();

    assert!(first.is_empty());
    assert!(!first.id.is_empty());
    assert_ne!(first.id, second.id);
    assert!(first.validate().is_ok());
}

#[test]
fn validate_accepts_well_formed_graph() {
    let mut graph = Graph::with_id("g1");
    graph.nodes.push(node("c", NodeKind::Category));
    graph.nodes.push(node("a", NodeKind::Task));
    graph.nodes.push(node("d", NodeKind::Decision));
    graph
        .edges
        .push(Edge::new("e1", EdgeKind::Transition, "a", "d"));
    graph
        .edges
        .push(Edge::new("e2", EdgeKind::CategoryEdge, "c", "a"));

    assert_eq!(graph.validate(), Ok(()));
    assert_eq!(graph.element_count(), 5);
    assert!(graph.contains_node("d"));
    assert!(!graph.contains_node("e1"));
    assert_eq!(graph.edge("e2").unwrap().source_id, "c");
}

#[test]
fn validate_rejects_duplicate_ids_across_nodes_and_edges() {
    let mut graph = Graph::with_id("g1");
    graph.nodes.push(node("a", NodeKind::Task));
    graph.nodes.push(node("b", NodeKind::Task));
    graph.edges.push(Edge::new("a", EdgeKind::Transition, "a", "b"));

    assert_eq!(
        graph.validate(),
        Err(GraphValidationError::DuplicateId("a".to_string()))
    );
}

#[test]
fn validate_rejects_dangling_endpoints() {
    let mut graph = Graph::with_id("g1");
    graph.nodes.push(node("a", NodeKind::Task));
    graph
        .edges
        .push(Edge::new("e1", EdgeKind::Transition, "a", "ghost"));

    assert_eq!(
        graph.validate(),
        Err(GraphValidationError::DanglingTarget {
            edge_id: "e1".to_string(),
            target_id: "ghost".to_string(),
        })
    );

    graph.edges[0] = Edge::new("e1", EdgeKind::Transition, "ghost", "a");
    assert!(matches!(
        graph.validate(),
        Err(GraphValidationError::DanglingSource { .. })
    ));
}

#[test]
fn validate_rejects_blank_ids() {
    let mut graph = Graph::with_id("  ");
    assert_eq!(graph.validate(), Err(GraphValidationError::EmptyId));

    graph.id = "g1".to_string();
    graph.nodes.push(node("", NodeKind::Task));
    assert_eq!(graph.validate(), Err(GraphValidationError::EmptyId));
}

#[test]
fn validate_rejects_non_finite_geometry() {
    let mut graph = Graph::with_id("g1");
    graph
        .nodes
        .push(Node::new("a", NodeKind::Task, "A", Position::new(f64::NAN, 0.0)));
    assert_eq!(
        graph.validate(),
        Err(GraphValidationError::NonFiniteGeometry("a".to_string()))
    );

    graph.nodes[0] = node("a", NodeKind::Task).with_size(Size::new(f64::INFINITY, 50.0));
    assert_eq!(
        graph.validate(),
        Err(GraphValidationError::NonFiniteGeometry("a".to_string()))
    );

    graph.nodes[0] = node("a", NodeKind::Task).with_size(Size::new(80.0, 50.0));
    assert_eq!(graph.validate(), Ok(()));
}

#[test]
fn node_kinds_map_to_families_and_type_ids() {
    assert_eq!(NodeKind::HybridTask.family(), NodeFamily::Task);
    assert_eq!(NodeKind::CategoryCp.family(), NodeFamily::Category);
    assert_eq!(NodeKind::JoinCp.family(), NodeFamily::Activity);

    for kind in NodeKind::ALL {
        assert_eq!(NodeKind::from_type_id(kind.type_id()), Some(kind));
    }
    assert_eq!(NodeKind::from_type_id("activityNode:unknown"), None);
    assert_eq!(EdgeKind::from_type_id("edge:weighted"), Some(EdgeKind::Weighted));
}
