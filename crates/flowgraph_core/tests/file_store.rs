use flowgraph_core::{
    DiagramSession, Edge, EdgeKind, Graph, GraphValidationError, JsonFileStore, Node, NodeKind,
    PersistenceStore, Position, Probability, Size, StoreError,
};
use serde_json::{json, Value};
use std::fs;
use std::path::Path;

/// Graph built in the order the file store reloads it: categories, tasks,
/// activity nodes, then transitions before category edges.
fn sample_graph() -> Graph {
    let mut graph = Graph::with_id("g1");
    graph
        .nodes
        .push(Node::new("c1", NodeKind::Category, "Docs", Position::new(0.0, 0.0)));
    graph.nodes.push(
        Node::new("t1", NodeKind::Task, "Write", Position::new(10.0, 20.0))
            .with_size(Size::new(120.0, 40.0)),
    );
    graph.nodes.push(Node::new(
        "t2",
        NodeKind::AutomatedTask,
        "Publish",
        Position::new(30.0, 40.0),
    ));
    graph
        .nodes
        .push(Node::new("d1", NodeKind::Decision, "", Position::new(50.0, 60.0)));
    graph
        .edges
        .push(Edge::new("e1", EdgeKind::Transition, "t1", "d1").with_label("done"));
    graph.edges.push(
        Edge::new("w1", EdgeKind::Weighted, "d1", "t2").with_probability(Probability::Low),
    );
    graph
        .edges
        .push(Edge::new("ce1", EdgeKind::CategoryEdge, "c1", "t1"));
    graph
}

fn read_json(path: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn missing_file_loads_fresh_empty_graph_without_writing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("new.tasklist");

    let graph = JsonFileStore::new().load(&path).unwrap();

    assert!(graph.is_empty());
    assert!(!graph.id.is_empty());
    assert!(!path.exists());
}

#[test]
fn blank_file_loads_fresh_empty_graph() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("blank.tasklist");
    fs::write(&path, "  \n").unwrap();

    let graph = JsonFileStore::new().load(&path).unwrap();
    assert!(graph.is_empty());
}

#[test]
fn save_then_load_round_trips_graph() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("diagram.tasklist");
    let store = JsonFileStore::pretty();
    let graph = sample_graph();

    store.save(&path, &graph).unwrap();
    let loaded = store.load(&path).unwrap();

    assert_eq!(loaded, graph);
}

#[test]
fn save_writes_minimal_collections_with_optional_types() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("diagram.tasklist");

    JsonFileStore::new().save(&path, &sample_graph()).unwrap();
    let value = read_json(&path);

    assert_eq!(value["id"], "g1");
    assert_eq!(value["categories"][0]["id"], "c1");
    assert!(value["categories"][0].get("type").is_none());
    assert!(value["tasks"][0].get("type").is_none());
    assert_eq!(value["tasks"][1]["type"], "task:automated");
    assert_eq!(value["activityNodes"][0]["type"], "activityNode:decision");
    assert_eq!(value["transitions"][0]["sourceTaskId"], "t1");
    assert!(value["transitions"][0].get("type").is_none());
    assert_eq!(value["transitions"][1]["type"], "edge:weighted");
    assert_eq!(value["transitions"][1]["probability"], "low");
    assert_eq!(value["categoryEdges"][0]["targetTaskId"], "t1");
}

#[test]
fn minimal_document_without_types_loads_with_collection_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("minimal.tasklist");
    let document = json!({
        "id": "g9",
        "tasks": [
            {"id": "a", "name": "A", "position": {"x": 0.0, "y": 0.0}},
            {"id": "b", "name": "B", "position": {"x": 1.0, "y": 0.0}}
        ],
        "categories": [
            {"id": "c", "name": "C", "position": {"x": 2.0, "y": 0.0}}
        ],
        "transitions": [{"id": "t", "sourceTaskId": "a", "targetTaskId": "b"}],
        "categoryEdges": [{"id": "ce", "sourceTaskId": "c", "targetTaskId": "a"}]
    });
    fs::write(&path, document.to_string()).unwrap();

    let graph = JsonFileStore::new().load(&path).unwrap();

    let ids: Vec<&str> = graph.nodes.iter().map(|node| node.id.as_str()).collect();
    assert_eq!(ids, vec!["c", "a", "b"]);
    assert_eq!(graph.node("a").unwrap().kind, NodeKind::Task);
    assert_eq!(graph.node("c").unwrap().kind, NodeKind::Category);
    assert_eq!(graph.edge("t").unwrap().kind, EdgeKind::Transition);
    assert_eq!(graph.edge("ce").unwrap().kind, EdgeKind::CategoryEdge);
}

#[test]
fn unchanged_session_save_is_stable() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("diagram.tasklist");
    let store = JsonFileStore::new();
    store.save(&path, &sample_graph()).unwrap();
    let first_bytes = fs::read(&path).unwrap();

    let session = DiagramSession::open(&store, path.as_path()).unwrap();
    session.save(&store, path.as_path()).unwrap();

    assert_eq!(fs::read(&path).unwrap(), first_bytes);
    assert_eq!(store.load(&path).unwrap(), session.into_graph());
}

#[test]
fn invalid_json_is_malformed_source() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.tasklist");
    fs::write(&path, "{\"id\": \"g1\", \"tasks\": [").unwrap();

    let err = JsonFileStore::new().load(&path).unwrap_err();
    assert!(matches!(err, StoreError::MalformedSource(_)), "{err}");
}

#[test]
fn missing_required_collection_is_malformed_source() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("partial.tasklist");
    fs::write(&path, json!({"id": "g1", "tasks": []}).to_string()).unwrap();

    let err = JsonFileStore::new().load(&path).unwrap_err();
    assert!(matches!(err, StoreError::MalformedSource(_)), "{err}");
}

#[test]
fn dangling_or_duplicate_references_are_rejected_on_load() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new();

    let dangling = dir.path().join("dangling.tasklist");
    let document = json!({
        "id": "g1",
        "tasks": [{"id": "a", "name": "A", "position": {"x": 0.0, "y": 0.0}}],
        "categories": [],
        "transitions": [{"id": "t", "sourceTaskId": "a", "targetTaskId": "ghost"}],
        "categoryEdges": []
    });
    fs::write(&dangling, document.to_string()).unwrap();
    let err = store.load(&dangling).unwrap_err();
    assert!(err.to_string().contains("ghost"), "{err}");

    let duplicate = dir.path().join("duplicate.tasklist");
    let document = json!({
        "id": "g1",
        "tasks": [{"id": "a", "name": "A", "position": {"x": 0.0, "y": 0.0}}],
        "categories": [{"id": "a", "name": "A", "position": {"x": 0.0, "y": 0.0}}],
        "transitions": [],
        "categoryEdges": []
    });
    fs::write(&duplicate, document.to_string()).unwrap();
    let err = store.load(&duplicate).unwrap_err();
    assert!(matches!(err, StoreError::MalformedSource(_)), "{err}");
}

#[test]
fn untyped_activity_node_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("activity.tasklist");
    let document = json!({
        "id": "g1",
        "tasks": [],
        "categories": [],
        "activityNodes": [{"id": "x", "name": "", "position": {"x": 0.0, "y": 0.0}}],
        "transitions": [],
        "categoryEdges": []
    });
    fs::write(&path, document.to_string()).unwrap();

    let err = JsonFileStore::new().load(&path).unwrap_err();
    assert!(matches!(err, StoreError::MalformedSource(_)), "{err}");
}

#[test]
fn invalid_graph_is_not_written() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("diagram.tasklist");
    let mut graph = sample_graph();
    graph
        .edges
        .push(Edge::new("bad", EdgeKind::Transition, "t1", "nowhere"));

    let err = JsonFileStore::new().save(&path, &graph).unwrap_err();

    assert!(matches!(
        err,
        StoreError::InvalidGraph(GraphValidationError::DanglingTarget { .. })
    ));
    assert!(!path.exists());
}

#[test]
fn save_overwrites_previous_content() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("diagram.tasklist");
    let store = JsonFileStore::new();
    store.save(&path, &sample_graph()).unwrap();

    let smaller = Graph::with_id("g1");
    store.save(&path, &smaller).unwrap();

    let loaded = store.load(&path).unwrap();
    assert_eq!(loaded.id, "g1");
    assert!(loaded.is_empty());
}

#[test]
fn io_failure_is_returned_and_previous_file_kept() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new();
    let saved = dir.path().join("diagram.tasklist");
    store.save(&saved, &sample_graph()).unwrap();
    let before = fs::read(&saved).unwrap();

    // Parent of the target is the regular file written above.
    let blocked = saved.join("inner.tasklist");
    let err = store.save(&blocked, &sample_graph()).unwrap_err();

    match err {
        StoreError::Io { path, .. } => assert_eq!(path, blocked),
        other => panic!("expected io error, got {other}"),
    }
    assert_eq!(fs::read(&saved).unwrap(), before);
    assert_eq!(store.load(&saved).unwrap(), sample_graph());
}

#[test]
fn non_finite_coordinates_are_not_written() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("diagram.tasklist");
    let store = JsonFileStore::new();
    store.save(&path, &sample_graph()).unwrap();
    let before = fs::read(&path).unwrap();

    let mut graph = sample_graph();
    graph.nodes[1].position = Position::new(f64::INFINITY, 0.0);
    let err = store.save(&path, &graph).unwrap_err();

    assert!(matches!(
        err,
        StoreError::InvalidGraph(GraphValidationError::NonFiniteGeometry(ref id)) if id == "t1"
    ));
    assert_eq!(fs::read(&path).unwrap(), before);
}
