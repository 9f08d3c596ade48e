use flowgraph_core::db::DbError;
use flowgraph_core::store::property_graph::{
    NodeRecord, PropertyGraphBackend, PropertyGraphSession, EDGE_LABEL, NODE_LABEL,
};
use flowgraph_core::{
    DiagramSession, Edge, EdgeKind, Graph, MutationEngine, Node, NodeKind, PersistenceStore,
    Position, Probability, PropertyGraphStore, Size, SqlitePropertyGraph, StoreError,
    WorkflowEdgeCreationChecker, DIAGRAM_LABEL,
};
use rusqlite::Connection;

fn setup() -> PropertyGraphStore<SqlitePropertyGraph> {
    PropertyGraphStore::new(SqlitePropertyGraph::in_memory().unwrap())
}

fn sample_graph() -> Graph {
    let mut graph = Graph::with_id("g1");
    graph.nodes.push(
        Node::new("a", NodeKind::Task, "  Draft  ", Position::new(1.0, 2.0))
            .with_size(Size::new(140.0, 60.0)),
    );
    graph
        .nodes
        .push(Node::new("d", NodeKind::Decision, "", Position::new(3.0, 4.0)));
    graph
        .nodes
        .push(Node::new("b", NodeKind::Fork, "", Position::new(5.0, 6.0)));
    graph
        .edges
        .push(Edge::new("e1", EdgeKind::Transition, "a", "d").with_label("check"));
    graph.edges.push(
        Edge::new("w1", EdgeKind::Weighted, "d", "b").with_probability(Probability::High),
    );
    graph
}

fn count_records(conn: &Connection, label: &str) -> i64 {
    conn.query_row(
        "SELECT COUNT(*) FROM graph_records WHERE label = ?1;",
        [label],
        |row| row.get(0),
    )
    .unwrap()
}

fn count_relationships(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM graph_relationships;", [], |row| {
        row.get(0)
    })
    .unwrap()
}

#[test]
fn empty_store_loads_fresh_graph_without_writing() {
    let store = setup();

    let first = store.load(DIAGRAM_LABEL).unwrap();
    let second = store.load(DIAGRAM_LABEL).unwrap();

    assert!(first.is_empty());
    assert_ne!(first.id, second.id);
    assert_eq!(count_records(store.backend().connection(), DIAGRAM_LABEL), 0);
}

#[test]
fn save_then_load_round_trips_full_graph() {
    let store = setup();
    let graph = sample_graph();

    store.save(DIAGRAM_LABEL, &graph).unwrap();
    let loaded = store.load(DIAGRAM_LABEL).unwrap();

    assert_eq!(loaded, graph);
}

#[test]
fn save_writes_node_and_edge_records_linked_to_diagram() {
    let store = setup();
    store.save(DIAGRAM_LABEL, &sample_graph()).unwrap();

    let (nodes, edges) = store.records(DIAGRAM_LABEL, "g1").unwrap();

    assert_eq!(nodes.len(), 3);
    assert_eq!(
        nodes[0],
        NodeRecord {
            id: "a".to_string(),
            type_id: "task".to_string(),
            name: "Draft".to_string(),
            x: 1.0,
            y: 2.0,
            w: 140.0,
            h: 60.0,
        }
    );
    assert_eq!((nodes[1].w, nodes[1].h), (100.0, 50.0));
    assert_eq!(nodes[2].type_id, "activityNode:fork");

    assert_eq!(edges.len(), 2);
    assert_eq!(edges[1].type_id, "edge:weighted");
    assert_eq!(edges[1].source_id, "d");
    assert_eq!(edges[1].target_id, "b");

    let conn = store.backend().connection();
    assert_eq!(count_records(conn, DIAGRAM_LABEL), 1);
    assert_eq!(count_relationships(conn), 5);
}

#[test]
fn resaving_replaces_children_without_duplicates() {
    let store = setup();
    let mut session = DiagramSession::new(sample_graph());
    session.save(&store, DIAGRAM_LABEL).unwrap();

    let engine = MutationEngine::new(WorkflowEdgeCreationChecker);
    engine.delete_element(&mut session, "b");
    session.save(&store, DIAGRAM_LABEL).unwrap();
    session.save(&store, DIAGRAM_LABEL).unwrap();

    let conn = store.backend().connection();
    assert_eq!(count_records(conn, DIAGRAM_LABEL), 1);
    assert_eq!(count_records(conn, NODE_LABEL), 2);
    assert_eq!(count_records(conn, EDGE_LABEL), 1);
    assert_eq!(count_relationships(conn), 3);
    assert_eq!(store.load(DIAGRAM_LABEL).unwrap(), *session.graph());
}

#[test]
fn saving_empty_graph_removes_diagram() {
    let store = setup();
    let mut session = DiagramSession::new(sample_graph());
    session.save(&store, DIAGRAM_LABEL).unwrap();

    let engine = MutationEngine::new(WorkflowEdgeCreationChecker);
    engine.delete_elements(&mut session, ["a", "d", "b"]);
    assert!(session.graph().is_empty());
    session.save(&store, DIAGRAM_LABEL).unwrap();

    let conn = store.backend().connection();
    assert_eq!(count_records(conn, DIAGRAM_LABEL), 0);
    assert_eq!(count_records(conn, NODE_LABEL), 0);
    assert_eq!(count_relationships(conn), 0);

    let reloaded = store.load(DIAGRAM_LABEL).unwrap();
    assert!(reloaded.is_empty());
    assert_ne!(reloaded.id, "g1");
}

#[test]
fn labels_keep_diagrams_apart() {
    let store = setup();
    let mut other = Graph::with_id("g2");
    other
        .nodes
        .push(Node::new("x", NodeKind::Category, "X", Position::default()));

    store.save(DIAGRAM_LABEL, &sample_graph()).unwrap();
    store.save("ArchivedDiagram", &other).unwrap();

    assert_eq!(store.load(DIAGRAM_LABEL).unwrap().id, "g1");
    assert_eq!(store.load("ArchivedDiagram").unwrap(), other);
}

#[test]
fn corrupt_payload_is_malformed_source() {
    let store = setup();
    store
        .backend()
        .connection()
        .execute(
            "INSERT INTO graph_records (label, record_key, properties)
             VALUES (?1, 'g1', json_object('uuid', 'g1', 'json', '{\"id\":\"g1\",\"type\":\"tree\"}'));",
            [DIAGRAM_LABEL],
        )
        .unwrap();

    let err = store.load(DIAGRAM_LABEL).unwrap_err();
    assert!(matches!(err, StoreError::MalformedSource(_)), "{err}");
}

#[test]
fn file_backed_store_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("diagram.sqlite3");

    {
        let store = PropertyGraphStore::new(SqlitePropertyGraph::open(&path).unwrap());
        store.save(DIAGRAM_LABEL, &sample_graph()).unwrap();
    }

    let store = PropertyGraphStore::new(SqlitePropertyGraph::open(&path).unwrap());
    assert_eq!(store.load(DIAGRAM_LABEL).unwrap(), sample_graph());
}

#[test]
fn diagrams_sharing_element_ids_keep_separate_records() {
    let store = setup();
    let mut first = Graph::with_id("g1");
    first
        .nodes
        .push(Node::new("a", NodeKind::Task, "One", Position::new(1.0, 1.0)));
    let mut second = Graph::with_id("g2");
    second
        .nodes
        .push(Node::new("a", NodeKind::Category, "Two", Position::new(9.0, 9.0)));

    store.save(DIAGRAM_LABEL, &first).unwrap();
    store.save("ArchivedDiagram", &second).unwrap();

    let (first_nodes, _) = store.records(DIAGRAM_LABEL, "g1").unwrap();
    let (second_nodes, _) = store.records("ArchivedDiagram", "g2").unwrap();
    assert_eq!(first_nodes.len(), 1);
    assert_eq!(first_nodes[0].name, "One");
    assert_eq!(first_nodes[0].type_id, "task");
    assert_eq!(second_nodes[0].name, "Two");
    assert_eq!(count_records(store.backend().connection(), NODE_LABEL), 2);

    store.save("ArchivedDiagram", &Graph::with_id("g2")).unwrap();

    let (first_nodes, _) = store.records(DIAGRAM_LABEL, "g1").unwrap();
    assert_eq!(first_nodes.len(), 1);
    assert_eq!(first_nodes[0].name, "One");
    assert_eq!(store.load(DIAGRAM_LABEL).unwrap(), first);
}

#[test]
fn failed_save_rolls_back_and_releases_session() {
    let store = setup();
    let graph = sample_graph();
    store.save(DIAGRAM_LABEL, &graph).unwrap();

    let conn = store.backend().connection();
    conn.execute_batch(
        "CREATE TRIGGER reject_edges BEFORE INSERT ON graph_records
         WHEN NEW.label = 'Edge'
         BEGIN
             SELECT RAISE(ABORT, 'edge records are read-only');
         END;",
    )
    .unwrap();

    let mut changed = graph.clone();
    changed.nodes[0].name = "Renamed".to_string();
    changed
        .edges
        .push(Edge::new("e2", EdgeKind::Transition, "b", "a"));
    let err = store.save(DIAGRAM_LABEL, &changed).unwrap_err();
    assert!(matches!(err, StoreError::Db(DbError::Sqlite(_))), "{err}");

    assert_eq!(store.load(DIAGRAM_LABEL).unwrap(), graph);
    let (nodes, edges) = store.records(DIAGRAM_LABEL, "g1").unwrap();
    assert_eq!(nodes.len(), 3);
    assert_eq!(nodes[0].name, "Draft");
    assert_eq!(edges.len(), 2);
    assert_eq!(count_relationships(conn), 5);

    conn.execute_batch("DROP TRIGGER reject_edges;").unwrap();
    store.save(DIAGRAM_LABEL, &changed).unwrap();
    assert_eq!(store.load(DIAGRAM_LABEL).unwrap(), changed);
}

#[test]
fn non_finite_geometry_is_not_written() {
    let store = setup();
    let mut graph = sample_graph();
    graph.nodes[2].position = Position::new(0.0, f64::NAN);

    let err = store.save(DIAGRAM_LABEL, &graph).unwrap_err();

    assert!(matches!(err, StoreError::InvalidGraph(_)), "{err}");
    assert_eq!(count_records(store.backend().connection(), DIAGRAM_LABEL), 0);
}

#[test]
fn read_session_does_not_block_other_writers() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("diagram.sqlite3");
    let backend = SqlitePropertyGraph::open(&path).unwrap();

    let mut session = backend.open_read_session().unwrap();
    assert_eq!(session.find_diagram_payload(DIAGRAM_LABEL).unwrap(), None);

    let writer = Connection::open(&path).unwrap();
    writer.execute_batch("BEGIN IMMEDIATE; COMMIT;").unwrap();
    drop(session);

    let store = PropertyGraphStore::new(backend);
    store.save(DIAGRAM_LABEL, &sample_graph()).unwrap();
    assert_eq!(store.load(DIAGRAM_LABEL).unwrap(), sample_graph());
}
