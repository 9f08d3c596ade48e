//! Core diagram model, index, mutation and persistence for flowgraph.
//! This crate owns every structural invariant of a diagram.

pub mod config;
pub mod db;
pub mod engine;
pub mod index;
pub mod logging;
pub mod model;
pub mod session;
pub mod store;
pub mod view;

pub use config::{ConfigError, CoreConfig, StoreKind};
pub use engine::checker::{AllowAllEdges, EdgeCreationChecker, WorkflowEdgeCreationChecker};
pub use engine::mutation::{
    CreateEdgeRequest, CreateNodeRequest, DeleteOutcome, MutationEngine, MutationError,
};
pub use index::{Direction, ElementRef, ModelIndex};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::graph::{
    generate_id, Edge, ElementId, Graph, GraphValidationError, Node, Position, Size,
};
pub use model::kind::{EdgeKind, NodeFamily, NodeKind, Probability};
pub use session::DiagramSession;
pub use store::file_store::JsonFileStore;
pub use store::property_graph::{PropertyGraphStore, DIAGRAM_LABEL};
pub use store::sqlite_graph::SqlitePropertyGraph;
pub use store::{PersistenceStore, StoreError, StoreResult};
pub use view::{ViewTree, ViewTreeFactory};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
