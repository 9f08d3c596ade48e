//! Persistence contracts and store implementations.
//!
//! # Responsibility
//! - Define the `load`/`save` contract shared by every backing store.
//! - Translate between the in-memory `Graph` and external formats.
//!
//! # Invariants
//! - `load` never returns a graph that fails `Graph::validate`; malformed
//!   source data is reported as `StoreError::MalformedSource`.
//! - Missing prior state yields `Graph::empty()` with a fresh id.
//! - `save` overwrites the full diagram state; failures are returned, never
//!   swallowed or retried.

use crate::db::DbError;
use crate::model::graph::{Graph, GraphValidationError};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub mod document;
pub mod file_store;
pub mod property_graph;
pub mod schema;
pub mod sqlite_graph;

pub type StoreResult<T> = Result<T, StoreError>;

/// Errors from persistence operations.
#[derive(Debug)]
pub enum StoreError {
    /// File-system failure at `path`.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Property-graph backend failure.
    Db(DbError),
    /// Stored payload does not match the expected graph shape.
    MalformedSource(String),
    /// In-memory graph violates structural invariants and was not written.
    InvalidGraph(GraphValidationError),
    /// Graph could not be serialized for writing.
    Serialization(serde_json::Error),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "io error at `{}`: {source}", path.display()),
            Self::Db(err) => write!(f, "{err}"),
            Self::MalformedSource(message) => write!(f, "malformed diagram source: {message}"),
            Self::InvalidGraph(err) => write!(f, "refusing to save invalid graph: {err}"),
            Self::Serialization(err) => write!(f, "failed to serialize diagram: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Db(err) => Some(err),
            Self::MalformedSource(_) => None,
            Self::InvalidGraph(err) => Some(err),
            Self::Serialization(err) => Some(err),
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<GraphValidationError> for StoreError {
    fn from(value: GraphValidationError) -> Self {
        Self::InvalidGraph(value)
    }
}

/// Load/save contract shared by file and property-graph stores.
pub trait PersistenceStore {
    /// Addresses one stored diagram (a file path, a diagram label, ...).
    type Locator: ?Sized;

    /// Loads the diagram at `locator`, or a fresh empty graph when none is
    /// stored there.
    fn load(&self, locator: &Self::Locator) -> StoreResult<Graph>;

    /// Overwrites the diagram at `locator` with the full state of `graph`.
    fn save(&self, locator: &Self::Locator, graph: &Graph) -> StoreResult<()>;
}

/// Wraps a structural validation failure found while loading.
pub(crate) fn malformed(context: &str, err: impl Display) -> StoreError {
    StoreError::MalformedSource(format!("{context}: {err}"))
}
