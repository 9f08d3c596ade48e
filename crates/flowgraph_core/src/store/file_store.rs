//! JSON file-backed persistence store.
//!
//! # Responsibility
//! - Load a task list document from disk into a validated `Graph`.
//! - Overwrite the document with the full graph on save.
//!
//! # Invariants
//! - A missing or blank file loads as a fresh empty graph.
//! - Writes go to a temporary sibling file that replaces the target, so a
//!   failed save never leaves a truncated document behind.

use crate::model::graph::Graph;
use crate::store::document::TaskListDocument;
use crate::store::{malformed, PersistenceStore, StoreError, StoreResult};
use log::{error, info};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::Path;
use std::time::Instant;
use tempfile::NamedTempFile;

/// Stores one diagram per JSON file.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFileStore {
    pretty: bool,
}

impl JsonFileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes indented JSON instead of the compact form.
    pub fn pretty() -> Self {
        Self { pretty: true }
    }
}

impl PersistenceStore for JsonFileStore {
    type Locator = Path;

    fn load(&self, path: &Path) -> StoreResult<Graph> {
        let started_at = Instant::now();
        info!(
            "event=graph_load module=store status=start store=file path={}",
            path.display()
        );

        match read_graph(path) {
            Ok((graph, created)) => {
                info!(
                    "event=graph_load module=store status=ok store=file created={} graph_id={} nodes={} edges={} duration_ms={}",
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
                    "event=graph_load module=store status=error store=file path={} duration_ms={} error={}",
                    path.display(),
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }

    fn save(&self, path: &Path, graph: &Graph) -> StoreResult<()> {
        let started_at = Instant::now();
        match write_graph(path, graph, self.pretty) {
            Ok(()) => {
                info!(
                    "event=graph_save module=store status=ok store=file graph_id={} nodes={} edges={} duration_ms={}",
                    graph.id,
                    graph.nodes.len(),
                    graph.edges.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=graph_save module=store status=error store=file path={} duration_ms={} error={}",
                    path.display(),
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }
}

/// Returns the loaded graph and whether it was freshly created.
fn read_graph(path: &Path) -> StoreResult<(Graph, bool)> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok((Graph::empty(), true)),
        Err(err) => {
            return Err(StoreError::Io {
                path: path.to_path_buf(),
                source: err,
            })
        }
    };

    if text.trim().is_empty() {
        return Ok((Graph::empty(), true));
    }

    let document: TaskListDocument =
        serde_json::from_str(&text).map_err(|err| malformed("task list document", err))?;
    Ok((Graph::try_from(document)?, false))
}

fn write_graph(path: &Path, graph: &Graph, pretty: bool) -> StoreResult<()> {
    graph.validate()?;

    let document = TaskListDocument::from(graph);
    let bytes = if pretty {
        serde_json::to_vec_pretty(&document)
    } else {
        serde_json::to_vec(&document)
    }
    .map_err(StoreError::Serialization)?;

    let io_error = |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    };

    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).map_err(io_error)?;

    let mut temp = NamedTempFile::new_in(parent).map_err(io_error)?;
    temp.write_all(&bytes).map_err(io_error)?;
    temp.as_file().sync_all().map_err(io_error)?;
    temp.persist(path).map_err(|err| io_error(err.error))?;
    Ok(())
}
