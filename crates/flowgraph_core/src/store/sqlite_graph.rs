//! SQLite implementation of the property-graph backend.
//!
//! # Responsibility
//! - Store labelled records with JSON properties and typed relationships.
//! - Map each backend session onto one SQLite transaction.
//!
//! # Invariants
//! - Records are unique per `(label, record_key)`; writes are upserts.
//! - Child record keys are prefixed with the owning diagram's `record_id`,
//!   so diagrams sharing element ids never share a child record.
//! - Deleting a record detaches it: relationship rows cascade.
//! - An uncommitted session rolls back when dropped.

use crate::db::migrations::ensure_migrated;
use crate::db::{open_db, open_db_in_memory};
use crate::store::property_graph::{
    EdgeRecord, NodeRecord, PropertyGraphBackend, PropertyGraphSession, EDGE_LABEL, HAS_EDGE,
    HAS_NODE, NODE_LABEL,
};
use crate::store::{malformed, StoreResult};
use rusqlite::{params, Connection, OptionalExtension, Transaction, TransactionBehavior};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;

/// Property graph stored in one SQLite database.
#[derive(Debug)]
pub struct SqlitePropertyGraph {
    conn: Connection,
}

impl SqlitePropertyGraph {
    /// Opens (and migrates) a database file.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        Ok(Self {
            conn: open_db(path)?,
        })
    }

    /// Opens a private in-memory database.
    pub fn in_memory() -> StoreResult<Self> {
        Ok(Self {
            conn: open_db_in_memory()?,
        })
    }

    /// Wraps an already migrated connection.
    pub fn from_connection(conn: Connection) -> StoreResult<Self> {
        ensure_migrated(&conn)?;
        Ok(Self { conn })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl PropertyGraphBackend for SqlitePropertyGraph {
    type Session<'a>
        = SqliteGraphSession<'a>
    where
        Self: 'a;

    fn open_session(&self) -> StoreResult<SqliteGraphSession<'_>> {
        let tx = Transaction::new_unchecked(&self.conn, TransactionBehavior::Immediate)?;
        Ok(SqliteGraphSession { tx })
    }

    fn open_read_session(&self) -> StoreResult<SqliteGraphSession<'_>> {
        let tx = Transaction::new_unchecked(&self.conn, TransactionBehavior::Deferred)?;
        Ok(SqliteGraphSession { tx })
    }
}

/// One SQLite transaction acting as a property-graph session.
pub struct SqliteGraphSession<'conn> {
    tx: Transaction<'conn>,
}

impl SqliteGraphSession<'_> {
    fn record_id(&self, label: &str, key: &str) -> StoreResult<Option<i64>> {
        let id = self
            .tx
            .query_row(
                "SELECT record_id
                 FROM graph_records
                 WHERE label = ?1
                   AND record_key = ?2;",
                params![label, key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(id)
    }

    fn upsert_record(&self, label: &str, key: &str, properties: &str) -> StoreResult<i64> {
        let id = self.tx.query_row(
            "INSERT INTO graph_records (label, record_key, properties)
             VALUES (?1, ?2, ?3)
             ON CONFLICT (label, record_key) DO UPDATE
             SET properties = excluded.properties,
                 updated_at = (strftime('%s', 'now') * 1000)
             RETURNING record_id;",
            params![label, key, properties],
            |row| row.get(0),
        )?;
        Ok(id)
    }

    fn merge_child<T: Serialize>(
        &self,
        diagram_label: &str,
        diagram_id: &str,
        child_label: &str,
        rel_type: &str,
        key: &str,
        record: &T,
    ) -> StoreResult<()> {
        let diagram_record = self.record_id(diagram_label, diagram_id)?.ok_or_else(|| {
            malformed(
                "property graph",
                format!("diagram record `{diagram_id}` does not exist"),
            )
        })?;
        let properties = serde_json::to_string(record)
            .map_err(crate::store::StoreError::Serialization)?;
        let scoped_key = child_key(diagram_record, key);
        let child_record = self.upsert_record(child_label, &scoped_key, &properties)?;
        self.tx.execute(
            "INSERT OR IGNORE INTO graph_relationships (rel_type, from_record, to_record)
             VALUES (?1, ?2, ?3);",
            params![rel_type, diagram_record, child_record],
        )?;
        Ok(())
    }

    fn child_records<T: DeserializeOwned>(
        &self,
        diagram_label: &str,
        diagram_id: &str,
        rel_type: &str,
    ) -> StoreResult<Vec<T>> {
        let mut stmt = self.tx.prepare(
            "SELECT child.properties
             FROM graph_records diagram
             INNER JOIN graph_relationships rel ON rel.from_record = diagram.record_id
             INNER JOIN graph_records child ON child.record_id = rel.to_record
             WHERE diagram.label = ?1
               AND diagram.record_key = ?2
               AND rel.rel_type = ?3
             ORDER BY child.record_id ASC;",
        )?;
        let mut rows = stmt.query(params![diagram_label, diagram_id, rel_type])?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            let properties: String = row.get(0)?;
            let record = serde_json::from_str(&properties)
                .map_err(|err| malformed("graph_records.properties", err))?;
            records.push(record);
        }
        Ok(records)
    }
}

fn child_key(diagram_record: i64, element_id: &str) -> String {
    format!("{diagram_record}/{element_id}")
}

impl PropertyGraphSession for SqliteGraphSession<'_> {
    fn find_diagram_payload(&mut self, label: &str) -> StoreResult<Option<String>> {
        let payload: Option<Option<String>> = self
            .tx
            .query_row(
                "SELECT json_extract(properties, '$.json')
                 FROM graph_records
                 WHERE label = ?1
                 ORDER BY record_id ASC
                 LIMIT 1;",
                [label],
                |row| row.get(0),
            )
            .optional()?;

        match payload {
            None => Ok(None),
            Some(Some(json)) => Ok(Some(json)),
            Some(None) => Err(malformed(
                "property graph",
                format!("diagram record with label `{label}` has no json payload"),
            )),
        }
    }

    fn upsert_diagram(&mut self, label: &str, diagram_id: &str, payload: &str) -> StoreResult<()> {
        let properties = serde_json::json!({ "uuid": diagram_id, "json": payload }).to_string();
        self.upsert_record(label, diagram_id, &properties)?;
        Ok(())
    }

    fn detach_delete_children(&mut self, label: &str, diagram_id: &str) -> StoreResult<usize> {
        let removed = self.tx.execute(
            "DELETE FROM graph_records
             WHERE record_id IN (
                SELECT rel.to_record
                FROM graph_relationships rel
                INNER JOIN graph_records diagram ON diagram.record_id = rel.from_record
                WHERE diagram.label = ?1
                  AND diagram.record_key = ?2
                  AND rel.rel_type IN (?3, ?4)
             );",
            params![label, diagram_id, HAS_NODE, HAS_EDGE],
        )?;
        Ok(removed)
    }

    fn detach_delete_diagram(&mut self, label: &str, diagram_id: &str) -> StoreResult<bool> {
        let removed = self.tx.execute(
            "DELETE FROM graph_records
             WHERE label = ?1
               AND record_key = ?2;",
            params![label, diagram_id],
        )?;
        Ok(removed > 0)
    }

    fn merge_node_record(
        &mut self,
        label: &str,
        diagram_id: &str,
        record: &NodeRecord,
    ) -> StoreResult<()> {
        self.merge_child(label, diagram_id, NODE_LABEL, HAS_NODE, &record.id, record)
    }

    fn merge_edge_record(
        &mut self,
        label: &str,
        diagram_id: &str,
        record: &EdgeRecord,
    ) -> StoreResult<()> {
        self.merge_child(label, diagram_id, EDGE_LABEL, HAS_EDGE, &record.id, record)
    }

    fn node_records(&mut self, label: &str, diagram_id: &str) -> StoreResult<Vec<NodeRecord>> {
        self.child_records(label, diagram_id, HAS_NODE)
    }

    fn edge_records(&mut self, label: &str, diagram_id: &str) -> StoreResult<Vec<EdgeRecord>> {
        self.child_records(label, diagram_id, HAS_EDGE)
    }

    fn commit(self) -> StoreResult<()> {
        self.tx.commit()?;
        Ok(())
    }
}
