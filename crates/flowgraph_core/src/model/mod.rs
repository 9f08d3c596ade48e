//! Workflow graph domain model.
//!
//! # Responsibility
//! - Define the canonical node/edge/graph structures mutated by the engine.
//! - Keep node and edge kinds as closed sum types validated once at the
//!   deserialization boundary.
//!
//! # Invariants
//! - Node and edge ids are unique within one `Graph`.
//! - Every edge endpoint references a node of the same `Graph`.

pub mod graph;
pub mod kind;
