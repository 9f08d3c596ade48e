//! Mutation engine and edge-creation policy.
//!
//! # Responsibility
//! - Apply structural edits atomically to one `DiagramSession`.
//! - Keep kind-compatibility rules outside the engine, behind
//!   `EdgeCreationChecker`.

pub mod checker;
pub mod mutation;
