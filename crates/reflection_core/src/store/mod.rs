//! Async record store over the `reflections` collection.
//!
//! # Responsibility
//! - Own the single long-lived connection and its lifecycle.
//! - Expose async CRUD keyed by `date`.
//! - Translate repository failures into the caller-facing error taxonomy.
//!
//! # Invariants
//! - Operations only run in the `ready` state.
//! - All SQLite work for one operation runs while holding the connection
//!   lock, so check-then-write sequences do not interleave in-process.

mod error;
mod reflection_store;

pub use error::{DatabaseError, StoreError, StoreResult};
pub use reflection_store::{ReflectionStore, StoreState};
