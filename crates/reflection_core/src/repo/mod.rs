//! Repository layer over the `reflections` collection.
//!
//! # Responsibility
//! - Define the date-keyed data access contract.
//! - Isolate SQLite query details from the async store.
//!
//! # Invariants
//! - Write paths validate fields before persistence.
//! - Lookups return semantic errors (`NotFound`, `Duplicate`) in addition to
//!   DB transport errors.

pub mod reflection_repo;
