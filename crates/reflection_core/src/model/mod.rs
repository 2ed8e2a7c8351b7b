//! Journal domain model.
//!
//! # Responsibility
//! - Define the canonical `Reflection` record and its update payload.
//! - Own field-level validation shared by every write path.
//!
//! # Invariants
//! - `date` is the natural key of a reflection and never changes after create.
//! - Every persisted reflection has passed `validate_reflection_fields`.

pub mod reflection;
pub mod validation;
