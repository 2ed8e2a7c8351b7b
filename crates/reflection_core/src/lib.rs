//! Core domain logic for the reflection journal.
//! This crate is the single source of truth for reflection invariants.

pub mod api;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod store;

pub use api::{handle_json, handle_request, ErrorBody, ReflectionRequest, ReflectionResponse};
pub use config::{ConfigError, StoreConfig, StoreLocation};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::reflection::{Reflection, ReflectionUpdate};
pub use model::validation::{
    validate_reflection_fields, ValidationError, ValidationResult, MOOD_SCORE_MAX, MOOD_SCORE_MIN,
};
pub use repo::reflection_repo::{
    ReflectionRepository, RepoError, RepoResult, SqliteReflectionRepository,
};
pub use store::{DatabaseError, ReflectionStore, StoreError, StoreResult, StoreState};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
