//! Caller-facing store errors.

use crate::model::validation::ValidationError;
use crate::repo::reflection_repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Closed error taxonomy surfaced by `ReflectionStore`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Caller-supplied data violates a field constraint.
    InvalidInput(ValidationError),
    /// Lookup by date matched nothing.
    NotFound(String),
    /// Create collided with an existing date.
    Duplicate(String),
    /// Store not ready, transport failure, or unclassified failure.
    Database(DatabaseError),
}

/// Detail for `StoreError::Database`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseError {
    NotReady {
        state: &'static str,
        reason: Option<String>,
    },
    /// Lower-level failure; carries the original message.
    Transport(String),
    /// A blocking task panicked or was cancelled.
    Unexpected { operation: &'static str },
}

impl StoreError {
    /// Stable machine-readable kind label.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "invalid_input",
            Self::NotFound(_) => "not_found",
            Self::Duplicate(_) => "duplicate",
            Self::Database(_) => "database",
        }
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput(err) => write!(f, "invalid input: {err}"),
            Self::NotFound(date) => write!(f, "no reflection found for date {date}"),
            Self::Duplicate(date) => write!(f, "a reflection already exists for date {date}"),
            Self::Database(err) => write!(f, "database error: {err}"),
        }
    }
}

impl Display for DatabaseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotReady {
                state,
                reason: Some(reason),
            } => write!(f, "reflection store is not ready (state={state}): {reason}"),
            Self::NotReady {
                state,
                reason: None,
            } => write!(f, "reflection store is not ready (state={state})"),
            Self::Transport(message) => write!(f, "{message}"),
            Self::Unexpected { operation } => write!(
                f,
                "unknown failure in {operation}; this should never happen"
            ),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidInput(err) => Some(err),
            Self::Database(err) => Some(err),
            Self::NotFound(_) | Self::Duplicate(_) => None,
        }
    }
}

impl Error for DatabaseError {}

impl From<RepoError> for StoreError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::InvalidInput(err),
            RepoError::NotFound(date) => Self::NotFound(date),
            RepoError::Duplicate(date) => Self::Duplicate(date),
            RepoError::Db(err) => Self::Database(DatabaseError::Transport(err.to_string())),
            RepoError::InvalidData(message) => {
                Self::Database(DatabaseError::Transport(message))
            }
        }
    }
}

impl From<DatabaseError> for StoreError {
    fn from(value: DatabaseError) -> Self {
        Self::Database(value)
    }
}
