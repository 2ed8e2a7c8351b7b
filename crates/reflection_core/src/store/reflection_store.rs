//! `ReflectionStore`: connection lifecycle plus async CRUD.
//!
//! # Responsibility
//! - Drive `uninitialized -> initializing -> ready` (or `failed`), then
//!   `closed` on shutdown.
//! - Run repository work on tokio's blocking pool.
//! - Emit `event=reflection_* module=store` diagnostics (metadata only).
//!
//! # Invariants
//! - Reflection text is never logged; dates are logged quoted and escaped.
//! - A failed initialization is terminal; the store is not retried.

use super::error::{DatabaseError, StoreError, StoreResult};
use crate::config::{StoreConfig, StoreLocation};
use crate::db::{open_db, open_db_in_memory, DbResult};
use crate::logging::quote_log_value;
use crate::model::reflection::{Reflection, ReflectionUpdate};
use crate::repo::reflection_repo::{
    ReflectionRepository, RepoResult, SqliteReflectionRepository,
};
use log::{error, info, warn};
use rusqlite::Connection;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

type SharedConnection = Arc<Mutex<Connection>>;

/// Public view of the store lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreState {
    Uninitialized,
    Initializing,
    Ready,
    Failed,
    Closed,
}

impl StoreState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Uninitialized => "uninitialized",
            Self::Initializing => "initializing",
            Self::Ready => "ready",
            Self::Failed => "failed",
            Self::Closed => "closed",
        }
    }
}

enum Lifecycle {
    Uninitialized,
    Initializing,
    Ready(SharedConnection),
    Failed(String),
    Closed,
}

impl Lifecycle {
    fn state(&self) -> StoreState {
        match self {
            Self::Uninitialized => StoreState::Uninitialized,
            Self::Initializing => StoreState::Initializing,
            Self::Ready(_) => StoreState::Ready,
            Self::Failed(_) => StoreState::Failed,
            Self::Closed => StoreState::Closed,
        }
    }

    fn not_ready(&self) -> DatabaseError {
        DatabaseError::NotReady {
            state: self.state().as_str(),
            reason: match self {
                Self::Failed(reason) => Some(reason.clone()),
                _ => None,
            },
        }
    }
}

/// Date-keyed journal store over one long-lived SQLite connection.
///
/// Construct once at startup, call [`ReflectionStore::initialize`], then
/// share by reference (or `Arc`) with every caller.
pub struct ReflectionStore {
    config: StoreConfig,
    lifecycle: Mutex<Lifecycle>,
}

impl ReflectionStore {
    /// Creates an uninitialized store. No I/O happens here.
    pub fn new(config: StoreConfig) -> Self {
        Self {
            config,
            lifecycle: Mutex::new(Lifecycle::Uninitialized),
        }
    }

    /// Creates and initializes a store in one step.
    pub async fn open(config: StoreConfig) -> StoreResult<Self> {
        let store = Self::new(config);
        store.initialize().await?;
        Ok(store)
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn state(&self) -> StoreState {
        self.lock_lifecycle().state()
    }

    /// Opens the connection and bootstraps the `reflections` collection.
    ///
    /// Idempotent once `ready`. Returns a not-ready error while another
    /// initialization is in flight, after a failed attempt, or after close.
    ///
    /// # Errors
    /// - `Database(NotReady)` for the lifecycle cases above.
    /// - `Database(Transport)` when the config is invalid or opening or
    ///   migrating the database fails. Both leave the store `failed`.
    pub async fn initialize(&self) -> StoreResult<()> {
        {
            let mut lifecycle = self.lock_lifecycle();
            match &*lifecycle {
                Lifecycle::Uninitialized => {}
                Lifecycle::Ready(_) => return Ok(()),
                other => return Err(other.not_ready().into()),
            }
            if let Err(err) = self.config.validate() {
                error!(
                    "event=store_init module=store status=error error_code=invalid_config error={}",
                    quote_log_value(&err.to_string())
                );
                *lifecycle = Lifecycle::Failed(err.to_string());
                return Err(DatabaseError::Transport(err.to_string()).into());
            }
            *lifecycle = Lifecycle::Initializing;
        }
        let mut init_guard = InitGuard::arm(&self.lifecycle);

        let started_at = Instant::now();
        let location = self.config.location();
        let mode = match &location {
            StoreLocation::Memory => "memory",
            StoreLocation::File(_) => "file",
        };
        info!(
            "event=store_init module=store status=start mode={} db_name={} resolver_override={}",
            mode,
            self.config.database_name,
            describe_resolver_override(&self.config)
        );

        let joined = tokio::task::spawn_blocking(move || open_location(&location)).await;
        init_guard.disarm();
        let outcome = match joined {
            Ok(Ok(conn)) => Ok(conn),
            Ok(Err(err)) => Err(DatabaseError::Transport(err.to_string())),
            Err(_) => Err(DatabaseError::Unexpected {
                operation: "initialize",
            }),
        };

        let mut lifecycle = self.lock_lifecycle();
        if !matches!(&*lifecycle, Lifecycle::Initializing) {
            // Closed while the connection was being opened.
            warn!(
                "event=store_init module=store status=error error_code=store_closed_during_init"
            );
            return Err(lifecycle.not_ready().into());
        }

        match outcome {
            Ok(conn) => {
                *lifecycle = Lifecycle::Ready(Arc::new(Mutex::new(conn)));
                info!(
                    "event=store_init module=store status=ok mode={} duration_ms={}",
                    mode,
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=store_init module=store status=error mode={} duration_ms={} error_code=store_init_failed error={}",
                    mode,
                    started_at.elapsed().as_millis(),
                    err
                );
                *lifecycle = Lifecycle::Failed(err.to_string());
                Err(err.into())
            }
        }
    }

    /// Persists a new reflection and returns it unchanged.
    ///
    /// # Errors
    /// - `InvalidInput` when any field fails validation.
    /// - `Duplicate` when a reflection already exists for `reflection.date`.
    /// - `Database` for lifecycle or transport failures.
    pub async fn create(&self, reflection: Reflection) -> StoreResult<Reflection> {
        let date = reflection.date.clone();
        self.run("create", &date, move |repo| {
            repo.create_reflection(&reflection)?;
            Ok(reflection)
        })
        .await
    }

    /// Returns the reflection stored for `date`.
    pub async fn read_one(&self, date: impl Into<String>) -> StoreResult<Reflection> {
        let date = date.into();
        let key = date.clone();
        self.run("read_one", &date, move |repo| repo.get_reflection(&key))
            .await
    }

    /// Returns every reflection in storage order. Empty store yields `[]`.
    pub async fn read_all(&self) -> StoreResult<Vec<Reflection>> {
        self.run("read_all", "*", |repo| repo.list_reflections())
            .await
    }

    /// Replaces text, mood and duration of the reflection stored for `date`.
    ///
    /// `date` itself is immutable. Returns the updated record.
    ///
    /// # Errors
    /// - `NotFound` when nothing is stored for `date` (checked first).
    /// - `InvalidInput` when the new values fail validation.
    pub async fn update(
        &self,
        date: impl Into<String>,
        update: ReflectionUpdate,
    ) -> StoreResult<Reflection> {
        let date = date.into();
        let key = date.clone();
        self.run("update", &date, move |repo| {
            repo.update_reflection(&key, &update)
        })
        .await
    }

    /// Removes the reflection stored for `date`.
    pub async fn delete(&self, date: impl Into<String>) -> StoreResult<()> {
        let date = date.into();
        let key = date.clone();
        self.run("delete", &date, move |repo| repo.delete_reflection(&key))
            .await
    }

    /// Releases the connection. Later operations fail with not-ready.
    ///
    /// Safe to call in any state; repeated calls are no-ops.
    pub async fn close(&self) -> StoreResult<()> {
        let previous = std::mem::replace(&mut *self.lock_lifecycle(), Lifecycle::Closed);
        let conn = match previous {
            Lifecycle::Ready(conn) => conn,
            other => {
                info!(
                    "event=store_close module=store status=ok from_state={}",
                    other.state().as_str()
                );
                return Ok(());
            }
        };

        let joined = tokio::task::spawn_blocking(move || close_connection(conn)).await;
        match joined {
            Ok(Ok(())) => {
                info!("event=store_close module=store status=ok from_state=ready");
                Ok(())
            }
            Ok(Err(err)) => {
                error!(
                    "event=store_close module=store status=error error_code=db_close_failed error={}",
                    err
                );
                Err(DatabaseError::Transport(err.to_string()).into())
            }
            Err(_) => Err(DatabaseError::Unexpected { operation: "close" }.into()),
        }
    }

    async fn run<T, F>(&self, operation: &'static str, date: &str, work: F) -> StoreResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&SqliteReflectionRepository<'_>) -> RepoResult<T> + Send + 'static,
    {
        let date = quote_log_value(date);
        let conn = match self.ready_connection() {
            Ok(conn) => conn,
            Err(err) => {
                warn!(
                    "event=reflection_{} module=store status=error date={} error_kind={} error={}",
                    operation,
                    date,
                    err.kind(),
                    err
                );
                return Err(err);
            }
        };

        let started_at = Instant::now();
        let joined = tokio::task::spawn_blocking(move || {
            let guard = conn.lock().unwrap_or_else(PoisonError::into_inner);
            let repo = SqliteReflectionRepository::new(&guard);
            work(&repo)
        })
        .await;

        let result = match joined {
            Ok(outcome) => outcome.map_err(StoreError::from),
            Err(_) => Err(DatabaseError::Unexpected { operation }.into()),
        };

        match &result {
            Ok(_) => info!(
                "event=reflection_{} module=store status=ok date={} duration_ms={}",
                operation,
                date,
                started_at.elapsed().as_millis()
            ),
            Err(StoreError::Database(err)) => error!(
                "event=reflection_{} module=store status=error date={} duration_ms={} error_kind=database error={}",
                operation,
                date,
                started_at.elapsed().as_millis(),
                err
            ),
            Err(err) => info!(
                "event=reflection_{} module=store status=rejected date={} duration_ms={} error_kind={}",
                operation,
                date,
                started_at.elapsed().as_millis(),
                err.kind()
            ),
        }

        result
    }

    fn ready_connection(&self) -> StoreResult<SharedConnection> {
        match &*self.lock_lifecycle() {
            Lifecycle::Ready(conn) => Ok(Arc::clone(conn)),
            other => Err(other.not_ready().into()),
        }
    }

    fn lock_lifecycle(&self) -> MutexGuard<'_, Lifecycle> {
        self.lifecycle.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Resets `initializing` back to `uninitialized` when an `initialize` future
/// is dropped before the open finishes.
struct InitGuard<'a> {
    lifecycle: &'a Mutex<Lifecycle>,
    armed: bool,
}

impl<'a> InitGuard<'a> {
    fn arm(lifecycle: &'a Mutex<Lifecycle>) -> Self {
        Self {
            lifecycle,
            armed: true,
        }
    }

    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for InitGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut lifecycle = self.lifecycle.lock().unwrap_or_else(PoisonError::into_inner);
        if matches!(&*lifecycle, Lifecycle::Initializing) {
            *lifecycle = Lifecycle::Uninitialized;
            warn!("event=store_init module=store status=cancelled");
        }
    }
}

fn open_location(location: &StoreLocation) -> DbResult<Connection> {
    match location {
        StoreLocation::Memory => open_db_in_memory(),
        StoreLocation::File(path) => open_db(path),
    }
}

fn close_connection(conn: SharedConnection) -> Result<(), rusqlite::Error> {
    match Arc::try_unwrap(conn) {
        Ok(mutex) => mutex
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
            .close()
            .map_err(|(_, err)| err),
        // An in-flight operation still holds a clone; the connection closes
        // when it drops.
        Err(_) => Ok(()),
    }
}

fn describe_resolver_override(config: &StoreConfig) -> String {
    if config.dns_servers.is_empty() {
        return "none".to_string();
    }
    config
        .dns_servers
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}
