//! Reflection repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide date-keyed CRUD over the `reflections` table.
//! - Classify unique-key violations on insert as `Duplicate`.
//!
//! # Invariants
//! - Write paths must call `validate_reflection_fields` before SQL mutations.
//! - Read paths reject invalid persisted rows instead of masking them.
//! - At most one row exists per `date` (unique index, NOCASE collation).

use crate::db::DbError;
use crate::model::reflection::{Reflection, ReflectionUpdate};
use crate::model::validation::{validate_reflection_fields, ValidationError};
use rusqlite::{ffi, params, Connection, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const REFLECTION_SELECT_SQL: &str = "SELECT
    reflection_text,
    mood_score,
    date,
    time_spent_mins
FROM reflections";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for reflection persistence and lookups.
#[derive(Debug)]
pub enum RepoError {
    Validation(ValidationError),
    Db(DbError),
    NotFound(String),
    Duplicate(String),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(date) => write!(f, "no reflection found for date {date}"),
            Self::Duplicate(date) => write!(f, "a reflection already exists for date {date}"),
            Self::InvalidData(message) => {
                write!(f, "invalid persisted reflection data: {message}")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) | Self::Duplicate(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for date-keyed reflection CRUD.
pub trait ReflectionRepository {
    fn create_reflection(&self, reflection: &Reflection) -> RepoResult<()>;
    fn find_reflection(&self, date: &str) -> RepoResult<Option<Reflection>>;
    fn list_reflections(&self) -> RepoResult<Vec<Reflection>>;
    fn update_reflection(&self, date: &str, update: &ReflectionUpdate) -> RepoResult<Reflection>;
    fn delete_reflection(&self, date: &str) -> RepoResult<()>;

    /// Like `find_reflection`, but absence is a `NotFound` error.
    fn get_reflection(&self, date: &str) -> RepoResult<Reflection> {
        self.find_reflection(date)?
            .ok_or_else(|| RepoError::NotFound(date.to_string()))
    }
}

/// SQLite-backed reflection repository.
pub struct SqliteReflectionRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteReflectionRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl ReflectionRepository for SqliteReflectionRepository<'_> {
    fn create_reflection(&self, reflection: &Reflection) -> RepoResult<()> {
        reflection.validate()?;

        if self.find_reflection(&reflection.date)?.is_some() {
            return Err(RepoError::Duplicate(reflection.date.clone()));
        }

        self.conn
            .execute(
                "INSERT INTO reflections (
                    reflection_text,
                    mood_score,
                    date,
                    time_spent_mins
                ) VALUES (?1, ?2, ?3, ?4);",
                params![
                    reflection.reflection_text.as_str(),
                    reflection.mood_score,
                    reflection.date.as_str(),
                    reflection.time_spent_mins,
                ],
            )
            .map_err(|err| classify_insert_error(err, &reflection.date))?;

        Ok(())
    }

    fn find_reflection(&self, date: &str) -> RepoResult<Option<Reflection>> {
        let mut stmt = self
            .conn
            .prepare_cached(&format!("{REFLECTION_SELECT_SQL} WHERE date = ?1;"))?;
        let raw = stmt
            .query_row([date], |row| read_raw_row(row))
            .optional()?;

        raw.map(parse_reflection_row).transpose()
    }

    fn list_reflections(&self) -> RepoResult<Vec<Reflection>> {
        let mut stmt = self
            .conn
            .prepare_cached(&format!("{REFLECTION_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut reflections = Vec::new();

        while let Some(row) = rows.next()? {
            reflections.push(parse_reflection_row(read_raw_row(row)?)?);
        }

        Ok(reflections)
    }

    fn update_reflection(&self, date: &str, update: &ReflectionUpdate) -> RepoResult<Reflection> {
        self.get_reflection(date)?;
        validate_reflection_fields(
            update.reflection_text.as_str(),
            update.mood_score,
            date,
            update.time_spent_mins,
        )?;

        let changed = self.conn.execute(
            "UPDATE reflections
             SET
                reflection_text = ?1,
                mood_score = ?2,
                time_spent_mins = ?3
             WHERE date = ?4;",
            params![
                update.reflection_text.as_str(),
                update.mood_score,
                update.time_spent_mins,
                date,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(date.to_string()));
        }

        self.get_reflection(date)
    }

    fn delete_reflection(&self, date: &str) -> RepoResult<()> {
        self.get_reflection(date)?;

        let changed = self
            .conn
            .execute("DELETE FROM reflections WHERE date = ?1;", [date])?;

        if changed == 0 {
            return Err(RepoError::NotFound(date.to_string()));
        }

        Ok(())
    }
}

struct RawReflectionRow {
    reflection_text: String,
    mood_score: i64,
    date: String,
    time_spent_mins: i64,
}

fn read_raw_row(row: &Row<'_>) -> rusqlite::Result<RawReflectionRow> {
    Ok(RawReflectionRow {
        reflection_text: row.get("reflection_text")?,
        mood_score: row.get("mood_score")?,
        date: row.get("date")?,
        time_spent_mins: row.get("time_spent_mins")?,
    })
}

fn parse_reflection_row(raw: RawReflectionRow) -> RepoResult<Reflection> {
    let reflection = Reflection {
        reflection_text: raw.reflection_text,
        mood_score: raw.mood_score,
        date: raw.date,
        time_spent_mins: raw.time_spent_mins,
    };
    reflection.validate().map_err(|err| {
        RepoError::InvalidData(format!(
            "row for date `{}` fails validation: {err}",
            reflection.date
        ))
    })?;
    Ok(reflection)
}

// Only a unique/primary-key clash means the date is taken; NOT NULL, CHECK
// and other constraint failures stay database errors.
fn classify_insert_error(err: rusqlite::Error, date: &str) -> RepoError {
    match &err {
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE
                || failure.extended_code == ffi::SQLITE_CONSTRAINT_PRIMARYKEY =>
        {
            RepoError::Duplicate(date.to_string())
        }
        _ => err.into(),
    }
}
