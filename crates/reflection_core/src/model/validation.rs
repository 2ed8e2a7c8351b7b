//! Field-level validation for reflection writes.
//!
//! # Invariants
//! - Checks run in a fixed order: text, mood score, date, duration.
//! - The first violated constraint is the one reported.
//! - Validation is pure: no I/O, no logging.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub const MOOD_SCORE_MIN: i64 = 1;
pub const MOOD_SCORE_MAX: i64 = 5;

pub type ValidationResult<T> = Result<T, ValidationError>;

/// Invalid caller-supplied reflection field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    EmptyReflection,
    MoodScoreOutOfRange(i64),
    EmptyDate,
    InvalidDuration(i64),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyReflection => write!(f, "empty reflection: reflectionText must not be empty"),
            Self::MoodScoreOutOfRange(value) => write!(
                f,
                "mood score out of range: moodScore must be an integer between {MOOD_SCORE_MIN} and {MOOD_SCORE_MAX}, got {value}"
            ),
            Self::EmptyDate => write!(f, "empty date: date must not be empty"),
            Self::InvalidDuration(value) => write!(
                f,
                "negative/non-integer duration: timeSpentMins must be a non-negative integer, got {value}"
            ),
        }
    }
}

impl Error for ValidationError {}

/// Checks the four reflection fields before any write.
///
/// Returns `Ok(())` when every field is acceptable; there is no "invalid but
/// not an error" outcome.
///
/// # Errors
/// - `EmptyReflection` when `reflection_text` is empty.
/// - `MoodScoreOutOfRange` when `mood_score` is outside `1..=5`.
/// - `EmptyDate` when `date` is empty.
/// - `InvalidDuration` when `time_spent_mins` is negative.
pub fn validate_reflection_fields(
    reflection_text: &str,
    mood_score: i64,
    date: &str,
    time_spent_mins: i64,
) -> ValidationResult<()> {
    if reflection_text.is_empty() {
        return Err(ValidationError::EmptyReflection);
    }
    if !(MOOD_SCORE_MIN..=MOOD_SCORE_MAX).contains(&mood_score) {
        return Err(ValidationError::MoodScoreOutOfRange(mood_score));
    }
    if date.is_empty() {
        return Err(ValidationError::EmptyDate);
    }
    if time_spent_mins < 0 {
        return Err(ValidationError::InvalidDuration(time_spent_mins));
    }
    Ok(())
}
