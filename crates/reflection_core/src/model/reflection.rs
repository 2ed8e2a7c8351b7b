//! Reflection domain model.
//!
//! # Responsibility
//! - Define the journal entry shape shared by store, handler and CLI.
//! - Keep wire names (`reflectionText`, `moodScore`, ...) stable.
//!
//! # Invariants
//! - `date` identifies a reflection; updates replace every other field.

use super::validation::{validate_reflection_fields, ValidationResult};
use serde::{Deserialize, Serialize};

/// One journal entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reflection {
    /// Free-form journal text. Must not be empty.
    pub reflection_text: String,
    /// Mood on a 1..=5 scale.
    pub mood_score: i64,
    /// Natural key. Format is caller-defined, only non-emptiness is enforced.
    pub date: String,
    /// Minutes spent reflecting. Must not be negative.
    pub time_spent_mins: i64,
}

impl Reflection {
    pub fn new(
        reflection_text: impl Into<String>,
        mood_score: i64,
        date: impl Into<String>,
        time_spent_mins: i64,
    ) -> Self {
        Self {
            reflection_text: reflection_text.into(),
            mood_score,
            date: date.into(),
            time_spent_mins,
        }
    }

    /// Runs field validation against this record.
    pub fn validate(&self) -> ValidationResult<()> {
        validate_reflection_fields(
            self.reflection_text.as_str(),
            self.mood_score,
            self.date.as_str(),
            self.time_spent_mins,
        )
    }
}

/// Replacement values for an existing reflection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReflectionUpdate {
    pub reflection_text: String,
    pub mood_score: i64,
    pub time_spent_mins: i64,
}

impl ReflectionUpdate {
    pub fn new(reflection_text: impl Into<String>, mood_score: i64, time_spent_mins: i64) -> Self {
        Self {
            reflection_text: reflection_text.into(),
            mood_score,
            time_spent_mins,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Reflection, ReflectionUpdate};

    #[test]
    fn serializes_with_camel_case_field_names() {
        let reflection = Reflection::new("Sunny day", 3, "2026-01-30", 50);
        let value = serde_json::to_value(&reflection).expect("reflection should serialize");
        assert_eq!(value["reflectionText"], "Sunny day");
        assert_eq!(value["moodScore"], 3);
        assert_eq!(value["date"], "2026-01-30");
        assert_eq!(value["timeSpentMins"], 50);
    }

    #[test]
    fn update_deserializes_from_camel_case_without_date() {
        let update: ReflectionUpdate = serde_json::from_str(
            r#"{"reflectionText":"Rainy now","moodScore":1,"timeSpentMins":30}"#,
        )
        .expect("update should deserialize");
        assert_eq!(update, ReflectionUpdate::new("Rainy now", 1, 30));
    }
}
