use reflection_core::db::open_db_in_memory;
use reflection_core::{
    Reflection, ReflectionRepository, ReflectionUpdate, RepoError, SqliteReflectionRepository,
    ValidationError,
};

#[test]
fn create_and_find_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteReflectionRepository::new(&conn);

    let reflection = Reflection::new("Sunny day", 3, "2026-01-30", 50);
    repo.create_reflection(&reflection).unwrap();

    let loaded = repo.find_reflection("2026-01-30").unwrap().unwrap();
    assert_eq!(loaded, reflection);
}

#[test]
fn find_missing_returns_none_and_get_returns_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteReflectionRepository::new(&conn);

    assert!(repo.find_reflection("2026-01-30").unwrap().is_none());
    let err = repo.get_reflection("2026-01-30").unwrap_err();
    assert!(matches!(err, RepoError::NotFound(date) if date == "2026-01-30"));
}

#[test]
fn duplicate_date_is_rejected_without_overwrite() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteReflectionRepository::new(&conn);

    let original = Reflection::new("first", 4, "2026-01-30", 20);
    repo.create_reflection(&original).unwrap();

    let err = repo
        .create_reflection(&Reflection::new("second", 1, "2026-01-30", 5))
        .unwrap_err();
    assert!(matches!(err, RepoError::Duplicate(date) if date == "2026-01-30"));
    assert_eq!(repo.get_reflection("2026-01-30").unwrap(), original);
}

#[test]
fn date_lookup_ignores_case() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteReflectionRepository::new(&conn);

    repo.create_reflection(&Reflection::new("weekly", 3, "Week-05", 30))
        .unwrap();

    assert!(repo.find_reflection("week-05").unwrap().is_some());
    let err = repo
        .create_reflection(&Reflection::new("again", 3, "WEEK-05", 30))
        .unwrap_err();
    assert!(matches!(err, RepoError::Duplicate(_)));
}

#[test]
fn list_returns_insertion_order() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteReflectionRepository::new(&conn);

    assert!(repo.list_reflections().unwrap().is_empty());

    let dates = ["2026-02-03", "2026-01-01", "2026-02-01"];
    for date in dates {
        repo.create_reflection(&Reflection::new("entry", 2, date, 10))
            .unwrap();
    }

    let listed = repo
        .list_reflections()
        .unwrap()
        .into_iter()
        .map(|reflection| reflection.date)
        .collect::<Vec<_>>();
    assert_eq!(listed, dates);
}

#[test]
fn update_replaces_fields_and_keeps_date() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteReflectionRepository::new(&conn);
    repo.create_reflection(&Reflection::new("Sunny day", 3, "2026-01-30", 50))
        .unwrap();

    let updated = repo
        .update_reflection("2026-01-30", &ReflectionUpdate::new("Rainy now", 1, 30))
        .unwrap();

    let expected = Reflection::new("Rainy now", 1, "2026-01-30", 30);
    assert_eq!(updated, expected);
    assert_eq!(repo.get_reflection("2026-01-30").unwrap(), expected);
}

#[test]
fn update_returns_stored_record_when_key_case_differs() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteReflectionRepository::new(&conn);
    repo.create_reflection(&Reflection::new("Sunny day", 3, "Week-05", 50))
        .unwrap();

    let updated = repo
        .update_reflection("week-05", &ReflectionUpdate::new("Rainy now", 1, 30))
        .unwrap();

    assert_eq!(updated, Reflection::new("Rainy now", 1, "Week-05", 30));
    assert_eq!(updated, repo.get_reflection("WEEK-05").unwrap());
}

#[test]
fn update_missing_is_not_found_even_with_invalid_values() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteReflectionRepository::new(&conn);

    let err = repo
        .update_reflection("2026-01-30", &ReflectionUpdate::new("", 0, -1))
        .unwrap_err();
    assert!(matches!(err, RepoError::NotFound(_)));
    assert!(repo.list_reflections().unwrap().is_empty());
}

#[test]
fn invalid_update_leaves_record_untouched() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteReflectionRepository::new(&conn);
    let original = Reflection::new("Sunny day", 3, "2026-01-30", 50);
    repo.create_reflection(&original).unwrap();

    let err = repo
        .update_reflection("2026-01-30", &ReflectionUpdate::new("x", 7, 10))
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::MoodScoreOutOfRange(7))
    ));
    assert_eq!(repo.get_reflection("2026-01-30").unwrap(), original);
}

#[test]
fn validation_failure_blocks_create() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteReflectionRepository::new(&conn);

    let err = repo
        .create_reflection(&Reflection::new("", 3, "2026-01-30", 50))
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::EmptyReflection)
    ));
    assert!(repo.find_reflection("2026-01-30").unwrap().is_none());
}

#[test]
fn delete_removes_record_and_missing_delete_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteReflectionRepository::new(&conn);
    repo.create_reflection(&Reflection::new("bye", 2, "2026-01-30", 1))
        .unwrap();

    repo.delete_reflection("2026-01-30").unwrap();
    assert!(repo.find_reflection("2026-01-30").unwrap().is_none());

    let err = repo.delete_reflection("2026-01-30").unwrap_err();
    assert!(matches!(err, RepoError::NotFound(_)));
}

#[test]
fn invalid_persisted_rows_are_rejected_on_read() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO reflections (reflection_text, mood_score, date, time_spent_mins)
         VALUES ('corrupt', 42, '2026-01-30', 5);",
        [],
    )
    .unwrap();
    let repo = SqliteReflectionRepository::new(&conn);

    let err = repo.find_reflection("2026-01-30").unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)));
}
