use reflection_core::{validate_reflection_fields, Reflection, ValidationError};

#[test]
fn valid_fields_pass() {
    for mood in 1..=5 {
        for minutes in [0, 1, 50, 24 * 60] {
            assert_eq!(
                validate_reflection_fields("Sunny day", mood, "2026-01-30", minutes),
                Ok(())
            );
        }
    }
}

#[test]
fn each_violation_has_a_distinct_message_prefix() {
    let cases = [
        (
            validate_reflection_fields("", 3, "2026-01-30", 10),
            "empty reflection",
        ),
        (
            validate_reflection_fields("text", 0, "2026-01-30", 10),
            "mood score out of range",
        ),
        (validate_reflection_fields("text", 3, "", 10), "empty date"),
        (
            validate_reflection_fields("text", 3, "2026-01-30", -1),
            "negative/non-integer duration",
        ),
    ];

    for (result, prefix) in cases {
        let err = result.expect_err("violation should be rejected");
        assert!(
            err.to_string().starts_with(prefix),
            "`{err}` should start with `{prefix}`"
        );
    }
}

#[test]
fn first_violation_in_order_wins() {
    assert_eq!(
        validate_reflection_fields("", 9, "", -5),
        Err(ValidationError::EmptyReflection)
    );
    assert_eq!(
        validate_reflection_fields("text", 9, "", -5),
        Err(ValidationError::MoodScoreOutOfRange(9))
    );
    assert_eq!(
        validate_reflection_fields("text", 2, "", -5),
        Err(ValidationError::EmptyDate)
    );
    assert_eq!(
        validate_reflection_fields("text", 2, "2026-01-30", -5),
        Err(ValidationError::InvalidDuration(-5))
    );
}

#[test]
fn reflection_validate_delegates_to_field_checks() {
    assert!(Reflection::new("ok", 4, "2026-02-01", 15).validate().is_ok());
    assert_eq!(
        Reflection::new("ok", -3, "2026-02-01", 15).validate(),
        Err(ValidationError::MoodScoreOutOfRange(-3))
    );
}
