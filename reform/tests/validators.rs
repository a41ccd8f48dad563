//! Tests for the built-in validation rules.

use reform::validate::{
    BanWords, Email, GroupValues, MaxLength, MinLength, PasswordMatch, Pattern, Required, Validate,
    ValidateGroup, ValidationErrors, keys,
};
use reform::value::Value;

#[test]
fn test_required_rejects_null_and_blank() {
    assert!(Required.check(&Value::Null).is_some());
    assert!(Required.check(&Value::from("")).is_some());
    assert!(Required.check(&Value::from("   ")).is_some());
}

#[test]
fn test_required_accepts_values() {
    assert!(Required.check(&Value::from("x")).is_none());
    assert!(Required.check(&Value::from(false)).is_none());
    assert!(Required.check(&Value::from(0i64)).is_none());
}

#[test]
fn test_min_length_ignores_empty() {
    let rule = MinLength::new(3);
    assert!(rule.check(&Value::from("")).is_none());
    assert!(rule.check(&Value::Null).is_none());
    assert!(rule.check(&Value::from("ab")).is_some());
    assert!(rule.check(&Value::from("abc")).is_none());
}

#[test]
fn test_max_length_counts_characters() {
    let rule = MaxLength::new(3);
    assert!(rule.check(&Value::from("abc")).is_none());
    let errors = rule.check(&Value::from("abcd")).unwrap();
    assert_eq!(
        errors.get(keys::MAX_LENGTH).unwrap()["actual_length"],
        serde_json::json!(4)
    );
}

#[test]
fn test_pattern_matches_full_anchored_expression() {
    let rule = Pattern::new(r"^[A-Z]{2}[0-9]{6}$").unwrap();
    assert!(rule.check(&Value::from("AB123456")).is_none());
    assert!(rule.check(&Value::from("ab123456")).is_some());
    assert!(rule.check(&Value::from("")).is_none());
}

#[test]
fn test_pattern_rejects_invalid_regex() {
    assert!(Pattern::new("[unclosed").is_err());
}

#[test]
fn test_email_rule() {
    assert!(Email.check(&Value::from("manohar@gmail.com")).is_none());
    assert!(Email.check(&Value::from("not-an-email")).is_some());
    assert!(Email.check(&Value::from("")).is_none());
}

#[test]
fn test_ban_words_exact_case_insensitive_match() {
    let rule = BanWords::new(["test", "dummy"]);

    let errors = rule.check(&Value::from("Test")).unwrap();
    assert_eq!(errors.get(keys::BANNED_WORD).unwrap()["word"], "test");

    assert!(rule.check(&Value::from("  DUMMY  ")).is_some());
    // Substrings are not matches.
    assert!(rule.check(&Value::from("testing")).is_none());
    assert!(rule.check(&Value::from("contest")).is_none());
    assert!(rule.check(&Value::Null).is_none());
}

#[test]
fn test_password_match_truth_table() {
    let rule = PasswordMatch::new("password", "confirm_password");
    let values = |pw: &str, confirm: &str| {
        GroupValues::new(vec![
            ("password".into(), Value::from(pw)),
            ("confirm_password".into(), Value::from(confirm)),
        ])
    };

    // Empty confirmation passes, no premature error.
    assert!(rule.check(&values("secret", "")).is_none());
    // Matching pair passes.
    assert!(rule.check(&values("secret", "secret")).is_none());
    // Non-empty mismatch fails, scoped under the group key.
    let errors = rule.check(&values("secret", "secrets")).unwrap();
    assert!(errors.contains(keys::PASSWORD_MISMATCH));
}

#[test]
fn test_validation_errors_merge_and_remove() {
    let mut errors = ValidationErrors::of(keys::REQUIRED, serde_json::json!(true));
    errors.merge(ValidationErrors::of(
        keys::MIN_LENGTH,
        serde_json::json!({ "required_length": 2 }),
    ));
    assert_eq!(errors.len(), 2);

    errors.remove(keys::REQUIRED);
    assert!(!errors.contains(keys::REQUIRED));
    assert!(errors.contains(keys::MIN_LENGTH));

    errors.clear();
    assert!(errors.into_option().is_none());
}
