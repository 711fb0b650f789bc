// tests/validator_property_tests.rs
//
// Property tests for the field validators' invariants.

use api::validation::{
    validate_email, validate_movie_id, validate_poster_url, validate_username, FieldRule,
    ServerValidation, MAX_MOVIE_ID,
};
use proptest::prelude::*;
use serde_json::{json, Value};

proptest! {
    #[test]
    fn email_normalization_is_idempotent(
        local in "[A-Za-z0-9._%+-]{1,20}",
        domain in "[A-Za-z0-9-]{1,20}",
        tld in "[A-Za-z]{2,6}",
        pad in " {0,3}",
    ) {
        let raw = format!("{pad}{local}@{domain}.{tld}{pad}");
        let first = validate_email(Some(&json!(raw))).unwrap();
        let second = validate_email(Some(&first)).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn non_ascii_email_normalization_is_idempotent(
        local in "[a-zA-ZÀ-ÖØ-ÞİΑ-Ωа-яА-Я]{1,200}",
        domain in "[A-Za-z0-9-]{1,20}",
    ) {
        let raw = format!("{local}@{domain}.com");
        if let Ok(first) = validate_email(Some(&json!(raw))) {
            prop_assert_eq!(validate_email(Some(&first)), Ok(first.clone()));
        }
    }

    #[test]
    fn username_length_bounds_are_exact(name in "[a-z0-9_]{0,30}") {
        // No blocklisted name starts with `x`
        let candidate = format!("x{name}");
        let result = validate_username(Some(&json!(candidate)));
        let len = candidate.chars().count();
        if (3..=20).contains(&len) {
            prop_assert_eq!(result, Ok(json!(candidate)));
        } else {
            prop_assert!(result.is_err());
        }
    }

    #[test]
    fn movie_id_accepts_exactly_the_valid_range(id in any::<i64>()) {
        let result = validate_movie_id(Some(&json!(id.to_string())));
        if id > 0 && id < MAX_MOVIE_ID {
            prop_assert_eq!(result, Ok(json!(id)));
        } else {
            prop_assert!(result.is_err());
        }
    }

    #[test]
    fn script_markup_never_survives(prefix in "[a-zA-Z ]{1,40}", payload in "[a-z()0-9]{0,20}") {
        let v = ServerValidation::new();
        let raw = format!("{prefix}<script>{payload}</script>");
        for rule in [FieldRule::MovieTitle, FieldRule::SearchQuery] {
            if let Ok(Value::String(out)) = v.check(rule, Some(&json!(raw))) {
                prop_assert!(!out.to_lowercase().contains("<script"));
            }
        }
    }

    #[test]
    fn https_urls_pass_through_unchanged(host in "[a-z]{1,15}", path in "[a-z0-9/]{0,30}") {
        let url = format!("https://{host}.com/{path}");
        prop_assert_eq!(validate_poster_url(Some(&json!(url))), Ok(json!(url)));
    }
}

#[test]
fn every_required_field_names_itself_when_absent() {
    let v = ServerValidation::new();
    for rule in FieldRule::ALL {
        let result = v.check(rule, None);
        if rule == FieldRule::PosterUrl {
            assert_eq!(result, Ok(Value::Null));
        } else {
            assert!(result.unwrap_err().contains("obrigat"), "{rule}");
        }
    }
}
