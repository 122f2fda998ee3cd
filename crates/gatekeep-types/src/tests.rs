//! Unit tests for gatekeep-types

use proptest::prelude::*;
use test_case::test_case;

use crate::{Attributes, EvaluationContext, Outcome, ParseVisibilityError, Visibility, keys};

// ============================================================================
// Attributes Tests
// ============================================================================

#[test]
fn first_returns_value_at_index_zero() {
    let attributes = Attributes::new().with("visibility", ["Private", "Public"]);
    assert_eq!(attributes.first("visibility"), Some("Private"));
}

#[test]
fn first_is_none_for_absent_key() {
    let attributes = Attributes::new();
    assert_eq!(attributes.first("visibility"), None);
}

#[test]
fn first_is_none_for_empty_value_list() {
    let attributes = Attributes::new().with("visibility", Vec::<String>::new());
    assert!(attributes.contains("visibility"));
    assert_eq!(attributes.first("visibility"), None);
}

#[test]
fn empty_string_is_present_not_absent() {
    let attributes = Attributes::new().with("visibility", [""]);
    assert_eq!(attributes.first("visibility"), Some(""));
}

#[test]
fn insert_replaces_previous_values() {
    let mut attributes = Attributes::new().with("sub", ["a", "b"]);
    attributes.insert("sub", ["c"]);
    assert_eq!(attributes.values("sub"), Some(&["c".to_string()][..]));
    assert_eq!(attributes.len(), 1);
}

#[test]
fn from_iterator_preserves_value_order() {
    let attributes: Attributes = vec![("tags", vec!["z", "a", "m"])].into_iter().collect();
    let values: Vec<&str> = attributes
        .values("tags")
        .unwrap()
        .iter()
        .map(String::as_str)
        .collect();
    assert_eq!(values, vec!["z", "a", "m"]);
}

#[test]
fn attributes_serialize_as_plain_object() {
    let attributes = Attributes::new().with("resourceOwner", ["user-1"]);
    let json = serde_json::to_value(&attributes).unwrap();
    assert_eq!(json, serde_json::json!({ "resourceOwner": ["user-1"] }));
}

// ============================================================================
// EvaluationContext Tests
// ============================================================================

#[test]
fn context_builders_use_well_known_keys() {
    let ctx = EvaluationContext::default()
        .with_subject("user-42")
        .with_resource_owner("user-99")
        .with_visibility(Visibility::Private);

    assert_eq!(ctx.identity().first(keys::SUBJECT), Some("user-42"));
    assert_eq!(ctx.context_value(keys::RESOURCE_OWNER), Some("user-99"));
    assert_eq!(ctx.context_value(keys::VISIBILITY), Some("Private"));
    assert_eq!(ctx.subject(), Some("user-42"));
}

#[test]
fn identity_and_context_are_separate_namespaces() {
    let ctx = EvaluationContext::default().with_identity_attribute("visibility", ["Private"]);
    assert_eq!(ctx.identity_value("visibility"), Some("Private"));
    assert_eq!(ctx.context_value("visibility"), None);
}

#[test]
fn context_deserializes_with_missing_sections() {
    let ctx: EvaluationContext =
        serde_json::from_str(r#"{ "context": { "visibility": ["Public"] } }"#).unwrap();
    assert!(ctx.identity().is_empty());
    assert_eq!(ctx.context_value("visibility"), Some("Public"));
    assert_eq!(ctx.subject(), None);
}

// ============================================================================
// Outcome / Visibility Tests
// ============================================================================

#[test]
fn outcome_from_grant() {
    assert_eq!(Outcome::from_grant(true), Outcome::Grant);
    assert_eq!(Outcome::from_grant(false), Outcome::Indeterminate);
    assert!(Outcome::Grant.is_grant());
    assert!(!Outcome::Indeterminate.is_grant());
}

#[test]
fn outcome_display() {
    assert_eq!(Outcome::Grant.to_string(), "Grant");
    assert_eq!(Outcome::Indeterminate.to_string(), "Indeterminate");
}

#[test_case("Public" => Ok(Visibility::Public); "public")]
#[test_case("Private" => Ok(Visibility::Private); "private")]
#[test_case("private" => Err(ParseVisibilityError("private".to_string())); "lowercase is rejected")]
#[test_case(" Private" => Err(ParseVisibilityError(" Private".to_string())); "no trimming")]
#[test_case("" => Err(ParseVisibilityError(String::new())); "empty")]
fn visibility_parsing(input: &str) -> Result<Visibility, ParseVisibilityError> {
    input.parse()
}

#[test]
fn visibility_literals() {
    assert_eq!(Visibility::Public.as_str(), "Public");
    assert_eq!(Visibility::Private.to_string(), "Private");
}

// ============================================================================
// Property-Based Tests
// ============================================================================

proptest! {
    /// Only index 0 is reported, whatever follows it.
    #[test]
    fn prop_first_ignores_trailing_values(
        head in ".*",
        tail in proptest::collection::vec(".*", 0..5),
    ) {
        let mut values = vec![head.clone()];
        values.extend(tail);
        let attributes = Attributes::new().with("k", values);
        prop_assert_eq!(attributes.first("k"), Some(head.as_str()));
    }

    /// Lookups never invent attributes the host did not supply.
    #[test]
    fn prop_absent_key_is_none(key in "[a-z]{1,8}", other in "[A-Z]{1,8}") {
        let attributes = Attributes::new().with(other, ["x"]);
        prop_assert_eq!(attributes.first(&key), None);
    }
}
