//! End-to-end tests for single-path resolution.
//!
//! Each test exercises: parse -> resolve against the articles/comments/users
//! fixture.

mod common;

use nget::{EntityStore, Getter, ModelSchema, Path, ResolveOptions, Segment, Value};
use pretty_assertions::assert_eq;

// ============================================================================
// 1. Top-level lookups
// ============================================================================

#[test]
fn test_top_level_model() {
    let (schema, store) = (common::schema(), common::store());
    let nget = Getter::bind(&schema, &store);

    let actual = nget.get("articles[123]").unwrap().unwrap();
    assert_eq!(actual.get("id"), Some(&Value::from("123")));
    assert_eq!(actual, common::entity(&store, "articles", "123"));
}

#[test]
fn test_unknown_id_is_absent() {
    let (schema, store) = (common::schema(), common::store());
    let nget = Getter::bind(&schema, &store);

    assert_eq!(nget.get("articles[9999999]").unwrap(), None);
    assert_eq!(nget.get("articles[999999].comments.user").unwrap(), None);
}

#[test]
fn test_numeric_and_string_ids_match() {
    let (schema, store) = (common::schema(), common::store());
    let nget = Getter::bind(&schema, &store);

    let by_index = nget.resolve(&Path::from_segments([Segment::from("users"), Segment::Index(8472)]));
    let by_key = nget.resolve(&Path::from_segments(["users", "8472"]));
    assert_eq!(by_index.unwrap(), by_key.unwrap());
}

// ============================================================================
// 2. Relations
// ============================================================================

#[test]
fn test_has_many_resolves_entities_in_order() {
    let (schema, store) = (common::schema(), common::store());
    let nget = Getter::bind(&schema, &store);

    let actual = nget.get("articles[123].comments").unwrap().unwrap();
    assert_eq!(
        actual,
        Value::List(vec![
            common::entity(&store, "comments", "comment-123-4738"),
            common::entity(&store, "comments", "comment-123-9999"),
        ])
    );
}

#[test]
fn test_has_one_resolves_entity() {
    let (schema, store) = (common::schema(), common::store());
    let nget = Getter::bind(&schema, &store);

    let actual = nget.get("comments[comment-123-9999].user").unwrap();
    assert_eq!(actual, Some(common::entity(&store, "users", "8472")));
}

#[test]
fn test_has_one_then_property() {
    let (schema, store) = (common::schema(), common::store());
    let nget = Getter::bind(&schema, &store);

    assert_eq!(nget.get("articles[123].author.name").unwrap(), Some(Value::from("Paul")));
    // Same as resolving the hop on the related entity directly.
    assert_eq!(nget.get("articles[123].author.name").unwrap(), nget.get("users[8472].name").unwrap());
}

#[test]
fn test_has_one_target_missing_is_absent() {
    let schema = common::schema();
    let store = common::store().with_entity(
        "comments",
        "orphan",
        [("id", Value::from("orphan")), ("user", Value::from("404"))],
    );
    let nget = Getter::bind(&schema, &store);

    assert_eq!(nget.get("comments[orphan].user").unwrap(), None);
    assert_eq!(nget.get("comments[orphan].user.name").unwrap(), None);
}

#[test]
fn test_has_many_by_index() {
    let (schema, store) = (common::schema(), common::store());
    let nget = Getter::bind(&schema, &store);

    assert_eq!(
        nget.get("articles[123].comments[0]").unwrap(),
        Some(common::entity(&store, "comments", "comment-123-4738"))
    );
    assert_eq!(nget.get("articles[123].comments[1].user.name").unwrap(), Some(Value::from("Paul")));
    assert_eq!(nget.get("articles[123].comments[2]").unwrap(), None);
}

#[test]
fn test_follow_maps_over_has_many() {
    let (schema, store) = (common::schema(), common::store());
    let nget = Getter::bind(&schema, &store).with_options(ResolveOptions::new().follow(true));

    assert_eq!(
        nget.get("articles[123].comments.user.name").unwrap(),
        Some(Value::from(vec!["Jane", "Paul"]))
    );
}

// ============================================================================
// 3. Non-relational properties
// ============================================================================

#[test]
fn test_scalar_property() {
    let (schema, store) = (common::schema(), common::store());
    let nget = Getter::bind(&schema, &store);

    assert_eq!(nget.get("articles[123].body").unwrap(), Some(Value::from("This article is great.")));
}

#[test]
fn test_chained_scalar_property() {
    let (schema, store) = (common::schema(), common::store());
    let nget = Getter::bind(&schema, &store);

    assert_eq!(nget.get("articles[123].body.length").unwrap(), Some(Value::Int(22)));
    assert_eq!(nget.get("articles[123].body.nothing").unwrap(), None);
}

#[test]
fn test_index_into_scalar_array() {
    let schema = common::schema();
    let store = common::store().with_entity(
        "users",
        "1",
        [("id", Value::from("1")), ("tags", Value::from(vec!["admin", "editor"]))],
    );
    let nget = Getter::bind(&schema, &store);

    assert_eq!(nget.get("users[1].tags[1]").unwrap(), Some(Value::from("editor")));
    assert_eq!(nget.get("users[1].tags.length").unwrap(), Some(Value::Int(2)));
    assert_eq!(nget.get("users[1].tags[5]").unwrap(), None);
}

#[test]
fn test_get_parts() {
    let (schema, store) = (common::schema(), common::store());
    let nget = Getter::bind(&schema, &store);

    assert_eq!(
        nget.get_parts(&["articles[123]", "comments[1]", "user.name"]).unwrap(),
        Some(Value::from("Paul"))
    );
}

#[test]
fn test_zero_padded_id_keeps_spelling() {
    let schema = common::schema().with_model("items", ModelSchema::new());
    let store = EntityStore::from_json_value(serde_json::json!({
        "items": {
            "007": { "name": "bond", "codes": { "01": "padded", "1": "plain" } }
        }
    }))
    .unwrap();
    let nget = Getter::bind(&schema, &store);

    assert_eq!(nget.get("items[007].name").unwrap(), Some(Value::from("bond")));
    assert_eq!(nget.get("items[7]").unwrap(), None);
    assert_eq!(nget.get("items[007].codes[01]").unwrap(), Some(Value::from("padded")));
    assert_eq!(nget.get("items[007].codes[1]").unwrap(), Some(Value::from("plain")));
}
