//! Shared fixture: articles, comments and users.
#![allow(dead_code)]

use nget::{EntityStore, ModelSchema, SchemaRegistry};

pub fn schema() -> SchemaRegistry {
    SchemaRegistry::new()
        .with_model("users", ModelSchema::new())
        .with_model("comments", ModelSchema::new().has_one("user", "users"))
        .with_model(
            "articles",
            ModelSchema::new()
                .has_one("author", "users")
                .has_many("comments", "comments"),
        )
}

pub fn store() -> EntityStore {
    EntityStore::from_json_value(serde_json::json!({
        "articles": {
            "123": {
                "author": "8472",
                "body": "This article is great.",
                "comments": ["comment-123-4738", "comment-123-9999"],
                "id": "123",
                "title": "A Great Article"
            }
        },
        "comments": {
            "comment-123-4738": { "comment": "I like it!", "id": "comment-123-4738", "user": "10293" },
            "comment-123-9999": { "comment": "I like too!", "id": "comment-123-9999", "user": "8472" }
        },
        "users": {
            "10293": { "id": "10293", "name": "Jane" },
            "8472": { "id": "8472", "name": "Paul" }
        }
    }))
    .unwrap()
}

/// The stored entity at `(model, id)` as a `Value`.
pub fn entity(store: &EntityStore, model: &str, id: &str) -> nget::Value {
    nget::Value::Map(store.get(model, &id.into()).unwrap().clone())
}
