//! # Schema Registry
//!
//! Static description of each model's relational properties. The resolver
//! asks it one question per hop: is this property a plain value, a single
//! foreign key, or a list of foreign keys?
//!
//! Properties without an entry are scalar. The registry is never mutated
//! while resolving.
//!
//! ```json
//! {
//!   "users": {},
//!   "comments": { "user": { "hasOne": "users" } },
//!   "articles": { "author": { "hasOne": "users" }, "comments": { "hasMany": "comments" } }
//! }
//! ```

use std::collections::BTreeMap;

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::Result;

/// How a property relates to other models.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RelationDescriptor {
    /// Not relational. Never stored in a [`ModelSchema`]; returned for
    /// properties that have no entry.
    Scalar,
    /// Stored value is a single id into the named model.
    HasOne(String),
    /// Stored value is a list of ids into the named model.
    HasMany(String),
}

impl RelationDescriptor {
    /// Target model for relational variants.
    pub fn related_model(&self) -> Option<&str> {
        match self {
            RelationDescriptor::Scalar => None,
            RelationDescriptor::HasOne(m) | RelationDescriptor::HasMany(m) => Some(m),
        }
    }

    pub fn is_relation(&self) -> bool {
        !matches!(self, RelationDescriptor::Scalar)
    }
}

/// Relational properties of one model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelSchema {
    relations: BTreeMap<String, RelationDescriptor>,
}

impl ModelSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_one(mut self, property: impl Into<String>, model: impl Into<String>) -> Self {
        self.relations.insert(property.into(), RelationDescriptor::HasOne(model.into()));
        self
    }

    pub fn has_many(mut self, property: impl Into<String>, model: impl Into<String>) -> Self {
        self.relations.insert(property.into(), RelationDescriptor::HasMany(model.into()));
        self
    }

    /// Stored relational descriptor, `None` for scalar properties.
    pub fn get(&self, property: &str) -> Option<&RelationDescriptor> {
        self.relations.get(property)
    }

    /// Descriptor for `property`, `Scalar` when it has no entry.
    pub fn relation(&self, property: &str) -> RelationDescriptor {
        self.relations
            .get(property)
            .cloned()
            .unwrap_or(RelationDescriptor::Scalar)
    }

    /// Relational properties only, ordered by name.
    pub fn relations(&self) -> impl Iterator<Item = (&str, &RelationDescriptor)> {
        self.relations.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Model name → schema.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SchemaRegistry {
    models: HashMap<String, ModelSchema>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from JSON shaped like the module-level example.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_value(json: serde_json::Value) -> Result<Self> {
        Ok(serde_json::from_value(json)?)
    }

    /// Register a model. Models with no relations still need an entry.
    pub fn with_model(mut self, name: impl Into<String>, schema: ModelSchema) -> Self {
        self.register(name, schema);
        self
    }

    pub fn register(&mut self, name: impl Into<String>, schema: ModelSchema) {
        self.models.insert(name.into(), schema);
    }

    pub fn lookup(&self, model: &str) -> Option<&ModelSchema> {
        self.models.get(model)
    }

    /// Descriptor for `model.property`; `None` when the model is unknown.
    pub fn relation_of(&self, model: &str, property: &str) -> Option<RelationDescriptor> {
        self.lookup(model).map(|schema| schema.relation(property))
    }

    /// Registered model names, sorted.
    pub fn model_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.models.keys().cloned().collect();
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> SchemaRegistry {
        SchemaRegistry::new()
            .with_model("users", ModelSchema::new())
            .with_model("comments", ModelSchema::new().has_one("user", "users"))
            .with_model(
                "articles",
                ModelSchema::new().has_one("author", "users").has_many("comments", "comments"),
            )
    }

    #[test]
    fn test_relation_lookup() {
        let schema = registry();
        assert_eq!(
            schema.relation_of("articles", "author"),
            Some(RelationDescriptor::HasOne("users".into()))
        );
        assert_eq!(
            schema.relation_of("articles", "comments"),
            Some(RelationDescriptor::HasMany("comments".into()))
        );
        assert_eq!(schema.relation_of("articles", "title"), Some(RelationDescriptor::Scalar));
        assert_eq!(schema.relation_of("widgets", "title"), None);
    }

    #[test]
    fn test_model_names_sorted() {
        assert_eq!(registry().model_names(), vec!["articles", "comments", "users"]);
    }

    #[test]
    fn test_from_json() {
        let schema = SchemaRegistry::from_json_str(
            r#"{
                "users": {},
                "comments": { "user": { "hasOne": "users" } },
                "articles": { "author": { "hasOne": "users" }, "comments": { "hasMany": "comments" } }
            }"#,
        )
        .unwrap();
        assert_eq!(schema, registry());
    }

    #[test]
    fn test_related_model() {
        assert_eq!(RelationDescriptor::HasMany("tags".into()).related_model(), Some("tags"));
        assert!(!RelationDescriptor::Scalar.is_relation());
    }
}
