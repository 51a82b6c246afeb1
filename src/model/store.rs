//! Normalized entity store.
//!
//! A flat two-level index: model name → id → entity. Relations are plain
//! foreign-key values inside each entity; nothing here knows about them.
//!
//! The store is read-only during resolution, so a single instance can be
//! shared across any number of concurrent resolutions without locking.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use super::{Entity, EntityId, Value};
use crate::Result;

/// Entities keyed by model name, then by id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityStore {
    models: HashMap<String, HashMap<EntityId, Entity>>,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a store from JSON shaped `{ model: { id: { prop: value } } }`.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_value(json: serde_json::Value) -> Result<Self> {
        Ok(serde_json::from_value(json)?)
    }

    /// Insert (or replace) an entity. Used to build stores up front; the
    /// resolver never calls this.
    pub fn insert(&mut self, model: impl Into<String>, id: impl Into<EntityId>, entity: Entity) {
        self.models
            .entry(model.into())
            .or_default()
            .insert(id.into(), entity);
    }

    /// Builder-style variant of [`insert`](Self::insert) taking `(key, value)` pairs.
    pub fn with_entity<K, V>(
        mut self,
        model: impl Into<String>,
        id: impl Into<EntityId>,
        props: impl IntoIterator<Item = (K, V)>,
    ) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        let entity = props.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
        self.insert(model, id, entity);
        self
    }

    pub fn get(&self, model: &str, id: &EntityId) -> Option<&Entity> {
        self.models.get(model).and_then(|entities| entities.get(id))
    }

    pub fn contains(&self, model: &str, id: &EntityId) -> bool {
        self.get(model, id).is_some()
    }

    /// All ids stored for a model, in no particular order.
    pub fn ids(&self, model: &str) -> impl Iterator<Item = &EntityId> {
        self.models.get(model).into_iter().flat_map(|entities| entities.keys())
    }

    pub fn model_names(&self) -> impl Iterator<Item = &str> {
        self.models.keys().map(String::as_str)
    }

    /// Total number of entities across all models.
    pub fn len(&self) -> usize {
        self.models.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_keys_from_json() {
        let store = EntityStore::from_json_value(serde_json::json!({
            "users": { "8472": { "id": "8472", "name": "Paul" } }
        }))
        .unwrap();
        let user = store.get("users", &EntityId::from(8472)).unwrap();
        assert_eq!(user.get("name"), Some(&Value::from("Paul")));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_builder_and_miss() {
        let store = EntityStore::new().with_entity("users", "1", [("name", "Jane")]);
        assert!(store.contains("users", &EntityId::from(1)));
        assert!(!store.contains("users", &EntityId::from(2)));
        assert!(!store.contains("articles", &EntityId::from(1)));
        assert_eq!(store.ids("users").count(), 1);
        assert_eq!(store.ids("nothing").count(), 0);
    }

    #[test]
    fn test_malformed_json_is_error() {
        assert!(EntityStore::from_json_str(r#"{"users": ["not", "a", "map"]}"#).is_err());
    }
}
