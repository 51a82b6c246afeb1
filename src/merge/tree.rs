//! MergedTree — combined result of a multi-path resolution.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::merge_values;
use crate::model::{EntityId, Value};

/// `{ model: { id: entity-with-resolved-relations } }`, each model/id pair
/// present once.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MergedTree {
    models: BTreeMap<String, BTreeMap<EntityId, Value>>,
}

impl MergedTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entity, merging with whatever is already at `(model, id)`.
    pub fn insert(&mut self, model: impl Into<String>, id: impl Into<EntityId>, value: Value) {
        let slot = self.models.entry(model.into()).or_default();
        let id = id.into();
        let merged = match slot.remove(&id) {
            Some(existing) => merge_values(existing, value),
            None => value,
        };
        slot.insert(id, merged);
    }

    /// Fold `other` into `self`; `other` is the later result.
    pub fn merge(&mut self, other: MergedTree) {
        for (model, entities) in other.models {
            for (id, value) in entities {
                self.insert(model.clone(), id, value);
            }
        }
    }

    pub fn get(&self, model: &str, id: impl Into<EntityId>) -> Option<&Value> {
        self.models.get(model).and_then(|entities| entities.get(&id.into()))
    }

    pub fn models(&self) -> impl Iterator<Item = (&str, &BTreeMap<EntityId, Value>)> {
        self.models.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of model/id pairs.
    pub fn len(&self) -> usize {
        self.models.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The whole tree as a nested `Value::Map`.
    pub fn to_value(&self) -> Value {
        Value::Map(
            self.models
                .iter()
                .map(|(model, entities)| {
                    let inner = entities
                        .iter()
                        .map(|(id, value)| (id.to_string(), value.clone()))
                        .collect();
                    (model.clone(), Value::Map(inner))
                })
                .collect(),
        )
    }

    pub fn to_json(&self) -> serde_json::Value {
        self.to_value().to_json()
    }
}
