//! Entities and their identifiers.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use super::Value;

/// A single record: property name to value. Related entities are referenced
/// by id only, never embedded.
pub type Entity = BTreeMap<String, Value>;

/// Entity identifier, always compared in its string form.
///
/// `EntityId::from(123)` and `EntityId::from("123")` are the same key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Read an id out of a stored foreign-key value. Strings and integers
    /// qualify; anything else does not.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(Self(s.clone())),
            Value::Int(i) => Some(Self(i.to_string())),
            Value::Float(f) => Value::float_to_int(*f).map(|i| Self(i.to_string())),
            _ => None,
        }
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityId { fn from(v: &str) -> Self { Self(v.to_owned()) } }
impl From<String> for EntityId { fn from(v: String) -> Self { Self(v) } }
impl From<&String> for EntityId { fn from(v: &String) -> Self { Self(v.clone()) } }
impl From<i64> for EntityId { fn from(v: i64) -> Self { Self(v.to_string()) } }
impl From<u64> for EntityId { fn from(v: u64) -> Self { Self(v.to_string()) } }
impl From<usize> for EntityId { fn from(v: usize) -> Self { Self(v.to_string()) } }
impl From<i32> for EntityId { fn from(v: i32) -> Self { Self(v.to_string()) } }

impl std::borrow::Borrow<str> for EntityId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_and_string_ids_are_equal() {
        assert_eq!(EntityId::from(8472), EntityId::from("8472"));
        assert_eq!(EntityId::from(8472u64).as_str(), "8472");
    }

    #[test]
    fn test_from_value() {
        assert_eq!(EntityId::from_value(&Value::from("c1")), Some(EntityId::from("c1")));
        assert_eq!(EntityId::from_value(&Value::Int(7)), Some(EntityId::from(7)));
        assert_eq!(EntityId::from_value(&Value::Float(7.0)), Some(EntityId::from(7)));
        assert_eq!(EntityId::from_value(&Value::Float(1e20)), None);
        assert_eq!(EntityId::from_value(&Value::Float(7.5)), None);
        assert_eq!(EntityId::from_value(&Value::Null), None);
        assert_eq!(EntityId::from_value(&Value::Bool(true)), None);
    }
}
