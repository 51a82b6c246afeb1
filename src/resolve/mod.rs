//! # Path Resolver
//!
//! Walks a tokenized path through the entity store, substituting foreign
//! keys with the entities they reference.
//!
//! ```text
//! [model, id]                 → the stored entity
//! [model, id, scalar, ...]    → nested accessor over the entity's own data
//! [model, id, hasOne, ...]    → resolve [related, fk, ...]
//! [model, id, hasMany]        → [resolve [related, fk] for fk in ids]
//! [model, id, hasMany, i, ..] → resolve [related, ids[i], ...]
//! [model, id, hasMany, ...]   → mapped over every id, only with `follow`
//! ```
//!
//! A store miss is not an error: it yields `Ok(None)` for that branch.
//!
//! Taking the same relation hop `(model, id, property)` twice on one branch
//! fails with `CyclicPath`, even though the path itself is finite.

pub mod accessor;
pub mod options;

pub use accessor::get_nested;
pub use options::ResolveOptions;

use crate::model::path::list_string;
use crate::model::{Entity, EntityId, EntityStore, Path, Segment, Value};
use crate::schema::{RelationDescriptor, SchemaRegistry};
use crate::{Error, Result};

/// Resolve `path` against `store` using `schema`.
pub fn resolve(
    schema: &SchemaRegistry,
    store: &EntityStore,
    path: &Path,
    options: ResolveOptions,
) -> Result<Option<Value>> {
    Resolver::new(schema, store, options).resolve(path)
}

// ============================================================================
// Resolver
// ============================================================================

/// Schema, store and options for one or more resolutions. Holds only
/// shared references, so it is `Copy` and cheap to pass around.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    schema: &'a SchemaRegistry,
    store: &'a EntityStore,
    options: ResolveOptions,
}

impl<'a> Resolver<'a> {
    pub fn new(schema: &'a SchemaRegistry, store: &'a EntityStore, options: ResolveOptions) -> Self {
        Self { schema, store, options }
    }

    pub fn options(&self) -> ResolveOptions {
        self.options
    }

    /// Resolve a full path. Fails with `InvalidPath` when it does not name
    /// at least a model and an id.
    pub fn resolve(&self, path: &Path) -> Result<Option<Value>> {
        let (model, id, tail) = split_root(path)?;
        tracing::debug!(path = %path, follow = self.options.follow, "resolving path");
        let mut guard = HopGuard::default();
        self.walk(&model, &id, tail, &mut guard)
    }

    fn walk(
        &self,
        model: &str,
        id: &EntityId,
        tail: &[Segment],
        guard: &mut HopGuard,
    ) -> Result<Option<Value>> {
        match self.hop(model, id, tail)? {
            Hop::Miss => Ok(None),
            Hop::Done(entity) => Ok(Some(Value::Map(entity.clone()))),
            Hop::Scalar { entity, tail } => Ok(get_nested(&Value::Map(entity.clone()), tail)),
            Hop::One { property, related, target, rest, .. } => {
                let Some(target) = target else { return Ok(None) };
                guard.within(model, id, &property, |guard| self.walk(related, &target, rest, guard))
            }
            Hop::Many { property, related, targets, rest, .. } => {
                match self.fan_out(model, &property, &targets, rest, self.options.follow)? {
                    FanOut::One { target: None, .. } => Ok(None),
                    FanOut::One { target: Some(target), rest, .. } => guard
                        .within(model, id, &property, |guard| self.walk(related, &target, rest, guard)),
                    FanOut::All(rest) => guard.within(model, id, &property, |guard| {
                        let mut items = Vec::with_capacity(targets.len());
                        for target in &targets {
                            let item = match target {
                                Some(target) => self.walk(related, target, rest, guard)?,
                                None => None,
                            };
                            items.push(item.unwrap_or(Value::Null));
                        }
                        Ok(Some(Value::List(items)))
                    }),
                }
            }
        }
    }

    /// Classify one step: look up the entity, then the property's relation.
    pub(crate) fn hop<'t>(
        &self,
        model: &str,
        id: &EntityId,
        tail: &'t [Segment],
    ) -> Result<Hop<'a, 't>> {
        let Some(entity) = self.store.get(model, id) else {
            tracing::trace!(model, id = %id, "store miss");
            return Ok(Hop::Miss);
        };
        let Some((property_seg, rest)) = tail.split_first() else {
            return Ok(Hop::Done(entity));
        };

        let schema = self.schema.lookup(model).ok_or_else(|| Error::UnknownSchema {
            model: model.to_string(),
            known: self.schema.model_names(),
        })?;

        let property = property_seg.to_string();
        let Some(stored) = entity.get(&property) else {
            return Err(unknown_property(model, id, tail, property, entity));
        };

        match schema.get(&property) {
            None | Some(RelationDescriptor::Scalar) => Ok(Hop::Scalar { entity, tail }),
            Some(RelationDescriptor::HasOne(related)) => {
                let target = match stored {
                    Value::Null => None,
                    v => Some(EntityId::from_value(v).ok_or_else(|| Error::InvalidForeignKey {
                        model: model.to_string(),
                        property: property.clone(),
                        expected: "id",
                        got: v.type_name(),
                    })?),
                };
                tracing::trace!(model, property = %property, related = %related, "hasOne hop");
                Ok(Hop::One { entity, property, related: related.as_str(), target, rest })
            }
            Some(RelationDescriptor::HasMany(related)) => {
                let targets = foreign_keys(model, &property, stored)?;
                tracing::trace!(model, property = %property, related = %related, count = targets.len(), "hasMany hop");
                Ok(Hop::Many { entity, property, related: related.as_str(), targets, rest })
            }
        }
    }

    /// Decide how the remainder applies to a hasMany relation: positional
    /// selection of one related id, or a map over all of them.
    pub(crate) fn fan_out<'t>(
        &self,
        model: &str,
        property: &str,
        targets: &[Option<EntityId>],
        rest: &'t [Segment],
        follow: bool,
    ) -> Result<FanOut<'t>> {
        let Some((first, after)) = rest.split_first() else {
            return Ok(FanOut::All(rest));
        };
        if let Some(index) = first.as_index() {
            let target = targets.get(index).cloned().flatten();
            return Ok(FanOut::One { index, target, rest: after });
        }
        if !follow {
            return Err(Error::UnfollowedPath {
                model: model.to_string(),
                relation: property.to_string(),
                remaining: list_string(rest),
            });
        }
        Ok(FanOut::All(rest))
    }
}

// ============================================================================
// Hop classification (shared with the merge engine)
// ============================================================================

/// One resolved step of a path.
pub(crate) enum Hop<'a, 't> {
    /// No entity at `(model, id)`.
    Miss,
    /// Path exhausted on this entity.
    Done(&'a Entity),
    /// Non-relational property; `tail` starts with the property name.
    Scalar { entity: &'a Entity, tail: &'t [Segment] },
    One {
        entity: &'a Entity,
        property: String,
        related: &'a str,
        target: Option<EntityId>,
        rest: &'t [Segment],
    },
    Many {
        entity: &'a Entity,
        property: String,
        related: &'a str,
        targets: Vec<Option<EntityId>>,
        rest: &'t [Segment],
    },
}

pub(crate) enum FanOut<'t> {
    /// Map `rest` over every related id.
    All(&'t [Segment]),
    /// Continue with a single positionally selected id.
    One { index: usize, target: Option<EntityId>, rest: &'t [Segment] },
}

/// Relation hops `(model, id, property)` expanded on the current branch.
///
/// Every hop consumes a path segment, so recursion is already bounded by the
/// path length. The guard is stricter than that: a finite path that walks a
/// relation loop back onto a hop it already took, such as
/// `users[10].friend.friend.friend` when 10 and 11 are each other's friend,
/// fails with `CyclicPath` instead of resolving. Siblings of a hasMany fan-out
/// do not share hops.
#[derive(Debug, Default)]
pub(crate) struct HopGuard {
    stack: Vec<(String, EntityId, String)>,
}

impl HopGuard {
    pub(crate) fn enter(&mut self, model: &str, id: &EntityId, property: &str) -> Result<()> {
        let seen = self
            .stack
            .iter()
            .any(|(m, i, p)| m == model && i == id && p == property);
        if seen {
            tracing::debug!(model, id = %id, property, "cyclic relation path");
            return Err(Error::CyclicPath {
                model: model.to_string(),
                id: id.to_string(),
                property: property.to_string(),
            });
        }
        self.stack.push((model.to_string(), id.clone(), property.to_string()));
        Ok(())
    }

    pub(crate) fn leave(&mut self) {
        self.stack.pop();
    }

    /// Run `f` with the hop entered, leaving it again on success or error.
    pub(crate) fn within<T>(
        &mut self,
        model: &str,
        id: &EntityId,
        property: &str,
        f: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Result<T> {
        self.enter(model, id, property)?;
        let result = f(self);
        self.leave();
        result
    }
}

/// Split `[model, id, ...tail]`.
pub(crate) fn split_root(path: &Path) -> Result<(String, EntityId, &[Segment])> {
    match path.segments() {
        [model, id, tail @ ..] => Ok((model.to_string(), id.to_id(), tail)),
        _ => Err(Error::InvalidPath(format!(
            "path {} must name a model and an id",
            path.to_list_string()
        ))),
    }
}

/// Read a hasMany value as ids. `null` means no related entities; `null`
/// elements are kept as holes.
fn foreign_keys(model: &str, property: &str, stored: &Value) -> Result<Vec<Option<EntityId>>> {
    let invalid = |got: &'static str| Error::InvalidForeignKey {
        model: model.to_string(),
        property: property.to_string(),
        expected: "list of ids",
        got,
    };
    match stored {
        Value::Null => Ok(Vec::new()),
        Value::List(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => Ok(None),
                v => EntityId::from_value(v).map(Some).ok_or_else(|| invalid(v.type_name())),
            })
            .collect(),
        v => Err(invalid(v.type_name())),
    }
}

fn unknown_property(
    model: &str,
    id: &EntityId,
    tail: &[Segment],
    property: String,
    entity: &Entity,
) -> Error {
    let mut full = vec![Segment::from(model), Segment::from(id)];
    full.extend_from_slice(tail);
    Error::UnknownProperty {
        property,
        model: model.to_string(),
        path: list_string(&full),
        available: entity.keys().cloned().collect(),
    }
}
