//! # Multi-Path Merge Engine
//!
//! Resolves several paths in merge mode and folds them into one
//! denormalized tree:
//!
//! ```text
//! "articles[123]"         → { articles: { 123: { author: "8472", ... } } }
//! "articles[123].author"  → { articles: { 123: { author: { id: "8472", name: "Paul" }, ... } } }
//!                 merged  → { articles: { 123: { author: { id: "8472", name: "Paul" }, ... } } }
//! ```
//!
//! Merge mode keeps every entity visited along a path and substitutes the
//! relation it traversed with the related entity. Results are combined left
//! to right with [`merge_values`].

mod tree;

pub use tree::MergedTree;

use crate::model::{EntityId, EntityStore, Path, Segment, Value};
use crate::resolve::{FanOut, Hop, HopGuard, ResolveOptions, Resolver, split_root};
use crate::schema::SchemaRegistry;
use crate::{Error, Result};

/// Resolve every path with `follow` enabled and merge the results in order.
pub fn resolve_merged(
    schema: &SchemaRegistry,
    store: &EntityStore,
    paths: &[Path],
) -> Result<MergedTree> {
    if paths.is_empty() {
        return Err(Error::InvalidPath("no paths to merge".into()));
    }
    let resolver = Resolver::new(schema, store, ResolveOptions::new().follow(true));

    let mut merged = MergedTree::new();
    for path in paths {
        let partial = expand_path(&resolver, path)?;
        tracing::debug!(path = %path, entities = partial.len(), "merging path");
        merged.merge(partial);
    }
    Ok(merged)
}

/// Merge-mode resolution of a single path, wrapped as
/// `{ model: { id: entity-with-resolved-relations } }`. A store miss at the
/// root yields an empty tree.
pub fn expand_path(resolver: &Resolver<'_>, path: &Path) -> Result<MergedTree> {
    let (model, id, tail) = split_root(path)?;
    let mut guard = HopGuard::default();
    let mut tree = MergedTree::new();
    if let Some(entity) = expand(resolver, &model, &id, tail, &mut guard)? {
        tree.insert(model, id, entity);
    }
    Ok(tree)
}

fn expand(
    resolver: &Resolver<'_>,
    model: &str,
    id: &EntityId,
    tail: &[Segment],
    guard: &mut HopGuard,
) -> Result<Option<Value>> {
    match resolver.hop(model, id, tail)? {
        Hop::Miss => Ok(None),
        Hop::Done(entity) | Hop::Scalar { entity, .. } => Ok(Some(Value::Map(entity.clone()))),
        Hop::One { entity, property, related, target, rest } => {
            let mut out = entity.clone();
            if let Some(target) = target {
                let sub = guard.within(model, id, &property, |guard| {
                    expand(resolver, related, &target, rest, guard)
                })?;
                // Unloaded targets keep the raw foreign key.
                if let Some(sub) = sub {
                    out.insert(property, sub);
                }
            }
            Ok(Some(Value::Map(out)))
        }
        Hop::Many { entity, property, related, targets, rest } => {
            // A `null` relation has nothing to substitute and stays as stored.
            let mut items = match entity.get(&property) {
                Some(Value::List(raw)) => raw.clone(),
                _ => return Ok(Some(Value::Map(entity.clone()))),
            };

            match resolver.fan_out(model, &property, &targets, rest, true)? {
                FanOut::One { target: None, .. } => {}
                FanOut::One { index, target: Some(target), rest } => {
                    let sub = guard.within(model, id, &property, |guard| {
                        expand(resolver, related, &target, rest, guard)
                    })?;
                    if let (Some(sub), Some(slot)) = (sub, items.get_mut(index)) {
                        *slot = sub;
                    }
                }
                FanOut::All(rest) => guard.within(model, id, &property, |guard| {
                    for (slot, target) in items.iter_mut().zip(&targets) {
                        let Some(target) = target else { continue };
                        if let Some(sub) = expand(resolver, related, target, rest, guard)? {
                            *slot = sub;
                        }
                    }
                    Ok(())
                })?,
            }

            let mut out = entity.clone();
            out.insert(property, Value::List(items));
            Ok(Some(Value::Map(out)))
        }
    }
}

// ============================================================================
// Conflict rule
// ============================================================================

/// Combine two values for the same key, `right` coming from the later path.
///
/// 1. Resolved relation data (a map, or a list holding maps) always beats a
///    raw scalar such as an unresolved foreign key or id list.
/// 2. Two maps merge key by key, recursively.
/// 3. Two resolved lists of the same length are expansions of the same id
///    list and merge element by element; otherwise the later list replaces.
/// 4. Two scalars: the later value wins.
pub fn merge_values(left: Value, right: Value) -> Value {
    match (left, right) {
        (Value::Map(mut l), Value::Map(r)) => {
            for (key, rv) in r {
                let merged = match l.remove(&key) {
                    Some(lv) => merge_values(lv, rv),
                    None => rv,
                };
                l.insert(key, merged);
            }
            Value::Map(l)
        }
        (l, r) if l.is_structured() && r.is_structured() => match (l, r) {
            (Value::List(ls), Value::List(rs)) if ls.len() == rs.len() => {
                Value::List(ls.into_iter().zip(rs).map(|(a, b)| merge_values(a, b)).collect())
            }
            (_, r) => r,
        },
        (l, _) if l.is_structured() => l,
        (_, r) => r,
    }
}
