//! # Normalized Data Model
//!
//! Plain DTOs shared by the schema registry, resolver and merge engine.
//!
//! Design rule: this module is pure data. No relation knowledge, no I/O
//! beyond JSON loading, no state.

pub mod entity;
pub mod path;
pub mod store;
pub mod value;

pub use entity::{Entity, EntityId};
pub use path::{Path, Segment};
pub use store::EntityStore;
pub use value::Value;
