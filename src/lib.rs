//! # nget — Denormalizing Path Resolver
//!
//! Resolves dotted/bracketed paths against a normalized entity store and
//! returns the denormalized data they describe, following hasOne/hasMany
//! relations and merging several path queries into one tree.
//!
//! ## Design Principles
//!
//! 1. **Pure**: resolution never mutates the store or the schema
//! 2. **Explicit relations**: `RelationDescriptor` tags every hop as scalar, hasOne or hasMany
//! 3. **Parser owns nothing**: path string → `Path` is a pure function
//! 4. **Resolved beats raw**: merged results never lose relation data to a bare foreign key
//!
//! ## Quick Start
//!
//! ```rust
//! use nget::{EntityStore, Getter, ModelSchema, SchemaRegistry, Value};
//!
//! # fn example() -> nget::Result<()> {
//! let schema = SchemaRegistry::new()
//!     .with_model("users", ModelSchema::new())
//!     .with_model("comments", ModelSchema::new().has_one("user", "users"));
//!
//! let store = EntityStore::from_json_str(r#"{
//!     "users": { "8472": { "id": "8472", "name": "Paul" } },
//!     "comments": { "c2": { "id": "c2", "user": "8472" } }
//! }"#)?;
//!
//! let nget = Getter::bind(&schema, &store);
//! assert_eq!(nget.get("comments[c2].user.name")?, Some(Value::from("Paul")));
//! assert_eq!(nget.get("comments[missing]")?, None);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

// ============================================================================
// Modules
// ============================================================================

pub mod model;
pub mod schema;
pub mod parser;
pub mod resolve;
pub mod merge;

// ============================================================================
// Re-exports
// ============================================================================

pub use model::{Entity, EntityId, EntityStore, Path, Segment, Value};
pub use schema::{ModelSchema, RelationDescriptor, SchemaRegistry};
pub use resolve::{ResolveOptions, Resolver, resolve};
pub use merge::{MergedTree, merge_values, resolve_merged};

// ============================================================================
// Pre-bound getter
// ============================================================================

/// Schema and store bound once, queried many times.
///
/// Holds only shared references; copying it is free and it can be used from
/// several threads as long as nothing mutates the store meanwhile.
#[derive(Debug, Clone, Copy)]
pub struct Getter<'a> {
    schema: &'a SchemaRegistry,
    store: &'a EntityStore,
    options: ResolveOptions,
}

impl<'a> Getter<'a> {
    /// Bind with default options (`follow = false`).
    pub fn bind(schema: &'a SchemaRegistry, store: &'a EntityStore) -> Self {
        Self { schema, store, options: ResolveOptions::default() }
    }

    pub fn with_options(mut self, options: ResolveOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> ResolveOptions {
        self.options
    }

    /// Parse and resolve a path string.
    pub fn get(&self, path: &str) -> Result<Option<Value>> {
        self.resolve(&parser::parse(path)?)
    }

    /// Parse several partial path strings as one path and resolve it.
    pub fn get_parts<S: AsRef<str>>(&self, parts: &[S]) -> Result<Option<Value>> {
        self.resolve(&parser::parse_parts(parts)?)
    }

    /// Resolve an already tokenized path.
    pub fn resolve(&self, path: &Path) -> Result<Option<Value>> {
        Resolver::new(self.schema, self.store, self.options).resolve(path)
    }

    /// Parse every path string, resolve in merge mode and combine.
    pub fn get_merged<S: AsRef<str>>(&self, paths: &[S]) -> Result<MergedTree> {
        let parsed = paths
            .iter()
            .map(|p| parser::parse(p.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        self.resolve_merged(&parsed)
    }

    /// Merge-mode resolution of tokenized paths. Always follows hasMany
    /// relations regardless of the bound options.
    pub fn resolve_merged(&self, paths: &[Path]) -> Result<MergedTree> {
        merge::resolve_merged(self.schema, self.store, paths)
    }
}

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Path syntax error at position {position}: {message}")]
    SyntaxError { position: usize, message: String },

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Expected to find a schema for '{model}'. Known models: [{}]", .known.join(","))]
    UnknownSchema { model: String, known: Vec<String> },

    #[error(
        "Could not find property '{property}' on '{model}' for path {path}. Available properties: [{}]",
        .available.join(",")
    )]
    UnknownProperty {
        property: String,
        model: String,
        path: String,
        available: Vec<String>,
    },

    #[error("Cannot follow hasMany relation '{model}.{relation}' with remaining path {remaining}; enable `follow` to map over it")]
    UnfollowedPath {
        model: String,
        relation: String,
        remaining: String,
    },

    #[error("Cyclic relation path: '{model}[{id}].{property}' is expanded twice")]
    CyclicPath { model: String, id: String, property: String },

    #[error("Invalid foreign key in '{model}.{property}': expected {expected}, got {got}")]
    InvalidForeignKey {
        model: String,
        property: String,
        expected: &'static str,
        got: &'static str,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
