//! Resolution options.

use serde::{Deserialize, Serialize};

/// Knobs for a single resolution call.
///
/// Deserializable with every field optional, so hosts can keep it in their
/// own config files:
///
/// ```
/// let opts: nget::ResolveOptions = serde_json::from_str(r#"{"follow": true}"#).unwrap();
/// assert!(opts.follow);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolveOptions {
    /// Allow a remaining path to be mapped over every entity of a hasMany
    /// relation. Without it, such paths fail with `UnfollowedPath`.
    pub follow: bool,
}

impl ResolveOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn follow(mut self, follow: bool) -> Self {
        self.follow = follow;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        assert!(!ResolveOptions::default().follow);
        let parsed: ResolveOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed, ResolveOptions::default());
        assert!(ResolveOptions::new().follow(true).follow);
    }
}
