//! Path — a tokenized sequence of segments addressing a value in the store.

use std::fmt;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::EntityId;

/// One step of a path: a property name / id, or a positional index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Segment {
    Index(usize),
    Key(String),
}

impl Segment {
    /// The segment read as an entity id. Indices become their decimal form.
    pub fn to_id(&self) -> EntityId {
        match self {
            Segment::Index(i) => EntityId::from(*i),
            Segment::Key(k) => EntityId::from(k),
        }
    }

    pub fn as_key(&self) -> Option<&str> {
        match self {
            Segment::Key(k) => Some(k),
            Segment::Index(_) => None,
        }
    }

    /// Positional reading: an index, or a key spelled as a canonical index.
    pub fn as_index(&self) -> Option<usize> {
        match self {
            Segment::Index(i) => Some(*i),
            Segment::Key(k) => canonical_index(k),
        }
    }
}

/// Parse `text` as an index only when it is in canonical decimal form
/// (`"0"`, or digits without a leading zero), so `"007"` stays a key and
/// keeps its spelling as an id.
pub fn canonical_index(text: &str) -> Option<usize> {
    let canonical = match text.as_bytes() {
        [] => false,
        [b'0'] => true,
        [b'0', ..] => false,
        bytes => bytes.iter().all(u8::is_ascii_digit),
    };
    if canonical { text.parse().ok() } else { None }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Index(i) => write!(f, "{i}"),
            Segment::Key(k) => f.write_str(k),
        }
    }
}

impl From<&str> for Segment { fn from(v: &str) -> Self { Segment::Key(v.to_owned()) } }
impl From<String> for Segment { fn from(v: String) -> Self { Segment::Key(v) } }
impl From<usize> for Segment { fn from(v: usize) -> Self { Segment::Index(v) } }
impl From<&EntityId> for Segment { fn from(v: &EntityId) -> Self { Segment::Key(v.as_str().to_owned()) } }

/// Ordered path segments: `[model, id, property?, ...rest]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Path {
    segments: SmallVec<[Segment; 8]>,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a path from anything segment-like.
    pub fn from_segments<S: Into<Segment>>(segments: impl IntoIterator<Item = S>) -> Self {
        Self { segments: segments.into_iter().map(Into::into).collect() }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn push(&mut self, segment: impl Into<Segment>) {
        self.segments.push(segment.into());
    }

    /// Append every segment of `other`.
    pub fn extend(&mut self, other: Path) {
        self.segments.extend(other.segments);
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// The bracketed list form used in diagnostics: `[articles, 123, title]`.
    pub fn to_list_string(&self) -> String {
        list_string(&self.segments)
    }
}

pub(crate) fn list_string(segments: &[Segment]) -> String {
    let parts: Vec<String> = segments.iter().map(ToString::to_string).collect();
    format!("[{}]", parts.join(", "))
}

/// Renders the dotted/bracketed form: `articles[123].comments.user`.
impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            match (i, segment) {
                (0, seg) => write!(f, "{seg}")?,
                (1, seg) | (_, seg @ Segment::Index(_)) => write!(f, "[{seg}]")?,
                (_, Segment::Key(k)) => write!(f, ".{k}")?,
            }
        }
        Ok(())
    }
}

impl<S: Into<Segment>> FromIterator<S> for Path {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::from_segments(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_forms() {
        let mut path = Path::from_segments(["articles", "123", "comments"]);
        path.push(0usize);
        path.push("user");
        assert_eq!(path.to_string(), "articles[123].comments[0].user");
        assert_eq!(path.to_list_string(), "[articles, 123, comments, 0, user]");
    }

    #[test]
    fn test_segment_readings() {
        assert_eq!(Segment::Index(123).to_id(), EntityId::from("123"));
        assert_eq!(Segment::from("42").as_index(), Some(42));
        assert_eq!(Segment::from("c1").as_index(), None);
        assert_eq!(Segment::from("").as_index(), None);
        assert_eq!(Segment::from("0").as_index(), Some(0));
        assert_eq!(Segment::from("007").as_index(), None);
        assert_eq!(Segment::from("007").to_id(), EntityId::from("007"));
        assert_eq!(Segment::Index(3).as_key(), None);
    }
}
