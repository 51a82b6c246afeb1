//! Nested accessor over plain (non-relational) data.

use crate::model::{Segment, Value};

/// Walk `segments` into `root`. Any step that does not exist yields `None`.
///
/// Supported steps: map keys, list positions (index segments or all-digit
/// keys), and `length` on strings and lists.
pub fn get_nested(root: &Value, segments: &[Segment]) -> Option<Value> {
    let mut current = root;
    let mut iter = segments.iter().peekable();

    while let Some(segment) = iter.next() {
        match (current, segment) {
            (Value::Map(map), seg) => {
                let key = seg.to_string();
                current = map.get(&key)?;
            }
            (Value::List(items), seg) => {
                if let Some(index) = seg.as_index() {
                    current = items.get(index)?;
                } else if seg.as_key() == Some("length") && iter.peek().is_none() {
                    return Some(Value::from(items.len()));
                } else {
                    return None;
                }
            }
            (Value::String(s), Segment::Key(k)) if k == "length" && iter.peek().is_none() => {
                return Some(Value::from(s.chars().count()));
            }
            _ => return None,
        }
    }

    Some(current.clone())
}
