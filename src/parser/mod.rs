//! # Path Parser
//!
//! Turns `articles[123].comments.user.name` into a [`Path`].
//! Pure functions, no schema or store access.
//!
//! - `.` separates property hops
//! - `[...]` selects an id or index; canonical decimal content (`0`, `42`)
//!   becomes [`Segment::Index`], anything else (including `007`) a
//!   [`Segment::Key`] that keeps its exact spelling
//! - quoted bracket content (`['a.b']`, `["x"]`) is always a key

use crate::model::path::canonical_index;
use crate::model::{Path, Segment};
use crate::{Error, Result};

/// Parse a single path string.
pub fn parse(input: &str) -> Result<Path> {
    let mut path = Path::new();
    parse_into(input, &mut path)?;
    Ok(path)
}

/// Parse several partial path strings and concatenate them, so
/// `parse_parts(&["articles[123]", "comments[0]", "user"])` equals
/// `parse("articles[123].comments[0].user")`.
pub fn parse_parts<S: AsRef<str>>(parts: &[S]) -> Result<Path> {
    let mut path = Path::new();
    for part in parts {
        parse_into(part.as_ref(), &mut path)?;
    }
    Ok(path)
}

fn parse_into(input: &str, path: &mut Path) -> Result<()> {
    if input.is_empty() {
        return Err(Error::SyntaxError { position: 0, message: "Empty path".into() });
    }

    let mut chars = input.char_indices().peekable();

    // Leading key, unless the path opens with a bracket.
    if !matches!(chars.peek(), Some(&(_, '['))) {
        path.push(read_key(input, &mut chars, 0)?);
    }

    while let Some((pos, ch)) = chars.next() {
        match ch {
            '.' => path.push(read_key(input, &mut chars, pos + 1)?),
            '[' => {
                path.push(read_bracket(&mut chars, pos)?);
                match chars.peek() {
                    None | Some(&(_, '.')) | Some(&(_, '[')) => {}
                    Some(&(p, c)) => {
                        return Err(Error::SyntaxError {
                            position: p,
                            message: format!("Expected '.' or '[' after ']', found '{c}'"),
                        });
                    }
                }
            }
            c => {
                return Err(Error::SyntaxError {
                    position: pos,
                    message: format!("Unexpected character '{c}'"),
                });
            }
        }
    }
    Ok(())
}

type Chars<'a> = std::iter::Peekable<std::str::CharIndices<'a>>;

/// Read a bare property name up to the next `.` or `[`.
fn read_key(input: &str, chars: &mut Chars<'_>, start: usize) -> Result<Segment> {
    let mut end = start;
    while let Some(&(pos, c)) = chars.peek() {
        match c {
            '.' | '[' => break,
            ']' => {
                return Err(Error::SyntaxError {
                    position: pos,
                    message: "Unmatched ']'".into(),
                });
            }
            _ => {
                end = pos + c.len_utf8();
                chars.next();
            }
        }
    }
    if end == start {
        return Err(Error::SyntaxError {
            position: start,
            message: "Empty property name".into(),
        });
    }
    Ok(Segment::Key(input[start..end].to_owned()))
}

/// Read bracket content; the opening `[` at `open` is already consumed.
fn read_bracket(chars: &mut Chars<'_>, open: usize) -> Result<Segment> {
    if let Some(&(_, quote @ ('\'' | '"'))) = chars.peek() {
        chars.next();
        let mut s = String::new();
        loop {
            match chars.next() {
                Some((_, '\\')) => match chars.next() {
                    Some((_, c)) => s.push(c),
                    None => break,
                },
                Some((_, c)) if c == quote => {
                    return match chars.next() {
                        Some((_, ']')) => Ok(Segment::Key(s)),
                        Some((p, c)) => Err(Error::SyntaxError {
                            position: p,
                            message: format!("Expected ']' after quoted key, found '{c}'"),
                        }),
                        None => Err(Error::SyntaxError {
                            position: open,
                            message: "Unterminated '['".into(),
                        }),
                    };
                }
                Some((_, c)) => s.push(c),
                None => break,
            }
        }
        return Err(Error::SyntaxError {
            position: open,
            message: "Unterminated quoted key".into(),
        });
    }

    let mut s = String::new();
    loop {
        match chars.next() {
            Some((_, ']')) => break,
            Some((p, '[')) => {
                return Err(Error::SyntaxError {
                    position: p,
                    message: "Nested '[' inside brackets".into(),
                });
            }
            Some((_, c)) => s.push(c),
            None => {
                return Err(Error::SyntaxError {
                    position: open,
                    message: "Unterminated '['".into(),
                });
            }
        }
    }

    if s.is_empty() {
        return Err(Error::SyntaxError {
            position: open,
            message: "Empty brackets".into(),
        });
    }
    match canonical_index(&s) {
        Some(index) => Ok(Segment::Index(index)),
        None => Ok(Segment::Key(s)),
    }
}
