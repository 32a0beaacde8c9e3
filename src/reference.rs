//! Reference-path expressions.
//!
//! A revisited object is rendered as a textual pointer to its canonical
//! location: a property-access expression rooted at the `_` sigil, such as
//! `_.$.wife.children[0]` or `foos` bucket slot `_.foos[0]`.

use std::fmt;

use crate::value::json_literal;

/// One step in a path from a root: an array index or a property name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    Index(usize),
    Name(String),
}

impl Key {
    pub fn name(name: impl Into<String>) -> Self {
        Key::Name(name.into())
    }
}

impl From<usize> for Key {
    fn from(index: usize) -> Self {
        Key::Index(index)
    }
}

impl From<&str> for Key {
    fn from(name: &str) -> Self {
        Key::Name(name.to_string())
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Index(index) => write!(f, "{index}"),
            Key::Name(name) => f.write_str(name),
        }
    }
}

/// Renders a path as a property-access expression.
///
/// The empty path is the bare sigil `_`. Indices render as `[N]`,
/// identifier names as `.name`, anything else as a double-quoted
/// subscript. An empty-string name contributes no token.
pub fn reference(path: &[Key]) -> String {
    let mut out = String::from("_");
    for key in path {
        match key {
            Key::Index(index) => {
                out.push('[');
                out.push_str(&index.to_string());
                out.push(']');
            }
            Key::Name(name) if name.is_empty() => {}
            Key::Name(name) if is_identifier(name) => {
                out.push('.');
                out.push_str(name);
            }
            Key::Name(name) => {
                out.push('[');
                out.push_str(&quote(name));
                out.push(']');
            }
        }
    }
    out
}

/// Double-quotes a string using the same escaping rule as every string
/// literal in the output.
pub fn quote(value: &str) -> String {
    json_literal(&value)
}

/// Whether `name` can follow a `.` in a property-access expression.
///
/// First char must be a Unicode letter, `_` or `$`; the rest Unicode
/// alphanumerics, `_` or `$`. Combining marks are not accepted.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}
