//! The encoder's input value model.
//!
//! Arrays and tables are plain inline values with no identity of their
//! own; they are re-encoded wherever they occur. Only [`Value::Object`]
//! handles carry an identity, participate in revisit detection and may be
//! extracted into buckets.

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

/// An identity-bearing node in the value graph.
///
/// `node()` classifies the object's contents: record types enumerate
/// their fields as a mapping, collection-like types yield a sequence, and
/// boxed scalars a scalar. It must hand out the same `Rc` handles on
/// every call; freshly allocated handles would defeat revisit detection.
///
/// The `Any` supertrait lets mappers route objects into buckets by their
/// concrete type.
pub trait XObject: Any {
    fn node(&self) -> Node;
}

/// A value the encoder can walk.
#[derive(Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    /// Inline ordered sequence, no identity.
    Array(Vec<Value>),
    /// Inline ordered mapping, no identity. Insertion order is significant.
    Table(IndexMap<String, Value>),
    /// Shared object handle; the only variant with identity.
    Object(Rc<dyn XObject>),
}

impl Value {
    /// JSON literal form, if this is a primitive.
    pub(crate) fn literal(&self) -> Option<String> {
        let text = match self {
            Value::Null => "null".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Int(i) => i.to_string(),
            Value::Float(f) => json_literal(f),
            Value::String(s) => json_literal(s),
            _ => return None,
        };
        Some(text)
    }

    pub(crate) fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Table(_) => "table",
            Value::Object(_) => "object",
        }
    }
}

/// JSON serialization of a literal; also used for keys and quoted
/// reference segments so escaping is uniform across the output.
pub(crate) fn json_literal<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string(value).expect("literal serialization should not fail")
}

// Object handles print as their address: the graph may be cyclic, so a
// derived Debug could recurse forever.
impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("Null"),
            Value::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Value::Int(i) => f.debug_tuple("Int").field(i).finish(),
            Value::Float(x) => f.debug_tuple("Float").field(x).finish(),
            Value::String(s) => f.debug_tuple("String").field(s).finish(),
            Value::Array(items) => f.debug_list().entries(items).finish(),
            Value::Table(entries) => f.debug_map().entries(entries).finish(),
            Value::Object(object) => write!(f, "Object({:p})", Rc::as_ptr(object)),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(value.into())
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<IndexMap<String, Value>> for Value {
    fn from(entries: IndexMap<String, Value>) -> Self {
        Value::Table(entries)
    }
}

impl<T: XObject> From<Rc<T>> for Value {
    fn from(object: Rc<T>) -> Self {
        Value::Object(object)
    }
}

/// Classified shape of one value.
#[derive(Debug, Clone)]
pub enum Node {
    /// A primitive; a non-primitive payload here is a classification error.
    Scalar(Value),
    Sequence(Vec<Value>),
    Mapping(Vec<(String, Value)>),
}

/// Identity token for one object handle, derived from its allocation
/// address. Stable for the duration of a single encode call, during which
/// the root graph keeps every reachable handle alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectId(usize);

impl ObjectId {
    pub(crate) fn of(object: &Rc<dyn XObject>) -> Self {
        ObjectId(Rc::as_ptr(object) as *const () as usize)
    }
}
