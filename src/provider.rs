//! Value classification.

use crate::error::XsonError;
use crate::tracker::Tracker;
use crate::value::{Node, Value};

/// Classifies a value into its node shape.
///
/// The standard provider fits most graphs; a custom one can change how
/// whole categories of values present themselves without touching their
/// types. The tracker is available for position-sensitive providers.
pub trait Provider {
    fn extract(&self, value: &Value, tracker: &dyn Tracker) -> Result<Node, XsonError>;
}

/// Default classification: inline values map to their own shape, objects
/// classify themselves through [`crate::XObject::node`].
#[derive(Debug, Default)]
pub struct StdProvider;

impl Provider for StdProvider {
    fn extract(&self, value: &Value, _tracker: &dyn Tracker) -> Result<Node, XsonError> {
        let node = match value {
            Value::Array(items) => Node::Sequence(items.clone()),
            Value::Table(entries) => {
                Node::Mapping(entries.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
            }
            Value::Object(object) => object.node(),
            scalar => Node::Scalar(scalar.clone()),
        };
        Ok(node)
    }
}
