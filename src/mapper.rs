//! Alias policy: which objects get extracted into which bucket.

use std::any::{Any, TypeId};
use std::collections::HashMap;

use crate::tracker::Tracker;
use crate::value::XObject;

/// Decides whether an object is extracted into a named bucket in
/// extended mode. The tracker is available for position-sensitive
/// policies.
pub trait Mapper {
    /// Bucket name for `object`, or `None` to encode it in place.
    fn alias_of(&self, object: &dyn XObject, tracker: &dyn Tracker) -> Option<String>;
}

/// Routes objects into buckets by their concrete Rust type.
#[derive(Debug, Default)]
pub struct StaticMapper {
    aliases: HashMap<TypeId, String>,
}

impl StaticMapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Routes every `T` into the bucket `name`.
    pub fn with<T: XObject>(mut self, name: impl Into<String>) -> Self {
        self.aliases.insert(TypeId::of::<T>(), name.into());
        self
    }
}

impl Mapper for StaticMapper {
    fn alias_of(&self, object: &dyn XObject, _tracker: &dyn Tracker) -> Option<String> {
        // Upcast first: type_id on the XObject trait object itself would
        // name `dyn XObject`, not the concrete type.
        let any: &dyn Any = object;
        self.aliases.get(&any.type_id()).cloned()
    }
}
