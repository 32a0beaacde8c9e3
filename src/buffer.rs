//! Staging area for bucketed objects and their deferred encodings.

use indexmap::IndexMap;

use crate::value::ObjectId;

/// Identity-deduplicating buffer backing extended-mode buckets.
///
/// Buckets keep first-discovery order and slots keep insertion order, so
/// the drained output is deterministic. Every newly inserted slot gets
/// its text exactly once via [`AliasBuffer::write_at`] before the buffer
/// is drained: inserting triggers an immediate synchronous sub-encode.
#[derive(Debug, Default)]
pub(crate) struct AliasBuffer {
    buckets: IndexMap<String, Bucket>,
}

#[derive(Debug, Default)]
struct Bucket {
    objects: Vec<ObjectId>,
    texts: Vec<Option<String>>,
}

impl AliasBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `(true, index)` for a newly inserted identity, or
    /// `(false, index)` of its existing slot. The scan is linear: buckets
    /// hold the few types a mapper singles out, not the whole graph.
    pub fn insert(&mut self, bucket: &str, id: ObjectId) -> (bool, usize) {
        let bucket = self.buckets.entry(bucket.to_string()).or_default();
        if let Some(index) = bucket.objects.iter().position(|&o| o == id) {
            return (false, index);
        }
        let index = bucket.objects.len();
        bucket.objects.push(id);
        bucket.texts.push(None);
        (true, index)
    }

    /// Stores the deferred encoding of one slot.
    pub fn write_at(&mut self, bucket: &str, index: usize, text: String) {
        let bucket = self
            .buckets
            .get_mut(bucket)
            .expect("write_at follows insert");
        bucket.texts[index] = Some(text);
    }

    /// Buckets in discovery order with their finished entry texts.
    pub fn drain(self) -> impl Iterator<Item = (String, Vec<String>)> {
        self.buckets.into_iter().map(|(name, bucket)| {
            let texts = bucket
                .texts
                .into_iter()
                .map(|text| text.expect("every slot encoded before drain"))
                .collect();
            (name, texts)
        })
    }
}
