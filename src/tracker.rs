//! Traversal path and revisit tracking.
//!
//! A tracker follows the encoder down and up the value graph and answers
//! one question: has this object identity been seen before, and if so at
//! which path? Three strategies trade completeness against cost; see
//! [`Strategy`].

use std::collections::HashMap;

use crate::error::XsonError;
use crate::reference::Key;
use crate::value::ObjectId;

/// Path and revisit state for one traversal.
///
/// `capture`/`rewind`/`restore` reroute the path while a bucket entry is
/// encoded. What survives a rewind depends on the strategy: the
/// exhaustive registry does (so bucket entries can reference locations
/// discovered in the main document), the scoped ancestor chain does not.
pub trait Tracker {
    /// Pushes a key onto the current path.
    fn descend(&mut self, key: Key) -> Result<(), XsonError>;

    /// Pops the innermost key.
    fn ascend(&mut self);

    fn depth(&self) -> usize;

    /// The current path from the root.
    fn path(&self) -> &[Key];

    /// Saves the current path state.
    fn capture(&self) -> Snapshot;

    /// Resets the path to the root.
    fn rewind(&mut self);

    /// Resumes a previously captured path state.
    fn restore(&mut self, snapshot: Snapshot);

    /// Records that `id` sits at the current path. First visit wins.
    fn register(&mut self, id: ObjectId);

    /// The canonical path of `id`, if this strategy has seen it.
    fn resolve(&self, id: ObjectId) -> Option<Vec<Key>>;
}

/// Saved path state, including the scoped strategy's ancestor chain.
#[derive(Debug)]
pub struct Snapshot {
    path: Vec<Key>,
    chain: Vec<(usize, ObjectId)>,
}

/// Tracking strategy, chosen per encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Registers the first-visit path of every object ever entered, so no
    /// object is encoded twice anywhere in the document. Lookup is
    /// amortized O(1); memory grows with the number of distinct objects.
    Exhaustive,
    /// No revisit detection at all: behaves like a plain acyclic encoder,
    /// and a depth guard is the only protection against cyclic input.
    /// For known-acyclic graphs where tracking overhead is unwelcome.
    Bounded { max_depth: usize },
    /// Detects only cycles through the current ancestor chain. Bounded
    /// memory and guaranteed termination, but objects shared across
    /// sibling branches are re-encoded in full at each occurrence.
    Scoped,
}

impl Strategy {
    pub const DEFAULT_MAX_DEPTH: usize = 128;

    /// Bounded tracking with the default depth limit.
    pub fn bounded() -> Self {
        Strategy::Bounded {
            max_depth: Self::DEFAULT_MAX_DEPTH,
        }
    }

    pub(crate) fn new_tracker(&self) -> Box<dyn Tracker> {
        match *self {
            Strategy::Exhaustive => Box::new(ExhaustiveTracker::default()),
            Strategy::Bounded { max_depth } => Box::new(BoundedTracker {
                max_depth,
                path: Vec::new(),
            }),
            Strategy::Scoped => Box::new(ScopedTracker::default()),
        }
    }
}

impl Default for Strategy {
    fn default() -> Self {
        Strategy::Exhaustive
    }
}

/// Global first-visit registry keyed by object identity.
#[derive(Debug, Default)]
struct ExhaustiveTracker {
    path: Vec<Key>,
    registry: HashMap<ObjectId, Vec<Key>>,
}

impl Tracker for ExhaustiveTracker {
    fn descend(&mut self, key: Key) -> Result<(), XsonError> {
        self.path.push(key);
        Ok(())
    }

    fn ascend(&mut self) {
        self.path.pop();
    }

    fn depth(&self) -> usize {
        self.path.len()
    }

    fn path(&self) -> &[Key] {
        &self.path
    }

    fn capture(&self) -> Snapshot {
        Snapshot {
            path: self.path.clone(),
            chain: Vec::new(),
        }
    }

    fn rewind(&mut self) {
        self.path.clear();
    }

    fn restore(&mut self, snapshot: Snapshot) {
        self.path = snapshot.path;
    }

    fn register(&mut self, id: ObjectId) {
        let path = &self.path;
        self.registry.entry(id).or_insert_with(|| path.clone());
    }

    fn resolve(&self, id: ObjectId) -> Option<Vec<Key>> {
        self.registry.get(&id).cloned()
    }
}

/// No registry; a depth limit stands in for cycle detection.
#[derive(Debug)]
struct BoundedTracker {
    max_depth: usize,
    path: Vec<Key>,
}

impl Tracker for BoundedTracker {
    fn descend(&mut self, key: Key) -> Result<(), XsonError> {
        self.path.push(key);
        if self.path.len() > self.max_depth {
            return Err(XsonError::DepthExceeded {
                max_depth: self.max_depth,
            });
        }
        Ok(())
    }

    fn ascend(&mut self) {
        self.path.pop();
    }

    fn depth(&self) -> usize {
        self.path.len()
    }

    fn path(&self) -> &[Key] {
        &self.path
    }

    fn capture(&self) -> Snapshot {
        Snapshot {
            path: self.path.clone(),
            chain: Vec::new(),
        }
    }

    fn rewind(&mut self) {
        self.path.clear();
    }

    fn restore(&mut self, snapshot: Snapshot) {
        self.path = snapshot.path;
    }

    fn register(&mut self, _id: ObjectId) {}

    fn resolve(&self, _id: ObjectId) -> Option<Vec<Key>> {
        None
    }
}

/// Tracks only the objects on the current ancestor chain, each tagged
/// with the depth it was registered at.
#[derive(Debug, Default)]
struct ScopedTracker {
    path: Vec<Key>,
    chain: Vec<(usize, ObjectId)>,
}

impl Tracker for ScopedTracker {
    fn descend(&mut self, key: Key) -> Result<(), XsonError> {
        self.path.push(key);
        Ok(())
    }

    fn ascend(&mut self) {
        // Drop chain entries registered at the depth we are leaving.
        let depth = self.path.len();
        while self.chain.last().is_some_and(|&(d, _)| d == depth) {
            self.chain.pop();
        }
        self.path.pop();
    }

    fn depth(&self) -> usize {
        self.path.len()
    }

    fn path(&self) -> &[Key] {
        &self.path
    }

    fn capture(&self) -> Snapshot {
        Snapshot {
            path: self.path.clone(),
            chain: self.chain.clone(),
        }
    }

    fn rewind(&mut self) {
        self.path.clear();
        self.chain.clear();
    }

    fn restore(&mut self, snapshot: Snapshot) {
        self.path = snapshot.path;
        self.chain = snapshot.chain;
    }

    fn register(&mut self, id: ObjectId) {
        self.chain.push((self.path.len(), id));
    }

    fn resolve(&self, id: ObjectId) -> Option<Vec<Key>> {
        self.chain
            .iter()
            .find(|&&(_, chained)| chained == id)
            .map(|&(depth, _)| self.path[..depth].to_vec())
    }
}
