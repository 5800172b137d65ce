//! Body registry: object id → rigid-body handle.
//!
//! The registry holds non-owning handles. The scene inserts an entry when an
//! object is spawned and removes it in the same call that destroys the body,
//! so a handle found here always refers to a body that was live when the
//! entry was read.
//!
//! Iteration with [`BodyRegistry::for_each`] hands the visitor mutable access
//! to the registry itself, so an object can be despawned while a global
//! operation (the impact dispatcher) is walking the entries.

use std::collections::BTreeMap;
use std::fmt;

use crate::physics::BodyHandle;

/// Stable identifier of a simulated object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectId(pub u32);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "obj-{}", self.0)
    }
}

/// Mapping of currently spawned objects to their rigid bodies.
#[derive(Debug, Default, Clone)]
pub struct BodyRegistry {
    entries: BTreeMap<ObjectId, BodyHandle>,
}

impl BodyRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a handle. Registering an id again replaces its handle and
    /// returns the previous one.
    pub fn register(&mut self, id: ObjectId, handle: BodyHandle) -> Option<BodyHandle> {
        self.entries.insert(id, handle)
    }

    /// Remove an entry. No-op if absent.
    pub fn unregister(&mut self, id: ObjectId) -> Option<BodyHandle> {
        self.entries.remove(&id)
    }

    /// Handle registered for an id.
    pub fn get(&self, id: ObjectId) -> Option<BodyHandle> {
        self.entries.get(&id).copied()
    }

    /// Whether an id is registered.
    pub fn contains(&self, id: ObjectId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Number of registered objects.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no objects are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered ids in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.entries.keys().copied()
    }

    /// Snapshot of all current entries.
    pub fn entries(&self) -> Vec<(ObjectId, BodyHandle)> {
        self.entries.iter().map(|(id, h)| (*id, *h)).collect()
    }

    /// Visit every entry, tolerating mutation from inside the visitor.
    ///
    /// The set of ids is captured up front. Before each visit the entry is
    /// looked up again, so an entry unregistered by an earlier visit is
    /// skipped and a replaced handle is seen in its new form. Entries
    /// registered during iteration are not visited.
    pub fn for_each<F>(&mut self, mut visitor: F)
    where
        F: FnMut(&mut BodyRegistry, ObjectId, BodyHandle),
    {
        let ids: Vec<ObjectId> = self.entries.keys().copied().collect();
        for id in ids {
            let Some(handle) = self.get(id) else {
                continue;
            };
            visitor(self, id, handle);
        }
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
