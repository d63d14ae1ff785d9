//! Append-only snapshot maps.
//!
//! Readers load the current snapshot without locking. Writers clone the
//! snapshot, insert, and publish the copy with a compare-and-swap against the
//! snapshot they started from; when another writer got there first they
//! retry on the fresh snapshot. A key already present wins over the value
//! being inserted, so every reader of a key sees the same value forever.

use crate::compiler::Procedure;
use crate::format::Format;
use arc_swap::{ArcSwap, Guard};
use indexmap::IndexMap;
use std::any::TypeId;
use std::hash::Hash;
use std::sync::Arc;

/// Copy-on-write map published through [`ArcSwap`].
pub struct SnapshotMap<K, V> {
    snapshot: ArcSwap<IndexMap<K, V>>,
}

impl<K, V> SnapshotMap<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    #[must_use]
    pub fn new() -> Self {
        SnapshotMap {
            snapshot: ArcSwap::from_pointee(IndexMap::new()),
        }
    }

    /// Lock-free lookup in the current snapshot.
    #[inline]
    #[must_use]
    pub fn get(&self, key: &K) -> Option<V> {
        self.snapshot.load().get(key).cloned()
    }

    /// Publishes `value` under `key` unless the key is already present, and
    /// returns whichever value the map holds afterwards.
    pub fn publish(&self, key: K, value: V) -> V {
        let mut current = self.snapshot.load_full();
        loop {
            if let Some(existing) = current.get(&key) {
                return existing.clone();
            }
            let mut next = IndexMap::clone(&current);
            next.insert(key.clone(), value.clone());
            let previous = self.snapshot.compare_and_swap(&current, Arc::new(next));
            if Arc::ptr_eq(&previous, &current) {
                return value;
            }
            log::trace!("snapshot publish lost a race, retrying");
            current = Guard::into_inner(previous);
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshot.load().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshot.load().is_empty()
    }
}

impl<K, V> Default for SnapshotMap<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

/// Compiled procedures keyed by (type, format).
#[derive(Default)]
pub struct ProcedureCache {
    procedures: SnapshotMap<(TypeId, Format), Procedure>,
}

impl ProcedureCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    #[must_use]
    pub fn get(&self, ty: TypeId, format: Format) -> Option<Procedure> {
        self.procedures.get(&(ty, format))
    }

    /// Publishes a compiled procedure. When another thread published first,
    /// its procedure is returned and `procedure` is dropped.
    pub fn publish(&self, ty: TypeId, format: Format, procedure: Procedure) -> Procedure {
        self.procedures.publish((ty, format), procedure)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.procedures.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.procedures.is_empty()
    }
}
