//! Mapping table
//!
//! Provides [`MappingTable`], the append-only id map of one restore run.

use crate::namespace::Namespace;
use cloze_codec::RecordId;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, Ordering};

/// One `(namespace, old id) -> new id` entry
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MappingEntry {
    /// Kind of record
    pub namespace: Namespace,

    /// Id in the backup
    pub old_id: RecordId,

    /// Id after restore
    pub new_id: RecordId,
}

impl MappingEntry {
    /// Create entry
    #[inline]
    #[must_use]
    pub fn new(namespace: Namespace, old_id: RecordId, new_id: RecordId) -> Self {
        Self {
            namespace,
            old_id,
            new_id,
        }
    }
}

/// Mapping table errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MappingError {
    /// Write after the table was frozen
    #[error("mapping table is frozen: cannot map {namespace}/{old_id}")]
    Frozen {
        /// Namespace of the rejected write
        namespace: Namespace,
        /// Old id of the rejected write
        old_id: RecordId,
    },

    /// Old id already mapped to a different new id
    #[error("conflicting mapping for {namespace}/{old_id}: {existing} vs {attempted}")]
    Conflict {
        /// Namespace of the entry
        namespace: Namespace,
        /// Old id of the entry
        old_id: RecordId,
        /// Id already recorded
        existing: RecordId,
        /// Id the caller tried to record
        attempted: RecordId,
    },
}

/// Namespaced old-to-new id map of one restore run
///
/// Writes go through `&self` so record-creation steps can share the table
/// behind an `Arc`. After [`MappingTable::freeze`] the table is a read-only
/// snapshot.
#[derive(Debug, Default)]
pub struct MappingTable {
    entries: DashMap<(Namespace, RecordId), RecordId>,
    frozen: AtomicBool,
}

impl MappingTable {
    /// Create empty, writable table
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `old_id` in `namespace` was recreated as `new_id`
    ///
    /// Repeating an identical entry is a no-op.
    ///
    /// # Errors
    /// - [`MappingError::Frozen`] after [`MappingTable::freeze`]
    /// - [`MappingError::Conflict`] if `old_id` already maps elsewhere
    pub fn set_mapping(
        &self,
        namespace: &Namespace,
        old_id: RecordId,
        new_id: RecordId,
    ) -> Result<(), MappingError> {
        if self.is_frozen() {
            return Err(MappingError::Frozen {
                namespace: namespace.clone(),
                old_id,
            });
        }

        match self.entries.entry((namespace.clone(), old_id)) {
            Entry::Occupied(existing) if *existing.get() == new_id => Ok(()),
            Entry::Occupied(existing) => Err(MappingError::Conflict {
                namespace: namespace.clone(),
                old_id,
                existing: *existing.get(),
                attempted: new_id,
            }),
            Entry::Vacant(slot) => {
                tracing::trace!(%namespace, %old_id, %new_id, "mapping recorded");
                slot.insert(new_id);
                Ok(())
            }
        }
    }

    /// Record an entry
    ///
    /// # Errors
    /// Same as [`MappingTable::set_mapping`]
    pub fn insert_entry(&self, entry: &MappingEntry) -> Result<(), MappingError> {
        self.set_mapping(&entry.namespace, entry.old_id, entry.new_id)
    }

    /// New id for `old_id`, `None` when it was never recreated
    #[must_use]
    pub fn resolve(&self, namespace: &Namespace, old_id: RecordId) -> Option<RecordId> {
        self.entries
            .get(&(namespace.clone(), old_id))
            .map(|entry| *entry)
    }

    /// Resolve a raw token; tokens that are not ids never resolve
    #[must_use]
    pub fn resolve_token(&self, namespace: &Namespace, token: &str) -> Option<RecordId> {
        token
            .parse::<RecordId>()
            .ok()
            .and_then(|old_id| self.resolve(namespace, old_id))
    }

    /// Check if `old_id` is mapped in `namespace`
    #[inline]
    #[must_use]
    pub fn contains(&self, namespace: &Namespace, old_id: RecordId) -> bool {
        self.resolve(namespace, old_id).is_some()
    }

    /// All new ids recorded in `namespace`, ascending
    #[must_use]
    pub fn new_ids(&self, namespace: &Namespace) -> BTreeSet<RecordId> {
        self.entries
            .iter()
            .filter(|entry| &entry.key().0 == namespace)
            .map(|entry| *entry.value())
            .collect()
    }

    /// Stop accepting writes
    #[inline]
    pub fn freeze(&self) {
        if !self.frozen.swap(true, Ordering::AcqRel) {
            tracing::debug!(entries = self.len(), "mapping table frozen");
        }
    }

    /// Check if the table is read-only
    #[inline]
    #[must_use]
    pub fn is_frozen(&self) -> bool {
        self.frozen.load(Ordering::Acquire)
    }

    /// Total number of entries
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if table is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Snapshot of all entries, sorted
    #[must_use]
    pub fn entries(&self) -> Vec<MappingEntry> {
        let mut entries: Vec<_> = self
            .entries
            .iter()
            .map(|entry| MappingEntry::new(entry.key().0.clone(), entry.key().1, *entry.value()))
            .collect();
        entries.sort();
        entries
    }
}

impl FromIterator<MappingEntry> for MappingTable {
    /// Build a writable table; later duplicates of a key are ignored
    fn from_iter<I: IntoIterator<Item = MappingEntry>>(iter: I) -> Self {
        let table = Self::new();
        for entry in iter {
            table
                .entries
                .entry((entry.namespace, entry.old_id))
                .or_insert(entry.new_id);
        }
        table
    }
}
