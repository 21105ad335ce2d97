//! Session reference table.
//!
//! Shared and circular object graphs travel as Ref values pointing into
//! this table. Every decoder that produces an identity-bearing value
//! (string, bytes, GUID, date, time, list, map, object) allocates a slot
//! for it; composite decoders allocate **before** descending into their
//! children, so a Ref to the slot resolves correctly while the container
//! is still being filled — that is what makes genuine cycles work, not
//! just deduplication.
//!
//! Lifecycle: one table per decode session; cleared only by an explicit
//! `reset`, never implicitly between top-level values on a continuing
//! stream.

use crate::error::{Error, Result};
use crate::value::Value;

/// Append-only table of previously decoded values, indexed from 0.
///
/// Ein einmal vergebener Slot wechselt nie seine Identität: spätere
/// In-Place-Mutation eines Composite-Werts ist durch jeden früher
/// aufgelösten Handle sichtbar.
#[derive(Default)]
pub struct ReferenceTable {
    entries: Vec<Value>,
}

impl ReferenceTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `value` and returns its new index.
    pub fn allocate(&mut self, value: Value) -> usize {
        let index = self.entries.len();
        self.entries.push(value);
        index
    }

    /// Returns the shared value at `index` (a handle clone, not a copy).
    ///
    /// An index at or beyond the table's length is a contract violation.
    pub fn resolve(&self, index: usize) -> Result<Value> {
        self.entries
            .get(index)
            .cloned()
            .ok_or(Error::OutOfRangeReference {
                index,
                len: self.entries.len(),
            })
    }

    /// Clears all slots.
    pub fn reset(&mut self) {
        self.entries.clear();
    }

    /// Number of allocated slots.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if no slot has been allocated.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
