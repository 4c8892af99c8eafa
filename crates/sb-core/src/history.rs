//! Transform edit history
//!
//! A cursor-addressed list of full transform snapshots. The entry under the
//! cursor is the most recently applied state; undo steps the cursor back and
//! re-applies the entry it lands on, redo steps it forward.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::shape::{Shape, ShapeId, Transform};
use crate::store::EntityStore;

/// A full transform snapshot of one shape
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub shape_id: ShapeId,
    pub transform: Transform,
}

impl HistoryEntry {
    pub fn new(shape_id: ShapeId, transform: Transform) -> Self {
        Self {
            shape_id,
            transform,
        }
    }

    /// Snapshot the current transform of a shape
    pub fn capture(shape: &Shape) -> Self {
        Self::new(shape.id, shape.transform)
    }
}

/// How drag gestures are recorded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HistoryPolicy {
    /// Pre-gesture snapshot plus one entry per change event
    #[default]
    PerChange,
    /// Pre-gesture snapshot plus the final transform, once per gesture
    PerGesture,
}

/// Ordered snapshots plus a cursor
#[derive(Debug, Clone, Default)]
pub struct EditHistory {
    entries: Vec<HistoryEntry>,
    /// Index of the current entry (None = empty)
    cursor: Option<usize>,
}

impl EditHistory {
    /// Create an empty history
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry, discarding everything after the cursor first
    pub fn push(&mut self, entry: HistoryEntry) {
        let keep = self.cursor.map_or(0, |c| c + 1);
        self.entries.truncate(keep);
        self.entries.push(entry);
        self.cursor = Some(self.entries.len() - 1);
    }

    /// Step back one entry and apply it to the store
    ///
    /// Returns the applied entry, or `None` when already at the first entry.
    /// If the entry's shape no longer exists the cursor still moves.
    pub fn undo(&mut self, store: &mut EntityStore) -> Option<HistoryEntry> {
        let target = self.cursor?.checked_sub(1)?;
        self.cursor = Some(target);
        let entry = self.entries[target];
        Self::apply(&entry, store);
        Some(entry)
    }

    /// Step forward one entry and apply it to the store
    pub fn redo(&mut self, store: &mut EntityStore) -> Option<HistoryEntry> {
        let target = self.cursor.map_or(0, |c| c + 1);
        let entry = *self.entries.get(target)?;
        self.cursor = Some(target);
        Self::apply(&entry, store);
        Some(entry)
    }

    fn apply(entry: &HistoryEntry, store: &mut EntityStore) {
        if store.set_transform(entry.shape_id, entry.transform).is_none() {
            debug!("History entry refers to removed shape {}", entry.shape_id);
        }
    }

    pub fn can_undo(&self) -> bool {
        self.cursor.is_some_and(|c| c > 0)
    }

    pub fn can_redo(&self) -> bool {
        self.cursor.map_or(0, |c| c + 1) < self.entries.len()
    }

    /// Current cursor (None = empty history)
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = None;
    }
}
