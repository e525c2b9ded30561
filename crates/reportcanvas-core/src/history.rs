//! Snapshot-based undo/redo.
//!
//! History is linear: capturing a snapshot while the cursor is not at the
//! tail drops everything after the cursor.

use crate::component::ReportComponent;
use crate::properties::SerializableColor;
use serde::{Deserialize, Serialize};
use web_time::{SystemTime, UNIX_EPOCH};

/// Default number of snapshots to keep.
pub const DEFAULT_MAX_HISTORY: usize = 50;

/// An immutable deep copy of document state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// All components at capture time.
    pub components: Vec<ReportComponent>,
    /// Canvas width at capture time.
    pub canvas_width: f64,
    /// Canvas height at capture time.
    pub canvas_height: f64,
    /// Canvas background at capture time.
    pub canvas_background: SerializableColor,
    /// Milliseconds since the Unix epoch.
    pub timestamp: u64,
    /// What the edit was, e.g. "Align left".
    pub description: String,
}

impl Snapshot {
    /// Capture a snapshot. Components are cloned, never shared.
    pub fn capture(
        components: &[ReportComponent],
        canvas_width: f64,
        canvas_height: f64,
        canvas_background: SerializableColor,
        description: impl Into<String>,
    ) -> Self {
        Self {
            components: components.to_vec(),
            canvas_width,
            canvas_height,
            canvas_background,
            timestamp: now_millis(),
            description: description.into(),
        }
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Bounded linear history with a cursor.
///
/// `index` is `None` when history is empty and otherwise always points at a
/// valid snapshot: the one representing the current state.
#[derive(Debug, Clone)]
pub struct History {
    snapshots: Vec<Snapshot>,
    index: Option<usize>,
    max_size: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_HISTORY)
    }
}

impl History {
    /// Create an empty history keeping at most `max_size` snapshots (minimum 1).
    pub fn new(max_size: usize) -> Self {
        Self {
            snapshots: Vec::new(),
            index: None,
            max_size: max_size.max(1),
        }
    }

    /// Append a snapshot, discarding any redo branch and evicting the oldest
    /// entry when over capacity.
    pub fn push(&mut self, snapshot: Snapshot) {
        let keep = self.index.map_or(0, |i| i + 1);
        if keep < self.snapshots.len() {
            log::trace!("discarding {} redo snapshot(s)", self.snapshots.len() - keep);
            self.snapshots.truncate(keep);
        }

        self.snapshots.push(snapshot);

        if self.snapshots.len() > self.max_size {
            self.snapshots.remove(0);
        }
        self.index = Some(self.snapshots.len() - 1);
    }

    /// Step back. Returns the snapshot now current, or `None` at the start.
    pub fn undo(&mut self) -> Option<&Snapshot> {
        let index = self.index.filter(|&i| i > 0)? - 1;
        self.index = Some(index);
        self.snapshots.get(index)
    }

    /// Step forward. Returns the snapshot now current, or `None` at the tail.
    pub fn redo(&mut self) -> Option<&Snapshot> {
        let index = self.index.map_or(0, |i| i + 1);
        if index >= self.snapshots.len() {
            return None;
        }
        self.index = Some(index);
        self.snapshots.get(index)
    }

    /// Check if undo is available.
    pub fn can_undo(&self) -> bool {
        self.index.is_some_and(|i| i > 0)
    }

    /// Check if redo is available.
    pub fn can_redo(&self) -> bool {
        self.index.map_or(0, |i| i + 1) < self.snapshots.len()
    }

    /// Drop every snapshot.
    pub fn clear(&mut self) {
        self.snapshots.clear();
        self.index = None;
    }

    /// Cursor position, `None` when empty.
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    /// All retained snapshots, oldest first.
    pub fn snapshots(&self) -> &[Snapshot] {
        &self.snapshots
    }

    /// Number of retained snapshots.
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Check if history is empty.
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Capacity.
    pub fn max_size(&self) -> usize {
        self.max_size
    }
}
