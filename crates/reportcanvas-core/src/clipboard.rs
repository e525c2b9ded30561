//! In-engine clipboard for copy/cut/paste.

use crate::component::{ComponentId, ReportComponent};
use crate::registry::ComponentRegistry;
use kurbo::Vec2;
use std::collections::BTreeSet;

/// Deep copies of the last copied or cut components.
///
/// Content is replaced wholesale on every copy and is independent of the
/// undo history.
#[derive(Debug, Clone, Default)]
pub struct Clipboard {
    items: Vec<ReportComponent>,
}

impl Clipboard {
    /// Create an empty clipboard.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the content with copies of the selected components that exist.
    /// Returns the number of copied components.
    pub fn copy_from(
        &mut self,
        registry: &ComponentRegistry,
        selected: &BTreeSet<ComponentId>,
    ) -> usize {
        self.items = registry
            .components()
            .iter()
            .filter(|c| selected.contains(c.id()))
            .cloned()
            .collect();
        self.items.len()
    }

    /// Fresh copies ready to paste: new ids, offset from the clipboard
    /// coordinates (not from any previous paste).
    pub fn paste_items(&self, offset: Vec2) -> Vec<ReportComponent> {
        self.items
            .iter()
            .map(|c| c.duplicate_with_offset(offset))
            .collect()
    }

    /// Clipboard content.
    pub fn items(&self) -> &[ReportComponent] {
        &self.items
    }

    /// Check if the clipboard is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
