//! Selection state for the report canvas.

use crate::component::ComponentId;
use std::collections::BTreeSet;

/// Tracks which components are selected, hovered and dragged.
///
/// Ids are not validated here; operations that act on the selection skip
/// ids that no longer resolve.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    /// Currently selected component ids.
    selected: BTreeSet<ComponentId>,
    /// Component under the pointer.
    hovered: Option<ComponentId>,
    /// Component being dragged.
    dragged: Option<ComponentId>,
}

impl Selection {
    /// Create an empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Select a component.
    ///
    /// With `multi` unset the selection becomes exactly `{id}`; with `multi`
    /// set the id is toggled in the existing selection.
    pub fn select(&mut self, id: &str, multi: bool) {
        if !multi {
            self.selected.clear();
            self.selected.insert(id.to_string());
        } else if !self.selected.remove(id) {
            self.selected.insert(id.to_string());
        }
    }

    /// Replace the selection wholesale.
    pub fn select_many<I, S>(&mut self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<ComponentId>,
    {
        self.selected = ids.into_iter().map(Into::into).collect();
    }

    /// Remove a component from the selection.
    pub fn deselect(&mut self, id: &str) -> bool {
        self.selected.remove(id)
    }

    /// Clear the selection.
    pub fn clear(&mut self) {
        self.selected.clear();
    }

    /// Check if a component is selected.
    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.contains(id)
    }

    /// Get all selected ids.
    pub fn selected(&self) -> &BTreeSet<ComponentId> {
        &self.selected
    }

    /// Number of selected ids.
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    /// Check if nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Get the hovered component id (if any).
    pub fn hovered(&self) -> Option<&str> {
        self.hovered.as_deref()
    }

    /// Set the hovered component.
    pub fn set_hovered(&mut self, id: Option<ComponentId>) {
        self.hovered = id;
    }

    /// Get the dragged component id (if any).
    pub fn dragged(&self) -> Option<&str> {
        self.dragged.as_deref()
    }

    /// Set the dragged component.
    pub fn set_dragged(&mut self, id: Option<ComponentId>) {
        self.dragged = id;
    }

    /// Forget a deleted component everywhere.
    pub fn remove(&mut self, id: &str) {
        self.selected.remove(id);
        if self.hovered.as_deref() == Some(id) {
            self.hovered = None;
        }
        if self.dragged.as_deref() == Some(id) {
            self.dragged = None;
        }
    }

    /// Keep only ids for which `live` returns true.
    pub fn retain(&mut self, live: impl Fn(&str) -> bool) {
        self.selected.retain(|id| live(id));
        if self.hovered.as_deref().is_some_and(|id| !live(id)) {
            self.hovered = None;
        }
        if self.dragged.as_deref().is_some_and(|id| !live(id)) {
            self.dragged = None;
        }
    }

    /// Reset selection, hover and drag.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
