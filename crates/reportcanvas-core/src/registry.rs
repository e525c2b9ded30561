//! Component registry: the placed components plus their lock/visibility overlays.

use crate::component::{ComponentId, ComponentPatch, ReportComponent};
use std::collections::BTreeSet;

/// Flat, insertion-ordered list of components with id-keyed lookup.
///
/// Locked and hidden ids are overlays: they never remove data from the
/// component list and are independent of the selection.
#[derive(Debug, Clone, Default)]
pub struct ComponentRegistry {
    /// Components in insertion order (not paint order).
    components: Vec<ReportComponent>,
    /// Components that refuse moves from `move_selected`.
    locked: BTreeSet<ComponentId>,
    /// Components that are not painted and cannot be selected.
    hidden: BTreeSet<ComponentId>,
}

impl ComponentRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a component.
    /// Returns false (and leaves the registry untouched) if the id is taken.
    pub fn add(&mut self, component: ReportComponent) -> bool {
        if self.contains(&component.id) {
            log::trace!("add ignored: id {} already present", component.id);
            return false;
        }
        self.components.push(component);
        true
    }

    /// Merge a partial update into a component.
    /// Returns false if no component has this id.
    pub fn update(&mut self, id: &str, patch: &ComponentPatch) -> bool {
        match self.get_mut(id) {
            Some(component) => {
                component.apply(patch);
                true
            }
            None => {
                log::trace!("update ignored: unknown id {id}");
                false
            }
        }
    }

    /// Remove a component and drop it from the overlays.
    pub fn remove(&mut self, id: &str) -> Option<ReportComponent> {
        let pos = self.components.iter().position(|c| c.id == id)?;
        self.locked.remove(id);
        self.hidden.remove(id);
        Some(self.components.remove(pos))
    }

    /// Remove several components, returning the ones that existed.
    pub fn remove_many<I, S>(&mut self, ids: I) -> Vec<ReportComponent>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        ids.into_iter()
            .filter_map(|id| self.remove(id.as_ref()))
            .collect()
    }

    /// Get a component by id.
    pub fn get(&self, id: &str) -> Option<&ReportComponent> {
        self.components.iter().find(|c| c.id == id)
    }

    /// Get a mutable reference to a component by id.
    pub fn get_mut(&mut self, id: &str) -> Option<&mut ReportComponent> {
        self.components.iter_mut().find(|c| c.id == id)
    }

    /// Check if a component exists.
    pub fn contains(&self, id: &str) -> bool {
        self.components.iter().any(|c| c.id == id)
    }

    /// Components in insertion order.
    pub fn components(&self) -> &[ReportComponent] {
        &self.components
    }

    /// Iterate over all component ids in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = &ComponentId> {
        self.components.iter().map(|c| &c.id)
    }

    /// Components sorted for painting (back to front).
    /// Equal z-indices keep insertion order.
    pub fn paint_order(&self) -> Vec<&ReportComponent> {
        let mut ordered: Vec<&ReportComponent> = self.components.iter().collect();
        ordered.sort_by_key(|c| c.z_index);
        ordered
    }

    /// Highest z-index, if any component exists.
    pub fn max_z_index(&self) -> Option<i64> {
        self.components.iter().map(|c| c.z_index).max()
    }

    /// Lowest z-index, if any component exists.
    pub fn min_z_index(&self) -> Option<i64> {
        self.components.iter().map(|c| c.z_index).min()
    }

    /// Replace every component at once (snapshot replay, document load).
    /// Overlay ids that no longer resolve are dropped.
    pub fn replace_all(&mut self, components: Vec<ReportComponent>) {
        self.components = components;
        let live: BTreeSet<&str> = self.components.iter().map(|c| c.id.as_str()).collect();
        self.locked.retain(|id| live.contains(id.as_str()));
        self.hidden.retain(|id| live.contains(id.as_str()));
    }

    /// Remove everything, including overlays.
    pub fn clear(&mut self) {
        self.components.clear();
        self.locked.clear();
        self.hidden.clear();
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Get the number of components.
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Mark a component locked. Unknown ids are ignored.
    pub fn lock(&mut self, id: &str) -> bool {
        self.contains(id) && self.locked.insert(id.to_string())
    }

    /// Clear the lock on a component.
    pub fn unlock(&mut self, id: &str) -> bool {
        self.locked.remove(id)
    }

    /// Check if a component is locked.
    pub fn is_locked(&self, id: &str) -> bool {
        self.locked.contains(id)
    }

    /// Locked component ids.
    pub fn locked(&self) -> &BTreeSet<ComponentId> {
        &self.locked
    }

    /// Mark a component hidden. Unknown ids are ignored.
    pub fn hide(&mut self, id: &str) -> bool {
        self.contains(id) && self.hidden.insert(id.to_string())
    }

    /// Make a hidden component visible again.
    pub fn show(&mut self, id: &str) -> bool {
        self.hidden.remove(id)
    }

    /// Check if a component is hidden.
    pub fn is_hidden(&self, id: &str) -> bool {
        self.hidden.contains(id)
    }

    /// Hidden component ids.
    pub fn hidden(&self) -> &BTreeSet<ComponentId> {
        &self.hidden
    }
}
