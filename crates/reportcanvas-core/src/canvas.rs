//! Report canvas document and editing state.

use crate::align::{self, Alignment, Distribution};
use crate::clipboard::Clipboard;
use crate::component::{ComponentId, ComponentPatch, ReportComponent};
use crate::config::EditorConfig;
use crate::error::{EditorError, EditorResult};
use crate::history::{History, Snapshot};
use crate::layering::{self, LayerOp};
use crate::properties::{CanvasProperties, SerializableColor};
use crate::registry::ComponentRegistry;
use crate::selection::Selection;
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Smallest width/height `resize_component` will set.
const MIN_COMPONENT_SIZE: f64 = 1.0;

/// A report document: the placed components plus canvas properties.
///
/// This is what the persistence layer saves and loads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasDocument {
    /// Components in insertion order.
    #[serde(default)]
    pub components: Vec<ReportComponent>,
    /// Canvas surface attributes.
    #[serde(default)]
    pub properties: CanvasProperties,
}

impl CanvasDocument {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serialize the document to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize a document from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// The report canvas editing engine.
///
/// Owns the document, the selection, the lock/visibility overlays, the
/// clipboard and the undo history. Every operation is synchronous and either
/// applies completely or is a silent no-op; nothing is shared between live
/// state, snapshots and the clipboard.
#[derive(Debug, Clone)]
pub struct ReportCanvas {
    /// Placed components and their overlays.
    registry: ComponentRegistry,
    /// Selection, hover and drag state.
    selection: Selection,
    /// Canvas surface attributes.
    properties: CanvasProperties,
    /// Copied components.
    clipboard: Clipboard,
    /// Undo/redo snapshots.
    history: History,
    /// Offsets and limits.
    config: EditorConfig,
}

impl Default for ReportCanvas {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportCanvas {
    /// Create an empty canvas with default settings.
    pub fn new() -> Self {
        Self::with_config(EditorConfig::default())
    }

    /// Create an empty canvas with the given settings.
    pub fn with_config(config: EditorConfig) -> Self {
        let mut properties = config.initial_properties.clone();
        properties.normalize();
        Self {
            registry: ComponentRegistry::new(),
            selection: Selection::new(),
            properties,
            clipboard: Clipboard::new(),
            history: History::new(config.max_history_size),
            config,
        }
    }

    /// Create a canvas showing an existing document.
    pub fn with_document(document: CanvasDocument) -> Self {
        let mut canvas = Self::new();
        canvas.load_document(document);
        canvas
    }

    /// Components in insertion order.
    pub fn components(&self) -> &[ReportComponent] {
        self.registry.components()
    }

    /// Components sorted back to front for painting.
    pub fn components_in_paint_order(&self) -> Vec<&ReportComponent> {
        self.registry.paint_order()
    }

    /// Get a component by id.
    pub fn component(&self, id: &str) -> Option<&ReportComponent> {
        self.registry.get(id)
    }

    /// Get a component by id, failing for unknown ids.
    pub fn require(&self, id: &str) -> EditorResult<&ReportComponent> {
        self.registry
            .get(id)
            .ok_or_else(|| EditorError::ComponentNotFound(id.to_string()))
    }

    /// Selected ids (may include ids that no longer resolve).
    pub fn selected_ids(&self) -> &BTreeSet<ComponentId> {
        self.selection.selected()
    }

    /// Selected components that exist, in insertion order.
    pub fn selected_components(&self) -> Vec<&ReportComponent> {
        self.registry
            .components()
            .iter()
            .filter(|c| self.selection.is_selected(c.id()))
            .collect()
    }

    /// Check if a component is selected.
    pub fn is_selected(&self, id: &str) -> bool {
        self.selection.is_selected(id)
    }

    /// Union of the selected components' bounds.
    pub fn selection_bounds(&self) -> Option<Rect> {
        self.selected_components()
            .iter()
            .map(|c| c.bounds())
            .reduce(|a, b| a.union(b))
    }

    /// Component under the pointer.
    pub fn hovered_id(&self) -> Option<&str> {
        self.selection.hovered()
    }

    /// Component being dragged.
    pub fn dragged_id(&self) -> Option<&str> {
        self.selection.dragged()
    }

    /// Locked component ids.
    pub fn locked_ids(&self) -> &BTreeSet<ComponentId> {
        self.registry.locked()
    }

    /// Hidden component ids.
    pub fn hidden_ids(&self) -> &BTreeSet<ComponentId> {
        self.registry.hidden()
    }

    /// Check if a component is locked.
    pub fn is_locked(&self, id: &str) -> bool {
        self.registry.is_locked(id)
    }

    /// Check if a component is hidden.
    pub fn is_hidden(&self, id: &str) -> bool {
        self.registry.is_hidden(id)
    }

    /// Canvas surface attributes.
    pub fn properties(&self) -> &CanvasProperties {
        &self.properties
    }

    /// Clipboard content.
    pub fn clipboard(&self) -> &[ReportComponent] {
        self.clipboard.items()
    }

    /// Retained snapshots, oldest first.
    pub fn history(&self) -> &[Snapshot] {
        self.history.snapshots()
    }

    /// Number of retained snapshots.
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// History cursor, `None` when history is empty.
    pub fn history_index(&self) -> Option<usize> {
        self.history.index()
    }

    /// Check if undo is available.
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Check if redo is available.
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Check if the canvas has no components.
    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    /// Get the number of components.
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    /// Deep copy of the document for persistence.
    pub fn document(&self) -> CanvasDocument {
        CanvasDocument {
            components: self.registry.components().to_vec(),
            properties: self.properties.clone(),
        }
    }

    /// Replace the whole document (components and canvas properties).
    ///
    /// Selection and overlays are reset. History restarts with a single
    /// "Load document" snapshot, so edits after a load can be undone back to
    /// the document as loaded.
    pub fn load_document(&mut self, document: CanvasDocument) {
        let CanvasDocument {
            components,
            mut properties,
        } = document;
        properties.normalize();

        let mut seen = BTreeSet::new();
        let components: Vec<ReportComponent> = components
            .into_iter()
            .filter(|c| {
                let fresh = seen.insert(c.id().to_string());
                if !fresh {
                    log::warn!("Dropping component with duplicate id {}", c.id());
                }
                fresh
            })
            .collect();

        log::info!("Loading document with {} component(s)", components.len());
        self.registry.clear();
        self.registry.replace_all(components);
        self.properties = properties;
        self.selection.reset();
        self.history.clear();
        self.save_snapshot("Load document");
    }

    /// Parse a JSON document and load it.
    pub fn load_json(&mut self, json: &str) -> EditorResult<()> {
        let document = CanvasDocument::from_json(json)?;
        self.load_document(document);
        Ok(())
    }

    /// Add a component, keeping its id and z-index.
    /// Returns false if a component with the same id already exists.
    pub fn add(&mut self, component: ReportComponent) -> bool {
        let id = component.id().to_string();
        if !self.registry.add(component) {
            return false;
        }
        log::debug!("Added component {id}");
        self.save_snapshot("Add component");
        true
    }

    /// Add a component stacked above everything else.
    pub fn add_component_on_top(&mut self, mut component: ReportComponent) -> bool {
        component.z_index = layering::next_top_z_index(&self.registry);
        self.add(component)
    }

    /// Merge fields into a component. Unknown ids are ignored.
    ///
    /// Not snapshotted: drags issue this repeatedly, the caller saves a
    /// snapshot when the gesture ends.
    pub fn update(&mut self, id: &str, patch: &ComponentPatch) -> bool {
        self.registry.update(id, patch)
    }

    /// Like [`update`](Self::update), but fails for unknown ids.
    pub fn try_update(&mut self, id: &str, patch: &ComponentPatch) -> EditorResult<()> {
        if self.registry.update(id, patch) {
            Ok(())
        } else {
            Err(EditorError::ComponentNotFound(id.to_string()))
        }
    }

    /// Move a component's top-left corner, snapping to the grid when enabled.
    /// Locked and unknown components are left alone. Not snapshotted.
    pub fn move_component_to(&mut self, id: &str, point: Point) -> bool {
        if self.registry.is_locked(id) {
            log::trace!("move ignored: {id} is locked");
            return false;
        }
        let point = self.properties.snap(point).point;
        self.registry.update(id, &ComponentPatch::position(point.x, point.y))
    }

    /// Resize a component (sizes floored at 1). Locked and unknown components
    /// are left alone. Not snapshotted.
    pub fn resize_component(&mut self, id: &str, width: f64, height: f64) -> bool {
        if self.registry.is_locked(id) {
            log::trace!("resize ignored: {id} is locked");
            return false;
        }
        let patch = ComponentPatch::size(width.max(MIN_COMPONENT_SIZE), height.max(MIN_COMPONENT_SIZE));
        self.registry.update(id, &patch)
    }

    /// Translate every selected, unlocked component by `delta`.
    pub fn move_selected(&mut self, delta: Vec2) -> bool {
        if delta == Vec2::ZERO {
            return false;
        }
        let mut moved = 0;
        for id in self.selection.selected() {
            if self.registry.is_locked(id) {
                continue;
            }
            if let Some(component) = self.registry.get_mut(id) {
                component.translate(delta);
                moved += 1;
            }
        }
        if moved == 0 {
            return false;
        }
        log::debug!("Moved {moved} component(s) by ({}, {})", delta.x, delta.y);
        self.save_snapshot("Move components");
        true
    }

    /// Delete a component and forget it everywhere.
    pub fn delete(&mut self, id: &str) -> bool {
        self.delete_many([id]) == 1
    }

    /// Like [`delete`](Self::delete), but fails for unknown ids.
    pub fn try_delete(&mut self, id: &str) -> EditorResult<()> {
        if self.delete(id) {
            Ok(())
        } else {
            Err(EditorError::ComponentNotFound(id.to_string()))
        }
    }

    /// Delete several components. Returns how many existed.
    pub fn delete_many<I, S>(&mut self, ids: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let removed = self.remove_components(ids);
        if removed == 0 {
            return 0;
        }
        log::debug!("Deleted {removed} component(s)");
        self.save_snapshot(if removed == 1 {
            "Delete component"
        } else {
            "Delete components"
        });
        removed
    }

    /// Delete the selected components.
    pub fn delete_selected(&mut self) -> usize {
        let ids: Vec<ComponentId> = self.selection.selected().iter().cloned().collect();
        self.delete_many(ids)
    }

    /// Remove components from the registry and the selection state.
    fn remove_components<I, S>(&mut self, ids: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let removed = self.registry.remove_many(ids);
        for component in &removed {
            self.selection.remove(component.id());
        }
        removed.len()
    }

    /// Duplicate a component; the copy becomes the selection.
    pub fn duplicate(&mut self, id: &str) -> Option<ComponentId> {
        self.duplicate_many([id]).into_iter().next()
    }

    /// Duplicate several components, offset by the configured translation.
    /// The selection becomes exactly the new copies. Returns their ids.
    pub fn duplicate_many<I, S>(&mut self, ids: I) -> Vec<ComponentId>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let wanted: BTreeSet<ComponentId> = ids.into_iter().map(|id| id.as_ref().to_string()).collect();
        let copies: Vec<ReportComponent> = self
            .registry
            .components()
            .iter()
            .filter(|c| wanted.contains(c.id()))
            .map(|c| c.duplicate_with_offset(self.config.duplicate_offset))
            .collect();
        if copies.is_empty() {
            log::trace!("duplicate ignored: no matching components");
            return Vec::new();
        }

        let new_ids = self.insert_and_select(copies);
        log::debug!("Duplicated {} component(s)", new_ids.len());
        self.save_snapshot(if new_ids.len() == 1 {
            "Duplicate component"
        } else {
            "Duplicate components"
        });
        new_ids
    }

    /// Append fresh components and make them the selection.
    fn insert_and_select(&mut self, components: Vec<ReportComponent>) -> Vec<ComponentId> {
        let mut new_ids = Vec::with_capacity(components.len());
        for component in components {
            let id = component.id().to_string();
            if self.registry.add(component) {
                new_ids.push(id);
            }
        }
        self.selection.select_many(new_ids.iter().cloned());
        new_ids
    }

    /// Lock a component.
    pub fn lock(&mut self, id: &str) -> bool {
        self.registry.lock(id)
    }

    /// Unlock a component.
    pub fn unlock(&mut self, id: &str) -> bool {
        self.registry.unlock(id)
    }

    /// Toggle a component's lock. Returns the new state.
    pub fn toggle_lock(&mut self, id: &str) -> bool {
        if self.registry.is_locked(id) {
            self.registry.unlock(id);
            false
        } else {
            self.registry.lock(id)
        }
    }

    /// Hide a component; hidden components leave the selection.
    pub fn hide(&mut self, id: &str) -> bool {
        if !self.registry.hide(id) {
            return false;
        }
        self.selection.deselect(id);
        true
    }

    /// Show a hidden component.
    pub fn show(&mut self, id: &str) -> bool {
        self.registry.show(id)
    }

    /// Toggle a component's visibility. Returns true if it is now visible.
    pub fn toggle_visibility(&mut self, id: &str) -> bool {
        if self.registry.is_hidden(id) {
            self.registry.show(id)
        } else {
            self.hide(id);
            false
        }
    }

    /// Select a component; with `multi` the id is toggled instead.
    pub fn select(&mut self, id: &str, multi: bool) {
        self.selection.select(id, multi);
    }

    /// Replace the selection.
    pub fn select_many<I, S>(&mut self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<ComponentId>,
    {
        self.selection.select_many(ids);
    }

    /// Select every visible component.
    pub fn select_all(&mut self) {
        let visible: Vec<ComponentId> = self
            .registry
            .ids()
            .filter(|id| !self.registry.is_hidden(id))
            .cloned()
            .collect();
        self.selection.select_many(visible);
    }

    /// Select every visible component between two components (inclusive),
    /// in insertion order. Unknown ids leave the selection untouched.
    pub fn select_range(&mut self, from: &str, to: &str) -> bool {
        let ids: Vec<&ComponentId> = self.registry.ids().collect();
        let (Some(a), Some(b)) = (
            ids.iter().position(|id| *id == from),
            ids.iter().position(|id| *id == to),
        ) else {
            log::trace!("range select ignored: unknown endpoint");
            return false;
        };
        let range: Vec<ComponentId> = ids[a.min(b)..=a.max(b)]
            .iter()
            .filter(|id| !self.registry.is_hidden(id))
            .map(|id| (*id).clone())
            .collect();
        self.selection.select_many(range);
        true
    }

    /// Clear the selection.
    pub fn deselect_all(&mut self) {
        self.selection.clear();
    }

    /// Set the hovered component.
    pub fn set_hovered(&mut self, id: Option<ComponentId>) {
        self.selection.set_hovered(id);
    }

    /// Set the dragged component.
    pub fn set_dragged(&mut self, id: Option<ComponentId>) {
        self.selection.set_dragged(id);
    }

    fn layer(&mut self, id: &str, op: LayerOp) -> bool {
        if !layering::apply(&mut self.registry, id, op) {
            return false;
        }
        log::debug!("{} applied to {id}", op.label());
        self.save_snapshot(op.label());
        true
    }

    /// Place a component above all others.
    pub fn bring_to_front(&mut self, id: &str) -> bool {
        self.layer(id, LayerOp::BringToFront)
    }

    /// Place a component below all others.
    pub fn send_to_back(&mut self, id: &str) -> bool {
        self.layer(id, LayerOp::SendToBack)
    }

    /// Move a component one layer up.
    pub fn bring_forward(&mut self, id: &str) -> bool {
        self.layer(id, LayerOp::BringForward)
    }

    /// Move a component one layer down (never below 1).
    pub fn send_backward(&mut self, id: &str) -> bool {
        self.layer(id, LayerOp::SendBackward)
    }

    fn align(&mut self, mode: Alignment) -> bool {
        if !align::align(&mut self.registry, self.selection.selected(), mode) {
            return false;
        }
        log::debug!("{} applied to {} component(s)", mode.label(), self.selection.len());
        self.save_snapshot(mode.label());
        true
    }

    fn distribute(&mut self, axis: Distribution) -> bool {
        if !align::distribute(&mut self.registry, self.selection.selected(), axis) {
            return false;
        }
        log::debug!("{} applied to {} component(s)", axis.label(), self.selection.len());
        self.save_snapshot(axis.label());
        true
    }

    /// Line up left edges on the leftmost one.
    pub fn align_left(&mut self) -> bool {
        self.align(Alignment::Left)
    }

    /// Line up right edges on the rightmost one.
    pub fn align_right(&mut self) -> bool {
        self.align(Alignment::Right)
    }

    /// Line up top edges on the topmost one.
    pub fn align_top(&mut self) -> bool {
        self.align(Alignment::Top)
    }

    /// Line up bottom edges on the lowest one.
    pub fn align_bottom(&mut self) -> bool {
        self.align(Alignment::Bottom)
    }

    /// Center on a shared horizontal axis (adjusts y).
    pub fn align_center_horizontal(&mut self) -> bool {
        self.align(Alignment::CenterHorizontal)
    }

    /// Center on a shared vertical axis (adjusts x).
    pub fn align_center_vertical(&mut self) -> bool {
        self.align(Alignment::CenterVertical)
    }

    /// Space the selection evenly along x.
    pub fn distribute_horizontal(&mut self) -> bool {
        self.distribute(Distribution::Horizontal)
    }

    /// Space the selection evenly along y.
    pub fn distribute_vertical(&mut self) -> bool {
        self.distribute(Distribution::Vertical)
    }

    /// Copy the selected components. Returns how many were copied.
    pub fn copy(&mut self) -> usize {
        let copied = self.clipboard.copy_from(&self.registry, self.selection.selected());
        log::debug!("Copied {copied} component(s)");
        copied
    }

    /// Copy the selected components, then delete them.
    pub fn cut(&mut self) -> usize {
        if self.copy() == 0 {
            return 0;
        }
        let ids: Vec<ComponentId> = self.clipboard.items().iter().map(|c| c.id().to_string()).collect();
        let removed = self.remove_components(ids);
        log::debug!("Cut {removed} component(s)");
        self.save_snapshot("Cut components");
        removed
    }

    /// Paste fresh copies of the clipboard; they become the selection.
    pub fn paste(&mut self) -> Vec<ComponentId> {
        if self.clipboard.is_empty() {
            log::trace!("paste ignored: clipboard empty");
            return Vec::new();
        }
        let copies = self.clipboard.paste_items(self.config.paste_offset);
        let new_ids = self.insert_and_select(copies);
        log::debug!("Pasted {} component(s)", new_ids.len());
        self.save_snapshot("Paste components");
        new_ids
    }

    /// Capture the current document as a new history entry.
    pub fn save_snapshot(&mut self, description: &str) {
        let snapshot = Snapshot::capture(
            self.registry.components(),
            self.properties.width,
            self.properties.height,
            self.properties.background,
            description,
        );
        self.history.push(snapshot);
        log::debug!(
            "Snapshot '{description}' saved ({} of {})",
            self.history.len(),
            self.history.max_size()
        );
    }

    /// Step back one snapshot. Returns false at the start of history.
    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self.history.undo().cloned() else {
            log::trace!("undo ignored: at start of history");
            return false;
        };
        log::debug!("Undo to '{}'", snapshot.description);
        self.restore(snapshot);
        true
    }

    /// Step forward one snapshot. Returns false at the tail of history.
    pub fn redo(&mut self) -> bool {
        let Some(snapshot) = self.history.redo().cloned() else {
            log::trace!("redo ignored: at end of history");
            return false;
        };
        log::debug!("Redo to '{}'", snapshot.description);
        self.restore(snapshot);
        true
    }

    /// Drop all history. The document is untouched.
    pub fn clear_history(&mut self) {
        log::info!("Clearing {} snapshot(s)", self.history.len());
        self.history.clear();
    }

    /// Replace live document state with a snapshot's copy.
    fn restore(&mut self, snapshot: Snapshot) {
        self.registry.replace_all(snapshot.components);
        self.properties.set_size(snapshot.canvas_width, snapshot.canvas_height);
        self.properties.background = snapshot.canvas_background;
        let registry = &self.registry;
        self.selection.retain(|id| registry.contains(id));
    }

    /// Set the canvas size.
    pub fn set_canvas_size(&mut self, width: f64, height: f64) -> bool {
        let before = self.properties.size();
        self.properties.set_size(width, height);
        if self.properties.size() == before {
            return false;
        }
        self.save_snapshot("Resize canvas");
        true
    }

    /// Set the canvas background.
    pub fn set_background(&mut self, background: SerializableColor) -> bool {
        if self.properties.background == background {
            return false;
        }
        self.properties.background = background;
        self.save_snapshot("Change background");
        true
    }

    /// Set the canvas background from a CSS hex string. Unparseable strings
    /// give white.
    pub fn set_background_css(&mut self, color: &str) -> bool {
        self.set_background(SerializableColor::from_css(color))
    }

    /// Set the zoom factor (clamped to [0.1, 3.0]).
    pub fn set_scale(&mut self, scale: f64) {
        self.properties.set_scale(scale);
    }

    /// Zoom in one step.
    pub fn zoom_in(&mut self) {
        self.properties.zoom_in();
    }

    /// Zoom out one step.
    pub fn zoom_out(&mut self) {
        self.properties.zoom_out();
    }

    /// Reset zoom to 100%.
    pub fn reset_zoom(&mut self) {
        self.properties.reset_zoom();
    }

    /// Set the grid spacing (clamped to [5, 50]).
    pub fn set_grid_size(&mut self, grid_size: f64) {
        self.properties.set_grid_size(grid_size);
    }

    /// Toggle grid painting. Returns the new state.
    pub fn toggle_grid(&mut self) -> bool {
        self.properties.show_grid = !self.properties.show_grid;
        self.properties.show_grid
    }

    /// Toggle grid snapping. Returns the new state.
    pub fn toggle_snap(&mut self) -> bool {
        self.properties.snap_to_grid = !self.properties.snap_to_grid;
        self.properties.snap_to_grid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn component(id: &str, x: f64, width: f64) -> ReportComponent {
        ReportComponent::with_id(id, "chart", x, 0.0, width, 10.0)
    }

    fn canvas_with(components: Vec<ReportComponent>) -> ReportCanvas {
        let mut canvas = ReportCanvas::new();
        for c in components {
            canvas.add(c);
        }
        canvas
    }

    fn x(canvas: &ReportCanvas, id: &str) -> f64 {
        canvas.component(id).unwrap().x
    }

    #[test]
    fn test_canvas_creation() {
        let canvas = ReportCanvas::new();
        assert!(canvas.is_empty());
        assert_eq!(canvas.history_index(), None);
        assert_eq!(canvas.history_len(), 0);
        assert!(canvas.selected_ids().is_empty());
    }

    #[test]
    fn test_add_snapshots() {
        let mut canvas = ReportCanvas::new();
        assert!(canvas.add(component("a", 0.0, 10.0)));
        assert!(!canvas.add(component("a", 5.0, 10.0)));
        assert_eq!(canvas.len(), 1);
        assert_eq!(canvas.history_len(), 1);
        assert_eq!(canvas.history()[0].description, "Add component");
    }

    #[test]
    fn test_add_component_on_top() {
        let mut canvas = canvas_with(vec![component("a", 0.0, 10.0).with_z_index(7)]);
        canvas.add_component_on_top(component("b", 0.0, 10.0));
        assert_eq!(canvas.component("b").unwrap().z_index, 8);
        let order: Vec<&str> = canvas.components_in_paint_order().iter().map(|c| c.id()).collect();
        assert_eq!(order, vec!["a", "b"]);
    }

    #[test]
    fn test_update_unknown_is_noop() {
        let mut canvas = canvas_with(vec![component("a", 0.0, 10.0)]);
        let before = canvas.document();
        assert!(!canvas.update("ghost", &ComponentPatch::position(1.0, 1.0)));
        assert_eq!(canvas.document(), before);
        assert!(matches!(
            canvas.try_update("ghost", &ComponentPatch::position(1.0, 1.0)),
            Err(EditorError::ComponentNotFound(id)) if id == "ghost"
        ));
        assert!(canvas.try_update("a", &ComponentPatch::position(1.0, 1.0)).is_ok());
        assert!((x(&canvas, "a") - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_update_does_not_snapshot() {
        let mut canvas = canvas_with(vec![component("a", 0.0, 10.0)]);
        canvas.update("a", &ComponentPatch::position(3.0, 4.0));
        assert_eq!(canvas.history_len(), 1);
    }

    #[test]
    fn test_deletion_cascade() {
        let mut canvas = canvas_with(vec![component("a", 0.0, 10.0), component("b", 20.0, 10.0)]);
        canvas.select_many(["a", "b"]);
        canvas.lock("a");
        // hiding drops the selection, so reselect afterwards
        canvas.hide("a");
        canvas.select("a", true);
        canvas.set_hovered(Some("a".to_string()));
        assert!(canvas.is_selected("a") && canvas.is_locked("a") && canvas.is_hidden("a"));

        assert!(canvas.delete("a"));
        assert!(!canvas.is_selected("a"));
        assert!(!canvas.is_locked("a"));
        assert!(!canvas.is_hidden("a"));
        assert_eq!(canvas.hovered_id(), None);
        assert!(canvas.is_selected("b"));
    }

    #[test]
    fn test_delete_unknown_is_noop() {
        let mut canvas = canvas_with(vec![component("a", 0.0, 10.0)]);
        assert!(!canvas.delete("ghost"));
        assert_eq!(canvas.history_len(), 1);
        assert!(canvas.try_delete("ghost").is_err());
        assert!(canvas.try_delete("a").is_ok());
        assert!(canvas.is_empty());
    }

    #[test]
    fn test_delete_many_and_selected() {
        let mut canvas = canvas_with(vec![
            component("a", 0.0, 10.0),
            component("b", 20.0, 10.0),
            component("c", 40.0, 10.0),
        ]);
        assert_eq!(canvas.delete_many(["a", "ghost"]), 1);
        canvas.select_many(["b", "c"]);
        assert_eq!(canvas.delete_selected(), 2);
        assert!(canvas.is_empty());
        assert!(canvas.selected_ids().is_empty());
    }

    #[test]
    fn test_duplicate_selects_copies() {
        let mut canvas = canvas_with(vec![
            component("a", 0.0, 10.0).with_props(json!({"title": "Revenue"})),
            component("b", 50.0, 10.0),
        ]);
        canvas.select("b", false);

        let new_ids = canvas.duplicate_many(["a", "b", "ghost"]);
        assert_eq!(new_ids.len(), 2);
        assert_eq!(canvas.len(), 4);
        let selected: BTreeSet<ComponentId> = new_ids.iter().cloned().collect();
        assert_eq!(canvas.selected_ids(), &selected);

        let copy = canvas.component(&new_ids[0]).unwrap();
        assert!((copy.x - 20.0).abs() < f64::EPSILON);
        assert!((copy.y - 20.0).abs() < f64::EPSILON);
        assert_eq!(copy.props, json!({"title": "Revenue"}));
    }

    #[test]
    fn test_duplicate_unknown_is_noop() {
        let mut canvas = canvas_with(vec![component("a", 0.0, 10.0)]);
        canvas.select("a", false);
        assert!(canvas.duplicate("ghost").is_none());
        assert!(canvas.is_selected("a"));
        assert_eq!(canvas.history_len(), 1);
    }

    #[test]
    fn test_select_all_skips_hidden() {
        let mut canvas = canvas_with(vec![
            component("a", 0.0, 10.0),
            component("b", 20.0, 10.0),
            component("c", 40.0, 10.0),
        ]);
        canvas.hide("b");
        canvas.select_all();
        assert!(canvas.is_selected("a"));
        assert!(!canvas.is_selected("b"));
        assert!(canvas.is_selected("c"));

        canvas.deselect_all();
        assert!(canvas.selected_ids().is_empty());
    }

    #[test]
    fn test_select_range() {
        let mut canvas = canvas_with(vec![
            component("a", 0.0, 10.0),
            component("b", 20.0, 10.0),
            component("c", 40.0, 10.0),
            component("d", 60.0, 10.0),
        ]);
        canvas.hide("c");
        assert!(canvas.select_range("d", "b"));
        let expected: BTreeSet<ComponentId> = ["b", "d"].iter().map(|s| s.to_string()).collect();
        assert_eq!(canvas.selected_ids(), &expected);

        assert!(!canvas.select_range("a", "ghost"));
        assert_eq!(canvas.selected_ids(), &expected);
    }

    #[test]
    fn test_select_unknown_is_accepted() {
        let mut canvas = canvas_with(vec![component("a", 0.0, 10.0)]);
        canvas.select("ghost", false);
        canvas.select("a", true);
        assert_eq!(canvas.selected_ids().len(), 2);
        assert_eq!(canvas.selected_components().len(), 1);
    }

    #[test]
    fn test_toggle_overlays() {
        let mut canvas = canvas_with(vec![component("a", 0.0, 10.0)]);
        canvas.select("a", false);
        assert!(canvas.toggle_lock("a"));
        assert!(!canvas.toggle_lock("a"));
        assert!(!canvas.toggle_visibility("a"));
        assert!(!canvas.is_selected("a"));
        assert!(canvas.toggle_visibility("a"));
        assert!(!canvas.toggle_lock("ghost"));
        assert_eq!(canvas.history_len(), 1);
    }

    #[test]
    fn test_move_selected_skips_locked() {
        let mut canvas = canvas_with(vec![component("a", 0.0, 10.0), component("b", 20.0, 10.0)]);
        canvas.select_many(["a", "b"]);
        canvas.lock("a");
        assert!(canvas.move_selected(Vec2::new(5.0, 0.0)));
        assert!((x(&canvas, "a") - 0.0).abs() < f64::EPSILON);
        assert!((x(&canvas, "b") - 25.0).abs() < f64::EPSILON);

        canvas.select("a", false);
        assert!(!canvas.move_selected(Vec2::new(5.0, 0.0)));
        assert!(!canvas.move_selected(Vec2::ZERO));
    }

    #[test]
    fn test_move_component_to_snaps() {
        let mut canvas = canvas_with(vec![component("a", 0.0, 10.0)]);
        canvas.set_grid_size(20.0);
        canvas.move_component_to("a", Point::new(23.0, 37.0));
        assert!((x(&canvas, "a") - 23.0).abs() < f64::EPSILON);

        canvas.toggle_snap();
        canvas.move_component_to("a", Point::new(23.0, 37.0));
        let a = canvas.component("a").unwrap();
        assert!((a.x - 20.0).abs() < f64::EPSILON);
        assert!((a.y - 40.0).abs() < f64::EPSILON);

        canvas.lock("a");
        assert!(!canvas.move_component_to("a", Point::new(100.0, 100.0)));
    }

    #[test]
    fn test_resize_component() {
        let mut canvas = canvas_with(vec![component("a", 0.0, 10.0)]);
        assert!(canvas.resize_component("a", -5.0, 30.0));
        let a = canvas.component("a").unwrap();
        assert!((a.width - 1.0).abs() < f64::EPSILON);
        assert!((a.height - 30.0).abs() < f64::EPSILON);
        assert!(!canvas.resize_component("ghost", 5.0, 5.0));
    }

    #[test]
    fn test_layering_snapshots() {
        let mut canvas = canvas_with(vec![
            component("a", 0.0, 10.0).with_z_index(1),
            component("b", 0.0, 10.0).with_z_index(2),
        ]);
        assert!(canvas.bring_to_front("a"));
        assert_eq!(canvas.component("a").unwrap().z_index, 3);
        assert!(canvas.send_to_back("a"));
        assert_eq!(canvas.component("a").unwrap().z_index, 1);
        assert!(!canvas.send_backward("a"));
        assert!(canvas.bring_forward("a"));
        assert!(!canvas.bring_to_front("ghost"));
        assert_eq!(canvas.history_len(), 5);
        assert_eq!(canvas.history()[4].description, "Bring forward");
    }

    #[test]
    fn test_align_left_scenario() {
        let mut canvas = canvas_with(vec![
            component("a", 0.0, 10.0),
            component("b", 50.0, 10.0),
            component("c", 100.0, 10.0),
        ]);
        canvas.select_all();
        assert!(canvas.align_left());
        for id in ["a", "b", "c"] {
            assert!((x(&canvas, id) - 0.0).abs() < f64::EPSILON);
        }
        let snapshots = canvas.history_len();
        assert!(!canvas.align_left());
        assert_eq!(canvas.history_len(), snapshots);
    }

    #[test]
    fn test_distribute_keeps_endpoints() {
        let mut canvas = canvas_with(vec![
            component("a", 0.0, 10.0),
            component("b", 30.0, 10.0),
            component("c", 100.0, 10.0),
        ]);
        canvas.select_all();
        assert!(canvas.distribute_horizontal());
        assert!((x(&canvas, "a") - 0.0).abs() < f64::EPSILON);
        assert!((x(&canvas, "b") - 50.0).abs() < f64::EPSILON);
        assert!((x(&canvas, "c") - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_alignment_below_threshold_is_noop() {
        let mut canvas = canvas_with(vec![component("a", 0.0, 10.0), component("b", 30.0, 10.0)]);
        canvas.select("b", false);
        assert!(!canvas.align_right());
        assert!(!canvas.align_center_vertical());
        canvas.select("a", true);
        assert!(!canvas.distribute_vertical());
        assert_eq!(canvas.history_len(), 2);
    }

    #[test]
    fn test_copy_delete_paste_scenario() {
        let mut canvas = canvas_with(vec![
            component("a", 0.0, 10.0),
            component("b", 50.0, 10.0),
        ]);
        canvas.select_many(["a", "b"]);
        assert_eq!(canvas.copy(), 2);
        canvas.delete_many(["a", "b"]);
        assert!(canvas.is_empty());

        let pasted = canvas.paste();
        assert_eq!(pasted.len(), 2);
        assert!(!pasted.contains(&"a".to_string()));
        let selected: BTreeSet<ComponentId> = pasted.iter().cloned().collect();
        assert_eq!(canvas.selected_ids(), &selected);

        let xs: Vec<f64> = canvas.components().iter().map(|c| c.x).collect();
        assert_eq!(xs, vec![20.0, 70.0]);
        assert!(canvas.components().iter().all(|c| (c.y - 20.0).abs() < f64::EPSILON));
    }

    #[test]
    fn test_paste_twice_not_cumulative() {
        let mut canvas = canvas_with(vec![component("a", 0.0, 10.0)]);
        canvas.select("a", false);
        canvas.copy();
        let first = canvas.paste();
        let second = canvas.paste();
        assert_ne!(first, second);
        assert!((x(&canvas, &first[0]) - 20.0).abs() < f64::EPSILON);
        assert!((x(&canvas, &second[0]) - 20.0).abs() < f64::EPSILON);
        assert_eq!(canvas.len(), 3);
    }

    #[test]
    fn test_paste_empty_clipboard() {
        let mut canvas = ReportCanvas::new();
        assert!(canvas.paste().is_empty());
        assert_eq!(canvas.history_len(), 0);
    }

    #[test]
    fn test_cut() {
        let mut canvas = canvas_with(vec![component("a", 0.0, 10.0), component("b", 50.0, 10.0)]);
        canvas.select_many(["a", "ghost"]);
        canvas.lock("a");
        assert_eq!(canvas.cut(), 1);
        assert!(canvas.component("a").is_none());
        assert!(!canvas.is_locked("a"));
        assert!(!canvas.is_selected("a"));
        assert_eq!(canvas.clipboard().len(), 1);
        assert_eq!(canvas.history().last().unwrap().description, "Cut components");
    }

    #[test]
    fn test_clipboard_survives_undo() {
        let mut canvas = canvas_with(vec![component("a", 0.0, 10.0)]);
        canvas.select("a", false);
        canvas.copy();
        canvas.update("a", &ComponentPatch::position(500.0, 500.0));
        canvas.save_snapshot("Drag");
        canvas.undo();
        assert_eq!(canvas.clipboard().len(), 1);
        assert!((canvas.clipboard()[0].x - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_undo_redo_round_trip() {
        let mut canvas = ReportCanvas::new();
        let n: u32 = 10;
        for i in 0..n {
            canvas.add(component(&format!("c{i}"), f64::from(i) * 15.0, 10.0));
        }
        let after_edits = canvas.document();

        for _ in 0..n {
            canvas.undo();
        }
        assert_eq!(canvas.history_index(), Some(0));
        assert_eq!(canvas.len(), 1);

        for _ in 0..n {
            canvas.redo();
        }
        assert_eq!(canvas.document(), after_edits);
    }

    #[test]
    fn test_branch_truncation() {
        let mut canvas = canvas_with(vec![component("a", 0.0, 10.0), component("b", 20.0, 10.0)]);
        assert!(canvas.undo());
        assert!(canvas.component("b").is_none());
        canvas.add(component("c", 40.0, 10.0));
        assert!(!canvas.redo());
        assert!(canvas.component("b").is_none());
        assert!(canvas.component("c").is_some());
    }

    #[test]
    fn test_history_bound() {
        let mut canvas = ReportCanvas::new();
        let k = 7;
        for i in 0..(50 + k) {
            canvas.add(component(&format!("c{i}"), 0.0, 10.0));
        }
        assert_eq!(canvas.history_len(), 50);
        assert_eq!(canvas.history_index(), Some(49));

        while canvas.undo() {}
        // Oldest reachable state holds the first k + 1 components
        assert_eq!(canvas.len(), k + 1);
    }

    #[test]
    fn test_custom_history_size() {
        let config = EditorConfig {
            max_history_size: 3,
            ..EditorConfig::default()
        };
        let mut canvas = ReportCanvas::with_config(config);
        for i in 0..5 {
            canvas.add(component(&format!("c{i}"), 0.0, 10.0));
        }
        assert_eq!(canvas.history_len(), 3);
    }

    #[test]
    fn test_undo_at_boundaries() {
        let mut canvas = ReportCanvas::new();
        assert!(!canvas.undo());
        assert!(!canvas.redo());
        canvas.add(component("a", 0.0, 10.0));
        assert!(!canvas.undo());
        assert!(!canvas.redo());
        assert_eq!(canvas.len(), 1);
    }

    #[test]
    fn test_undo_prunes_selection() {
        let mut canvas = canvas_with(vec![component("a", 0.0, 10.0)]);
        canvas.add(component("b", 20.0, 10.0));
        canvas.select("b", false);
        canvas.lock("b");
        canvas.set_dragged(Some("b".to_string()));

        canvas.undo();
        assert!(canvas.selected_ids().is_empty());
        assert!(canvas.locked_ids().is_empty());
        assert_eq!(canvas.dragged_id(), None);
    }

    #[test]
    fn test_snapshots_are_isolated() {
        let mut canvas = canvas_with(vec![component("a", 0.0, 10.0).with_props(json!({"k": 1}))]);
        canvas.update("a", &ComponentPatch::props(json!({"k": 2})));
        assert_eq!(canvas.history()[0].components[0].props, json!({"k": 1}));

        canvas.save_snapshot("Edit props");
        canvas.undo();
        assert_eq!(canvas.component("a").unwrap().props, json!({"k": 1}));
        canvas.update("a", &ComponentPatch::props(json!({"k": 3})));
        canvas.redo();
        assert_eq!(canvas.component("a").unwrap().props, json!({"k": 2}));
    }

    #[test]
    fn test_clear_history_keeps_document() {
        let mut canvas = canvas_with(vec![component("a", 0.0, 10.0)]);
        canvas.clear_history();
        assert_eq!(canvas.history_index(), None);
        assert_eq!(canvas.len(), 1);
        assert!(!canvas.undo());
    }

    #[test]
    fn test_canvas_size_and_background_undo() {
        let mut canvas = ReportCanvas::new();
        assert!(canvas.set_canvas_size(800.0, 600.0));
        assert!(!canvas.set_canvas_size(800.0, 600.0));
        let gray = SerializableColor::new(0xee, 0xee, 0xee, 255);
        assert!(canvas.set_background(gray));

        assert!(canvas.undo());
        assert_eq!(canvas.properties().background, SerializableColor::white());
        assert!((canvas.properties().width - 800.0).abs() < f64::EPSILON);
        assert!(canvas.redo());
        assert_eq!(canvas.properties().background, gray);
    }

    #[test]
    fn test_view_properties_not_snapshotted() {
        let mut canvas = ReportCanvas::new();
        canvas.set_scale(5.0);
        canvas.zoom_out();
        canvas.set_grid_size(0.0);
        assert!(!canvas.toggle_grid());
        assert!(canvas.toggle_snap());
        assert!((canvas.properties().scale - 2.9).abs() < 1e-10);
        assert!((canvas.properties().grid_size - 5.0).abs() < f64::EPSILON);
        canvas.reset_zoom();
        canvas.zoom_in();
        assert!((canvas.properties().scale - 1.1).abs() < 1e-10);
        assert_eq!(canvas.history_len(), 0);
    }

    #[test]
    fn test_selection_bounds() {
        let mut canvas = canvas_with(vec![
            component("a", 0.0, 10.0),
            ReportComponent::with_id("b", "text", 40.0, 30.0, 20.0, 5.0),
        ]);
        assert!(canvas.selection_bounds().is_none());
        canvas.select_all();
        let bounds = canvas.selection_bounds().unwrap();
        assert_eq!(bounds, Rect::new(0.0, 0.0, 60.0, 35.0));
    }

    #[test]
    fn test_document_roundtrip_and_load() {
        let mut canvas = canvas_with(vec![component("a", 0.0, 10.0)]);
        canvas.select("a", false);
        let json = canvas.document().to_json().unwrap();

        let mut other = ReportCanvas::new();
        other.add(component("z", 0.0, 10.0));
        other.load_json(&json).unwrap();
        assert_eq!(other.document(), canvas.document());
        assert!(other.selected_ids().is_empty());
        assert_eq!(other.history_len(), 1);
        assert_eq!(other.history_index(), Some(0));
        assert!(!other.can_undo());
        assert!(other.load_json("{not json").is_err());
    }

    #[test]
    fn test_undo_back_to_loaded_document() {
        let mut canvas = ReportCanvas::new();
        canvas.load_document(CanvasDocument {
            components: vec![component("a", 0.0, 10.0)],
            properties: CanvasProperties::default(),
        });
        assert!(canvas.delete("a"));
        assert!(canvas.is_empty());

        assert!(canvas.undo());
        assert!(canvas.component("a").is_some());
        assert_eq!(canvas.history_index(), Some(0));
        assert!(!canvas.undo());
        assert!(canvas.redo());
        assert!(canvas.is_empty());
    }

    #[test]
    fn test_layering_at_extreme_z_index() {
        let mut canvas = ReportCanvas::new();
        let json = format!(
            r#"{{"components": [
                {{"id": "a", "type": "chart", "x": 0, "y": 0, "width": 10, "height": 10, "zIndex": {}}},
                {{"id": "b", "type": "chart", "x": 0, "y": 0, "width": 10, "height": 10, "zIndex": {}}}
            ]}}"#,
            i64::MAX,
            i64::MIN
        );
        canvas.load_json(&json).unwrap();

        assert!(!canvas.bring_to_front("a"));
        assert!(!canvas.bring_forward("a"));
        assert!(!canvas.send_to_back("b"));
        assert_eq!(canvas.component("a").unwrap().z_index, i64::MAX);
        assert_eq!(canvas.component("b").unwrap().z_index, i64::MIN);
        assert_eq!(canvas.history_len(), 1);
    }

    #[test]
    fn test_background_from_css() {
        let mut canvas = ReportCanvas::new();
        assert!(canvas.set_background_css("#336699"));
        assert_eq!(canvas.properties().background, SerializableColor::new(0x33, 0x66, 0x99, 255));
        assert!(canvas.set_background_css("red"));
        assert_eq!(canvas.properties().background, SerializableColor::white());
        assert!(!canvas.set_background_css("not a color"));
        assert_eq!(canvas.history_len(), 2);
    }

    #[test]
    fn test_load_document_normalizes() {
        let document = CanvasDocument {
            components: vec![component("a", 0.0, 10.0), component("a", 5.0, 10.0)],
            properties: CanvasProperties {
                scale: 9.0,
                grid_size: 1.0,
                ..CanvasProperties::default()
            },
        };
        let canvas = ReportCanvas::with_document(document);
        assert_eq!(canvas.len(), 1);
        assert!((x(&canvas, "a") - 0.0).abs() < f64::EPSILON);
        assert!((canvas.properties().scale - 3.0).abs() < f64::EPSILON);
        assert!((canvas.properties().grid_size - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_require() {
        let canvas = canvas_with(vec![component("a", 0.0, 10.0)]);
        assert_eq!(canvas.require("a").unwrap().id(), "a");
        assert!(matches!(canvas.require("b"), Err(EditorError::ComponentNotFound(_))));
    }

    #[test]
    fn test_independent_instances() {
        let mut first = ReportCanvas::new();
        let second = ReportCanvas::new();
        first.add(component("a", 0.0, 10.0));
        assert!(second.is_empty());
        assert_eq!(second.history_len(), 0);
    }
}
