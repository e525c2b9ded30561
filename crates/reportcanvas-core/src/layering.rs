//! Z-index assignment and reordering.
//!
//! Front/back are relative to the current extremes of the registry, so
//! repeated calls stay comparable instead of racing towards a fixed constant.

use crate::registry::ComponentRegistry;
use serde::{Deserialize, Serialize};

/// Lowest stacking value `send_backward` will produce.
pub const MIN_Z_INDEX: i64 = 1;

/// A layering operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LayerOp {
    /// Above every other component.
    BringToFront,
    /// Below every other component.
    SendToBack,
    /// One step up.
    BringForward,
    /// One step down, floored at [`MIN_Z_INDEX`].
    SendBackward,
}

impl LayerOp {
    /// Human-readable name, used as the history description.
    pub fn label(self) -> &'static str {
        match self {
            LayerOp::BringToFront => "Bring to front",
            LayerOp::SendToBack => "Send to back",
            LayerOp::BringForward => "Bring forward",
            LayerOp::SendBackward => "Send backward",
        }
    }
}

/// Apply a layering operation to one component.
/// Returns true if the component's z-index changed.
pub fn apply(registry: &mut ComponentRegistry, id: &str, op: LayerOp) -> bool {
    let (Some(max), Some(min)) = (registry.max_z_index(), registry.min_z_index()) else {
        return false;
    };
    let Some(component) = registry.get_mut(id) else {
        log::trace!("{} ignored: unknown id {id}", op.label());
        return false;
    };

    let new_z = match op {
        LayerOp::BringToFront => max.saturating_add(1),
        LayerOp::SendToBack => min.saturating_sub(1),
        LayerOp::BringForward => component.z_index.saturating_add(1),
        LayerOp::SendBackward => component.z_index.saturating_sub(1).max(MIN_Z_INDEX),
    };
    if new_z == component.z_index {
        return false;
    }
    component.z_index = new_z;
    true
}

/// Z-index for a component placed above everything currently on the canvas.
pub fn next_top_z_index(registry: &ComponentRegistry) -> i64 {
    registry.max_z_index().map_or(MIN_Z_INDEX, |max| max.saturating_add(1))
}
