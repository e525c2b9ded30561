//! Report components placed on the canvas.

use kurbo::{Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for components.
///
/// Ids are opaque strings: callers may supply their own (e.g. ids coming back
/// from the backend) or let the engine generate one with [`generate_id`].
pub type ComponentId = String;

/// Generate a fresh, collision-resistant component id.
pub fn generate_id() -> ComponentId {
    format!("comp_{}", Uuid::new_v4().simple())
}

/// A placed element on the report canvas.
///
/// The engine only interprets the geometry and stacking fields; `kind` and
/// `props` are carried along untouched for the renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportComponent {
    pub(crate) id: ComponentId,
    /// Component type as understood by the palette and renderer (e.g. "chart").
    #[serde(rename = "type")]
    pub kind: String,
    /// Left edge in canvas units.
    pub x: f64,
    /// Top edge in canvas units.
    pub y: f64,
    /// Width in canvas units.
    pub width: f64,
    /// Height in canvas units.
    pub height: f64,
    /// Stacking order (higher paints on top).
    #[serde(default)]
    pub z_index: i64,
    /// Component-specific payload.
    #[serde(default)]
    pub props: serde_json::Value,
}

impl ReportComponent {
    /// Create a component with an engine-generated id.
    pub fn new(kind: impl Into<String>, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::with_id(generate_id(), kind, x, y, width, height)
    }

    /// Create a component with a caller-supplied id.
    pub fn with_id(
        id: impl Into<ComponentId>,
        kind: impl Into<String>,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    ) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            x,
            y,
            width,
            height,
            z_index: 1,
            props: serde_json::Value::Null,
        }
    }

    /// Builder-style payload setter.
    pub fn with_props(mut self, props: serde_json::Value) -> Self {
        self.props = props;
        self
    }

    /// Builder-style stacking setter.
    pub fn with_z_index(mut self, z_index: i64) -> Self {
        self.z_index = z_index;
        self
    }

    /// Get the component id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Bounding box in canvas coordinates.
    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }

    /// Move the component by a delta.
    pub fn translate(&mut self, delta: Vec2) {
        self.x += delta.x;
        self.y += delta.y;
    }

    /// Deep copy with a fresh id, translated by `offset`.
    pub(crate) fn duplicate_with_offset(&self, offset: Vec2) -> Self {
        let mut copy = self.clone();
        copy.id = generate_id();
        copy.translate(offset);
        copy
    }

    /// Merge a partial update into this component.
    pub fn apply(&mut self, patch: &ComponentPatch) {
        if let Some(x) = patch.x {
            self.x = x;
        }
        if let Some(y) = patch.y {
            self.y = y;
        }
        if let Some(width) = patch.width {
            self.width = width;
        }
        if let Some(height) = patch.height {
            self.height = height;
        }
        if let Some(z_index) = patch.z_index {
            self.z_index = z_index;
        }
        if let Some(kind) = &patch.kind {
            self.kind.clone_from(kind);
        }
        if let Some(props) = &patch.props {
            merge_props(&mut self.props, props);
        }
    }
}

/// Partial field update for [`ReportComponent`].
///
/// Unset fields are left untouched. `props` is merged key by key when both
/// sides are JSON objects, otherwise it replaces the payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ComponentPatch {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub z_index: Option<i64>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub props: Option<serde_json::Value>,
}

impl ComponentPatch {
    /// Patch that moves the component's top-left corner.
    pub fn position(x: f64, y: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Self::default()
        }
    }

    /// Patch that resizes the component.
    pub fn size(width: f64, height: f64) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
            ..Self::default()
        }
    }

    /// Patch that merges into the payload.
    pub fn props(props: serde_json::Value) -> Self {
        Self {
            props: Some(props),
            ..Self::default()
        }
    }
}

fn merge_props(target: &mut serde_json::Value, patch: &serde_json::Value) {
    match (target, patch) {
        (serde_json::Value::Object(target), serde_json::Value::Object(patch)) => {
            for (key, value) in patch {
                target.insert(key.clone(), value.clone());
            }
        }
        (target, patch) => *target = patch.clone(),
    }
}
