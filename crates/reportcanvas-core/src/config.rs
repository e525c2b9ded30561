//! Editor configuration.

use crate::history::DEFAULT_MAX_HISTORY;
use crate::properties::CanvasProperties;
use kurbo::Vec2;
use serde::{Deserialize, Serialize};

/// Translation applied to duplicated and pasted components.
pub const DEFAULT_COPY_OFFSET: Vec2 = Vec2::new(20.0, 20.0);

/// Settings for a [`ReportCanvas`](crate::ReportCanvas).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorConfig {
    /// Snapshots kept for undo (minimum 1).
    pub max_history_size: usize,
    /// Offset of duplicates relative to their source.
    pub duplicate_offset: Vec2,
    /// Offset of pasted components relative to the clipboard content.
    pub paste_offset: Vec2,
    /// Canvas properties of a fresh editor.
    pub initial_properties: CanvasProperties,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            max_history_size: DEFAULT_MAX_HISTORY,
            duplicate_offset: DEFAULT_COPY_OFFSET,
            paste_offset: DEFAULT_COPY_OFFSET,
            initial_properties: CanvasProperties::default(),
        }
    }
}

impl EditorConfig {
    /// Parse a configuration from JSON; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
