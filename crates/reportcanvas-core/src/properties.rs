//! Global canvas surface attributes.

use crate::snap::{SnapResult, snap_point};
use kurbo::{Point, Size};
use peniko::Color;
use serde::{Deserialize, Serialize};

/// Minimum view zoom factor.
pub const MIN_SCALE: f64 = 0.1;
/// Maximum view zoom factor.
pub const MAX_SCALE: f64 = 3.0;
/// Step used by `zoom_in` / `zoom_out`.
pub const SCALE_STEP: f64 = 0.1;
/// Minimum grid spacing.
pub const MIN_GRID_SIZE: f64 = 5.0;
/// Maximum grid spacing.
pub const MAX_GRID_SIZE: f64 = 50.0;
/// Smallest accepted canvas dimension.
pub const MIN_CANVAS_DIMENSION: f64 = 1.0;

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }

    pub fn transparent() -> Self {
        Self::new(0, 0, 0, 0)
    }

    /// Parse a CSS hex color (`#rgb`, `#rrggbb`, `#rrggbbaa`) or `transparent`.
    pub fn parse(color: &str) -> Option<Self> {
        let color = color.trim();
        if color.eq_ignore_ascii_case("transparent") {
            return Some(Self::transparent());
        }
        let hex = color.strip_prefix('#')?;
        if !hex.is_ascii() {
            return None;
        }
        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
        match hex.len() {
            3 => Some(Self::new(
                channel(0..1)? * 17,
                channel(1..2)? * 17,
                channel(2..3)? * 17,
                255,
            )),
            6 => Some(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?, 255)),
            8 => Some(Self::new(
                channel(0..2)?,
                channel(2..4)?,
                channel(4..6)?,
                channel(6..8)?,
            )),
            _ => None,
        }
    }

    /// Parse a CSS hex color, falling back to white.
    pub fn from_css(color: &str) -> Self {
        Self::parse(color).unwrap_or_else(|| {
            log::trace!("unparseable color {color:?}, using white");
            Self::white()
        })
    }

    /// Format as `#rrggbb`, or `#rrggbbaa` when not fully opaque.
    pub fn to_hex(self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl Default for SerializableColor {
    fn default() -> Self {
        Self::white()
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Surface attributes of the report canvas.
///
/// Size and background are document state (captured in snapshots); scale,
/// grid and snapping are view state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CanvasProperties {
    /// Canvas width in canvas units.
    pub width: f64,
    /// Canvas height in canvas units.
    pub height: f64,
    /// Background fill.
    pub background: SerializableColor,
    /// View zoom factor, within [`MIN_SCALE`, `MAX_SCALE`].
    pub scale: f64,
    /// Grid spacing, within [`MIN_GRID_SIZE`, `MAX_GRID_SIZE`].
    pub grid_size: f64,
    /// Whether the grid is painted.
    pub show_grid: bool,
    /// Whether moves snap to the grid.
    pub snap_to_grid: bool,
}

impl Default for CanvasProperties {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
            background: SerializableColor::white(),
            scale: 1.0,
            grid_size: 10.0,
            show_grid: true,
            snap_to_grid: false,
        }
    }
}

impl CanvasProperties {
    /// Canvas size.
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Set the canvas size. Dimensions are floored at [`MIN_CANVAS_DIMENSION`].
    pub fn set_size(&mut self, width: f64, height: f64) {
        self.width = width.max(MIN_CANVAS_DIMENSION);
        self.height = height.max(MIN_CANVAS_DIMENSION);
    }

    /// Set the zoom factor, clamped to the allowed range.
    pub fn set_scale(&mut self, scale: f64) {
        self.scale = clamp_or(scale, MIN_SCALE, MAX_SCALE, self.scale);
    }

    /// Zoom in by one step.
    pub fn zoom_in(&mut self) {
        self.set_scale(self.scale + SCALE_STEP);
    }

    /// Zoom out by one step.
    pub fn zoom_out(&mut self) {
        self.set_scale(self.scale - SCALE_STEP);
    }

    /// Reset zoom to 100%.
    pub fn reset_zoom(&mut self) {
        self.scale = 1.0;
    }

    /// Set the grid spacing, clamped to the allowed range.
    pub fn set_grid_size(&mut self, grid_size: f64) {
        self.grid_size = clamp_or(grid_size, MIN_GRID_SIZE, MAX_GRID_SIZE, self.grid_size);
    }

    /// Snap a point according to the current grid settings.
    pub fn snap(&self, point: Point) -> SnapResult {
        snap_point(point, self.snap_to_grid, self.grid_size)
    }

    /// Bring out-of-range values back into range (e.g. after deserializing).
    pub fn normalize(&mut self) {
        let defaults = Self::default();
        self.set_size(self.width, self.height);
        self.scale = clamp_or(self.scale, MIN_SCALE, MAX_SCALE, defaults.scale);
        self.grid_size = clamp_or(self.grid_size, MIN_GRID_SIZE, MAX_GRID_SIZE, defaults.grid_size);
    }
}

/// Clamp `value` into `[min, max]`; NaN falls back to `fallback`.
fn clamp_or(value: f64, min: f64, max: f64, fallback: f64) -> f64 {
    if value.is_nan() {
        fallback
    } else {
        value.clamp(min, max)
    }
}
