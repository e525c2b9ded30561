//! Report Canvas Core Library
//!
//! In-memory editing engine for a drag-and-drop report builder: component
//! placement, selection, layering, alignment, clipboard and undo/redo.
//! Rendering and persistence live outside this crate; they read state from a
//! [`ReportCanvas`] and write back through its operations.

pub mod align;
pub mod canvas;
pub mod clipboard;
pub mod component;
pub mod config;
pub mod error;
pub mod history;
pub mod layering;
pub mod properties;
pub mod registry;
pub mod selection;
pub mod snap;

pub use align::{Alignment, Distribution};
pub use canvas::{CanvasDocument, ReportCanvas};
pub use clipboard::Clipboard;
pub use component::{ComponentId, ComponentPatch, ReportComponent, generate_id};
pub use config::EditorConfig;
pub use error::{EditorError, EditorResult};
pub use history::{History, Snapshot};
pub use layering::LayerOp;
pub use properties::{CanvasProperties, SerializableColor};
pub use registry::ComponentRegistry;
pub use selection::Selection;
pub use snap::{SnapResult, snap_point, snap_to_grid};
