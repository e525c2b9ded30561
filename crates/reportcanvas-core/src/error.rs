//! Error types.

use crate::component::ComponentId;
use thiserror::Error;

/// Errors from the fallible editor entry points.
///
/// The regular editing operations never fail; unknown ids and boundary
/// conditions are silent no-ops. Only document (de)serialization and the
/// strict `try_*` variants report errors.
#[derive(Debug, Error)]
pub enum EditorError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Component not found: {0}")]
    ComponentNotFound(ComponentId),
}

/// Result type for fallible editor operations.
pub type EditorResult<T> = Result<T, EditorError>;
