//! Error types for the diagram engine.
//!
//! Parse failures abort the command that raised them without touching the
//! model. Geometry guardrails (minimum sizes, vertex insets) clamp instead of
//! failing, so none of these errors describe an invalid diagram.

use thiserror::Error;

use crate::model::{PartId, ShapeId};

#[derive(Error, Debug)]
pub enum EditorError {
    /// Dimension text could not be read as a length
    #[error("invalid dimension {input:?}")]
    InvalidDimension { input: String },

    /// Colour is not `#rgb` or `#rrggbb`
    #[error("invalid color {0:?}")]
    InvalidColor(String),

    #[error("stroke width must be positive, got {0}")]
    InvalidStrokeWidth(f32),

    #[error("invalid diagram JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid TOML settings: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("could not write TOML settings: {0}")]
    TomlSer(#[from] toml::ser::Error),

    /// Connector template holds neither bodies nor lines
    #[error("connector template has no geometry")]
    EmptyTemplate,

    #[error("connector template is not loaded yet")]
    TemplateNotReady,

    #[error("unknown part {0:?}")]
    UnknownPart(PartId),

    #[error("unknown shape {0:?}")]
    UnknownShape(ShapeId),

    #[error("part {part:?} has no vertex {index}")]
    UnknownVertex { part: PartId, index: usize },

    #[error("part {part:?} has no special form {index}")]
    UnknownSpecialForm { part: PartId, index: usize },

    /// Only one pointer drag may run at a time
    #[error("a drag session is already active")]
    DragInProgress,
}

pub type Result<T> = std::result::Result<T, EditorError>;
