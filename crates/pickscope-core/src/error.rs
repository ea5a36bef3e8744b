//! Error types for pickscope-rs.

use thiserror::Error;

use crate::id::{AnnotationId, ElementId, ModelId, ObjectId};

/// The main error type for pickscope-rs operations.
#[derive(Error, Debug)]
pub enum PickscopeError {
    /// The viewport rectangle has no area.
    #[error("invalid viewport {width}x{height}: width and height must be positive")]
    InvalidViewport { width: f32, height: f32 },

    /// A highlight was recorded on a channel that still holds a target.
    #[error("highlight channel already holds {0}; clear it before highlighting again")]
    AlreadyHighlighted(String),

    /// An object with the given id was not found.
    #[error("{0} not found")]
    ObjectNotFound(ObjectId),

    /// A model with the given id was not found.
    #[error("{0} not found")]
    ModelNotFound(ModelId),

    /// The hit object does not belong to any element model.
    #[error("{0} is not part of an element model")]
    NotAModelObject(ObjectId),

    /// A hit on a model carried no face index to resolve.
    #[error("hit on {0} carries no face index")]
    MissingFaceIndex(ObjectId),

    /// No element is mapped to the given face.
    #[error("no element at face {face} of {model}")]
    ElementNotFound { model: ModelId, face: usize },

    /// An element id is not part of the model.
    #[error("{element} is not part of {model}")]
    UnknownElement { model: ModelId, element: ElementId },

    /// Geometry failed validation.
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    /// An annotation with the given id was not found.
    #[error("{0} not found")]
    AnnotationNotFound(AnnotationId),

    /// The delete control of an annotation was activated while hidden.
    #[error("delete control of {0} is hidden")]
    DeleteHidden(AnnotationId),

    /// A list item index was out of range.
    #[error("item {index} out of range ({len} items)")]
    ItemOutOfRange { index: usize, len: usize },

    /// An option value was rejected.
    #[error("invalid option: {0}")]
    InvalidOption(String),

    /// A background asset load failed.
    #[error("asset load failed: {0}")]
    AssetLoad(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// A specialized Result type for pickscope-rs operations.
pub type Result<T> = std::result::Result<T, PickscopeError>;
