//! Core interaction logic for pickscope-rs.
//!
//! This crate holds everything that decides *what* is picked and *what* is
//! highlighted, independent of how the scene is stored or drawn:
//! - [`PointerSample`] and [`Viewport`] for pixel to normalized-device conversion
//! - [`Caster`] for turning a pointer sample into a nearest-first [`CastResult`]
//! - [`SelectionRecord`] for one independent highlight channel
//! - [`apply_swap_highlight`] and [`apply_subset_highlight`] for the two ways a
//!   hit is made visible
//! - [`Annotations`] for text labels pinned to scene points
//! - [`ItemList`] for hover/press state on flat lists of items
//!
//! Scene storage, ray/triangle tests and subset bookkeeping are reached only
//! through the collaborator traits [`RayIntersector`], [`MaterialSwap`] and
//! [`SubsetModels`].

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Builder patterns return Self which doesn't need must_use
#![allow(clippy::must_use_candidate)]
// Colors and face indices are converted between integer and float freely
#![allow(clippy::cast_precision_loss)]

pub mod annotation;
pub mod error;
pub mod highlight;
pub mod id;
pub mod list;
pub mod material;
pub mod options;
pub mod pick;
pub mod pointer;
pub mod ray;
pub mod selection;

pub use annotation::{Annotation, Annotations, TextPrompt};
pub use error::{PickscopeError, Result};
pub use highlight::{
    apply_subset_highlight, apply_swap_highlight, resolve_element, ElementRef, HighlightChange,
    HighlightStyle, MaterialSwap, StyleKey, SubsetChange, SubsetModels, SubsetRequest,
};
pub use id::{AnnotationId, ElementId, ModelId, ObjectId};
pub use list::{ItemList, ListItem};
pub use material::{color_from_hex, Material, Shading};
pub use options::{DoubleClickAction, Options, ProjectionMode};
pub use pick::{CameraProjection, CastResult, Caster, Intersection, RayIntersector};
pub use pointer::{PointerSample, Viewport};
pub use ray::Ray;
pub use selection::{Highlighted, SelectionRecord};

// Re-export glam types for convenience
pub use glam::{Mat4, UVec3, Vec2, Vec3, Vec4};
