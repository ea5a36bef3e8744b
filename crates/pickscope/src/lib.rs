//! pickscope-rs: pointer picking, highlight channels and annotations for 3D scenes.
//!
//! A [`Viewer`] owns a [`Scene`], a [`Camera`] with [`OrbitControls`] and the
//! interaction state, and exposes one method per host event: resize, pointer
//! move, double click, label enter/leave/delete and frame.
//!
//! # Quick Start
//!
//! ```no_run
//! use pickscope_rs::*;
//!
//! fn main() -> Result<()> {
//!     init_logging();
//!
//!     let mut viewer = Viewer::new(Options::default(), 800.0, 600.0)?;
//!     viewer.scene_mut().add_mesh(Mesh::cuboid("box", Vec3::ONE))?;
//!     viewer.load_obj("building.obj", LoadKind::ElementModel)?;
//!
//!     // Forward host events.
//!     viewer.on_pointer_move(Vec2::new(400.0, 300.0))?;
//!     Ok(())
//! }
//! ```
//!
//! # Highlight channels
//!
//! - **hover**: swaps the material of the rigid mesh under the pointer
//! - **preselect**: element subset on models, follows the pointer
//! - **select**: element subset on models, set by double click

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]

mod init;
mod viewer;

pub use init::{init_logging, init_logging_with_filter};
pub use viewer::{DoubleClickOutcome, Frame, LabelView, PointerUpdate, Presenter, Viewer};

// Re-export core types
pub use pickscope_core::{
    annotation::{Annotation, Annotations, TextPrompt},
    error::{PickscopeError, Result},
    highlight::{ElementRef, HighlightChange, HighlightStyle, SubsetChange},
    id::{AnnotationId, ElementId, ModelId, ObjectId},
    list::{ItemList, ListItem},
    material::{color_from_hex, Material, Shading},
    options::{DoubleClickAction, Options},
    pick::{CastResult, Caster, Intersection},
    pointer::{PointerSample, Viewport},
    selection::SelectionRecord,
    Mat4, UVec3, Vec2, Vec3, Vec4,
};

// Re-export view types
pub use pickscope_render::{Camera, FrameLoop, OrbitControls, ProjectionMode};

// Re-export structures
pub use pickscope_structures::{
    ElementModel, LoadError, LoadKind, LoadState, LoadedAsset, Mesh, Scene, Subset,
};
