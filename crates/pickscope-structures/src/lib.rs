//! Scene structures for pickscope-rs.
//!
//! This crate provides the reference scene collaborator:
//! - Rigid meshes that answer ray queries and carry a swappable material
//! - Element models: composite meshes whose faces map to stable element ids,
//!   with per-element properties and style-keyed subsets
//! - The [`Scene`] registry implementing the core collaborator traits
//! - Background OBJ loading with progress events

// Graphics code intentionally uses casts for indices, colors, and coordinates
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]

pub mod error;
pub mod loader;
pub mod mesh;
pub mod model;
pub mod scene;

pub use error::{LoadError, LoadResult};
pub use loader::{
    load_obj, parse_obj, LoadEvent, LoadHandle, LoadKind, LoadState, LoadedAsset, LoadedPart,
};
pub use mesh::{Mesh, MeshHit};
pub use model::{ElementModel, Subset};
pub use scene::{Scene, SceneObject};
