//! View side of pickscope-rs.
//!
//! This crate provides what sits between the host window and the scene:
//! - [`Camera`] with perspective/orthographic projection and screen projection
//! - [`OrbitControls`] for damped orbit, pan and dolly
//! - [`FrameClock`] and [`FrameLoop`] for the start/stop per-frame tick

pub mod camera;
pub mod controls;
pub mod frame;

pub use camera::{Camera, ProjectionMode};
pub use controls::OrbitControls;
pub use frame::{FrameClock, FrameLoop};
