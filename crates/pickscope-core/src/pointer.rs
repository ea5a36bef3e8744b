//! Pointer coordinates and the viewport they are measured against.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::{PickscopeError, Result};

/// The on-screen rectangle the scene is drawn into, in pixels.
///
/// Width and height are always positive; construction rejects anything else.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    left: f32,
    top: f32,
    width: f32,
    height: f32,
}

impl Viewport {
    /// Creates a viewport from its top-left corner and size.
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Result<Self> {
        // Written this way so NaN is rejected too.
        if !(width > 0.0 && height > 0.0) || !left.is_finite() || !top.is_finite() {
            return Err(PickscopeError::InvalidViewport { width, height });
        }
        Ok(Self {
            left,
            top,
            width,
            height,
        })
    }

    /// Creates a viewport anchored at the origin.
    pub fn from_size(width: f32, height: f32) -> Result<Self> {
        Self::new(0.0, 0.0, width, height)
    }

    #[must_use]
    pub fn left(&self) -> f32 {
        self.left
    }

    #[must_use]
    pub fn top(&self) -> f32 {
        self.top
    }

    #[must_use]
    pub fn width(&self) -> f32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> f32 {
        self.height
    }

    #[must_use]
    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    /// Returns width / height.
    #[must_use]
    pub fn aspect_ratio(&self) -> f32 {
        self.width / self.height
    }

    /// Returns whether the pixel lies inside the rectangle (edges included).
    #[must_use]
    pub fn contains(&self, pixel: Vec2) -> bool {
        (self.left..=self.right()).contains(&pixel.x) && (self.top..=self.bottom()).contains(&pixel.y)
    }
}

/// A pointer position in normalized device coordinates.
///
/// The top-left pixel of the viewport maps to `(-1, 1)` and the bottom-right
/// to `(1, -1)`. Samples are recomputed on every pointer event and never kept.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerSample {
    ndc: Vec2,
}

impl PointerSample {
    /// Normalizes a pixel coordinate against the viewport rectangle.
    #[must_use]
    pub fn from_pixels(pixel: Vec2, viewport: &Viewport) -> Self {
        let x = ((pixel.x - viewport.left) / viewport.width) * 2.0 - 1.0;
        let y = -((pixel.y - viewport.top) / viewport.height) * 2.0 + 1.0;
        Self {
            ndc: Vec2::new(x, y),
        }
    }

    /// Wraps an already normalized coordinate.
    #[must_use]
    pub fn from_ndc(ndc: Vec2) -> Self {
        Self { ndc }
    }

    /// Maps the sample back to pixel coordinates in `viewport`.
    #[must_use]
    pub fn to_pixels(&self, viewport: &Viewport) -> Vec2 {
        Vec2::new(
            viewport.left + (self.ndc.x + 1.0) * 0.5 * viewport.width,
            viewport.top + (1.0 - self.ndc.y) * 0.5 * viewport.height,
        )
    }

    #[must_use]
    pub fn ndc(&self) -> Vec2 {
        self.ndc
    }

    #[must_use]
    pub fn x(&self) -> f32 {
        self.ndc.x
    }

    #[must_use]
    pub fn y(&self) -> f32 {
        self.ndc.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn approx(a: Vec2, b: Vec2) -> bool {
        (a - b).abs().max_element() < 1e-5
    }

    #[test]
    fn test_viewport_rejects_empty_rect() {
        assert!(Viewport::from_size(0.0, 600.0).is_err());
        assert!(Viewport::from_size(800.0, -1.0).is_err());
        assert!(Viewport::from_size(f32::NAN, 600.0).is_err());
        assert!(Viewport::from_size(800.0, 600.0).is_ok());
    }

    #[test]
    fn test_center_maps_to_origin() {
        let viewport = Viewport::from_size(800.0, 600.0).unwrap();
        let sample = PointerSample::from_pixels(Vec2::new(400.0, 300.0), &viewport);
        assert!(approx(sample.ndc(), Vec2::ZERO));
    }

    #[test]
    fn test_corners() {
        let viewport = Viewport::new(10.0, 20.0, 200.0, 100.0).unwrap();
        let top_left = PointerSample::from_pixels(Vec2::new(10.0, 20.0), &viewport);
        let bottom_right = PointerSample::from_pixels(Vec2::new(210.0, 120.0), &viewport);
        assert!(approx(top_left.ndc(), Vec2::new(-1.0, 1.0)));
        assert!(approx(bottom_right.ndc(), Vec2::new(1.0, -1.0)));
    }

    #[test]
    fn test_contains_includes_edges() {
        let viewport = Viewport::new(10.0, 20.0, 200.0, 100.0).unwrap();
        assert!(viewport.contains(Vec2::new(10.0, 20.0)));
        assert!(viewport.contains(Vec2::new(210.0, 120.0)));
        assert!(!viewport.contains(Vec2::new(9.9, 50.0)));
        assert!(!viewport.contains(Vec2::new(100.0, 120.1)));
    }

    #[test]
    fn test_offset_viewport_round_trips_to_pixels() {
        let viewport = Viewport::new(30.0, 40.0, 640.0, 480.0).unwrap();
        let pixel = Vec2::new(123.0, 456.0);
        let sample = PointerSample::from_pixels(pixel, &viewport);
        assert!(approx(sample.to_pixels(&viewport), pixel));
    }

    proptest! {
        #[test]
        fn prop_inside_pixels_normalize_into_unit_square(
            left in -500.0f32..500.0,
            top in -500.0f32..500.0,
            width in 1.0f32..4000.0,
            height in 1.0f32..4000.0,
            fx in 0.0f32..=1.0,
            fy in 0.0f32..=1.0,
        ) {
            let viewport = Viewport::new(left, top, width, height).unwrap();
            let pixel = Vec2::new(left + fx * width, top + fy * height);
            let sample = PointerSample::from_pixels(pixel, &viewport);
            prop_assert!(sample.x() >= -1.0 - 1e-4 && sample.x() <= 1.0 + 1e-4);
            prop_assert!(sample.y() >= -1.0 - 1e-4 && sample.y() <= 1.0 + 1e-4);
        }
    }
}
