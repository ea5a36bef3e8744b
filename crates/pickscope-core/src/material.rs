//! Surface materials, the "visual representation" a highlight swaps.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// How a surface responds to light.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Shading {
    /// Unlit, the color is drawn as-is.
    Basic,
    /// Diffuse lighting.
    #[default]
    Lambert,
}

/// A surface material.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Linear RGB color in `[0, 1]`.
    pub color: Vec3,
    /// Opacity in `[0, 1]`, only honored when `transparent` is set.
    pub opacity: f32,
    pub transparent: bool,
    /// Whether the surface is hidden by geometry in front of it.
    pub depth_test: bool,
    pub shading: Shading,
}

impl Material {
    /// An opaque lit material of the given color.
    #[must_use]
    pub fn lambert(color: Vec3) -> Self {
        Self {
            color,
            ..Self::default()
        }
    }

    /// An opaque unlit material of the given color.
    #[must_use]
    pub fn basic(color: Vec3) -> Self {
        Self {
            color,
            shading: Shading::Basic,
            ..Self::default()
        }
    }

    /// Returns the effective alpha.
    #[must_use]
    pub fn alpha(&self) -> f32 {
        if self.transparent {
            self.opacity
        } else {
            1.0
        }
    }
}

impl Default for Material {
    fn default() -> Self {
        Self {
            color: Vec3::ONE,
            opacity: 1.0,
            transparent: false,
            depth_test: true,
            shading: Shading::Lambert,
        }
    }
}

/// Converts a `0xRRGGBB` literal into an RGB vector.
#[must_use]
pub fn color_from_hex(hex: u32) -> Vec3 {
    let r = (hex >> 16) & 0xff;
    let g = (hex >> 8) & 0xff;
    let b = hex & 0xff;
    Vec3::new(r as f32, g as f32, b as f32) / 255.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_from_hex() {
        assert_eq!(color_from_hex(0xff0000), Vec3::X);
        assert_eq!(color_from_hex(0x000000), Vec3::ZERO);
        let pink = color_from_hex(0xff88ff);
        assert!((pink.y - 136.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn test_alpha_ignores_opacity_when_opaque() {
        let mut material = Material::basic(Vec3::X);
        material.opacity = 0.3;
        assert_eq!(material.alpha(), 1.0);
        material.transparent = true;
        assert!((material.alpha() - 0.3).abs() < 1e-6);
    }
}
