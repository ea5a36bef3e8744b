//! Configuration options for pickscope.

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::{PickscopeError, Result};
use crate::highlight::HighlightStyle;
use crate::material::color_from_hex;

/// What a double click on the scene does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DoubleClickAction {
    /// Select the element under the pointer and log its properties.
    #[default]
    Select,
    /// Pin a text annotation at the point under the pointer.
    Annotate,
}

/// Camera projection mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProjectionMode {
    #[default]
    Perspective,
    /// Parallel projection; every pointer ray shares one direction.
    Orthographic,
}

/// Global configuration options for a viewer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,

    /// Initial camera position.
    pub camera_position: Vec3,

    /// Initial point the camera orbits around.
    pub camera_target: Vec3,

    /// Perspective or orthographic projection.
    pub projection: ProjectionMode,

    /// Near clipping plane.
    pub near: f32,

    /// Far clipping plane.
    pub far: f32,

    /// Whether camera movement eases out over several frames.
    pub enable_damping: bool,

    /// Fraction of the remaining movement applied per 60 Hz frame.
    pub damping_factor: f32,

    /// Keep only the nearest intersection of every cast.
    pub first_hit_only: bool,

    /// Style of the whole-object hover highlight.
    pub hover_style: HighlightStyle,

    /// Style of the element preselection shown while moving the pointer.
    pub preselect_style: HighlightStyle,

    /// Style of the element selection made by double click.
    pub select_style: HighlightStyle,

    /// What a double click does.
    pub double_click: DoubleClickAction,

    /// Background color.
    pub background_color: Vec3,

    /// Upper bound of the device pixel ratio used for rendering.
    pub max_pixel_ratio: f32,

    /// Re-frame the camera on the whole scene after a load is attached.
    pub frame_on_load: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            fov_degrees: 75.0,
            camera_position: Vec3::new(8.0, 13.0, 15.0),
            camera_target: Vec3::new(-2.0, 0.0, 0.0),
            projection: ProjectionMode::Perspective,
            near: 0.1,
            far: 2000.0,
            enable_damping: true,
            damping_factor: 0.05,
            first_hit_only: true,
            hover_style: HighlightStyle::Flat {
                color: color_from_hex(0xff0000),
            },
            preselect_style: HighlightStyle::Overlay {
                color: color_from_hex(0xff88ff),
                opacity: 0.6,
                depth_test: false,
            },
            select_style: HighlightStyle::Overlay {
                color: color_from_hex(0xff00ff),
                opacity: 0.6,
                depth_test: false,
            },
            double_click: DoubleClickAction::Select,
            background_color: color_from_hex(0xe3e3e3),
            max_pixel_ratio: 2.0,
            frame_on_load: false,
        }
    }
}

impl Options {
    /// Parses options from JSON. Missing fields take their default.
    pub fn from_json(json: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    /// Reads options from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Serializes the options as pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Checks value ranges.
    pub fn validate(&self) -> Result<()> {
        if !(self.fov_degrees > 0.0 && self.fov_degrees < 180.0) {
            return Err(PickscopeError::InvalidOption(format!(
                "fov_degrees must be in (0, 180), got {}",
                self.fov_degrees
            )));
        }
        if !(self.near > 0.0 && self.far > self.near) {
            return Err(PickscopeError::InvalidOption(format!(
                "clip planes must satisfy 0 < near < far, got {}..{}",
                self.near, self.far
            )));
        }
        if !(self.damping_factor > 0.0 && self.damping_factor <= 1.0) {
            return Err(PickscopeError::InvalidOption(format!(
                "damping_factor must be in (0, 1], got {}",
                self.damping_factor
            )));
        }
        if self.max_pixel_ratio < 1.0 {
            return Err(PickscopeError::InvalidOption(format!(
                "max_pixel_ratio must be at least 1, got {}",
                self.max_pixel_ratio
            )));
        }
        for (name, style) in [
            ("hover_style", &self.hover_style),
            ("preselect_style", &self.preselect_style),
            ("select_style", &self.select_style),
        ] {
            if let HighlightStyle::Overlay { opacity, .. } = style {
                if !(0.0..=1.0).contains(opacity) {
                    return Err(PickscopeError::InvalidOption(format!(
                        "{name} opacity must be in [0, 1], got {opacity}"
                    )));
                }
            }
        }
        Ok(())
    }

    /// Clamps a device pixel ratio to `max_pixel_ratio`.
    #[must_use]
    pub fn pixel_ratio(&self, device_pixel_ratio: f32) -> f32 {
        device_pixel_ratio.min(self.max_pixel_ratio)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        Options::default().validate().unwrap();
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let options = Options::from_json(r#"{ "fov_degrees": 60.0, "double_click": "annotate" }"#)
            .unwrap();
        assert_eq!(options.fov_degrees, 60.0);
        assert_eq!(options.double_click, DoubleClickAction::Annotate);
        assert!(options.first_hit_only);
        assert_eq!(options.projection, ProjectionMode::Perspective);
    }

    #[test]
    fn test_projection_from_json() {
        let options = Options::from_json(r#"{ "projection": "orthographic", "frame_on_load": true }"#)
            .unwrap();
        assert_eq!(options.projection, ProjectionMode::Orthographic);
        assert!(options.frame_on_load);
    }

    #[test]
    fn test_json_round_trip() {
        let options = Options::default();
        let parsed = Options::from_json(&options.to_json().unwrap()).unwrap();
        assert_eq!(parsed, options);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(Options::from_json(r#"{ "fov_degrees": 0.0 }"#).is_err());
        assert!(Options::from_json(r#"{ "near": 10.0, "far": 1.0 }"#).is_err());
        let json = r#"{ "select_style": { "kind": "overlay", "color": [1.0, 0.0, 1.0], "opacity": 1.5, "depth_test": false } }"#;
        assert!(matches!(
            Options::from_json(json),
            Err(PickscopeError::InvalidOption(_))
        ));
    }

    #[test]
    fn test_pixel_ratio_is_capped() {
        let options = Options::default();
        assert_eq!(options.pixel_ratio(3.0), 2.0);
        assert_eq!(options.pixel_ratio(1.5), 1.5);
    }
}
