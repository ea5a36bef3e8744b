//! Orbit camera controls with optional damping.
//!
//! Input handlers only queue movement; [`OrbitControls::update`] applies it
//! once per frame. With damping enabled the queued movement is spent over
//! several frames so the camera eases out.

use pickscope_core::Options;

use crate::camera::Camera;

/// Remaining movement below this is dropped.
const REST_EPSILON: f32 = 1e-5;

/// Queued orbit, pan and dolly movement for a [`Camera`].
#[derive(Debug, Clone)]
pub struct OrbitControls {
    /// Whether queued movement is spent gradually.
    pub enable_damping: bool,
    /// Fraction of the queued movement applied per 60 Hz frame.
    pub damping_factor: f32,
    /// Radians of orbit per pixel of pointer drag.
    pub rotate_speed: f32,
    /// World units of pan per pixel, scaled by camera distance.
    pub pan_speed: f32,
    orbit: (f32, f32),
    pan: (f32, f32),
    dolly: f32,
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self {
            enable_damping: false,
            damping_factor: 0.05,
            rotate_speed: 0.01,
            pan_speed: 0.001,
            orbit: (0.0, 0.0),
            pan: (0.0, 0.0),
            dolly: 0.0,
        }
    }
}

impl OrbitControls {
    /// Creates undamped controls.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates controls configured from viewer options.
    #[must_use]
    pub fn from_options(options: &Options) -> Self {
        Self {
            enable_damping: options.enable_damping,
            damping_factor: options.damping_factor,
            ..Self::default()
        }
    }

    /// Queues an orbit for a pointer drag of `dx`, `dy` pixels.
    pub fn rotate(&mut self, dx: f32, dy: f32) {
        self.orbit.0 += dx * self.rotate_speed;
        self.orbit.1 += dy * self.rotate_speed;
    }

    /// Queues a pan for a pointer drag of `dx`, `dy` pixels.
    pub fn pan(&mut self, dx: f32, dy: f32) {
        self.pan.0 += dx;
        self.pan.1 += dy;
    }

    /// Queues a dolly towards the target (positive) or away from it.
    pub fn dolly(&mut self, delta: f32) {
        self.dolly += delta;
    }

    /// Whether any movement is still queued.
    #[must_use]
    pub fn is_moving(&self) -> bool {
        self.orbit.0 != 0.0
            || self.orbit.1 != 0.0
            || self.pan.0 != 0.0
            || self.pan.1 != 0.0
            || self.dolly != 0.0
    }

    /// Drops all queued movement.
    pub fn stop(&mut self) {
        self.orbit = (0.0, 0.0);
        self.pan = (0.0, 0.0);
        self.dolly = 0.0;
    }

    /// Applies this frame's share of the queued movement.
    ///
    /// `delta_seconds` is the time since the previous frame. Returns whether
    /// the camera moved.
    pub fn update(&mut self, camera: &mut Camera, delta_seconds: f32) -> bool {
        if !self.is_moving() {
            return false;
        }

        let share = if self.enable_damping {
            let frames = (delta_seconds * 60.0).max(0.0);
            1.0 - (1.0 - self.damping_factor).powf(frames)
        } else {
            1.0
        };

        let pan_scale = self.pan_speed * camera.distance();
        camera.orbit(self.orbit.0 * share, self.orbit.1 * share);
        camera.pan(
            -self.pan.0 * share * pan_scale,
            self.pan.1 * share * pan_scale,
        );
        camera.zoom(self.dolly * share);

        let keep = 1.0 - share;
        self.orbit = (settle(self.orbit.0 * keep), settle(self.orbit.1 * keep));
        self.pan = (settle(self.pan.0 * keep), settle(self.pan.1 * keep));
        self.dolly = settle(self.dolly * keep);
        true
    }
}

fn settle(value: f32) -> f32 {
    if value.abs() < REST_EPSILON {
        0.0
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;

    fn camera() -> Camera {
        let mut camera = Camera::new(1.0);
        camera.position = Vec3::new(0.0, 0.0, 10.0);
        camera.target = Vec3::ZERO;
        camera
    }

    #[test]
    fn test_idle_controls_do_nothing() {
        let mut controls = OrbitControls::new();
        let mut camera = camera();
        assert!(!controls.update(&mut camera, 1.0 / 60.0));
        assert_eq!(camera.position, Vec3::new(0.0, 0.0, 10.0));
    }

    #[test]
    fn test_undamped_applies_everything_at_once() {
        let mut controls = OrbitControls::new();
        let mut camera = camera();
        controls.dolly(2.0);
        assert!(controls.update(&mut camera, 1.0 / 60.0));
        assert!((camera.distance() - 8.0).abs() < 1e-4);
        assert!(!controls.is_moving());
    }

    #[test]
    fn test_damped_movement_eases_out() {
        let mut controls = OrbitControls::new();
        controls.enable_damping = true;
        controls.damping_factor = 0.5;
        let mut camera = camera();
        controls.dolly(2.0);

        controls.update(&mut camera, 1.0 / 60.0);
        assert!((camera.distance() - 9.0).abs() < 1e-3);
        assert!(controls.is_moving());

        for _ in 0..40 {
            controls.update(&mut camera, 1.0 / 60.0);
        }
        assert!((camera.distance() - 8.0).abs() < 1e-3);
        assert!(!controls.is_moving());
    }

    #[test]
    fn test_rotate_keeps_distance() {
        let mut controls = OrbitControls::new();
        let mut camera = camera();
        controls.rotate(100.0, 30.0);
        controls.update(&mut camera, 1.0 / 60.0);
        assert!((camera.distance() - 10.0).abs() < 1e-3);
        assert!(camera.position.x.abs() > 0.1);
    }

    #[test]
    fn test_stop_drops_queue() {
        let mut controls = OrbitControls::new();
        controls.pan(5.0, 5.0);
        controls.stop();
        assert!(!controls.is_moving());
    }
}
