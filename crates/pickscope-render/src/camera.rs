//! Camera and view management.

use glam::{Mat4, Vec2, Vec3};
use pickscope_core::{CameraProjection, Options, PointerSample, Viewport};

pub use pickscope_core::ProjectionMode;

/// Below this squared length the view direction counts as parallel to `up`.
const PARALLEL_EPSILON: f32 = 1e-10;

/// A 3D camera for viewing the scene.
#[derive(Debug, Clone)]
pub struct Camera {
    /// Camera position in world space.
    pub position: Vec3,
    /// Point the camera is looking at.
    pub target: Vec3,
    /// Up vector.
    pub up: Vec3,
    /// Field of view in radians.
    pub fov: f32,
    /// Aspect ratio (width / height).
    pub aspect_ratio: f32,
    /// Near clipping plane.
    pub near: f32,
    /// Far clipping plane.
    pub far: f32,
    /// Projection mode.
    pub projection_mode: ProjectionMode,
    /// Orthographic half height (used when `projection_mode` is Orthographic).
    pub ortho_scale: f32,
}

impl Camera {
    /// Creates a new camera with default settings.
    #[must_use]
    pub fn new(aspect_ratio: f32) -> Self {
        Self {
            position: Vec3::new(5.0, 5.0, 5.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov: 75f32.to_radians(),
            aspect_ratio,
            near: 0.1,
            far: 2000.0,
            projection_mode: ProjectionMode::Perspective,
            ortho_scale: 1.0,
        }
    }

    /// Creates a camera from viewer options.
    #[must_use]
    ///
    /// An orthographic camera starts with the half height a perspective one
    /// would see at the target, so switching modes keeps the target framed.
    pub fn from_options(options: &Options, aspect_ratio: f32) -> Self {
        let mut camera = Self {
            position: options.camera_position,
            target: options.camera_target,
            near: options.near,
            far: options.far,
            projection_mode: options.projection,
            ..Self::new(aspect_ratio)
        };
        camera.set_fov_degrees(options.fov_degrees);
        camera.ortho_scale = (camera.distance() * (camera.fov * 0.5).tan()).max(0.01);
        camera
    }

    /// Sets the aspect ratio.
    pub fn set_aspect_ratio(&mut self, aspect_ratio: f32) {
        self.aspect_ratio = aspect_ratio;
    }

    /// Returns the view matrix.
    #[must_use]
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.view_up())
    }

    /// Returns the projection matrix.
    #[must_use]
    pub fn projection_matrix(&self) -> Mat4 {
        match self.projection_mode {
            ProjectionMode::Perspective => {
                Mat4::perspective_rh(self.fov, self.aspect_ratio, self.near, self.far)
            }
            ProjectionMode::Orthographic => {
                let half_height = self.ortho_scale;
                let half_width = half_height * self.aspect_ratio;
                Mat4::orthographic_rh(
                    -half_width,
                    half_width,
                    -half_height,
                    half_height,
                    self.near,
                    self.far,
                )
            }
        }
    }

    /// Returns the combined view-projection matrix.
    #[must_use]
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Returns the camera's forward direction.
    ///
    /// A camera sitting on its target looks down -Z.
    #[must_use]
    pub fn forward(&self) -> Vec3 {
        (self.target - self.position)
            .try_normalize()
            .unwrap_or(Vec3::NEG_Z)
    }

    /// Returns the camera's right direction.
    #[must_use]
    pub fn right(&self) -> Vec3 {
        self.forward().cross(self.view_up()).normalize()
    }

    /// The up vector used to orient the view.
    ///
    /// Looking straight along `up` leaves the roll undefined; any vector
    /// perpendicular to the view direction is used then.
    fn view_up(&self) -> Vec3 {
        let forward = self.forward();
        if forward.cross(self.up).length_squared() < PARALLEL_EPSILON {
            forward.any_orthonormal_vector()
        } else {
            self.up
        }
    }

    /// Distance between the camera and its target.
    #[must_use]
    pub fn distance(&self) -> f32 {
        self.position.distance(self.target)
    }

    /// Orbits the camera around the target.
    pub fn orbit(&mut self, delta_x: f32, delta_y: f32) {
        let offset = self.position - self.target;
        let radius = offset.length();
        if radius < 1e-6 {
            return;
        }
        let mut theta = offset.x.atan2(offset.z);
        let mut phi = (offset.y / radius).clamp(-1.0, 1.0).acos();

        theta -= delta_x;
        phi = (phi - delta_y).clamp(0.01, std::f32::consts::PI - 0.01);

        self.position = self.target
            + Vec3::new(
                radius * phi.sin() * theta.sin(),
                radius * phi.cos(),
                radius * phi.sin() * theta.cos(),
            );
    }

    /// Pans the camera.
    pub fn pan(&mut self, delta_x: f32, delta_y: f32) {
        let right = self.right();
        let up = self.view_up();
        let offset = right * delta_x + up * delta_y;
        self.position += offset;
        self.target += offset;
    }

    /// Zooms the camera (moves toward/away from target for perspective,
    /// adjusts `ortho_scale` for orthographic).
    pub fn zoom(&mut self, delta: f32) {
        match self.projection_mode {
            ProjectionMode::Perspective => {
                let direction = self.forward();
                let new_distance = (self.distance() - delta).max(0.1);
                self.position = self.target - direction * new_distance;
            }
            ProjectionMode::Orthographic => {
                let zoom_factor = 1.0 - delta * 0.4;
                self.ortho_scale = (self.ortho_scale * zoom_factor).clamp(0.01, 1000.0);
            }
        }
    }

    /// Frames the given bounding box, keeping the current view direction.
    ///
    /// The camera backs off until the box's bounding sphere fits both
    /// fields of view. The far plane grows if the box would be cut.
    pub fn look_at_box(&mut self, min: Vec3, max: Vec3) {
        let center = (min + max) * 0.5;
        let radius = ((max - min).length() * 0.5).max(1e-3);
        let half_vertical = self.fov * 0.5;
        let half_horizontal = (half_vertical.tan() * self.aspect_ratio).atan();
        let distance = radius / half_vertical.min(half_horizontal).sin();

        let back = -self.forward();
        self.target = center;
        self.position = center + back * distance;
        self.far = self.far.max(distance + radius * 2.0);
        self.ortho_scale = radius * self.aspect_ratio.recip().max(1.0);
    }

    /// Sets the field of view in radians.
    pub fn set_fov(&mut self, fov: f32) {
        self.fov = fov.clamp(0.1, std::f32::consts::PI - 0.1);
    }

    /// Returns FOV in degrees.
    #[must_use]
    pub fn fov_degrees(&self) -> f32 {
        self.fov.to_degrees()
    }

    /// Sets FOV from degrees.
    pub fn set_fov_degrees(&mut self, degrees: f32) {
        self.set_fov(degrees.to_radians());
    }

    /// Projects a world-space point to pixel coordinates in `viewport`.
    ///
    /// Returns `None` for points behind the camera or outside the clip depth
    /// range, which is when screen-space labels are hidden.
    #[must_use]
    pub fn project(&self, point: Vec3, viewport: &Viewport) -> Option<Vec2> {
        let clip = self.view_projection_matrix() * point.extend(1.0);
        if clip.w <= 1e-6 {
            return None;
        }
        let ndc = clip.truncate() / clip.w;
        if !(0.0..=1.0).contains(&ndc.z) {
            return None;
        }
        Some(PointerSample::from_ndc(ndc.truncate()).to_pixels(viewport))
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(16.0 / 9.0)
    }
}

impl CameraProjection for Camera {
    fn view_projection_matrix(&self) -> Mat4 {
        Camera::view_projection_matrix(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pickscope_core::{Caster, Ray};
    use proptest::prelude::*;

    fn front_camera() -> Camera {
        let mut camera = Camera::new(800.0 / 600.0);
        camera.position = Vec3::new(0.0, 0.0, 5.0);
        camera.target = Vec3::ZERO;
        camera
    }

    #[test]
    fn test_camera_defaults() {
        let camera = Camera::default();
        assert_eq!(camera.projection_mode, ProjectionMode::Perspective);
        assert!((camera.fov_degrees() - 75.0).abs() < 1e-3);
    }

    #[test]
    fn test_from_options() {
        let options = Options::default();
        let camera = Camera::from_options(&options, 2.0);
        assert_eq!(camera.position, options.camera_position);
        assert_eq!(camera.target, options.camera_target);
        assert_eq!(camera.aspect_ratio, 2.0);
    }

    #[test]
    fn test_set_fov_clamping() {
        let mut camera = Camera::new(1.0);
        camera.set_fov(0.0);
        assert!(camera.fov >= 0.1);

        camera.set_fov(std::f32::consts::PI);
        assert!(camera.fov < std::f32::consts::PI);
    }

    #[test]
    fn test_zoom_perspective() {
        let mut camera = front_camera();
        let initial_distance = camera.distance();
        camera.zoom(1.0);
        assert!(camera.distance() < initial_distance);
    }

    #[test]
    fn test_orbit_keeps_radius() {
        let mut camera = front_camera();
        camera.orbit(0.5, 0.2);
        assert!((camera.distance() - 5.0).abs() < 1e-4);
    }

    #[test]
    fn test_project_target_hits_viewport_center() {
        let camera = front_camera();
        let viewport = Viewport::from_size(800.0, 600.0).unwrap();
        let pixel = camera.project(Vec3::ZERO, &viewport).unwrap();
        assert!((pixel - Vec2::new(400.0, 300.0)).length() < 1e-3);
    }

    #[test]
    fn test_project_behind_camera_is_hidden() {
        let camera = front_camera();
        let viewport = Viewport::from_size(800.0, 600.0).unwrap();
        assert!(camera.project(Vec3::new(0.0, 0.0, 10.0), &viewport).is_none());
    }

    #[test]
    fn test_center_ray_passes_through_target() {
        let camera = front_camera();
        let ray: Ray = Caster::new()
            .ray(&PointerSample::from_ndc(Vec2::ZERO), &camera)
            .unwrap();
        assert!((ray.direction - Vec3::NEG_Z).length() < 1e-4);
    }

    #[test]
    fn test_from_options_orthographic() {
        let options = Options {
            projection: ProjectionMode::Orthographic,
            camera_position: Vec3::new(0.0, 0.0, 10.0),
            camera_target: Vec3::ZERO,
            fov_degrees: 90.0,
            ..Options::default()
        };
        let camera = Camera::from_options(&options, 1.0);
        assert_eq!(camera.projection_mode, ProjectionMode::Orthographic);
        assert!((camera.ortho_scale - 10.0).abs() < 1e-3);
    }

    #[test]
    fn test_orthographic_rays_are_parallel() {
        let mut camera = front_camera();
        camera.projection_mode = ProjectionMode::Orthographic;
        camera.ortho_scale = 2.0;
        let caster = Caster::new();
        let center = caster
            .ray(&PointerSample::from_ndc(Vec2::ZERO), &camera)
            .unwrap();
        let corner = caster
            .ray(&PointerSample::from_ndc(Vec2::new(1.0, 1.0)), &camera)
            .unwrap();
        assert!((center.direction - Vec3::NEG_Z).length() < 1e-4);
        assert!((corner.direction - Vec3::NEG_Z).length() < 1e-4);
        // Top-right corner sits half_width, half_height off the axis.
        let half_width = 2.0 * camera.aspect_ratio;
        assert!((corner.origin.x - half_width).abs() < 1e-3);
        assert!((corner.origin.y - 2.0).abs() < 1e-3);
    }

    #[test]
    fn test_zoom_orthographic_scales_view() {
        let mut camera = front_camera();
        camera.projection_mode = ProjectionMode::Orthographic;
        camera.ortho_scale = 2.0;
        camera.zoom(1.0);
        assert!(camera.ortho_scale < 2.0);
        assert!((camera.distance() - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_look_at_box_fits_every_corner() {
        let viewport = Viewport::from_size(800.0, 600.0).unwrap();
        let (min, max) = (Vec3::new(8.0, -1.0, -3.0), Vec3::new(12.0, 3.0, 1.0));
        let mut camera = front_camera();
        camera.look_at_box(min, max);

        assert_eq!(camera.target, Vec3::new(10.0, 1.0, -1.0));
        assert!((camera.forward() - Vec3::NEG_Z).length() < 1e-5);
        for i in 0..8 {
            let corner = Vec3::new(
                if i & 1 == 0 { min.x } else { max.x },
                if i & 2 == 0 { min.y } else { max.y },
                if i & 4 == 0 { min.z } else { max.z },
            );
            let pixel = camera.project(corner, &viewport).unwrap();
            assert!(viewport.contains(pixel), "corner {corner} at {pixel}");
        }
    }

    #[test]
    fn test_top_down_camera_stays_finite() {
        let mut camera = front_camera();
        camera.position = Vec3::new(0.0, 10.0, 0.0);
        let right = camera.right();
        assert!(right.is_finite());
        assert!(right.dot(camera.forward()).abs() < 1e-5);

        camera.pan(1.0, 1.0);
        assert!(camera.position.is_finite());
        assert!(camera.target.is_finite());
        assert!(camera.view_projection_matrix().is_finite());

        let viewport = Viewport::from_size(800.0, 600.0).unwrap();
        let pixel = camera.project(camera.target, &viewport).unwrap();
        assert!((pixel - Vec2::new(400.0, 300.0)).length() < 1e-2);
    }

    proptest! {
        #[test]
        fn prop_project_and_unproject_agree(
            x in -2.0f32..2.0,
            y in -1.5f32..1.5,
            z in -20.0f32..2.0,
        ) {
            let camera = front_camera();
            let viewport = Viewport::from_size(800.0, 600.0).unwrap();
            let point = Vec3::new(x, y, z);
            let pixel = camera.project(point, &viewport).unwrap();
            let sample = PointerSample::from_pixels(pixel, &viewport);
            let ray = Caster::new().ray(&sample, &camera).unwrap();
            let t = (point - ray.origin).dot(ray.direction);
            prop_assert!((ray.at(t) - point).length() < 1e-2);
        }
    }
}
