//! Rays in world space and the primitive intersection tests built on them.

use glam::{Mat4, Vec2, Vec3, Vec4};

/// A half-line with a unit-length direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Start point in world space.
    pub origin: Vec3,
    /// Unit direction.
    pub direction: Vec3,
}

impl Ray {
    /// Creates a ray, normalizing `direction`.
    ///
    /// Returns `None` if the direction is (close to) zero or the origin is
    /// not finite.
    #[must_use]
    pub fn new(origin: Vec3, direction: Vec3) -> Option<Self> {
        if !origin.is_finite() {
            return None;
        }
        let direction = direction.normalize_or_zero();
        if direction.length_squared() < 1e-12 {
            return None;
        }
        Some(Self { origin, direction })
    }

    /// Unprojects a normalized device coordinate through the inverse
    /// view-projection matrix.
    ///
    /// Uses `[0, 1]` clip depth, matching glam's `*_rh` projections. The ray
    /// starts on the near plane and points at the far plane, so it works for
    /// both perspective and orthographic cameras.
    #[must_use]
    pub fn from_ndc(ndc: Vec2, inverse_view_projection: Mat4) -> Option<Self> {
        let near = inverse_view_projection * Vec4::new(ndc.x, ndc.y, 0.0, 1.0);
        let far = inverse_view_projection * Vec4::new(ndc.x, ndc.y, 1.0, 1.0);

        if near.w.abs() < 1e-6 || far.w.abs() < 1e-6 {
            return None;
        }

        let origin = near.truncate() / near.w;
        let far = far.truncate() / far.w;
        Self::new(origin, far - origin)
    }

    /// Returns the point at distance `t` along the ray.
    #[must_use]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Moller-Trumbore ray/triangle test. Returns the distance to the hit.
    ///
    /// Both faces count as hits.
    #[must_use]
    pub fn intersect_triangle(&self, v0: Vec3, v1: Vec3, v2: Vec3) -> Option<f32> {
        let eps = 1e-6;
        let edge1 = v1 - v0;
        let edge2 = v2 - v0;
        let h = self.direction.cross(edge2);
        let a = edge1.dot(h);
        if a.abs() < eps {
            return None;
        }
        let f = 1.0 / a;
        let s = self.origin - v0;
        let u = f * s.dot(h);
        if !(0.0..=1.0).contains(&u) {
            return None;
        }
        let q = s.cross(edge1);
        let v = f * self.direction.dot(q);
        if v < 0.0 || u + v > 1.0 {
            return None;
        }
        let t = f * edge2.dot(q);
        (t > eps).then_some(t)
    }

    /// Slab test against an axis-aligned box.
    ///
    /// Returns the entry distance, or `0.0` when the origin is inside the box.
    #[must_use]
    pub fn intersect_aabb(&self, min: Vec3, max: Vec3) -> Option<f32> {
        let inv = self.direction.recip();
        let t0 = (min - self.origin) * inv;
        let t1 = (max - self.origin) * inv;
        let t_near = t0.min(t1).max_element();
        let t_far = t0.max(t1).min_element();
        if t_far < 0.0 || t_near > t_far {
            return None;
        }
        Some(t_near.max(0.0))
    }
}
