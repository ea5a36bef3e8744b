//! Pointer-to-scene casting.
//!
//! The [`Caster`] turns a pixel position into a ray through the camera and
//! asks a [`RayIntersector`] which candidate objects it crosses. It keeps no
//! state between calls: the same inputs against an unchanged scene always
//! produce the same [`CastResult`].

use glam::{Mat4, Vec2, Vec3};

use crate::id::ObjectId;
use crate::pointer::{PointerSample, Viewport};
use crate::ray::Ray;

/// One crossing between a ray and a candidate object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    /// The object that was hit.
    pub object: ObjectId,
    /// World-space hit point.
    pub point: Vec3,
    /// Distance from the ray origin.
    pub distance: f32,
    /// Index of the hit face, for geometry whose faces map to elements.
    pub face_index: Option<usize>,
}

/// Intersections ordered nearest-first. Empty means nothing was hit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CastResult {
    hits: Vec<Intersection>,
}

impl CastResult {
    /// A result with no hits.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a result from hits in any order.
    #[must_use]
    pub fn from_hits(mut hits: Vec<Intersection>) -> Self {
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        Self { hits }
    }

    /// Returns the nearest hit, if any.
    #[must_use]
    pub fn nearest(&self) -> Option<&Intersection> {
        self.hits.first()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.hits.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Intersection> {
        self.hits.iter()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Intersection] {
        &self.hits
    }

    fn truncate(&mut self, len: usize) {
        self.hits.truncate(len);
    }
}

/// Geometry collaborator: tests a ray against a set of candidate objects.
///
/// Implementations may return hits in any order and may skip candidates they
/// do not know; the caster sorts the output.
pub trait RayIntersector {
    fn intersect_ray(&self, ray: &Ray, candidates: &[ObjectId]) -> Vec<Intersection>;
}

/// Anything that can provide the current view-projection transform.
///
/// Implemented by the render crate's camera; kept as a trait here so the
/// caster does not depend on a concrete camera type.
pub trait CameraProjection {
    fn view_projection_matrix(&self) -> Mat4;
}

/// Converts pointer positions into sorted ray casts.
#[derive(Debug, Clone, Copy, Default)]
pub struct Caster {
    first_hit_only: bool,
}

impl Caster {
    /// Creates a caster that reports every intersection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Keeps only the nearest hit of every cast.
    #[must_use]
    pub fn with_first_hit_only(mut self, first_hit_only: bool) -> Self {
        self.first_hit_only = first_hit_only;
        self
    }

    #[must_use]
    pub fn first_hit_only(&self) -> bool {
        self.first_hit_only
    }

    /// Builds the world-space ray under a pointer sample.
    #[must_use]
    pub fn ray<C>(&self, sample: &PointerSample, camera: &C) -> Option<Ray>
    where
        C: CameraProjection + ?Sized,
    {
        Ray::from_ndc(sample.ndc(), camera.view_projection_matrix().inverse())
    }

    /// Casts from a pixel position into the candidate set.
    ///
    /// An empty candidate set, a pixel outside the viewport, or a camera
    /// whose transform cannot be inverted yields an empty result.
    pub fn cast<C, G>(
        &self,
        pixel: Vec2,
        viewport: &Viewport,
        camera: &C,
        candidates: &[ObjectId],
        geometry: &G,
    ) -> CastResult
    where
        C: CameraProjection + ?Sized,
        G: RayIntersector + ?Sized,
    {
        if candidates.is_empty() || !viewport.contains(pixel) {
            return CastResult::empty();
        }

        let sample = PointerSample::from_pixels(pixel, viewport);
        let Some(ray) = self.ray(&sample, camera) else {
            log::debug!("degenerate camera transform, no ray for {:?}", sample.ndc());
            return CastResult::empty();
        };

        self.cast_ray(&ray, candidates, geometry)
    }

    /// Casts an already built ray into the candidate set.
    pub fn cast_ray<G>(&self, ray: &Ray, candidates: &[ObjectId], geometry: &G) -> CastResult
    where
        G: RayIntersector + ?Sized,
    {
        if candidates.is_empty() {
            return CastResult::empty();
        }

        let mut result = CastResult::from_hits(geometry.intersect_ray(ray, candidates));
        if self.first_hit_only {
            result.truncate(1);
        }
        result
    }
}
