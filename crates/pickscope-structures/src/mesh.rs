//! Rigid triangle meshes.

use glam::{Mat4, UVec3, Vec3};
use pickscope_core::{Material, PickscopeError, Ray, Result};

/// Nearest crossing between a ray and a mesh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshHit {
    pub distance: f32,
    pub face_index: usize,
    pub point: Vec3,
}

/// A triangle mesh with a transform and a single material.
#[derive(Debug, Clone)]
pub struct Mesh {
    name: String,
    vertices: Vec<Vec3>,
    triangles: Vec<UVec3>,
    transform: Mat4,
    material: Material,
    enabled: bool,
}

impl Mesh {
    /// Creates a new mesh.
    pub fn new(name: impl Into<String>, vertices: Vec<Vec3>, triangles: Vec<UVec3>) -> Self {
        Self {
            name: name.into(),
            vertices,
            triangles,
            transform: Mat4::IDENTITY,
            material: Material::default(),
            enabled: true,
        }
    }

    /// An axis-aligned box of the given edge lengths, centered at the origin.
    pub fn cuboid(name: impl Into<String>, size: Vec3) -> Self {
        let h = size * 0.5;
        let vertices = vec![
            Vec3::new(-h.x, -h.y, -h.z),
            Vec3::new(h.x, -h.y, -h.z),
            Vec3::new(h.x, h.y, -h.z),
            Vec3::new(-h.x, h.y, -h.z),
            Vec3::new(-h.x, -h.y, h.z),
            Vec3::new(h.x, -h.y, h.z),
            Vec3::new(h.x, h.y, h.z),
            Vec3::new(-h.x, h.y, h.z),
        ];
        let triangles = vec![
            // -Z
            UVec3::new(0, 2, 1),
            UVec3::new(0, 3, 2),
            // +Z
            UVec3::new(4, 5, 6),
            UVec3::new(4, 6, 7),
            // -X
            UVec3::new(0, 4, 7),
            UVec3::new(0, 7, 3),
            // +X
            UVec3::new(1, 2, 6),
            UVec3::new(1, 6, 5),
            // -Y
            UVec3::new(0, 1, 5),
            UVec3::new(0, 5, 4),
            // +Y
            UVec3::new(3, 7, 6),
            UVec3::new(3, 6, 2),
        ];
        Self::new(name, vertices, triangles)
    }

    /// Sets the material, builder style.
    #[must_use]
    pub fn with_material(mut self, material: Material) -> Self {
        self.material = material;
        self
    }

    /// Sets the transform, builder style.
    #[must_use]
    pub fn with_transform(mut self, transform: Mat4) -> Self {
        self.transform = transform;
        self
    }

    /// Checks that every triangle references existing vertices.
    pub fn validate(&self) -> Result<()> {
        let count = self.vertices.len();
        if let Some((face, tri)) = self
            .triangles
            .iter()
            .enumerate()
            .find(|(_, tri)| tri.max_element() as usize >= count)
        {
            return Err(PickscopeError::InvalidGeometry(format!(
                "mesh '{}': face {face} references vertex {} but only {count} exist",
                self.name,
                tri.max_element()
            )));
        }
        Ok(())
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    #[must_use]
    pub fn triangles(&self) -> &[UVec3] {
        &self.triangles
    }

    #[must_use]
    pub fn num_faces(&self) -> usize {
        self.triangles.len()
    }

    #[must_use]
    pub fn transform(&self) -> Mat4 {
        self.transform
    }

    pub fn set_transform(&mut self, transform: Mat4) {
        self.transform = transform;
    }

    #[must_use]
    pub fn material(&self) -> &Material {
        &self.material
    }

    /// Replaces the material, returning the previous one.
    pub fn replace_material(&mut self, material: Material) -> Material {
        std::mem::replace(&mut self.material, material)
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// World-space vertex positions.
    #[must_use]
    pub fn world_vertices(&self) -> Vec<Vec3> {
        self.vertices
            .iter()
            .map(|v| self.transform.transform_point3(*v))
            .collect()
    }

    /// Returns the world-space axis-aligned bounding box.
    ///
    /// Returns `None` for a mesh without vertices.
    #[must_use]
    pub fn bounding_box(&self) -> Option<(Vec3, Vec3)> {
        let mut points = self
            .vertices
            .iter()
            .map(|v| self.transform.transform_point3(*v));
        let first = points.next()?;
        Some(points.fold((first, first), |(min, max), p| (min.min(p), max.max(p))))
    }

    /// Finds the nearest face the ray crosses.
    ///
    /// The bounding box is tested first so most misses never touch the
    /// triangles. Faces that index past the vertex list are skipped.
    #[must_use]
    pub fn intersect_ray(&self, ray: &Ray) -> Option<MeshHit> {
        let (min, max) = self.bounding_box()?;
        ray.intersect_aabb(min, max)?;

        let world = self.world_vertices();
        let mut best: Option<(f32, usize)> = None;
        for (face_index, tri) in self.triangles.iter().enumerate() {
            let (Some(&a), Some(&b), Some(&c)) = (
                world.get(tri.x as usize),
                world.get(tri.y as usize),
                world.get(tri.z as usize),
            ) else {
                continue;
            };
            let Some(t) = ray.intersect_triangle(a, b, c) else {
                continue;
            };
            if best.map_or(true, |(best_t, _)| t < best_t) {
                best = Some((t, face_index));
            }
        }

        best.map(|(distance, face_index)| MeshHit {
            distance,
            face_index,
            point: ray.at(distance),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_cuboid_bounds() {
        let mesh = Mesh::cuboid("box", Vec3::new(2.0, 4.0, 6.0));
        mesh.validate().unwrap();
        let (min, max) = mesh.bounding_box().unwrap();
        assert_eq!(min, Vec3::new(-1.0, -2.0, -3.0));
        assert_eq!(max, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_validate_rejects_bad_index() {
        let mesh = Mesh::new("bad", vec![Vec3::ZERO, Vec3::X], vec![UVec3::new(0, 1, 2)]);
        assert!(matches!(
            mesh.validate(),
            Err(PickscopeError::InvalidGeometry(_))
        ));
    }

    #[test]
    fn test_ray_skips_faces_with_bad_indices() {
        let vertices = vec![
            Vec3::new(-1.0, -1.0, 0.0),
            Vec3::new(1.0, -1.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        ];
        let ray = Ray::new(Vec3::new(0.1, 0.2, 5.0), Vec3::NEG_Z).unwrap();

        let broken = Mesh::new("broken", vertices.clone(), vec![UVec3::new(0, 1, 7)]);
        assert!(broken.intersect_ray(&ray).is_none());

        let mixed = Mesh::new(
            "mixed",
            vertices,
            vec![UVec3::new(9, 1, 2), UVec3::new(0, 1, 2)],
        );
        let hit = mixed.intersect_ray(&ray).unwrap();
        assert_eq!(hit.face_index, 1);
        assert!((hit.distance - 5.0).abs() < 1e-4);
    }

    #[test]
    fn test_ray_hits_front_face_of_translated_box() {
        let mesh = Mesh::cuboid("box", Vec3::ONE)
            .with_transform(Mat4::from_translation(Vec3::new(0.0, 0.0, -3.0)));
        let ray = Ray::new(Vec3::new(0.1, 0.2, 5.0), Vec3::NEG_Z).unwrap();
        let hit = mesh.intersect_ray(&ray).unwrap();
        assert!((hit.distance - 7.5).abs() < 1e-4);
        assert!((hit.point.z + 2.5).abs() < 1e-4);
        // Faces 2 and 3 make up the +Z side.
        assert!(hit.face_index == 2 || hit.face_index == 3);
    }

    #[test]
    fn test_ray_misses() {
        let mesh = Mesh::cuboid("box", Vec3::ONE);
        let ray = Ray::new(Vec3::new(3.0, 0.0, 5.0), Vec3::NEG_Z).unwrap();
        assert!(mesh.intersect_ray(&ray).is_none());
    }

    #[test]
    fn test_replace_material_returns_previous() {
        let mut mesh = Mesh::cuboid("box", Vec3::ONE).with_material(Material::lambert(Vec3::X));
        let previous = mesh.replace_material(Material::basic(Vec3::Y));
        assert_eq!(previous, Material::lambert(Vec3::X));
        assert_eq!(*mesh.material(), Material::basic(Vec3::Y));
    }

    proptest! {
        #[test]
        fn prop_rays_into_front_face_hit_it(x in -0.45f32..0.45, y in -0.45f32..0.45) {
            let mesh = Mesh::cuboid("box", Vec3::ONE);
            let ray = Ray::new(Vec3::new(x, y, 5.0), Vec3::NEG_Z).unwrap();
            let hit = mesh.intersect_ray(&ray).unwrap();
            prop_assert!((hit.distance - 4.5).abs() < 1e-4);
            prop_assert!(hit.face_index == 2 || hit.face_index == 3);
        }
    }
}
