//! Scene registry for meshes and element models.
//!
//! The scene owns all geometry and hands out [`ObjectId`]s and [`ModelId`]s.
//! It is the collaborator the core picking logic talks to: it answers ray
//! queries, swaps materials and manages element subsets.

use std::collections::BTreeMap;

use glam::Vec3;
use pickscope_core::{
    ElementId, HighlightStyle, Intersection, Material, MaterialSwap, ModelId, ObjectId,
    PickscopeError, Ray, RayIntersector, Result, SubsetModels, SubsetRequest,
};

use crate::mesh::Mesh;
use crate::model::ElementModel;

/// What an object id refers to.
#[derive(Debug, Clone)]
pub enum SceneObject {
    /// A standalone rigid mesh.
    Mesh(Mesh),
    /// The geometry of an element model.
    Model(ModelId),
}

/// Registry of everything that can be drawn and picked.
#[derive(Debug, Default)]
pub struct Scene {
    next_object: u32,
    next_model: u32,
    objects: BTreeMap<ObjectId, SceneObject>,
    models: BTreeMap<ModelId, (ObjectId, ElementModel)>,
}

impl Scene {
    /// Creates a new empty scene.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a rigid mesh.
    pub fn add_mesh(&mut self, mesh: Mesh) -> Result<ObjectId> {
        mesh.validate()?;
        let id = self.allocate_object();
        log::debug!("added mesh '{}' as {id}", mesh.name());
        self.objects.insert(id, SceneObject::Mesh(mesh));
        Ok(id)
    }

    /// Adds an element model. Returns its model id and the id of its geometry.
    pub fn add_model(&mut self, model: ElementModel) -> (ModelId, ObjectId) {
        let model_id = ModelId(self.next_model);
        self.next_model += 1;
        let object_id = self.allocate_object();
        log::debug!("added model '{}' as {model_id} ({object_id})", model.name());
        self.objects.insert(object_id, SceneObject::Model(model_id));
        self.models.insert(model_id, (object_id, model));
        (model_id, object_id)
    }

    /// Removes an object. Removing a model's geometry removes the model.
    pub fn remove(&mut self, id: ObjectId) -> Option<SceneObject> {
        let removed = self.objects.remove(&id)?;
        if let SceneObject::Model(model_id) = &removed {
            self.models.remove(model_id);
        }
        log::debug!("removed {id}");
        Some(removed)
    }

    /// Removes everything.
    pub fn clear(&mut self) {
        self.objects.clear();
        self.models.clear();
    }

    #[must_use]
    pub fn contains(&self, id: ObjectId) -> bool {
        self.objects.contains_key(&id)
    }

    /// Returns the total number of objects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Returns the mesh behind an object id, model geometry included.
    #[must_use]
    pub fn mesh(&self, id: ObjectId) -> Option<&Mesh> {
        match self.objects.get(&id)? {
            SceneObject::Mesh(mesh) => Some(mesh),
            SceneObject::Model(model_id) => self.models.get(model_id).map(|(_, m)| m.mesh()),
        }
    }

    pub fn mesh_mut(&mut self, id: ObjectId) -> Option<&mut Mesh> {
        match self.objects.get_mut(&id)? {
            SceneObject::Mesh(mesh) => Some(mesh),
            SceneObject::Model(model_id) => {
                self.models.get_mut(model_id).map(|(_, m)| m.mesh_mut())
            }
        }
    }

    #[must_use]
    pub fn model(&self, id: ModelId) -> Option<&ElementModel> {
        self.models.get(&id).map(|(_, m)| m)
    }

    pub fn model_mut(&mut self, id: ModelId) -> Option<&mut ElementModel> {
        self.models.get_mut(&id).map(|(_, m)| m)
    }

    /// The object id of a model's geometry.
    #[must_use]
    pub fn model_object(&self, id: ModelId) -> Option<ObjectId> {
        self.models.get(&id).map(|(object, _)| *object)
    }

    /// Finds an object by mesh name.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<ObjectId> {
        self.objects
            .keys()
            .copied()
            .find(|id| self.mesh(*id).is_some_and(|mesh| mesh.name() == name))
    }

    /// Enabled standalone meshes, the candidates for whole-object picking.
    #[must_use]
    pub fn mesh_objects(&self) -> Vec<ObjectId> {
        self.objects
            .iter()
            .filter_map(|(id, object)| match object {
                SceneObject::Mesh(mesh) if mesh.is_enabled() => Some(*id),
                _ => None,
            })
            .collect()
    }

    /// Enabled model geometry, the candidates for element picking.
    #[must_use]
    pub fn model_objects(&self) -> Vec<ObjectId> {
        self.models
            .values()
            .filter(|(_, model)| model.mesh().is_enabled())
            .map(|(object, _)| *object)
            .collect()
    }

    /// All enabled objects.
    #[must_use]
    pub fn all_objects(&self) -> Vec<ObjectId> {
        self.objects
            .keys()
            .copied()
            .filter(|id| self.mesh(*id).is_some_and(Mesh::is_enabled))
            .collect()
    }

    /// Iterates over every object id with its mesh.
    pub fn iter(&self) -> impl Iterator<Item = (ObjectId, &Mesh)> {
        self.objects
            .keys()
            .filter_map(|id| self.mesh(*id).map(|mesh| (*id, mesh)))
    }

    /// Axis-aligned bounding box over all objects.
    #[must_use]
    pub fn bounding_box(&self) -> Option<(Vec3, Vec3)> {
        self.iter()
            .filter_map(|(_, mesh)| mesh.bounding_box())
            .reduce(|(min_a, max_a), (min_b, max_b)| (min_a.min(min_b), max_a.max(max_b)))
    }

    fn allocate_object(&mut self) -> ObjectId {
        let id = ObjectId(self.next_object);
        self.next_object += 1;
        id
    }
}

impl RayIntersector for Scene {
    fn intersect_ray(&self, ray: &Ray, candidates: &[ObjectId]) -> Vec<Intersection> {
        candidates
            .iter()
            .filter_map(|&object| {
                let mesh = self.mesh(object).filter(|mesh| mesh.is_enabled())?;
                let hit = mesh.intersect_ray(ray)?;
                Some(Intersection {
                    object,
                    point: hit.point,
                    distance: hit.distance,
                    face_index: Some(hit.face_index),
                })
            })
            .collect()
    }
}

impl MaterialSwap for Scene {
    fn swap_material(&mut self, object: ObjectId, material: Material) -> Result<Material> {
        let mesh = self
            .mesh_mut(object)
            .ok_or(PickscopeError::ObjectNotFound(object))?;
        Ok(mesh.replace_material(material))
    }
}

impl SubsetModels for Scene {
    fn owning_model(&self, object: ObjectId) -> Option<ModelId> {
        match self.objects.get(&object)? {
            SceneObject::Model(model_id) => Some(*model_id),
            SceneObject::Mesh(_) => None,
        }
    }

    fn element_id(&self, model: ModelId, face_index: usize) -> Option<ElementId> {
        self.model(model)?.element_at_face(face_index)
    }

    fn element_properties(
        &self,
        model: ModelId,
        element: ElementId,
    ) -> Option<serde_json::Value> {
        self.model(model)?.properties(element)
    }

    fn create_subset(&mut self, request: &SubsetRequest<'_>) -> Result<()> {
        let model = self
            .model_mut(request.model)
            .ok_or(PickscopeError::ModelNotFound(request.model))?;
        if let Some(element) = request.ids.iter().find(|id| !model.contains_element(**id)) {
            return Err(PickscopeError::UnknownElement {
                model: request.model,
                element: *element,
            });
        }
        model.create_subset(request.ids, request.style, request.remove_previous)
    }

    fn remove_subset(&mut self, model: ModelId, style: &HighlightStyle) -> bool {
        self.model_mut(model)
            .is_some_and(|model| model.remove_subset(style))
    }
}

#[cfg(test)]
mod tests {
    use glam::{Mat4, Vec3};
    use pickscope_core::color_from_hex;

    use super::*;

    fn scene_with_box_and_model() -> (Scene, ObjectId, ModelId, ObjectId) {
        let mut scene = Scene::new();
        let cube = scene
            .add_mesh(
                Mesh::cuboid("cube", Vec3::ONE)
                    .with_transform(Mat4::from_translation(Vec3::new(0.0, 0.0, 2.0))),
            )
            .unwrap();
        let mut faces = vec![ElementId(42); 6];
        faces.extend(vec![ElementId(99); 6]);
        let model = ElementModel::new(Mesh::cuboid("walls", Vec3::splat(2.0)), faces).unwrap();
        let (model_id, model_object) = scene.add_model(model);
        (scene, cube, model_id, model_object)
    }

    #[test]
    fn test_registry_bookkeeping() {
        let (mut scene, cube, model_id, model_object) = scene_with_box_and_model();
        assert_eq!(scene.len(), 2);
        assert_eq!(scene.mesh_objects(), vec![cube]);
        assert_eq!(scene.model_objects(), vec![model_object]);
        assert_eq!(scene.find("walls"), Some(model_object));
        assert_eq!(scene.owning_model(model_object), Some(model_id));
        assert_eq!(scene.owning_model(cube), None);

        scene.remove(model_object);
        assert!(scene.model(model_id).is_none());
        assert_eq!(scene.len(), 1);
    }

    #[test]
    fn test_ray_reports_every_candidate_hit() {
        let (scene, cube, _, model_object) = scene_with_box_and_model();
        let ray = Ray::new(Vec3::new(0.1, 0.2, 10.0), Vec3::NEG_Z).unwrap();
        let hits = scene.intersect_ray(&ray, &[cube, model_object]);
        assert_eq!(hits.len(), 2);
        assert!(hits.iter().all(|hit| hit.face_index.is_some()));

        let only_model = scene.intersect_ray(&ray, &[model_object]);
        assert_eq!(only_model.len(), 1);
        assert!((only_model[0].distance - 9.0).abs() < 1e-4);
    }

    #[test]
    fn test_disabled_meshes_are_not_hit() {
        let (mut scene, cube, _, _) = scene_with_box_and_model();
        scene.mesh_mut(cube).unwrap().set_enabled(false);
        let ray = Ray::new(Vec3::new(0.1, 0.2, 10.0), Vec3::NEG_Z).unwrap();
        assert!(scene.intersect_ray(&ray, &[cube]).is_empty());
        assert!(scene.mesh_objects().is_empty());
    }

    #[test]
    fn test_swap_material_on_missing_object() {
        let mut scene = Scene::new();
        assert!(matches!(
            scene.swap_material(ObjectId(5), Material::default()),
            Err(PickscopeError::ObjectNotFound(ObjectId(5)))
        ));
    }

    #[test]
    fn test_subsets_through_collaborator() {
        let (mut scene, _, model_id, _) = scene_with_box_and_model();
        let style = HighlightStyle::Overlay {
            color: color_from_hex(0xff00ff),
            opacity: 0.6,
            depth_test: false,
        };
        scene
            .create_subset(&SubsetRequest {
                model: model_id,
                ids: &[ElementId(42)],
                style: &style,
                remove_previous: true,
            })
            .unwrap();
        assert!(scene.model(model_id).unwrap().subset(&style).is_some());

        let err = scene
            .create_subset(&SubsetRequest {
                model: model_id,
                ids: &[ElementId(3)],
                style: &style,
                remove_previous: true,
            })
            .unwrap_err();
        assert!(matches!(err, PickscopeError::UnknownElement { .. }));

        assert!(scene.remove_subset(model_id, &style));
        assert!(!scene.remove_subset(ModelId(77), &style));
    }
}
