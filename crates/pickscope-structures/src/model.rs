//! Composite models whose faces belong to addressable elements.
//!
//! An [`ElementModel`] is one mesh plus a per-face element id. Elements carry
//! descriptive properties and can be drawn again as a styled [`Subset`], which
//! is how element highlights are shown without touching the base geometry.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use pickscope_core::{ElementId, HighlightStyle, Material, PickscopeError, Result, StyleKey};

use crate::mesh::Mesh;

/// A styled partial view of a model.
#[derive(Debug, Clone, PartialEq)]
pub struct Subset {
    /// Elements drawn by this subset.
    pub ids: BTreeSet<ElementId>,
    /// Material the subset is drawn with.
    pub material: Material,
}

/// A mesh whose faces are grouped into elements.
#[derive(Debug, Clone)]
pub struct ElementModel {
    mesh: Mesh,
    face_elements: Vec<ElementId>,
    properties: BTreeMap<ElementId, serde_json::Value>,
    subsets: HashMap<StyleKey, Subset>,
}

impl ElementModel {
    /// Creates a model from its geometry and one element id per face.
    pub fn new(mesh: Mesh, face_elements: Vec<ElementId>) -> Result<Self> {
        mesh.validate()?;
        if face_elements.len() != mesh.num_faces() {
            return Err(PickscopeError::InvalidGeometry(format!(
                "model '{}' has {} faces but {} face elements",
                mesh.name(),
                mesh.num_faces(),
                face_elements.len()
            )));
        }
        Ok(Self {
            mesh,
            face_elements,
            properties: BTreeMap::new(),
            subsets: HashMap::new(),
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        self.mesh.name()
    }

    #[must_use]
    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    pub fn mesh_mut(&mut self) -> &mut Mesh {
        &mut self.mesh
    }

    /// Returns the element a face belongs to.
    #[must_use]
    pub fn element_at_face(&self, face_index: usize) -> Option<ElementId> {
        self.face_elements.get(face_index).copied()
    }

    /// All distinct elements of the model.
    #[must_use]
    pub fn element_ids(&self) -> BTreeSet<ElementId> {
        self.face_elements.iter().copied().collect()
    }

    #[must_use]
    pub fn contains_element(&self, element: ElementId) -> bool {
        self.face_elements.contains(&element)
    }

    /// Faces that make up an element.
    #[must_use]
    pub fn faces_of(&self, element: ElementId) -> Vec<usize> {
        self.face_elements
            .iter()
            .enumerate()
            .filter_map(|(face, id)| (*id == element).then_some(face))
            .collect()
    }

    /// Attaches descriptive properties to an element.
    pub fn set_properties(&mut self, element: ElementId, properties: serde_json::Value) {
        self.properties.insert(element, properties);
    }

    /// Returns the properties of an element.
    ///
    /// Elements without explicit properties still report their id.
    #[must_use]
    pub fn properties(&self, element: ElementId) -> Option<serde_json::Value> {
        if !self.contains_element(element) {
            return None;
        }
        Some(
            self.properties
                .get(&element)
                .cloned()
                .unwrap_or_else(|| serde_json::json!({ "expressID": element.get() })),
        )
    }

    /// Draws `ids` as a subset in `style`.
    ///
    /// With `remove_previous` the ids replace the subset of the same style;
    /// otherwise they are added to it.
    pub fn create_subset(
        &mut self,
        ids: &[ElementId],
        style: &HighlightStyle,
        remove_previous: bool,
    ) -> Result<()> {
        if let Some(unknown) = ids.iter().find(|id| !self.contains_element(**id)) {
            return Err(PickscopeError::InvalidGeometry(format!(
                "model '{}' has no {unknown}",
                self.name()
            )));
        }

        let subset = self.subsets.entry(style.key()).or_insert_with(|| Subset {
            ids: BTreeSet::new(),
            material: style.material(),
        });
        if remove_previous {
            subset.ids.clear();
        }
        subset.ids.extend(ids.iter().copied());
        Ok(())
    }

    /// Removes the subset drawn in `style`. Returns whether one existed.
    pub fn remove_subset(&mut self, style: &HighlightStyle) -> bool {
        self.subsets.remove(&style.key()).is_some()
    }

    /// Returns the subset drawn in `style`.
    #[must_use]
    pub fn subset(&self, style: &HighlightStyle) -> Option<&Subset> {
        self.subsets.get(&style.key())
    }

    pub fn subsets(&self) -> impl Iterator<Item = &Subset> {
        self.subsets.values()
    }

    /// Faces drawn by the subset in `style`.
    #[must_use]
    pub fn subset_faces(&self, style: &HighlightStyle) -> Vec<usize> {
        let Some(subset) = self.subset(style) else {
            return Vec::new();
        };
        self.face_elements
            .iter()
            .enumerate()
            .filter_map(|(face, id)| subset.ids.contains(id).then_some(face))
            .collect()
    }
}
