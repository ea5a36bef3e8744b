//! Making hits visible.
//!
//! Two strategies are supported:
//! - [`apply_swap_highlight`] swaps the material of the whole hit object,
//!   suited for hover previews over rigid meshes.
//! - [`apply_subset_highlight`] asks the model collaborator to draw a subset
//!   containing only the hit element, suited for composite models whose faces
//!   map to addressable elements.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::{PickscopeError, Result};
use crate::id::{ElementId, ModelId, ObjectId};
use crate::material::{Material, Shading};
use crate::pick::{CastResult, Intersection};
use crate::selection::{Highlighted, SelectionRecord};

/// The closed set of looks a highlight can take.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HighlightStyle {
    /// Opaque, unlit color.
    Flat { color: Vec3 },
    /// Translucent lit color drawn over the original geometry.
    Overlay {
        color: Vec3,
        opacity: f32,
        depth_test: bool,
    },
}

impl HighlightStyle {
    /// The material a highlighted surface is drawn with.
    #[must_use]
    pub fn material(&self) -> Material {
        match *self {
            HighlightStyle::Flat { color } => Material::basic(color),
            HighlightStyle::Overlay {
                color,
                opacity,
                depth_test,
            } => Material {
                color,
                opacity,
                transparent: true,
                depth_test,
                shading: Shading::Lambert,
            },
        }
    }

    /// Hashable key identifying this style, used to address subsets.
    ///
    /// Equal styles produce equal keys.
    #[must_use]
    pub fn key(&self) -> StyleKey {
        let bits = |v: Vec3| [v.x.to_bits(), v.y.to_bits(), v.z.to_bits()];
        match *self {
            HighlightStyle::Flat { color } => StyleKey {
                color: bits(color),
                opacity: 1.0f32.to_bits(),
                overlay: false,
                depth_test: true,
            },
            HighlightStyle::Overlay {
                color,
                opacity,
                depth_test,
            } => StyleKey {
                color: bits(color),
                opacity: opacity.to_bits(),
                overlay: true,
                depth_test,
            },
        }
    }
}

/// Bit-exact key of a [`HighlightStyle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StyleKey {
    color: [u32; 3],
    opacity: u32,
    overlay: bool,
    depth_test: bool,
}

/// Scene collaborator for whole-object material swaps.
pub trait MaterialSwap {
    /// Replaces the material of `object`, returning the one it had.
    fn swap_material(&mut self, object: ObjectId, material: Material) -> Result<Material>;
}

/// What a whole-object highlight pass changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HighlightChange<T> {
    /// Nothing was touched.
    Unchanged,
    /// The previous target was restored and nothing is highlighted now.
    Cleared(T),
    /// `current` is now highlighted; `previous` was restored first.
    Highlighted { previous: Option<T>, current: T },
}

/// Whole-object swap highlight.
///
/// - Empty cast: restore and clear whatever the channel holds.
/// - Same top hit as before: nothing happens.
/// - New top hit: restore the old target, then swap in the style's material
///   and record the material it replaced.
pub fn apply_swap_highlight<S>(
    cast: &CastResult,
    record: &mut SelectionRecord<ObjectId, Material>,
    style: &HighlightStyle,
    scene: &mut S,
) -> Result<HighlightChange<ObjectId>>
where
    S: MaterialSwap + ?Sized,
{
    let Some(hit) = cast.nearest() else {
        return Ok(match restore(record, scene) {
            Some(target) => HighlightChange::Cleared(target),
            None => HighlightChange::Unchanged,
        });
    };

    if record.is_same_target(&hit.object) {
        return Ok(HighlightChange::Unchanged);
    }

    let previous = restore(record, scene);
    let original = scene.swap_material(hit.object, style.material())?;
    record.record_highlight(hit.object, original)?;
    log::debug!("highlighted {} (previous: {previous:?})", hit.object);

    Ok(HighlightChange::Highlighted {
        previous,
        current: hit.object,
    })
}

/// Clears the channel and puts the stored material back.
///
/// The record is reset even if the object has since left the scene.
fn restore<S>(record: &mut SelectionRecord<ObjectId, Material>, scene: &mut S) -> Option<ObjectId>
where
    S: MaterialSwap + ?Sized,
{
    let Highlighted { target, original } = record.clear_highlight()?;
    if let Err(err) = scene.swap_material(target, original) {
        log::warn!("could not restore material of {target}: {err}");
    }
    Some(target)
}

/// One element of one composite model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementRef {
    pub model: ModelId,
    pub element: ElementId,
}

/// Request to draw a subset of a model in a highlight style.
#[derive(Debug, Clone, Copy)]
pub struct SubsetRequest<'a> {
    pub model: ModelId,
    pub ids: &'a [ElementId],
    pub style: &'a HighlightStyle,
    /// Drop any earlier subset of this model drawn with the same style.
    pub remove_previous: bool,
}

/// Model collaborator for element-addressable composite models.
pub trait SubsetModels {
    /// Returns the model the object's geometry belongs to.
    fn owning_model(&self, object: ObjectId) -> Option<ModelId>;

    /// Resolves a face of a model's geometry to its element.
    fn element_id(&self, model: ModelId, face_index: usize) -> Option<ElementId>;

    /// Returns descriptive properties of an element, for inspection.
    fn element_properties(&self, model: ModelId, element: ElementId)
        -> Option<serde_json::Value>;

    /// Creates (or replaces) a subset visualization.
    fn create_subset(&mut self, request: &SubsetRequest<'_>) -> Result<()>;

    /// Removes the subset of `model` drawn with `style`.
    ///
    /// Returns whether there was one to remove.
    fn remove_subset(&mut self, model: ModelId, style: &HighlightStyle) -> bool;
}

/// Resolves a hit to the model element under it.
pub fn resolve_element<M>(hit: &Intersection, models: &M) -> Result<ElementRef>
where
    M: SubsetModels + ?Sized,
{
    let model = models
        .owning_model(hit.object)
        .ok_or(PickscopeError::NotAModelObject(hit.object))?;
    let face = hit
        .face_index
        .ok_or(PickscopeError::MissingFaceIndex(hit.object))?;
    let element = models
        .element_id(model, face)
        .ok_or(PickscopeError::ElementNotFound { model, face })?;
    Ok(ElementRef { model, element })
}

/// What a subset highlight pass changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubsetChange {
    /// Nothing was touched.
    Unchanged,
    /// The channel's subset on this model was removed.
    Removed(ModelId),
    /// A one-element subset now shows `element`.
    Replaced {
        element: ElementRef,
        previous_model: Option<ModelId>,
    },
}

/// Element subset highlight.
///
/// The channel records the model that owns the shown subset, along with the
/// element it contains.
///
/// - Empty cast: remove the subset of the recorded model (addressed by model
///   and style, not by element) and clear the channel.
/// - Hit: resolve the element and draw a one-element subset, replacing the
///   previous subset of that model for this style.
///
/// A subset left on a *different* model when the channel moves on is not
/// removed; a warning is logged when that happens.
pub fn apply_subset_highlight<M>(
    cast: &CastResult,
    record: &mut SelectionRecord<ModelId, ElementId>,
    style: &HighlightStyle,
    models: &mut M,
) -> Result<SubsetChange>
where
    M: SubsetModels + ?Sized,
{
    let Some(hit) = cast.nearest() else {
        let Some(Highlighted { target: model, .. }) = record.clear_highlight() else {
            return Ok(SubsetChange::Unchanged);
        };
        if !models.remove_subset(model, style) {
            log::debug!("no subset to remove on {model}");
        }
        return Ok(SubsetChange::Removed(model));
    };

    let element = resolve_element(hit, models)?;
    if record.is_same_target(&element.model) && record.original() == Some(&element.element) {
        return Ok(SubsetChange::Unchanged);
    }

    models.create_subset(&SubsetRequest {
        model: element.model,
        ids: &[element.element],
        style,
        remove_previous: true,
    })?;

    let previous_model = record.clear_highlight().map(|h| h.target);
    if let Some(stale) = previous_model.filter(|m| *m != element.model) {
        log::warn!("subset on {stale} left in place while highlighting {}", element.model);
    }
    record.record_highlight(element.model, element.element)?;
    log::debug!("subset of {} now shows {}", element.model, element.element);

    Ok(SubsetChange::Replaced {
        element,
        previous_model,
    })
}
