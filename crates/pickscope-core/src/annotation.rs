//! Text labels pinned to points in the scene.
//!
//! An annotation is created from a double-click hit and a line of text the
//! user types in. Its on-screen container carries a delete control that is
//! only shown while the pointer is over the container. Annotations are
//! removed only through that control.

use std::collections::BTreeMap;

use glam::Vec3;

use crate::error::{PickscopeError, Result};
use crate::id::AnnotationId;
use crate::pick::CastResult;

/// Host collaborator that asks the user for a line of text.
///
/// Returns `None` when the user dismisses the prompt.
pub trait TextPrompt {
    fn prompt(&mut self, message: &str) -> Option<String>;
}

impl<F> TextPrompt for F
where
    F: FnMut(&str) -> Option<String>,
{
    fn prompt(&mut self, message: &str) -> Option<String> {
        self(message)
    }
}

/// A label anchored at a fixed world-space point.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    id: AnnotationId,
    text: String,
    position: Vec3,
    delete_visible: bool,
}

impl Annotation {
    #[must_use]
    pub fn id(&self) -> AnnotationId {
        self.id
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// World-space anchor point.
    #[must_use]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Whether the delete control is currently shown.
    #[must_use]
    pub fn is_delete_visible(&self) -> bool {
        self.delete_visible
    }
}

/// All live annotations, in creation order.
#[derive(Debug, Default)]
pub struct Annotations {
    next_id: u32,
    labels: BTreeMap<AnnotationId, Annotation>,
}

impl Annotations {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pins `text` at `position`. The delete control starts hidden.
    pub fn create(&mut self, position: Vec3, text: impl Into<String>) -> AnnotationId {
        let id = AnnotationId(self.next_id);
        self.next_id += 1;
        let text = text.into();
        log::info!("{id} created at {position} with text {text:?}");
        self.labels.insert(
            id,
            Annotation {
                id,
                text,
                position,
                delete_visible: false,
            },
        );
        id
    }

    /// Creates an annotation at the nearest hit, asking for its text.
    ///
    /// Returns `None` if nothing was hit or the prompt was dismissed.
    pub fn create_from_hit<P>(&mut self, cast: &CastResult, prompt: &mut P) -> Option<AnnotationId>
    where
        P: TextPrompt + ?Sized,
    {
        let hit = cast.nearest()?;
        let Some(text) = prompt.prompt("Write message") else {
            log::debug!("annotation prompt dismissed");
            return None;
        };
        Some(self.create(hit.point, text))
    }

    #[must_use]
    pub fn get(&self, id: AnnotationId) -> Option<&Annotation> {
        self.labels.get(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Annotation> {
        self.labels.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// The pointer entered the label container: show the delete control.
    pub fn pointer_enter(&mut self, id: AnnotationId) -> Result<()> {
        self.get_mut(id)?.delete_visible = true;
        Ok(())
    }

    /// The pointer left the label container: hide the delete control.
    pub fn pointer_leave(&mut self, id: AnnotationId) -> Result<()> {
        self.get_mut(id)?.delete_visible = false;
        Ok(())
    }

    /// Activates the delete control, detaching and returning the annotation.
    ///
    /// A hidden control cannot be activated.
    pub fn activate_delete(&mut self, id: AnnotationId) -> Result<Annotation> {
        if !self.get_mut(id)?.delete_visible {
            return Err(PickscopeError::DeleteHidden(id));
        }
        let removed = self
            .labels
            .remove(&id)
            .ok_or(PickscopeError::AnnotationNotFound(id))?;
        log::info!("{id} deleted");
        Ok(removed)
    }

    fn get_mut(&mut self, id: AnnotationId) -> Result<&mut Annotation> {
        self.labels
            .get_mut(&id)
            .ok_or(PickscopeError::AnnotationNotFound(id))
    }
}
