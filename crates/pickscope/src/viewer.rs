//! The viewer: one scene, one camera and the interaction state around them.

use std::path::Path;
use std::time::Instant;

use glam::{Vec2, Vec3};
use pickscope_core::highlight::{apply_subset_highlight, apply_swap_highlight, resolve_element};
use pickscope_core::{
    Annotation, AnnotationId, Annotations, CastResult, Caster, DoubleClickAction, ElementId,
    ElementRef, HighlightChange, Material, ModelId, ObjectId, Options, Result, SelectionRecord,
    SubsetChange, SubsetModels, TextPrompt, Viewport,
};
use pickscope_render::{Camera, FrameLoop, OrbitControls};
use pickscope_structures::{load_obj, LoadHandle, LoadKind, LoadResult, LoadState, Scene};

/// An annotation together with where it lands on screen this frame.
#[derive(Debug, Clone, Copy)]
pub struct LabelView<'a> {
    pub annotation: &'a Annotation,
    pub screen_position: Vec2,
}

/// Everything a presenter needs to draw one frame.
#[derive(Debug)]
pub struct Frame<'a> {
    pub scene: &'a Scene,
    pub camera: &'a Camera,
    pub viewport: Viewport,
    pub background_color: Vec3,
    /// Labels in front of the camera, in creation order.
    pub labels: Vec<LabelView<'a>>,
    pub loading: Option<&'a str>,
    pub delta_seconds: f32,
}

/// Draws frames. Implemented by whatever owns the GPU or terminal.
pub trait Presenter {
    fn present(&mut self, frame: &Frame<'_>);
}

impl<F> Presenter for F
where
    F: FnMut(&Frame<'_>),
{
    fn present(&mut self, frame: &Frame<'_>) {
        self(frame);
    }
}

/// Result of a pointer move on both follow-the-pointer channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerUpdate {
    pub hover: HighlightChange<ObjectId>,
    pub preselect: SubsetChange,
}

/// Result of a double click.
#[derive(Debug, Clone, PartialEq)]
pub enum DoubleClickOutcome {
    /// Nothing under the pointer, or the prompt was dismissed.
    Nothing,
    /// The select channel was cleared.
    Deselected(ModelId),
    /// An element was selected.
    Selected {
        element: ElementRef,
        properties: Option<serde_json::Value>,
    },
    /// An annotation was pinned at the hit point.
    Annotated(AnnotationId),
}

/// Interactive viewer state.
///
/// Three highlight channels are kept apart:
/// - hover swaps the material of rigid meshes
/// - preselect follows the pointer over element models
/// - select is set by double click over element models
pub struct Viewer {
    options: Options,
    scene: Scene,
    camera: Camera,
    controls: OrbitControls,
    viewport: Viewport,
    caster: Caster,
    frame_loop: FrameLoop,
    hover: SelectionRecord<ObjectId, Material>,
    preselect: SelectionRecord<ModelId, ElementId>,
    selection: SelectionRecord<ModelId, ElementId>,
    annotations: Annotations,
    loads: Vec<LoadHandle>,
    loading: Option<String>,
    load_failed: bool,
}

impl Viewer {
    /// Creates a viewer with an empty scene for a `width` x `height` canvas.
    pub fn new(options: Options, width: f32, height: f32) -> Result<Self> {
        options.validate()?;
        let viewport = Viewport::from_size(width, height)?;
        let camera = Camera::from_options(&options, viewport.aspect_ratio());
        let controls = OrbitControls::from_options(&options);
        let caster = Caster::new().with_first_hit_only(options.first_hit_only);

        Ok(Self {
            options,
            scene: Scene::new(),
            camera,
            controls,
            viewport,
            caster,
            frame_loop: FrameLoop::new(),
            hover: SelectionRecord::new(),
            preselect: SelectionRecord::new(),
            selection: SelectionRecord::new(),
            annotations: Annotations::new(),
            loads: Vec::new(),
            loading: None,
            load_failed: false,
        })
    }

    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    #[must_use]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    #[must_use]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn controls_mut(&mut self) -> &mut OrbitControls {
        &mut self.controls
    }

    #[must_use]
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    #[must_use]
    pub fn annotations(&self) -> &Annotations {
        &self.annotations
    }

    /// The mesh currently under the hover highlight.
    #[must_use]
    pub fn hovered(&self) -> Option<ObjectId> {
        self.hover.target().copied()
    }

    /// The element currently preselected.
    #[must_use]
    pub fn preselected(&self) -> Option<ElementRef> {
        channel_element(&self.preselect)
    }

    /// The element currently selected.
    #[must_use]
    pub fn selected(&self) -> Option<ElementRef> {
        channel_element(&self.selection)
    }

    /// Resizes the canvas; the camera follows the new aspect ratio.
    pub fn on_resize(&mut self, width: f32, height: f32) -> Result<()> {
        self.set_viewport(Viewport::from_size(width, height)?);
        Ok(())
    }

    /// Moves the canvas within the host window.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.camera.set_aspect_ratio(viewport.aspect_ratio());
        self.viewport = viewport;
        log::debug!("viewport now {}x{}", viewport.width(), viewport.height());
    }

    /// Casts from a pixel position against the given candidates.
    #[must_use]
    pub fn cast(&self, pixel: Vec2, candidates: &[ObjectId]) -> CastResult {
        self.caster
            .cast(pixel, &self.viewport, &self.camera, candidates, &self.scene)
    }

    /// Updates the hover and preselect channels for the pointer at `pixel`.
    pub fn on_pointer_move(&mut self, pixel: Vec2) -> Result<PointerUpdate> {
        let meshes = self.cast(pixel, &self.scene.mesh_objects());
        let hover = apply_swap_highlight(
            &meshes,
            &mut self.hover,
            &self.options.hover_style,
            &mut self.scene,
        )?;

        let models = self.cast(pixel, &self.scene.model_objects());
        let preselect = apply_subset_highlight(
            &models,
            &mut self.preselect,
            &self.options.preselect_style,
            &mut self.scene,
        )?;

        Ok(PointerUpdate { hover, preselect })
    }

    /// Handles a double click according to [`Options::double_click`].
    pub fn on_double_click<P>(&mut self, pixel: Vec2, prompt: &mut P) -> Result<DoubleClickOutcome>
    where
        P: TextPrompt + ?Sized,
    {
        match self.options.double_click {
            DoubleClickAction::Select => self.select_at(pixel),
            DoubleClickAction::Annotate => {
                let cast = self.cast(pixel, &self.scene.all_objects());
                Ok(match self.annotations.create_from_hit(&cast, prompt) {
                    Some(id) => DoubleClickOutcome::Annotated(id),
                    None => DoubleClickOutcome::Nothing,
                })
            }
        }
    }

    fn select_at(&mut self, pixel: Vec2) -> Result<DoubleClickOutcome> {
        let cast = self.cast(pixel, &self.scene.model_objects());
        let change = apply_subset_highlight(
            &cast,
            &mut self.selection,
            &self.options.select_style,
            &mut self.scene,
        )?;

        match change {
            SubsetChange::Removed(model) => Ok(DoubleClickOutcome::Deselected(model)),
            SubsetChange::Unchanged | SubsetChange::Replaced { .. } => {
                let Some(hit) = cast.nearest() else {
                    return Ok(DoubleClickOutcome::Nothing);
                };
                let element = resolve_element(hit, &self.scene)?;
                let properties = self
                    .scene
                    .element_properties(element.model, element.element);
                match &properties {
                    Some(props) => {
                        let pretty = serde_json::to_string_pretty(props)?;
                        log::info!("{} of {}:\n{pretty}", element.element, element.model);
                    }
                    None => log::info!("{} of {} has no properties", element.element, element.model),
                }
                Ok(DoubleClickOutcome::Selected {
                    element,
                    properties,
                })
            }
        }
    }

    /// Pins an annotation directly, without a prompt.
    pub fn annotate(&mut self, position: Vec3, text: impl Into<String>) -> AnnotationId {
        self.annotations.create(position, text)
    }

    pub fn on_label_enter(&mut self, id: AnnotationId) -> Result<()> {
        self.annotations.pointer_enter(id)
    }

    pub fn on_label_leave(&mut self, id: AnnotationId) -> Result<()> {
        self.annotations.pointer_leave(id)
    }

    /// Activates the delete control of a label.
    pub fn on_label_delete(&mut self, id: AnnotationId) -> Result<Annotation> {
        self.annotations.activate_delete(id)
    }

    /// Starts loading an OBJ file in the background.
    ///
    /// The asset is attached to the scene by a later [`Viewer::frame`].
    pub fn load_obj(&mut self, path: impl AsRef<Path>, kind: LoadKind) -> LoadResult<()> {
        let handle = load_obj(path, kind)?;
        self.loading = Some(loading_text(0.0));
        self.load_failed = false;
        self.loads.push(handle);
        Ok(())
    }

    /// Text of the loading indicator, if one is shown.
    ///
    /// A failed load leaves the indicator in place.
    #[must_use]
    pub fn loading_status(&self) -> Option<&str> {
        self.loading.as_deref()
    }

    /// Number of loads not yet attached or failed.
    #[must_use]
    pub fn pending_loads(&self) -> usize {
        self.loads.len()
    }

    /// Drains load events and attaches finished assets.
    ///
    /// The loading indicator is cleared once every load has been attached.
    /// After a failure it keeps its last progress until [`Viewer::load_obj`]
    /// or [`Viewer::cancel_loads`] is called.
    pub fn poll_loads(&mut self) {
        let mut still_pending = Vec::with_capacity(self.loads.len());
        let mut attached = false;
        for mut handle in std::mem::take(&mut self.loads) {
            let path = handle.path().to_path_buf();
            if let LoadState::Pending { fraction } = *handle.poll() {
                self.loading = Some(loading_text(fraction));
                still_pending.push(handle);
                continue;
            }

            if let Some(asset) = handle.take_asset() {
                match asset.attach(&mut self.scene) {
                    Ok(objects) => {
                        attached = true;
                        log::info!("attached {} object(s) from {}", objects.len(), path.display());
                    }
                    Err(err) => {
                        self.load_failed = true;
                        log::error!("could not attach {}: {err}", path.display());
                    }
                }
            } else if let LoadState::Failed(err) = handle.state() {
                self.load_failed = true;
                log::error!("failed to load {}: {err}", path.display());
            }
        }
        self.loads = still_pending;

        if attached && self.options.frame_on_load {
            self.frame_scene();
        }
        if self.loads.is_empty() && !self.load_failed {
            self.loading = None;
        }
    }

    /// Points the camera at the bounding box of the whole scene and drops
    /// queued control movement.
    ///
    /// Returns `false` for an empty scene, leaving the camera alone.
    pub fn frame_scene(&mut self) -> bool {
        let Some((min, max)) = self.scene.bounding_box() else {
            return false;
        };
        self.camera.look_at_box(min, max);
        self.controls.stop();
        true
    }

    /// Cancels every load still running and hides the indicator.
    pub fn cancel_loads(&mut self) {
        for handle in &mut self.loads {
            handle.cancel();
        }
        self.loads.clear();
        self.loading = None;
        self.load_failed = false;
    }

    pub fn start(&mut self) {
        self.frame_loop.start();
    }

    pub fn stop(&mut self) {
        self.frame_loop.stop();
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.frame_loop.is_running()
    }

    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frame_loop.frame_count()
    }

    /// Runs one frame: loads, controls, then presentation.
    ///
    /// Returns `false` without doing anything while the loop is stopped.
    pub fn frame<P>(&mut self, now: Instant, presenter: &mut P) -> bool
    where
        P: Presenter + ?Sized,
    {
        let Some(delta_seconds) = self.frame_loop.tick(now) else {
            return false;
        };

        self.poll_loads();
        self.controls.update(&mut self.camera, delta_seconds);

        let labels = self
            .annotations
            .iter()
            .filter_map(|annotation| {
                self.camera
                    .project(annotation.position(), &self.viewport)
                    .map(|screen_position| LabelView {
                        annotation,
                        screen_position,
                    })
            })
            .collect();

        presenter.present(&Frame {
            scene: &self.scene,
            camera: &self.camera,
            viewport: self.viewport,
            background_color: self.options.background_color,
            labels,
            loading: self.loading.as_deref(),
            delta_seconds,
        });
        true
    }
}

fn channel_element(record: &SelectionRecord<ModelId, ElementId>) -> Option<ElementRef> {
    Some(ElementRef {
        model: *record.target()?,
        element: *record.original()?,
    })
}

fn loading_text(fraction: f32) -> String {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let percent = (fraction.clamp(0.0, 1.0) * 100.0).floor() as u32;
    format!("Loading: {percent}%")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loading_text() {
        assert_eq!(loading_text(0.0), "Loading: 0%");
        assert_eq!(loading_text(0.425), "Loading: 42%");
        assert_eq!(loading_text(1.0), "Loading: 100%");
        assert_eq!(loading_text(3.0), "Loading: 100%");
    }

    #[test]
    fn test_new_rejects_bad_canvas() {
        assert!(Viewer::new(Options::default(), 0.0, 600.0).is_err());
    }

    #[test]
    fn test_resize_updates_camera_aspect() {
        let mut viewer = Viewer::new(Options::default(), 800.0, 600.0).unwrap();
        viewer.on_resize(1000.0, 500.0).unwrap();
        assert_eq!(viewer.viewport().width(), 1000.0);
        assert!((viewer.camera().aspect_ratio - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_stopped_viewer_does_not_present() {
        let mut viewer = Viewer::new(Options::default(), 800.0, 600.0).unwrap();
        let mut frames = 0;
        let mut count = |_: &Frame<'_>| frames += 1;
        assert!(!viewer.frame(Instant::now(), &mut count));
        viewer.start();
        assert!(viewer.frame(Instant::now(), &mut count));
        viewer.stop();
        assert!(!viewer.frame(Instant::now(), &mut count));
        assert_eq!(frames, 1);
    }
}
