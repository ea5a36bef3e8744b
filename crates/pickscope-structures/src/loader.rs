//! Background OBJ loading with progress reporting.
//!
//! [`load_obj`] starts a worker thread and returns a [`LoadHandle`]. The
//! worker reports byte progress and its final result over a channel; the
//! handle is polled from the frame loop, so all scene mutation stays on the
//! thread that owns the scene.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::Arc;
use std::thread;

use glam::{UVec3, Vec3};
use pickscope_core::{ElementId, ObjectId, Result};

use crate::error::{LoadError, LoadResult};
use crate::mesh::Mesh;
use crate::model::ElementModel;
use crate::scene::Scene;

/// How a loaded file is put into the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadKind {
    /// Every OBJ object becomes its own rigid mesh.
    #[default]
    Meshes,
    /// The whole file becomes one element model; OBJ objects become elements.
    ElementModel,
}

/// One named object of a loaded file.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedPart {
    pub name: String,
    pub vertices: Vec<Vec3>,
    pub triangles: Vec<UVec3>,
}

/// A parsed file, not yet in any scene.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedAsset {
    pub name: String,
    pub kind: LoadKind,
    pub parts: Vec<LoadedPart>,
}

impl LoadedAsset {
    /// Adds the asset to `scene`, returning the ids of the new objects.
    ///
    /// Element models number their elements from 1 in file order and record
    /// each part's name as an element property.
    pub fn attach(self, scene: &mut Scene) -> Result<Vec<ObjectId>> {
        match self.kind {
            LoadKind::Meshes => self
                .parts
                .into_iter()
                .map(|part| scene.add_mesh(Mesh::new(part.name, part.vertices, part.triangles)))
                .collect(),
            LoadKind::ElementModel => {
                let mut vertices = Vec::new();
                let mut triangles = Vec::new();
                let mut face_elements = Vec::new();
                let mut names = Vec::with_capacity(self.parts.len());

                for (index, part) in self.parts.into_iter().enumerate() {
                    let element = ElementId(index as u32 + 1);
                    let offset = vertices.len() as u32;
                    vertices.extend(part.vertices);
                    triangles.extend(part.triangles.iter().map(|tri| *tri + UVec3::splat(offset)));
                    face_elements.extend(std::iter::repeat(element).take(part.triangles.len()));
                    names.push((element, part.name));
                }

                let mut model =
                    ElementModel::new(Mesh::new(self.name, vertices, triangles), face_elements)?;
                for (element, name) in names {
                    model.set_properties(
                        element,
                        serde_json::json!({
                            "expressID": element.get(),
                            "type": "OBJ_OBJECT",
                            "Name": { "value": name },
                        }),
                    );
                }
                let (_, object) = scene.add_model(model);
                Ok(vec![object])
            }
        }
    }
}

/// Message from the loader thread.
#[derive(Debug)]
pub enum LoadEvent {
    /// `loaded` of `total` bytes have been read.
    Progress { loaded: u64, total: u64 },
    /// The load ended.
    Finished(LoadResult<LoadedAsset>),
}

/// Observable state of a load.
#[derive(Debug)]
pub enum LoadState {
    /// Still running; `fraction` of the file has been read.
    Pending { fraction: f32 },
    /// Parsed successfully; the asset can be taken from the handle.
    Succeeded,
    /// Failed with the given error.
    Failed(LoadError),
    /// Cancelled by the caller.
    Cancelled,
}

impl LoadState {
    /// Whether the load has ended one way or another.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        !matches!(self, LoadState::Pending { .. })
    }
}

/// Handle to a load running on a worker thread.
#[derive(Debug)]
pub struct LoadHandle {
    path: PathBuf,
    events: Receiver<LoadEvent>,
    cancel: Arc<AtomicBool>,
    state: LoadState,
    asset: Option<LoadedAsset>,
}

impl LoadHandle {
    /// The file being loaded.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The state as of the last poll.
    #[must_use]
    pub fn state(&self) -> &LoadState {
        &self.state
    }

    /// Drains pending events without blocking.
    pub fn poll(&mut self) -> &LoadState {
        while !self.state.is_finished() {
            match self.events.try_recv() {
                Ok(event) => self.apply(event),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.state = LoadState::Failed(LoadError::WorkerLost);
                }
            }
        }
        &self.state
    }

    /// Blocks until the load ends and returns the asset.
    pub fn wait(mut self) -> LoadResult<LoadedAsset> {
        while !self.state.is_finished() {
            match self.events.recv() {
                Ok(event) => self.apply(event),
                Err(_) => self.state = LoadState::Failed(LoadError::WorkerLost),
            }
        }
        match self.state {
            LoadState::Succeeded => self.asset.take().ok_or(LoadError::WorkerLost),
            LoadState::Failed(err) => Err(err),
            LoadState::Cancelled | LoadState::Pending { .. } => Err(LoadError::Cancelled),
        }
    }

    /// Takes the parsed asset once the load has succeeded.
    pub fn take_asset(&mut self) -> Option<LoadedAsset> {
        match self.state {
            LoadState::Succeeded => self.asset.take(),
            _ => None,
        }
    }

    /// Asks the worker to stop at its next read.
    pub fn cancel(&mut self) {
        self.cancel.store(true, Ordering::Relaxed);
        if !self.state.is_finished() {
            log::info!("cancelled loading {}", self.path.display());
            self.state = LoadState::Cancelled;
        }
    }

    fn apply(&mut self, event: LoadEvent) {
        match event {
            LoadEvent::Progress { loaded, total } => {
                let fraction = if total == 0 {
                    0.0
                } else {
                    (loaded as f64 / total as f64).min(1.0) as f32
                };
                self.state = LoadState::Pending { fraction };
            }
            LoadEvent::Finished(Ok(asset)) => {
                self.asset = Some(asset);
                self.state = LoadState::Succeeded;
            }
            LoadEvent::Finished(Err(err)) => {
                self.state = LoadState::Failed(err);
            }
        }
    }
}

/// Starts loading an OBJ file on a worker thread.
pub fn load_obj(
    path: impl AsRef<Path>,
    kind: LoadKind,
) -> LoadResult<LoadHandle> {
    let path = path.as_ref().to_path_buf();
    let (sender, events) = mpsc::channel();
    let cancel = Arc::new(AtomicBool::new(false));

    let worker_path = path.clone();
    let worker_cancel = Arc::clone(&cancel);
    thread::Builder::new()
        .name("pickscope-loader".into())
        .spawn(move || {
            let result = read_obj_file(&worker_path, kind, &sender, &worker_cancel);
            let result = if worker_cancel.load(Ordering::Relaxed) {
                Err(LoadError::Cancelled)
            } else {
                result
            };
            // The handle may already be gone; nobody is left to tell.
            let _ = sender.send(LoadEvent::Finished(result));
        })?;

    log::info!("loading {}", path.display());
    Ok(LoadHandle {
        path,
        events,
        cancel,
        state: LoadState::Pending { fraction: 0.0 },
        asset: None,
    })
}

fn read_obj_file(
    path: &Path,
    kind: LoadKind,
    sender: &Sender<LoadEvent>,
    cancel: &Arc<AtomicBool>,
) -> LoadResult<LoadedAsset> {
    let file = File::open(path)?;
    let total = file.metadata()?.len();
    let reader = ProgressReader {
        inner: file,
        loaded: 0,
        total,
        sender: sender.clone(),
        cancel: Arc::clone(cancel),
    };
    let name = path
        .file_stem()
        .map_or_else(|| "asset".to_string(), |stem| stem.to_string_lossy().into_owned());
    parse_obj(&mut BufReader::new(reader), name, kind)
}

/// Parses OBJ data from a reader. Materials are not loaded.
pub fn parse_obj<R: BufRead>(
    reader: &mut R,
    name: impl Into<String>,
    kind: LoadKind,
) -> LoadResult<LoadedAsset> {
    let name = name.into();
    let options = tobj::LoadOptions {
        triangulate: true,
        single_index: true,
        ..Default::default()
    };
    let (models, _materials) =
        tobj::load_obj_buf(reader, &options, |_| Err(tobj::LoadError::OpenFileFailed))?;

    let parts: Vec<LoadedPart> = models
        .into_iter()
        .map(|model| LoadedPart {
            name: model.name,
            vertices: model
                .mesh
                .positions
                .chunks_exact(3)
                .map(|p| Vec3::new(p[0], p[1], p[2]))
                .collect(),
            triangles: model
                .mesh
                .indices
                .chunks_exact(3)
                .map(|i| UVec3::new(i[0], i[1], i[2]))
                .collect(),
        })
        .filter(|part| !part.triangles.is_empty())
        .collect();

    if parts.is_empty() {
        return Err(LoadError::Empty(name));
    }
    log::debug!("parsed '{name}' with {} parts", parts.len());
    Ok(LoadedAsset { name, kind, parts })
}

/// Counts bytes as they are read and reports them as progress.
struct ProgressReader<R> {
    inner: R,
    loaded: u64,
    total: u64,
    sender: Sender<LoadEvent>,
    cancel: Arc<AtomicBool>,
}

impl<R: Read> Read for ProgressReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.cancel.load(Ordering::Relaxed) {
            return Err(io::Error::other("load cancelled"));
        }
        let n = self.inner.read(buf)?;
        if n > 0 {
            self.loaded += n as u64;
            let _ = self.sender.send(LoadEvent::Progress {
                loaded: self.loaded,
                total: self.total,
            });
        }
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Cursor, Write};

    use super::*;

    const TWO_OBJECTS: &str = "\
o wall
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
f 1 2 3 4
o slab
v 0 0 1
v 1 0 1
v 0 1 1
f 5 6 7
";

    #[test]
    fn test_parse_splits_objects() {
        let asset = parse_obj(&mut Cursor::new(TWO_OBJECTS), "house", LoadKind::Meshes).unwrap();
        assert_eq!(asset.parts.len(), 2);
        assert_eq!(asset.parts[0].name, "wall");
        // The quad is triangulated.
        assert_eq!(asset.parts[0].triangles.len(), 2);
        assert_eq!(asset.parts[1].triangles.len(), 1);
    }

    #[test]
    fn test_parse_without_faces_is_empty() {
        let err = parse_obj(&mut Cursor::new("v 0 0 0\n"), "dots", LoadKind::Meshes).unwrap_err();
        assert!(matches!(err, LoadError::Empty(name) if name == "dots"));
    }

    #[test]
    fn test_attach_as_meshes() {
        let asset = parse_obj(&mut Cursor::new(TWO_OBJECTS), "house", LoadKind::Meshes).unwrap();
        let mut scene = Scene::new();
        let ids = asset.attach(&mut scene).unwrap();
        assert_eq!(ids.len(), 2);
        assert_eq!(scene.mesh_objects(), ids);
    }

    #[test]
    fn test_attach_as_element_model() {
        let asset =
            parse_obj(&mut Cursor::new(TWO_OBJECTS), "house", LoadKind::ElementModel).unwrap();
        let mut scene = Scene::new();
        let ids = asset.attach(&mut scene).unwrap();
        assert_eq!(ids.len(), 1);
        let model_id = pickscope_core::SubsetModels::owning_model(&scene, ids[0]).unwrap();
        let model = scene.model(model_id).unwrap();
        assert_eq!(model.element_at_face(0), Some(ElementId(1)));
        assert_eq!(model.element_at_face(2), Some(ElementId(2)));
        assert_eq!(model.properties(ElementId(2)).unwrap()["Name"]["value"], "slab");
    }

    #[test]
    fn test_background_load_reports_progress_and_succeeds() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(TWO_OBJECTS.as_bytes()).unwrap();

        let handle = load_obj(file.path(), LoadKind::Meshes).unwrap();
        assert!(matches!(handle.state(), LoadState::Pending { .. }));
        let asset = handle.wait().unwrap();
        assert_eq!(asset.parts.len(), 2);
    }

    #[test]
    fn test_poll_until_done() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(TWO_OBJECTS.as_bytes()).unwrap();

        let mut handle = load_obj(file.path(), LoadKind::Meshes).unwrap();
        let mut last_fraction = 0.0;
        while !handle.poll().is_finished() {
            if let LoadState::Pending { fraction } = handle.state() {
                assert!(*fraction >= last_fraction);
                last_fraction = *fraction;
            }
            std::thread::yield_now();
        }
        assert!(matches!(handle.state(), LoadState::Succeeded));
        assert!(handle.take_asset().is_some());
        assert!(handle.take_asset().is_none());
    }

    #[test]
    fn test_missing_file_fails() {
        let handle = load_obj("/definitely/not/here.obj", LoadKind::Meshes).unwrap();
        assert!(matches!(handle.wait(), Err(LoadError::Io(_))));
    }

    #[test]
    fn test_cancel_marks_state() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(TWO_OBJECTS.as_bytes()).unwrap();

        let mut handle = load_obj(file.path(), LoadKind::Meshes).unwrap();
        handle.cancel();
        assert!(matches!(handle.state(), LoadState::Cancelled));
        // Events arriving after the cancel do not revive the load.
        handle.poll();
        assert!(matches!(handle.state(), LoadState::Cancelled));
        assert!(handle.take_asset().is_none());
    }
}
