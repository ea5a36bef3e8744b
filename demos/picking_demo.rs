#![allow(clippy::cast_possible_truncation)]
//! Scripted picking session in pickscope-rs.
//!
//! Builds a small scene of two crates and a two-element wall, then replays
//! pointer moves and double clicks as a host window would deliver them.
//! Run with `RUST_LOG=debug` to see every highlight change.

use std::time::Instant;

use pickscope_rs::*;

fn build_wall() -> ElementModel {
    let panel = Mesh::cuboid("panel", Vec3::new(2.0, 3.0, 0.2));
    let mut vertices: Vec<Vec3> = panel
        .vertices()
        .iter()
        .map(|v| *v + Vec3::new(-1.0, 0.0, -3.0))
        .collect();
    let offset = vertices.len() as u32;
    vertices.extend(panel.vertices().iter().map(|v| *v + Vec3::new(1.0, 0.0, -3.0)));

    let mut triangles = panel.triangles().to_vec();
    triangles.extend(panel.triangles().iter().map(|t| *t + UVec3::splat(offset)));

    let mut face_elements = vec![ElementId(1); panel.num_faces()];
    face_elements.extend(vec![ElementId(2); panel.num_faces()]);

    ElementModel::new(Mesh::new("wall", vertices, triangles), face_elements)
        .expect("wall faces match elements")
}

fn main() -> Result<()> {
    init_logging();

    let options = Options {
        camera_position: Vec3::new(0.0, 2.0, 10.0),
        camera_target: Vec3::ZERO,
        ..Options::default()
    };
    let mut viewer = Viewer::new(options, 1280.0, 720.0)?;

    for (name, x) in [("crate-a", -3.0), ("crate-b", 3.0)] {
        let mesh = Mesh::cuboid(name, Vec3::ONE)
            .with_material(Material::lambert(color_from_hex(0x8b5a2b)))
            .with_transform(Mat4::from_translation(Vec3::new(x, 0.0, 0.0)));
        viewer.scene_mut().add_mesh(mesh)?;
    }
    let (wall, _) = viewer.scene_mut().add_model(build_wall());
    viewer
        .scene_mut()
        .model_mut(wall)
        .ok_or(PickscopeError::ModelNotFound(wall))?
        .set_properties(
            ElementId(2),
            serde_json::json!({ "expressID": 2, "Name": { "value": "Door panel" } }),
        );

    let targets = [
        Vec3::new(-3.0, 0.0, 0.5),
        Vec3::new(3.0, 0.0, 0.5),
        Vec3::new(1.0, 0.0, -2.9),
        Vec3::new(-1.0, 0.0, -2.9),
    ];
    for target in targets {
        let Some(pixel) = viewer.camera().project(target, viewer.viewport()) else {
            continue;
        };
        let update = viewer.on_pointer_move(pixel)?;
        println!("pointer at {pixel}: {update:?}");
    }

    let door = viewer
        .camera()
        .project(Vec3::new(1.0, 0.0, -2.9), viewer.viewport())
        .unwrap_or(Vec2::ZERO);
    let mut no_prompt = |_: &str| -> Option<String> { None };
    println!("double click: {:?}", viewer.on_double_click(door, &mut no_prompt)?);

    let note = viewer.annotate(Vec3::new(3.0, 0.5, 0.0), "check lid");
    viewer.on_label_enter(note)?;

    viewer.start();
    viewer.frame(Instant::now(), &mut |frame: &Frame<'_>| {
        for label in &frame.labels {
            println!(
                "label '{}' at {} (delete shown: {})",
                label.annotation.text(),
                label.screen_position,
                label.annotation.is_delete_visible()
            );
        }
    });
    viewer.stop();

    Ok(())
}
