use bevy::prelude::*;
use bevy::render::camera::ClearColorConfig;
use bevy::render::view::RenderLayers;

use crate::engine::camera::main_camera::MainCamera;
use crate::engine::camera::viewport_camera::ViewportCamera;
use crate::store::actions::ViewerAction;
use crate::tools::selection::highlight::{HighlightSynchronizer, SelectableMetadata};
use crate::tools::selection::picking::{PickBounds, PickerKind};
use crate::tools::tool_manager::ToolType;

/// Camera that draws only the highlight layer, over the main view.
#[derive(Component)]
pub struct HighlightOverlayCamera;

struct DemoObject {
    name: &'static str,
    category: &'static str,
    position: Vec3,
    /// (local offset, size) of each mesh part.
    parts: &'static [(Vec3, Vec3)],
    color: Color,
}

const BENCH_PARTS: &[(Vec3, Vec3)] = &[
    (Vec3::new(0.0, 0.45, 0.0), Vec3::new(1.8, 0.08, 0.5)),
    (Vec3::new(-0.8, 0.2, 0.0), Vec3::new(0.08, 0.4, 0.45)),
    (Vec3::new(0.8, 0.2, 0.0), Vec3::new(0.08, 0.4, 0.45)),
];

const CRATE_PARTS: &[(Vec3, Vec3)] = &[(Vec3::new(0.0, 0.5, 0.0), Vec3::ONE)];

const DEMO_OBJECTS: &[DemoObject] = &[
    DemoObject {
        name: "Bench",
        category: "Furniture",
        position: Vec3::new(-3.0, 0.0, 0.0),
        parts: BENCH_PARTS,
        color: Color::srgb(0.55, 0.35, 0.2),
    },
    // Three crates in a row along the default view direction so one tap
    // hits all of them.
    DemoObject {
        name: "Crate A",
        category: "Storage",
        position: Vec3::new(1.5, 0.0, 2.0),
        parts: CRATE_PARTS,
        color: Color::srgb(0.8, 0.6, 0.3),
    },
    DemoObject {
        name: "Crate B",
        category: "Storage",
        position: Vec3::new(1.5, 0.0, 0.0),
        parts: CRATE_PARTS,
        color: Color::srgb(0.7, 0.5, 0.25),
    },
    DemoObject {
        name: "Crate C",
        category: "Storage",
        position: Vec3::new(1.5, 0.0, -2.0),
        parts: CRATE_PARTS,
        color: Color::srgb(0.6, 0.4, 0.2),
    },
];

pub fn spawn_demo_scene(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    viewport_camera: Res<ViewportCamera>,
    highlight: Res<HighlightSynchronizer>,
    mut actions: EventWriter<ViewerAction>,
) {
    let highlight_layers = highlight.highlight_layers().clone();

    spawn_lighting(&mut commands, &highlight_layers);
    spawn_cameras(&mut commands, &viewport_camera, highlight_layers);

    // Ground is pickable but not selectable.
    commands.spawn((
        Mesh3d(meshes.add(Plane3d::default().mesh().size(30.0, 30.0))),
        MeshMaterial3d(materials.add(Color::srgb(0.3, 0.32, 0.3))),
        Name::new("Ground"),
    ));

    for object in DEMO_OBJECTS {
        spawn_selectable(&mut commands, &mut meshes, &mut materials, object);
    }
    spawn_lamp_post(&mut commands, &mut meshes, &mut materials);

    actions.write(ViewerAction::SetSpatialPicker(Some(PickerKind::Mesh)));
    actions.write(ViewerAction::SetActiveTool(ToolType::Select));
    info!("Demo scene spawned with {} selectable objects", DEMO_OBJECTS.len() + 1);
}

fn spawn_selectable(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    object: &DemoObject,
) {
    let material = materials.add(object.color);
    let bounds = object
        .parts
        .iter()
        .fold(Vec3::ZERO, |acc, (offset, size)| acc.max(offset.abs() * 2.0 + *size));

    commands
        .spawn((
            Transform::from_translation(object.position),
            Visibility::default(),
            Name::new(object.name),
            SelectableMetadata {
                name: object.name.to_string(),
                category: object.category.to_string(),
            },
            PickBounds(bounds),
        ))
        .with_children(|parent| {
            for (offset, size) in object.parts {
                parent.spawn((
                    Mesh3d(meshes.add(Cuboid::from_size(*size))),
                    MeshMaterial3d(material.clone()),
                    Transform::from_translation(*offset),
                ));
            }
        });
}

/// Lamp post with the lamp nested two levels below the selectable root.
fn spawn_lamp_post(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
) {
    let metal = materials.add(Color::srgb(0.25, 0.25, 0.28));
    let glass = materials.add(StandardMaterial {
        base_color: Color::srgb(1.0, 0.95, 0.7),
        emissive: LinearRgba::rgb(2.0, 1.8, 1.2),
        ..default()
    });

    commands
        .spawn((
            Transform::from_xyz(-1.0, 0.0, -4.0),
            Visibility::default(),
            Name::new("Lamp Post"),
            SelectableMetadata {
                name: "Lamp Post".to_string(),
                category: "Street furniture".to_string(),
            },
            PickBounds(Vec3::new(0.6, 3.4, 0.6)),
        ))
        .with_children(|root| {
            root.spawn((
                Mesh3d(meshes.add(Cylinder::new(0.08, 3.0))),
                MeshMaterial3d(metal.clone()),
                Transform::from_xyz(0.0, 1.5, 0.0),
            ))
            .with_children(|pole| {
                pole.spawn((
                    Mesh3d(meshes.add(Sphere::new(0.25))),
                    MeshMaterial3d(glass.clone()),
                    Transform::from_xyz(0.0, 1.6, 0.0),
                ));
            });
        });
}

fn spawn_lighting(commands: &mut Commands, highlight_layers: &RenderLayers) {
    commands.spawn((
        DirectionalLight {
            shadows_enabled: true,
            ..default()
        },
        Transform::from_rotation(Quat::from_euler(
            EulerRot::ZYX,
            0.0,
            1.0,
            -std::f32::consts::FRAC_PI_4,
        )),
        RenderLayers::default().union(highlight_layers),
    ));
}

fn spawn_cameras(
    commands: &mut Commands,
    viewport_camera: &ViewportCamera,
    highlight_layers: RenderLayers,
) {
    commands
        .spawn((
            Camera3d::default(),
            viewport_camera.orbit_transform(),
            MainCamera,
            Name::new("Main Camera"),
        ))
        .with_children(|parent| {
            parent.spawn((
                Camera3d::default(),
                Camera {
                    order: 1,
                    clear_color: ClearColorConfig::None,
                    ..default()
                },
                highlight_layers,
                HighlightOverlayCamera,
            ));
        });
}
