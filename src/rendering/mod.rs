//! Windowed presentation of the field: perspective camera, translucent boundary
//! shell and one normal-shaded mesh per body. Requires [`FieldSimulationPlugin`](crate::FieldSimulationPlugin).

use bevy::prelude::*;
use bevy::render::mesh::VertexAttributeValues;
use std::collections::HashMap;

use field_config::{finite_or, CameraSettings};
use field_core::{BodyId, FieldBounds};

use crate::settings::FieldConfigRes;
use crate::simulation::{ActiveField, FieldMounted, FieldSet, FieldTornDown, VisualCommand};

const LOG_TARGET: &str = "bouncy_spheres::render";

/// Everything spawned for one mounted field; despawned together on teardown.
#[derive(Component)]
pub struct FieldEntity;

#[derive(Component)]
pub struct FieldCamera;

#[derive(Component)]
pub struct BoundaryShell;

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SphereVisual(pub BodyId);

#[derive(Resource, Default)]
pub struct SphereVisuals {
    entities: HashMap<BodyId, Entity>,
    mesh: Option<Handle<Mesh>>,
    material: Option<Handle<StandardMaterial>>,
}

impl SphereVisuals {
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn get(&self, id: BodyId) -> Option<Entity> {
        self.entities.get(&id).copied()
    }
}

pub struct FieldRenderPlugin;

impl Plugin for FieldRenderPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(ClearColor(Color::BLACK))
            .init_resource::<SphereVisuals>()
            .add_systems(
                Update,
                (sync_field_entities, sync_transforms)
                    .chain()
                    .after(FieldSet::Tick),
            );
    }
}

/// Sphere whose vertex colours encode the surface normal as `0.5 + 0.5 * n`.
/// Interpolated per fragment, so every body shows the same normal gradient.
pub fn normal_shaded_sphere(radius: f32) -> Mesh {
    let mut mesh = Sphere::new(radius).mesh().uv(32, 18);
    let colors: Vec<[f32; 4]> = match mesh.attribute(Mesh::ATTRIBUTE_NORMAL) {
        Some(VertexAttributeValues::Float32x3(normals)) => normals
            .iter()
            .map(|[x, y, z]| [0.5 + 0.5 * x, 0.5 + 0.5 * y, 0.5 + 0.5 * z, 1.0])
            .collect(),
        _ => return mesh,
    };
    mesh.insert_attribute(Mesh::ATTRIBUTE_COLOR, colors);
    mesh
}

/// Apply teardown, mount and per-body visual requests, in that order.
#[allow(clippy::too_many_arguments)]
fn sync_field_entities(
    mut commands: Commands,
    mut torn_down: EventReader<FieldTornDown>,
    mut mounted: EventReader<FieldMounted>,
    config: Res<FieldConfigRes>,
    mut field: ResMut<ActiveField>,
    mut visuals: ResMut<SphereVisuals>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    existing: Query<Entity, With<FieldEntity>>,
) {
    if torn_down.read().count() > 0 {
        let mut despawned = 0;
        for entity in &existing {
            commands.entity(entity).despawn();
            despawned += 1;
        }
        visuals.entities.clear();
        visuals.mesh = None;
        visuals.material = None;
        debug!(target: LOG_TARGET, "despawned {despawned} field entities");
    }

    for ev in mounted.read() {
        spawn_field_scene(&mut commands, &config, &mut meshes, &mut materials);
        let radius = FieldBounds::from(&config.field).sphere_radius;
        visuals.mesh = Some(meshes.add(normal_shaded_sphere(radius)));
        visuals.material = Some(materials.add(StandardMaterial {
            base_color: Color::WHITE,
            unlit: true,
            ..default()
        }));
        info!(
            target: LOG_TARGET,
            "field #{} presented with {} bodies",
            ev.generation,
            ev.bodies
        );
    }

    let Some(session) = field.session_mut() else {
        return;
    };
    for cmd in session.graph_mut().drain_commands() {
        match cmd {
            VisualCommand::Add { id, position } => {
                let (Some(mesh), Some(material)) = (visuals.mesh.clone(), visuals.material.clone())
                else {
                    continue;
                };
                let entity = commands
                    .spawn((
                        Mesh3d(mesh),
                        MeshMaterial3d(material),
                        Transform::from_translation(position),
                        SphereVisual(id),
                        FieldEntity,
                    ))
                    .id();
                visuals.entities.insert(id, entity);
            }
            VisualCommand::Remove(id) => {
                if let Some(entity) = visuals.entities.remove(&id) {
                    commands.entity(entity).despawn();
                }
            }
        }
    }
}

fn spawn_field_scene(
    commands: &mut Commands,
    config: &FieldConfigRes,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
) {
    let cam = &config.camera;
    let d = CameraSettings::default();
    commands.spawn((
        Camera3d::default(),
        Projection::from(PerspectiveProjection {
            fov: finite_or(cam.fov_degrees, d.fov_degrees).to_radians(),
            near: finite_or(cam.near, d.near),
            far: finite_or(cam.far, d.far),
            ..default()
        }),
        Transform::from_xyz(0.0, 0.0, finite_or(cam.initial_zoom, d.initial_zoom))
            .looking_at(Vec3::ZERO, Vec3::Y),
        FieldCamera,
        FieldEntity,
    ));

    let shell_radius = FieldBounds::from(&config.field).half_size;
    commands.spawn((
        Mesh3d(meshes.add(Sphere::new(shell_radius).mesh().uv(64, 32))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgba(0.0, 1.0, 0.0, 0.12),
            alpha_mode: AlphaMode::Blend,
            unlit: true,
            cull_mode: None,
            double_sided: true,
            ..default()
        })),
        Transform::IDENTITY,
        BoundaryShell,
        FieldEntity,
    ));
}

/// Copy the last rendered frame onto the camera and sphere transforms.
fn sync_transforms(
    field: Res<ActiveField>,
    visuals: Res<SphereVisuals>,
    mut spheres: Query<&mut Transform, (With<SphereVisual>, Without<FieldCamera>)>,
    mut cameras: Query<&mut Transform, (With<FieldCamera>, Without<SphereVisual>)>,
) {
    let Some(frame) = field.session().and_then(|s| s.surface().last_frame()) else {
        return;
    };
    for mut transform in &mut cameras {
        *transform = Transform::from_translation(frame.camera.position)
            .looking_at(frame.camera.look_at, Vec3::Y);
    }
    for (id, position) in &frame.bodies {
        let Some(entity) = visuals.get(*id) else {
            continue;
        };
        if let Ok(mut transform) = spheres.get_mut(entity) {
            transform.translation = *position;
        }
    }
}
