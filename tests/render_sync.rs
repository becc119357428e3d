use bevy::prelude::*;

use bouncy_spheres::rendering::{BoundaryShell, FieldCamera, FieldEntity, SphereVisual, SphereVisuals};
use bouncy_spheres::{ActiveField, FieldConfigRes, FieldRenderPlugin, FieldSimulationPlugin};
use field_config::FieldConfig;

fn render_app(count: usize) -> App {
    let mut cfg = FieldConfig::default();
    cfg.field.sphere_count = count;
    cfg.spawn.seed = Some(3);
    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .init_resource::<Assets<Mesh>>()
        .init_resource::<Assets<StandardMaterial>>()
        .insert_resource(FieldConfigRes(cfg))
        .add_plugins((FieldSimulationPlugin, FieldRenderPlugin));
    app
}

fn count_with<T: Component>(app: &mut App) -> usize {
    app.world_mut()
        .query_filtered::<Entity, With<T>>()
        .iter(app.world())
        .count()
}

#[test]
fn mount_spawns_camera_shell_and_one_visual_per_body() {
    let mut app = render_app(30);
    app.update();

    let live = app
        .world()
        .resource::<ActiveField>()
        .session()
        .expect("mounted")
        .scene()
        .live_count();
    assert_eq!(count_with::<FieldCamera>(&mut app), 1);
    assert_eq!(count_with::<BoundaryShell>(&mut app), 1);
    assert_eq!(count_with::<SphereVisual>(&mut app), live);
    assert_eq!(app.world().resource::<SphereVisuals>().len(), live);
}

#[test]
fn camera_follows_projected_placement() {
    let mut app = render_app(0);
    app.update();
    let transform = *app
        .world_mut()
        .query_filtered::<&Transform, With<FieldCamera>>()
        .single(app.world())
        .expect("one camera");
    assert!(transform.translation.abs_diff_eq(Vec3::new(0.0, 0.0, 8.0), 1e-5));
}

#[test]
fn sphere_transforms_track_body_positions() {
    let mut app = render_app(10);
    for _ in 0..3 {
        app.update();
    }
    let bodies = app
        .world()
        .resource::<ActiveField>()
        .session()
        .expect("mounted")
        .scene()
        .bodies
        .clone();
    let visuals: Vec<(SphereVisual, Transform)> = app
        .world_mut()
        .query::<(&SphereVisual, &Transform)>()
        .iter(app.world())
        .map(|(v, t)| (*v, *t))
        .collect();
    assert_eq!(visuals.len(), bodies.len());
    for (visual, transform) in visuals {
        let body = bodies.iter().find(|b| b.id == visual.0).expect("visual has a body");
        assert!(transform.translation.abs_diff_eq(body.position, 1e-6));
    }
}

#[test]
fn escape_despawns_every_field_entity() {
    let mut app = render_app(10);
    app.update();
    assert!(count_with::<FieldEntity>(&mut app) > 0);

    app.world_mut()
        .resource_mut::<ButtonInput<KeyCode>>()
        .press(KeyCode::Escape);
    app.update();

    assert_eq!(count_with::<FieldEntity>(&mut app), 0);
    assert!(app.world().resource::<SphereVisuals>().is_empty());
}
