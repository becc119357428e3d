use bevy::input::mouse::{MouseButtonInput, MouseScrollUnit, MouseWheel};
use bevy::input::ButtonState;
use bevy::prelude::*;
use bevy::window::{CursorLeft, CursorMoved, WindowEvent};

use bouncy_spheres::{
    ActiveField, FieldConfigRes, FieldSimulationPlugin, FieldStats, PointerBindings,
    RefreshScheduler,
};
use field_config::FieldConfig;

fn test_app(count: usize) -> App {
    let mut cfg = FieldConfig::default();
    cfg.field.sphere_count = count;
    cfg.spawn.seed = Some(42);
    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .insert_resource(FieldConfigRes(cfg))
        .add_plugins(FieldSimulationPlugin);
    app
}

fn camera_of(app: &App) -> field_core::CameraState {
    *app.world()
        .resource::<ActiveField>()
        .session()
        .expect("mounted")
        .camera()
}

fn moved(x: f32, y: f32) -> WindowEvent {
    WindowEvent::from(CursorMoved {
        window: Entity::PLACEHOLDER,
        position: Vec2::new(x, y),
        delta: None,
    })
}

fn button(button: MouseButton, state: ButtonState) -> WindowEvent {
    WindowEvent::from(MouseButtonInput {
        button,
        state,
        window: Entity::PLACEHOLDER,
    })
}

fn wheel(unit: MouseScrollUnit, y: f32) -> WindowEvent {
    WindowEvent::from(MouseWheel {
        unit,
        x: 0.0,
        y,
        window: Entity::PLACEHOLDER,
    })
}

/// Deliver `events` in order within a single frame.
fn frame_with(app: &mut App, events: impl IntoIterator<Item = WindowEvent>) {
    for event in events {
        app.world_mut().send_event(event);
    }
    app.update();
}

fn cursor_to(app: &mut App, x: f32, y: f32) {
    frame_with(app, [moved(x, y)]);
}

fn mouse(app: &mut App, b: MouseButton, state: ButtonState) {
    frame_with(app, [button(b, state)]);
}

fn press_key(app: &mut App, key: KeyCode) {
    app.world_mut()
        .resource_mut::<ButtonInput<KeyCode>>()
        .press(key);
    app.update();
    let mut keys = app.world_mut().resource_mut::<ButtonInput<KeyCode>>();
    keys.release(key);
    keys.clear();
}

#[test]
fn mounts_on_startup_and_ticks_once_per_update() {
    let mut app = test_app(20);
    app.update();
    {
        let field = app.world().resource::<ActiveField>();
        assert!(field.is_mounted());
        assert_eq!(app.world().resource::<PointerBindings>().len(), 6);
        assert_eq!(app.world().resource::<FieldStats>().ticks, 1);
    }
    for _ in 0..4 {
        app.update();
    }
    let stats = app.world().resource::<FieldStats>();
    assert_eq!(stats.ticks, 5);
    assert_eq!(stats.generation, 1);
    assert_eq!(app.world().resource::<RefreshScheduler>().pending_count(), 1);
}

#[test]
fn primary_drag_rotates_camera() {
    let mut app = test_app(0);
    app.update();
    cursor_to(&mut app, 100.0, 100.0);
    mouse(&mut app, MouseButton::Left, ButtonState::Pressed);
    cursor_to(&mut app, 110.0, 100.0);
    let cam = camera_of(&app);
    assert!((cam.yaw - -0.1).abs() < 1e-5, "yaw {}", cam.yaw);

    mouse(&mut app, MouseButton::Left, ButtonState::Released);
    cursor_to(&mut app, 200.0, 100.0);
    assert!((camera_of(&app).yaw - -0.1).abs() < 1e-5);
}

#[test]
fn drag_measured_from_a_press_in_the_same_frame() {
    let mut app = test_app(0);
    app.update();
    frame_with(
        &mut app,
        [
            moved(50.0, 50.0),
            button(MouseButton::Left, ButtonState::Pressed),
            moved(51.0, 50.0),
        ],
    );
    let yaw = camera_of(&app).yaw;
    assert!((yaw - -0.01).abs() < 1e-5, "yaw {yaw}");
}

#[test]
fn motion_before_a_same_frame_release_still_rotates() {
    let mut app = test_app(0);
    app.update();
    frame_with(
        &mut app,
        [moved(0.0, 0.0), button(MouseButton::Left, ButtonState::Pressed)],
    );
    frame_with(
        &mut app,
        [
            moved(10.0, 0.0),
            button(MouseButton::Left, ButtonState::Released),
            moved(90.0, 0.0),
        ],
    );
    let yaw = camera_of(&app).yaw;
    assert!((yaw - -0.1).abs() < 1e-5, "yaw {yaw}");
}

#[test]
fn leave_then_press_in_one_frame_starts_a_fresh_drag() {
    let mut app = test_app(0);
    app.update();
    cursor_to(&mut app, 0.0, 0.0);
    mouse(&mut app, MouseButton::Right, ButtonState::Pressed);
    frame_with(
        &mut app,
        [
            WindowEvent::from(CursorLeft {
                window: Entity::PLACEHOLDER,
            }),
            moved(300.0, 300.0),
            button(MouseButton::Right, ButtonState::Pressed),
            moved(305.0, 300.0),
        ],
    );
    let pan = camera_of(&app).pan_offset;
    assert!(pan.abs_diff_eq(Vec3::new(0.05, 0.0, 0.0), 1e-5), "{pan:?}");
}

#[test]
fn secondary_drag_pans_until_cursor_leaves() {
    let mut app = test_app(0);
    app.update();
    cursor_to(&mut app, 0.0, 0.0);
    mouse(&mut app, MouseButton::Right, ButtonState::Pressed);
    cursor_to(&mut app, 10.0, 20.0);
    let pan = camera_of(&app).pan_offset;
    assert!(pan.abs_diff_eq(Vec3::new(0.1, -0.2, 0.0), 1e-5), "{pan:?}");

    frame_with(
        &mut app,
        [WindowEvent::from(CursorLeft {
            window: Entity::PLACEHOLDER,
        })],
    );
    cursor_to(&mut app, 50.0, 50.0);
    assert_eq!(camera_of(&app).pan_offset, pan);
}

#[test]
fn wheel_lines_zoom_out_and_clamp() {
    let mut app = test_app(0);
    app.update();
    frame_with(&mut app, [wheel(MouseScrollUnit::Line, -1.0)]);
    assert!((camera_of(&app).zoom - 9.0).abs() < 1e-5);

    frame_with(&mut app, (0..10).map(|_| wheel(MouseScrollUnit::Line, 5.0)));
    assert_eq!(camera_of(&app).zoom, 2.0);
}

#[test]
fn r_remounts_a_fresh_field() {
    let mut app = test_app(10);
    app.update();
    app.update();
    press_key(&mut app, KeyCode::KeyR);

    let stats = app.world().resource::<FieldStats>();
    assert_eq!(stats.generation, 2);
    assert_eq!(stats.ticks, 1, "new session ticked once in the remount frame");
    assert!(app.world().resource::<ActiveField>().is_mounted());
    assert_eq!(app.world().resource::<PointerBindings>().len(), 6);
    assert_eq!(app.world().resource::<RefreshScheduler>().pending_count(), 1);
}

#[test]
fn escape_tears_down_and_requests_exit() {
    let mut app = test_app(10);
    app.update();
    press_key(&mut app, KeyCode::Escape);

    assert!(app.should_exit().is_some());
    let field = app.world().resource::<ActiveField>();
    assert!(!field.is_mounted());
    assert!(field.session().expect("kept").is_torn_down());
    assert!(app.world().resource::<PointerBindings>().is_empty());
    assert_eq!(app.world().resource::<RefreshScheduler>().pending_count(), 0);

    let ticks = app.world().resource::<FieldStats>().ticks;
    app.update();
    assert_eq!(app.world().resource::<FieldStats>().ticks, ticks);
}

#[test]
fn app_exit_tears_the_field_down() {
    let mut app = test_app(5);
    app.update();
    app.world_mut().send_event(AppExit::Success);
    app.update();
    let field = app.world().resource::<ActiveField>();
    assert!(field.session().expect("kept").is_torn_down());

    // Pointer input no longer reaches the camera.
    let before = camera_of(&app);
    frame_with(&mut app, [wheel(MouseScrollUnit::Pixel, -300.0)]);
    assert_eq!(camera_of(&app), before);
}
