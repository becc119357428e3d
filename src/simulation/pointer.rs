use bevy::input::mouse::{MouseScrollUnit, MouseWheel};
use bevy::input::ButtonState;
use bevy::prelude::*;
use bevy::window::WindowEvent;

use field_core::{EventResponse, PointerButton, PointerEvent};

use super::surfaces::PointerBindings;
use super::ActiveField;

const LOG_TARGET: &str = "bouncy_spheres::pointer";

/// Pixels per wheel "line", the usual browser line height.
pub const WHEEL_LINE_PX: f32 = 100.0;

pub fn pointer_button(button: MouseButton) -> PointerButton {
    match button {
        MouseButton::Left => PointerButton::Primary,
        MouseButton::Right => PointerButton::Secondary,
        MouseButton::Middle => PointerButton::Auxiliary,
        MouseButton::Back => PointerButton::Other(3),
        MouseButton::Forward => PointerButton::Other(4),
        MouseButton::Other(n) => PointerButton::Other(n),
    }
}

/// Winit reports positive `y` for scrolling away from the user; the mapper
/// expects positive for scrolling towards the user, in pixels.
pub fn wheel_delta_px(wheel: &MouseWheel) -> f32 {
    let scale = match wheel.unit {
        MouseScrollUnit::Line => WHEEL_LINE_PX,
        MouseScrollUnit::Pixel => 1.0,
    };
    -wheel.y * scale
}

/// Last known cursor position, used as the press position of button events.
#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct PointerPosition(pub Option<Vec2>);

/// Map one window event to pointer events, updating the tracked cursor.
/// Anything that is not pointer input maps to nothing.
pub fn translate_window_event(
    event: &WindowEvent,
    cursor: &mut PointerPosition,
    out: &mut Vec<PointerEvent>,
) {
    match event {
        WindowEvent::MouseButtonInput(input) => {
            let button = pointer_button(input.button);
            match input.state {
                ButtonState::Pressed => {
                    // Winit reports a cursor move before any press inside the window.
                    out.push(PointerEvent::Down {
                        button,
                        position: cursor.0.unwrap_or_default(),
                    });
                    // Platforms open the context menu on a secondary press.
                    if button == PointerButton::Secondary {
                        out.push(PointerEvent::ContextMenu);
                    }
                }
                ButtonState::Released => out.push(PointerEvent::Up { button }),
            }
        }
        WindowEvent::CursorMoved(moved) => {
            cursor.0 = Some(moved.position);
            out.push(PointerEvent::Move {
                position: moved.position,
            });
        }
        WindowEvent::CursorLeft(_) => {
            cursor.0 = None;
            out.push(PointerEvent::Leave);
        }
        WindowEvent::MouseWheel(wheel) => out.push(PointerEvent::Wheel {
            delta_y: wheel_delta_px(wheel),
        }),
        _ => {}
    }
}

/// Translate window input into pointer events for the active field, in arrival order.
pub fn route_pointer_events(
    mut window_events: EventReader<WindowEvent>,
    bindings: Res<PointerBindings>,
    mut cursor: ResMut<PointerPosition>,
    mut field: ResMut<ActiveField>,
) {
    let mut events = Vec::new();
    for event in window_events.read() {
        translate_window_event(event, &mut cursor, &mut events);
    }

    let Some(session) = field.session_mut() else {
        return;
    };
    for event in events {
        if !bindings.is_bound(event.kind()) {
            continue;
        }
        let response = session.handle_pointer(event);
        if response == EventResponse::SuppressDefault {
            trace!(target: LOG_TARGET, "suppressed default for {:?}", event.kind());
        }
    }
}
