//! Pointer input mapping for the orbit camera.
//!
//! [`InputMapper`] turns host-neutral [`PointerEvent`]s into camera mutations.
//! [`InputAttachment`] owns the listener registrations on an [`InputSurface`]
//! and removes all of them on detach.

use bevy::math::Vec2;

use crate::camera::{CameraLimits, CameraState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerButton {
    Primary,
    Secondary,
    Auxiliary,
    Other(u16),
}

/// Positions are surface pixels, y grows downwards. Wheel deltas are pixels,
/// positive when scrolling towards the user.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down { button: PointerButton, position: Vec2 },
    Up { button: PointerButton },
    Move { position: Vec2 },
    Leave,
    Wheel { delta_y: f32 },
    ContextMenu,
}

impl PointerEvent {
    pub fn kind(&self) -> BindingKind {
        match self {
            PointerEvent::Down { .. } => BindingKind::PointerDown,
            PointerEvent::Up { .. } => BindingKind::PointerUp,
            PointerEvent::Move { .. } => BindingKind::PointerMove,
            PointerEvent::Leave => BindingKind::PointerLeave,
            PointerEvent::Wheel { .. } => BindingKind::Wheel,
            PointerEvent::ContextMenu => BindingKind::ContextMenu,
        }
    }
}

/// What the host should do with the event after the mapper saw it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResponse {
    Handled,
    /// Handled, and the platform default (context menu, page scroll) must not run.
    SuppressDefault,
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragMode {
    Rotate,
    Pan,
}

#[derive(Debug, Clone)]
pub struct InputMapper {
    rotating: bool,
    panning: bool,
    /// Most recently pressed mode that is still held.
    precedence: Option<DragMode>,
    last_pointer: Option<Vec2>,
    sensitivity: f32,
    limits: CameraLimits,
}

impl Default for InputMapper {
    fn default() -> Self {
        Self::new(0.01, CameraLimits::default())
    }
}

impl InputMapper {
    pub fn new(sensitivity: f32, limits: CameraLimits) -> Self {
        Self {
            rotating: false,
            panning: false,
            precedence: None,
            last_pointer: None,
            sensitivity,
            limits,
        }
    }

    pub fn is_rotating(&self) -> bool {
        self.rotating
    }

    pub fn is_panning(&self) -> bool {
        self.panning
    }

    /// Mode that consumes pointer movement right now.
    pub fn active_mode(&self) -> Option<DragMode> {
        self.precedence.or(if self.rotating {
            Some(DragMode::Rotate)
        } else if self.panning {
            Some(DragMode::Pan)
        } else {
            None
        })
    }

    pub fn limits(&self) -> &CameraLimits {
        &self.limits
    }

    pub fn handle(&mut self, event: PointerEvent, camera: &mut CameraState) -> EventResponse {
        match event {
            PointerEvent::Down { button, position } => {
                self.last_pointer = Some(position);
                match button {
                    PointerButton::Primary => {
                        self.rotating = true;
                        self.precedence = Some(DragMode::Rotate);
                        EventResponse::Handled
                    }
                    PointerButton::Secondary => {
                        self.panning = true;
                        self.precedence = Some(DragMode::Pan);
                        EventResponse::Handled
                    }
                    _ => EventResponse::Ignored,
                }
            }
            PointerEvent::Up { button } => match button {
                PointerButton::Primary => {
                    self.rotating = false;
                    if self.precedence == Some(DragMode::Rotate) {
                        self.precedence = self.panning.then_some(DragMode::Pan);
                    }
                    EventResponse::Handled
                }
                PointerButton::Secondary => {
                    self.panning = false;
                    if self.precedence == Some(DragMode::Pan) {
                        self.precedence = self.rotating.then_some(DragMode::Rotate);
                    }
                    EventResponse::Handled
                }
                _ => EventResponse::Ignored,
            },
            PointerEvent::Leave => {
                self.rotating = false;
                self.panning = false;
                self.precedence = None;
                self.last_pointer = None;
                EventResponse::Handled
            }
            PointerEvent::Move { position } => {
                let delta = self
                    .last_pointer
                    .map(|last| position - last)
                    .unwrap_or(Vec2::ZERO);
                self.last_pointer = Some(position);
                match self.active_mode() {
                    Some(DragMode::Rotate) => {
                        camera.orbit(delta, self.sensitivity, &self.limits);
                        EventResponse::Handled
                    }
                    Some(DragMode::Pan) => {
                        camera.pan(delta, self.sensitivity);
                        EventResponse::Handled
                    }
                    None => EventResponse::Ignored,
                }
            }
            PointerEvent::Wheel { delta_y } => {
                camera.zoom_by(delta_y, self.sensitivity, &self.limits);
                EventResponse::SuppressDefault
            }
            PointerEvent::ContextMenu => EventResponse::SuppressDefault,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BindingKind {
    PointerDown,
    PointerUp,
    PointerLeave,
    PointerMove,
    Wheel,
    ContextMenu,
}

impl BindingKind {
    pub const ALL: [BindingKind; 6] = [
        BindingKind::PointerDown,
        BindingKind::PointerUp,
        BindingKind::PointerLeave,
        BindingKind::PointerMove,
        BindingKind::Wheel,
        BindingKind::ContextMenu,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// Something pointer listeners can be registered on.
pub trait InputSurface {
    fn bind(&mut self, kind: BindingKind) -> ListenerId;
    /// Returns false when `id` was not bound.
    fn unbind(&mut self, id: ListenerId) -> bool;
}

/// Every listener the mapper registered; a single handle for teardown.
#[derive(Debug, Default)]
pub struct InputAttachment {
    listeners: Vec<(BindingKind, ListenerId)>,
}

impl InputAttachment {
    pub fn attach(surface: &mut impl InputSurface) -> Self {
        let listeners = BindingKind::ALL
            .iter()
            .map(|&kind| (kind, surface.bind(kind)))
            .collect();
        Self { listeners }
    }

    pub fn is_attached(&self) -> bool {
        !self.listeners.is_empty()
    }

    pub fn kinds(&self) -> impl Iterator<Item = BindingKind> + '_ {
        self.listeners.iter().map(|(k, _)| *k)
    }

    /// Unbind everything. Safe to call again; later calls remove nothing.
    pub fn detach(&mut self, surface: &mut impl InputSurface) -> usize {
        self.listeners
            .drain(..)
            .filter(|(_, id)| surface.unbind(*id))
            .count()
    }
}
