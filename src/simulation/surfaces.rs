//! Bevy-side implementations of the collaborator traits the field session draws into.
//!
//! None of these touch the ECS directly: they buffer what the session asked for and
//! the render plugin applies it to entities later in the frame.

use bevy::prelude::*;
use std::collections::BTreeMap;

use field_core::{
    BindingKind, Body, BodyId, CameraPlacement, FrameHandle, FrameQueue, FrameScheduler,
    InputSurface, ListenerId, RenderSurface, SceneGraph,
};

/// Snapshot of the most recent render request.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedFrame {
    pub camera: CameraPlacement,
    pub bodies: Vec<(BodyId, Vec3)>,
}

#[derive(Debug, Clone)]
pub struct BevySurface {
    size: UVec2,
    frames: u64,
    last: Option<RenderedFrame>,
    disposed: bool,
}

impl BevySurface {
    pub fn new(size: UVec2) -> Self {
        Self {
            size,
            frames: 0,
            last: None,
            disposed: false,
        }
    }

    pub fn set_size(&mut self, size: UVec2) {
        self.size = size;
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn last_frame(&self) -> Option<&RenderedFrame> {
        self.last.as_ref()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }
}

impl RenderSurface for BevySurface {
    fn size(&self) -> UVec2 {
        self.size
    }

    fn render(&mut self, bodies: &[Body], camera: &CameraPlacement) {
        if self.disposed {
            return;
        }
        self.frames += 1;
        self.last = Some(RenderedFrame {
            camera: *camera,
            bodies: bodies.iter().map(|b| (b.id, b.position)).collect(),
        });
    }

    fn dispose(&mut self) {
        self.disposed = true;
        self.last = None;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum VisualCommand {
    Add { id: BodyId, position: Vec3 },
    Remove(BodyId),
}

/// Buffered add/remove requests, drained by the render plugin.
#[derive(Debug, Clone, Default)]
pub struct BevySceneGraph {
    pending: Vec<VisualCommand>,
    live: usize,
}

impl BevySceneGraph {
    pub fn drain_commands(&mut self) -> Vec<VisualCommand> {
        std::mem::take(&mut self.pending)
    }

    pub fn pending_commands(&self) -> &[VisualCommand] {
        &self.pending
    }

    /// Visuals added and not yet removed.
    pub fn live(&self) -> usize {
        self.live
    }
}

impl SceneGraph for BevySceneGraph {
    fn add_body(&mut self, body: &Body) {
        self.live += 1;
        self.pending.push(VisualCommand::Add {
            id: body.id,
            position: body.position,
        });
    }

    fn remove_body(&mut self, id: BodyId) {
        self.live = self.live.saturating_sub(1);
        self.pending.push(VisualCommand::Remove(id));
    }
}

/// Pointer listener registrations; the router only forwards bound kinds.
#[derive(Resource, Debug, Default)]
pub struct PointerBindings {
    next_id: u64,
    bound: BTreeMap<u64, BindingKind>,
}

impl PointerBindings {
    pub fn is_bound(&self, kind: BindingKind) -> bool {
        self.bound.values().any(|k| *k == kind)
    }

    pub fn len(&self) -> usize {
        self.bound.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bound.is_empty()
    }
}

impl InputSurface for PointerBindings {
    fn bind(&mut self, kind: BindingKind) -> ListenerId {
        self.next_id += 1;
        self.bound.insert(self.next_id, kind);
        ListenerId(self.next_id)
    }

    fn unbind(&mut self, id: ListenerId) -> bool {
        self.bound.remove(&id.0).is_some()
    }
}

/// Display-refresh scheduler: drained once per `Update`.
#[derive(Resource, Debug, Default, Deref, DerefMut)]
pub struct RefreshScheduler(pub FrameQueue);

impl FrameScheduler for RefreshScheduler {
    fn request_frame(&mut self) -> FrameHandle {
        self.0.request_frame()
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.0.cancel_frame(handle);
    }
}
