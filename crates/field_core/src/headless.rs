//! In-memory collaborators for tests and the `--headless` binary mode.

use bevy::math::UVec2;
use std::collections::{BTreeMap, BTreeSet};

use crate::camera::CameraPlacement;
use crate::frame::{RenderSurface, SceneGraph};
use crate::input::{BindingKind, InputSurface, ListenerId};
use crate::scene::{Body, BodyId};

/// Records what would have been drawn.
#[derive(Debug, Clone)]
pub struct HeadlessSurface {
    size: UVec2,
    renders: u64,
    last_camera: Option<CameraPlacement>,
    last_body_count: usize,
    disposed: u32,
}

impl Default for HeadlessSurface {
    fn default() -> Self {
        Self::new(UVec2::new(1280, 720))
    }
}

impl HeadlessSurface {
    pub fn new(size: UVec2) -> Self {
        Self {
            size,
            renders: 0,
            last_camera: None,
            last_body_count: 0,
            disposed: 0,
        }
    }

    pub fn render_count(&self) -> u64 {
        self.renders
    }

    pub fn last_camera(&self) -> Option<CameraPlacement> {
        self.last_camera
    }

    pub fn last_body_count(&self) -> usize {
        self.last_body_count
    }

    pub fn dispose_count(&self) -> u32 {
        self.disposed
    }
}

impl RenderSurface for HeadlessSurface {
    fn size(&self) -> UVec2 {
        self.size
    }

    fn render(&mut self, bodies: &[Body], camera: &CameraPlacement) {
        self.renders += 1;
        self.last_camera = Some(*camera);
        self.last_body_count = bodies.len();
    }

    fn dispose(&mut self) {
        self.disposed += 1;
    }
}

/// Tracks which bodies currently have a visual.
#[derive(Debug, Clone, Default)]
pub struct HeadlessSceneGraph {
    live: BTreeSet<BodyId>,
    added: usize,
    removed: usize,
}

impl HeadlessSceneGraph {
    pub fn live_ids(&self) -> Vec<BodyId> {
        self.live.iter().copied().collect()
    }

    pub fn added(&self) -> usize {
        self.added
    }

    pub fn removed(&self) -> usize {
        self.removed
    }
}

impl SceneGraph for HeadlessSceneGraph {
    fn add_body(&mut self, body: &Body) {
        if self.live.insert(body.id) {
            self.added += 1;
        }
    }

    fn remove_body(&mut self, id: BodyId) {
        if self.live.remove(&id) {
            self.removed += 1;
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct HeadlessInputSurface {
    next_id: u64,
    bound: BTreeMap<u64, BindingKind>,
}

impl HeadlessInputSurface {
    pub fn bound_count(&self) -> usize {
        self.bound.len()
    }

    pub fn is_bound(&self, kind: BindingKind) -> bool {
        self.bound.values().any(|k| *k == kind)
    }
}

impl InputSurface for HeadlessInputSurface {
    fn bind(&mut self, kind: BindingKind) -> ListenerId {
        self.next_id += 1;
        self.bound.insert(self.next_id, kind);
        ListenerId(self.next_id)
    }

    fn unbind(&mut self, id: ListenerId) -> bool {
        self.bound.remove(&id.0).is_some()
    }
}
