use bevy::math::Vec3;

use crate::camera::CameraState;

/// Stable identity of a body, used to pair it with its visual in the scene graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyId(pub u64);

/// A moving sphere. Position and velocity are in field units; velocity is per tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub id: BodyId,
    pub position: Vec3,
    pub velocity: Vec3,
}

impl Body {
    pub fn new(id: BodyId, position: Vec3, velocity: Vec3) -> Self {
        Self {
            id,
            position,
            velocity,
        }
    }
}

/// Everything a tick reads and writes: the live bodies plus the orbit camera.
///
/// The body collection never grows after spawning; collisions only remove entries.
#[derive(Debug, Clone, Default)]
pub struct SceneState {
    pub bodies: Vec<Body>,
    pub camera: CameraState,
}

impl SceneState {
    pub fn new(bodies: Vec<Body>, camera: CameraState) -> Self {
        Self { bodies, camera }
    }

    pub fn live_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn body(&self, id: BodyId) -> Option<&Body> {
        self.bodies.iter().find(|b| b.id == id)
    }
}
