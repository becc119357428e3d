use bevy::log::info;
use field_config::{finite_or, CameraSettings, FieldConfig};
use rand::Rng;

use crate::camera::{CameraLimits, CameraState};
use crate::frame::{
    CancelToken, FrameDriver, FrameHandle, FrameScheduler, RenderSurface, SceneGraph, TickOutcome,
};
use crate::input::{EventResponse, InputAttachment, InputMapper, InputSurface, PointerEvent};
use crate::physics::FieldBounds;
use crate::scene::SceneState;
use crate::spawn::spawn_bodies;

const LOG_TARGET: &str = "field_core::session";

/// One mounted field: scene, input mapping, frame driving and the
/// collaborators they draw into.
#[derive(Debug)]
pub struct FieldSession<S: RenderSurface, G: SceneGraph> {
    scene: SceneState,
    mapper: InputMapper,
    driver: FrameDriver,
    attachment: InputAttachment,
    surface: S,
    graph: G,
    torn_down: bool,
}

impl<S: RenderSurface, G: SceneGraph> FieldSession<S, G> {
    /// Spawn bodies, register their visuals, bind input and schedule the first tick.
    pub fn mount<R: Rng + ?Sized>(
        config: &FieldConfig,
        rng: &mut R,
        surface: S,
        mut graph: G,
        input: &mut impl InputSurface,
        scheduler: &mut impl FrameScheduler,
    ) -> Self {
        let limits = CameraLimits::from(&config.camera);
        let camera = CameraState::from_settings(&config.camera, &limits);
        let bodies = spawn_bodies(rng, &config.field);
        for body in &bodies {
            graph.add_body(body);
        }
        let sensitivity = finite_or(
            config.camera.sensitivity,
            CameraSettings::default().sensitivity,
        );
        let mapper = InputMapper::new(sensitivity, limits);
        let attachment = InputAttachment::attach(input);
        let mut driver = FrameDriver::new(FieldBounds::from(&config.field));
        driver.start(scheduler);

        let size = surface.size();
        info!(
            target: LOG_TARGET,
            "mounted field: {} bodies, boundary radius {:.2}, surface {}x{}",
            bodies.len(),
            driver.bounds().boundary_radius(),
            size.x,
            size.y
        );

        Self {
            scene: SceneState::new(bodies, camera),
            mapper,
            driver,
            attachment,
            surface,
            graph,
            torn_down: false,
        }
    }

    pub fn handle_pointer(&mut self, event: PointerEvent) -> EventResponse {
        if self.torn_down {
            return EventResponse::Ignored;
        }
        self.mapper.handle(event, &mut self.scene.camera)
    }

    pub fn on_frame(
        &mut self,
        handle: FrameHandle,
        scheduler: &mut impl FrameScheduler,
    ) -> TickOutcome {
        self.driver.tick(
            handle,
            &mut self.scene,
            &mut self.surface,
            &mut self.graph,
            scheduler,
        )
    }

    /// Detach input, cancel the pending tick, drop every visual and dispose the
    /// surface. Returns false if the session was already torn down.
    pub fn teardown(
        &mut self,
        input: &mut impl InputSurface,
        scheduler: &mut impl FrameScheduler,
    ) -> bool {
        if self.torn_down {
            return false;
        }
        let unbound = self.attachment.detach(input);
        self.driver.cancel(scheduler);
        for body in &self.scene.bodies {
            self.graph.remove_body(body.id);
        }
        self.surface.dispose();
        self.torn_down = true;
        info!(
            target: LOG_TARGET,
            "tore down field after {} ticks ({} listeners unbound, {} bodies left)",
            self.driver.ticks(),
            unbound,
            self.scene.live_count()
        );
        true
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    pub fn scene(&self) -> &SceneState {
        &self.scene
    }

    pub fn camera(&self) -> &CameraState {
        &self.scene.camera
    }

    pub fn mapper(&self) -> &InputMapper {
        &self.mapper
    }

    pub fn driver(&self) -> &FrameDriver {
        &self.driver
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.driver.token()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn graph(&self) -> &G {
        &self.graph
    }

    pub fn graph_mut(&mut self) -> &mut G {
        &mut self.graph
    }
}
