//! Engine-agnostic core of the bouncy spheres field.
//!
//! Bevy is only used for `glam` math types and log macros here; the root crate
//! supplies the windowed [`RenderSurface`], [`SceneGraph`], [`InputSurface`] and
//! refresh scheduling.

pub mod camera;
pub mod frame;
pub mod headless;
pub mod input;
pub mod physics;
pub mod scene;
pub mod session;
pub mod spawn;

pub use camera::{project, CameraLimits, CameraPlacement, CameraState};
pub use frame::{
    CancelToken, FrameDriver, FrameHandle, FrameQueue, FrameScheduler, RenderSurface, SceneGraph,
    TickOutcome, TickReport,
};
pub use headless::{HeadlessInputSurface, HeadlessSceneGraph, HeadlessSurface};
pub use input::{
    BindingKind, DragMode, EventResponse, InputAttachment, InputMapper, InputSurface, ListenerId,
    PointerButton, PointerEvent,
};
pub use physics::{
    advance_bodies, find_collisions, reflect_about, remove_marked, step, FieldBounds, StepReport,
};
pub use scene::{Body, BodyId, SceneState};
pub use session::FieldSession;
pub use spawn::{sample_in_ball, sample_velocity, spawn_bodies};
