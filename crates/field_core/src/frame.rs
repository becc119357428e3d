use bevy::log::{debug, trace};
use bevy::math::UVec2;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::camera::{project, CameraPlacement};
use crate::physics::{step, FieldBounds};
use crate::scene::{Body, BodyId, SceneState};

const LOG_TARGET: &str = "field_core::frame";

/// Opaque ticket for one scheduled refresh callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub u64);

/// "Run before the next repaint" plus its cancellation.
pub trait FrameScheduler {
    fn request_frame(&mut self) -> FrameHandle;
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// Where a tick's output goes.
pub trait RenderSurface {
    fn size(&self) -> UVec2;
    fn render(&mut self, bodies: &[Body], camera: &CameraPlacement);
    fn dispose(&mut self);
}

/// Per-body visuals.
pub trait SceneGraph {
    fn add_body(&mut self, body: &Body);
    fn remove_body(&mut self, id: BodyId);
}

/// FIFO scheduler drained once per refresh. Requests made while draining run
/// on the following refresh.
#[derive(Debug, Default)]
pub struct FrameQueue {
    next_id: u64,
    pending: VecDeque<FrameHandle>,
}

impl FrameQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn next_due(&mut self) -> Option<FrameHandle> {
        self.pending.pop_front()
    }

    /// Everything requested before this refresh began.
    pub fn drain_due(&mut self) -> Vec<FrameHandle> {
        self.pending.drain(..).collect()
    }
}

impl FrameScheduler for FrameQueue {
    fn request_frame(&mut self) -> FrameHandle {
        self.next_id += 1;
        let handle = FrameHandle(self.next_id);
        self.pending.push_back(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.pending.retain(|h| *h != handle);
    }
}

/// Shared stop flag. Once cancelled it stays cancelled.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    /// 1-based index of this tick.
    pub tick: u64,
    pub reflections: usize,
    pub removed: Vec<BodyId>,
    pub live: usize,
    pub camera: CameraPlacement,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    Rendered(TickReport),
    Cancelled,
    /// The handle was not the one this driver is waiting on.
    Stale,
}

/// Self-rescheduling per-refresh work: step, project, render, request the next frame.
#[derive(Debug)]
pub struct FrameDriver {
    bounds: FieldBounds,
    pending: Option<FrameHandle>,
    token: CancelToken,
    ticks: u64,
}

impl FrameDriver {
    pub fn new(bounds: FieldBounds) -> Self {
        Self {
            bounds,
            pending: None,
            token: CancelToken::new(),
            ticks: 0,
        }
    }

    pub fn bounds(&self) -> &FieldBounds {
        &self.bounds
    }

    /// A clone of the token that stops this driver.
    pub fn token(&self) -> CancelToken {
        self.token.clone()
    }

    pub fn pending(&self) -> Option<FrameHandle> {
        self.pending
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Schedule the first tick. No-op when already scheduled or cancelled.
    pub fn start(&mut self, scheduler: &mut impl FrameScheduler) -> Option<FrameHandle> {
        if self.token.is_cancelled() {
            return None;
        }
        if self.pending.is_none() {
            self.pending = Some(scheduler.request_frame());
        }
        self.pending
    }

    pub fn tick(
        &mut self,
        handle: FrameHandle,
        scene: &mut SceneState,
        surface: &mut impl RenderSurface,
        graph: &mut impl SceneGraph,
        scheduler: &mut impl FrameScheduler,
    ) -> TickOutcome {
        if self.token.is_cancelled() {
            // Cancelled from outside through a cloned token.
            if let Some(h) = self.pending.take() {
                scheduler.cancel_frame(h);
            }
            return TickOutcome::Cancelled;
        }
        if self.pending != Some(handle) {
            return TickOutcome::Stale;
        }
        self.pending = None;

        let step_report = step(&mut scene.bodies, &self.bounds);
        let removed: Vec<BodyId> = step_report.removed.iter().map(|b| b.id).collect();
        for id in &removed {
            graph.remove_body(*id);
        }
        if !removed.is_empty() {
            debug!(
                target: LOG_TARGET,
                "collision removed {} bodies {:?}, {} live",
                removed.len(),
                removed,
                scene.bodies.len()
            );
        }

        let camera = project(&scene.camera);
        surface.render(&scene.bodies, &camera);
        self.ticks += 1;
        self.pending = Some(scheduler.request_frame());

        trace!(
            target: LOG_TARGET,
            "tick {} reflections={} live={}",
            self.ticks,
            step_report.reflections,
            scene.bodies.len()
        );

        TickOutcome::Rendered(TickReport {
            tick: self.ticks,
            reflections: step_report.reflections,
            removed,
            live: scene.bodies.len(),
            camera,
        })
    }

    /// Stop for good and drop the pending callback.
    pub fn cancel(&mut self, scheduler: &mut impl FrameScheduler) {
        self.token.cancel();
        if let Some(h) = self.pending.take() {
            scheduler.cancel_frame(h);
        }
    }
}
