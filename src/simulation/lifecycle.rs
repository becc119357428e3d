use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use field_config::{finite_or, WindowConfig};
use field_core::{FieldSession, RenderSurface, TickOutcome};

use super::surfaces::{BevySceneGraph, BevySurface, PointerBindings, RefreshScheduler};
use super::{ActiveField, FieldMounted, FieldStats, FieldTornDown, SpawnRng};
use crate::settings::FieldConfigRes;

const LOG_TARGET: &str = "bouncy_spheres::lifecycle";

/// Everything mount and teardown touch, bundled for the systems that need both.
#[derive(SystemParam)]
pub struct FieldHost<'w> {
    config: Res<'w, FieldConfigRes>,
    rng: ResMut<'w, SpawnRng>,
    bindings: ResMut<'w, PointerBindings>,
    scheduler: ResMut<'w, RefreshScheduler>,
    field: ResMut<'w, ActiveField>,
    stats: ResMut<'w, FieldStats>,
    mounted: EventWriter<'w, FieldMounted>,
    torn_down: EventWriter<'w, FieldTornDown>,
}

impl FieldHost<'_> {
    /// Mount a fresh session unless one is already live.
    pub fn mount(&mut self) -> bool {
        if self.field.is_mounted() {
            warn!(target: LOG_TARGET, "field already mounted; ignoring mount request");
            return false;
        }
        let window = &self.config.window;
        let defaults = WindowConfig::default();
        let size = UVec2::new(
            finite_or(window.width, defaults.width).max(1.0) as u32,
            finite_or(window.height, defaults.height).max(1.0) as u32,
        );
        let session = FieldSession::mount(
            &self.config.0,
            &mut self.rng.0,
            BevySurface::new(size),
            BevySceneGraph::default(),
            &mut *self.bindings,
            &mut *self.scheduler,
        );
        let bodies = session.scene().live_count();
        self.stats.begin_session(bodies);
        self.mounted.write(FieldMounted {
            generation: self.stats.generation,
            bodies,
        });
        self.field.0 = Some(session);
        true
    }

    /// Tear the live session down. Returns false when nothing was mounted.
    pub fn teardown(&mut self) -> bool {
        let Some(session) = self.field.session_mut() else {
            return false;
        };
        if !session.teardown(&mut *self.bindings, &mut *self.scheduler) {
            return false;
        }
        self.torn_down.write(FieldTornDown {
            generation: self.stats.generation,
            ticks: session.driver().ticks(),
            live: session.scene().live_count(),
        });
        true
    }
}

pub fn mount_field(mut host: FieldHost) {
    host.mount();
}

/// `R` remounts a fresh field, `Escape` tears down and exits.
pub fn lifecycle_keys(
    keys: Res<ButtonInput<KeyCode>>,
    mut host: FieldHost,
    mut exit: EventWriter<AppExit>,
) {
    if keys.just_pressed(KeyCode::KeyR) {
        host.teardown();
        if host.mount() {
            info!(target: LOG_TARGET, "field remounted");
        }
    }
    if keys.just_pressed(KeyCode::Escape) {
        host.teardown();
        info!(target: LOG_TARGET, "escape pressed, exiting");
        exit.write(AppExit::Success);
    }
}

pub fn teardown_on_exit(mut exits: EventReader<AppExit>, mut host: FieldHost) {
    if exits.read().count() > 0 {
        host.teardown();
    }
}

pub fn track_surface_size(
    windows: Query<&Window, With<PrimaryWindow>>,
    mut field: ResMut<ActiveField>,
) {
    let Ok(window) = windows.single() else {
        return;
    };
    let Some(session) = field.session_mut() else {
        return;
    };
    let size = UVec2::new(window.physical_width(), window.physical_height());
    if session.surface().size() != size {
        session.surface_mut().set_size(size);
    }
}

/// Run every tick that was due when this refresh began.
pub fn drive_frames(
    mut field: ResMut<ActiveField>,
    mut scheduler: ResMut<RefreshScheduler>,
    mut stats: ResMut<FieldStats>,
) {
    let due = scheduler.drain_due();
    let Some(session) = field.session_mut() else {
        return;
    };
    for handle in due {
        match session.on_frame(handle, &mut *scheduler) {
            TickOutcome::Rendered(report) => stats.record(&report),
            TickOutcome::Stale => {
                trace!(target: LOG_TARGET, "dropped stale frame {:?}", handle);
            }
            TickOutcome::Cancelled => {}
        }
    }
}
