pub mod lifecycle;
pub mod pointer;
pub mod surfaces;

use bevy::prelude::*;
use bevy::window::WindowEvent;
use rand::rngs::StdRng;
use rand::SeedableRng;

use field_core::{FieldSession, TickReport};

use crate::settings::FieldConfigRes;
pub use lifecycle::FieldHost;
pub use pointer::PointerPosition;
pub use surfaces::{BevySceneGraph, BevySurface, PointerBindings, RefreshScheduler, VisualCommand};

pub type BevyFieldSession = FieldSession<BevySurface, BevySceneGraph>;

/// The mounted session, if any. A torn-down session stays here until the next mount.
#[derive(Resource, Debug, Default)]
pub struct ActiveField(pub Option<BevyFieldSession>);

impl ActiveField {
    pub fn session(&self) -> Option<&BevyFieldSession> {
        self.0.as_ref()
    }

    pub fn session_mut(&mut self) -> Option<&mut BevyFieldSession> {
        self.0.as_mut()
    }

    pub fn is_mounted(&self) -> bool {
        self.0.as_ref().is_some_and(|s| !s.is_torn_down())
    }
}

#[derive(Resource, Debug)]
pub struct SpawnRng(pub StdRng);

impl SpawnRng {
    pub fn from_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(s) => Self(StdRng::seed_from_u64(s)),
            None => Self(StdRng::from_entropy()),
        }
    }
}

#[derive(Event, Debug, Clone, PartialEq)]
pub struct FieldMounted {
    pub generation: u32,
    pub bodies: usize,
}

#[derive(Event, Debug, Clone, PartialEq)]
pub struct FieldTornDown {
    pub generation: u32,
    pub ticks: u64,
    pub live: usize,
}

/// Running totals for the current session.
#[derive(Resource, Debug, Default, Clone, PartialEq)]
pub struct FieldStats {
    /// Incremented on every mount.
    pub generation: u32,
    pub ticks: u64,
    pub live: usize,
    pub removed_total: usize,
    pub reflections_total: usize,
}

impl FieldStats {
    pub fn begin_session(&mut self, live: usize) {
        self.generation += 1;
        self.ticks = 0;
        self.live = live;
        self.removed_total = 0;
        self.reflections_total = 0;
    }

    pub fn record(&mut self, report: &TickReport) {
        self.ticks = report.tick;
        self.live = report.live;
        self.removed_total += report.removed.len();
        self.reflections_total += report.reflections;
    }
}

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone, Copy)]
pub enum FieldSet {
    Lifecycle,
    Input,
    Tick,
}

/// Owns the field session: mounting, pointer routing, one tick per refresh, teardown.
pub struct FieldSimulationPlugin;

impl Plugin for FieldSimulationPlugin {
    fn build(&self, app: &mut App) {
        let seed = app
            .world_mut()
            .get_resource_or_insert_with::<FieldConfigRes>(FieldConfigRes::default)
            .spawn
            .seed;
        if !app.world().contains_resource::<SpawnRng>() {
            app.insert_resource(SpawnRng::from_seed(seed));
        }

        app.init_resource::<ActiveField>()
            .init_resource::<RefreshScheduler>()
            .init_resource::<PointerBindings>()
            .init_resource::<PointerPosition>()
            .init_resource::<FieldStats>()
            .init_resource::<ButtonInput<KeyCode>>()
            .add_event::<WindowEvent>()
            .add_event::<FieldMounted>()
            .add_event::<FieldTornDown>()
            .configure_sets(
                Update,
                (FieldSet::Lifecycle, FieldSet::Input, FieldSet::Tick).chain(),
            )
            .add_systems(Startup, lifecycle::mount_field)
            .add_systems(
                Update,
                (
                    lifecycle::lifecycle_keys.in_set(FieldSet::Lifecycle),
                    pointer::route_pointer_events.in_set(FieldSet::Input),
                    (lifecycle::track_surface_size, lifecycle::drive_frames)
                        .chain()
                        .in_set(FieldSet::Tick),
                ),
            )
            .add_systems(Last, lifecycle::teardown_on_exit);
    }
}
