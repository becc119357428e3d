//! Periodic stats logging for the field (always built; interval from `debug.stats_interval`).

mod stats;

pub use stats::{log_field_stats, StatsLogState};

use bevy::prelude::*;
use field_config::{finite_or, DebugSettings};

use crate::settings::FieldConfigRes;
use crate::simulation::FieldSet;

pub struct FieldStatsLogPlugin;

impl Plugin for FieldStatsLogPlugin {
    fn build(&self, app: &mut App) {
        let interval = app
            .world_mut()
            .get_resource_or_insert_with::<FieldConfigRes>(FieldConfigRes::default)
            .debug
            .stats_interval;
        let interval = finite_or(interval, DebugSettings::default().stats_interval);
        app.insert_resource(StatsLogState::new(interval))
            .add_systems(Update, log_field_stats.after(FieldSet::Tick));
    }
}
