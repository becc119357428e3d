// Exits the app once `window.autoClose` seconds have elapsed; 0 (the default) never exits.
// The exit event also triggers field teardown in `simulation::lifecycle`.

use bevy::prelude::*;
use std::time::Duration;

use crate::settings::FieldConfigRes;

const LOG_TARGET: &str = "bouncy_spheres::auto_close";

#[derive(Resource, Deref, DerefMut)]
pub struct AutoCloseTimer(Timer);

pub struct AutoClosePlugin;

impl Plugin for AutoClosePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, arm_auto_close)
            .add_systems(Update, tick_auto_close);
    }
}

fn arm_auto_close(mut commands: Commands, cfg: Res<FieldConfigRes>) {
    let secs = cfg.window.auto_close;
    if secs <= 0.0 {
        return;
    }
    // NaN, infinite and out-of-range values keep auto-close off.
    let Ok(duration) = Duration::try_from_secs_f32(secs) else {
        return;
    };
    info!(target: LOG_TARGET, "closing automatically in {secs:.1}s");
    commands.insert_resource(AutoCloseTimer(Timer::new(duration, TimerMode::Once)));
}

fn tick_auto_close(
    time: Res<Time>,
    timer: Option<ResMut<AutoCloseTimer>>,
    mut exit: EventWriter<AppExit>,
) {
    let Some(mut timer) = timer else {
        return;
    };
    if timer.tick(time.delta()).just_finished() {
        info!(target: LOG_TARGET, "auto-close timer elapsed");
        exit.write(AppExit::Success);
    }
}
