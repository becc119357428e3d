use bevy::prelude::*;
use std::time::Duration;

use crate::simulation::FieldStats;

const LOG_TARGET: &str = "bouncy_spheres::stats";

#[derive(Resource, Debug)]
pub struct StatsLogState {
    /// `None` when logging is disabled.
    timer: Option<Timer>,
    pub fps: f32,
    pub lines_logged: u32,
}

impl StatsLogState {
    pub fn new(interval_secs: f32) -> Self {
        let timer = Duration::try_from_secs_f32(interval_secs)
            .ok()
            .filter(|d| !d.is_zero())
            .map(|d| Timer::new(d, TimerMode::Repeating));
        Self {
            timer,
            fps: 0.0,
            lines_logged: 0,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.timer.is_some()
    }

    fn sample_fps(&mut self, dt: f32) {
        let inst = 1.0 / dt.max(1e-6);
        self.fps = if self.fps == 0.0 {
            inst
        } else {
            self.fps * 0.9 + inst * 0.1
        };
    }
}

pub fn log_field_stats(time: Res<Time>, mut state: ResMut<StatsLogState>, stats: Res<FieldStats>) {
    let dt = time.delta_secs();
    if dt > 0.0 {
        state.sample_fps(dt);
    }
    let Some(timer) = state.timer.as_mut() else {
        return;
    };
    timer.tick(time.delta());
    if !timer.just_finished() {
        return;
    }
    state.lines_logged += 1;
    info!(
        target: LOG_TARGET,
        "FIELD gen={} t={:.2}s fps={:.1} ticks={} live={} removed={} reflections={}",
        stats.generation,
        time.elapsed_secs(),
        state.fps,
        stats.ticks,
        stats.live,
        stats.removed_total,
        stats.reflections_total
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_interval_disables_logging() {
        assert!(!StatsLogState::new(0.0).is_enabled());
        assert!(!StatsLogState::new(-1.0).is_enabled());
        assert!(StatsLogState::new(2.0).is_enabled());
        assert!(!StatsLogState::new(f32::NAN).is_enabled());
        assert!(!StatsLogState::new(f32::INFINITY).is_enabled());
    }

    #[test]
    fn fps_is_smoothed() {
        let mut s = StatsLogState::new(1.0);
        s.sample_fps(0.01);
        assert!((s.fps - 100.0).abs() < 1e-3);
        s.sample_fps(0.02);
        assert!((s.fps - 95.0).abs() < 1e-3);
    }
}
