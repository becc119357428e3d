//! Orbit camera parameters and the spherical-coordinate projector.
//!
//! `CameraState` is mutated only through the clamping helpers below, so the
//! pitch and zoom invariants hold after every input event.

use bevy::math::{Vec2, Vec3};
use field_config::{finite_or, CameraSettings};
use std::f32::consts::FRAC_PI_2;

/// Clamp ranges applied after every camera mutation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraLimits {
    pub zoom_min: f32,
    pub zoom_max: f32,
    pub pitch_margin: f32,
}

impl Default for CameraLimits {
    fn default() -> Self {
        Self::from(&CameraSettings::default())
    }
}

impl From<&CameraSettings> for CameraLimits {
    fn from(s: &CameraSettings) -> Self {
        let d = CameraSettings::default();
        // `f32::clamp` panics on a NaN or misordered range.
        let zoom_min = finite_or(s.zoom_min, d.zoom_min);
        let zoom_max = finite_or(s.zoom_max, d.zoom_max).max(zoom_min);
        Self {
            zoom_min,
            zoom_max,
            pitch_margin: finite_or(s.pitch_margin, d.pitch_margin).clamp(0.0, FRAC_PI_2),
        }
    }
}

impl CameraLimits {
    pub fn pitch_bounds(&self) -> (f32, f32) {
        (-FRAC_PI_2 + self.pitch_margin, FRAC_PI_2 - self.pitch_margin)
    }

    pub fn clamp_pitch(&self, pitch: f32) -> f32 {
        let (lo, hi) = self.pitch_bounds();
        pitch.clamp(lo, hi)
    }

    pub fn clamp_zoom(&self, zoom: f32) -> f32 {
        zoom.clamp(self.zoom_min, self.zoom_max)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
    pub yaw: f32,
    pub pitch: f32,
    /// Orbit radius around the look-at target.
    pub zoom: f32,
    pub pan_offset: Vec3,
}

impl Default for CameraState {
    fn default() -> Self {
        Self {
            yaw: 0.0,
            pitch: 0.0,
            zoom: 8.0,
            pan_offset: Vec3::ZERO,
        }
    }
}

impl CameraState {
    /// Initial state from config, clamped into `limits`.
    pub fn from_settings(s: &CameraSettings, limits: &CameraLimits) -> Self {
        let d = CameraSettings::default();
        Self {
            yaw: finite_or(s.initial_yaw, d.initial_yaw),
            pitch: limits.clamp_pitch(finite_or(s.initial_pitch, d.initial_pitch)),
            zoom: limits.clamp_zoom(finite_or(s.initial_zoom, d.initial_zoom)),
            pan_offset: Vec3::ZERO,
        }
    }

    /// Drag-rotate by a pointer delta in pixels.
    pub fn orbit(&mut self, delta_px: Vec2, sensitivity: f32, limits: &CameraLimits) {
        self.yaw -= delta_px.x * sensitivity;
        self.pitch = limits.clamp_pitch(self.pitch - delta_px.y * sensitivity);
    }

    /// Shift the orbit centre. Screen y grows downwards, world y upwards.
    pub fn pan(&mut self, delta_px: Vec2, sensitivity: f32) {
        self.pan_offset.x += delta_px.x * sensitivity;
        self.pan_offset.y -= delta_px.y * sensitivity;
    }

    pub fn zoom_by(&mut self, delta_y: f32, sensitivity: f32, limits: &CameraLimits) {
        self.zoom = limits.clamp_zoom(self.zoom + delta_y * sensitivity);
    }
}

/// Where the eye sits and what it looks at, in field coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPlacement {
    pub position: Vec3,
    pub look_at: Vec3,
}

/// Spherical coordinates around the origin; panning moves the target, not the eye.
pub fn project(camera: &CameraState) -> CameraPlacement {
    let (sin_yaw, cos_yaw) = camera.yaw.sin_cos();
    let (sin_pitch, cos_pitch) = camera.pitch.sin_cos();
    let r = camera.zoom;
    CameraPlacement {
        position: Vec3::new(r * cos_pitch * sin_yaw, r * sin_pitch, r * cos_pitch * cos_yaw),
        look_at: camera.pan_offset,
    }
}
