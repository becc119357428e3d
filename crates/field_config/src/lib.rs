// Pure-data configuration for the sphere field (no Bevy dependency).
// Provides: data structures with defaults, single-file + layered loading,
// and validation producing warnings (non-fatal).

use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

/// Half extent of the field; the boundary shell is drawn at this radius.
pub const FIELD_HALF_SIZE: f32 = 5.0;
/// Radius of every moving sphere.
pub const SPHERE_RADIUS: f32 = 0.1;
/// Number of spheres spawned at mount.
pub const SPHERE_COUNT: usize = 100;

/// `value` when finite, otherwise `fallback`.
pub fn finite_or(value: f32, fallback: f32) -> f32 {
    if value.is_finite() {
        value
    } else {
        fallback
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    pub width: f32,
    pub height: f32,
    pub title: String,
    /// Seconds until the app exits on its own; 0.0 keeps it open.
    #[serde(rename = "autoClose")]
    pub auto_close: f32,
}
impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
            title: "Bouncy Spheres".into(),
            auto_close: 0.0,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct FieldSettings {
    pub half_size: f32,
    pub sphere_radius: f32,
    pub sphere_count: usize,
    /// Initial velocity components are drawn from `-max_axis_speed..max_axis_speed` (units per tick).
    pub max_axis_speed: f32,
}
impl Default for FieldSettings {
    fn default() -> Self {
        Self {
            half_size: FIELD_HALF_SIZE,
            sphere_radius: SPHERE_RADIUS,
            sphere_count: SPHERE_COUNT,
            max_axis_speed: 0.01,
        }
    }
}

impl FieldSettings {
    /// Largest distance from the origin a sphere centre may reach.
    pub fn boundary_radius(&self) -> f32 {
        self.half_size - self.sphere_radius
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct CameraSettings {
    pub initial_yaw: f32,
    pub initial_pitch: f32,
    pub initial_zoom: f32,
    pub zoom_min: f32,
    pub zoom_max: f32,
    /// Keeps pitch this far away from the poles.
    pub pitch_margin: f32,
    /// Radians (or world units when panning) per pixel of pointer travel.
    pub sensitivity: f32,
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
}
impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            initial_yaw: 0.0,
            initial_pitch: 0.0,
            initial_zoom: 8.0,
            zoom_min: 2.0,
            zoom_max: 30.0,
            pitch_margin: 0.01,
            sensitivity: 0.01,
            fov_degrees: 75.0,
            near: 0.01,
            far: 100.0,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct SpawnSettings {
    /// Fixed RNG seed for reproducible layouts; `None` draws from entropy.
    pub seed: Option<u64>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct DebugSettings {
    /// Seconds between stats log lines. 0.0 disables them.
    pub stats_interval: f32,
}
impl Default for DebugSettings {
    fn default() -> Self {
        Self { stats_interval: 2.0 }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct FieldConfig {
    pub window: WindowConfig,
    pub field: FieldSettings,
    pub camera: CameraSettings,
    pub spawn: SpawnSettings,
    pub debug: DebugSettings,
}

impl FieldConfig {
    /// Parse one RON file. Errors are prefixed with the failing stage.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, String> {
        let data = fs::read_to_string(&path).map_err(|e| format!("read config: {e}"))?;
        ron::from_str(&data).map_err(|e| format!("parse RON: {e}"))
    }

    /// Like [`Self::load_from_file`] but never fails: defaults plus the error.
    pub fn load_or_default(path: impl AsRef<Path>) -> (Self, Option<String>) {
        match Self::load_from_file(&path) {
            Ok(cfg) => (cfg, None),
            Err(e) => (Self::default(), Some(e)),
        }
    }

    /// Deep-merge several RON files, later ones winning key by key.
    /// Unreadable or unparsable layers are skipped and reported; returns (config, used, errors).
    pub fn load_layered<P, I>(paths: I) -> (Self, Vec<String>, Vec<String>)
    where
        P: AsRef<Path>,
        I: IntoIterator<Item = P>,
    {
        use ron::value::Value;
        let mut merged: Option<Value> = None;
        let mut used = Vec::new();
        let mut errors = Vec::new();

        for p in paths {
            let path_ref = p.as_ref();
            match fs::read_to_string(path_ref) {
                Ok(txt) => match ron::from_str::<Value>(&txt) {
                    Ok(val) => {
                        match merged.as_mut() {
                            Some(cur) => merge_value(cur, val),
                            None => merged = Some(val),
                        }
                        used.push(path_ref.display().to_string());
                    }
                    Err(e) => errors.push(format!("{}: parse error: {e}", path_ref.display())),
                },
                Err(e) => errors.push(format!("{}: read error: {e}", path_ref.display())),
            }
        }

        let Some(val) = merged else {
            return (FieldConfig::default(), used, errors);
        };
        match val.into_rust::<FieldConfig>() {
            Ok(cfg) => (cfg, used, errors),
            Err(e) => {
                errors.push(format!("failed to deserialize merged config; using defaults: {e}"));
                (FieldConfig::default(), used, errors)
            }
        }
    }

    fn float_fields(&self) -> [(&'static str, f32); 17] {
        let (win, f, c) = (&self.window, &self.field, &self.camera);
        [
            ("window.width", win.width),
            ("window.height", win.height),
            ("window.autoClose", win.auto_close),
            ("field.half_size", f.half_size),
            ("field.sphere_radius", f.sphere_radius),
            ("field.max_axis_speed", f.max_axis_speed),
            ("camera.initial_yaw", c.initial_yaw),
            ("camera.initial_pitch", c.initial_pitch),
            ("camera.initial_zoom", c.initial_zoom),
            ("camera.zoom_min", c.zoom_min),
            ("camera.zoom_max", c.zoom_max),
            ("camera.pitch_margin", c.pitch_margin),
            ("camera.sensitivity", c.sensitivity),
            ("camera.fov_degrees", c.fov_degrees),
            ("camera.near", c.near),
            ("camera.far", c.far),
            ("debug.stats_interval", self.debug.stats_interval),
        ]
    }

    /// Non-fatal warnings for values that will misbehave or be clamped at runtime.
    pub fn validate(&self) -> Vec<String> {
        let mut w = Vec::new();
        for (name, value) in self.float_fields() {
            if !value.is_finite() {
                w.push(format!("{name} is {value}; the default is used instead"));
            }
        }
        if self.window.width <= 0.0 || self.window.height <= 0.0 {
            w.push("window dimensions must be > 0".into());
        }
        if self.window.auto_close < 0.0 {
            w.push(format!(
                "window.autoClose {} is negative; auto-close stays off",
                self.window.auto_close
            ));
        }

        let f = &self.field;
        if f.sphere_radius <= 0.0 {
            w.push("field.sphere_radius must be > 0".into());
        }
        if f.half_size <= 0.0 {
            w.push("field.half_size must be > 0".into());
        }
        if f.boundary_radius() <= 0.0 {
            w.push(format!(
                "field.sphere_radius {} does not fit inside field.half_size {}",
                f.sphere_radius, f.half_size
            ));
        }
        if f.sphere_count > 1_000 {
            w.push(format!(
                "field.sphere_count {} very high; pairwise collision scan is O(n^2)",
                f.sphere_count
            ));
        }
        if f.max_axis_speed < 0.0 {
            w.push("field.max_axis_speed negative".into());
        } else if f.sphere_radius > 0.0 && f.max_axis_speed > f.sphere_radius {
            w.push(format!(
                "field.max_axis_speed {} exceeds sphere_radius {}; spheres may tunnel through each other",
                f.max_axis_speed, f.sphere_radius
            ));
        }

        let c = &self.camera;
        if c.zoom_min <= 0.0 {
            w.push("camera.zoom_min must be > 0".into());
        }
        if c.zoom_min > c.zoom_max {
            w.push(format!(
                "camera.zoom_min ({}) greater than zoom_max ({})",
                c.zoom_min, c.zoom_max
            ));
        } else if !(c.zoom_min..=c.zoom_max).contains(&c.initial_zoom) {
            w.push(format!(
                "camera.initial_zoom {} outside {}..{}; will be clamped",
                c.initial_zoom, c.zoom_min, c.zoom_max
            ));
        }
        if !(0.0..std::f32::consts::FRAC_PI_2).contains(&c.pitch_margin) {
            w.push(format!("camera.pitch_margin {} outside 0..pi/2", c.pitch_margin));
        }
        if c.sensitivity <= 0.0 {
            w.push("camera.sensitivity must be > 0".into());
        }
        if !(1.0..179.0).contains(&c.fov_degrees) {
            w.push(format!("camera.fov_degrees {} outside 1..179", c.fov_degrees));
        }
        if c.near <= 0.0 || c.near >= c.far {
            w.push(format!("camera.near {} must be > 0 and < far {}", c.near, c.far));
        }
        if self.debug.stats_interval < 0.0 {
            w.push("debug.stats_interval negative -> treated as disabled".into());
        }
        w
    }
}

fn merge_value(base: &mut ron::value::Value, overlay: ron::value::Value) {
    use ron::value::Value;
    match (base, overlay) {
        (Value::Map(bm), Value::Map(om)) => {
            for (k, v) in om.into_iter() {
                if let Some((_, existing)) = bm.iter_mut().find(|(ek, _)| **ek == k) {
                    merge_value(existing, v);
                    continue;
                }
                bm.insert(k, v);
            }
        }
        (b, o) => *b = o,
    }
}
