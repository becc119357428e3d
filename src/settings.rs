// Bevy-facing wrapper around `field_config` plus the binary's layering policy:
// base file, optional local override, optional extra file, then command-line values.

use bevy::prelude::*;
use field_config::FieldConfig;
use std::path::{Path, PathBuf};

pub const BASE_CONFIG_PATH: &str = "assets/config/field.ron";
pub const LOCAL_CONFIG_PATH: &str = "assets/config/field.local.ron";

#[derive(Resource, Debug, Clone, Default, Deref, DerefMut)]
pub struct FieldConfigRes(pub FieldConfig);

/// Values given on the command line; they win over every file layer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigOverrides {
    pub seed: Option<u64>,
    pub sphere_count: Option<usize>,
}

impl ConfigOverrides {
    pub fn apply(&self, cfg: &mut FieldConfig) {
        if let Some(seed) = self.seed {
            cfg.spawn.seed = Some(seed);
        }
        if let Some(count) = self.sphere_count {
            cfg.field.sphere_count = count;
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: FieldConfig,
    pub used: Vec<String>,
    /// Read/parse problems; the base file missing is reported here too.
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl LoadedConfig {
    /// Emit everything collected during loading through the log.
    pub fn log(&self) {
        for path in &self.used {
            info!(target: "config", "loaded config layer {path}");
        }
        for err in &self.errors {
            warn!(target: "config", "config layer skipped: {err}");
        }
        for w in &self.warnings {
            warn!(target: "config", "config warning: {w}");
        }
    }
}

/// Layer order: base, local override (only if present), `extra`, then `overrides`.
pub fn load_config(
    base_dir: &Path,
    extra: Option<&Path>,
    overrides: &ConfigOverrides,
) -> LoadedConfig {
    let mut layers: Vec<PathBuf> = vec![base_dir.join(BASE_CONFIG_PATH)];
    let local = base_dir.join(LOCAL_CONFIG_PATH);
    if local.exists() {
        layers.push(local);
    }
    if let Some(extra) = extra {
        layers.push(extra.to_path_buf());
    }
    let (mut config, used, errors) = FieldConfig::load_layered(&layers);
    overrides.apply(&mut config);
    let warnings = config.validate();
    LoadedConfig {
        config,
        used,
        errors,
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn layers_then_overrides() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let cfg_dir = dir.path().join("assets/config");
        fs::create_dir_all(&cfg_dir).unwrap();
        fs::write(
            cfg_dir.join("field.ron"),
            "(field: (sphere_count: 30), camera: (initial_zoom: 12.0))",
        )
        .unwrap();
        fs::write(cfg_dir.join("field.local.ron"), "(camera: (initial_zoom: 6.0))").unwrap();
        let extra = dir.path().join("extra.ron");
        fs::write(&extra, "(spawn: (seed: Some(5)))").unwrap();

        let overrides = ConfigOverrides {
            seed: Some(11),
            sphere_count: None,
        };
        let loaded = load_config(dir.path(), Some(&extra), &overrides);
        assert_eq!(loaded.used.len(), 3);
        assert!(loaded.errors.is_empty(), "{:?}", loaded.errors);
        assert_eq!(loaded.config.field.sphere_count, 30);
        assert_eq!(loaded.config.camera.initial_zoom, 6.0);
        assert_eq!(loaded.config.spawn.seed, Some(11));
    }

    #[test]
    fn missing_base_falls_back_to_defaults() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let overrides = ConfigOverrides {
            seed: None,
            sphere_count: Some(3),
        };
        let loaded = load_config(dir.path(), None, &overrides);
        assert!(loaded.used.is_empty());
        assert_eq!(loaded.errors.len(), 1);
        assert_eq!(loaded.config.field.sphere_count, 3);
        assert_eq!(loaded.config.field.half_size, field_config::FIELD_HALF_SIZE);
    }
}
