use anyhow::Context;
use bevy::log::LogPlugin;
use bevy::prelude::*;
use clap::Parser;
use field_config::{finite_or, WindowConfig};
use std::path::PathBuf;

use bouncy_spheres::{
    load_config, AutoClosePlugin, ConfigOverrides, FieldConfigRes, FieldRenderPlugin,
    FieldSimulationPlugin, FieldStats, FieldStatsLogPlugin,
};

#[derive(Parser, Debug)]
#[command(name = "bouncy_spheres", version, about = "Spheres bouncing inside a spherical field")]
struct Args {
    /// Extra RON layer applied after assets/config/field.ron and field.local.ron
    #[arg(long)]
    config: Option<PathBuf>,
    /// Fixed spawn seed (overrides spawn.seed)
    #[arg(long)]
    seed: Option<u64>,
    /// Number of spheres (overrides field.sphere_count)
    #[arg(long)]
    count: Option<usize>,
    /// Run without a window for a fixed number of refreshes
    #[arg(long)]
    headless: bool,
    /// Refreshes to run in headless mode
    #[arg(long, default_value_t = 600)]
    frames: u32,
    /// Print the effective configuration as RON and exit
    #[arg(long)]
    print_config: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    if let Some(extra) = &args.config {
        anyhow::ensure!(extra.exists(), "config layer {} not found", extra.display());
    }
    let overrides = ConfigOverrides {
        seed: args.seed,
        sphere_count: args.count,
    };
    let base_dir = std::env::current_dir().context("resolve working directory")?;
    let loaded = load_config(&base_dir, args.config.as_deref(), &overrides);

    if args.print_config {
        let pretty = ron::ser::to_string_pretty(&loaded.config, ron::ser::PrettyConfig::default())
            .context("serialize effective config")?;
        println!("{pretty}");
        return Ok(());
    }

    if args.headless {
        run_headless(loaded, args.frames)
    } else {
        run_windowed(loaded)
    }
}

fn run_windowed(loaded: bouncy_spheres::LoadedConfig) -> anyhow::Result<()> {
    let cfg = loaded.config.clone();
    let default_window = WindowConfig::default();
    let mut app = App::new();
    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: cfg.window.title.clone(),
            resolution: (
                finite_or(cfg.window.width, default_window.width),
                finite_or(cfg.window.height, default_window.height),
            )
                .into(),
            resizable: true,
            ..default()
        }),
        ..default()
    }));
    // Log after the subscriber from DefaultPlugins is installed.
    loaded.log();
    app.insert_resource(FieldConfigRes(cfg))
        .add_plugins((
            FieldSimulationPlugin,
            FieldRenderPlugin,
            FieldStatsLogPlugin,
            AutoClosePlugin,
        ));
    match app.run() {
        AppExit::Success => Ok(()),
        AppExit::Error(code) => anyhow::bail!("app exited with code {code}"),
    }
}

fn run_headless(loaded: bouncy_spheres::LoadedConfig, frames: u32) -> anyhow::Result<()> {
    let cfg = loaded.config.clone();
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, LogPlugin::default()));
    loaded.log();
    app.insert_resource(FieldConfigRes(cfg))
        .add_plugins((FieldSimulationPlugin, FieldStatsLogPlugin, AutoClosePlugin));
    app.finish();
    app.cleanup();

    for _ in 0..frames {
        app.update();
        if app.should_exit().is_some() {
            break;
        }
    }
    // Let the exit handler tear the field down.
    app.world_mut().send_event(AppExit::Success);
    app.update();

    let stats = app.world().resource::<FieldStats>().clone();
    info!(
        "headless run finished: {} ticks, {} live, {} removed, {} reflections",
        stats.ticks, stats.live, stats.removed_total, stats.reflections_total
    );
    Ok(())
}
