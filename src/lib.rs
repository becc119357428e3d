pub mod auto_close;
pub mod debug;
pub mod rendering;
pub mod settings;
pub mod simulation;

// Curated re-exports
pub use auto_close::AutoClosePlugin;
pub use debug::FieldStatsLogPlugin;
pub use rendering::FieldRenderPlugin;
pub use settings::{load_config, ConfigOverrides, FieldConfigRes, LoadedConfig};
pub use simulation::{
    ActiveField, FieldMounted, FieldSimulationPlugin, FieldStats, FieldTornDown, PointerBindings,
    RefreshScheduler,
};
