pub mod algo;
pub mod config;
pub mod error;
pub mod ops;

#[cfg(feature = "cli")]
pub mod logging;

#[cfg(feature = "mcp")]
pub mod mcp;

#[cfg(feature = "plugin")]
pub mod commands;

#[cfg(feature = "plugin")]
use nu_plugin::{Plugin, PluginCommand};

#[cfg(feature = "plugin")]
pub struct TrendsPlugin;

#[cfg(feature = "plugin")]
impl Plugin for TrendsPlugin {
    fn version(&self) -> String {
        env!("CARGO_PKG_VERSION").into()
    }

    fn commands(&self) -> Vec<Box<dyn PluginCommand<Plugin = Self>>> {
        vec![
            Box::new(commands::Aggregate),
            Box::new(commands::Query),
            Box::new(commands::Similarity),
            Box::new(commands::Normalize),
        ]
    }
}
