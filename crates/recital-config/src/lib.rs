#![allow(clippy::must_use_candidate)]

mod env;
pub mod history;
mod loader;
pub mod server;
pub mod storage;
pub mod synth;

use serde::Deserialize;

pub use history::HistoryConfig;
pub use server::{HealthConfig, ServerConfig};
pub use storage::StorageConfig;
pub use synth::SynthConfig;

/// Top-level Recital configuration
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Storage layout configuration
    #[serde(default)]
    pub storage: StorageConfig,
    /// Speech synthesis configuration
    #[serde(default)]
    pub synth: SynthConfig,
    /// Conversion history configuration
    #[serde(default)]
    pub history: HistoryConfig,
}
