mod chat;
mod init;
mod intents;
mod serve;

pub use chat::handle_chat;
pub use init::handle_init;
pub use intents::handle_intents;
pub use serve::handle_serve;

use crate::config::AutosalesConfig;
use anyhow::{Context, Result};
use std::path::Path;

/// Common context passed to command handlers that need configuration
pub struct CommandContext {
    pub config: AutosalesConfig,
}

impl CommandContext {
    pub fn new(config: AutosalesConfig) -> Self {
        Self { config }
    }

    /// Loads configuration relative to the current directory.
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let root = std::env::current_dir()?;
        let config = AutosalesConfig::load(config_path.map(Path::new), &root)
            .context("Failed to load autosales configuration")?;
        Ok(Self::new(config))
    }
}
