//! Command-line options.
//!
use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use crate::app::{ConfigPaths, ThemeName};

/// Terminal directory of influencers: search, filter, sort and edit.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory holding theme.conf, keybinds.conf and view.conf
    #[arg(long, env = "INFLUENCER_HUB_CONFIG_DIR")]
    pub config_dir: Option<PathBuf>,

    /// Write logs here (default: <config-dir>/influencer-hub.log)
    #[arg(long, env = "INFLUENCER_HUB_LOG")]
    pub log_file: Option<PathBuf>,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Start with an empty directory instead of the sample influencers
    #[arg(long)]
    pub empty: bool,

    /// Base palette; theme.conf overrides individual colors
    #[arg(long, value_enum, default_value_t = ThemeName::Mocha)]
    pub theme: ThemeName,
}

impl Cli {
    /// Config directory, created if missing.
    pub fn config_paths(&self) -> Result<ConfigPaths> {
        let dir = match &self.config_dir {
            Some(dir) => dir.clone(),
            None => dirs::config_dir()
                .context("Could not determine the user config directory; pass --config-dir")?
                .join("influencer-hub"),
        };
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create config directory: {}", dir.display()))?;
        Ok(ConfigPaths::new(dir))
    }

    pub fn log_path(&self, paths: &ConfigPaths) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| paths.dir.join("influencer-hub.log"))
    }
}
