//! CLI command implementations for tempshot.
//!
//! - [`serve`] - Run the HTTP server
//! - [`check`] - Validate configuration and exit

pub mod check;
pub mod serve;

use anyhow::Result;
use std::path::Path;

use crate::config::Config;

/// Command-line overrides applied on top of file and environment settings.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub port: Option<u16>,
    pub ttl_secs: Option<u64>,
    pub upload_dir: Option<std::path::PathBuf>,
}

/// Load configuration: file (or defaults), then environment, then CLI flags.
///
/// # Errors
///
/// Returns an error if the file or an environment variable is invalid.
pub fn load_config(path: Option<&Path>, overrides: &Overrides) -> Result<Config> {
    let mut config = Config::load_or_default(path)?;
    config.apply_env()?;

    if let Some(port) = overrides.port {
        config.server.port = port;
    }
    if let Some(ttl_secs) = overrides.ttl_secs {
        config.image.ttl_secs = ttl_secs;
    }
    if let Some(dir) = &overrides.upload_dir {
        config.upload.dir.clone_from(dir);
    }

    Ok(config)
}
