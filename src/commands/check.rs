//! Validate configuration without starting the server.

use anyhow::Result;
use std::path::Path;

use super::{Overrides, load_config};

/// Load and validate configuration, printing the effective settings.
pub fn execute(config_path: Option<&Path>, overrides: &Overrides) -> Result<()> {
    let config = load_config(config_path, overrides)?;
    let result = config.validate()?;

    if result.has_warnings() {
        for warning in &result.warnings {
            println!("Warning: {warning}");
        }
        println!();
    }

    println!("Configuration OK");
    println!("  listen:        {}:{}", config.server.host, config.server.port);
    println!("  upload dir:    {}", config.upload.dir.display());
    println!("  max file size: {} bytes", config.upload.max_file_size);
    println!("  image ttl:     {}s", config.image.ttl_secs);
    Ok(())
}
