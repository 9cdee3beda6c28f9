//! Init command implementation

use crate::config::Config;
use crate::error::{Error, Result};
use std::path::PathBuf;
use tracing::info;

/// Write the default configuration file
pub async fn cmd_init(base_dir: Option<PathBuf>, force: bool) -> Result<Config> {
    let mut config = Config::default();
    config.init_paths(base_dir);

    if config.paths.config_file.exists() && !force {
        return Err(Error::Config(format!(
            "Config already exists at {}. Use --force to overwrite.",
            config.paths.config_file.display()
        )));
    }

    config.validate()?;
    config.save()?;
    info!("Created config at {:?}", config.paths.config_file);
    Ok(config)
}

/// Print init result to console
pub fn print_init(config: &Config) {
    println!("✓ documind initialized");
    println!("  Config: {}", config.paths.config_file.display());
    println!("  Backend: {}", config.backend_url);
    println!("\nNext steps:");
    println!("  1. Point backend_url at your DocuMind backend if it is not local");
    println!("  2. Upload a document: documind upload report.pdf");
    println!("  3. Start chatting: documind chat");
}
