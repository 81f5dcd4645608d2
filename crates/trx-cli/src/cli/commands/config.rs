//! `trx config` — configuration management.

use anyhow::Result;
use trx_core::config::{Config, paths};

pub fn init() -> Result<()> {
    let path = paths::config_path();
    Config::init(&path)?;
    println!("Created {}", path.display());
    Ok(())
}

pub fn path() -> Result<()> {
    println!("{}", paths::config_path().display());
    Ok(())
}

pub fn show() -> Result<()> {
    let path = paths::config_path();
    let config = Config::load_from(&path)?;
    if !path.exists() {
        println!("# No config file at {} (showing defaults)", path.display());
    }
    print!("{}", toml::to_string_pretty(&config)?);
    Ok(())
}
