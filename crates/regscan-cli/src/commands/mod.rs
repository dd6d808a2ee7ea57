//! CLI subcommands.

pub mod batch;
pub mod config;
pub mod extract;
pub mod lookup;
pub mod scan;

use std::path::Path;

use regscan_core::RegscanConfig;

/// Load the config file given on the command line, the default path, or the
/// built-in defaults, in that order.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<RegscanConfig> {
    if let Some(path) = config_path {
        return Ok(RegscanConfig::from_file(Path::new(path))?);
    }
    let default_path = config::default_config_path();
    if default_path.exists() {
        return Ok(RegscanConfig::from_file(&default_path)?);
    }
    Ok(RegscanConfig::default())
}
