//! CLI subcommands.

pub mod batch;
pub mod catalog;
pub mod process;

use std::path::PathBuf;

use nalaz_core::NalazConfig;

/// Load configuration from an explicit path, the default location, or fall
/// back to the built-in defaults.
pub fn load_config(path: Option<&str>) -> anyhow::Result<NalazConfig> {
    if let Some(path) = path {
        return Ok(NalazConfig::from_file(std::path::Path::new(path))?);
    }

    let default = default_config_path();
    if default.exists() {
        Ok(NalazConfig::from_file(&default)?)
    } else {
        Ok(NalazConfig::default())
    }
}

/// Default config file location (`<config dir>/nalaz/config.json`).
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("nalaz")
        .join("config.json")
}
