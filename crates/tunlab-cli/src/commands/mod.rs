//! CLI subcommands.

pub mod config;
pub mod extract;
pub mod label;
pub mod status;

use tunlab_core::TunlabConfig;

/// Load configuration from an explicit path, the default location, or defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<TunlabConfig> {
    if let Some(path) = config_path {
        return Ok(TunlabConfig::from_file(std::path::Path::new(path))?);
    }

    let default = config::default_config_path();
    if default.exists() {
        Ok(TunlabConfig::from_file(&default)?)
    } else {
        Ok(TunlabConfig::default())
    }
}
