//! Subcommands.

pub mod batch;
pub mod config;
pub mod extract;

use std::fs;
use std::path::Path;

use medcap_core::MedcapConfig;
use tracing::debug;

/// Load the configuration for a run.
///
/// An explicit `--config` path must exist. Without one, the default config
/// file is used when present, otherwise built-in defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<MedcapConfig> {
    if let Some(path) = config_path {
        return read_config(Path::new(path));
    }

    let default_path = config::default_config_path();
    if default_path.exists() {
        read_config(&default_path)
    } else {
        debug!("No config file, using defaults");
        Ok(MedcapConfig::default())
    }
}

pub fn read_config(path: &Path) -> anyhow::Result<MedcapConfig> {
    if !path.exists() {
        anyhow::bail!("Config file not found: {}", path.display());
    }
    let json = fs::read_to_string(path)?;
    let config = MedcapConfig::from_json(&json)
        .map_err(|e| anyhow::anyhow!("Invalid config file {}: {}", path.display(), e))?;
    debug!("Loaded config from {}", path.display());
    Ok(config)
}

pub fn write_config(path: &Path, config: &MedcapConfig) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, config.to_json_pretty()?)?;
    Ok(())
}
