//! Traits shared by Powercast crates.

use std::path::PathBuf;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::config::CONFIG_ENV_VAR;
use crate::error::Result;

/// A configuration type that can be located, loaded, and written as TOML.
///
/// Path resolution order: an explicit path, then the `POWERCAST_CONFIG`
/// environment variable, then `<config dir>/<project>/config.toml`.
pub trait ConfigManager: Default + Serialize + DeserializeOwned + Sized {
    /// Name used for the per-user config directory and in CLI hints.
    fn project_name() -> &'static str;

    /// Loads the configuration, falling back to defaults when no file exists.
    fn load(config_path: Option<&str>) -> Result<Self>;

    /// Serializes the configuration as pretty TOML.
    fn to_toml_string(&self) -> Result<String>;

    /// Checks values that deserialize but cannot be used.
    fn validate(&self) -> Result<()> {
        Ok(())
    }

    /// Platform default location of the config file.
    fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(Self::project_name()).join("config.toml"))
    }

    /// Resolves which config file should be used.
    fn resolve_config_path(explicit: Option<&str>) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(PathBuf::from(path));
        }
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            if !path.is_empty() {
                return Some(PathBuf::from(path));
            }
        }
        Self::default_config_path()
    }
}
