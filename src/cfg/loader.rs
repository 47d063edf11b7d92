use eyre::{Error, Result, WrapErr};
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

use super::config::ZamConfig;
use crate::error::ZamError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Loader {}

impl Loader {
    #[must_use]
    pub const fn new() -> Self {
        Self {}
    }

    /// Load the configuration from a file
    ///
    /// # Errors
    ///
    /// Will return `Err` if `filename` does not exist, the user does not have permission to read it,
    /// or its content is not a valid zam config.
    pub fn load(&self, filename: &Path) -> Result<ZamConfig, Error> {
        let content =
            fs::read_to_string(filename).context(format!("Can't load filename={filename:?}"))?;
        if content.trim().is_empty() {
            return Ok(ZamConfig::default());
        }
        let config: ZamConfig =
            serde_yaml::from_str(&content).context(format!("Can't parse config in {filename:?}"))?;
        Ok(config)
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// First existing config file in the standard locations
pub fn get_config_path(home_dir: &Path) -> Option<PathBuf> {
    let candidates = [
        home_dir.join(".config").join("zam").join("zam.yml"),
        home_dir.join(".config").join("zam").join("zam.yaml"),
        home_dir.join(".zam.yml"),
    ];
    candidates.into_iter().find(|path| path.exists())
}

/// Load the config, falling back to defaults when no file exists.
///
/// An explicit `override_path` must exist.
pub fn load_config(home_dir: &Path, override_path: Option<&Path>) -> Result<ZamConfig> {
    let path = match override_path {
        Some(path) if path.exists() => Some(path.to_path_buf()),
        Some(path) => {
            return Err(eyre::eyre!(ZamError::NotFound {
                what: "config file".to_string(),
                name: path.display().to_string(),
                suggestions: Vec::new(),
            }))
        }
        None => get_config_path(home_dir),
    };

    match path {
        Some(path) => {
            debug!("Loading config from {:?}", path);
            Loader::new().load(&path)
        }
        None => {
            debug!("No config file found under {:?}, using defaults", home_dir);
            Ok(ZamConfig::default())
        }
    }
}
