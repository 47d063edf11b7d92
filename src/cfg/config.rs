// src/cfg/config.rs

use serde::Deserialize;
use std::path::{Path, PathBuf};

const DEFAULT_ALIASES: &str = "~/.zam/aliases.zsh";
const DEFAULT_METADATA: &str = "~/.zam/metadata.json";
const DEFAULT_BACKUPS: &str = "~/.zam/backups";
const DEFAULT_STARTUP: &str = "~/.zshrc";

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PathsSpec {
    #[serde(default)]
    pub aliases: Option<String>,

    #[serde(default)]
    pub metadata: Option<String>,

    #[serde(default)]
    pub backups: Option<String>,

    #[serde(default)]
    pub startup: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ZamConfig {
    #[serde(default)]
    pub paths: PathsSpec,

    #[serde(default)]
    pub editor: Option<String>,
}

/// Concrete locations of every file zam touches
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Paths {
    pub home: PathBuf,
    pub aliases: PathBuf,
    pub metadata: PathBuf,
    pub backups: PathBuf,
    pub startup: PathBuf,
}

impl Paths {
    /// Default layout under `home`
    pub fn under(home: &Path) -> Self {
        ZamConfig::default().resolve(home)
    }
}

fn expand(path: &str, home: &Path) -> PathBuf {
    let expanded = shellexpand::tilde_with_context(path, || Some(home.to_string_lossy().into_owned()));
    let expanded = PathBuf::from(expanded.as_ref());
    if expanded.is_absolute() {
        expanded
    } else {
        home.join(expanded)
    }
}

impl ZamConfig {
    /// Resolve configured paths, expanding `~` and anchoring relative paths at `home`
    pub fn resolve(&self, home: &Path) -> Paths {
        let pick = |value: &Option<String>, default: &str| expand(value.as_deref().unwrap_or(default), home);
        Paths {
            home: home.to_path_buf(),
            aliases: pick(&self.paths.aliases, DEFAULT_ALIASES),
            metadata: pick(&self.paths.metadata, DEFAULT_METADATA),
            backups: pick(&self.paths.backups, DEFAULT_BACKUPS),
            startup: pick(&self.paths.startup, DEFAULT_STARTUP),
        }
    }

    /// Editor command: config, then `ZAM_EDITOR`, `VISUAL`, `EDITOR`, then `vi`
    pub fn editor_command(&self) -> String {
        self.editor
            .clone()
            .or_else(|| std::env::var("ZAM_EDITOR").ok())
            .or_else(|| std::env::var("VISUAL").ok())
            .or_else(|| std::env::var("EDITOR").ok())
            .filter(|editor| !editor.trim().is_empty())
            .unwrap_or_else(|| "vi".to_string())
    }
}
