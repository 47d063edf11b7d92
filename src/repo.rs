//! Alias repository: the codec and the metadata model over a [`FileSystem`].
//!
//! Mutations are planned as [`Effect`]s and applied in one step, so a dry run
//! is the same plan with the apply step skipped.

use log::{debug, info, warn};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::cfg::Paths;
use crate::codec::{self, AliasMap};
use crate::error::ZamError;
use crate::fs::FileSystem;
use crate::meta::MetadataStore;

/// Explicit per-invocation options threaded into every handler
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    pub dry_run: bool,
}

impl RunOptions {
    pub const fn dry_run() -> Self {
        Self { dry_run: true }
    }
}

/// One planned mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Write { path: PathBuf, contents: String },
    Append { path: PathBuf, contents: String },
    Copy { from: PathBuf, to: PathBuf },
}

impl Effect {
    pub fn target(&self) -> &Path {
        match self {
            Effect::Write { path, .. } | Effect::Append { path, .. } => path,
            Effect::Copy { to, .. } => to,
        }
    }

    /// Human-readable preview, including the content that would be written
    pub fn preview(&self) -> String {
        match self {
            Effect::Write { path, contents } => {
                format!("write {} ({} bytes):\n{}", path.display(), contents.len(), indent(contents))
            }
            Effect::Append { path, contents } => {
                format!("append to {} ({} bytes):\n{}", path.display(), contents.len(), indent(contents))
            }
            Effect::Copy { from, to } => format!("copy {} -> {}", from.display(), to.display()),
        }
    }
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Effect::Write { path, contents } => write!(f, "write {} ({} bytes)", path.display(), contents.len()),
            Effect::Append { path, contents } => write!(f, "append to {} ({} bytes)", path.display(), contents.len()),
            Effect::Copy { from, to } => write!(f, "copy {} -> {}", from.display(), to.display()),
        }
    }
}

fn indent(text: &str) -> String {
    text.lines().map(|line| format!("    {}", line)).collect::<Vec<_>>().join("\n")
}

/// Aliases and metadata as loaded, plus anything recovered along the way
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub aliases: AliasMap,
    pub metadata: MetadataStore,
    pub warnings: Vec<ZamError>,
    original_metadata: MetadataStore,
}

impl Snapshot {
    pub fn metadata_changed(&self) -> bool {
        self.metadata != self.original_metadata
    }
}

pub struct AliasRepository<F: FileSystem> {
    fs: F,
    paths: Paths,
}

impl<F: FileSystem> AliasRepository<F> {
    pub fn new(fs: F, paths: Paths) -> Self {
        Self { fs, paths }
    }

    pub fn paths(&self) -> &Paths {
        &self.paths
    }

    pub fn fs(&self) -> &F {
        &self.fs
    }

    pub fn into_fs(self) -> F {
        self.fs
    }

    /// Read the alias file; a missing file is an empty set
    pub fn load(&self) -> Result<AliasMap, ZamError> {
        let path = &self.paths.aliases;
        if !self.fs.exists(path) {
            debug!("Alias file {:?} does not exist yet", path);
            return Ok(AliasMap::new());
        }
        let text = self
            .fs
            .read_to_string(path)
            .map_err(|e| ZamError::io(path, "read", e))?;
        let aliases = codec::parse(&text);
        debug!("Loaded {} aliases from {:?}", aliases.len(), path);
        Ok(aliases)
    }

    /// Rewrite the whole alias file
    pub fn save(&mut self, aliases: &AliasMap) -> Result<(), ZamError> {
        let effect = self.plan_save(aliases);
        self.apply(&[effect], RunOptions::default())?;
        Ok(())
    }

    /// Read the metadata file. Missing or malformed files yield empty metadata.
    pub fn read_metadata(&self) -> Result<MetadataStore, ZamError> {
        Ok(self.read_metadata_recovering()?.0)
    }

    pub fn write_metadata(&mut self, metadata: &MetadataStore) -> Result<(), ZamError> {
        let effect = self.plan_metadata(metadata);
        self.apply(&[effect], RunOptions::default())?;
        Ok(())
    }

    fn read_metadata_recovering(&self) -> Result<(MetadataStore, Option<ZamError>), ZamError> {
        let path = &self.paths.metadata;
        if !self.fs.exists(path) {
            return Ok((MetadataStore::new(), None));
        }
        let text = self
            .fs
            .read_to_string(path)
            .map_err(|e| ZamError::io(path, "read", e))?;
        match MetadataStore::from_json(&text) {
            Ok(store) => Ok((store, None)),
            Err(e) => {
                let warning = ZamError::MalformedMetadata {
                    file_path: path.clone(),
                    underlying_error: e.to_string(),
                };
                warn!("{}", warning);
                Ok((MetadataStore::new(), Some(warning)))
            }
        }
    }

    pub fn snapshot(&self) -> Result<Snapshot, ZamError> {
        let aliases = self.load()?;
        let (metadata, warning) = self.read_metadata_recovering()?;
        Ok(Snapshot {
            aliases,
            original_metadata: metadata.clone(),
            metadata,
            warnings: warning.into_iter().collect(),
        })
    }

    pub fn plan_save(&self, aliases: &AliasMap) -> Effect {
        Effect::Write {
            path: self.paths.aliases.clone(),
            contents: codec::serialize(aliases),
        }
    }

    pub fn plan_metadata(&self, metadata: &MetadataStore) -> Effect {
        Effect::Write {
            path: self.paths.metadata.clone(),
            contents: metadata.to_json(),
        }
    }

    pub fn read_file(&self, path: &Path) -> Result<Option<String>, ZamError> {
        if !self.fs.exists(path) {
            return Ok(None);
        }
        self.fs
            .read_to_string(path)
            .map(Some)
            .map_err(|e| ZamError::io(path, "read", e))
    }

    pub fn list_dir(&self, path: &Path) -> Result<Vec<PathBuf>, ZamError> {
        self.fs.list_dir(path).map_err(|e| ZamError::io(path, "list", e))
    }

    pub fn exists(&self, path: &Path) -> bool {
        self.fs.exists(path)
    }

    /// Run the planned effects in order. Returns whether anything was applied.
    pub fn apply(&mut self, effects: &[Effect], opts: RunOptions) -> Result<bool, ZamError> {
        if opts.dry_run {
            for effect in effects {
                info!("[dry-run] would {}", effect);
            }
            return Ok(false);
        }
        for effect in effects {
            match effect {
                Effect::Write { path, contents } => {
                    self.fs.write(path, contents).map_err(|e| ZamError::io(path, "write", e))?
                }
                Effect::Append { path, contents } => {
                    self.fs.append(path, contents).map_err(|e| ZamError::io(path, "append", e))?
                }
                Effect::Copy { from, to } => {
                    self.fs.copy(from, to).map_err(|e| ZamError::io(to, "copy", e))?
                }
            }
            info!("Applied: {}", effect);
        }
        Ok(!effects.is_empty())
    }
}
