use eyre::Result;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

pub mod cfg;
pub mod codec;
pub mod display;
pub mod editor;
pub mod error;
pub mod fs;
pub mod interactive;
pub mod meta;
pub mod ops;
pub mod repo;
pub mod shell;

pub use cfg::{load_config, Paths, ZamConfig};
pub use codec::AliasMap;
pub use error::{ErrorKind, ZamError};
pub use fs::{DiskFs, FileSystem, MemoryFs};
pub use meta::{AliasMetadata, MetadataStore};
pub use repo::{AliasRepository, Effect, RunOptions};

/// `~/.local/share/zam/logs`
pub fn log_dir(home_dir: &Path) -> PathBuf {
    home_dir.join(".local").join("share").join("zam").join("logs")
}

/// Log to `~/.local/share/zam/logs/zam.log`, or to stderr when `ZAM_LOG_STDERR` is set.
/// `RUST_LOG` controls the level and defaults to info.
pub fn setup_logging(home_dir: &Path) -> Result<()> {
    let env = env_logger::Env::default().filter_or("RUST_LOG", "info");

    if std::env::var_os("ZAM_LOG_STDERR").is_some() {
        env_logger::Builder::from_env(env)
            .target(env_logger::Target::Stderr)
            .try_init()?;
        return Ok(());
    }

    let log_dir = log_dir(home_dir);
    std::fs::create_dir_all(&log_dir)?;
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join("zam.log"))?;

    env_logger::Builder::from_env(env)
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .try_init()?;
    Ok(())
}
