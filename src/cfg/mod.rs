pub mod config;
pub mod loader;

pub use config::{Paths, PathsSpec, ZamConfig};
pub use loader::{get_config_path, load_config, Loader};
