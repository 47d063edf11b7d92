#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

use zam_lib::{AliasRepository, DiskFs, Paths};

/// Result type for zam command execution
pub struct ZamCommandResult {
    pub stdout: String,
    pub stderr: String,
    pub success: bool,
    pub code: Option<i32>,
}

/// Run a zam command with `HOME` pointed at `temp_dir`
pub fn run_zam_command(args: &[&str], temp_dir: &TempDir, config_file: Option<&Path>) -> ZamCommandResult {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_zam"));

    if let Some(config) = config_file {
        cmd.args(["--config", config.to_str().expect("config path is utf-8")]);
    }

    cmd.args(args);
    cmd.env("HOME", temp_dir.path());
    cmd.env("NO_COLOR", "1");
    cmd.env("EDITOR", "false");
    cmd.env_remove("VISUAL");
    cmd.env_remove("ZAM_EDITOR");
    cmd.env_remove("ZAM_LOG_STDERR");

    let output = cmd.output().expect("Failed to run zam command");

    ZamCommandResult {
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        success: output.status.success(),
        code: output.status.code(),
    }
}

/// Default file layout under a temporary home
pub fn temp_paths(temp_dir: &TempDir) -> Paths {
    Paths::under(temp_dir.path())
}

pub fn disk_repo(temp_dir: &TempDir) -> AliasRepository<DiskFs> {
    AliasRepository::new(DiskFs, temp_paths(temp_dir))
}

pub fn write_file(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("Failed to create parent dir");
    }
    std::fs::write(path, contents).expect("Failed to write file");
}

pub fn read_file(path: &Path) -> String {
    std::fs::read_to_string(path).unwrap_or_else(|e| panic!("Failed to read {:?}: {}", path, e))
}

pub fn backups_in(dir: &Path) -> Vec<PathBuf> {
    let mut entries: Vec<PathBuf> = match std::fs::read_dir(dir) {
        Ok(entries) => entries.filter_map(|e| e.ok()).map(|e| e.path()).collect(),
        Err(_) => Vec::new(),
    };
    entries.sort();
    entries
}
