use log::debug;
use std::collections::{BTreeMap, BTreeSet};
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Plain-file capabilities the repository and handlers need
pub trait FileSystem {
    fn exists(&self, path: &Path) -> bool;
    fn read_to_string(&self, path: &Path) -> io::Result<String>;
    fn write(&mut self, path: &Path, contents: &str) -> io::Result<()>;
    fn append(&mut self, path: &Path, contents: &str) -> io::Result<()>;
    fn copy(&mut self, from: &Path, to: &Path) -> io::Result<()>;
    /// Entries of a directory, sorted by path. A missing directory is empty.
    fn list_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>>;
}

/// The real filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct DiskFs;

fn ensure_parent(path: &Path) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// The file a write to `path` must replace. A symlink is followed so the
/// rename lands on its target and the link itself survives.
fn write_target(path: &Path) -> io::Result<PathBuf> {
    match fs::symlink_metadata(path) {
        Ok(meta) if meta.file_type().is_symlink() => match fs::canonicalize(path) {
            Ok(resolved) => Ok(resolved),
            // Dangling link: write where it points
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                let link = fs::read_link(path)?;
                Ok(path.parent().map(|parent| parent.join(&link)).unwrap_or(link))
            }
            Err(e) => Err(e),
        },
        _ => Ok(path.to_path_buf()),
    }
}

impl FileSystem for DiskFs {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        fs::read_to_string(path)
    }

    fn write(&mut self, path: &Path, contents: &str) -> io::Result<()> {
        let target = write_target(path)?;
        ensure_parent(&target)?;

        // Write to temporary file first, then rename
        let temp_path = target.with_extension("zam-tmp");
        fs::write(&temp_path, contents)?;
        fs::rename(&temp_path, &target)?;

        debug!("Wrote {} bytes to {:?}", contents.len(), target);
        Ok(())
    }

    fn append(&mut self, path: &Path, contents: &str) -> io::Result<()> {
        ensure_parent(path)?;
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        file.write_all(contents.as_bytes())?;
        debug!("Appended {} bytes to {:?}", contents.len(), path);
        Ok(())
    }

    fn copy(&mut self, from: &Path, to: &Path) -> io::Result<()> {
        ensure_parent(to)?;
        fs::copy(from, to)?;
        debug!("Copied {:?} -> {:?}", from, to);
        Ok(())
    }

    fn list_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        let entries = match fs::read_dir(path) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };
        let mut paths = entries
            .map(|entry| entry.map(|e| e.path()))
            .collect::<io::Result<Vec<_>>>()?;
        paths.sort();
        Ok(paths)
    }
}

/// A mutating call made against [`MemoryFs`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FsCall {
    Write(PathBuf),
    Append(PathBuf),
    Copy(PathBuf, PathBuf),
}

/// In-memory filesystem that records every mutating call
#[derive(Debug, Clone, Default)]
pub struct MemoryFs {
    files: BTreeMap<PathBuf, String>,
    denied: BTreeSet<PathBuf>,
    calls: Vec<FsCall>,
}

impl MemoryFs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a file without recording a call
    pub fn with_file<P: Into<PathBuf>>(mut self, path: P, contents: &str) -> Self {
        self.files.insert(path.into(), contents.to_string());
        self
    }

    /// Make every mutation of `path` fail with `PermissionDenied`
    pub fn deny<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.denied.insert(path.into());
        self
    }

    pub fn contents(&self, path: &Path) -> Option<&str> {
        self.files.get(path).map(String::as_str)
    }

    pub fn calls(&self) -> &[FsCall] {
        &self.calls
    }

    pub fn mutation_count(&self) -> usize {
        self.calls.len()
    }

    fn check(&self, path: &Path) -> io::Result<()> {
        if self.denied.contains(path) {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "permission denied"));
        }
        Ok(())
    }

    fn missing(path: &Path) -> io::Error {
        io::Error::new(io::ErrorKind::NotFound, format!("{} does not exist", path.display()))
    }
}

impl FileSystem for MemoryFs {
    fn exists(&self, path: &Path) -> bool {
        self.files.contains_key(path)
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        self.files.get(path).cloned().ok_or_else(|| Self::missing(path))
    }

    fn write(&mut self, path: &Path, contents: &str) -> io::Result<()> {
        self.calls.push(FsCall::Write(path.to_path_buf()));
        self.check(path)?;
        self.files.insert(path.to_path_buf(), contents.to_string());
        Ok(())
    }

    fn append(&mut self, path: &Path, contents: &str) -> io::Result<()> {
        self.calls.push(FsCall::Append(path.to_path_buf()));
        self.check(path)?;
        self.files.entry(path.to_path_buf()).or_default().push_str(contents);
        Ok(())
    }

    fn copy(&mut self, from: &Path, to: &Path) -> io::Result<()> {
        self.calls.push(FsCall::Copy(from.to_path_buf(), to.to_path_buf()));
        self.check(to)?;
        let contents = self.read_to_string(from)?;
        self.files.insert(to.to_path_buf(), contents);
        Ok(())
    }

    fn list_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        Ok(self
            .files
            .keys()
            .filter(|file| file.parent() == Some(path))
            .cloned()
            .collect())
    }
}
