//! Filesystem seam for the pipeline
//!
//! Version lookup, artifact discovery and report cleanup only touch the disk
//! through [`Filesystem`]. [`OsFs`] is the real implementation; [`MemFs`]
//! keeps a file tree in memory so the whole pipeline can run in tests without
//! a scratch directory.

use crate::errors::{ApiDiffError, Result};
use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use walkdir::WalkDir;

/// Filesystem operations used by the pipeline
pub trait Filesystem {
    /// Whether a file or directory exists at `path`
    fn exists(&self, path: &Path) -> bool;

    /// Read a whole file as bytes
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;

    /// Read a whole UTF-8 file
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Create or truncate a file, creating missing parent directories
    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()>;

    /// Move a file, replacing any file already at `to`
    fn rename(&self, from: &Path, to: &Path) -> io::Result<()>;

    /// Every regular file under `root`, at most `max_depth` levels deep
    ///
    /// The first entry that cannot be visited aborts the walk with
    /// [`ApiDiffError::Traversal`]. The order of the result is unspecified.
    fn walk_files(&self, root: &Path, max_depth: usize) -> Result<Vec<PathBuf>>;
}

/// The host filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFs;

impl Filesystem for OsFs {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        std::fs::read(path)
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, contents)
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        std::fs::rename(from, to)
    }

    fn walk_files(&self, root: &Path, max_depth: usize) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in WalkDir::new(root).max_depth(max_depth) {
            let entry = entry.map_err(|e| ApiDiffError::Traversal {
                path: e
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| root.to_path_buf()),
                message: e.to_string(),
            })?;
            if entry.file_type().is_file() {
                files.push(entry.into_path());
            }
        }
        Ok(files)
    }
}

#[derive(Debug, Default)]
struct MemState {
    files: BTreeMap<PathBuf, Vec<u8>>,
    dirs: BTreeSet<PathBuf>,
    unreadable: BTreeSet<PathBuf>,
}

impl MemState {
    fn add_ancestors(&mut self, path: &Path) {
        for ancestor in path.ancestors().skip(1) {
            if ancestor.as_os_str().is_empty() {
                break;
            }
            self.dirs.insert(ancestor.to_path_buf());
        }
    }

    fn check_readable(&self, path: &Path) -> io::Result<()> {
        if self.unreadable.contains(path) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("{} is unreadable", path.display()),
            ));
        }
        Ok(())
    }
}

/// In-memory file tree
///
/// Directories exist implicitly as ancestors of files, or explicitly via
/// [`MemFs::create_dir_all`]. Paths marked with [`MemFs::mark_unreadable`]
/// fail on read and abort any walk that reaches them.
#[derive(Debug, Default)]
pub struct MemFs {
    state: Mutex<MemState>,
}

impl MemFs {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MemState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Add (or replace) a file
    pub fn add_file(&self, path: impl AsRef<Path>, contents: impl AsRef<[u8]>) {
        let path = path.as_ref();
        let mut state = self.state();
        state.add_ancestors(path);
        state
            .files
            .insert(path.to_path_buf(), contents.as_ref().to_vec());
    }

    /// Create a directory and its ancestors
    pub fn create_dir_all(&self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        let mut state = self.state();
        state.add_ancestors(path);
        state.dirs.insert(path.to_path_buf());
    }

    /// Make reads of `path`, and walks reaching it, fail
    pub fn mark_unreadable(&self, path: impl AsRef<Path>) {
        self.state().unreadable.insert(path.as_ref().to_path_buf());
    }

    /// Contents of a file as text, if present
    pub fn file(&self, path: impl AsRef<Path>) -> Option<String> {
        self.state()
            .files
            .get(path.as_ref())
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
    }

    /// All file paths, sorted
    pub fn file_paths(&self) -> Vec<PathBuf> {
        self.state().files.keys().cloned().collect()
    }
}

fn depth_below(root: &Path, path: &Path) -> Option<usize> {
    path.strip_prefix(root)
        .ok()
        .map(|rest| rest.components().count())
}

impl Filesystem for MemFs {
    fn exists(&self, path: &Path) -> bool {
        let state = self.state();
        state.files.contains_key(path) || state.dirs.contains(path)
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        let state = self.state();
        state.check_readable(path)?;
        state.files.get(path).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} not found", path.display()),
            )
        })
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        let bytes = self.read(path)?;
        String::from_utf8(bytes).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        let mut state = self.state();
        if state.unreadable.contains(path) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("{} is not writable", path.display()),
            ));
        }
        if state.dirs.contains(path) {
            return Err(io::Error::new(
                io::ErrorKind::Other,
                format!("{} is a directory", path.display()),
            ));
        }
        state.add_ancestors(path);
        state.files.insert(path.to_path_buf(), contents.to_vec());
        Ok(())
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        let mut state = self.state();
        state.check_readable(from)?;
        let bytes = state.files.remove(from).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} not found", from.display()),
            )
        })?;
        state.add_ancestors(to);
        state.files.insert(to.to_path_buf(), bytes);
        Ok(())
    }

    fn walk_files(&self, root: &Path, max_depth: usize) -> Result<Vec<PathBuf>> {
        let state = self.state();
        if !state.files.contains_key(root) && !state.dirs.contains(root) {
            return Err(ApiDiffError::Traversal {
                path: root.to_path_buf(),
                message: "No such file or directory".to_string(),
            });
        }

        let within = |path: &Path| depth_below(root, path).is_some_and(|d| d <= max_depth);

        if let Some(broken) = state.unreadable.iter().find(|p| within(p)) {
            return Err(ApiDiffError::Traversal {
                path: broken.clone(),
                message: "Permission denied".to_string(),
            });
        }

        Ok(state
            .files
            .keys()
            .filter(|p| within(p))
            .cloned()
            .collect())
    }
}
