//! Workspace file access
//!
//! All file operations of the preparation pipeline go through the
//! [`Workspace`] trait rather than bare `std::fs` calls: a build workspace
//! may live on a remote execution host, and the trait is the seam where a
//! remote-aware implementation plugs in. [`LocalWorkspace`] is the
//! implementation for builds running on the local host.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// File system rooted at a build's working directory
///
/// Implementations must place files on the same execution host that will
/// later run the interpreter.
pub trait Workspace: Send + Sync {
    /// Root directory of the workspace
    fn root(&self) -> &Path;

    /// Creates a uniquely named temp file containing `content` and returns
    /// its path
    ///
    /// Uniqueness must hold per call, not per configuration, so concurrent
    /// builds sharing a workspace never collide.
    ///
    /// # Errors
    ///
    /// Returns an IO error if the workspace is unavailable or the file
    /// cannot be written.
    fn create_temp_file(&self, prefix: &str, suffix: &str, content: &str) -> io::Result<PathBuf>;

    /// Checks whether a file exists on the workspace host
    ///
    /// # Errors
    ///
    /// Returns an IO error if the check itself fails (distinct from the file
    /// simply being absent).
    fn exists(&self, path: &Path) -> io::Result<bool>;

    /// Reads a file on the workspace host as text
    ///
    /// # Errors
    ///
    /// Returns an IO error if the file cannot be read.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Deletes a file, returning whether it existed
    ///
    /// # Errors
    ///
    /// Returns an IO error if an existing file could not be removed.
    fn delete(&self, path: &Path) -> io::Result<bool>;
}

/// Workspace on the local file system
#[derive(Debug, Clone)]
pub struct LocalWorkspace {
    root: PathBuf,
}

impl LocalWorkspace {
    /// Creates a workspace rooted at `root`, creating the directory if
    /// needed
    ///
    /// # Errors
    ///
    /// Returns an IO error if the directory cannot be created.
    pub fn new(root: impl Into<PathBuf>) -> io::Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// Resolves a possibly relative path against the workspace root
    #[must_use]
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}

impl Workspace for LocalWorkspace {
    fn root(&self) -> &Path {
        &self.root
    }

    fn create_temp_file(&self, prefix: &str, suffix: &str, content: &str) -> io::Result<PathBuf> {
        let unique_name = format!("{}{}{}", prefix, Uuid::new_v4(), suffix);
        let path = self.root.join(unique_name);
        fs::write(&path, content)?;
        Ok(path)
    }

    fn exists(&self, path: &Path) -> io::Result<bool> {
        self.resolve(path).try_exists()
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        fs::read_to_string(self.resolve(path))
    }

    fn delete(&self, path: &Path) -> io::Result<bool> {
        let resolved = self.resolve(path);
        match fs::remove_file(&resolved) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e),
        }
    }
}
