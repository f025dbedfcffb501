//! The live-filesystem seam policies probe through.
//!
//! Policies are pure over the branch snapshot; everything they need from the
//! real world (does the path exist on this branch, how much space is left)
//! goes through [`Probe`]. Production uses [`FsProbe`]; tests and embedders
//! use [`FixedProbe`] to script branch state without touching disks.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use mosaicfs_branch::{Branch, DiskSpace};

use crate::RouteError;

/// Live branch state, as far as selection is concerned.
pub trait Probe: Send + Sync {
    /// Whether `rel_path` exists on `branch` (lstat semantics: a dangling
    /// symlink counts as existing).
    fn exists(&self, branch: &Branch, rel_path: &Path) -> Result<bool, RouteError>;

    /// Bytes available to unprivileged users on the branch's filesystem.
    fn free_space(&self, branch: &Branch) -> Result<u64, RouteError>;
}

/// The real thing: lstat + statvfs, synchronously on the calling thread.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsProbe;

impl Probe for FsProbe {
    fn exists(&self, branch: &Branch, rel_path: &Path) -> Result<bool, RouteError> {
        match std::fs::symlink_metadata(branch.full_path(rel_path)) {
            Ok(_) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn free_space(&self, branch: &Branch) -> Result<u64, RouteError> {
        let space = DiskSpace::probe_branch(branch)
            .map_err(|_| RouteError::Io(libc::EIO))?;
        Ok(space.available_bytes())
    }
}

/// A scripted probe for tests and embedders.
///
/// Branch state is keyed by branch base path. Paths not marked as existing
/// do not exist; branches without a free-space entry report zero bytes.
/// Either lookup can be overridden to fail with a specific [`RouteError`].
#[derive(Debug, Default)]
pub struct FixedProbe {
    existing: HashMap<PathBuf, Vec<PathBuf>>,
    free: HashMap<PathBuf, u64>,
    exists_errors: HashMap<PathBuf, RouteError>,
    free_errors: HashMap<PathBuf, RouteError>,
}

impl FixedProbe {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `rel_path` as existing on the branch rooted at `base`.
    pub fn with_existing(mut self, base: impl Into<PathBuf>, rel_path: impl Into<PathBuf>) -> Self {
        self.existing.entry(base.into()).or_default().push(rel_path.into());
        self
    }

    /// Set the available bytes reported for the branch rooted at `base`.
    pub fn with_free_space(mut self, base: impl Into<PathBuf>, bytes: u64) -> Self {
        self.free.insert(base.into(), bytes);
        self
    }

    /// Make existence probes on `base` fail.
    pub fn with_exists_error(mut self, base: impl Into<PathBuf>, error: RouteError) -> Self {
        self.exists_errors.insert(base.into(), error);
        self
    }

    /// Make free-space probes on `base` fail.
    pub fn with_free_space_error(mut self, base: impl Into<PathBuf>, error: RouteError) -> Self {
        self.free_errors.insert(base.into(), error);
        self
    }
}

impl Probe for FixedProbe {
    fn exists(&self, branch: &Branch, rel_path: &Path) -> Result<bool, RouteError> {
        if let Some(e) = self.exists_errors.get(branch.path()) {
            return Err(*e);
        }
        let rel = rel_path.strip_prefix("/").unwrap_or(rel_path);
        Ok(self
            .existing
            .get(branch.path())
            .is_some_and(|paths| paths.iter().any(|p| p == rel)))
    }

    fn free_space(&self, branch: &Branch) -> Result<u64, RouteError> {
        if let Some(e) = self.free_errors.get(branch.path()) {
            return Err(*e);
        }
        Ok(self.free.get(branch.path()).copied().unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mosaicfs_branch::BranchMode;
    use std::fs;

    #[test]
    fn fs_probe_sees_real_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub/file.txt"), b"x").unwrap();

        let branch = Branch::new(dir.path(), BranchMode::ReadWrite);
        let probe = FsProbe;
        assert!(probe.exists(&branch, Path::new("sub/file.txt")).unwrap());
        assert!(probe.exists(&branch, Path::new("/sub/file.txt")).unwrap());
        assert!(!probe.exists(&branch, Path::new("sub/missing")).unwrap());
        assert!(probe.free_space(&branch).unwrap() > 0);
    }

    #[test]
    fn fixed_probe_scripts_state() {
        let probe = FixedProbe::new()
            .with_existing("/b0", "a.txt")
            .with_free_space("/b0", 1024)
            .with_exists_error("/b1", RouteError::PermissionDenied);

        let b0 = Branch::new("/b0", BranchMode::ReadWrite);
        let b1 = Branch::new("/b1", BranchMode::ReadWrite);

        assert!(probe.exists(&b0, Path::new("/a.txt")).unwrap());
        assert!(!probe.exists(&b0, Path::new("b.txt")).unwrap());
        assert_eq!(probe.free_space(&b0).unwrap(), 1024);
        assert_eq!(probe.free_space(&b1).unwrap(), 0);
        assert_eq!(
            probe.exists(&b1, Path::new("a.txt")).unwrap_err(),
            RouteError::PermissionDenied
        );
    }
}
