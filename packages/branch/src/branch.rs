//! A single backing directory.

use std::path::{Path, PathBuf};

use crate::BranchMode;

/// One backing directory merged into the union tree.
///
/// Immutable once constructed. Reconfiguration replaces whole branches
/// (and whole [`BranchSet`](crate::BranchSet)s), never edits them in place,
/// so a branch handed to a policy can be read without synchronization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Branch {
    path: PathBuf,
    mode: BranchMode,
    min_free_space: Option<u64>,
}

impl Branch {
    /// Create a branch rooted at `path`.
    pub fn new(path: impl Into<PathBuf>, mode: BranchMode) -> Self {
        Branch {
            path: path.into(),
            mode,
            min_free_space: None,
        }
    }

    /// Create a branch with a per-branch free-space floor overriding the
    /// global `minfreespace`.
    pub fn with_min_free_space(
        path: impl Into<PathBuf>,
        mode: BranchMode,
        min_free_space: u64,
    ) -> Self {
        Branch {
            path: path.into(),
            mode,
            min_free_space: Some(min_free_space),
        }
    }

    /// The branch's base directory.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The branch's capability mode.
    pub fn mode(&self) -> BranchMode {
        self.mode
    }

    /// The per-branch free-space floor, if one was configured.
    pub fn min_free_space(&self) -> Option<u64> {
        self.min_free_space
    }

    /// The free-space floor that applies to this branch: the per-branch
    /// override when present, otherwise the global value.
    pub fn effective_min_free(&self, global: u64) -> u64 {
        self.min_free_space.unwrap_or(global)
    }

    /// Whether new paths may be created on this branch.
    pub fn allows_create(&self) -> bool {
        self.mode == BranchMode::ReadWrite
    }

    /// Whether this branch rejects all writes.
    pub fn is_read_only(&self) -> bool {
        self.mode == BranchMode::ReadOnly
    }

    /// Join a union-relative path onto this branch's base directory.
    ///
    /// Leading separators on `rel` are stripped so an absolute-looking
    /// union path still lands inside the branch.
    pub fn full_path(&self, rel: &Path) -> PathBuf {
        let rel = rel.strip_prefix("/").unwrap_or(rel);
        self.path.join(rel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_path_strips_leading_separator() {
        let b = Branch::new("/mnt/disk1", BranchMode::ReadWrite);
        assert_eq!(
            b.full_path(Path::new("/a/b.txt")),
            PathBuf::from("/mnt/disk1/a/b.txt")
        );
        assert_eq!(
            b.full_path(Path::new("a/b.txt")),
            PathBuf::from("/mnt/disk1/a/b.txt")
        );
    }

    #[test]
    fn effective_min_free_prefers_override() {
        let b = Branch::with_min_free_space("/mnt/disk1", BranchMode::ReadWrite, 1024);
        assert_eq!(b.effective_min_free(4096), 1024);

        let b = Branch::new("/mnt/disk1", BranchMode::ReadWrite);
        assert_eq!(b.effective_min_free(4096), 4096);
    }

    #[test]
    fn create_capability_follows_mode() {
        assert!(Branch::new("/a", BranchMode::ReadWrite).allows_create());
        assert!(!Branch::new("/a", BranchMode::ReadOnly).allows_create());
        assert!(!Branch::new("/a", BranchMode::NoCreate).allows_create());
        assert!(Branch::new("/a", BranchMode::ReadOnly).is_read_only());
        assert!(!Branch::new("/a", BranchMode::NoCreate).is_read_only());
    }
}
