//! Disk-space probing via statvfs.

use std::path::Path;

use nix::sys::statvfs::{statvfs, FsFlags};

use crate::{Branch, BranchError};

/// A snapshot of one branch's underlying filesystem capacity.
///
/// Thin, owned copy of the statvfs fields the routing engine cares about.
/// Captured synchronously on the calling thread; a slow device stalls only
/// the call probing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiskSpace {
    /// Preferred I/O block size.
    pub bsize: u64,
    /// Fundamental block size (the unit for the block counts below).
    pub frsize: u64,
    /// Total blocks.
    pub blocks: u64,
    /// Free blocks.
    pub bfree: u64,
    /// Blocks available to unprivileged users.
    pub bavail: u64,
    /// Total inodes.
    pub files: u64,
    /// Free inodes.
    pub ffree: u64,
    /// Inodes available to unprivileged users.
    pub favail: u64,
    /// Filesystem id, used to de-duplicate branches backed by the same
    /// device (bind mounts, overlapping branches).
    pub fsid: u64,
    /// Whether the underlying filesystem itself is mounted read-only.
    pub readonly: bool,
    /// Maximum filename length.
    pub namemax: u64,
}

impl DiskSpace {
    /// Probe the filesystem containing `path`.
    pub fn probe(path: &Path) -> Result<DiskSpace, BranchError> {
        let vfs = statvfs(path).map_err(|source| BranchError::Probe {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(DiskSpace {
            bsize: vfs.block_size() as u64,
            frsize: vfs.fragment_size() as u64,
            blocks: vfs.blocks() as u64,
            bfree: vfs.blocks_free() as u64,
            bavail: vfs.blocks_available() as u64,
            files: vfs.files() as u64,
            ffree: vfs.files_free() as u64,
            favail: vfs.files_available() as u64,
            fsid: vfs.filesystem_id() as u64,
            readonly: vfs.flags().contains(FsFlags::ST_RDONLY),
            namemax: vfs.name_max() as u64,
        })
    }

    /// Probe the filesystem backing a branch.
    pub fn probe_branch(branch: &Branch) -> Result<DiskSpace, BranchError> {
        Self::probe(branch.path())
    }

    /// Bytes available to unprivileged users. This is the number the
    /// free-space policies compare against `minfreespace`.
    pub fn available_bytes(&self) -> u64 {
        self.frsize.saturating_mul(self.bavail)
    }

    /// Bytes free overall (including the root-reserved portion).
    pub fn free_bytes(&self) -> u64 {
        self.frsize.saturating_mul(self.bfree)
    }

    /// Total capacity in bytes.
    pub fn total_bytes(&self) -> u64 {
        self.frsize.saturating_mul(self.blocks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DiskSpace {
        DiskSpace {
            bsize: 4096,
            frsize: 4096,
            blocks: 1000,
            bfree: 600,
            bavail: 500,
            files: 100,
            ffree: 90,
            favail: 90,
            fsid: 7,
            readonly: false,
            namemax: 255,
        }
    }

    #[test]
    fn byte_conversions_use_frsize() {
        let ds = sample();
        assert_eq!(ds.total_bytes(), 4096 * 1000);
        assert_eq!(ds.free_bytes(), 4096 * 600);
        assert_eq!(ds.available_bytes(), 4096 * 500);
    }

    #[test]
    fn probe_real_directory() {
        let dir = tempfile::tempdir().unwrap();
        let ds = DiskSpace::probe(dir.path()).unwrap();
        assert!(ds.frsize > 0);
        assert!(ds.blocks >= ds.bfree);
        assert!(ds.bfree >= ds.bavail);
    }

    #[test]
    fn probe_missing_path_fails() {
        let err = DiskSpace::probe(Path::new("/nonexistent/mosaicfs/branch")).unwrap_err();
        assert!(matches!(err, BranchError::Probe { .. }));
    }
}
