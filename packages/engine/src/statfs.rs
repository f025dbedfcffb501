//! Statfs aggregation across branches.
//!
//! Combines per-branch statvfs results into the single summary the union
//! reports to the kernel. Scope picks which branches participate (all of
//! them, or only those holding the queried path); the ignore mode then
//! drops the free/available contribution of read-only or no-create
//! branches; finally branches on the same underlying device are counted
//! once, so bind-mounted or overlapping branches never double-count
//! capacity.

use std::collections::HashSet;
use std::path::Path;

use mosaicfs_branch::{Branch, BranchSet, DiskSpace};
use mosaicfs_policy::{Probe, RouteError};
use tracing::{debug, warn};

use crate::config::{StatfsIgnore, StatfsScope};

/// Per-branch capacity, as a seam so aggregation is testable without disks.
pub trait SpaceSource {
    fn disk_space(&self, branch: &Branch) -> Result<DiskSpace, RouteError>;
}

/// The real statvfs source.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsSpaceSource;

impl SpaceSource for FsSpaceSource {
    fn disk_space(&self, branch: &Branch) -> Result<DiskSpace, RouteError> {
        DiskSpace::probe_branch(branch).map_err(|_| RouteError::Io(libc::EIO))
    }
}

/// The aggregated filesystem statistics reported for the union.
///
/// Block counts are normalized to `frsize` (the minimum fragment size
/// across the included branches).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatfsSummary {
    pub bsize: u64,
    pub frsize: u64,
    pub blocks: u64,
    pub bfree: u64,
    pub bavail: u64,
    pub files: u64,
    pub ffree: u64,
    pub favail: u64,
    pub namemax: u64,
}

/// Aggregate statfs for `rel_path` under the given scope and ignore mode.
pub fn aggregate(
    branches: &BranchSet,
    rel_path: &Path,
    scope: StatfsScope,
    ignore: StatfsIgnore,
    probe: &dyn Probe,
    space: &dyn SpaceSource,
) -> Result<StatfsSummary, RouteError> {
    // Scope selection: (branch, its capacity snapshot).
    let mut included: Vec<(&Branch, DiskSpace)> = Vec::with_capacity(branches.len());
    let mut seen_devices: HashSet<u64> = HashSet::new();

    for branch in branches {
        if scope == StatfsScope::Full {
            match probe.exists(branch, rel_path) {
                Ok(true) => {}
                // A missing path or an unprobeable branch drops out.
                Ok(false) => continue,
                Err(e) => {
                    debug!(branch = %branch.path().display(), error = %e,
                           "statfs existence probe failed, branch skipped");
                    continue;
                }
            }
        }

        let ds = match space.disk_space(branch) {
            Ok(ds) => ds,
            Err(e) => {
                warn!(branch = %branch.path().display(), error = %e,
                      "statfs probe failed, branch skipped");
                continue;
            }
        };

        // One count per underlying device.
        if seen_devices.insert(ds.fsid) {
            included.push((branch, ds));
        }
    }

    if included.is_empty() {
        return Err(match scope {
            StatfsScope::Full => RouteError::NotFound,
            StatfsScope::Base => RouteError::Io(libc::EIO),
        });
    }

    let frsize = included.iter().map(|(_, ds)| ds.frsize.max(1)).min().unwrap_or(1);
    let bsize = included.iter().map(|(_, ds)| ds.bsize.max(1)).min().unwrap_or(1);
    let namemax = included.iter().map(|(_, ds)| ds.namemax).min().unwrap_or(0);

    let mut summary = StatfsSummary {
        bsize,
        frsize,
        blocks: 0,
        bfree: 0,
        bavail: 0,
        files: 0,
        ffree: 0,
        favail: 0,
        namemax,
    };

    for (branch, ds) in included {
        summary.blocks += scale(ds.blocks, ds.frsize, frsize);
        summary.files += ds.files;

        if ignored(branch, &ds, ignore) {
            // Capacity still counts; free space does not.
            continue;
        }

        summary.bfree += scale(ds.bfree, ds.frsize, frsize);
        summary.bavail += scale(ds.bavail, ds.frsize, frsize);
        summary.ffree += ds.ffree;
        summary.favail += ds.favail;
    }

    Ok(summary)
}

/// Whether a branch's free space is excluded from the totals.
///
/// `ro` excludes branches tagged read-only or no-create, plus branches
/// whose underlying filesystem is itself mounted read-only; `nc` excludes
/// only the no-create tag.
fn ignored(branch: &Branch, ds: &DiskSpace, ignore: StatfsIgnore) -> bool {
    use mosaicfs_branch::BranchMode;

    match ignore {
        StatfsIgnore::None => false,
        StatfsIgnore::Ro => branch.mode() != BranchMode::ReadWrite || ds.readonly,
        StatfsIgnore::Nc => branch.mode() == BranchMode::NoCreate,
    }
}

/// Re-express `blocks` of `from` fragment size in `to` fragment size.
fn scale(blocks: u64, from: u64, to: u64) -> u64 {
    if from == to {
        return blocks;
    }
    ((blocks as u128 * from.max(1) as u128) / to.max(1) as u128) as u64
}
