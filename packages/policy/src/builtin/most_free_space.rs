//! `mfs` - most free space.

use std::path::Path;

use mosaicfs_branch::BranchSet;
use tracing::trace;

use crate::{Category, Policy, Probe, RouteError};

/// Create policy: the eligible branch with the most available bytes.
///
/// Eligible means mode ReadWrite (ReadOnly and NoCreate branches are never
/// creation targets) with available space at or above the branch's
/// effective free-space floor. Ties go to the earlier branch. With no
/// eligible branch the outcome distinguishes "everything is write-
/// prohibited" (`ReadOnly`) from "writable but full" (`NoSpace`).
#[derive(Debug, Clone, Copy, Default)]
pub struct MostFreeSpace;

impl Policy for MostFreeSpace {
    fn name(&self) -> &'static str {
        "mfs"
    }

    fn supports(&self, category: Category) -> bool {
        category == Category::Create
    }

    fn select(
        &self,
        branches: &BranchSet,
        rel_path: &Path,
        min_free_space: u64,
        probe: &dyn Probe,
    ) -> Result<Vec<usize>, RouteError> {
        let mut best: Option<(usize, u64)> = None;
        let mut any_writable = false;
        let mut probe_error: Option<RouteError> = None;

        for (index, branch) in branches.iter().enumerate() {
            if !branch.allows_create() {
                continue;
            }
            any_writable = true;

            let free = match probe.free_space(branch) {
                Ok(free) => free,
                Err(e) => {
                    // Tolerated: an unprobeable branch just drops out.
                    probe_error = RouteError::prefer(probe_error, e);
                    continue;
                }
            };

            if free < branch.effective_min_free(min_free_space) {
                continue;
            }

            // Strict > keeps the earliest branch on ties.
            if best.map_or(true, |(_, best_free)| free > best_free) {
                best = Some((index, free));
            }
        }

        match best {
            Some((index, free)) => {
                trace!(branch = %branches[index].path().display(),
                       free, path = %rel_path.display(), "mfs selected");
                Ok(vec![index])
            }
            None if !any_writable => Err(RouteError::ReadOnly),
            None => Err(probe_error
                .filter(|e| *e != RouteError::NotFound)
                .unwrap_or(RouteError::NoSpace)),
        }
    }
}
