//! The built-in policies.
//!
//! Four ship with the engine; anything else plugs into the same
//! [`Policy`](crate::Policy) contract through the registry.
//!
//! | name    | categories      | selection |
//! |---------|-----------------|-----------|
//! | `ff`    | search          | every branch containing the path, set order |
//! | `epff`  | search, action  | the first branch containing the path |
//! | `epall` | action          | every branch containing the path (path-preserving) |
//! | `mfs`   | create          | the eligible branch with the most free space |

mod existing_path_all;
mod existing_path_first;
mod first_found;
mod most_free_space;

pub use existing_path_all::ExistingPathAll;
pub use existing_path_first::ExistingPathFirst;
pub use first_found::FirstFound;
pub use most_free_space::MostFreeSpace;

use std::path::Path;

use mosaicfs_branch::BranchSet;

use crate::{Probe, RouteError};

/// Scan every branch for `rel_path`, in set order, folding probe failures
/// under the fixed errno-precedence rule.
///
/// Returns the matching indices, or the highest-precedence error when no
/// branch matched (plain `NotFound` only if nothing worse was seen).
pub(crate) fn scan_existing(
    branches: &BranchSet,
    rel_path: &Path,
    probe: &dyn Probe,
) -> Result<Vec<usize>, RouteError> {
    let mut found = Vec::new();
    let mut worst: Option<RouteError> = None;

    for (index, branch) in branches.iter().enumerate() {
        match probe.exists(branch, rel_path) {
            Ok(true) => found.push(index),
            Ok(false) => worst = RouteError::prefer(worst, RouteError::NotFound),
            Err(e) => worst = RouteError::prefer(worst, e),
        }
    }

    if found.is_empty() {
        Err(worst.unwrap_or(RouteError::NotFound))
    } else {
        Ok(found)
    }
}
