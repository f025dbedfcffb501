//! `ff` - first found.

use std::path::Path;

use mosaicfs_branch::BranchSet;

use crate::{Category, Policy, Probe, RouteError};

/// Search policy: every branch containing the path, in set order.
///
/// The first candidate is authoritative; callers that can retry on failure
/// fall through to the later ones. The lowest-indexed matching branch is
/// always first - a higher-indexed branch is never preferred when a lower
/// one qualifies.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstFound;

impl Policy for FirstFound {
    fn name(&self) -> &'static str {
        "ff"
    }

    fn supports(&self, category: Category) -> bool {
        category == Category::Search
    }

    fn select(
        &self,
        branches: &BranchSet,
        rel_path: &Path,
        _min_free_space: u64,
        probe: &dyn Probe,
    ) -> Result<Vec<usize>, RouteError> {
        super::scan_existing(branches, rel_path, probe)
    }
}
