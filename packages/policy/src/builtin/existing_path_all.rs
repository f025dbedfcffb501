//! `epall` - every branch where the path exists.

use std::path::Path;

use mosaicfs_branch::BranchSet;

use crate::{Category, Policy, Probe, RouteError};

/// Action policy: every branch containing the path, in set order.
///
/// This is the path-preserving default for mutating calls: applying the
/// action everywhere the path already lives keeps each branch's directory
/// tree self-consistent. The caller walks the returned branches in order
/// and stops at the first hard failure (no rollback of earlier branches).
#[derive(Debug, Clone, Copy, Default)]
pub struct ExistingPathAll;

impl Policy for ExistingPathAll {
    fn name(&self) -> &'static str {
        "epall"
    }

    fn supports(&self, category: Category) -> bool {
        category == Category::Action
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FixedProbe;
    use mosaicfs_branch::{Branch, BranchMode};

    #[test]
    fn selects_every_branch_with_the_path() {
        let set = BranchSet::new(vec![
            Branch::new("/b0", BranchMode::ReadWrite),
            Branch::new("/b1", BranchMode::ReadWrite),
            Branch::new("/b2", BranchMode::ReadWrite),
        ])
        .unwrap();
        let probe = FixedProbe::new()
            .with_existing("/b0", "d/f")
            .with_existing("/b2", "d/f");

        let sel = ExistingPathAll.select(&set, Path::new("d/f"), 0, &probe).unwrap();
        assert_eq!(sel, vec![0, 2]);
    }

    #[test]
    fn absent_everywhere_is_not_found() {
        let set = BranchSet::new(vec![Branch::new("/b0", BranchMode::ReadWrite)]).unwrap();
        let err = ExistingPathAll
            .select(&set, Path::new("d/f"), 0, &FixedProbe::new())
            .unwrap_err();
        assert_eq!(err, RouteError::NotFound);
    }

    #[test]
    fn action_only() {
        assert!(ExistingPathAll.supports(Category::Action));
        assert!(!ExistingPathAll.supports(Category::Search));
        assert!(!ExistingPathAll.supports(Category::Create));
    }
}
