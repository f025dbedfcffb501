//! `epff` - the first branch where the path exists.

use std::path::Path;

use mosaicfs_branch::BranchSet;

use crate::{Category, Policy, Probe, RouteError};

/// First-found restricted to a single result.
///
/// Usable for search and, more importantly, as the administrator override
/// that disables path preservation: binding an action call (or the whole
/// action category) to `epff` applies mutations to one branch only, trading
/// cross-branch tree alignment for fewer syscalls.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExistingPathFirst;

impl Policy for ExistingPathFirst {
    fn name(&self) -> &'static str {
        "epff"
    }

    fn supports(&self, category: Category) -> bool {
        matches!(category, Category::Search | Category::Action)
    }

    fn select(
        &self,
        branches: &BranchSet,
        rel_path: &Path,
        _min_free_space: u64,
        probe: &dyn Probe,
    ) -> Result<Vec<usize>, RouteError> {
        let mut found = super::scan_existing(branches, rel_path, probe)?;
        found.truncate(1);
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FixedProbe;
    use mosaicfs_branch::{Branch, BranchMode};

    #[test]
    fn returns_only_the_first_match() {
        let set = BranchSet::new(vec![
            Branch::new("/b0", BranchMode::ReadWrite),
            Branch::new("/b1", BranchMode::ReadWrite),
            Branch::new("/b2", BranchMode::ReadWrite),
        ])
        .unwrap();
        let probe = FixedProbe::new()
            .with_existing("/b1", "f")
            .with_existing("/b2", "f");

        let sel = ExistingPathFirst.select(&set, Path::new("f"), 0, &probe).unwrap();
        assert_eq!(sel, vec![1]);
    }

    #[test]
    fn supports_search_and_action() {
        assert!(ExistingPathFirst.supports(Category::Search));
        assert!(ExistingPathFirst.supports(Category::Action));
        assert!(!ExistingPathFirst.supports(Category::Create));
    }
}
