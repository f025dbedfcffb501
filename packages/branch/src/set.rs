//! Ordered, immutable branch snapshots.

use std::collections::HashSet;
use std::ops::Index;
use std::path::PathBuf;

use crate::{Branch, BranchError};

/// An ordered, immutable snapshot of all branches at a point in time.
///
/// Order is the tie-break priority for every order-sensitive policy: the
/// earlier a branch appears, the higher its priority. A set is built once
/// (at mount or reconfiguration) and then only ever read; swapping in a new
/// configuration installs a whole new `BranchSet`, so readers holding an
/// old one always see a complete, internally consistent view.
///
/// Invariants enforced at construction: non-empty, no duplicate paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchSet {
    branches: Vec<Branch>,
}

impl BranchSet {
    /// Build a set from ordered branches, validating the invariants.
    pub fn new(branches: Vec<Branch>) -> Result<Self, BranchError> {
        if branches.is_empty() {
            return Err(BranchError::EmptySet);
        }

        let mut seen: HashSet<&std::path::Path> = HashSet::new();
        for branch in &branches {
            if !seen.insert(branch.path()) {
                return Err(BranchError::DuplicatePath {
                    path: branch.path().to_path_buf(),
                });
            }
        }

        Ok(BranchSet { branches })
    }

    /// Number of branches in the set.
    pub fn len(&self) -> usize {
        self.branches.len()
    }

    /// Always false; an empty set cannot be constructed.
    pub fn is_empty(&self) -> bool {
        self.branches.is_empty()
    }

    /// Iterate branches in priority order.
    pub fn iter(&self) -> std::slice::Iter<'_, Branch> {
        self.branches.iter()
    }

    /// The branch at `index`, or `None` past the end.
    pub fn get(&self, index: usize) -> Option<&Branch> {
        self.branches.get(index)
    }

    /// The base directories of every branch, in order.
    pub fn paths(&self) -> Vec<PathBuf> {
        self.branches.iter().map(|b| b.path().to_path_buf()).collect()
    }
}

impl Index<usize> for BranchSet {
    type Output = Branch;

    fn index(&self, index: usize) -> &Branch {
        &self.branches[index]
    }
}

impl<'a> IntoIterator for &'a BranchSet {
    type Item = &'a Branch;
    type IntoIter = std::slice::Iter<'a, Branch>;

    fn into_iter(self) -> Self::IntoIter {
        self.branches.iter()
    }
}
