//! Search/create/action orchestration over one config snapshot.

use std::path::Path;

use mosaicfs_branch::Branch;
use mosaicfs_policy::{Category, FsCall, Probe, RouteError};
use tracing::debug;

use crate::Config;

/// Resolves filesystem calls to branch targets against one snapshot.
///
/// Borrowing the snapshot (rather than the handle) is what gives a call its
/// consistency guarantee: every resolution this resolver performs sees the
/// same branches and bindings, however long the call runs and whatever a
/// concurrent reconfiguration does.
pub struct PathResolver<'a> {
    config: &'a Config,
    probe: &'a dyn Probe,
}

impl<'a> PathResolver<'a> {
    pub fn new(config: &'a Config, probe: &'a dyn Probe) -> Self {
        PathResolver { config, probe }
    }

    /// Resolve a read-style call. The first branch is authoritative; later
    /// ones are fallback candidates for callers that can retry.
    ///
    /// A permission failure (or any other hard error) on a probed branch is
    /// never masked by another branch merely lacking the path.
    pub fn search(&self, call: FsCall, rel_path: &Path) -> Result<Vec<&'a Branch>, RouteError> {
        debug_assert_eq!(call.category(), Category::Search);
        self.select(call, rel_path)
    }

    /// Resolve a call creating a brand-new path to its single target
    /// branch. Ineligible branches (read-only, no-create, below their
    /// free-space floor) were filtered by the policy; with no eligible
    /// branch this fails with `ReadOnly` or `NoSpace`, never a silent no-op.
    pub fn create(&self, call: FsCall, rel_path: &Path) -> Result<&'a Branch, RouteError> {
        debug_assert_eq!(call.category(), Category::Create);
        let selected = self.select(call, rel_path)?;
        // Create policies rank; only the head is a creation target.
        Ok(selected[0])
    }

    /// Resolve a mutating call to every branch it must be applied to, in
    /// set order.
    ///
    /// The caller applies the action branch by branch and stops at the
    /// first hard error, returning it verbatim; branches already updated
    /// are not rolled back. With `ignorepponrename=true`, rename and link
    /// drop path preservation and target only the first existing branch.
    pub fn action(&self, call: FsCall, rel_path: &Path) -> Result<Vec<&'a Branch>, RouteError> {
        debug_assert_eq!(call.category(), Category::Action);
        let mut selected = self.select(call, rel_path)?;

        if self.config.ignore_pp_on_rename && matches!(call, FsCall::Rename | FsCall::Link) {
            selected.truncate(1);
        }

        Ok(selected)
    }

    /// Category-dispatching convenience for handlers that treat all
    /// resolutions uniformly.
    pub fn resolve(&self, call: FsCall, rel_path: &Path) -> Result<Vec<&'a Branch>, RouteError> {
        match call.category() {
            Category::Search => self.search(call, rel_path),
            Category::Create => self.create(call, rel_path).map(|b| vec![b]),
            Category::Action => self.action(call, rel_path),
        }
    }

    fn select(&self, call: FsCall, rel_path: &Path) -> Result<Vec<&'a Branch>, RouteError> {
        let policy = self.config.policy_for(call);
        let indices = policy
            .select(
                self.config.branches(),
                rel_path,
                self.config.min_free_space,
                self.probe,
            )
            .inspect_err(|e| {
                debug!(call = %call, policy = policy.name(),
                       path = %rel_path.display(), error = %e, "no branch selected");
            })?;

        // Policies return non-empty index lists or an error; rely on it.
        Ok(indices
            .into_iter()
            .map(|i| &self.config.branches()[i])
            .collect())
    }
}
