//! Branch selection policies for mosaicfs.
//!
//! A policy is a pure selection function: given an immutable
//! [`BranchSet`](mosaicfs_branch::BranchSet) snapshot, a union-relative
//! path, and a free-space threshold, it returns the ranked branch indices
//! that should service a call, or a typed [`RouteError`] when none qualify.
//! Policies never mutate the snapshot and never talk to the kernel except
//! through the [`Probe`] seam, which keeps every algorithm testable without
//! real disks.
//!
//! Policies come in three categories - Search (read an existing path),
//! Create (place a brand-new path), Action (mutate an existing path) - and
//! are resolved by name through the [`registry`].

mod call;
mod error;
mod probe;
pub mod registry;

pub mod builtin;

pub use call::{Category, FsCall};
pub use error::RouteError;
pub use probe::{FixedProbe, FsProbe, Probe};

use std::path::Path;

use mosaicfs_branch::BranchSet;

/// The selection contract every policy implements.
///
/// `select` returns indices into the snapshot, highest priority first. The
/// meaning of "no candidate" depends on the category and is always a typed
/// error, never a panic: Search policies report [`RouteError::NotFound`],
/// Create policies [`RouteError::ReadOnly`] or [`RouteError::NoSpace`].
pub trait Policy: Send + Sync {
    /// The registry name (`ff`, `mfs`, ...).
    fn name(&self) -> &'static str;

    /// Whether this policy may be bound to calls of `category`.
    fn supports(&self, category: Category) -> bool;

    /// Rank the branches that should service `rel_path`.
    fn select(
        &self,
        branches: &BranchSet,
        rel_path: &Path,
        min_free_space: u64,
        probe: &dyn Probe,
    ) -> Result<Vec<usize>, RouteError>;
}

/// A borrowed, process-lifetime policy handle.
pub type PolicyRef = &'static dyn Policy;
