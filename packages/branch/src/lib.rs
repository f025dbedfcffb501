//! Branch data model for mosaicfs.
//!
//! A branch is one backing directory merged into the union tree, together
//! with its capability mode and an optional per-branch free-space floor.
//! Branches are grouped into an ordered, immutable [`BranchSet`]; set order
//! is the tie-break priority everywhere a policy has to choose between
//! otherwise equal branches.
//!
//! Nothing in this crate routes anything. It is the lowest layer: the value
//! types, the branch-spec parser, and the statvfs probing that higher layers
//! (policies, the resolver, statfs aggregation) consume.

mod branch;
mod error;
mod mode;
mod set;
mod space;
mod spec;

pub use branch::Branch;
pub use error::BranchError;
pub use mode::BranchMode;
pub use set::BranchSet;
pub use space::DiskSpace;
pub use spec::parse_branch_spec;
