//! The mosaicfs routing engine.
//!
//! Ties the branch model and the policy contract together into what a
//! filesystem call handler actually uses:
//!
//! - [`Config`] / [`ConfigHandle`]: the live-reconfigurable aggregate of
//!   branches, policy bindings and scalar options, read through cheap
//!   immutable snapshots.
//! - [`options`]: the `-o key=value` mount surface, parsed into a
//!   [`ConfigBuilder`] with every error fatal before the filesystem
//!   attaches.
//! - [`PathResolver`]: search/create/action orchestration over a snapshot.
//! - [`symlinkify`]: the stale read-only file substitution predicate.
//! - [`statfs`]: capacity aggregation across branches.
//! - [`UgidGuard`]: scoped effective-identity switching for permission
//!   checks against branch filesystems.

mod config;
mod handle;
pub mod options;
mod resolver;
pub mod statfs;
pub mod symlinkify;
mod ugid;

pub use config::{Config, ConfigBuilder, ConfigError, StatfsIgnore, StatfsScope, XattrMode};
pub use handle::ConfigHandle;
pub use options::OptionError;
pub use resolver::PathResolver;
pub use ugid::UgidGuard;

/// The constant filesystem subtype reported at mount time.
pub const SUBTYPE: &str = "mosaicfs";
