//! Mount-plan construction for the `mosaicfs` binary.
//!
//! Everything between argv and a validated, installable configuration:
//! branch-spec parsing, `-o` option application, bind-time policy
//! resolution, and the presentation metadata (fsname, subtype) the host
//! filesystem layer wants at attach time. Any error here is fatal before
//! the filesystem attaches.

use std::path::{Path, PathBuf};

use mosaicfs_branch::{parse_branch_spec, BranchError};
use mosaicfs_engine::{options, Config, ConfigError, ConfigHandle, OptionError, SUBTYPE};

/// A mount failure, reported before anything attaches.
#[derive(Debug, thiserror::Error)]
pub enum MountError {
    #[error(transparent)]
    Branch(#[from] BranchError),

    #[error(transparent)]
    Option(#[from] OptionError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// A fully validated mount: the installable config plus presentation
/// metadata.
pub struct MountPlan {
    pub handle: ConfigHandle,
    pub mount_point: PathBuf,
    pub fsname: String,
    pub subtype: &'static str,
}

/// Build a mount plan from the raw argv pieces.
///
/// `option_lists` holds each `-o` argument verbatim (comma-separated
/// tokens, possibly repeated).
pub fn plan(
    branch_spec: &str,
    mount_point: &Path,
    option_lists: &[String],
) -> Result<MountPlan, MountError> {
    let branches = parse_branch_spec(branch_spec)?;
    let fsname = options::derive_fsname(&branches);

    let mut builder = Config::builder();
    for list in option_lists {
        options::apply_option_list(&mut builder, list)?;
    }
    let config: Config = builder.branches(branches).build()?;

    Ok(MountPlan {
        handle: ConfigHandle::new(config),
        mount_point: mount_point.to_path_buf(),
        fsname,
        subtype: SUBTYPE,
    })
}
