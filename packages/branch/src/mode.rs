//! Branch capability modes.

use std::fmt;
use std::str::FromStr;

use crate::BranchError;

/// What a branch permits.
///
/// `ReadWrite` branches accept everything. `ReadOnly` branches reject all
/// writes. `NoCreate` branches accept writes to existing files but are
/// never selected for creating new paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BranchMode {
    /// Full read/write access.
    ReadWrite,
    /// No writes of any kind.
    ReadOnly,
    /// Writable, but new paths are never created here.
    NoCreate,
}

impl BranchMode {
    /// The spec tag used in branch specs (`RW`, `RO`, `NC`).
    pub fn tag(&self) -> &'static str {
        match self {
            BranchMode::ReadWrite => "RW",
            BranchMode::ReadOnly => "RO",
            BranchMode::NoCreate => "NC",
        }
    }
}

impl fmt::Display for BranchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for BranchMode {
    type Err = BranchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "RW" => Ok(BranchMode::ReadWrite),
            "RO" => Ok(BranchMode::ReadOnly),
            "NC" => Ok(BranchMode::NoCreate),
            _ => Err(BranchError::InvalidMode { tag: s.to_string() }),
        }
    }
}
