//! Branch-spec parsing.
//!
//! The mount surface describes branches as a single colon-delimited string:
//!
//! ```text
//! /mnt/disk1:/mnt/disk2=RO:/mnt/pool*=NC,1073741824
//! ```
//!
//! Each element is `path[=RW|RO|NC[,<minfree bytes>]]`. The path part may
//! contain shell glob metacharacters; it is expanded before tagging, and
//! every match inherits the element's tag and free-space floor. Literal
//! (glob-free) paths are kept verbatim even if the directory does not exist
//! yet, while a glob pattern matching nothing is an error.

use std::path::PathBuf;
use std::str::FromStr;

use crate::{Branch, BranchError, BranchMode, BranchSet};

/// Parse a colon-delimited branch spec into an ordered [`BranchSet`].
pub fn parse_branch_spec(spec: &str) -> Result<BranchSet, BranchError> {
    let mut branches = Vec::new();

    for element in spec.split(':').filter(|e| !e.is_empty()) {
        let (pattern, mode, min_free) = split_element(element)?;

        for path in expand(&pattern)? {
            branches.push(match min_free {
                Some(min) => Branch::with_min_free_space(path, mode, min),
                None => Branch::new(path, mode),
            });
        }
    }

    BranchSet::new(branches)
}

/// Split one spec element into (path pattern, mode, min-free override).
fn split_element(element: &str) -> Result<(String, BranchMode, Option<u64>), BranchError> {
    let Some((path, suffix)) = element.split_once('=') else {
        return Ok((element.to_string(), BranchMode::ReadWrite, None));
    };

    if path.is_empty() {
        return Err(BranchError::InvalidSpec {
            element: element.to_string(),
            message: "empty path".to_string(),
        });
    }

    let (tag, min_free) = match suffix.split_once(',') {
        Some((tag, min)) => {
            let min = u64::from_str(min).map_err(|_| BranchError::InvalidSpec {
                element: element.to_string(),
                message: format!("invalid minfreespace value '{}'", min),
            })?;
            (tag, Some(min))
        }
        None => (suffix, None),
    };

    Ok((path.to_string(), tag.parse()?, min_free))
}

/// Expand a path pattern, preserving literal paths that do not glob.
fn expand(pattern: &str) -> Result<Vec<PathBuf>, BranchError> {
    if !pattern.contains(['*', '?', '[']) {
        return Ok(vec![PathBuf::from(pattern)]);
    }

    let matches = glob::glob(pattern).map_err(|source| BranchError::GlobPattern {
        pattern: pattern.to_string(),
        source,
    })?;

    // glob yields matches in sorted order; per-entry I/O errors are skipped
    // the same way a shell skips unreadable directories.
    let paths: Vec<PathBuf> = matches.filter_map(Result::ok).collect();
    if paths.is_empty() {
        return Err(BranchError::GlobNoMatch {
            pattern: pattern.to_string(),
        });
    }

    Ok(paths)
}
