//! Error types for branch construction and probing.

use std::path::PathBuf;

/// Errors raised while building or probing branches.
///
/// Everything here is fatal at mount time (bad spec, empty set) or a
/// per-branch probe failure the caller may choose to tolerate.
#[derive(Debug, thiserror::Error)]
pub enum BranchError {
    /// A branch set must contain at least one branch.
    #[error("branch set is empty")]
    EmptySet,

    /// The same directory appeared twice in one branch set.
    #[error("duplicate branch path: {path}")]
    DuplicatePath { path: PathBuf },

    /// A mode tag other than RW/RO/NC.
    #[error("invalid branch mode tag '{tag}'")]
    InvalidMode { tag: String },

    /// A malformed element in the colon-delimited branch spec.
    #[error("invalid branch spec element '{element}': {message}")]
    InvalidSpec { element: String, message: String },

    /// A glob pattern that expanded to nothing.
    #[error("branch glob '{pattern}' matched no directories")]
    GlobNoMatch { pattern: String },

    /// A syntactically invalid glob pattern.
    #[error("invalid branch glob '{pattern}': {source}")]
    GlobPattern {
        pattern: String,
        source: glob::PatternError,
    },

    /// statvfs or stat failed on a branch directory.
    #[error("probe of branch {path} failed: {source}")]
    Probe {
        path: PathBuf,
        source: nix::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let e = BranchError::DuplicatePath {
            path: PathBuf::from("/mnt/disk1"),
        };
        assert!(format!("{}", e).contains("/mnt/disk1"));

        let e = BranchError::InvalidMode {
            tag: "XX".to_string(),
        };
        assert!(format!("{}", e).contains("XX"));
    }
}
