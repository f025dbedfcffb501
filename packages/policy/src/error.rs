//! The routing error taxonomy.
//!
//! Selection outcomes travel as a small closed set of POSIX-style errors.
//! "No candidate" is always one of these, mapped by the caller to the
//! appropriate errno; policies never panic or abort.

use std::io;

use libc::c_int;

/// Why a branch could not be selected (or probed).
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RouteError {
    /// The path exists on no considered branch (ENOENT).
    #[error("path not found on any branch")]
    NotFound,

    /// A branch filesystem refused access (EACCES).
    #[error("permission denied")]
    PermissionDenied,

    /// Every candidate branch is read-only or no-create (EROFS).
    #[error("all branches are read-only or no-create")]
    ReadOnly,

    /// No candidate branch has enough free space (ENOSPC).
    #[error("no branch with sufficient free space")]
    NoSpace,

    /// Malformed input to the engine (EINVAL).
    #[error("invalid argument")]
    InvalidInput,

    /// Any other syscall failure, carrying its errno (EIO when unknown).
    #[error("I/O failure (errno {0})")]
    Io(c_int),
}

impl RouteError {
    /// The errno this error maps to at the filesystem boundary.
    pub fn errno(&self) -> c_int {
        match self {
            RouteError::NotFound => libc::ENOENT,
            RouteError::PermissionDenied => libc::EACCES,
            RouteError::ReadOnly => libc::EROFS,
            RouteError::NoSpace => libc::ENOSPC,
            RouteError::InvalidInput => libc::EINVAL,
            RouteError::Io(errno) => {
                if *errno == 0 {
                    libc::EIO
                } else {
                    *errno
                }
            }
        }
    }

    /// Build from a raw errno value.
    pub fn from_errno(errno: c_int) -> RouteError {
        match errno {
            libc::ENOENT => RouteError::NotFound,
            libc::EACCES => RouteError::PermissionDenied,
            libc::EROFS => RouteError::ReadOnly,
            libc::ENOSPC => RouteError::NoSpace,
            libc::EINVAL => RouteError::InvalidInput,
            other => RouteError::Io(other),
        }
    }

    /// Fold a newly observed probe error into the error accumulated so far.
    ///
    /// Precedence rule (fixed, see DESIGN.md): any non-`NotFound` error
    /// outranks `NotFound`, so a permission failure on one branch is never
    /// masked by another branch merely lacking the path. Among non-`NotFound`
    /// errors the first observed (branch order) wins.
    pub fn prefer(current: Option<RouteError>, candidate: RouteError) -> Option<RouteError> {
        match current {
            None => Some(candidate),
            Some(RouteError::NotFound) if candidate != RouteError::NotFound => Some(candidate),
            Some(kept) => Some(kept),
        }
    }
}

impl From<io::Error> for RouteError {
    fn from(e: io::Error) -> Self {
        match e.raw_os_error() {
            Some(errno) => RouteError::from_errno(errno),
            None => match e.kind() {
                io::ErrorKind::NotFound => RouteError::NotFound,
                io::ErrorKind::PermissionDenied => RouteError::PermissionDenied,
                _ => RouteError::Io(libc::EIO),
            },
        }
    }
}

impl From<nix::Error> for RouteError {
    fn from(e: nix::Error) -> Self {
        RouteError::from_errno(e as c_int)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errno_mapping_round_trips() {
        for e in [
            RouteError::NotFound,
            RouteError::PermissionDenied,
            RouteError::ReadOnly,
            RouteError::NoSpace,
            RouteError::InvalidInput,
        ] {
            assert_eq!(RouteError::from_errno(e.errno()), e);
        }
        assert_eq!(RouteError::from_errno(libc::EMFILE), RouteError::Io(libc::EMFILE));
        assert_eq!(RouteError::Io(0).errno(), libc::EIO);
    }

    #[test]
    fn non_not_found_outranks_not_found() {
        let acc = RouteError::prefer(None, RouteError::NotFound);
        let acc = RouteError::prefer(acc, RouteError::PermissionDenied);
        assert_eq!(acc, Some(RouteError::PermissionDenied));
    }

    #[test]
    fn first_hard_error_wins() {
        let acc = RouteError::prefer(None, RouteError::PermissionDenied);
        let acc = RouteError::prefer(acc, RouteError::Io(libc::EIO));
        assert_eq!(acc, Some(RouteError::PermissionDenied));
    }

    #[test]
    fn not_found_never_displaces() {
        let acc = RouteError::prefer(Some(RouteError::PermissionDenied), RouteError::NotFound);
        assert_eq!(acc, Some(RouteError::PermissionDenied));
    }

    #[test]
    fn io_error_conversion_uses_raw_errno() {
        let e = io::Error::from_raw_os_error(libc::EROFS);
        assert_eq!(RouteError::from(e), RouteError::ReadOnly);

        let e = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        assert_eq!(RouteError::from(e), RouteError::PermissionDenied);
    }
}
