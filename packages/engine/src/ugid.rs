//! Scoped effective-identity switching.
//!
//! Permission checks against branch filesystems must run with the calling
//! user's credentials, not the daemon's. [`UgidGuard`] switches the
//! effective uid/gid on acquisition and restores the prior identity when
//! dropped, on every exit path - early returns and error propagation
//! included - so an altered identity can never leak across call boundaries.

use nix::unistd::{setegid, seteuid, getegid, geteuid, Gid, Uid};
use tracing::error;

use mosaicfs_policy::RouteError;

/// RAII scope for an effective uid/gid switch.
///
/// Construction switches (gid first, while still privileged); dropping
/// restores in reverse order (uid first, to regain the privilege needed to
/// restore the gid). When the requested identity already matches the
/// current one the guard is a no-op.
#[derive(Debug)]
pub struct UgidGuard {
    prev_uid: Uid,
    prev_gid: Gid,
    switched: bool,
}

impl UgidGuard {
    /// Switch the effective identity to `uid`/`gid` for the current scope.
    pub fn switch(uid: Uid, gid: Gid) -> Result<UgidGuard, RouteError> {
        let prev_uid = geteuid();
        let prev_gid = getegid();

        if uid == prev_uid && gid == prev_gid {
            return Ok(UgidGuard {
                prev_uid,
                prev_gid,
                switched: false,
            });
        }

        setegid(gid)?;
        if let Err(e) = seteuid(uid) {
            // Half-switched; undo the gid before reporting.
            let _ = setegid(prev_gid);
            return Err(e.into());
        }

        Ok(UgidGuard {
            prev_uid,
            prev_gid,
            switched: true,
        })
    }

    /// The identity in effect before this guard.
    pub fn prior(&self) -> (Uid, Gid) {
        (self.prev_uid, self.prev_gid)
    }
}

impl Drop for UgidGuard {
    fn drop(&mut self) {
        if !self.switched {
            return;
        }
        if let Err(e) = seteuid(self.prev_uid) {
            error!(uid = %self.prev_uid, error = %e, "failed to restore effective uid");
        }
        if let Err(e) = setegid(self.prev_gid) {
            error!(gid = %self.prev_gid, error = %e, "failed to restore effective gid");
        }
    }
}
