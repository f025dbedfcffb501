//! Symlinkify: substituting stale read-only files with symlink behavior.
//!
//! When enabled, a regular file that has been effectively read-only for
//! longer than the configured timeout is exposed as if it were a symlink to
//! its branch-local full path, letting the kernel bypass the union for
//! reads.
//!
//! Consistency rule: every call that exposes a file's type or content
//! (attribute queries, readlink-style responses, open) must evaluate this
//! predicate exactly once per logical operation, with the same inputs, and
//! act on that single answer. Evaluating it twice within one operation can
//! split-brain the file between "regular" and "symlink" and is a
//! correctness bug in the caller, not a tolerated race.

use std::fs::Metadata;
use std::os::unix::fs::PermissionsExt;
use std::time::{Duration, SystemTime};

/// Write permission bits for user, group, other.
const WRITE_BITS: u32 = 0o222;

/// The pure decision: symlinkify iff the file is a regular file, is
/// effectively read-only, and has not been modified for strictly longer
/// than `timeout_secs`. Any non-regular file is never symlinkified,
/// regardless of age.
pub fn should_symlinkify(
    mtime: SystemTime,
    now: SystemTime,
    timeout_secs: u64,
    read_only_effective: bool,
    is_regular_file: bool,
) -> bool {
    if !is_regular_file || !read_only_effective {
        return false;
    }

    // An mtime in the future counts as age zero.
    let age = now.duration_since(mtime).unwrap_or(Duration::ZERO);
    age > Duration::from_secs(timeout_secs)
}

/// Evaluate the predicate against stat results.
///
/// "Effectively read-only" means no write bit at all (user, group, or
/// other) on the file's mode. Call this once per logical operation and
/// reuse the answer (see the module docs).
pub fn evaluate_metadata(metadata: &Metadata, now: SystemTime, timeout_secs: u64) -> bool {
    let read_only = metadata.permissions().mode() & WRITE_BITS == 0;
    let mtime = metadata.modified().unwrap_or(now);
    should_symlinkify(mtime, now, timeout_secs, read_only, metadata.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOUR: u64 = 3600;

    fn at(now: SystemTime, secs_ago: u64) -> SystemTime {
        now - Duration::from_secs(secs_ago)
    }

    #[test]
    fn stale_read_only_regular_file_qualifies() {
        let now = SystemTime::now();
        assert!(should_symlinkify(at(now, HOUR + 1), now, HOUR, true, true));
    }

    #[test]
    fn timeout_is_strict() {
        let now = SystemTime::now();
        assert!(!should_symlinkify(at(now, HOUR - 1), now, HOUR, true, true));
        assert!(!should_symlinkify(at(now, HOUR), now, HOUR, true, true));
    }

    #[test]
    fn writable_file_never_qualifies() {
        let now = SystemTime::now();
        assert!(!should_symlinkify(at(now, 10 * HOUR), now, HOUR, false, true));
    }

    #[test]
    fn non_regular_file_never_qualifies() {
        let now = SystemTime::now();
        assert!(!should_symlinkify(at(now, 10 * HOUR), now, HOUR, true, false));
    }

    #[test]
    fn future_mtime_is_age_zero() {
        let now = SystemTime::now();
        let future = now + Duration::from_secs(HOUR);
        assert!(!should_symlinkify(future, now, 0, true, true));
    }

    #[test]
    fn metadata_adapter_checks_mode_bits() {
        use std::fs;

        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("old.dat");
        fs::write(&file, b"data").unwrap();

        let mut perms = fs::metadata(&file).unwrap().permissions();
        perms.set_mode(0o444);
        fs::set_permissions(&file, perms).unwrap();

        let metadata = fs::metadata(&file).unwrap();
        let later = SystemTime::now() + Duration::from_secs(2 * HOUR);
        assert!(evaluate_metadata(&metadata, later, HOUR));
        // Fresh relative to its own mtime.
        assert!(!evaluate_metadata(&metadata, SystemTime::now(), HOUR));

        // Restore a write bit: no longer effectively read-only.
        let mut perms = fs::metadata(&file).unwrap().permissions();
        perms.set_mode(0o644);
        fs::set_permissions(&file, perms).unwrap();
        let metadata = fs::metadata(&file).unwrap();
        assert!(!evaluate_metadata(&metadata, later, HOUR));
    }

    #[test]
    fn metadata_adapter_rejects_directories() {
        let dir = tempfile::tempdir().unwrap();
        let metadata = std::fs::metadata(dir.path()).unwrap();
        let later = SystemTime::now() + Duration::from_secs(10 * HOUR);
        assert!(!evaluate_metadata(&metadata, later, HOUR));
    }
}
