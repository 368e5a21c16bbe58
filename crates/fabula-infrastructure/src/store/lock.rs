//! Sidecar lock for the session log.
//!
//! The lock is a separate token file next to the data file, locked with an
//! OS advisory lock so that independent processes sharing the data directory
//! serialize their writes. The token file is created on first use and never
//! deleted: unlinking a lock file that another process may have open breaks
//! the mutual exclusion it exists to provide.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use fabula_core::StoreError;

/// Poll interval while waiting for a contended lock.
const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// An exclusive hold on the sidecar lock file, released on drop.
#[derive(Debug)]
pub struct SidecarLock {
    file: File,
    path: PathBuf,
}

impl SidecarLock {
    /// Acquires the lock at `path`, waiting at most `timeout`.
    ///
    /// Acquisition polls rather than blocking indefinitely; a lock still
    /// contended at the deadline fails with [`StoreError::LockTimeout`].
    pub fn acquire(path: &Path, timeout: Duration) -> Result<Self, StoreError> {
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)
            .map_err(|source| StoreError::io("opening lock sidecar", path, source))?;

        let started = Instant::now();
        loop {
            match fs2::FileExt::try_lock_exclusive(&file) {
                Ok(()) => {
                    tracing::trace!(path = %path.display(), "sidecar lock acquired");
                    return Ok(Self {
                        file,
                        path: path.to_path_buf(),
                    });
                }
                Err(err) if err.kind() == fs2::lock_contended_error().kind() => {
                    let waited = started.elapsed();
                    if waited >= timeout {
                        return Err(StoreError::LockTimeout {
                            path: path.to_path_buf(),
                            waited_ms: waited.as_millis() as u64,
                        });
                    }
                    std::thread::sleep(POLL_INTERVAL.min(timeout.saturating_sub(waited)));
                }
                Err(source) => {
                    return Err(StoreError::io("locking sidecar", path, source));
                }
            }
        }
    }
}

impl Drop for SidecarLock {
    fn drop(&mut self) {
        if let Err(err) = fs2::FileExt::unlock(&self.file) {
            tracing::warn!(path = %self.path.display(), error = %err, "failed to release sidecar lock");
        }
    }
}
