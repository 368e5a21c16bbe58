//! Atomic JSON session store.
//!
//! Persists the whole [`SessionLog`] to a single `sessions.json`, with:
//! - a sidecar lock serializing writers across processes,
//! - temp-file + fsync + atomic rename so readers only ever observe a
//!   complete log,
//! - corruption recovery that backs the damaged bytes up to a timestamped
//!   artifact and substitutes a fresh empty log.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use fabula_core::session::{SessionLog, SessionLogRepository, SessionRecord};
use fabula_core::StoreError;

use super::lock::SidecarLock;

/// File name of the session log inside the data directory.
pub const LOG_FILE_NAME: &str = "sessions.json";

const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(5);
const READ_ATTEMPTS: usize = 3;
const READ_RETRY_DELAY: Duration = Duration::from_millis(10);

/// Append-only session log store backed by one JSON file.
///
/// The store exclusively owns the log file, its temp file, its lock sidecar,
/// and its backup artifacts; no other component writes to any of them.
pub struct JsonSessionStore {
    data_path: PathBuf,
    lock_path: PathBuf,
    temp_path: PathBuf,
    lock_timeout: Duration,
}

impl JsonSessionStore {
    /// Creates a store rooted at `data_dir`, creating the directory if
    /// needed. The log file itself is created lazily on the first
    /// successful append.
    pub fn new(data_dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let data_dir = data_dir.as_ref();
        fs::create_dir_all(data_dir)
            .map_err(|source| StoreError::io("creating data directory", data_dir, source))?;

        let data_path = data_dir.join(LOG_FILE_NAME);
        let lock_path = data_dir.join(format!("{LOG_FILE_NAME}.lock"));
        let temp_path = data_dir.join(format!(".{LOG_FILE_NAME}.tmp"));

        Ok(Self {
            data_path,
            lock_path,
            temp_path,
            lock_timeout: DEFAULT_LOCK_TIMEOUT,
        })
    }

    /// Overrides the bound on waiting for the sidecar lock.
    pub fn with_lock_timeout(mut self, timeout: Duration) -> Self {
        self.lock_timeout = timeout;
        self
    }

    /// Path of the log file.
    pub fn data_path(&self) -> &Path {
        &self.data_path
    }

    /// Path of the lock sidecar.
    pub fn lock_path(&self) -> &Path {
        &self.lock_path
    }

    /// Appends one record to the log.
    ///
    /// All-or-nothing: every mutation happens on the temp file until the
    /// final rename, so a failure at any step leaves the previous log
    /// content intact.
    pub fn append(&self, record: &SessionRecord) -> Result<(), StoreError> {
        self.append_inner(record).inspect_err(|err| {
            tracing::error!(
                operation = "append",
                path = %self.data_path.display(),
                error = %err,
                "session store operation failed"
            );
        })
    }

    /// Returns every persisted record, oldest first.
    ///
    /// Reads without the writer lock: the final rename in `append` is atomic
    /// on the supported filesystems, so a reader sees either the old or the
    /// new complete file. Only the corruption path coordinates with writers.
    pub fn read_all(&self) -> Result<Vec<SessionRecord>, StoreError> {
        self.read_all_inner().inspect_err(|err| {
            tracing::error!(
                operation = "read_all",
                path = %self.data_path.display(),
                error = %err,
                "session store operation failed"
            );
        })
    }

    fn append_inner(&self, record: &SessionRecord) -> Result<(), StoreError> {
        record.validate()?;

        let _guard = SidecarLock::acquire(&self.lock_path, self.lock_timeout)?;

        let mut log = self.load_or_recover("append")?;
        if log.contains_id(&record.id) {
            return Err(StoreError::invalid(format!(
                "record id '{}' already exists in the log",
                record.id
            )));
        }

        log.sessions.push(record.clone());
        self.write_atomic(&log)?;

        tracing::info!(
            id = %record.id,
            total = log.sessions.len(),
            "session record appended"
        );
        Ok(())
    }

    fn read_all_inner(&self) -> Result<Vec<SessionRecord>, StoreError> {
        for attempt in 1..=READ_ATTEMPTS {
            match fs::read(&self.data_path) {
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                    return Ok(Vec::new());
                }
                Err(err) => {
                    if attempt == READ_ATTEMPTS {
                        return Err(StoreError::io("reading session log", &self.data_path, err));
                    }
                    tracing::warn!(
                        path = %self.data_path.display(),
                        attempt,
                        error = %err,
                        "transient read failure, retrying"
                    );
                    std::thread::sleep(READ_RETRY_DELAY);
                }
                Ok(bytes) => match serde_json::from_slice::<SessionLog>(&bytes) {
                    Ok(log) => return Ok(log.sessions),
                    // Structurally invalid content. Serialize with writers
                    // and decide under the lock.
                    Err(_) => break,
                },
            }
        }

        let _guard = SidecarLock::acquire(&self.lock_path, self.lock_timeout)?;
        Ok(self.load_or_recover("read_all")?.sessions)
    }

    /// Loads the current log, entering corruption recovery when the file
    /// exists but cannot be parsed. Must be called with the lock held.
    fn load_or_recover(&self, operation: &'static str) -> Result<SessionLog, StoreError> {
        let bytes = match fs::read(&self.data_path) {
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(SessionLog::default());
            }
            Err(err) => {
                return Err(StoreError::io("reading session log", &self.data_path, err));
            }
            Ok(bytes) => bytes,
        };

        match serde_json::from_slice::<SessionLog>(&bytes) {
            Ok(log) => Ok(log),
            Err(parse_err) => self.recover_corrupt(operation, &parse_err),
        }
    }

    /// Backs the unreadable file up to a fresh timestamped artifact, installs
    /// an empty log in its place, and reports the episode once.
    ///
    /// Never surfaced to the caller as a failure; the operation continues
    /// against the reset log.
    fn recover_corrupt(
        &self,
        operation: &'static str,
        parse_err: &serde_json::Error,
    ) -> Result<SessionLog, StoreError> {
        let backup_path = self.fresh_backup_path();
        fs::copy(&self.data_path, &backup_path)
            .map_err(|source| StoreError::io("backing up corrupt session log", &backup_path, source))?;

        let empty = SessionLog::default();
        self.write_atomic(&empty)?;

        tracing::error!(
            operation,
            path = %self.data_path.display(),
            backup = %backup_path.display(),
            error = %parse_err,
            "corrupt session log detected; damaged bytes backed up, log reset"
        );
        Ok(empty)
    }

    /// Picks a backup path that does not collide with earlier artifacts.
    fn fresh_backup_path(&self) -> PathBuf {
        let stamp = chrono::Utc::now().format("%Y%m%dT%H%M%S%.6fZ");
        let base = self
            .data_path
            .with_file_name(format!("{LOG_FILE_NAME}.corrupt-{stamp}"));
        if !base.exists() {
            return base;
        }
        let mut n = 1;
        loop {
            let candidate = self
                .data_path
                .with_file_name(format!("{LOG_FILE_NAME}.corrupt-{stamp}-{n}"));
            if !candidate.exists() {
                return candidate;
            }
            n += 1;
        }
    }

    /// Serializes the full log to the temp file, persists it, and atomically
    /// renames it over the log path.
    fn write_atomic(&self, log: &SessionLog) -> Result<(), StoreError> {
        let json = serde_json::to_vec_pretty(log)?;

        let result = self.write_temp_and_rename(&json);
        if result.is_err() {
            // The real file is untouched; only the temp file may linger.
            if let Err(cleanup_err) = fs::remove_file(&self.temp_path) {
                if cleanup_err.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!(
                        path = %self.temp_path.display(),
                        error = %cleanup_err,
                        "failed to clean up temp file"
                    );
                }
            }
        }
        result
    }

    fn write_temp_and_rename(&self, json: &[u8]) -> Result<(), StoreError> {
        let mut temp = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.temp_path)
            .map_err(|source| StoreError::io("creating temp file", &self.temp_path, source))?;
        temp.write_all(json)
            .map_err(|source| StoreError::io("writing temp file", &self.temp_path, source))?;
        temp.sync_all()
            .map_err(|source| StoreError::io("flushing temp file", &self.temp_path, source))?;
        drop(temp);

        fs::rename(&self.temp_path, &self.data_path)
            .map_err(|source| StoreError::io("renaming temp file over log", &self.data_path, source))
    }
}

impl SessionLogRepository for JsonSessionStore {
    fn append(&self, record: &SessionRecord) -> Result<(), StoreError> {
        JsonSessionStore::append(self, record)
    }

    fn read_all(&self) -> Result<Vec<SessionRecord>, StoreError> {
        JsonSessionStore::read_all(self)
    }
}
