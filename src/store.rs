//! Snapshot persistence for platform state.
//!
//! The whole `Platform` is written as one CBOR document. Writes go to a
//! sibling temp file first and are renamed into place, so a crash mid-write
//! leaves the previous snapshot intact.
//!
//! A load → execute → save cycle runs under [`SnapshotStore::lock`], an
//! exclusive `state.lock` file next to the snapshot, and finishes with
//! [`SnapshotStore::commit`], which refuses to replace a snapshot that moved
//! on since it was loaded.

use crate::platform::Platform;
use crate::serialization::{from_cbor, to_cbor, SerializationError};
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Current snapshot layout.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Snapshot errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no platform state at '{0}' (run `oss-rewards init` first)")]
    NotInitialized(PathBuf),

    #[error("platform state already exists at '{0}'")]
    AlreadyInitialized(PathBuf),

    #[error("platform state is locked by another command ('{0}'; remove it if no command is running)")]
    Locked(PathBuf),

    #[error("platform state moved on since it was loaded (loaded sequence {loaded}, stored {stored})")]
    Stale { loaded: u64, stored: u64 },

    #[error("unsupported snapshot version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("I/O error on '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Serialization(#[from] SerializationError),
}

#[derive(Serialize, Deserialize)]
struct Snapshot {
    version: u32,
    platform: Platform,
}

/// Exclusive hold on a snapshot; released on drop.
#[derive(Debug)]
pub struct StoreLock {
    path: PathBuf,
}

impl Drop for StoreLock {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            warn!(path = %self.path.display(), error = %e, "failed to release state lock");
        }
    }
}

pub fn is_lock_contended(err: &StoreError) -> bool {
    matches!(err, StoreError::Locked(_))
}

/// File-backed platform snapshot.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    pub fn lock_path(&self) -> PathBuf {
        self.path.with_extension("lock")
    }

    /// Take the exclusive lock, failing with `Locked` if another holder exists.
    pub fn lock(&self) -> Result<StoreLock, StoreError> {
        let path = self.lock_path();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                return Err(StoreError::Locked(path))
            }
            Err(source) => return Err(StoreError::Io { path, source }),
        };

        // Holder pid, for whoever finds a stale lock.
        let lock = StoreLock { path };
        writeln!(file, "{}", std::process::id()).map_err(|source| StoreError::Io {
            path: lock.path.clone(),
            source,
        })?;

        debug!(path = %lock.path.display(), "state lock acquired");
        Ok(lock)
    }

    /// Save `platform`, which was derived from a snapshot at `loaded_sequence`.
    ///
    /// Fails with `Stale` if the stored snapshot no longer has that sequence.
    pub fn commit(&self, platform: &Platform, loaded_sequence: u64) -> Result<(), StoreError> {
        let stored = self.load()?.sequence();
        if stored != loaded_sequence {
            return Err(StoreError::Stale {
                loaded: loaded_sequence,
                stored,
            });
        }
        self.save(platform)
    }

    /// Write the first snapshot. Refuses to overwrite existing state.
    pub fn create(&self, platform: &Platform) -> Result<(), StoreError> {
        if self.exists() {
            return Err(StoreError::AlreadyInitialized(self.path.clone()));
        }
        self.save(platform)
    }

    pub fn load(&self) -> Result<Platform, StoreError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(StoreError::NotInitialized(self.path.clone()))
            }
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let snapshot: Snapshot = from_cbor(&bytes)?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(StoreError::UnsupportedVersion {
                found: snapshot.version,
                expected: SNAPSHOT_VERSION,
            });
        }

        debug!(path = %self.path.display(), sequence = snapshot.platform.sequence(), "snapshot loaded");
        Ok(snapshot.platform)
    }

    pub fn save(&self, platform: &Platform) -> Result<(), StoreError> {
        let io_err = |path: &Path| {
            let path = path.to_path_buf();
            move |source| StoreError::Io { path, source }
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(io_err(parent))?;
            }
        }

        let bytes = to_cbor(&Snapshot {
            version: SNAPSHOT_VERSION,
            platform: platform.clone(),
        })?;

        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, bytes).map_err(io_err(&tmp))?;
        fs::rename(&tmp, &self.path).map_err(io_err(&self.path))?;

        debug!(path = %self.path.display(), sequence = platform.sequence(), "snapshot saved");
        Ok(())
    }
}
