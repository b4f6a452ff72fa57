//! Dataset Cache Module
//! Keeps loaded raw tables in memory between pipeline runs. An entry is
//! reused while the file's modification time is unchanged.

use polars::prelude::DataFrame;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::debug;

use super::loader::LoaderError;

struct CachedDataset {
    modified: Option<SystemTime>,
    frame: DataFrame,
}

/// Explicit, owned cache of raw datasets keyed by canonical path.
#[derive(Default)]
pub struct DatasetCache {
    entries: HashMap<PathBuf, CachedDataset>,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached table for `path`, calling `load` on a miss or when
    /// the file changed on disk since it was cached.
    pub fn get_or_load<F>(&mut self, path: &Path, load: F) -> Result<&DataFrame, LoaderError>
    where
        F: FnOnce(&Path) -> Result<DataFrame, LoaderError>,
    {
        let key = Self::key(path);
        let modified = fs::metadata(path).and_then(|m| m.modified()).ok();

        let fresh = self
            .entries
            .get(&key)
            .is_some_and(|entry| entry.modified.is_some() && entry.modified == modified);

        if fresh {
            debug!("dataset cache hit: {}", key.display());
        } else {
            debug!("dataset cache miss: {}", key.display());
            let frame = load(path)?;
            self.entries
                .insert(key.clone(), CachedDataset { modified, frame });
        }

        self.entries
            .get(&key)
            .map(|entry| &entry.frame)
            .ok_or(LoaderError::Io {
                path: key,
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "cache entry vanished"),
            })
    }

    /// Drop the entry for `path`. Returns whether one existed.
    pub fn invalidate(&mut self, path: &Path) -> bool {
        self.entries.remove(&Self::key(path)).is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn key(path: &Path) -> PathBuf {
        fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
    }
}
