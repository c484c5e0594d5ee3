//! Flat-file JSON cache with a time-to-live.
//!
//! One entry per file, `<dir>/<key>.json`, holding the write timestamp and the
//! cached payload. Writes go to a sibling `.tmp` file and are renamed into
//! place, so a reader never observes a half-written entry.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::CacheError;

/// On-disk representation of one entry.
#[derive(Debug, Serialize, Deserialize)]
pub struct CacheEntry<T> {
    /// When the payload was written.
    pub fetched_at: DateTime<Utc>,
    /// Cached payload.
    pub response: T,
}

impl<T> CacheEntry<T> {
    /// Whether the entry is still usable at `now`.
    #[must_use]
    pub fn is_fresh(&self, ttl: Option<Duration>, now: DateTime<Utc>) -> bool {
        let Some(ttl) = ttl else {
            return true;
        };
        let age = now.signed_duration_since(self.fetched_at);
        match chrono::Duration::from_std(ttl) {
            Ok(ttl) => age < ttl,
            Err(_) => true,
        }
    }
}

/// JSON cache rooted at a directory.
#[derive(Debug, Clone)]
pub struct JsonDiskCache {
    dir: PathBuf,
    ttl: Option<Duration>,
}

impl JsonDiskCache {
    /// Open (and create if needed) a cache directory.
    pub fn new(dir: impl Into<PathBuf>, ttl: Option<Duration>) -> Result<Self, CacheError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir, ttl })
    }

    /// Cache directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for_key(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    /// Look up `key`, treating missing, unreadable, and expired entries as misses.
    #[must_use]
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.get_at(key, Utc::now())
    }

    /// Look up `key` as of `now`.
    #[must_use]
    pub fn get_at<T: DeserializeOwned>(&self, key: &str, now: DateTime<Utc>) -> Option<T> {
        let path = self.path_for_key(key);
        let raw = fs::read_to_string(&path).ok()?;
        let entry: CacheEntry<T> = match serde_json::from_str(&raw) {
            Ok(entry) => entry,
            Err(e) => {
                debug!(path = %path.display(), error = %e, "ignoring unreadable cache entry");
                return None;
            }
        };
        if !entry.is_fresh(self.ttl, now) {
            debug!(key, fetched_at = %entry.fetched_at, "cache entry expired");
            return None;
        }
        Some(entry.response)
    }

    /// Store `response` under `key`, stamped with the current time.
    pub fn set<T: Serialize>(&self, key: &str, response: &T) -> Result<(), CacheError> {
        self.set_at(key, response, Utc::now())
    }

    /// Store `response` under `key` with an explicit timestamp.
    pub fn set_at<T: Serialize>(
        &self,
        key: &str,
        response: &T,
        fetched_at: DateTime<Utc>,
    ) -> Result<(), CacheError> {
        let path = self.path_for_key(key);
        let tmp = self.dir.join(format!("{key}.json.tmp"));
        let body = serde_json::to_vec(&CacheEntry { fetched_at, response })?;
        fs::write(&tmp, body)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }
}
