//! Disk-backed cache storage for the offline gateway
//!
//! Provides `CacheStorage`, a set of named cache buckets persisted under an
//! XDG-compliant cache directory, and `CacheBucket`, a partition of stored
//! request/response pairs keyed by request identity (method + URL).

use std::collections::hash_map::DefaultHasher;
use std::fs;
use std::hash::{Hash, Hasher};
use std::io;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::fetcher::{FetchRequest, FetchResponse};
use crate::config::APP_NAME;

/// On-disk record for a single cached response
#[derive(Debug, Serialize, Deserialize)]
struct StoredEntry {
    /// Full request identity, kept to guard against filename hash collisions
    key: String,
    /// The cached response
    response: FetchResponse,
    /// When the response was stored
    stored_at: DateTime<Utc>,
}

/// Root of all cache buckets on disk.
///
/// Each bucket is a subdirectory of the storage root; each entry is a JSON
/// file named after the hash of its request identity. Deleting a bucket
/// removes its directory and every entry in it.
#[derive(Debug, Clone)]
pub struct CacheStorage {
    root: PathBuf,
}

impl CacheStorage {
    /// Creates storage rooted at the XDG cache directory
    /// (`~/.cache/skycast/buckets` on Linux).
    ///
    /// Returns `None` if the cache directory cannot be determined.
    pub fn new() -> Option<Self> {
        let project_dirs = ProjectDirs::from("", "", APP_NAME)?;
        let root = project_dirs.cache_dir().join("buckets");
        Some(Self { root })
    }

    /// Creates storage rooted at a custom directory (used by tests)
    pub fn with_dir(root: PathBuf) -> Self {
        Self { root }
    }

    /// Opens a bucket by name, creating nothing on disk until first write
    pub fn open(&self, name: &str) -> CacheBucket {
        CacheBucket {
            dir: self.root.join(name),
        }
    }

    /// Lists the names of all buckets currently on disk
    pub fn bucket_names(&self) -> io::Result<Vec<String>> {
        let mut names = Vec::new();
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(names),
            Err(e) => return Err(e),
        };
        for entry in entries {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        names.sort();
        Ok(names)
    }

    /// Deletes a bucket and all its entries; missing buckets are not an error
    pub fn delete(&self, name: &str) -> io::Result<()> {
        match fs::remove_dir_all(self.root.join(name)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }
}

/// A named partition of cached request/response pairs
#[derive(Debug, Clone)]
pub struct CacheBucket {
    dir: PathBuf,
}

impl CacheBucket {
    /// Entry file path for a request, derived from the hash of its identity
    fn entry_path(&self, request: &FetchRequest) -> PathBuf {
        let mut hasher = DefaultHasher::new();
        request.cache_key().hash(&mut hasher);
        self.dir.join(format!("{:016x}.json", hasher.finish()))
    }

    /// Stores a response keyed by the request, overwriting any prior entry
    pub fn put(&self, request: &FetchRequest, response: &FetchResponse) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;

        let entry = StoredEntry {
            key: request.cache_key(),
            response: response.clone(),
            stored_at: Utc::now(),
        };
        let json = serde_json::to_string(&entry)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        fs::write(self.entry_path(request), json)
    }

    /// Looks up the stored response for a request.
    ///
    /// Returns `None` for missing or unreadable entries; an entry whose
    /// recorded key does not match the request (hash collision) is treated
    /// as a miss.
    pub fn lookup(&self, request: &FetchRequest) -> Option<FetchResponse> {
        let path = self.entry_path(request);
        let content = fs::read_to_string(path).ok()?;
        let entry: StoredEntry = match serde_json::from_str(&content) {
            Ok(entry) => entry,
            Err(e) => {
                warn!(key = %request.cache_key(), error = %e, "discarding unreadable cache entry");
                return None;
            }
        };

        if entry.key != request.cache_key() {
            return None;
        }
        Some(entry.response)
    }
}
