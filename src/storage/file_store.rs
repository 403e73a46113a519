use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use std::thread;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use url::Url;
use uuid::Uuid;

use crate::errors::StoreError;
use crate::storage::traits::{
    CacheRecord, DeletionCompletion, FeedStore, InsertionCompletion, LocalFeedItem,
    RetrievalCompletion, RetrievalOutcome,
};

#[derive(Serialize, Deserialize)]
struct StoredCache {
    feed: Vec<StoredFeedItem>,
    timestamp: DateTime<Utc>,
}

#[derive(Serialize, Deserialize)]
struct StoredFeedItem {
    id: Uuid,
    description: Option<String>,
    location: Option<String>,
    url: Url,
}

impl From<LocalFeedItem> for StoredFeedItem {
    fn from(item: LocalFeedItem) -> Self {
        Self {
            id: item.id,
            description: item.description,
            location: item.location,
            url: item.url,
        }
    }
}

impl From<StoredFeedItem> for LocalFeedItem {
    fn from(item: StoredFeedItem) -> Self {
        Self {
            id: item.id,
            description: item.description,
            location: item.location,
            url: item.url,
        }
    }
}

impl From<StoredCache> for CacheRecord {
    fn from(cache: StoredCache) -> Self {
        Self {
            feed: cache.feed.into_iter().map(LocalFeedItem::from).collect(),
            timestamp: cache.timestamp,
        }
    }
}

struct Shared {
    store_path: PathBuf,
    // Readers share, insert/delete are exclusive. Guards the file, not data.
    lock: RwLock<()>,
}

/// Keeps the cached feed as a JSON document at a fixed path.
///
/// Clones share the same lock, so a clone is the same store. Two stores
/// created separately for one path do not coordinate with each other.
#[derive(Clone)]
pub struct FileFeedStore {
    shared: Arc<Shared>,
}

impl FileFeedStore {
    pub fn new<P: AsRef<Path>>(store_path: P) -> Self {
        Self {
            shared: Arc::new(Shared {
                store_path: store_path.as_ref().to_path_buf(),
                lock: RwLock::new(()),
            }),
        }
    }

    pub fn store_path(&self) -> &Path {
        &self.shared.store_path
    }

    fn read(shared: &Shared) -> RetrievalOutcome {
        let _guard = match shared.lock.read() {
            Ok(guard) => guard,
            Err(_) => return RetrievalOutcome::Failure(StoreError::LockPoisoned),
        };

        let data = match fs::read(&shared.store_path) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return RetrievalOutcome::Empty,
            Err(e) => return RetrievalOutcome::Failure(e.into()),
        };

        match serde_json::from_slice::<StoredCache>(&data) {
            Ok(cache) => RetrievalOutcome::Found(cache.into()),
            Err(e) => {
                warn!(path = %shared.store_path.display(), error = %e, "Cached feed could not be decoded");
                RetrievalOutcome::Failure(StoreError::Decode(e))
            }
        }
    }

    fn write(
        shared: &Shared,
        feed: Vec<LocalFeedItem>,
        timestamp: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let cache = StoredCache {
            feed: feed.into_iter().map(StoredFeedItem::from).collect(),
            timestamp,
        };
        let encoded = serde_json::to_vec(&cache).map_err(StoreError::Encode)?;

        let _guard = shared.lock.write().map_err(|_| StoreError::LockPoisoned)?;

        let parent = match shared.store_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent)?;

        // Write atomically using tempfile
        let mut tmp = tempfile::NamedTempFile::new_in(parent)?;
        tmp.write_all(&encoded)?;
        tmp.persist(&shared.store_path)
            .map_err(|e| StoreError::Io(e.error))?;

        debug!(
            path = %shared.store_path.display(),
            items = cache.feed.len(),
            "Stored feed cache"
        );
        Ok(())
    }

    fn remove(shared: &Shared) -> Result<(), StoreError> {
        let _guard = shared.lock.write().map_err(|_| StoreError::LockPoisoned)?;

        match fs::remove_file(&shared.store_path) {
            Ok(()) => {
                debug!(path = %shared.store_path.display(), "Deleted feed cache");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

impl FeedStore for FileFeedStore {
    fn retrieve(&self, completion: RetrievalCompletion) {
        let shared = Arc::clone(&self.shared);
        thread::spawn(move || completion(Self::read(&shared)));
    }

    fn insert(&self, feed: Vec<LocalFeedItem>, timestamp: DateTime<Utc>, completion: InsertionCompletion) {
        let shared = Arc::clone(&self.shared);
        thread::spawn(move || completion(Self::write(&shared, feed, timestamp)));
    }

    fn delete(&self, completion: DeletionCompletion) {
        let shared = Arc::clone(&self.shared);
        thread::spawn(move || completion(Self::remove(&shared)));
    }
}
