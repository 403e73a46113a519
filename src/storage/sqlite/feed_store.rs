use std::thread;

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::OptionalExtension;
use tracing::debug;
use url::Url;
use uuid::Uuid;

use crate::errors::StoreError;
use crate::storage::sqlite::SqliteStorage;
use crate::storage::traits::{
    CacheRecord, DeletionCompletion, FeedStore, InsertionCompletion, LocalFeedItem,
    RetrievalCompletion, RetrievalOutcome,
};

/// Feed store backed by SQLite. The connection mutex serializes every
/// operation, reads included.
#[derive(Clone)]
pub struct SqliteFeedStore {
    storage: SqliteStorage,
}

impl SqliteFeedStore {
    pub fn new(storage: SqliteStorage) -> Self {
        Self { storage }
    }

    fn read(storage: &SqliteStorage) -> Result<Option<CacheRecord>, StoreError> {
        let conn = storage.connection()?;

        let timestamp: Option<String> = conn
            .query_row("SELECT timestamp FROM feed_cache WHERE id = 1", [], |row| row.get(0))
            .optional()?;

        let Some(timestamp) = timestamp else {
            return Ok(None);
        };

        let mut stmt = conn.prepare(
            "SELECT id, description, location, url FROM feed_cache_items ORDER BY position ASC",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, Option<String>>(1)?,
                row.get::<_, Option<String>>(2)?,
                row.get::<_, String>(3)?,
            ))
        })?;

        let mut feed = Vec::new();
        for row in rows {
            let (id, description, location, url) = row?;
            feed.push(LocalFeedItem {
                id: Uuid::parse_str(&id)
                    .map_err(|e| StoreError::Corrupted(format!("item id {}: {}", id, e)))?,
                description,
                location,
                url: Url::parse(&url)
                    .map_err(|e| StoreError::Corrupted(format!("item url {}: {}", url, e)))?,
            });
        }

        let timestamp = DateTime::parse_from_rfc3339(&timestamp)
            .map_err(|e| StoreError::Corrupted(format!("timestamp {}: {}", timestamp, e)))?
            .with_timezone(&Utc);

        Ok(Some(CacheRecord { feed, timestamp }))
    }

    fn write(
        storage: &SqliteStorage,
        feed: &[LocalFeedItem],
        timestamp: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let mut conn = storage.connection()?;
        let tx = conn.transaction()?;

        tx.execute("DELETE FROM feed_cache_items", [])?;
        tx.execute("DELETE FROM feed_cache", [])?;
        tx.execute(
            "INSERT INTO feed_cache (id, timestamp) VALUES (1, ?1)",
            [timestamp.to_rfc3339_opts(SecondsFormat::Nanos, true)],
        )?;

        {
            let mut stmt = tx.prepare(
                "INSERT INTO feed_cache_items (position, id, description, location, url) VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for (position, item) in feed.iter().enumerate() {
                stmt.execute((
                    position as i64,
                    item.id.to_string(),
                    &item.description,
                    &item.location,
                    item.url.as_str(),
                ))?;
            }
        }

        tx.commit()?;
        debug!(items = feed.len(), "Stored feed cache in database");
        Ok(())
    }

    fn remove(storage: &SqliteStorage) -> Result<(), StoreError> {
        let mut conn = storage.connection()?;
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM feed_cache_items", [])?;
        tx.execute("DELETE FROM feed_cache", [])?;
        tx.commit()?;
        Ok(())
    }
}

impl FeedStore for SqliteFeedStore {
    fn retrieve(&self, completion: RetrievalCompletion) {
        let storage = self.storage.clone();
        thread::spawn(move || {
            let outcome = match Self::read(&storage) {
                Ok(Some(record)) => RetrievalOutcome::Found(record),
                Ok(None) => RetrievalOutcome::Empty,
                Err(e) => RetrievalOutcome::Failure(e),
            };
            completion(outcome)
        });
    }

    fn insert(&self, feed: Vec<LocalFeedItem>, timestamp: DateTime<Utc>, completion: InsertionCompletion) {
        let storage = self.storage.clone();
        thread::spawn(move || completion(Self::write(&storage, &feed, timestamp)));
    }

    fn delete(&self, completion: DeletionCompletion) {
        let storage = self.storage.clone();
        thread::spawn(move || completion(Self::remove(&storage)));
    }
}
