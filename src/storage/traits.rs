use std::sync::Arc;

use chrono::{DateTime, Utc};
use url::Url;
use uuid::Uuid;

use crate::domain::FeedItem;
use crate::errors::StoreError;

/// Persistence-side twin of [`FeedItem`], kept separate so the storage
/// format can change without touching the domain model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalFeedItem {
    pub id: Uuid,
    pub description: Option<String>,
    pub location: Option<String>,
    pub url: Url,
}

impl From<FeedItem> for LocalFeedItem {
    fn from(item: FeedItem) -> Self {
        Self {
            id: item.id,
            description: item.description,
            location: item.location,
            url: item.url,
        }
    }
}

impl From<LocalFeedItem> for FeedItem {
    fn from(item: LocalFeedItem) -> Self {
        FeedItem::new(item.id, item.url)
            .with_description(item.description)
            .with_location(item.location)
    }
}

/// The single record a store holds: the whole feed plus the time it was saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheRecord {
    pub feed: Vec<LocalFeedItem>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug)]
pub enum RetrievalOutcome {
    Empty,
    Found(CacheRecord),
    Failure(StoreError),
}

pub type RetrievalCompletion = Box<dyn FnOnce(RetrievalOutcome) + Send>;
pub type InsertionCompletion = Box<dyn FnOnce(Result<(), StoreError>) + Send>;
pub type DeletionCompletion = Box<dyn FnOnce(Result<(), StoreError>) + Send>;

/// Asynchronous persistence for one cached feed.
///
/// Every operation invokes its completion exactly once, possibly on another
/// thread. Implementations must never let `retrieve` observe a partially
/// applied `insert` or `delete`.
#[cfg_attr(test, mockall::automock)]
pub trait FeedStore: Send + Sync {
    fn retrieve(&self, completion: RetrievalCompletion);

    /// Replaces whatever is stored with `feed` and `timestamp`.
    fn insert(&self, feed: Vec<LocalFeedItem>, timestamp: DateTime<Utc>, completion: InsertionCompletion);

    /// Removes the stored record. Deleting an empty store succeeds.
    fn delete(&self, completion: DeletionCompletion);
}

impl<T: FeedStore + ?Sized> FeedStore for Arc<T> {
    fn retrieve(&self, completion: RetrievalCompletion) {
        (**self).retrieve(completion)
    }

    fn insert(&self, feed: Vec<LocalFeedItem>, timestamp: DateTime<Utc>, completion: InsertionCompletion) {
        (**self).insert(feed, timestamp, completion)
    }

    fn delete(&self, completion: DeletionCompletion) {
        (**self).delete(completion)
    }
}
