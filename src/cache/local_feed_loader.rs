use std::sync::{Arc, Weak};

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::cache::FeedCachePolicy;
use crate::domain::{FeedItem, FeedLoader, FeedLoaderCompletion};
use crate::errors::StoreError;
use crate::storage::traits::{FeedStore, LocalFeedItem, RetrievalOutcome};

pub type LoadResult = Result<Vec<FeedItem>, StoreError>;
pub type SaveResult = Result<(), StoreError>;
pub type ValidationResult = Result<(), StoreError>;

type Clock = Box<dyn Fn() -> DateTime<Utc> + Send + Sync>;

struct Inner<S> {
    store: S,
    current_date: Clock,
    policy: FeedCachePolicy,
}

impl<S> Inner<S> {
    fn is_fresh(&self, timestamp: DateTime<Utc>) -> bool {
        self.policy.validate(timestamp, (self.current_date)())
    }
}

/// Serves, saves and validates the locally cached feed.
///
/// Completions only hold a weak reference to the loader: once the loader is
/// dropped, results still arriving from the store are discarded.
pub struct LocalFeedLoader<S: FeedStore> {
    inner: Arc<Inner<S>>,
}

impl<S: FeedStore + 'static> LocalFeedLoader<S> {
    pub fn new<C>(store: S, current_date: C) -> Self
    where
        C: Fn() -> DateTime<Utc> + Send + Sync + 'static,
    {
        Self::with_policy(store, current_date, FeedCachePolicy::default())
    }

    pub fn with_policy<C>(store: S, current_date: C, policy: FeedCachePolicy) -> Self
    where
        C: Fn() -> DateTime<Utc> + Send + Sync + 'static,
    {
        Self {
            inner: Arc::new(Inner {
                store,
                current_date: Box::new(current_date),
                policy,
            }),
        }
    }

    /// Delivers the cached feed if it is fresh, an empty feed if it is
    /// missing or expired. Never touches the stored record.
    pub fn load<F>(&self, completion: F)
    where
        F: FnOnce(LoadResult) + Send + 'static,
    {
        let loader = Arc::downgrade(&self.inner);
        self.inner.store.retrieve(Box::new(move |outcome| {
            let Some(inner) = loader.upgrade() else { return };

            match outcome {
                RetrievalOutcome::Failure(e) => completion(Err(e)),
                RetrievalOutcome::Found(record) if inner.is_fresh(record.timestamp) => {
                    completion(Ok(record.feed.into_iter().map(FeedItem::from).collect()))
                }
                RetrievalOutcome::Found(_) => {
                    debug!("Cached feed expired, loading nothing");
                    completion(Ok(Vec::new()))
                }
                RetrievalOutcome::Empty => completion(Ok(Vec::new())),
            }
        }));
    }

    /// Replaces the cache with `feed`. The old record is deleted first; if
    /// that fails nothing is inserted.
    pub fn save<F>(&self, feed: Vec<FeedItem>, completion: F)
    where
        F: FnOnce(SaveResult) + Send + 'static,
    {
        let loader = Arc::downgrade(&self.inner);
        self.inner.store.delete(Box::new(move |result| {
            let Some(inner) = loader.upgrade() else { return };

            match result {
                Err(e) => completion(Err(e)),
                Ok(()) => Self::cache(&inner, feed, completion),
            }
        }));
    }

    fn cache<F>(inner: &Arc<Inner<S>>, feed: Vec<FeedItem>, completion: F)
    where
        F: FnOnce(SaveResult) + Send + 'static,
    {
        let loader = Arc::downgrade(inner);
        let local: Vec<LocalFeedItem> = feed.into_iter().map(LocalFeedItem::from).collect();
        let count = local.len();

        inner.store.insert(
            local,
            (inner.current_date)(),
            Box::new(move |result| {
                if loader.upgrade().is_none() {
                    return;
                }
                if result.is_ok() {
                    info!(items = count, "Saved feed to cache");
                }
                completion(result)
            }),
        );
    }

    /// Purges a cache that is expired or cannot be read.
    pub fn validate_cache<F>(&self, completion: F)
    where
        F: FnOnce(ValidationResult) + Send + 'static,
    {
        let loader = Arc::downgrade(&self.inner);
        self.inner.store.retrieve(Box::new(move |outcome| {
            let Some(inner) = loader.upgrade() else { return };

            match outcome {
                RetrievalOutcome::Failure(e) => {
                    info!(error = %e, "Deleting unreadable feed cache");
                    Self::purge(&inner, completion);
                }
                RetrievalOutcome::Found(record) if !inner.is_fresh(record.timestamp) => {
                    info!(timestamp = %record.timestamp, "Deleting expired feed cache");
                    Self::purge(&inner, completion);
                }
                RetrievalOutcome::Found(_) | RetrievalOutcome::Empty => completion(Ok(())),
            }
        }));
    }

    fn purge<F>(inner: &Arc<Inner<S>>, completion: F)
    where
        F: FnOnce(ValidationResult) + Send + 'static,
    {
        let loader: Weak<Inner<S>> = Arc::downgrade(inner);
        inner.store.delete(Box::new(move |result| {
            if loader.upgrade().is_none() {
                return;
            }
            completion(result)
        }));
    }
}

impl<S: FeedStore + 'static> FeedLoader for LocalFeedLoader<S> {
    fn load(&self, completion: FeedLoaderCompletion) {
        LocalFeedLoader::load(self, move |result| completion(result.map_err(Into::into)));
    }
}
