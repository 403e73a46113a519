use std::sync::mpsc;

use tracing::info;

use crate::cache::{LoadResult, LocalFeedLoader, SaveResult, ValidationResult};
use crate::domain::{FeedItem, FeedLoader, FeedLoaderResult};
use crate::errors::{FeederError, FeederResult};
use crate::storage::traits::FeedStore;

/// Blocking front for the command line: chains the asynchronous loaders by
/// waiting on each completion before issuing the next call.
pub struct FeedService<R: FeedLoader, S: FeedStore + 'static> {
    remote: R,
    cache: LocalFeedLoader<S>,
}

impl<R: FeedLoader, S: FeedStore + 'static> FeedService<R, S> {
    pub fn new(remote: R, cache: LocalFeedLoader<S>) -> Self {
        Self { remote, cache }
    }

    /// Load the remote feed without touching the cache
    pub fn fetch(&self) -> FeederResult<Vec<FeedItem>> {
        wait_for::<FeedLoaderResult, _>(|done| self.remote.load(done))?
    }

    /// Load the remote feed and replace the cache with it
    pub fn refresh(&self) -> FeederResult<Vec<FeedItem>> {
        let items = self.fetch()?;

        wait_for::<SaveResult, _>(|done| self.cache.save(items.clone(), done))??;
        info!(items = items.len(), "Feed cache refreshed");

        Ok(items)
    }

    /// Fresh cached items, or nothing if the cache is missing or expired
    pub fn cached(&self) -> FeederResult<Vec<FeedItem>> {
        Ok(wait_for::<LoadResult, _>(|done| self.cache.load(done))??)
    }

    /// Purge an expired or unreadable cache
    pub fn validate(&self) -> FeederResult<()> {
        Ok(wait_for::<ValidationResult, _>(|done| self.cache.validate_cache(done))??)
    }
}

fn wait_for<T, F>(start: F) -> FeederResult<T>
where
    T: Send + 'static,
    F: FnOnce(Box<dyn FnOnce(T) + Send>),
{
    let (tx, rx) = mpsc::channel();
    start(Box::new(move |value| {
        let _ = tx.send(value);
    }));
    rx.recv().map_err(|_| FeederError::CompletionDropped)
}
