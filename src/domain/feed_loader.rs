use crate::domain::FeedItem;
use crate::errors::FeederResult;

pub type FeedLoaderResult = FeederResult<Vec<FeedItem>>;
pub type FeedLoaderCompletion = Box<dyn FnOnce(FeedLoaderResult) + Send>;

/// Anything that can deliver the current feed, remote or cached.
#[cfg_attr(test, mockall::automock)]
pub trait FeedLoader: Send + Sync {
    /// Starts loading; `completion` is invoked at most once, on any thread.
    fn load(&self, completion: FeedLoaderCompletion);
}
