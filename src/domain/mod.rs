pub mod feed_item;
pub mod feed_loader;

pub use feed_item::FeedItem;
pub use feed_loader::{FeedLoader, FeedLoaderCompletion, FeedLoaderResult};

#[cfg(test)]
pub use feed_loader::MockFeedLoader;
