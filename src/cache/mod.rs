pub mod policy;
pub mod local_feed_loader;

pub use policy::FeedCachePolicy;
pub use local_feed_loader::{LoadResult, LocalFeedLoader, SaveResult, ValidationResult};
