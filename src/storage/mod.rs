pub mod traits;
pub mod file_store;
pub mod sqlite;

pub use traits::{
    CacheRecord, DeletionCompletion, FeedStore, InsertionCompletion, LocalFeedItem,
    RetrievalCompletion, RetrievalOutcome,
};
pub use file_store::FileFeedStore;
pub use sqlite::{SqliteFeedStore, SqliteStorage};
