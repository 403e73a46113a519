mod connection;
mod feed_store;

pub use connection::SqliteStorage;
pub use feed_store::SqliteFeedStore;
