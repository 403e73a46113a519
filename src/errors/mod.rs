use thiserror::Error;

/// Failures of the remote fetch pipeline.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteFeedError {
    #[error("Could not reach the feed server")]
    Connectivity,

    #[error("Feed server returned invalid data")]
    InvalidData,
}

/// Failures of a feed store. The cache loader forwards these unchanged.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Store IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Could not decode cached feed: {0}")]
    Decode(serde_json::Error),

    #[error("Could not encode feed for caching: {0}")]
    Encode(serde_json::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Cached feed is corrupted: {0}")]
    Corrupted(String),

    #[error("Store lock poisoned")]
    LockPoisoned,
}

#[derive(Error, Debug)]
pub enum FeederError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid feed URL: {0}")]
    InvalidUrl(String),

    // Network errors
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Remote(#[from] RemoteFeedError),

    // Storage errors
    #[error(transparent)]
    Store(#[from] StoreError),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Operation finished without delivering a result")]
    CompletionDropped,
}

pub type FeederResult<T> = Result<T, FeederError>;
