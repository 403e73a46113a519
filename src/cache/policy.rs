use chrono::{DateTime, Duration, Utc};

const MAX_CACHE_AGE_IN_DAYS: i64 = 7;

/// Decides whether a cached feed is still fresh enough to be served.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedCachePolicy {
    max_age: Duration,
}

impl FeedCachePolicy {
    pub fn with_max_age(max_age: Duration) -> Self {
        Self { max_age }
    }

    pub fn max_age(&self) -> Duration {
        self.max_age
    }

    /// A cache exactly `max_age` old is already expired.
    pub fn validate(&self, timestamp: DateTime<Utc>, against: DateTime<Utc>) -> bool {
        against - timestamp < self.max_age
    }
}

impl Default for FeedCachePolicy {
    fn default() -> Self {
        Self::with_max_age(Duration::days(MAX_CACHE_AGE_IN_DAYS))
    }
}
