use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use crate::errors::{FeederError, FeederResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    File,
    Sqlite,
}

impl StoreKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreKind::File => "file",
            StoreKind::Sqlite => "sqlite",
        }
    }

    fn default_file_name(&self) -> &'static str {
        match self {
            StoreKind::File => "feed-cache.json",
            StoreKind::Sqlite => "feed-cache.db",
        }
    }
}

impl std::str::FromStr for StoreKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "file" | "json" => Ok(StoreKind::File),
            "sqlite" | "db" => Ok(StoreKind::Sqlite),
            _ => Err(format!("Unknown store kind: {}", s)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub feed_url: Option<Url>,
    pub cache_path: PathBuf,
    pub store: StoreKind,
    pub cache_max_age: chrono::Duration,
    pub http_timeout: Duration,
}

impl Config {
    /// Get the directory where the executable is located
    fn exe_dir() -> Option<PathBuf> {
        std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
    }

    pub fn from_env() -> FeederResult<Self> {
        let exe_dir = Self::exe_dir();

        // Try to load .env from executable's directory first
        if let Some(ref dir) = exe_dir {
            let env_path = dir.join(".env");
            if env_path.exists() {
                dotenvy::from_path(&env_path).ok();
            }
        }
        // Fall back to current directory
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| std::env::var(key).ok(), exe_dir)
    }

    fn from_lookup<F>(lookup: F, exe_dir: Option<PathBuf>) -> FeederResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let feed_url = lookup("FEEDER_FEED_URL")
            .map(|raw| Url::parse(&raw).map_err(|e| FeederError::InvalidUrl(format!("{}: {}", raw, e))))
            .transpose()?;

        let store = match lookup("FEEDER_STORE") {
            Some(raw) => raw.parse().map_err(FeederError::Config)?,
            None => StoreKind::File,
        };

        // Default cache_path is relative to executable directory
        let cache_path = lookup("FEEDER_CACHE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| {
                exe_dir
                    .map(|d| d.join(store.default_file_name()))
                    .unwrap_or_else(|| PathBuf::from(".").join(store.default_file_name()))
            });

        let max_age_days = parse_number(&lookup, "FEEDER_CACHE_MAX_AGE_DAYS", 7, MAX_CACHE_AGE_DAYS)?;
        let timeout_secs = parse_number(&lookup, "FEEDER_HTTP_TIMEOUT_SECS", 30, MAX_HTTP_TIMEOUT_SECS)?;

        let cache_max_age = i64::try_from(max_age_days)
            .ok()
            .and_then(chrono::Duration::try_days)
            .ok_or_else(|| {
                FeederError::Config(format!(
                    "FEEDER_CACHE_MAX_AGE_DAYS is out of range: {}",
                    max_age_days
                ))
            })?;

        Ok(Self {
            feed_url,
            cache_path,
            store,
            cache_max_age,
            http_timeout: Duration::from_secs(timeout_secs),
        })
    }

    pub fn require_feed_url(&self) -> FeederResult<&Url> {
        self.feed_url
            .as_ref()
            .ok_or_else(|| FeederError::MissingEnvVar("FEEDER_FEED_URL".to_string()))
    }
}

// Roughly a century
const MAX_CACHE_AGE_DAYS: u64 = 36_500;
const MAX_HTTP_TIMEOUT_SECS: u64 = 3_600;

fn parse_number<F>(lookup: &F, key: &str, default: u64, max: u64) -> FeederResult<u64>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => match raw.trim().parse::<u64>() {
            Ok(value) if value > 0 && value <= max => Ok(value),
            _ => Err(FeederError::Config(format!(
                "{} must be a whole number between 1 and {}, got '{}'",
                key, max, raw
            ))),
        },
    }
}
