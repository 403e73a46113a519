use chrono::Utc;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use feed_cache::api::{RemoteFeedLoader, ReqwestHttpClient};
use feed_cache::cache::{FeedCachePolicy, LocalFeedLoader};
use feed_cache::cli::{Cli, Commands};
use feed_cache::config::{Config, StoreKind};
use feed_cache::domain::{FeedItem, FeedLoader, FeedLoaderCompletion};
use feed_cache::errors::{FeederError, FeederResult};
use feed_cache::services::FeedService;
use feed_cache::storage::{FeedStore, FileFeedStore, SqliteFeedStore, SqliteStorage};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> FeederResult<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::from_env()?;
    tracing::debug!(
        store = config.store.as_str(),
        path = %config.cache_path.display(),
        "Using feed cache"
    );

    // Initialize storage
    match config.store {
        StoreKind::File => {
            let store = FileFeedStore::new(&config.cache_path);
            dispatch(cli.command, &config, store)
        }
        StoreKind::Sqlite => {
            let store = SqliteFeedStore::new(SqliteStorage::new(&config.cache_path)?);
            dispatch(cli.command, &config, store)
        }
    }
}

fn dispatch<S: FeedStore + 'static>(
    command: Commands,
    config: &Config,
    store: S,
) -> FeederResult<()> {
    let policy = FeedCachePolicy::with_max_age(config.cache_max_age);
    let cache = LocalFeedLoader::with_policy(store, Utc::now, policy);

    match command {
        Commands::Fetch { dry_run } => {
            let url = config.require_feed_url()?.clone();
            let client = ReqwestHttpClient::with_timeout(config.http_timeout)?;
            let service = FeedService::new(RemoteFeedLoader::new(url, client), cache);
            cmd_fetch(&service, dry_run)
        }
        Commands::Show => cmd_show(&FeedService::new(NoRemote, cache)),
        Commands::Validate => cmd_validate(&FeedService::new(NoRemote, cache)),
    }
}

/// Remote side for commands that only touch the cache.
struct NoRemote;

impl FeedLoader for NoRemote {
    fn load(&self, completion: FeedLoaderCompletion) {
        completion(Err(FeederError::Config("No remote feed configured".to_string())))
    }
}

fn cmd_fetch<R: FeedLoader, S: FeedStore + 'static>(
    service: &FeedService<R, S>,
    dry_run: bool,
) -> FeederResult<()> {
    println!("Fetching feed...\n");

    let items = if dry_run {
        service.fetch()?
    } else {
        service.refresh()?
    };

    if items.is_empty() {
        println!("Feed is empty.");
    } else {
        print_items(&items);
    }

    if dry_run {
        println!("[DRY RUN] Fetched {} items, cache left untouched.", items.len());
    } else {
        println!("Cached {} items.", items.len());
    }

    Ok(())
}

fn cmd_show<R: FeedLoader, S: FeedStore + 'static>(service: &FeedService<R, S>) -> FeederResult<()> {
    let items = service.cached()?;

    if items.is_empty() {
        println!("No cached items.");
        return Ok(());
    }

    println!("Cached items:\n");
    print_items(&items);
    Ok(())
}

fn cmd_validate<R: FeedLoader, S: FeedStore + 'static>(
    service: &FeedService<R, S>,
) -> FeederResult<()> {
    service.validate()?;
    println!("Cache is valid.");
    Ok(())
}

fn print_items(items: &[FeedItem]) {
    for item in items {
        println!("  {}", item.id);
        println!("    Image: {}", item.url);
        if let Some(ref description) = item.description {
            println!("    Description: {}", description);
        }
        if let Some(ref location) = item.location {
            println!("    Location: {}", location);
        }
        println!();
    }
}
