use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "feed-cache")]
#[command(about = "Fetch an image feed and keep a local copy for offline reading")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch the remote feed and replace the local cache with it
    Fetch {
        /// Dry run - print the fetched items without touching the cache
        #[arg(long)]
        dry_run: bool,
    },

    /// Show the cached feed if it is still fresh
    Show,

    /// Delete the cache if it is expired or unreadable
    Validate,
}
