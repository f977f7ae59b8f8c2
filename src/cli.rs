// src/cli.rs
// =============================================================================
// Command-line interface, defined with clap's derive API.
//
// One subcommand per traversal strategy. They all take the same connection
// options (flattened from CrawlArgs), so switching strategy never means
// re-learning the flags:
//
//   pedigree-crawler dfs 6024 --base-url http://127.0.0.1:8123
//   pedigree-crawler bfs 6024 --concurrency 50 --json
//   pedigree-crawler pool 6024 --workers 20
// =============================================================================

use crate::config::{
    CrawlConfig, DEFAULT_BASE_URL, DEFAULT_CONCURRENCY, DEFAULT_MAX_ATTEMPTS,
};
use crate::traverse::{Strategy, DEFAULT_WORKERS};
use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(
    name = "pedigree-crawler",
    version = "0.1.0",
    about = "Rebuild a family tree by crawling a remote genealogy service",
    long_about = "pedigree-crawler starts from one family and follows spouses, children and \
                  parents until every reachable person and family has been fetched."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Depth-first: every parent family becomes its own concurrent branch
    Dfs {
        #[command(flatten)]
        crawl: CrawlArgs,
    },

    /// Breadth-first: fetch the tree one generation (wave) at a time
    Bfs {
        #[command(flatten)]
        crawl: CrawlArgs,
    },

    /// Pipelined: a fixed pool of in-flight families, no wave barrier
    Pool {
        #[command(flatten)]
        crawl: CrawlArgs,

        /// Maximum number of families processed at the same time
        #[arg(long, default_value_t = DEFAULT_WORKERS)]
        workers: usize,
    },
}

#[derive(Args, Debug)]
pub struct CrawlArgs {
    /// ID of the family to start from
    pub family_id: u64,

    /// Root URL of the genealogy service
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Maximum number of requests in flight at once
    #[arg(long, default_value_t = DEFAULT_CONCURRENCY)]
    pub concurrency: usize,

    /// Deadline for a single request, in seconds
    #[arg(long, default_value_t = 180)]
    pub timeout_secs: u64,

    /// How many times one resource is requested before giving up
    #[arg(long, default_value_t = DEFAULT_MAX_ATTEMPTS)]
    pub max_attempts: u32,

    /// Pause between attempts, in milliseconds
    #[arg(long, default_value_t = 100)]
    pub retry_delay_ms: u64,

    /// Print the whole tree as JSON instead of a summary
    #[arg(long)]
    pub json: bool,

    /// Log every fetched person and family
    #[arg(long, short)]
    pub verbose: bool,
}

impl CrawlArgs {
    pub fn config(&self) -> Result<CrawlConfig> {
        CrawlConfig::new(
            &self.base_url,
            Duration::from_secs(self.timeout_secs),
            self.max_attempts,
            Duration::from_millis(self.retry_delay_ms),
            self.concurrency,
        )
    }
}

impl Commands {
    // Splits a parsed command into "how to traverse" and "what to connect to"
    pub fn into_parts(self) -> (Strategy, CrawlArgs) {
        match self {
            Commands::Dfs { crawl } => (Strategy::DepthFirst, crawl),
            Commands::Bfs { crawl } => (Strategy::BreadthFirst, crawl),
            Commands::Pool { crawl, workers } => (Strategy::Pipelined { workers }, crawl),
        }
    }
}
