// src/main.rs
// =============================================================================
// Entry point of the pedigree crawler.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging (tracing) on stderr, so stdout stays clean for --json
// 3. Build the fetch stack: HTTP transport -> throttled client -> fetchers
// 4. Run the chosen traversal and print the tree
// 5. Exit with proper code (0 = tree built, 1 = root family not found,
//    2 = error)
// =============================================================================

use anyhow::Result;
use clap::Parser;
use pedigree_crawler::cli::{Cli, CrawlArgs};
use pedigree_crawler::fetch::{EntityFetcher, FetchClient, HttpTransport};
use pedigree_crawler::traverse::{Crawler, Strategy};
use pedigree_crawler::tree::{FamilyId, Tree};
use std::time::{Duration, Instant};
use tracing::Level;

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();
    let (strategy, args) = cli.command.into_parts();

    tracing_subscriber::fmt()
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::INFO })
        .with_writer(std::io::stderr)
        .init();

    let config = args.config()?;

    // 0 is the service's "no such family"
    let Some(root) = FamilyId::new(args.family_id) else {
        tracing::warn!("family 0 does not exist, nothing to crawl");
        return Ok(1);
    };

    let transport = HttpTransport::new(config.timeout)?;
    let client = FetchClient::new(transport, &config);
    let crawler = Crawler::new(EntityFetcher::new(client, config.base_url.clone()));

    tracing::info!(%root, ?strategy, base_url = %config.base_url, concurrency = config.concurrency, "starting crawl");

    let started = Instant::now();
    let tree = crawler.run(strategy, root).await;
    let elapsed = started.elapsed();

    let requests = crawler.fetcher().client().requests();
    let failed = crawler.fetcher().client().failed_attempts();
    print_results(&tree, &args, strategy, requests, failed, elapsed)?;

    if tree.family(root).is_none() {
        Ok(1)
    } else {
        Ok(0)
    }
}

// Prints either the JSON tree or a human summary
fn print_results(
    tree: &Tree,
    args: &CrawlArgs,
    strategy: Strategy,
    requests: usize,
    failed: usize,
    elapsed: Duration,
) -> Result<()> {
    if args.json {
        println!("{}", serde_json::to_string_pretty(&tree.snapshot())?);
        return Ok(());
    }

    println!("Strategy:        {}", strategy_name(strategy));
    println!("Starting family: {}", args.family_id);
    println!("{}", "=".repeat(40));
    println!("Families:        {}", tree.family_count());
    println!("Persons:         {}", tree.person_count());
    println!("Requests:        {} ({} failed)", requests, failed);
    println!("Total time:      {:.3}s", elapsed.as_secs_f64());

    Ok(())
}

fn strategy_name(strategy: Strategy) -> String {
    match strategy {
        Strategy::DepthFirst => "depth-first".to_string(),
        Strategy::BreadthFirst => "breadth-first".to_string(),
        Strategy::Pipelined { workers } => format!("pipelined ({} workers)", workers),
    }
}
