use std::io;

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use scrapefeed::cli::{Cli, Commands};
use scrapefeed::config::{Config, FeedConfig};
use scrapefeed::fixers::FixerPipeline;
use scrapefeed::services::{FeedService, FetchService};
use scrapefeed::sources::HttpPageSource;
use scrapefeed::storage::FileCache;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("scrapefeed=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("scrapefeed=info"))
    };

    // stderr keeps `run --stdout` output clean
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = Config::load(&cli.config)
        .with_context(|| format!("Failed to load {}", cli.config.display()))?;

    match cli.command {
        Commands::Run {
            feed,
            stdout,
            no_cache,
        } => cmd_run(&config, feed.as_deref(), stdout, no_cache),
        Commands::List => cmd_list(&config),
        Commands::Check => cmd_check(&config),
    }
}

fn cmd_run(config: &Config, only: Option<&str>, stdout: bool, no_cache: bool) -> Result<()> {
    let feeds: Vec<&FeedConfig> = match only {
        Some(name) => vec![config
            .find_feed(name)
            .ok_or_else(|| anyhow!("No feed named '{}' in the configuration", name))?],
        None => config.feeds.iter().collect(),
    };

    if feeds.is_empty() {
        println!("No feeds configured.");
        return Ok(());
    }

    let cache_dir = config.cache_dir();
    let cache = FileCache::new(
        &cache_dir,
        config.cache_ttl(),
        tracing::debug_span!("cache", dir = %cache_dir.display()),
    );
    let fetcher = FetchService::new(cache, HttpPageSource::new(), tracing::info_span!("fetch"));
    let service = FeedService::new(fetcher, FixerPipeline::new(), tracing::info_span!("feed"));

    let mut failed = 0;
    for feed in &feeds {
        let result = if stdout {
            service.render(feed, no_cache).map(|rss| println!("{}", rss))
        } else {
            service
                .write(feed, &config.output_dir, no_cache)
                .map(|path| println!("{} -> {}", feed.name, path.display()))
        };

        if let Err(e) = result {
            // Keep going with the remaining feeds
            tracing::error!(feed = %feed.name, error = %e, "Feed failed");
            failed += 1;
        }
    }

    if failed > 0 {
        bail!("{} of {} feeds failed", failed, feeds.len());
    }

    Ok(())
}

fn cmd_list(config: &Config) -> Result<()> {
    if config.feeds.is_empty() {
        println!("No feeds configured.");
        return Ok(());
    }

    println!("Configured feeds:\n");
    for feed in &config.feeds {
        println!("  {}", feed.name);
        println!("    URL: {}", feed.url);
        println!("    Output: {}.rss", feed.slug()?);
        println!();
    }

    Ok(())
}

fn cmd_check(config: &Config) -> Result<()> {
    config.check_selectors()?;
    println!("Configuration OK: {} feeds", config.feeds.len());
    Ok(())
}
