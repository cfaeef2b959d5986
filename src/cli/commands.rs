use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "scrapefeed")]
#[command(about = "Build RSS feeds from HTML pages using CSS selector rules")]
#[command(version)]
pub struct Cli {
    /// Path to the YAML configuration file
    #[arg(short, long, env = "SCRAPEFEED_CONFIG")]
    pub config: PathBuf,

    /// Log debug details to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build every configured feed (or a single one) into the output directory
    Run {
        /// Only build the feed with this name
        #[arg(short, long)]
        feed: Option<String>,

        /// Print the RSS to stdout instead of writing files
        #[arg(long)]
        stdout: bool,

        /// Ignore cached pages and fetch everything again
        #[arg(long)]
        no_cache: bool,
    },

    /// List configured feeds
    List,

    /// Validate the configuration and every selector without fetching
    Check,
}
