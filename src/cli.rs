//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;

use scifetch_core::{DEFAULT_HOST_INTERVAL_SECS, DEFAULT_RETRIES, KNOWN_MIRRORS};

/// Batch-fetch scholarly-article PDFs by DOI from a gateway site.
///
/// Reads `doi quartile` lines from a file or stdin, downloads each article's
/// PDF, and files it under a per-quartile output subdirectory. Already-handled
/// identifiers are skipped via a persistent URL cache.
#[derive(Parser, Debug)]
#[command(name = "scifetch")]
#[command(author, version, about)]
pub struct Args {
    /// Input file of `doi quartile` lines (reads stdin when omitted)
    pub input: Option<PathBuf>,

    /// Output directory; PDFs land in Q1..Q4 subdirectories
    #[arg(short, long, default_value = "downloaded_papers")]
    pub output: PathBuf,

    /// URL cache file recording already-downloaded identifiers
    #[arg(long, default_value = "download_cache.json")]
    pub cache: PathBuf,

    /// Gateway host to fetch landing pages from
    #[arg(long, default_value_t = KNOWN_MIRRORS[0].to_string())]
    pub gateway: String,

    /// Override the User-Agent header
    #[arg(long)]
    pub user_agent: Option<String>,

    /// Proxy URL applied to all requests
    #[arg(long)]
    pub proxy: Option<String>,

    /// Maximum retry attempts for transient failures (0-10)
    #[arg(short = 'r', long, default_value_t = DEFAULT_RETRIES, value_parser = clap::value_parser!(u32).range(0..=10))]
    pub max_retries: u32,

    /// Minimum delay between requests to the same host in seconds (max 600)
    #[arg(short = 'l', long, default_value_t = DEFAULT_HOST_INTERVAL_SECS, value_parser = clap::value_parser!(u64).range(0..=600))]
    pub delay: u64,

    /// Use plain http for gateway URLs instead of https
    #[arg(long)]
    pub no_ssl: bool,

    /// Skip robots.txt checks entirely
    #[arg(long)]
    pub ignore_robots: bool,

    /// Explicit robots.txt URL (defaults to the gateway's /robots.txt)
    #[arg(long)]
    pub robots_url: Option<String>,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,
}
