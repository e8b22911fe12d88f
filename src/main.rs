//! CLI entry point for the scifetch tool.

use std::io::{self, IsTerminal, Read};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use scifetch_core::{Crawler, FetchConfig, UrlCache, parse_ref_list, user_agent};
use tracing::{debug, info, warn};

mod cli;

use cli::Args;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Determine log level based on verbose/quiet flags
    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt().with_env_filter(filter).init();

    debug!(?args, "CLI arguments parsed");
    info!("scifetch starting");

    // Read input: from the positional file or stdin
    let input_text = if let Some(path) = &args.input {
        std::fs::read_to_string(path)
            .with_context(|| format!("could not read input file {}", path.display()))?
    } else if !io::stdin().is_terminal() {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        info!("No input provided. Pass a file of 'doi quartile' lines or pipe them via stdin.");
        info!("Example: echo '10.1038/nphys1170 Q1' | scifetch");
        return Ok(());
    };

    let refs = parse_ref_list(&input_text);

    for skipped in &refs.skipped {
        warn!(line = %skipped, "Skipped unrecognized input line");
    }
    if refs.is_empty() {
        info!("No valid identifiers found in input");
        return Ok(());
    }
    info!(refs = refs.len(), skipped = refs.skipped.len(), "Parsed input");

    let mut cache = UrlCache::load(&args.cache);
    info!(path = %cache.path().display(), entries = cache.len(), "URL cache loaded");

    let config = FetchConfig {
        gateway_host: args.gateway,
        use_https: !args.no_ssl,
        user_agent: args
            .user_agent
            .unwrap_or_else(user_agent::default_user_agent),
        proxy: args.proxy,
        retries: args.max_retries,
        host_interval: Duration::from_secs(args.delay),
        ignore_robots: args.ignore_robots,
        robots_url: args.robots_url,
    };

    let crawler = Crawler::new(config).context("could not build HTTP client")?;
    let stats = crawler
        .run(&refs, &args.output, &mut cache)
        .await
        .context("crawl aborted")?;

    info!(
        attempted = stats.attempted,
        succeeded = stats.succeeded,
        blocked = stats.blocked,
        failed = stats.failed,
        "Fetch complete"
    );

    Ok(())
}
