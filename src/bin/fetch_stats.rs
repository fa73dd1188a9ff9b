//! fetch_stats.rs
//!
//! Scrapes the stats table for every (scoring, position) pair and writes
//! `data/{position}_{scoring}_fantasy_stats.csv`. Pages that fail are logged
//! and skipped.

use anyhow::Result;
use clap::Parser;
use ffscraper::{fetch::HttpFetcher, logging, pipeline::{fetch_stats, Throttle}, Config};
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Parser, Debug)]
struct Args {
    /// YAML file overriding any default setting
    #[arg(long)]
    config: Option<PathBuf>,

    /// Root directory for all output (default: data)
    #[arg(long)]
    data_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    logging::init("info");
    let args = Args::parse();
    let cfg = Config::resolve(args.config.as_deref(), args.data_dir)?;
    let fetcher = HttpFetcher::new(&cfg.user_agent)?;

    let mut throttle = Throttle::new(cfg.request_delay());
    let report = fetch_stats(&cfg, &fetcher, &mut throttle)?;
    for (position, scoring) in &report.skipped {
        warn!(position = %position, scoring = %scoring, "not saved");
    }
    info!(saved = report.saved.len(), "done");
    Ok(())
}
