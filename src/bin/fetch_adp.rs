//! fetch_adp.rs
//!
//! Scrapes the ADP table of every position for each scoring format and
//! writes one stacked `data/adp/{scoring}_adp.csv` per format.

use anyhow::Result;
use clap::Parser;
use ffscraper::{fetch::HttpFetcher, logging, pipeline::{fetch_adp, Throttle}, Config};
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
    let report = fetch_adp(&cfg, &fetcher, &mut throttle)?;
    for (position, scoring) in &report.skipped {
        warn!(position = %position, scoring = %scoring, "missing from ADP file");
    }
    for path in &report.saved {
        info!(path = %path.display(), "written");
    }
    Ok(())
}
