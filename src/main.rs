use anyhow::Result;
use clap::Parser;
use ffscraper::{
    fetch::HttpFetcher,
    logging,
    pipeline::{fetch_adp, fetch_stats, normalize_adp, Throttle},
    Config,
};
use std::path::PathBuf;
use tracing::info;

/// Fetch stats and ADP tables, then build the combined ADP file.
#[derive(Parser, Debug)]
#[command(name = "ffscraper")]
struct Args {
    /// YAML file overriding any default setting
    #[arg(long)]
    config: Option<PathBuf>,

    /// Root directory for all output (default: data)
    #[arg(long)]
    data_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    logging::init("info");
    info!("startup");

    // ─── 2) configure ────────────────────────────────────────────────
    let args = Args::parse();
    let cfg = Config::resolve(args.config.as_deref(), args.data_dir)?;
    let fetcher = HttpFetcher::new(&cfg.user_agent)?;
    let mut throttle = Throttle::new(cfg.request_delay());
    info!(data_dir = %cfg.data_dir.display(), "configured");

    // ─── 3) stats tables ─────────────────────────────────────────────
    let stats = fetch_stats(&cfg, &fetcher, &mut throttle)?;
    info!(saved = stats.saved.len(), skipped = stats.skipped.len(), "stats");

    // ─── 4) ADP tables ───────────────────────────────────────────────
    let adp = fetch_adp(&cfg, &fetcher, &mut throttle)?;
    info!(saved = adp.saved.len(), skipped = adp.skipped.len(), "adp");

    // ─── 5) combined long-format ADP ─────────────────────────────────
    let out = normalize_adp(&cfg)?;
    info!(path = %out.display(), "all done");
    Ok(())
}
