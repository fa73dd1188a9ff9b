//! normalize_adp.rs
//!
//! Melts `data/adp/{standard,half-ppr,ppr}_adp.csv` into
//! `data/combined_transformed_adp.csv`. Any missing input or malformed rank
//! aborts the run and leaves the previous output in place.

use anyhow::Result;
use clap::Parser;
use ffscraper::{logging, pipeline::normalize_adp, Config};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
struct Args {
    /// YAML file overriding any default setting
    #[arg(long)]
    config: Option<PathBuf>,

    /// Root directory holding `adp/` and the combined output (default: data)
    #[arg(long)]
    data_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    logging::init("info");
    let args = Args::parse();
    let cfg = Config::resolve(args.config.as_deref(), args.data_dir)?;

    let out = normalize_adp(&cfg)?;
    info!(path = %out.display(), "combined ADP data saved");
    Ok(())
}
