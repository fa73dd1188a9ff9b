// src/pipeline.rs
//
// Batch entry points. Fetch batches never abort on a bad page: the unit is
// logged and skipped. Normalization and sink failures propagate.

use anyhow::{Context, Result};
use std::{path::PathBuf, thread, time::Duration};
use tracing::{info, instrument, warn};
use url::Url;

use crate::{
    config::{Config, Position, Scoring},
    fetch::{
        urls::{adp_url, stats_url},
        FetchError, TableFetcher,
    },
    process::{normalize_all, RawTable},
    sink::{save_long, save_table},
};

/// What a fetch batch produced.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub saved: Vec<PathBuf>,
    pub skipped: Vec<(Position, Scoring)>,
}

/// Fixed courtesy pause before every request but the first. One throttle is
/// shared by every batch of a run so the gap holds across batch boundaries.
#[derive(Debug)]
pub struct Throttle {
    delay: Duration,
    started: bool,
}

impl Throttle {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            started: false,
        }
    }

    pub fn wait(&mut self) {
        if self.started && !self.delay.is_zero() {
            thread::sleep(self.delay);
        }
        self.started = true;
    }
}

/// Fetch one page and label it with `Position`/`Scoring`. Failures are logged
/// and come back as `None`.
fn fetch_unit<F: TableFetcher + ?Sized>(
    fetcher: &F,
    url: Result<Url, url::ParseError>,
    position: Position,
    scoring: Scoring,
) -> Option<RawTable> {
    info!(position = %position, scoring = %scoring, "fetching");
    let result = url
        .map_err(FetchError::from)
        .and_then(|u| fetcher.fetch_table(&u));
    match result {
        Ok(mut table) => {
            table.set_column("Position", position.label());
            table.set_column("Scoring", scoring.as_str());
            info!(position = %position, scoring = %scoring, rows = table.len(), "fetched");
            Some(table)
        }
        Err(e) => {
            warn!(position = %position, scoring = %scoring, error = %e, "skipping");
            None
        }
    }
}

/// One stats file per (position, scoring) pair.
#[instrument(level = "info", skip_all)]
pub fn fetch_stats<F: TableFetcher + ?Sized>(
    cfg: &Config,
    fetcher: &F,
    throttle: &mut Throttle,
) -> Result<BatchReport> {
    let mut report = BatchReport::default();

    for &scoring in &cfg.scorings {
        for &position in &cfg.stats_positions {
            throttle.wait();
            let url = stats_url(&cfg.base_url, position, scoring);
            match fetch_unit(fetcher, url, position, scoring) {
                Some(table) => {
                    let path = cfg.stats_path(position, scoring);
                    save_table(&table, &path)?;
                    info!(path = %path.display(), "saved stats");
                    report.saved.push(path);
                }
                None => report.skipped.push((position, scoring)),
            }
        }
    }

    info!(
        saved = report.saved.len(),
        skipped = report.skipped.len(),
        "stats batch done"
    );
    Ok(report)
}

/// One ADP file per scoring format, stacking every position that succeeded.
#[instrument(level = "info", skip_all)]
pub fn fetch_adp<F: TableFetcher + ?Sized>(
    cfg: &Config,
    fetcher: &F,
    throttle: &mut Throttle,
) -> Result<BatchReport> {
    let mut report = BatchReport::default();

    for &scoring in &cfg.scorings {
        let mut tables = Vec::with_capacity(cfg.adp_positions.len());
        for &position in &cfg.adp_positions {
            throttle.wait();
            let url = adp_url(&cfg.base_url, position, scoring);
            match fetch_unit(fetcher, url, position, scoring) {
                Some(table) => tables.push(table),
                None => report.skipped.push((position, scoring)),
            }
        }

        if tables.is_empty() {
            warn!(scoring = %scoring, "no ADP data fetched");
            continue;
        }

        let combined = RawTable::concat(tables);
        let path = cfg.adp_path(scoring);
        save_table(&combined, &path)?;
        info!(path = %path.display(), rows = combined.len(), "saved ADP");
        report.saved.push(path);
    }

    info!(
        saved = report.saved.len(),
        skipped = report.skipped.len(),
        "ADP batch done"
    );
    Ok(report)
}

/// Melt the three per-scoring ADP files into the combined long table.
///
/// Everything is read and reshaped before the output is touched, so a failed
/// run leaves an existing combined file as it was.
#[instrument(level = "info", skip_all)]
pub fn normalize_adp(cfg: &Config) -> Result<PathBuf> {
    let inputs = cfg.adp_input_paths();
    let records = normalize_all(&inputs).context("normalizing ADP files")?;

    let out = cfg.combined_adp_path();
    save_long(&records, &out)?;
    info!(path = %out.display(), rows = records.len(), "combined ADP data saved");
    Ok(out)
}
