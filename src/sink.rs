// src/sink.rs

use anyhow::{Context, Result};
use std::{
    fs,
    io::{BufWriter, Write},
    path::Path,
};
use tempfile::NamedTempFile;

use crate::process::{normalize::write_long, LongAdpRecord, RawTable};

/// Write through a hidden temp file in the target directory, then rename it
/// over `path`. Creates the directory and overwrites any existing file.
fn write_atomic<F>(path: &Path, fill: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<&mut NamedTempFile>) -> Result<()>,
{
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).with_context(|| format!("creating {:?}", dir))?;

    let mut tmp = tempfile::Builder::new()
        .prefix(".ffscraper")
        .suffix(".tmp")
        .tempfile_in(dir)
        .with_context(|| format!("creating temp file in {:?}", dir))?;
    {
        let mut w = BufWriter::new(&mut tmp);
        fill(&mut w)?;
        w.flush().with_context(|| format!("flushing {:?}", path))?;
    }
    tmp.persist(path)
        .map_err(|e| e.error)
        .with_context(|| format!("renaming into {:?}", path))?;
    Ok(())
}

/// Persist a scraped table as CSV at `path`.
pub fn save_table(table: &RawTable, path: &Path) -> Result<()> {
    write_atomic(path, |w| {
        table
            .write_csv(w)
            .with_context(|| format!("writing CSV {:?}", path))
    })
}

/// Persist the combined long-format ADP table at `path`.
pub fn save_long(records: &[LongAdpRecord], path: &Path) -> Result<()> {
    write_atomic(path, |w| {
        write_long(records, w).with_context(|| format!("writing CSV {:?}", path))
    })
}
