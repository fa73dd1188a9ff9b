// src/fetch/html.rs
//
// First-table extraction. Header rows come from <thead> (or the leading
// all-<th> rows when there is none); multi-row headers are flattened per
// column by joining their distinct non-empty levels.

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use thiserror::Error;
use tracing::trace;

use crate::process::{utils::clean_cell, RawTable};

static TABLE: Lazy<Selector> = Lazy::new(|| Selector::parse("table").expect("table selector"));

/// Upper bound on a single cell's `colspan`.
const MAX_COLSPAN: usize = 1_000;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    #[error("table has no header cells")]
    NoHeader,
    #[error("row {row} has {cells} cells but the header has {columns}")]
    RowTooWide {
        row: usize,
        cells: usize,
        columns: usize,
    },
}

/// Locate the first `<table>` in `html`. `Ok(None)` when there is none.
pub fn parse_first_table(html: &str) -> Result<Option<RawTable>, TableError> {
    let doc = Html::parse_document(html);
    match doc.select(&TABLE).next() {
        Some(table) => parse_table(table).map(Some),
        None => Ok(None),
    }
}

/// The `<tr>` rows that belong to `table` itself, tagged with whether they
/// sit inside `<thead>`. Rows of nested tables are not included.
fn own_rows(table: ElementRef<'_>) -> Vec<(bool, ElementRef<'_>)> {
    let mut rows = Vec::new();
    for child in table.children().filter_map(ElementRef::wrap) {
        match child.value().name() {
            "tr" => rows.push((false, child)),
            section @ ("thead" | "tbody" | "tfoot") => {
                let in_head = section == "thead";
                rows.extend(
                    child
                        .children()
                        .filter_map(ElementRef::wrap)
                        .filter(|e| e.value().name() == "tr")
                        .map(|tr| (in_head, tr)),
                );
            }
            _ => {}
        }
    }
    rows
}

struct Cell {
    text: String,
    is_th: bool,
    span: usize,
}

fn row_cells(tr: ElementRef<'_>) -> Vec<Cell> {
    tr.children()
        .filter_map(ElementRef::wrap)
        .filter_map(|e| {
            let name = e.value().name();
            if name != "td" && name != "th" {
                return None;
            }
            let span = e
                .value()
                .attr("colspan")
                .and_then(|s| s.trim().parse::<usize>().ok())
                .unwrap_or(1)
                .clamp(1, MAX_COLSPAN);
            Some(Cell {
                text: clean_cell(&e.text().collect::<String>()),
                is_th: name == "th",
                span,
            })
        })
        .collect()
}

fn expand(cells: &[Cell]) -> Vec<String> {
    cells
        .iter()
        .flat_map(|c| std::iter::repeat(c.text.clone()).take(c.span))
        .collect()
}

/// Join each column's header levels into one name.
fn flatten_headers(levels: &[Vec<String>]) -> Vec<String> {
    let width = levels.iter().map(Vec::len).max().unwrap_or(0);
    (0..width)
        .map(|i| {
            let mut parts: Vec<&str> = Vec::new();
            for level in levels {
                if let Some(part) = level.get(i).map(String::as_str) {
                    if !part.is_empty() && parts.last() != Some(&part) {
                        parts.push(part);
                    }
                }
            }
            if parts.is_empty() {
                format!("Unnamed: {}", i)
            } else {
                parts.join(" ")
            }
        })
        .collect()
}

fn parse_table(table: ElementRef<'_>) -> Result<RawTable, TableError> {
    let rows: Vec<(bool, Vec<Cell>)> = own_rows(table)
        .into_iter()
        .map(|(in_head, tr)| (in_head, row_cells(tr)))
        .filter(|(_, cells)| !cells.is_empty())
        .collect();

    let has_thead = rows.iter().any(|(in_head, _)| *in_head);
    let header_count = if has_thead {
        rows.iter().take_while(|(in_head, _)| *in_head).count()
    } else {
        rows.iter()
            .take_while(|(_, cells)| cells.iter().all(|c| c.is_th))
            .count()
    };

    let levels: Vec<Vec<String>> = rows[..header_count]
        .iter()
        .map(|(_, cells)| expand(cells))
        .collect();
    let headers = flatten_headers(&levels);
    if headers.is_empty() {
        return Err(TableError::NoHeader);
    }

    let width = headers.len();
    let mut out = RawTable::new(headers);
    let body = rows[header_count..]
        .iter()
        .filter(|(in_head, _)| !*in_head)
        .map(|(_, cells)| cells);
    for (row, cells) in body.enumerate() {
        let mut values = expand(cells);
        if values.len() > width {
            return Err(TableError::RowTooWide {
                row,
                cells: values.len(),
                columns: width,
            });
        }
        values.resize(width, String::new());
        out.rows.push(values);
    }
    trace!(columns = width, rows = out.len(), "parsed table");
    Ok(out)
}
