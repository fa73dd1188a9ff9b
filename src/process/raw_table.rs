use csv::{ReaderBuilder, WriterBuilder};
use std::io::{Read, Write};

/// One scraped table, all cells kept as text. An empty string is a missing cell.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    /// Column names, flattened from the page's header rows.
    pub headers: Vec<String>,
    /// Each body row, one String per header.
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Fill `name` with `value` on every row, overwriting the column if it
    /// already exists and appending it otherwise.
    pub fn set_column(&mut self, name: &str, value: &str) {
        match self.column_index(name) {
            Some(idx) => {
                for row in &mut self.rows {
                    row[idx] = value.to_string();
                }
            }
            None => {
                self.headers.push(name.to_string());
                for row in &mut self.rows {
                    row.push(value.to_string());
                }
            }
        }
    }

    /// Stack tables vertically. Columns are the union in first-seen order;
    /// a table lacking a column contributes empty cells for it.
    pub fn concat<I>(tables: I) -> RawTable
    where
        I: IntoIterator<Item = RawTable>,
    {
        let tables: Vec<RawTable> = tables.into_iter().collect();

        let mut headers: Vec<String> = Vec::new();
        for t in &tables {
            for h in &t.headers {
                if !headers.contains(h) {
                    headers.push(h.clone());
                }
            }
        }

        let mut out = RawTable::new(headers);
        for t in tables {
            let mapping: Vec<Option<usize>> = out
                .headers
                .iter()
                .map(|h| t.column_index(h))
                .collect();
            for row in t.rows {
                let merged = mapping
                    .iter()
                    .map(|src| src.and_then(|i| row.get(i).cloned()).unwrap_or_default())
                    .collect();
                out.rows.push(merged);
            }
        }
        out
    }

    /// Serialize as comma-separated text with a header row and no index column.
    pub fn write_csv<W: Write>(&self, writer: W) -> csv::Result<()> {
        let mut wtr = WriterBuilder::new().from_writer(writer);
        wtr.write_record(&self.headers)?;
        for row in &self.rows {
            wtr.write_record(row)?;
        }
        wtr.flush()?;
        Ok(())
    }

    /// Parse comma-separated text whose first record is the header row.
    pub fn read_csv<R: Read>(reader: R) -> csv::Result<RawTable> {
        let mut rdr = ReaderBuilder::new().flexible(true).from_reader(reader);
        let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
        let width = headers.len();
        let mut table = RawTable::new(headers);
        for record in rdr.records() {
            let mut row: Vec<String> = record?.iter().map(str::to_string).collect();
            row.resize(width, String::new());
            table.rows.push(row);
        }
        Ok(table)
    }
}
