// src/process/normalize.rs
//
// Wide ADP tables carry one rank column per position (WR, RB, TE, QB), of
// which a row normally fills exactly one. Normalizing melts those columns
// into an (`Original Position`, `Rank`) pair per filled cell.

use csv::{ReaderBuilder, WriterBuilder};
use serde::{Deserialize, Serialize};
use std::{
    fmt,
    fs::File,
    io::{self, Write},
    path::{Path, PathBuf},
};
use thiserror::Error;
use tracing::{debug, info, instrument};

use super::utils::is_missing;

/// Header of the combined long-format file.
pub const LONG_HEADERS: [&str; 5] = [
    "Player Team (Bye)",
    "Position",
    "Scoring",
    "Original Position",
    "Rank",
];

/// The wide rank columns, in melt order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ValueColumn {
    Wr,
    Rb,
    Te,
    Qb,
}

impl ValueColumn {
    pub const ORDER: [ValueColumn; 4] = [
        ValueColumn::Wr,
        ValueColumn::Rb,
        ValueColumn::Te,
        ValueColumn::Qb,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ValueColumn::Wr => "WR",
            ValueColumn::Rb => "RB",
            ValueColumn::Te => "TE",
            ValueColumn::Qb => "QB",
        }
    }
}

impl fmt::Display for ValueColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of a per-scoring ADP file. Columns other than these are ignored;
/// a rank column absent from the header reads as missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct WideAdpRecord {
    #[serde(rename = "Player Team (Bye)")]
    pub player: String,
    #[serde(rename = "Position")]
    pub position: String,
    #[serde(rename = "Scoring")]
    pub scoring: String,
    #[serde(rename = "WR", default)]
    pub wr: Option<String>,
    #[serde(rename = "RB", default)]
    pub rb: Option<String>,
    #[serde(rename = "TE", default)]
    pub te: Option<String>,
    #[serde(rename = "QB", default)]
    pub qb: Option<String>,
}

impl WideAdpRecord {
    /// The cell under `column`, or `None` when it is missing.
    pub fn value(&self, column: ValueColumn) -> Option<&str> {
        let cell = match column {
            ValueColumn::Wr => &self.wr,
            ValueColumn::Rb => &self.rb,
            ValueColumn::Te => &self.te,
            ValueColumn::Qb => &self.qb,
        };
        cell.as_deref().filter(|s| !is_missing(s))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LongAdpRecord {
    #[serde(rename = "Player Team (Bye)")]
    pub player: String,
    #[serde(rename = "Position")]
    pub position: String,
    #[serde(rename = "Scoring")]
    pub scoring: String,
    #[serde(rename = "Original Position")]
    pub original_position: ValueColumn,
    #[serde(rename = "Rank")]
    pub rank: i64,
}

/// A non-missing rank cell that is not a whole number.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("row {row}: {column} rank {value:?} is not a whole number")]
pub struct RankError {
    /// Zero-based data row within the wide table.
    pub row: usize,
    pub column: ValueColumn,
    pub value: String,
}

#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("ADP input {path:?} does not exist")]
    MissingInput { path: PathBuf },

    #[error("failed to open {path:?}: {source}")]
    Io { path: PathBuf, source: io::Error },

    #[error("CSV error in {path:?}: {source}")]
    Csv { path: PathBuf, source: csv::Error },

    #[error("bad rank in {path:?}: {source}")]
    Rank { path: PathBuf, source: RankError },
}

/// Parse a rank cell as a whole number. Decimal text is accepted only when it
/// has no fractional part (`"5.0"`).
pub fn parse_rank(cell: &str) -> Option<i64> {
    let s = cell.trim();
    if let Ok(n) = s.parse::<i64>() {
        return Some(n);
    }
    let f = s.parse::<f64>().ok()?;
    if f.is_finite() && f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

/// Melt a wide table into long records.
///
/// Rows come out in input order and, within a row, in WR, RB, TE, QB order.
/// Missing cells are dropped; every other cell must be a whole number or the
/// whole call fails.
pub fn reshape(wide: &[WideAdpRecord]) -> Result<Vec<LongAdpRecord>, RankError> {
    let mut out = Vec::with_capacity(wide.len());
    for (row, rec) in wide.iter().enumerate() {
        for column in ValueColumn::ORDER {
            let Some(cell) = rec.value(column) else {
                continue;
            };
            let rank = parse_rank(cell).ok_or_else(|| RankError {
                row,
                column,
                value: cell.to_string(),
            })?;
            out.push(LongAdpRecord {
                player: rec.player.clone(),
                position: rec.position.clone(),
                scoring: rec.scoring.clone(),
                original_position: column,
                rank,
            });
        }
    }
    Ok(out)
}

/// Read one per-scoring ADP file.
pub fn read_wide<P: AsRef<Path>>(path: P) -> Result<Vec<WideAdpRecord>, NormalizeError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(NormalizeError::MissingInput {
            path: path.to_path_buf(),
        });
    }
    let file = File::open(path).map_err(|source| NormalizeError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut rdr = ReaderBuilder::new().from_reader(file);
    rdr.deserialize()
        .collect::<Result<Vec<WideAdpRecord>, _>>()
        .map_err(|source| NormalizeError::Csv {
            path: path.to_path_buf(),
            source,
        })
}

/// Read and reshape one file.
#[instrument(level = "debug", skip(path), fields(path = %path.as_ref().display()))]
pub fn normalize_file<P: AsRef<Path>>(path: P) -> Result<Vec<LongAdpRecord>, NormalizeError> {
    let path = path.as_ref();
    let wide = read_wide(path)?;
    let long = reshape(&wide).map_err(|source| NormalizeError::Rank {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(wide = wide.len(), long = long.len(), "reshaped");
    Ok(long)
}

/// Reshape every file and stack the results in the order given.
///
/// All inputs must exist; the presence check runs before any file is read so
/// there is no partial combination.
pub fn normalize_all<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<LongAdpRecord>, NormalizeError> {
    for path in paths {
        let path: &Path = path.as_ref();
        if !path.exists() {
            return Err(NormalizeError::MissingInput {
                path: path.to_path_buf(),
            });
        }
    }

    let mut combined = Vec::new();
    for path in paths {
        let path = path.as_ref();
        info!(path = %path.display(), "processing ADP file");
        combined.extend(normalize_file(path)?);
    }
    Ok(combined)
}

/// Write long records with a header row, even when there are none.
pub fn write_long<W: Write>(records: &[LongAdpRecord], writer: W) -> csv::Result<()> {
    let mut wtr = WriterBuilder::new().has_headers(false).from_writer(writer);
    wtr.write_record(LONG_HEADERS)?;
    for rec in records {
        wtr.serialize(rec)?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn wide(player: &str, pos: &str, scoring: &str, ranks: [&str; 4]) -> WideAdpRecord {
        let cell = |s: &str| Some(s.to_string());
        WideAdpRecord {
            player: player.into(),
            position: pos.into(),
            scoring: scoring.into(),
            wr: cell(ranks[0]),
            rb: cell(ranks[1]),
            te: cell(ranks[2]),
            qb: cell(ranks[3]),
        }
    }

    #[test]
    fn single_value_becomes_one_long_row() {
        let input = [wide("J. Doe (BYE 7)", "WR1", "standard", ["5", "", "", ""])];
        let out = reshape(&input).unwrap();
        assert_eq!(
            out,
            vec![LongAdpRecord {
                player: "J. Doe (BYE 7)".into(),
                position: "WR1".into(),
                scoring: "standard".into(),
                original_position: ValueColumn::Wr,
                rank: 5,
            }]
        );
    }

    #[test]
    fn all_missing_row_is_dropped() {
        let input = [
            wide("A", "QB", "ppr", ["", "", "", ""]),
            wide("B", "TE", "ppr", ["", " ", "3", ""]),
        ];
        let out = reshape(&input).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].player, "B");
        assert_eq!(out[0].original_position, ValueColumn::Te);
    }

    #[test]
    fn empty_table_is_fine() {
        assert!(reshape(&[]).unwrap().is_empty());
    }

    #[test]
    fn order_follows_rows_then_columns() {
        let input = [
            wide("q", "QB", "standard", ["", "", "", "1"]),
            wide("w", "WR", "standard", ["2", "", "", ""]),
            wide("r", "RB", "standard", ["", "3", "", ""]),
        ];
        let out: Vec<_> = reshape(&input)
            .unwrap()
            .into_iter()
            .map(|r| (r.player, r.original_position, r.rank))
            .collect();
        assert_eq!(
            out,
            vec![
                ("q".to_string(), ValueColumn::Qb, 1),
                ("w".to_string(), ValueColumn::Wr, 2),
                ("r".to_string(), ValueColumn::Rb, 3),
            ]
        );
    }

    #[test]
    fn multiple_filled_columns_each_emit_a_row() {
        let input = [wide("x", "WR", "ppr", ["4", "", "", "9"])];
        let cols: Vec<_> = reshape(&input)
            .unwrap()
            .iter()
            .map(|r| (r.original_position, r.rank))
            .collect();
        assert_eq!(cols, vec![(ValueColumn::Wr, 4), (ValueColumn::Qb, 9)]);
    }

    #[test]
    fn non_numeric_rank_fails_the_whole_reshape() {
        let input = [
            wide("ok", "WR", "ppr", ["1", "", "", ""]),
            wide("bad", "RB", "ppr", ["", "N/A", "", ""]),
        ];
        let err = reshape(&input).unwrap_err();
        assert_eq!(
            err,
            RankError {
                row: 1,
                column: ValueColumn::Rb,
                value: "N/A".into(),
            }
        );
    }

    #[test]
    fn parse_rank_accepts_whole_numbers_only() {
        assert_eq!(parse_rank("12"), Some(12));
        assert_eq!(parse_rank(" 7 "), Some(7));
        assert_eq!(parse_rank("5.0"), Some(5));
        assert_eq!(parse_rank("5.5"), None);
        assert_eq!(parse_rank("NaN"), None);
        assert_eq!(parse_rank("N/A"), None);
    }

    #[test]
    fn parse_rank_rejects_values_past_i64() {
        assert_eq!(parse_rank("9223372036854775807"), Some(i64::MAX));
        assert_eq!(parse_rank("9223372036854775808"), None);
        assert_eq!(parse_rank("9223372036854775808.0"), None);
        assert_eq!(parse_rank("1e19"), None);
        assert_eq!(parse_rank("-9223372036854775808"), Some(i64::MIN));
    }

    fn write_file(dir: &Path, name: &str, body: &str) -> PathBuf {
        let p = dir.join(name);
        fs::write(&p, body).unwrap();
        p
    }

    #[test]
    fn read_wide_tolerates_extra_and_absent_columns() {
        let dir = tempdir().unwrap();
        let p = write_file(
            dir.path(),
            "standard_adp.csv",
            "QB,Player Team (Bye),ESPN,AVG,Position,Scoring,RB\n\
             1,Josh Allen BUF (12),20,21.0,QB,standard,\n\
             ,Bijan Robinson ATL (5),2,2.5,RB,standard,1.0\n",
        );
        let rows = read_wide(&p).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].value(ValueColumn::Qb), Some("1"));
        assert_eq!(rows[0].value(ValueColumn::Wr), None);
        assert_eq!(rows[1].value(ValueColumn::Rb), Some("1.0"));

        let long = normalize_file(&p).unwrap();
        assert_eq!(long.len(), 2);
        assert_eq!(long[1].rank, 1);
    }

    #[test]
    fn normalize_all_keeps_file_order() {
        let dir = tempdir().unwrap();
        let header = "Player Team (Bye),Position,Scoring,WR,RB,TE,QB\n";
        let paths = vec![
            write_file(dir.path(), "standard_adp.csv", &format!("{header}a,WR,standard,1,,,\nb,RB,standard,,2,,\n")),
            write_file(dir.path(), "half-ppr_adp.csv", &format!("{header}c,TE,half-ppr,,,3,\n")),
            write_file(dir.path(), "ppr_adp.csv", &format!("{header}d,QB,ppr,,,,4\n")),
        ];

        let out = normalize_all(&paths).unwrap();
        let players: Vec<_> = out.iter().map(|r| r.player.as_str()).collect();
        assert_eq!(players, vec!["a", "b", "c", "d"]);
        let scorings: Vec<_> = out.iter().map(|r| r.scoring.as_str()).collect();
        assert_eq!(scorings, vec!["standard", "standard", "half-ppr", "ppr"]);
    }

    #[test]
    fn normalize_all_fails_on_missing_input() {
        let dir = tempdir().unwrap();
        let header = "Player Team (Bye),Position,Scoring,WR,RB,TE,QB\n";
        let present = write_file(dir.path(), "standard_adp.csv", header);
        let absent = dir.path().join("ppr_adp.csv");

        let err = normalize_all(&[present, absent.clone()]).unwrap_err();
        match err {
            NormalizeError::MissingInput { path } => assert_eq!(path, absent),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn bad_rank_error_names_the_file() {
        let dir = tempdir().unwrap();
        let p = write_file(
            dir.path(),
            "ppr_adp.csv",
            "Player Team (Bye),Position,Scoring,WR,RB,TE,QB\nx,WR,ppr,abc,,,\n",
        );
        let err = normalize_all(&[p.clone()]).unwrap_err();
        assert!(matches!(err, NormalizeError::Rank { ref path, .. } if *path == p));
    }

    #[test]
    fn long_output_has_header_and_no_index() {
        let recs = vec![LongAdpRecord {
            player: "Smith, Jr. (BYE 9)".into(),
            position: "RB".into(),
            scoring: "ppr".into(),
            original_position: ValueColumn::Rb,
            rank: 12,
        }];
        let mut buf = Vec::new();
        write_long(&recs, &mut buf).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "Player Team (Bye),Position,Scoring,Original Position,Rank\n\
             \"Smith, Jr. (BYE 9)\",RB,ppr,RB,12\n"
        );

        let mut empty = Vec::new();
        write_long(&[], &mut empty).unwrap();
        assert_eq!(
            String::from_utf8(empty).unwrap(),
            "Player Team (Bye),Position,Scoring,Original Position,Rank\n"
        );
    }
}
