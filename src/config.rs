// src/config.rs

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fmt, fs,
    path::{Path, PathBuf},
    time::Duration,
};
use url::Url;

/// Browser-like agent; the site blocks obvious bots.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

pub const DEFAULT_BASE_URL: &str = "https://www.fantasypros.com/";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    Qb,
    Rb,
    Wr,
    Te,
}

impl Position {
    /// Lowercase slug used in URLs and file names.
    pub fn slug(self) -> &'static str {
        match self {
            Position::Qb => "qb",
            Position::Rb => "rb",
            Position::Wr => "wr",
            Position::Te => "te",
        }
    }

    /// Uppercase label written into the `Position` column.
    pub fn label(self) -> &'static str {
        match self {
            Position::Qb => "QB",
            Position::Rb => "RB",
            Position::Wr => "WR",
            Position::Te => "TE",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scoring {
    #[serde(rename = "standard")]
    Standard,
    #[serde(rename = "half-ppr")]
    HalfPpr,
    #[serde(rename = "ppr")]
    Ppr,
}

impl Scoring {
    /// Normalization order: standard, then half-PPR, then PPR.
    pub const ALL: [Scoring; 3] = [Scoring::Standard, Scoring::HalfPpr, Scoring::Ppr];

    pub fn as_str(self) -> &'static str {
        match self {
            Scoring::Standard => "standard",
            Scoring::HalfPpr => "half-ppr",
            Scoring::Ppr => "ppr",
        }
    }
}

impl fmt::Display for Scoring {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything the pipelines need: where to fetch from, what to fetch and
/// where to write. Defaults reproduce the fixed batch layout under `data/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub base_url: Url,
    pub user_agent: String,
    /// Pause between consecutive page requests, in milliseconds.
    pub request_delay_ms: u64,
    pub data_dir: PathBuf,
    pub stats_positions: Vec<Position>,
    pub adp_positions: Vec<Position>,
    pub scorings: Vec<Scoring>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base URL should parse"),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            request_delay_ms: 3_000,
            data_dir: PathBuf::from("data"),
            stats_positions: vec![Position::Wr, Position::Rb, Position::Qb, Position::Te],
            adp_positions: vec![Position::Qb, Position::Rb, Position::Wr, Position::Te],
            scorings: Scoring::ALL.to_vec(),
        }
    }
}

impl Config {
    /// Load a YAML file; fields it omits keep their defaults.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text =
            fs::read_to_string(path).with_context(|| format!("reading config {:?}", path))?;
        serde_yaml::from_str(&text).with_context(|| format!("parsing config {:?}", path))
    }

    /// Build from optional CLI overrides, the way every binary does.
    pub fn resolve(config: Option<&Path>, data_dir: Option<PathBuf>) -> Result<Self> {
        let mut cfg = match config {
            Some(p) => Self::from_yaml_file(p)?,
            None => Self::default(),
        };
        if let Some(dir) = data_dir {
            cfg.data_dir = dir;
        }
        Ok(cfg)
    }

    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }

    pub fn adp_dir(&self) -> PathBuf {
        self.data_dir.join("adp")
    }

    /// `data/{position}_{scoring}_fantasy_stats.csv`
    pub fn stats_path(&self, position: Position, scoring: Scoring) -> PathBuf {
        self.data_dir
            .join(format!("{}_{}_fantasy_stats.csv", position.slug(), scoring))
    }

    /// `data/adp/{scoring}_adp.csv`
    pub fn adp_path(&self, scoring: Scoring) -> PathBuf {
        self.adp_dir().join(format!("{}_adp.csv", scoring))
    }

    /// The three normalization inputs, always in standard, half-PPR, PPR order.
    pub fn adp_input_paths(&self) -> Vec<PathBuf> {
        Scoring::ALL.iter().map(|s| self.adp_path(*s)).collect()
    }

    pub fn combined_adp_path(&self) -> PathBuf {
        self.data_dir.join("combined_transformed_adp.csv")
    }
}
