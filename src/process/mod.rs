// src/process/mod.rs

pub mod normalize;
pub mod raw_table;
pub mod utils;

pub use normalize::{
    normalize_all, reshape, LongAdpRecord, NormalizeError, RankError, ValueColumn, WideAdpRecord,
};
pub use raw_table::RawTable;
