pub mod config;
pub mod fetch;
pub mod logging;
pub mod pipeline;
pub mod process;
pub mod sink;

pub use config::{Config, Position, Scoring};
