// src/logging.rs

use tracing_subscriber::{fmt, EnvFilter};

/// Console logging for the binaries. `RUST_LOG` wins over `default_filter`.
pub fn init(default_filter: &str) {
    let env =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_target(false)
        .init();
}
