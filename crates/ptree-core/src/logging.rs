//! Structured logging setup.
//!
//! stdout is reserved for the tree; all log output goes to stderr.
//! The filter honors `PTREE_LOG`, falling back to `RUST_LOG`, and is
//! silent by default (errors only). ANSI is enabled on stderr only
//! when stderr is a terminal.

use std::io::IsTerminal;
use tracing_subscriber::EnvFilter;

/// Environment variable controlling the log filter.
pub const LOG_ENV: &str = "PTREE_LOG";

/// Initialize the logging subsystem. Call once at startup.
pub fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("error"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .init();
}
