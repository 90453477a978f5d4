//! Logging initialization
//!
//! Logs go to stderr; stdout belongs to the interactive quiz and command
//! output. `RUST_LOG`, when set, replaces the verbosity-derived filter.

use crate::app::config::AppConfig;
use tracing::{debug, trace};
use tracing_subscriber::EnvFilter;

pub fn init_logging(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(config.verbose >= 2)
        .with_thread_ids(config.verbose >= 3)
        .with_line_number(config.verbose >= 3)
        .init();

    debug!("reflect started with verbosity level: {}", config.verbose);
    trace!("Full CLI args: {:?}", std::env::args().collect::<Vec<_>>());
}
