//! Diagnostic logging.
//!
//! Installs a `tracing` subscriber writing to stderr so stdout stays reserved
//! for the release summary. `RUST_LOG` takes precedence over the `-v` count.

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Map the number of `-v` flags to a level
pub fn level_for(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// Initialize the global subscriber. Later calls are no-ops.
pub fn init(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::default().add_directive(level_for(verbosity).into()));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}
