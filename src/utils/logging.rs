//! Logging utilities
//!
//! Provides logging setup for the command-line tool.
//!
//! The installed logger itself lets every record through; `log::max_level`
//! is the only gate, so [`GlobalLogLevel`](crate::config::GlobalLogLevel)
//! can raise or lower verbosity at runtime.

use log::LevelFilter;

/// Setup logging, starting at the `RUST_LOG` level or `info`
pub fn setup_logging() {
    let initial = env_logger::Builder::new()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .build()
        .filter();

    let logger = env_logger::Builder::new()
        .filter_level(LevelFilter::Trace)
        .build();

    if log::set_boxed_logger(Box::new(logger)).is_ok() {
        log::set_max_level(initial);
    }
}
