//! Log level sink
//!
//! Receives the value of the reserved `level` key whenever the configuration
//! store loads or sets it.

use std::str::FromStr;

use log::{LevelFilter, info, warn};

/// Something that reacts to a new textual log level.
pub trait LogLevelSink: Send + Sync {
    fn set_level(&self, level: &str);
}

/// Applies levels to the process-wide `log` max level.
#[derive(Debug, Default, Clone, Copy)]
pub struct GlobalLogLevel;

impl LogLevelSink for GlobalLogLevel {
    fn set_level(&self, level: &str) {
        match parse_level(level) {
            Some(filter) => {
                log::set_max_level(filter);
                info!("Log level set to {}", filter);
            }
            None => warn!("Ignoring unknown log level '{}'", level),
        }
    }
}

/// Parse a level name, case-insensitive. `ALL` and `FATAL` are accepted as
/// aliases of `TRACE` and `ERROR`.
pub fn parse_level(level: &str) -> Option<LevelFilter> {
    let level = level.trim();
    if level.eq_ignore_ascii_case("all") {
        return Some(LevelFilter::Trace);
    }
    if level.eq_ignore_ascii_case("fatal") {
        return Some(LevelFilter::Error);
    }
    LevelFilter::from_str(level).ok()
}
