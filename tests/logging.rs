use log::{Level, log_enabled};

use my_starter::config::{GlobalLogLevel, LogLevelSink};
use my_starter::utils::logging::setup_logging;

// Single test: the logger is process-wide.
#[test]
fn level_sink_drives_installed_logger() {
    setup_logging();

    GlobalLogLevel.set_level("WARN");
    assert!(log_enabled!(Level::Warn));
    assert!(!log_enabled!(Level::Info));

    GlobalLogLevel.set_level("DEBUG");
    assert!(log_enabled!(Level::Debug));
    assert!(!log_enabled!(Level::Trace));

    GlobalLogLevel.set_level("TRACE");
    assert!(log_enabled!(Level::Trace));
}
