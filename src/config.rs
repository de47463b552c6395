//! Configuration management
//!
//! The properties-backed [`ConfigStore`], the sink it notifies when the
//! reserved `level` key changes, and the toolkit's own bootstrap settings.

pub mod level;
pub mod settings;
pub mod store;

pub use level::{GlobalLogLevel, LogLevelSink};
pub use settings::ToolkitSettings;
pub use store::{ConfigStore, LEVEL_KEY, PropertyMap};
