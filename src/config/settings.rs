//! Toolkit settings
//!
//! Bootstrap settings that decide where the packaged configuration file lives
//! and which text encoding is the default. Loaded once at startup from
//! built-in defaults, an optional `my-starter.{toml,json,yaml}` file and
//! `MY_STARTER_*` environment variables, in increasing priority.

use std::path::{Path, PathBuf};

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File};
use encoding_rs::Encoding;
use serde::Deserialize;

use crate::error::ConfigError;
use crate::storage::text::encoding_for_label;

pub const DEFAULT_RESOURCES_DIR: &str = "resources";
pub const CONFIGURATION_FILENAME: &str = "config.properties";
pub const DEFAULT_ENCODING_LABEL: &str = "windows-1252";

const SETTINGS_FILE: &str = "my-starter";
const ENV_PREFIX: &str = "MY_STARTER";

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ToolkitSettings {
    /// Directory holding the packaged configuration file.
    /// Environment: MY_STARTER_RESOURCES_DIR
    pub resources_dir: String,

    /// File name of the packaged configuration file.
    /// Environment: MY_STARTER_CONFIG_FILE_NAME
    pub config_file_name: String,

    /// Encoding label used for text I/O when none is given.
    /// Environment: MY_STARTER_DEFAULT_ENCODING
    pub default_encoding: String,
}

impl Default for ToolkitSettings {
    fn default() -> Self {
        Self {
            resources_dir: DEFAULT_RESOURCES_DIR.to_string(),
            config_file_name: CONFIGURATION_FILENAME.to_string(),
            default_encoding: DEFAULT_ENCODING_LABEL.to_string(),
        }
    }
}

impl ToolkitSettings {
    /// Load settings from the working directory and the environment
    pub fn load() -> Result<Self, ConfigError> {
        Self::build(Config::builder().add_source(File::with_name(SETTINGS_FILE).required(false)))
    }

    /// Load settings from an explicit file, still honouring the environment
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        Self::build(Config::builder().add_source(File::from(path)))
    }

    fn build(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        let settings: ToolkitSettings = builder
            .set_default("resources_dir", DEFAULT_RESOURCES_DIR)?
            .set_default("config_file_name", CONFIGURATION_FILENAME)?
            .set_default("default_encoding", DEFAULT_ENCODING_LABEL)?
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .build()?
            .try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), config::ConfigError> {
        if self.config_file_name.trim().is_empty() {
            return Err(config::ConfigError::Message(
                "config_file_name cannot be empty".into(),
            ));
        }

        if encoding_for_label(&self.default_encoding).is_err() {
            return Err(config::ConfigError::Message(format!(
                "default_encoding '{}' is not a known encoding",
                self.default_encoding
            )));
        }

        Ok(())
    }

    /// Path of the packaged configuration file
    pub fn default_config_path(&self) -> PathBuf {
        Path::new(&self.resources_dir).join(&self.config_file_name)
    }

    /// Resolved default text encoding
    pub fn encoding(&self) -> Result<&'static Encoding, ConfigError> {
        encoding_for_label(&self.default_encoding).map_err(|e| {
            ConfigError::Settings(config::ConfigError::Message(e.to_string()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn default_path_sits_in_resources() {
        let settings = ToolkitSettings::default();
        assert_eq!(
            settings.default_config_path(),
            PathBuf::from("resources").join("config.properties")
        );
        assert_eq!(settings.encoding().unwrap(), encoding_rs::WINDOWS_1252);
    }

    #[test]
    fn file_values_override_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        fs::write(&path, "resources_dir = \"/srv/conf\"\n").unwrap();

        let settings = ToolkitSettings::load_from(&path).unwrap();
        assert_eq!(settings.resources_dir, "/srv/conf");
        assert_eq!(settings.config_file_name, CONFIGURATION_FILENAME);
        assert_eq!(
            settings.default_config_path(),
            PathBuf::from("/srv/conf/config.properties")
        );
    }

    #[test]
    fn unknown_encoding_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        fs::write(&path, "default_encoding = \"klingon\"\n").unwrap();

        let err = ToolkitSettings::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Settings(_)));
    }

    #[test]
    fn blank_file_name_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        fs::write(&path, "config_file_name = \"  \"\n").unwrap();

        assert!(ToolkitSettings::load_from(&path).is_err());
    }
}
