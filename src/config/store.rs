//! Properties-backed configuration store
//!
//! A [`ConfigStore`] loads a key/value properties file the first time it is
//! read or written, then serves every access from memory until it is told to
//! reload. Changes made with [`ConfigStore::set`] stay in memory until
//! [`ConfigStore::save`] overwrites the file.
//!
//! The store is meant to be built once per process and shared by reference
//! (or behind an `Arc`). All state sits behind one mutex, so concurrent first
//! accesses trigger a single load. The log level sink is called after that
//! mutex is released, in the same order as the map changes it reports. A
//! sink must not call back into the store.

use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::{debug, info};

use crate::config::level::{GlobalLogLevel, LogLevelSink};
use crate::config::settings::ToolkitSettings;
use crate::error::{ConfigError, PersistSource};
use crate::storage::filesystem::file_exists;

/// Reserved key forwarded to the [`LogLevelSink`].
pub const LEVEL_KEY: &str = "level";

/// In-memory property values, keyed by property name
pub type PropertyMap = HashMap<String, String>;

#[derive(Debug, Default)]
struct StoreState {
    map: Option<PropertyMap>,
    override_path: Option<PathBuf>,
}

pub struct ConfigStore {
    default_path: PathBuf,
    sink: Arc<dyn LogLevelSink>,
    state: Mutex<StoreState>,
    // Taken before `state` is released; orders sink calls like map updates.
    notify: Mutex<()>,
}

impl fmt::Debug for ConfigStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigStore")
            .field("default_path", &self.default_path)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl ConfigStore {
    /// Store backed by `default_path`, driving the global `log` level.
    pub fn new(default_path: impl Into<PathBuf>) -> Self {
        Self::with_sink(default_path, Arc::new(GlobalLogLevel))
    }

    pub fn with_sink(default_path: impl Into<PathBuf>, sink: Arc<dyn LogLevelSink>) -> Self {
        Self {
            default_path: default_path.into(),
            sink,
            state: Mutex::new(StoreState::default()),
            notify: Mutex::new(()),
        }
    }

    /// Store backed by the default configuration path of `settings`
    pub fn from_settings(settings: &ToolkitSettings) -> Self {
        Self::new(settings.default_config_path())
    }

    /// Value for `key`, loading the file first if needed. Blank values are
    /// reported as absent.
    pub fn get(&self, key: &str) -> Result<Option<String>, ConfigError> {
        let mut state = self.lock();
        let loaded_level = self.load_if_needed(&mut state)?;
        let map = state.map.as_ref().ok_or(ConfigError::Unavailable)?;
        let value = non_blank(map.get(key).map(String::as_str));
        self.forward_levels(state, [loaded_level]);
        Ok(value)
    }

    pub fn get_or_default(&self, key: &str, fallback: &str) -> Result<String, ConfigError> {
        Ok(self.get(key)?.unwrap_or_else(|| fallback.to_string()))
    }

    /// Sets `key` in memory only. Setting a non-blank `level` also forwards it
    /// to the log level sink.
    pub fn set(&self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut state = self.lock();
        let loaded_level = self.load_if_needed(&mut state)?;
        let map = state.map.as_mut().ok_or(ConfigError::Unavailable)?;
        map.insert(key.to_string(), value.to_string());

        let set_level = if key == LEVEL_KEY {
            non_blank(Some(value))
        } else {
            None
        };
        self.forward_levels(state, [loaded_level, set_level]);
        Ok(())
    }

    /// Re-reads the configuration file, discarding unsaved changes.
    ///
    /// On failure the previously loaded values, if any, stay in place.
    pub fn reload(&self) -> Result<(), ConfigError> {
        let mut state = self.lock();
        let loaded_level = self.load(&mut state)?;
        self.forward_levels(state, [loaded_level]);
        Ok(())
    }

    /// Writes every in-memory property to [`ConfigStore::config_path`],
    /// replacing the file.
    pub fn save(&self) -> Result<(), ConfigError> {
        let state = self.lock();
        let map = state.map.as_ref().ok_or(ConfigError::Unavailable)?;
        let target = self.target_path(&state);

        write_properties(&target, map)?;
        info!(
            "Saved {} property(ies) to {}",
            map.len(),
            target.display()
        );
        Ok(())
    }

    /// Uses `path` for every later load and save, then reloads.
    ///
    /// A path that does not name an existing file is still recorded: loads
    /// fall back to the default file and the next save creates it.
    pub fn set_override_path(&self, path: impl Into<PathBuf>) -> Result<(), ConfigError> {
        let path = path.into();
        info!("Configuration override path set to {}", path.display());
        let mut state = self.lock();
        state.override_path = Some(path);
        let loaded_level = self.load(&mut state)?;
        self.forward_levels(state, [loaded_level]);
        Ok(())
    }

    pub fn override_path(&self) -> Option<PathBuf> {
        self.lock().override_path.clone()
    }

    /// File that [`ConfigStore::save`] writes to.
    pub fn config_path(&self) -> PathBuf {
        self.target_path(&self.lock())
    }

    pub fn is_loaded(&self) -> bool {
        self.lock().map.is_some()
    }

    /// Drops the in-memory values; the next access reloads from disk.
    pub fn invalidate(&self) {
        self.lock().map = None;
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        // The map is only ever replaced whole, so a poisoned guard is still consistent.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn target_path(&self, state: &StoreState) -> PathBuf {
        state
            .override_path
            .clone()
            .unwrap_or_else(|| self.default_path.clone())
    }

    fn source_path(&self, state: &StoreState) -> PathBuf {
        match &state.override_path {
            Some(path) if file_exists(path) => path.clone(),
            _ => self.default_path.clone(),
        }
    }

    fn load_if_needed(&self, state: &mut StoreState) -> Result<Option<String>, ConfigError> {
        if state.map.is_some() {
            return Ok(None);
        }
        self.load(state)
    }

    /// Installs a freshly parsed map and returns the level it carries.
    fn load(&self, state: &mut StoreState) -> Result<Option<String>, ConfigError> {
        debug!("Start load");
        let source = self.source_path(state);
        let map = read_properties(&source)?;
        let level = non_blank(map.get(LEVEL_KEY).map(String::as_str));

        info!(
            "Loaded {} property(ies) from {}",
            map.len(),
            source.display()
        );
        state.map = Some(map);
        debug!("End load");
        Ok(level)
    }

    /// Releases `state` and hands each level to the sink. The notify lock is
    /// taken first, so a concurrent update cannot overtake these calls.
    fn forward_levels<const N: usize>(
        &self,
        state: MutexGuard<'_, StoreState>,
        levels: [Option<String>; N],
    ) {
        if levels.iter().all(Option::is_none) {
            return;
        }
        let _order = self.notify.lock().unwrap_or_else(PoisonError::into_inner);
        drop(state);
        for level in levels.into_iter().flatten() {
            self.sink.set_level(&level);
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .filter(|value| !value.trim().is_empty())
        .map(str::to_string)
}

fn read_properties(path: &Path) -> Result<PropertyMap, ConfigError> {
    if !file_exists(path) {
        return Err(ConfigError::ResourceMissing {
            path: path.to_path_buf(),
        });
    }

    let file = File::open(path).map_err(|source| ConfigError::Load {
        path: path.to_path_buf(),
        source,
    })?;
    java_properties::read(BufReader::new(file)).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn write_properties(path: &Path, map: &PropertyMap) -> Result<(), ConfigError> {
    let persist_error = |source: PersistSource| ConfigError::Persist {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(|e| persist_error(e.into()))?;
    let mut writer = BufWriter::new(file);
    java_properties::write(&mut writer, map).map_err(|e| persist_error(e.into()))?;
    writer.flush().map_err(|e| persist_error(e.into()))
}
