use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::app_dirs::AppDirs;
use crate::words::MAX_WORD_COUNT;

/// Settings remembered between runs. Results are never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub number_of_words: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self { number_of_words: 25 }
    }
}

impl Config {
    /// Replaces out of range values with their defaults
    fn validated(self) -> Self {
        if (1..=MAX_WORD_COUNT).contains(&self.number_of_words) {
            self
        } else {
            log::warn!(
                "ignoring configured number_of_words {}, expected 1..={MAX_WORD_COUNT}",
                self.number_of_words
            );
            Config::default()
        }
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self {
            path: AppDirs::config_path(),
        }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        match fs::read(&self.path) {
            Ok(bytes) => match serde_json::from_slice::<Config>(&bytes) {
                Ok(cfg) => cfg.validated(),
                Err(err) => {
                    log::warn!("ignoring unreadable config {}: {err}", self.path.display());
                    Config::default()
                }
            },
            Err(_) => Config::default(),
        }
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data)
    }
}

/// In-memory store for tests and headless runs
#[derive(Debug, Default)]
pub struct MemoryConfigStore {
    cfg: std::cell::RefCell<Config>,
}

impl ConfigStore for MemoryConfigStore {
    fn load(&self) -> Config {
        self.cfg.borrow().clone()
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        *self.cfg.borrow_mut() = cfg.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn roundtrip_default_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let store = FileConfigStore::with_path(&path);
        let cfg = Config::default();
        store.save(&cfg).unwrap();
        assert_eq!(cfg, store.load());
    }

    #[test]
    fn save_and_load_custom_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let store = FileConfigStore::with_path(&path);
        let cfg = Config {
            number_of_words: 100,
        };
        store.save(&cfg).unwrap();
        assert_eq!(cfg, store.load());
    }

    #[test]
    fn missing_or_broken_file_falls_back_to_default() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let store = FileConfigStore::with_path(&path);
        assert_eq!(store.load(), Config::default());

        std::fs::write(&path, b"{not json").unwrap();
        assert_eq!(store.load(), Config::default());
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, br#"{}"#).unwrap();
        assert_eq!(FileConfigStore::with_path(&path).load(), Config::default());

        // fields from older versions are ignored
        std::fs::write(&path, br#"{"number_of_words": 10, "corpus": "english"}"#).unwrap();
        assert_eq!(FileConfigStore::with_path(&path).load().number_of_words, 10);
    }

    #[test]
    fn out_of_range_word_count_falls_back_to_default() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let store = FileConfigStore::with_path(&path);

        for n in [0, MAX_WORD_COUNT + 1, 100_000_000_000] {
            std::fs::write(&path, format!(r#"{{"number_of_words": {n}}}"#)).unwrap();
            assert_eq!(store.load(), Config::default(), "accepted {n}");
        }

        std::fs::write(&path, format!(r#"{{"number_of_words": {MAX_WORD_COUNT}}}"#)).unwrap();
        assert_eq!(store.load().number_of_words, MAX_WORD_COUNT);
    }

    #[test]
    fn memory_store_roundtrip() {
        let store = MemoryConfigStore::default();
        let cfg = Config { number_of_words: 5 };
        store.save(&cfg).unwrap();
        assert_eq!(store.load(), cfg);
    }
}
