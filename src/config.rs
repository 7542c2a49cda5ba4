use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::runtime::{DEFAULT_TICK_RATE_MS, MIN_TICK_RATE_MS};
use crate::sample::DEFAULT_SAMPLE_PATH;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub sample_path: PathBuf,
    pub tick_rate_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sample_path: PathBuf::from(DEFAULT_SAMPLE_PATH),
            tick_rate_ms: DEFAULT_TICK_RATE_MS,
        }
    }
}

impl Config {
    /// Apply command line overrides on top of the stored settings
    pub fn with_overrides(
        mut self,
        sample_path: Option<PathBuf>,
        tick_rate_ms: Option<u64>,
    ) -> Self {
        if let Some(p) = sample_path {
            self.sample_path = p;
        }
        if let Some(ms) = tick_rate_ms {
            self.tick_rate_ms = ms;
        }
        self.clamped()
    }

    /// A zero interval would turn the idle wait into a busy loop
    fn clamped(mut self) -> Self {
        self.tick_rate_ms = self.tick_rate_ms.max(MIN_TICK_RATE_MS);
        self
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
    pub fn new() -> Self {
        let path = if let Some(pd) = ProjectDirs::from("", "", "typehub") {
            pd.config_dir().join("config.json")
        } else {
            PathBuf::from("typehub_config.json")
        };
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        if let Ok(bytes) = fs::read(&self.path) {
            match serde_json::from_slice::<Config>(&bytes) {
                Ok(cfg) => return cfg.clamped(),
                Err(e) => {
                    tracing::warn!(path = %self.path.display(), error = %e, "ignoring malformed config")
                }
            }
        }
        Config::default()
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data)
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
        let loaded = store.load();
        assert_eq!(cfg, loaded);
    }

    #[test]
    fn save_and_load_custom_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let store = FileConfigStore::with_path(&path);
        let cfg = Config {
            sample_path: PathBuf::from("/tmp/paragraph.txt"),
            tick_rate_ms: 100,
        };
        store.save(&cfg).unwrap();
        assert_eq!(store.load(), cfg);
    }

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempdir().unwrap();
        let store = FileConfigStore::with_path(dir.path().join("absent.json"));
        assert_eq!(store.load(), Config::default());
    }

    #[test]
    fn malformed_file_loads_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();
        assert_eq!(FileConfigStore::with_path(&path).load(), Config::default());
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "tick_rate_ms": 50 }"#).unwrap();

        let cfg = FileConfigStore::with_path(&path).load();
        assert_eq!(cfg.tick_rate_ms, 50);
        assert_eq!(cfg.sample_path, PathBuf::from(DEFAULT_SAMPLE_PATH));
    }

    #[test]
    fn zero_tick_rate_from_file_is_clamped() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "tick_rate_ms": 0 }"#).unwrap();

        let cfg = FileConfigStore::with_path(&path).load();
        assert_eq!(cfg.tick_rate_ms, MIN_TICK_RATE_MS);
    }

    #[cfg(unix)]
    #[test]
    fn save_reports_unserializable_path() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let store = FileConfigStore::with_path(&path);
        let cfg = Config {
            sample_path: PathBuf::from(OsStr::from_bytes(b"bad\xff.txt")),
            tick_rate_ms: 100,
        };

        assert!(store.save(&cfg).is_err());
        assert!(!path.exists());
    }

    #[test]
    fn overrides_replace_stored_values() {
        let cfg = Config::default().with_overrides(Some(PathBuf::from("other.txt")), Some(0));
        assert_eq!(cfg.sample_path, PathBuf::from("other.txt"));
        assert_eq!(cfg.tick_rate_ms, 1);

        let untouched = Config::default().with_overrides(None, None);
        assert_eq!(untouched, Config::default());
    }
}
