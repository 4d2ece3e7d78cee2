//! Configuration persistence for Riffmap
//!
//! The mapping lives in `key_mapping.json` as a flat object of
//! string-encoded button ids to action strings. Load is best-effort: a
//! missing or corrupt file just means no overrides. Keys and values are
//! kept as raw strings here so entries the current build cannot parse
//! (unknown button ids, bad action values) survive a load/save cycle
//! instead of being dropped.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::mapping::{default_mapping, ButtonId};
use crate::RiffmapError;

/// Default location of the mapping file, next to the executable.
pub const CONFIG_FILE: &str = "key_mapping.json";

/// Raw string-level view of the persisted mapping.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
    overrides: HashMap<String, String>,
}

impl ConfigStore {
    /// Loads overrides from `path`. A missing file or unreadable JSON is
    /// not an error; it just yields an empty override set.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();

        let overrides = match fs::read_to_string(&path) {
            Ok(text) => match serde_json::from_str::<HashMap<String, String>>(&text) {
                Ok(map) => {
                    info!("Configuration loaded from {}", path.display());
                    map
                }
                Err(e) => {
                    warn!("Could not parse {}: {} (using defaults)", path.display(), e);
                    HashMap::new()
                }
            },
            Err(_) => {
                info!("No configuration at {}, using defaults", path.display());
                HashMap::new()
            }
        };

        Self { path, overrides }
    }

    /// The user-supplied overrides, raw; merge over the built-in defaults
    /// with [`MappingTable::build`](crate::MappingTable::build).
    pub fn overrides(&self) -> &HashMap<String, String> {
        &self.overrides
    }

    /// Records a live edit from the settings surface.
    pub fn set(&mut self, button: ButtonId, raw: impl Into<String>) {
        self.overrides.insert(button.to_string(), raw.into());
    }

    /// Writes the defaults merged with the overrides back to disk, pretty
    /// printed. Unknown keys in the override set are preserved.
    pub fn save(&self) -> Result<(), RiffmapError> {
        let mut merged = default_mapping();
        for (k, v) in &self.overrides {
            merged.insert(k.clone(), v.clone());
        }

        let text = serde_json::to_string_pretty(&merged)
            .map_err(|e| RiffmapError::ConfigIo(e.to_string()))?;
        fs::write(&self.path, text).map_err(|e| {
            RiffmapError::ConfigIo(format!("{}: {}", self.path.display(), e))
        })?;
        info!("Configuration saved to {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    struct TempPath(PathBuf);

    impl TempPath {
        fn new(name: &str) -> Self {
            let path = env::temp_dir().join(format!(
                "riffmap-{}-{}.json",
                name,
                std::process::id()
            ));
            let _ = fs::remove_file(&path);
            Self(path)
        }
    }

    impl Drop for TempPath {
        fn drop(&mut self) {
            let _ = fs::remove_file(&self.0);
        }
    }

    #[test]
    fn missing_file_yields_empty_overrides() {
        let tmp = TempPath::new("missing");
        let store = ConfigStore::load(&tmp.0);
        assert!(store.overrides().is_empty());
    }

    #[test]
    fn corrupt_file_yields_empty_overrides() {
        let tmp = TempPath::new("corrupt");
        fs::write(&tmp.0, "not json at all{{").unwrap();
        let store = ConfigStore::load(&tmp.0);
        assert!(store.overrides().is_empty());
    }

    #[test]
    fn save_then_load_round_trips_edits() {
        let tmp = TempPath::new("roundtrip");
        let mut store = ConfigStore::load(&tmp.0);
        store.set(0, "Key.space");
        store.save().unwrap();

        let reloaded = ConfigStore::load(&tmp.0);
        assert_eq!(
            reloaded.overrides().get("0").map(String::as_str),
            Some("Key.space")
        );
        // Defaults are written out alongside the edit.
        assert_eq!(
            reloaded.overrides().get("13").map(String::as_str),
            Some("Key.left")
        );
    }

    #[test]
    fn unknown_keys_survive_a_save() {
        let tmp = TempPath::new("unknown");
        fs::write(&tmp.0, r#"{"99": "q", "weird": "Key.nope"}"#).unwrap();

        let store = ConfigStore::load(&tmp.0);
        store.save().unwrap();

        let reloaded = ConfigStore::load(&tmp.0);
        assert_eq!(reloaded.overrides().get("99").map(String::as_str), Some("q"));
        assert_eq!(
            reloaded.overrides().get("weird").map(String::as_str),
            Some("Key.nope")
        );
    }
}
