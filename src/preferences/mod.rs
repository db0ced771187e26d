//! Persisted user preferences.
//!
//! Two values survive restarts: the selected ringtone (by title) and whether
//! the end alert vibrates. They are stored as JSON at
//! `<config dir>/countdown/preferences.json`.

mod error;

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::sound::ringtone::{self, Ringtone};

pub use error::PreferencesError;

fn default_ringtone_title() -> String {
    ringtone::default_ringtone().title.to_string()
}

fn default_vibration_enabled() -> bool {
    true
}

/// User preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    /// Title of the selected ringtone.
    #[serde(rename = "selectedRingtoneTitle", default = "default_ringtone_title")]
    pub selected_ringtone_title: String,

    /// Whether the end alert vibrates.
    #[serde(rename = "vibrationEnabled", default = "default_vibration_enabled")]
    pub vibration_enabled: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            selected_ringtone_title: default_ringtone_title(),
            vibration_enabled: default_vibration_enabled(),
        }
    }
}

impl Preferences {
    /// The selected ringtone, or the default one if the title matches nothing.
    #[must_use]
    pub fn selected_ringtone(&self) -> &'static Ringtone {
        ringtone::resolve(&self.selected_ringtone_title)
    }
}

/// Loads and saves [`Preferences`].
#[derive(Debug, Clone)]
pub struct PreferenceStore {
    /// Backing file; `None` keeps preferences in memory only.
    path: Option<PathBuf>,
    preferences: Preferences,
}

impl PreferenceStore {
    /// The default preferences file location.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("countdown").join("preferences.json"))
    }

    /// Creates a store that never touches the filesystem.
    #[must_use]
    pub fn in_memory(preferences: Preferences) -> Self {
        Self {
            path: None,
            preferences,
        }
    }

    /// Loads preferences from `path`. A missing file yields defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, PreferencesError> {
        let path = path.into();

        let preferences = match fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text).map_err(|source| PreferencesError::Parse {
                path: path.clone(),
                source,
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No preferences at {}, using defaults", path.display());
                Preferences::default()
            }
            Err(source) => return Err(PreferencesError::Io { path, source }),
        };

        Ok(Self {
            path: Some(path),
            preferences,
        })
    }

    /// Loads preferences, falling back to defaults (with a warning) on error.
    #[must_use]
    pub fn load_or_default(path: Option<PathBuf>) -> Self {
        let Some(path) = path else {
            warn!("No config directory, preferences will not be saved");
            return Self::in_memory(Preferences::default());
        };

        match Self::load(&path) {
            Ok(store) => store,
            Err(e) => {
                warn!("⚠️  {} ({})", e, e.suggestion());
                Self {
                    path: Some(path),
                    preferences: Preferences::default(),
                }
            }
        }
    }

    /// Current preferences.
    #[must_use]
    pub fn get(&self) -> &Preferences {
        &self.preferences
    }

    /// Backing file, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Selects a ringtone by title and saves.
    ///
    /// # Errors
    ///
    /// Returns `UnknownRingtone` if no catalog entry has this title, or an
    /// I/O error if saving fails.
    pub fn select_ringtone(&mut self, title: &str) -> Result<&'static Ringtone, PreferencesError> {
        let ringtone = ringtone::find_by_title(title)
            .ok_or_else(|| PreferencesError::UnknownRingtone(title.to_string()))?;

        self.preferences.selected_ringtone_title = ringtone.title.to_string();
        self.save()?;
        Ok(ringtone)
    }

    /// Enables or disables vibration and saves.
    ///
    /// # Errors
    ///
    /// Returns an error if saving fails.
    pub fn set_vibration_enabled(&mut self, enabled: bool) -> Result<(), PreferencesError> {
        self.preferences.vibration_enabled = enabled;
        self.save()
    }

    /// Writes preferences to the backing file, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be written.
    pub fn save(&self) -> Result<(), PreferencesError> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let io_error = |source| PreferencesError::Io {
            path: path.clone(),
            source,
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_error)?;
        }

        let json = serde_json::to_string_pretty(&self.preferences).map_err(|source| {
            PreferencesError::Parse {
                path: path.clone(),
                source,
            }
        })?;

        // Write-then-rename so a crash never leaves a truncated file.
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(io_error)?;
        fs::rename(&tmp, path).map_err(io_error)?;

        debug!("Preferences saved to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path() -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("preferences.json");
        (dir, path)
    }

    mod preferences_tests {
        use super::*;

        #[test]
        fn test_defaults() {
            let prefs = Preferences::default();
            assert_eq!(prefs.selected_ringtone_title, "Default");
            assert!(prefs.vibration_enabled);
            assert_eq!(prefs.selected_ringtone().id, "default");
        }

        #[test]
        fn test_json_keys() {
            let json = serde_json::to_string(&Preferences::default()).unwrap();
            assert!(json.contains("\"selectedRingtoneTitle\":\"Default\""));
            assert!(json.contains("\"vibrationEnabled\":true"));
        }

        #[test]
        fn test_missing_keys_use_defaults() {
            let prefs: Preferences = serde_json::from_str("{}").unwrap();
            assert_eq!(prefs, Preferences::default());
        }

        #[test]
        fn test_unknown_title_resolves_to_default() {
            let prefs = Preferences {
                selected_ringtone_title: "Removed Tone".to_string(),
                vibration_enabled: false,
            };
            assert_eq!(prefs.selected_ringtone().id, "default");
        }
    }

    mod store_tests {
        use super::*;

        #[test]
        fn test_load_missing_file_gives_defaults() {
            let (_dir, path) = temp_path();
            let store = PreferenceStore::load(&path).unwrap();
            assert_eq!(store.get(), &Preferences::default());
            assert!(!path.exists());
        }

        #[test]
        fn test_select_and_reload() {
            let (_dir, path) = temp_path();

            let mut store = PreferenceStore::load(&path).unwrap();
            let bell = store.select_ringtone("Bell").unwrap();
            assert_eq!(bell.id, "bell");
            store.set_vibration_enabled(false).unwrap();

            let reloaded = PreferenceStore::load(&path).unwrap();
            assert_eq!(reloaded.get().selected_ringtone_title, "Bell");
            assert!(!reloaded.get().vibration_enabled);
        }

        #[test]
        fn test_select_unknown_ringtone() {
            let (_dir, path) = temp_path();
            let mut store = PreferenceStore::load(&path).unwrap();

            let result = store.select_ringtone("Siren");
            assert!(matches!(result, Err(PreferencesError::UnknownRingtone(_))));
            assert_eq!(store.get().selected_ringtone_title, "Default");
        }

        #[test]
        fn test_corrupt_file() {
            let (_dir, path) = temp_path();
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, "not json").unwrap();

            let result = PreferenceStore::load(&path);
            assert!(result.unwrap_err().is_corrupt());

            let store = PreferenceStore::load_or_default(Some(path.clone()));
            assert_eq!(store.get(), &Preferences::default());
            assert_eq!(store.path(), Some(path.as_path()));
        }

        #[test]
        fn test_in_memory_save_is_noop() {
            let mut store = PreferenceStore::in_memory(Preferences::default());
            store.set_vibration_enabled(false).unwrap();
            assert!(!store.get().vibration_enabled);
            assert!(store.path().is_none());
        }
    }
}
