use std::{
    collections::BTreeMap,
    fs, io,
    path::{Path, PathBuf},
    sync::{Mutex, PoisonError},
};

use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

pub const THEME_KEY: &str = "theme";

#[derive(Debug, Error)]
pub enum PreferenceError {
    #[error("failed to access preference file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("preference file {path} is not a JSON object of strings: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Get/set of single string keys that outlive the process.
pub trait PreferenceStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, PreferenceError>;
    fn set(&self, key: &str, value: &str) -> Result<(), PreferenceError>;
}

/// Preferences kept as one JSON object on disk.
#[derive(Debug, Clone)]
pub struct FilePreferences {
    path: PathBuf,
}

impl FilePreferences {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: io::Error) -> PreferenceError {
        PreferenceError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, PreferenceError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(err) => return Err(self.io_error(err)),
        };
        if raw.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        serde_json::from_str(&raw).map_err(|source| PreferenceError::Malformed {
            path: self.path.clone(),
            source,
        })
    }
}

impl PreferenceStore for FilePreferences {
    fn get(&self, key: &str) -> Result<Option<String>, PreferenceError> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PreferenceError> {
        // A corrupt file is replaced rather than blocking every later write.
        let mut values = self.read_all().unwrap_or_default();
        values.insert(key.to_owned(), value.to_owned());

        if let Some(parent) = self
            .path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
        {
            fs::create_dir_all(parent).map_err(|err| self.io_error(err))?;
        }
        let body = serde_json::to_string_pretty(&values).map_err(|source| {
            PreferenceError::Malformed {
                path: self.path.clone(),
                source,
            }
        })?;
        fs::write(&self.path, body).map_err(|err| self.io_error(err))
    }
}

#[derive(Debug, Default)]
pub struct MemoryPreferences {
    values: Mutex<BTreeMap<String, String>>,
}

impl MemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferences {
    fn get(&self, key: &str) -> Result<Option<String>, PreferenceError> {
        let values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PreferenceError> {
        let mut values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        values.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    Dark,
    Light,
}

impl Theme {
    pub fn from_is_dark(is_dark: bool) -> Self {
        if is_dark {
            Self::Dark
        } else {
            Self::Light
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ThemeView {
    pub is_dark: bool,
    pub theme: Theme,
}

impl ThemeView {
    fn new(is_dark: bool) -> Self {
        Self {
            is_dark,
            theme: Theme::from_is_dark(is_dark),
        }
    }
}

/// Process-wide dark/light flag, persisted on every change.
pub struct ThemeStore {
    prefs: Box<dyn PreferenceStore>,
    is_dark: Mutex<bool>,
}

impl std::fmt::Debug for ThemeStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThemeStore")
            .field("theme", &self.get_theme().theme)
            .finish_non_exhaustive()
    }
}

impl ThemeStore {
    /// Loads the saved theme; anything other than an explicit `"light"` is dark.
    pub fn open(prefs: impl PreferenceStore + 'static) -> Self {
        let is_dark = match prefs.get(THEME_KEY) {
            Ok(Some(value)) => value != Theme::Light.as_str(),
            Ok(None) => true,
            Err(err) => {
                warn!(error = %err, "could not read theme preference, defaulting to dark");
                true
            }
        };

        Self {
            prefs: Box::new(prefs),
            is_dark: Mutex::new(is_dark),
        }
    }

    pub fn get_theme(&self) -> ThemeView {
        ThemeView::new(*self.is_dark.lock().unwrap_or_else(PoisonError::into_inner))
    }

    /// Flips the theme and persists it. A failed write is logged; the
    /// in-memory value still changes. Blocks on the preference write.
    pub fn toggle_theme(&self) -> ThemeView {
        let mut is_dark = self.is_dark.lock().unwrap_or_else(PoisonError::into_inner);
        *is_dark = !*is_dark;
        let view = ThemeView::new(*is_dark);

        match self.prefs.set(THEME_KEY, view.theme.as_str()) {
            Ok(()) => info!(theme = view.theme.as_str(), "theme toggled"),
            Err(err) => warn!(error = %err, "could not persist theme preference"),
        }
        view
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    struct SharedPrefs(Arc<MemoryPreferences>);

    impl PreferenceStore for SharedPrefs {
        fn get(&self, key: &str) -> Result<Option<String>, PreferenceError> {
            self.0.get(key)
        }

        fn set(&self, key: &str, value: &str) -> Result<(), PreferenceError> {
            self.0.set(key, value)
        }
    }

    struct BrokenPrefs;

    impl PreferenceStore for BrokenPrefs {
        fn get(&self, _key: &str) -> Result<Option<String>, PreferenceError> {
            Err(PreferenceError::Io {
                path: PathBuf::from("/nowhere"),
                source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
            })
        }

        fn set(&self, key: &str, _value: &str) -> Result<(), PreferenceError> {
            self.get(key).map(|_| ())
        }
    }

    #[test]
    fn defaults_to_dark_without_saved_value() {
        let store = ThemeStore::open(MemoryPreferences::new());

        assert_eq!(
            store.get_theme(),
            ThemeView {
                is_dark: true,
                theme: Theme::Dark
            }
        );
    }

    #[test]
    fn reads_saved_light_theme() {
        let prefs = MemoryPreferences::new();
        prefs.set(THEME_KEY, "light").unwrap();

        let store = ThemeStore::open(prefs);

        assert!(!store.get_theme().is_dark);
    }

    #[test]
    fn toggle_persists_new_value() {
        let prefs = Arc::new(MemoryPreferences::new());
        let store = ThemeStore::open(SharedPrefs(Arc::clone(&prefs)));

        let view = store.toggle_theme();

        assert_eq!(view.theme, Theme::Light);
        assert_eq!(prefs.get(THEME_KEY).unwrap().as_deref(), Some("light"));
    }

    #[test]
    fn toggling_twice_restores_original_persisted_value() {
        let prefs = Arc::new(MemoryPreferences::new());
        prefs.set(THEME_KEY, "dark").unwrap();
        let store = ThemeStore::open(SharedPrefs(Arc::clone(&prefs)));

        store.toggle_theme();
        store.toggle_theme();

        assert_eq!(prefs.get(THEME_KEY).unwrap().as_deref(), Some("dark"));
        assert!(store.get_theme().is_dark);
    }

    #[test]
    fn broken_storage_never_surfaces_an_error() {
        let store = ThemeStore::open(BrokenPrefs);

        assert!(store.get_theme().is_dark);
        assert!(!store.toggle_theme().is_dark);
    }

    #[test]
    fn file_preferences_round_trip_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("preferences.json");

        let store = ThemeStore::open(FilePreferences::new(&path));
        let toggled = store.toggle_theme();
        let reopened = ThemeStore::open(FilePreferences::new(&path));

        assert_eq!(reopened.get_theme(), toggled);
        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains(r#""theme": "light""#));
    }

    #[test]
    fn file_preferences_keep_unrelated_keys() {
        let dir = tempfile::tempdir().unwrap();
        let prefs = FilePreferences::new(dir.path().join("preferences.json"));
        prefs.set("layout", "compact").unwrap();

        prefs.set(THEME_KEY, "light").unwrap();

        assert_eq!(prefs.get("layout").unwrap().as_deref(), Some("compact"));
        assert_eq!(prefs.get(THEME_KEY).unwrap().as_deref(), Some("light"));
    }

    #[test]
    fn malformed_file_is_reported_and_theme_defaults_to_dark() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preferences.json");
        fs::write(&path, "not json").unwrap();
        let prefs = FilePreferences::new(&path);

        assert!(matches!(
            prefs.get(THEME_KEY),
            Err(PreferenceError::Malformed { .. })
        ));
        assert!(ThemeStore::open(prefs).get_theme().is_dark);
    }
}
