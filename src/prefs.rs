use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Key holding the theme preference.
pub const THEME_KEY: &str = "bbm-theme";

/// User's theme preference. `System` follows the OS setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeChoice {
    Light,
    Dark,
    #[default]
    System,
}

impl ThemeChoice {
    pub const ALL: [ThemeChoice; 3] = [ThemeChoice::Light, ThemeChoice::Dark, ThemeChoice::System];

    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeChoice::Light => "light",
            ThemeChoice::Dark => "dark",
            ThemeChoice::System => "system",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ThemeChoice::Light => "☀ Light",
            ThemeChoice::Dark => "🌙 Dark",
            ThemeChoice::System => "🖥 System",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        ThemeChoice::ALL.into_iter().find(|t| t.as_str() == s)
    }
}

// ---------------------------------------------------------------------------
// PreferenceStore – small string key/value file
// ---------------------------------------------------------------------------

/// String preferences persisted as a flat JSON object, written through on every change.
#[derive(Debug, Clone)]
pub struct PreferenceStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl PreferenceStore {
    /// Open the store at `path`. A missing file is an empty store.
    pub fn open(path: &Path) -> Result<Self> {
        let values = if path.exists() {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading preferences {}", path.display()))?;
            serde_json::from_str(&text).context("parsing preferences")?
        } else {
            BTreeMap::new()
        };
        Ok(Self {
            path: path.to_path_buf(),
            values,
        })
    }

    /// A store that starts empty but still writes to `path`.
    pub fn empty(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            values: BTreeMap::new(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        let text = serde_json::to_string_pretty(&self.values).context("encoding preferences")?;
        std::fs::write(&self.path, text)
            .with_context(|| format!("writing preferences {}", self.path.display()))
    }

    /// Stored theme, `System` when absent or unrecognised.
    pub fn theme(&self) -> ThemeChoice {
        self.get(THEME_KEY)
            .and_then(ThemeChoice::from_str)
            .unwrap_or_default()
    }

    pub fn set_theme(&mut self, theme: ThemeChoice) -> Result<()> {
        self.set(THEME_KEY, theme.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_defaults_to_system() {
        let dir = tempfile::tempdir().unwrap();
        let store = PreferenceStore::open(&dir.path().join("prefs.json")).unwrap();
        assert_eq!(store.theme(), ThemeChoice::System);
    }

    #[test]
    fn theme_is_written_through() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");

        let mut store = PreferenceStore::open(&path).unwrap();
        store.set_theme(ThemeChoice::Dark).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains(r#""bbm-theme": "dark""#));
        assert_eq!(PreferenceStore::open(&path).unwrap().theme(), ThemeChoice::Dark);
    }

    #[test]
    fn unknown_theme_value_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        std::fs::write(&path, r#"{"bbm-theme":"sepia"}"#).unwrap();
        assert_eq!(PreferenceStore::open(&path).unwrap().theme(), ThemeChoice::System);
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(PreferenceStore::open(&path).is_err());
    }

    #[test]
    fn theme_ids_are_lowercase_and_parse_back() {
        assert_eq!(ThemeChoice::System.as_str(), "system");
        assert_eq!(ThemeChoice::from_str("Dark"), None);
        for t in ThemeChoice::ALL {
            assert_eq!(ThemeChoice::from_str(t.as_str()), Some(t));
        }
    }
}
