//! Theme store: system themes plus user overrides on disk.
//!
//! This module provides [`ThemeStore`], which resolves theme names against two
//! catalogs:
//!
//! 1. **System themes**: shipped with the crate ([`ThemeStore::builtin`]) or
//!    read from a directory ([`ThemeStore::from_dir`]). They are parsed once,
//!    when the store is built.
//! 2. **User themes**: `<user_dir>/<Name>.json`. They are read on every lookup,
//!    so edits made through the editor are picked up by the next reload.
//!
//! # Resolution
//!
//! [`ThemeStore::get_theme`] normalizes the name (see [`normalize_theme_name`])
//! and matches system names case-insensitively. A user file for the same name
//! is merged over the system theme: its keys replace and extend the system
//! ones. Unknown names fall back to [`DEFAULT_THEME_NAME`]. Only when the
//! default cannot be resolved either does the lookup fail with
//! [`ThemeError::NotFound`].
//!
//! # Writing
//!
//! [`write_theme`] writes to a temporary file in the destination directory
//! and then renames it over the target. Readers never observe a partially
//! written theme.
//!
//! # Example
//!
//! ```rust,ignore
//! use redesign::ThemeStore;
//!
//! let store = ThemeStore::builtin("./user_files/themes");
//! let nord = store.get_theme("nord.json")?;
//! assert_eq!(nord.name(), Some("Nord"));
//!
//! let path = store.ensure_user_theme("Nord")?;
//! ```

mod builtin;
mod name;

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use tempfile::NamedTempFile;

use crate::error::{Result, ThemeError};
use crate::theme::Theme;

pub use builtin::{tagline, BUILTIN_THEMES};
pub use name::{normalize_theme_name, strip_theme_extension, DEFAULT_THEME_NAME, THEME_EXTENSION};

/// Resolves theme names against the system catalog and the user directory.
#[derive(Debug, Clone)]
pub struct ThemeStore {
    /// System themes keyed by canonical name. Sorted, so listing is stable.
    system: BTreeMap<String, Theme>,
    /// Directory holding user-editable theme files.
    user_dir: PathBuf,
}

impl ThemeStore {
    /// Creates a store over the themes shipped with the crate.
    pub fn builtin(user_dir: impl Into<PathBuf>) -> Self {
        let mut system = BTreeMap::new();
        for (file, json) in BUILTIN_THEMES {
            let name = strip_theme_extension(file).to_string();
            match Theme::from_json(json) {
                Ok(theme) => {
                    system.insert(name.clone(), theme.with_name(name));
                }
                Err(e) => warn!("skipping shipped theme {}: {}", file, e),
            }
        }
        Self {
            system,
            user_dir: user_dir.into(),
        }
    }

    /// Creates a store from `(file name, JSON)` entries.
    ///
    /// # Errors
    ///
    /// Returns [`ThemeError::Parse`] for the first entry that is not theme JSON.
    pub fn from_entries(entries: &[(&str, &str)], user_dir: impl Into<PathBuf>) -> Result<Self> {
        let mut system = BTreeMap::new();
        for (file, json) in entries {
            let name = strip_theme_extension(file).to_string();
            let theme = Theme::from_json(json).map_err(|e| ThemeError::Parse {
                path: PathBuf::from(file),
                message: e.to_string(),
            })?;
            system.insert(name.clone(), theme.with_name(name));
        }
        Ok(Self {
            system,
            user_dir: user_dir.into(),
        })
    }

    /// Creates a store whose system themes are the `*.json` files in `system_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be read or a theme file
    /// fails to parse.
    pub fn from_dir(system_dir: impl AsRef<Path>, user_dir: impl Into<PathBuf>) -> Result<Self> {
        let mut system = BTreeMap::new();
        for path in theme_files(system_dir.as_ref())? {
            let theme = Theme::from_file(&path)?;
            if let Some(name) = theme.name().map(str::to_string) {
                system.insert(name, theme);
            }
        }
        Ok(Self {
            system,
            user_dir: user_dir.into(),
        })
    }

    /// Directory holding user theme files.
    pub fn user_dir(&self) -> &Path {
        &self.user_dir
    }

    /// Shipped theme names, sorted.
    pub fn list_system_theme_names(&self) -> Vec<String> {
        self.system.keys().cloned().collect()
    }

    /// Names of the theme files in the user directory, sorted.
    ///
    /// A missing user directory yields an empty list.
    pub fn list_user_theme_names(&self) -> Result<Vec<String>> {
        if !self.user_dir.is_dir() {
            return Ok(Vec::new());
        }
        let mut names: Vec<String> = theme_files(&self.user_dir)?
            .iter()
            .filter_map(|p| p.file_stem().and_then(|s| s.to_str()).map(str::to_string))
            .collect();
        names.sort();
        Ok(names)
    }

    /// Returns true if the name resolves to a shipped theme.
    pub fn is_system_theme(&self, name: &str) -> bool {
        self.system_key(&normalize_theme_name(Some(name))).is_some()
    }

    /// Maps a name to its canonical spelling: the system catalog's spelling
    /// when it matches case-insensitively, the normalized input otherwise.
    pub fn canonical_name(&self, name: &str) -> String {
        let name = normalize_theme_name(Some(name));
        self.system_key(&name).map(str::to_string).unwrap_or(name)
    }

    /// The name [`ThemeStore::get_theme`] settles on: the canonical spelling
    /// when a shipped or user theme has it, [`DEFAULT_THEME_NAME`] otherwise.
    pub fn resolved_name(&self, name: &str) -> String {
        let canonical = self.canonical_name(name);
        if self.system.contains_key(&canonical) || self.user_theme_path(&canonical).is_file() {
            canonical
        } else {
            DEFAULT_THEME_NAME.to_string()
        }
    }

    /// Path of the user-editable file for a theme name.
    pub fn user_theme_path(&self, name: &str) -> PathBuf {
        let canonical = self.canonical_name(name);
        self.user_dir.join(format!("{}{}", canonical, THEME_EXTENSION))
    }

    /// Returns the shipped theme, ignoring user overrides.
    ///
    /// # Errors
    ///
    /// [`ThemeError::NotFound`] if no shipped theme has this name.
    pub fn get_system_theme(&self, name: &str) -> Result<Theme> {
        let name = normalize_theme_name(Some(name));
        self.system_key(&name)
            .and_then(|key| self.system.get(key))
            .cloned()
            .ok_or_else(|| ThemeError::not_found(name))
    }

    /// Resolves a theme by name, merging any user override over the shipped theme.
    ///
    /// Falls back to [`DEFAULT_THEME_NAME`] when the name matches neither
    /// catalog.
    ///
    /// # Errors
    ///
    /// [`ThemeError::NotFound`] when neither the name nor the default
    /// resolves. I/O and parse errors from a user file are propagated.
    pub fn get_theme(&self, name: &str) -> Result<Theme> {
        let name = normalize_theme_name(Some(name));
        if let Some(theme) = self.resolve(&name)? {
            return Ok(theme);
        }
        if name != DEFAULT_THEME_NAME {
            warn!("theme '{}' not found, using '{}'", name, DEFAULT_THEME_NAME);
            if let Some(theme) = self.resolve(DEFAULT_THEME_NAME)? {
                return Ok(theme);
            }
        }
        Err(ThemeError::not_found(name))
    }

    /// Returns the path of a user-editable copy of a theme, creating it if needed.
    ///
    /// A missing copy is materialized from the resolved system theme, or from
    /// the default theme if the name is not shipped. An existing copy is
    /// returned untouched.
    pub fn ensure_user_theme(&self, name: &str) -> Result<PathBuf> {
        let canonical = self.canonical_name(name);
        let path = self.user_theme_path(&canonical);
        if path.is_file() {
            debug!("user theme already present: {}", path.display());
            return Ok(path);
        }

        let theme = match self.system.get(&canonical) {
            Some(theme) => theme.clone(),
            None => self.get_theme(&canonical)?,
        };
        std::fs::create_dir_all(&self.user_dir)?;
        write_theme(&path, &theme)?;
        debug!("materialized user theme {}", path.display());
        Ok(path)
    }

    fn system_key(&self, name: &str) -> Option<&str> {
        if let Some((key, _)) = self.system.get_key_value(name) {
            return Some(key.as_str());
        }
        self.system
            .keys()
            .find(|key| key.eq_ignore_ascii_case(name))
            .map(|key| key.as_str())
    }

    fn resolve(&self, name: &str) -> Result<Option<Theme>> {
        let canonical = self.canonical_name(name);
        let system = self.system.get(&canonical).cloned();
        let user_path = self.user_theme_path(&canonical);
        let user = if user_path.is_file() {
            debug!("loading user theme {}", user_path.display());
            Some(read_theme(&user_path)?)
        } else {
            None
        };

        Ok(match (system, user) {
            (Some(system), Some(user)) => Some(system.merge(user)),
            (Some(system), None) => Some(system),
            (None, Some(user)) => Some(user.with_name(canonical)),
            (None, None) => None,
        })
    }
}

/// Reads a theme file. The theme name is the file stem.
pub fn read_theme(path: impl AsRef<Path>) -> Result<Theme> {
    Theme::from_file(path)
}

/// Writes a theme to `path`, replacing any previous content atomically.
///
/// The JSON is written to a temporary file in the same directory, flushed,
/// and renamed over `path`.
pub fn write_theme(path: impl AsRef<Path>, theme: &Theme) -> Result<()> {
    let path = path.as_ref();
    let json = theme.to_json_pretty()?;
    write_atomic(path, format!("{}\n", json).as_bytes())
}

/// Writes `bytes` to `path` through a temporary file and rename.
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(bytes)?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|e| ThemeError::Persist {
        path: path.to_path_buf(),
        source: e.error,
    })?;
    Ok(())
}

fn theme_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let is_theme = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));
        if path.is_file() && is_theme {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
