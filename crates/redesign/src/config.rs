//! Add-on configuration and its lossy persistence.
//!
//! The host's config store keeps every value as a string. [`Config::to_raw`]
//! stringifies on the way out and [`Config::from_raw`] re-derives the types
//! on the way in:
//!
//! | Key | Type | Default |
//! |-----|------|---------|
//! | `font` | string | `Arial` |
//! | `fallbackFonts` | string | `sans-serif` |
//! | `font_size` | integer ≥ 1 | `14` |
//! | `font_customization_enabled` | bool | `false` |
//! | `theme_name` | normalized theme name | `Anki` |
//!
//! Font values that could end the surrounding `<style>` element or rule
//! (`<`, `>`, `{`, `}`, `;`, `\`) are replaced by their defaults.
//!
//! Booleans accept a real bool, a non-zero number, or one of the strings
//! `1`, `true`, `yes`, `on` (case-insensitive). Coercion never fails. A
//! malformed value falls back to its default.
//!
//! ```rust
//! use redesign::Config;
//!
//! let config = Config {
//!     font_size: 16,
//!     font_customization_enabled: true,
//!     ..Config::default()
//! };
//! let raw = config.to_raw();
//! assert_eq!(raw["font_size"], "16");
//!
//! let back = Config::from_raw(&raw);
//! assert_eq!(back.font_size, 16);
//! assert!(back.font_customization_enabled);
//! ```

use std::path::{Path, PathBuf};

use log::warn;
use serde_json::{Map, Value};

use crate::error::Result;
use crate::store::{normalize_theme_name, write_atomic, DEFAULT_THEME_NAME};

pub const DEFAULT_FONT: &str = "Arial";
pub const DEFAULT_FALLBACK_FONTS: &str = "sans-serif";
pub const DEFAULT_FONT_SIZE: u32 = 14;

const TRUTHY: &[&str] = &["1", "true", "yes", "on"];

/// Typed add-on configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub font: String,
    pub fallback_fonts: String,
    pub font_size: u32,
    pub font_customization_enabled: bool,
    pub theme_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            font: DEFAULT_FONT.to_string(),
            fallback_fonts: DEFAULT_FALLBACK_FONTS.to_string(),
            font_size: DEFAULT_FONT_SIZE,
            font_customization_enabled: false,
            theme_name: DEFAULT_THEME_NAME.to_string(),
        }
    }
}

impl Config {
    /// Re-derives typed config from stored values, defaulting anything malformed.
    ///
    /// The legacy `theme` key is read when `theme_name` is absent.
    pub fn from_raw(raw: &Map<String, Value>) -> Self {
        let theme_name = raw
            .get("theme_name")
            .or_else(|| raw.get("theme"))
            .and_then(Value::as_str);

        Self {
            font: coerce_font(raw.get("font"), DEFAULT_FONT),
            fallback_fonts: coerce_font(raw.get("fallbackFonts"), DEFAULT_FALLBACK_FONTS),
            font_size: coerce_font_size(raw.get("font_size")),
            font_customization_enabled: coerce_bool(raw.get("font_customization_enabled"), false),
            theme_name: normalize_theme_name(theme_name),
        }
    }

    /// Stringifies every value for the host's config store.
    pub fn to_raw(&self) -> Map<String, Value> {
        let mut raw = Map::new();
        raw.insert("font".into(), Value::String(self.font.clone()));
        raw.insert(
            "fallbackFonts".into(),
            Value::String(self.fallback_fonts.clone()),
        );
        raw.insert("font_size".into(), Value::String(self.font_size.to_string()));
        raw.insert(
            "font_customization_enabled".into(),
            Value::String(if self.font_customization_enabled {
                "True".into()
            } else {
                "False".into()
            }),
        );
        raw.insert("theme_name".into(), Value::String(self.theme_name.clone()));
        raw
    }

    /// The CSS font-family list: primary font, then the fallbacks if any.
    pub fn font_family(&self) -> String {
        let fallback = self.fallback_fonts.trim();
        if fallback.is_empty() {
            self.font.clone()
        } else {
            format!("{}, {}", self.font, fallback)
        }
    }
}

fn coerce_string(value: Option<&Value>, default: &str) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => default.to_string(),
    }
}

fn coerce_font(value: Option<&Value>, default: &str) -> String {
    let font = coerce_string(value, default);
    if is_safe_font_value(&font) {
        font
    } else {
        warn!("unsafe font value {:?}, using {}", font, default);
        default.to_string()
    }
}

/// Whether a font value can be written into a CSS rule as is.
pub(crate) fn is_safe_font_value(value: &str) -> bool {
    !value.contains(['<', '>', '{', '}', ';', '\\'])
}

fn coerce_font_size(value: Option<&Value>) -> u32 {
    let parsed = match value {
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite() && *f >= 0.0).map(|f| f as u64)),
        Some(Value::String(s)) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    match parsed.and_then(|n| u32::try_from(n).ok()).filter(|n| *n >= 1) {
        Some(size) => size,
        None => {
            if value.is_some() {
                warn!("invalid font_size {:?}, using {}", value, DEFAULT_FONT_SIZE);
            }
            DEFAULT_FONT_SIZE
        }
    }
}

fn coerce_bool(value: Option<&Value>, default: bool) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => TRUTHY.contains(&s.trim().to_lowercase().as_str()),
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        _ => default,
    }
}

/// Host-provided key/value storage for the add-on config.
pub trait ConfigStore {
    /// Reads the stored values. A store with nothing saved yields an empty map.
    fn read(&self) -> Result<Map<String, Value>>;

    /// Replaces the stored values.
    fn write(&mut self, raw: Map<String, Value>) -> Result<()>;
}

/// Loads typed config from a store.
pub fn load_config(store: &dyn ConfigStore) -> Result<Config> {
    Ok(Config::from_raw(&store.read()?))
}

/// Writes config through a read-modify-write of the store.
///
/// Keys this crate does not know are kept as they are.
pub fn write_config(store: &mut dyn ConfigStore, config: &Config) -> Result<()> {
    let mut raw = store.read()?;
    raw.extend(config.to_raw());
    store.write(raw)
}

/// Config stored as a JSON object in a file.
#[derive(Debug, Clone)]
pub struct JsonConfigFile {
    path: PathBuf,
}

impl JsonConfigFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigStore for JsonConfigFile {
    fn read(&self) -> Result<Map<String, Value>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(e.into()),
        };
        match serde_json::from_str::<Value>(&content) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => {
                warn!("config {} is not a JSON object, using defaults", self.path.display());
                Ok(Map::new())
            }
            Err(e) => {
                warn!("config {} is unreadable ({}), using defaults", self.path.display(), e);
                Ok(Map::new())
            }
        }
    }

    fn write(&mut self, raw: Map<String, Value>) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&Value::Object(raw))?;
        write_atomic(&self.path, format!("{}\n", json).as_bytes())
    }
}

/// Config held in memory, for hosts that own persistence themselves.
#[derive(Debug, Clone, Default)]
pub struct MemoryConfigStore {
    raw: Map<String, Value>,
}

impl MemoryConfigStore {
    pub fn new(raw: Map<String, Value>) -> Self {
        Self { raw }
    }

    pub fn raw(&self) -> &Map<String, Value> {
        &self.raw
    }
}

impl ConfigStore for MemoryConfigStore {
    fn read(&self) -> Result<Map<String, Value>> {
        Ok(self.raw.clone())
    }

    fn write(&mut self, raw: Map<String, Value>) -> Result<()> {
        self.raw = raw;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn raw(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_defaults_from_empty() {
        assert_eq!(Config::from_raw(&Map::new()), Config::default());
    }

    #[test]
    fn test_round_trip_through_strings() {
        let mut store = MemoryConfigStore::default();
        let config = Config {
            font_size: 16,
            font_customization_enabled: true,
            ..Config::default()
        };
        write_config(&mut store, &config).unwrap();

        assert!(store.raw().values().all(Value::is_string));
        let back = load_config(&store).unwrap();
        assert_eq!(back.font_size, 16);
        assert!(back.font_customization_enabled);
        assert_eq!(back, config);
    }

    #[test]
    fn test_truthy_strings() {
        for yes in ["1", "true", "True", " YES ", "on"] {
            let config = Config::from_raw(&raw(json!({ "font_customization_enabled": yes })));
            assert!(config.font_customization_enabled, "{:?} should be true", yes);
        }
        for no in ["0", "false", "off", "nope", ""] {
            let config = Config::from_raw(&raw(json!({ "font_customization_enabled": no })));
            assert!(!config.font_customization_enabled, "{:?} should be false", no);
        }
    }

    #[test]
    fn test_bool_from_native_types() {
        let config = Config::from_raw(&raw(json!({ "font_customization_enabled": true })));
        assert!(config.font_customization_enabled);
        let config = Config::from_raw(&raw(json!({ "font_customization_enabled": 2 })));
        assert!(config.font_customization_enabled);
        let config = Config::from_raw(&raw(json!({ "font_customization_enabled": null })));
        assert!(!config.font_customization_enabled);
    }

    #[test]
    fn test_font_size_coercion() {
        assert_eq!(Config::from_raw(&raw(json!({ "font_size": 18 }))).font_size, 18);
        assert_eq!(Config::from_raw(&raw(json!({ "font_size": " 12 " }))).font_size, 12);
        assert_eq!(Config::from_raw(&raw(json!({ "font_size": 15.0 }))).font_size, 15);
        for bad in [json!("big"), json!(0), json!(-3), json!("0"), json!([])] {
            let config = Config::from_raw(&raw(json!({ "font_size": bad })));
            assert_eq!(config.font_size, DEFAULT_FONT_SIZE);
        }
    }

    #[test]
    fn test_theme_name_normalized_and_legacy_key() {
        let config = Config::from_raw(&raw(json!({ "theme_name": " Nord.json " })));
        assert_eq!(config.theme_name, "Nord");
        let config = Config::from_raw(&raw(json!({ "theme": "Sunset.json" })));
        assert_eq!(config.theme_name, "Sunset");
        let config = Config::from_raw(&raw(json!({ "theme_name": 7 })));
        assert_eq!(config.theme_name, DEFAULT_THEME_NAME);
    }

    #[test]
    fn test_font_family() {
        let config = Config::default();
        assert_eq!(config.font_family(), "Arial, sans-serif");
        let config = Config {
            fallback_fonts: String::new(),
            ..Config::default()
        };
        assert_eq!(config.font_family(), "Arial");
    }

    #[test]
    fn test_write_config_keeps_unknown_keys() {
        let mut store = MemoryConfigStore::new(raw(json!({ "other_addon_flag": "x" })));
        write_config(&mut store, &Config::default()).unwrap();
        assert_eq!(store.raw()["other_addon_flag"], "x");
        assert_eq!(store.raw()["theme_name"], "Anki");
    }

    #[test]
    fn test_json_file_missing_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonConfigFile::new(temp_dir.path().join("config.json"));
        assert_eq!(load_config(&store).unwrap(), Config::default());
    }

    #[test]
    fn test_json_file_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = JsonConfigFile::new(temp_dir.path().join("nested/config.json"));
        let config = Config {
            font: "Inter".into(),
            font_size: 16,
            font_customization_enabled: true,
            theme_name: "Nord".into(),
            ..Config::default()
        };
        write_config(&mut store, &config).unwrap();
        assert_eq!(load_config(&store).unwrap(), config);
    }

    #[test]
    fn test_json_file_garbage_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        std::fs::write(&path, "[1, 2").unwrap();
        let store = JsonConfigFile::new(path);
        assert_eq!(load_config(&store).unwrap(), Config::default());
    }

    #[test]
    fn test_unsafe_font_values_fall_back() {
        let config = Config::from_raw(&raw(json!({
            "font": "Arial</style><script>",
            "fallbackFonts": "serif; } body { color: red",
        })));
        assert_eq!(config.font, DEFAULT_FONT);
        assert_eq!(config.fallback_fonts, DEFAULT_FALLBACK_FONTS);

        let config = Config::from_raw(&raw(json!({ "font": "'Fira Code'" })));
        assert_eq!(config.font, "'Fira Code'");
    }

}
