//! Theme definitions: named palettes of semantic color roles.
//!
//! A theme file is a JSON object with a `colors` map. Each value is an
//! ordered tuple:
//!
//! ```json
//! {
//!   "colors": {
//!     "CANVAS":    ["Window background", "Main background", "#eceff4", "#2e3440"],
//!     "STATE_NEW": ["New count", "New cards", "#5e81ac", "#81a1c1", "--new-count"]
//!   }
//! }
//! ```
//!
//! Index 0 is the label and index 1 the description. Index 2 holds the light
//! hex and index 3 the dark hex. An optional fifth element names the CSS
//! variable explicitly.
//!
//! # Malformed Entries
//!
//! Entries that do not fit the tuple shape are kept as raw JSON
//! ([`ColorSlot::Malformed`]). They survive a read/write round-trip
//! unchanged. Asking for their colors returns
//! [`ThemeError::MalformedThemeEntry`], so the compiler can skip them and keep
//! going with the rest of the theme.
//!
//! # Merging
//!
//! [`Theme::merge`] layers a user override on top of a system theme. Colors
//! present in the override replace the system ones. New keys extend the
//! theme.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::mode::ColorMode;
use crate::error::{Result, ThemeError};

/// One well-formed color role: label, description, light/dark hex pair and
/// an optional explicit CSS variable name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Option<String>>", into = "Vec<String>")]
pub struct ColorEntry {
    label: String,
    description: String,
    light: String,
    dark: String,
    css_variable: Option<String>,
}

impl ColorEntry {
    /// Creates an entry whose CSS variable name is derived from its key.
    pub fn new(
        label: impl Into<String>,
        description: impl Into<String>,
        light: impl Into<String>,
        dark: impl Into<String>,
    ) -> Self {
        Self {
            label: label.into(),
            description: description.into(),
            light: light.into(),
            dark: dark.into(),
            css_variable: None,
        }
    }

    /// Sets an explicit CSS variable name, returning `self` for chaining.
    ///
    /// A name that is not a custom property (see [`is_custom_property_name`])
    /// is ignored and the derived name is used instead.
    pub fn with_css_variable(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.css_variable = is_custom_property_name(&name).then_some(name);
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// The hex value for `mode`.
    pub fn hex(&self, mode: ColorMode) -> &str {
        match mode {
            ColorMode::Light => &self.light,
            ColorMode::Dark => &self.dark,
        }
    }

    /// Replaces the hex value for `mode`, leaving the other mode untouched.
    pub fn set_hex(&mut self, mode: ColorMode, hex: impl Into<String>) {
        match mode {
            ColorMode::Light => self.light = hex.into(),
            ColorMode::Dark => self.dark = hex.into(),
        }
    }

    /// The explicit CSS variable name, if the entry carries one.
    pub fn css_variable(&self) -> Option<&str> {
        self.css_variable.as_deref()
    }

    /// The CSS property this entry is emitted as.
    ///
    /// Explicit names are used verbatim. Otherwise the key is lower-cased,
    /// underscores become hyphens, and the result is prefixed with `--`:
    /// `HIGHLIGHT_BG` becomes `--highlight-bg`.
    pub fn property_name(&self, key: &str) -> String {
        match &self.css_variable {
            Some(name) => name.clone(),
            None => derive_property_name(key),
        }
    }
}

/// True for `--` followed by ASCII letters, digits, `-` or `_`.
///
/// Explicit names land verbatim in a `<style>` element, so anything else is
/// refused.
pub fn is_custom_property_name(name: &str) -> bool {
    name.strip_prefix("--").is_some_and(|rest| {
        !rest.is_empty()
            && rest
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    })
}

/// Derives the CSS custom property name for a color key.
pub fn derive_property_name(key: &str) -> String {
    format!("--{}", key.to_lowercase().replace('_', "-"))
}

impl TryFrom<Vec<Option<String>>> for ColorEntry {
    type Error = String;

    fn try_from(items: Vec<Option<String>>) -> std::result::Result<Self, Self::Error> {
        if !(4..=5).contains(&items.len()) {
            return Err(format!("expected 4 or 5 elements, got {}", items.len()));
        }

        let mut items = items.into_iter();
        let mut required = |field: &str| {
            items
                .next()
                .flatten()
                .ok_or_else(|| format!("{} must be a string", field))
        };
        let label = required("label")?;
        let description = required("description")?;
        let light = required("light color")?;
        let dark = required("dark color")?;
        let css_variable = items.next().flatten().filter(|v| !v.trim().is_empty());
        if let Some(name) = css_variable.as_deref().filter(|v| !is_custom_property_name(v)) {
            return Err(format!("invalid CSS variable name '{}'", name));
        }

        Ok(Self {
            label,
            description,
            light,
            dark,
            css_variable,
        })
    }
}

impl From<ColorEntry> for Vec<String> {
    fn from(entry: ColorEntry) -> Self {
        let mut items = vec![entry.label, entry.description, entry.light, entry.dark];
        if let Some(name) = entry.css_variable {
            items.push(name);
        }
        items
    }
}

/// A color key's stored value: a well-formed entry, or the raw JSON of one
/// that is not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColorSlot {
    Entry(ColorEntry),
    Malformed(Value),
}

impl ColorSlot {
    /// Classifies a raw JSON value.
    pub fn from_value(value: Value) -> Self {
        match serde_json::from_value::<ColorEntry>(value.clone()) {
            Ok(entry) => ColorSlot::Entry(entry),
            Err(_) => ColorSlot::Malformed(value),
        }
    }

    /// Returns the entry, or a [`ThemeError::MalformedThemeEntry`] naming `key`.
    pub fn entry(&self, key: &str) -> Result<&ColorEntry> {
        match self {
            ColorSlot::Entry(entry) => Ok(entry),
            ColorSlot::Malformed(raw) => {
                let reason = serde_json::from_value::<ColorEntry>(raw.clone())
                    .err()
                    .map(|e| e.to_string())
                    .unwrap_or_else(|| "unrecognized entry".to_string());
                Err(ThemeError::malformed(key, reason))
            }
        }
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, ColorSlot::Malformed(_))
    }
}

impl From<ColorEntry> for ColorSlot {
    fn from(entry: ColorEntry) -> Self {
        ColorSlot::Entry(entry)
    }
}

/// A named palette of semantic color roles with light/dark hex values.
///
/// Equality compares content (colors and any extra top-level fields). The
/// name is a lookup key and does not take part.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Theme {
    #[serde(skip)]
    name: Option<String>,
    #[serde(default)]
    colors: BTreeMap<String, ColorSlot>,
    /// Top-level fields other than `colors`, preserved across round-trips.
    #[serde(flatten)]
    extra: serde_json::Map<String, Value>,
}

impl Theme {
    /// Creates an empty, unnamed theme.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty theme with the given name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Sets the name on this theme, returning `self` for chaining.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Returns the theme name, if set.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Parses theme JSON.
    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Loads a theme file. The name is the file stem.
    ///
    /// # Errors
    ///
    /// [`ThemeError::Io`] if the file cannot be read, [`ThemeError::Parse`]
    /// if it is not theme JSON.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let theme = Self::from_json(&content).map_err(|e| ThemeError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .map(|s| s.to_string());
        Ok(Self { name, ..theme })
    }

    /// Serializes to pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Number of color keys, malformed ones included.
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Color keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.colors.keys().map(|k| k.as_str())
    }

    pub fn get(&self, key: &str) -> Option<&ColorSlot> {
        self.colors.get(key)
    }

    /// Looks up a well-formed entry.
    ///
    /// # Errors
    ///
    /// [`ThemeError::UnknownColorKey`] for a missing key,
    /// [`ThemeError::MalformedThemeEntry`] for a malformed one.
    pub fn entry(&self, key: &str) -> Result<&ColorEntry> {
        self.colors
            .get(key)
            .ok_or_else(|| ThemeError::UnknownColorKey {
                key: key.to_string(),
            })?
            .entry(key)
    }

    /// Every key with its entry or the error explaining why it has none.
    pub fn entries(&self) -> impl Iterator<Item = (&str, Result<&ColorEntry>)> {
        self.colors
            .iter()
            .map(|(key, slot)| (key.as_str(), slot.entry(key)))
    }

    /// Well-formed entries only.
    pub fn valid_entries(&self) -> impl Iterator<Item = (&str, &ColorEntry)> {
        self.colors.iter().filter_map(|(key, slot)| match slot {
            ColorSlot::Entry(entry) => Some((key.as_str(), entry)),
            ColorSlot::Malformed(_) => None,
        })
    }

    /// Adds or replaces a color, returning `self` for chaining.
    pub fn add(mut self, key: &str, entry: ColorEntry) -> Self {
        self.insert(key, entry);
        self
    }

    /// Adds or replaces a color.
    pub fn insert(&mut self, key: &str, slot: impl Into<ColorSlot>) {
        self.colors.insert(key.to_string(), slot.into());
    }

    /// Adds a color from raw JSON, classifying it as well-formed or malformed.
    pub fn insert_raw(&mut self, key: &str, value: Value) {
        self.colors.insert(key.to_string(), ColorSlot::from_value(value));
    }

    /// Sets one mode's hex value for an existing, well-formed key.
    pub fn set_color(&mut self, key: &str, mode: ColorMode, hex: impl Into<String>) -> Result<()> {
        match self.colors.get_mut(key) {
            Some(ColorSlot::Entry(entry)) => {
                entry.set_hex(mode, hex);
                Ok(())
            }
            Some(slot @ ColorSlot::Malformed(_)) => Err(slot
                .entry(key)
                .err()
                .unwrap_or_else(|| ThemeError::malformed(key, "unrecognized entry"))),
            None => Err(ThemeError::UnknownColorKey {
                key: key.to_string(),
            }),
        }
    }

    /// Merges another theme into this one.
    ///
    /// Colors and extra fields from `other` take precedence. The name of
    /// `self` is kept.
    pub fn merge(mut self, other: Theme) -> Self {
        self.colors.extend(other.colors);
        self.extra.extend(other.extra);
        self
    }
}

impl PartialEq for Theme {
    fn eq(&self, other: &Self) -> bool {
        self.colors == other.colors && self.extra == other.extra
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const SAMPLE: &str = r##"{
        "colors": {
            "CANVAS": ["Window background", "Main background", "#eceff4", "#2e3440"],
            "STATE_NEW": ["New count", "New cards", "#5e81ac", "#81a1c1", "--new-count"],
            "BROKEN": ["Only a label"]
        },
        "author": "someone"
    }"##;

    #[test]
    fn test_theme_new_is_empty() {
        let theme = Theme::new();
        assert!(theme.is_empty());
        assert_eq!(theme.name(), None);
    }

    #[test]
    fn test_from_json_classifies_entries() {
        let theme = Theme::from_json(SAMPLE).unwrap();
        assert_eq!(theme.len(), 3);
        assert!(theme.entry("CANVAS").is_ok());
        assert!(theme.get("BROKEN").unwrap().is_malformed());
        assert_eq!(theme.valid_entries().count(), 2);
    }

    #[test]
    fn test_entry_errors() {
        let theme = Theme::from_json(SAMPLE).unwrap();
        assert!(matches!(
            theme.entry("BROKEN"),
            Err(ThemeError::MalformedThemeEntry { .. })
        ));
        assert!(matches!(
            theme.entry("MISSING"),
            Err(ThemeError::UnknownColorKey { .. })
        ));
    }

    #[test]
    fn test_malformed_reason_mentions_arity() {
        let theme = Theme::from_json(SAMPLE).unwrap();
        let err = theme.entry("BROKEN").unwrap_err();
        assert!(err.to_string().contains("got 1"), "got: {}", err);
    }

    #[test]
    fn test_non_string_element_is_malformed() {
        let mut theme = Theme::new();
        theme.insert_raw("FG", json!(["Text", "desc", 12, "#000"]));
        assert!(theme.get("FG").unwrap().is_malformed());
    }

    #[test]
    fn test_null_or_empty_css_variable_is_derived() {
        let mut theme = Theme::new();
        theme.insert_raw("FG_LINK", json!(["Link", "desc", "#00f", "#88f", null]));
        theme.insert_raw("FG", json!(["Text", "desc", "#000", "#fff", ""]));
        let link = theme.entry("FG_LINK").unwrap();
        assert_eq!(link.css_variable(), None);
        assert_eq!(link.property_name("FG_LINK"), "--fg-link");
        assert_eq!(theme.entry("FG").unwrap().property_name("FG"), "--fg");
    }

    #[test]
    fn test_explicit_css_variable() {
        let theme = Theme::from_json(SAMPLE).unwrap();
        let entry = theme.entry("STATE_NEW").unwrap();
        assert_eq!(entry.property_name("STATE_NEW"), "--new-count");
    }

    #[test]
    fn test_hex_by_mode() {
        let theme = Theme::from_json(SAMPLE).unwrap();
        let canvas = theme.entry("CANVAS").unwrap();
        assert_eq!(canvas.hex(ColorMode::Light), "#eceff4");
        assert_eq!(canvas.hex(ColorMode::Dark), "#2e3440");
    }

    #[test]
    fn test_json_round_trip_preserves_malformed_and_extra() {
        let theme = Theme::from_json(SAMPLE).unwrap();
        let json = theme.to_json_pretty().unwrap();
        let reparsed = Theme::from_json(&json).unwrap();
        assert_eq!(theme, reparsed);
        assert!(json.contains("\"author\""));
        assert!(json.contains("Only a label"));
    }

    #[test]
    fn test_serializes_four_elements_without_variable() {
        let theme = Theme::new().add("FG", ColorEntry::new("Text", "desc", "#000", "#fff"));
        let value: Value = serde_json::to_value(&theme).unwrap();
        assert_eq!(value["colors"]["FG"].as_array().unwrap().len(), 4);
    }

    #[test]
    fn test_set_color_changes_one_mode() {
        let mut theme = Theme::from_json(SAMPLE).unwrap();
        theme.set_color("CANVAS", ColorMode::Dark, "#000000").unwrap();
        let canvas = theme.entry("CANVAS").unwrap();
        assert_eq!(canvas.hex(ColorMode::Dark), "#000000");
        assert_eq!(canvas.hex(ColorMode::Light), "#eceff4");
    }

    #[test]
    fn test_set_color_rejects_malformed_and_missing() {
        let mut theme = Theme::from_json(SAMPLE).unwrap();
        assert!(theme.set_color("BROKEN", ColorMode::Light, "#fff").is_err());
        assert!(theme.set_color("NOPE", ColorMode::Light, "#fff").is_err());
    }

    #[test]
    fn test_merge_user_overrides_system() {
        let system = Theme::named("Nord")
            .add("FG", ColorEntry::new("Text", "desc", "#111", "#eee"))
            .add("CANVAS", ColorEntry::new("Bg", "desc", "#fff", "#000"));
        let user = Theme::new()
            .add("FG", ColorEntry::new("Text", "desc", "#222", "#ddd"))
            .add("EXTRA", ColorEntry::new("Extra", "desc", "#abc", "#cba"));

        let merged = system.merge(user);
        assert_eq!(merged.name(), Some("Nord"));
        assert_eq!(merged.len(), 3);
        assert_eq!(merged.entry("FG").unwrap().hex(ColorMode::Light), "#222");
        assert_eq!(merged.entry("CANVAS").unwrap().hex(ColorMode::Light), "#fff");
    }

    #[test]
    fn test_equality_ignores_name() {
        let a = Theme::named("A").add("FG", ColorEntry::new("T", "d", "#000", "#fff"));
        let b = Theme::named("B").add("FG", ColorEntry::new("T", "d", "#000", "#fff"));
        assert_eq!(a, b);
    }

    #[test]
    fn test_from_file_uses_stem_as_name() {
        use std::fs;
        use tempfile::TempDir;

        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("Nord.json");
        fs::write(&path, SAMPLE).unwrap();

        let theme = Theme::from_file(&path).unwrap();
        assert_eq!(theme.name(), Some("Nord"));
        assert_eq!(theme.len(), 3);
    }

    #[test]
    fn test_from_file_invalid_json() {
        use std::fs;
        use tempfile::TempDir;

        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("Bad.json");
        fs::write(&path, "{ not json").unwrap();

        assert!(matches!(
            Theme::from_file(&path),
            Err(ThemeError::Parse { .. })
        ));
    }

    #[test]
    fn test_from_file_not_found() {
        assert!(matches!(
            Theme::from_file("/nonexistent/Theme.json"),
            Err(ThemeError::Io(_))
        ));
    }

    #[test]
    fn test_css_variable_names_are_checked() {
        assert!(is_custom_property_name("--new-count"));
        assert!(is_custom_property_name("--a_b2"));
        assert!(!is_custom_property_name("--"));
        assert!(!is_custom_property_name("new-count"));
        assert!(!is_custom_property_name("--x</style>"));

        let entry = ColorEntry::new("a", "", "#000", "#fff").with_css_variable("--x;}");
        assert_eq!(entry.css_variable(), None);
        assert_eq!(entry.property_name("STATE_NEW"), "--state-new");
    }

}
