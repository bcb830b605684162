//! Theme name normalization.

use log::warn;

/// Theme used when a name is empty, missing, or cannot be resolved.
pub const DEFAULT_THEME_NAME: &str = "Anki";

/// Extension of theme files on disk.
pub const THEME_EXTENSION: &str = ".json";

/// Normalizes a theme name from config or user input.
///
/// Trims whitespace and strips a trailing `.json` (any case). Returns
/// [`DEFAULT_THEME_NAME`] when nothing is left, or when the name would not
/// stay a single file name inside the user directory (path separators,
/// drive prefixes, `.` or `..`). Letter case of the name itself is
/// preserved; the store matches names case-insensitively.
///
/// ```rust
/// use redesign::normalize_theme_name;
///
/// assert_eq!(normalize_theme_name(Some(" Nord.json ")), "Nord");
/// assert_eq!(normalize_theme_name(Some("")), "Anki");
/// assert_eq!(normalize_theme_name(None), "Anki");
/// assert_eq!(normalize_theme_name(Some("../../Nord")), "Anki");
/// ```
pub fn normalize_theme_name(name: Option<&str>) -> String {
    let trimmed = name.unwrap_or_default().trim();
    let stem = strip_theme_extension(trimmed).trim();
    if stem.is_empty() {
        DEFAULT_THEME_NAME.to_string()
    } else if !is_plain_file_name(stem) {
        warn!("theme name '{}' is not a plain file name, using '{}'", stem, DEFAULT_THEME_NAME);
        DEFAULT_THEME_NAME.to_string()
    } else {
        stem.to_string()
    }
}

fn is_plain_file_name(name: &str) -> bool {
    name != "." && name != ".." && !name.contains(['/', '\\', ':', '\0'])
}

/// Strips a trailing theme extension, compared case-insensitively.
pub fn strip_theme_extension(name: &str) -> &str {
    let split = name.len().saturating_sub(THEME_EXTENSION.len());
    match (name.get(..split), name.get(split..)) {
        (Some(stem), Some(ext)) if ext.eq_ignore_ascii_case(THEME_EXTENSION) => stem,
        _ => name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_whitespace_and_extension() {
        assert_eq!(normalize_theme_name(Some(" Nord.json ")), "Nord");
        assert_eq!(normalize_theme_name(Some("Sakura.JSON")), "Sakura");
        assert_eq!(normalize_theme_name(Some("My Theme .json")), "My Theme");
    }

    #[test]
    fn test_normalize_defaults() {
        assert_eq!(normalize_theme_name(None), DEFAULT_THEME_NAME);
        assert_eq!(normalize_theme_name(Some("")), DEFAULT_THEME_NAME);
        assert_eq!(normalize_theme_name(Some("   ")), DEFAULT_THEME_NAME);
        assert_eq!(normalize_theme_name(Some(".json")), DEFAULT_THEME_NAME);
    }

    #[test]
    fn test_normalize_keeps_case_and_inner_dots() {
        assert_eq!(normalize_theme_name(Some("nord")), "nord");
        assert_eq!(normalize_theme_name(Some("v1.2")), "v1.2");
    }

    #[test]
    fn test_normalize_rejects_path_like_names() {
        for name in ["../../escaped", "..", ".", "a/b", "a\\b", "C:evil", "/etc/passwd.json"] {
            assert_eq!(normalize_theme_name(Some(name)), DEFAULT_THEME_NAME, "{}", name);
        }
        assert_eq!(normalize_theme_name(Some("..Nord")), "..Nord");
    }

    #[test]
    fn test_strip_extension_multibyte_safe() {
        assert_eq!(strip_theme_extension("thème"), "thème");
        assert_eq!(strip_theme_extension("é"), "é");
    }
}
