//! Theme compiler: turns a theme into style artifacts.
//!
//! Two artifacts come out of a theme:
//!
//! - **CSS** for web surfaces ([`compile_css`]). Light and dark values are
//!   always emitted together, so the page can switch modes with a class
//!   toggle.
//! - **A flat native color map** ([`native_color_map`]). It holds each key's
//!   hex for the active mode only, because native widget palettes hold one
//!   mode at a time.
//!
//! The asymmetry is deliberate.
//!
//! Compilation tolerates partial failure. A malformed entry is skipped and
//! reported in the result's `errors`. An unparsable hex value is replaced by
//! [`FALLBACK_COLOR`] and reported. The other keys compile normally.
//!
//! ```rust
//! use redesign::compile::compile_css;
//! use redesign::{ColorEntry, Theme};
//!
//! let theme = Theme::new()
//!     .add("CANVAS", ColorEntry::new("Background", "", "#ffffff", "#202020"));
//! let compiled = compile_css(&theme, None).unwrap();
//!
//! assert!(compiled.css.contains("--canvas: #ffffff;"));
//! assert!(compiled.css.contains("--canvas: #202020;"));
//! assert!(compiled.errors.is_empty());
//! ```

mod css;

use std::collections::BTreeMap;

use log::warn;

use crate::color::{Rgba, FALLBACK_COLOR};
use crate::config::{is_safe_font_value, Config};
use crate::error::{Result, ThemeError};
use crate::theme::{ColorEntry, ColorMode, Theme};

pub use css::{Declaration, Typography};

impl Typography {
    /// Typography from config, or `None` when font customization is off.
    ///
    /// A font family that could escape the CSS rule is dropped as well.
    pub fn from_config(config: &Config) -> Option<Self> {
        if !config.font_customization_enabled {
            return None;
        }
        let family = config.font_family();
        if !is_safe_font_value(&family) {
            warn!("skipping typography, unsafe font family {:?}", family);
            return None;
        }
        Some(Self {
            family,
            size_px: config.font_size,
        })
    }
}

/// Compiled CSS plus the diagnostics collected on the way.
#[derive(Debug)]
pub struct CompiledCss {
    /// The CSS text, without a `<style>` wrapper.
    pub css: String,
    /// Declarations emitted in each of the light and dark groups.
    pub declarations: Vec<Declaration>,
    /// One [`ThemeError::MalformedThemeEntry`] or
    /// [`ThemeError::InvalidColorValue`] per problem found.
    pub errors: Vec<ThemeError>,
}

impl CompiledCss {
    /// The CSS wrapped for injection into an HTML `<head>`.
    pub fn style_tag(&self) -> String {
        style_payload(&self.css)
    }

    /// A script that appends the CSS to `document.head` of a loaded page.
    pub fn script(&self) -> String {
        script_payload(&self.css)
    }
}

/// Flat key → hex map for the active mode.
#[derive(Debug)]
pub struct NativeColorMap {
    pub mode: ColorMode,
    pub colors: BTreeMap<String, String>,
    pub errors: Vec<ThemeError>,
}

impl NativeColorMap {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.colors.get(key).map(String::as_str)
    }
}

/// Compiles the CSS for a theme.
///
/// Pass `typography` to append the font rule. Callers leave it out for
/// card-rendering surfaces and when font customization is disabled.
///
/// # Errors
///
/// Only a template failure is returned as an error. Bad entries end up in
/// [`CompiledCss::errors`].
pub fn compile_css(theme: &Theme, typography: Option<&Typography>) -> Result<CompiledCss> {
    let mut declarations = Vec::new();
    let mut errors = Vec::new();

    for (key, entry) in theme.entries() {
        match entry {
            Ok(entry) => declarations.push(Declaration {
                key: key.to_string(),
                property: entry.property_name(key),
                light: checked_hex(key, entry, ColorMode::Light, &mut errors),
                dark: checked_hex(key, entry, ColorMode::Dark, &mut errors),
            }),
            Err(err) => {
                warn!("skipping color: {}", err);
                errors.push(err);
            }
        }
    }

    let css = css::render_css(&declarations, typography)?;
    Ok(CompiledCss {
        css,
        declarations,
        errors,
    })
}

/// Projects a theme onto one mode for native palette construction.
pub fn native_color_map(theme: &Theme, mode: ColorMode) -> NativeColorMap {
    let mut colors = BTreeMap::new();
    let mut errors = Vec::new();

    for (key, entry) in theme.entries() {
        match entry {
            Ok(entry) => {
                colors.insert(key.to_string(), entry.hex(mode).to_string());
            }
            Err(err) => {
                warn!("skipping color: {}", err);
                errors.push(err);
            }
        }
    }

    NativeColorMap {
        mode,
        colors,
        errors,
    }
}

/// Wraps CSS in a `<style>` element.
pub fn style_payload(css: &str) -> String {
    format!("\n<style>\n{}</style>\n", css)
}

/// Builds a script that injects CSS into an already loaded page.
pub fn script_payload(css: &str) -> String {
    let escaped = css
        .replace('\\', "\\\\")
        .replace('`', "\\`")
        .replace("${", "\\${");
    format!(
        "const style = document.createElement(\"style\");\nstyle.innerHTML = `{}`;\ndocument.head.appendChild(style);\n",
        escaped
    )
}

fn checked_hex(key: &str, entry: &ColorEntry, mode: ColorMode, errors: &mut Vec<ThemeError>) -> String {
    let value = entry.hex(mode);
    match Rgba::parse(key, value) {
        Ok(_) => value.trim().to_string(),
        Err(err) => {
            warn!("{} ({} mode); using {}", err, mode, FALLBACK_COLOR);
            errors.push(err);
            FALLBACK_COLOR.to_hex()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Theme {
        Theme::new()
            .add("FG", ColorEntry::new("Text", "", "#111111", "#eeeeee"))
            .add("HIGHLIGHT_BG", ColorEntry::new("Sel", "", "#aaccff", "#334466"))
            .add(
                "STATE_NEW",
                ColorEntry::new("New", "", "#0000ff", "#8888ff").with_css_variable("--new-count"),
            )
    }

    fn light_block(css: &str) -> &str {
        let start = css.find("/* Light */").unwrap();
        let end = css.find("/* Dark */").unwrap();
        &css[start..end]
    }

    fn dark_block(css: &str) -> &str {
        let start = css.find("/* Dark */").unwrap();
        let end = css[start..].find("}\n").map(|i| start + i).unwrap();
        &css[start..end]
    }

    #[test]
    fn test_both_groups_always_emitted() {
        let compiled = compile_css(&sample(), None).unwrap();
        let light = light_block(&compiled.css);
        let dark = dark_block(&compiled.css);
        assert!(light.contains("--fg: #111111;"));
        assert!(dark.contains("--fg: #eeeeee;"));
        assert!(light.contains("--highlight-bg: #aaccff;"));
        assert!(dark.contains("--new-count: #8888ff;"));
    }

    #[test]
    fn test_explicit_variable_is_used_verbatim() {
        let compiled = compile_css(&sample(), None).unwrap();
        assert!(!compiled.css.contains("--state-new"));
        assert!(compiled.css.contains("--new-count: #0000ff;"));
    }

    #[test]
    fn test_malformed_entry_is_skipped_not_fatal() {
        let mut theme = sample();
        theme.insert_raw("BROKEN", json!(["only label"]));

        let compiled = compile_css(&theme, None).unwrap();
        assert_eq!(compiled.declarations.len(), 3);
        assert_eq!(compiled.errors.len(), 1);
        assert!(matches!(
            &compiled.errors[0],
            ThemeError::MalformedThemeEntry { key, .. } if key == "BROKEN"
        ));
        assert_eq!(light_block(&compiled.css).matches(": #").count(), 3);
        assert_eq!(dark_block(&compiled.css).matches(": #").count(), 3);
    }

    #[test]
    fn test_invalid_hex_falls_back_to_sentinel() {
        let theme = Theme::new().add("FG", ColorEntry::new("Text", "", "red; }", "#eeeeee"));
        let compiled = compile_css(&theme, None).unwrap();
        assert!(light_block(&compiled.css).contains("--fg: #808080;"));
        assert!(dark_block(&compiled.css).contains("--fg: #eeeeee;"));
        assert!(matches!(
            compiled.errors.as_slice(),
            [ThemeError::InvalidColorValue { .. }]
        ));
    }

    #[test]
    fn test_typography_only_when_given() {
        let config = Config {
            font: "Inter".into(),
            font_size: 17,
            font_customization_enabled: true,
            ..Config::default()
        };
        let typography = Typography::from_config(&config).unwrap();
        assert_eq!(typography.family, "Inter, sans-serif");

        let with = compile_css(&sample(), Some(&typography)).unwrap();
        assert!(with.css.contains("font-family: Inter, sans-serif;"));
        assert!(with.css.contains("font-size: 17px !important;"));

        let without = compile_css(&sample(), None).unwrap();
        assert!(!without.css.contains("font-family"));
    }

    #[test]
    fn test_typography_disabled_in_config() {
        assert_eq!(Typography::from_config(&Config::default()), None);
    }

    #[test]
    fn test_native_map_uses_active_mode_only() {
        let light = native_color_map(&sample(), ColorMode::Light);
        let dark = native_color_map(&sample(), ColorMode::Dark);
        assert_eq!(light.get("FG"), Some("#111111"));
        assert_eq!(dark.get("FG"), Some("#eeeeee"));
        assert_eq!(light.colors.len(), 3);
    }

    #[test]
    fn test_native_map_skips_malformed() {
        let mut theme = sample();
        theme.insert_raw("BROKEN", json!([1, 2, 3, 4]));
        let map = native_color_map(&theme, ColorMode::Dark);
        assert_eq!(map.colors.len(), 3);
        assert_eq!(map.errors.len(), 1);
    }

    #[test]
    fn test_style_payload_wraps() {
        let compiled = compile_css(&sample(), None).unwrap();
        let tag = compiled.style_tag();
        assert!(tag.trim_start().starts_with("<style>"));
        assert!(tag.trim_end().ends_with("</style>"));
    }

    #[test]
    fn test_script_payload_escapes_template_literal() {
        let script = script_payload("a { content: `x` ${y} }");
        assert!(script.contains("\\`x\\`"));
        assert!(script.contains("\\${y}"));
        assert!(script.ends_with("document.head.appendChild(style);\n"));
    }

    #[test]
    fn test_style_breaking_variable_name_is_malformed() {
        let theme = Theme::from_json(
            r##"{"colors": {
                "FG": ["Text", "", "#111111", "#eeeeee"],
                "EVIL": ["x", "", "#000000", "#ffffff", "--x:red}</style><script>alert(1)</script>"]
            }}"##,
        )
        .unwrap();
        let compiled = compile_css(&theme, Some(&Typography {
            family: "Arial".into(),
            size_px: 12,
        }))
        .unwrap();

        assert!(!compiled.css.contains("</style>"));
        assert!(!compiled.css.contains("<script>"));
        assert_eq!(compiled.declarations.len(), 1);
        assert!(matches!(
            &compiled.errors[..],
            [ThemeError::MalformedThemeEntry { key, reason }] if key == "EVIL" && reason.contains("CSS variable")
        ));
    }

    #[test]
    fn test_typography_skips_unsafe_family() {
        let config = Config {
            font: "Arial}</style><script>".into(),
            font_customization_enabled: true,
            ..Config::default()
        };
        assert_eq!(Typography::from_config(&config), None);
    }

}
