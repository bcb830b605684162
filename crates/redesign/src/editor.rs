//! Read/write contract of the theme editor.
//!
//! The editor works on copies: nothing touches storage until
//! [`ThemeEditor::save`]. After a save the caller reloads the pipeline so
//! the new colors reach the host.

use std::path::PathBuf;

use log::debug;

use crate::color::{Rgba, FALLBACK_COLOR};
use crate::config::{load_config, write_config, Config, ConfigStore};
use crate::error::Result;
use crate::palette::PaletteEra;
use crate::store::{normalize_theme_name, write_theme, ThemeStore};
use crate::theme::{ColorEntry, ColorMode, Theme};

/// Groups of color keys, one tab each in the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditorTab {
    General,
    Decks,
    Browse,
    Extra,
}

impl EditorTab {
    pub const ALL: [EditorTab; 4] = [Self::General, Self::Decks, Self::Browse, Self::Extra];

    /// Keys shown on this tab for a palette era.
    pub fn keys(self, era: PaletteEra) -> &'static [&'static str] {
        match (era, self) {
            (PaletteEra::Modern, Self::General) => &[
                "FG", "FG_DISABLED", "FG_FAINT", "FG_LINK", "FG_SUBTLE", "CANVAS",
                "CANVAS_CODE", "CANVAS_ELEVATED", "CANVAS_INSET", "CANVAS_OVERLAY",
            ],
            (PaletteEra::Modern, Self::Decks) => &[
                "BORDER", "BORDER_FOCUS", "BORDER_STRONG", "BORDER_SUBTLE", "BUTTON_BG",
                "BUTTON_DISABLED", "BUTTON_GRADIENT_END", "BUTTON_GRADIENT_START",
                "BUTTON_HOVER_BORDER", "BUTTON_PRIMARY_BG", "BUTTON_PRIMARY_DISABLED",
                "BUTTON_PRIMARY_GRADIENT_END", "BUTTON_PRIMARY_GRADIENT_START",
            ],
            (PaletteEra::Modern, Self::Browse) => &[
                "ACCENT_CARD", "ACCENT_DANGER", "ACCENT_NOTE", "STATE_BURIED", "STATE_LEARN",
                "STATE_MARKED", "STATE_NEW", "STATE_REVIEW", "STATE_SUSPENDED", "FLAG_1",
                "FLAG_2", "FLAG_3", "FLAG_4", "FLAG_5", "FLAG_6", "FLAG_7",
            ],
            (PaletteEra::Modern, Self::Extra) => &[
                "SCROLLBAR_BG", "SCROLLBAR_BG_ACTIVE", "SCROLLBAR_BG_HOVER", "HIGHLIGHT_BG",
                "HIGHLIGHT_FG", "SELECTED_BG", "SELECTED_FG", "SHADOW", "SHADOW_FOCUS",
                "SHADOW_INSET", "SHADOW_SUBTLE",
            ],
            (PaletteEra::Legacy, Self::General) => &[
                "TEXT_FG", "WINDOW_BG", "FRAME_BG", "BUTTON_BG", "BUTTON_FOCUS_BG",
                "TOOLTIP_BG", "BORDER", "MEDIUM_BORDER", "FAINT_BORDER", "HIGHLIGHT_BG",
                "HIGHLIGHT_FG", "LINK", "DISABLED", "SLIGHTLY_GREY_TEXT", "FOCUS_SHADOW",
            ],
            (PaletteEra::Legacy, Self::Decks) => &[
                "CURRENT_DECK", "NEW_COUNT", "LEARN_COUNT", "REVIEW_COUNT", "ZERO_COUNT",
            ],
            (PaletteEra::Legacy, Self::Browse) => &[
                "BURIED_FG", "SUSPENDED_FG", "MARKED_BG", "FLAG1_BG", "FLAG1_FG", "FLAG2_BG",
                "FLAG2_FG", "FLAG3_BG", "FLAG3_FG", "FLAG4_BG", "FLAG4_FG", "FLAG5_BG",
                "FLAG5_FG", "FLAG6_BG", "FLAG6_FG", "FLAG7_BG", "FLAG7_FG",
            ],
            (PaletteEra::Legacy, Self::Extra) => &[],
        }
    }
}

/// Working copies of config and theme colors.
#[derive(Debug, Clone)]
pub struct ThemeEditor {
    theme_name: String,
    theme: Theme,
    config: Config,
}

impl ThemeEditor {
    /// Opens the editor on the configured theme.
    ///
    /// A configured name that is not a shipped theme is replaced by the first
    /// shipped one, since only shipped themes can be picked.
    pub fn open(store: &ThemeStore, config: Config) -> Result<Self> {
        let mut theme_name = store.canonical_name(&config.theme_name);
        if !store.is_system_theme(&theme_name) {
            if let Some(first) = store.list_system_theme_names().into_iter().next() {
                theme_name = first;
            }
        }
        let theme = store.get_theme(&theme_name)?;
        Ok(Self {
            theme_name,
            theme,
            config,
        })
    }

    pub fn theme_name(&self) -> &str {
        &self.theme_name
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    /// Switches to another theme, discarding unsaved color edits.
    pub fn select_theme(&mut self, store: &ThemeStore, name: &str) -> Result<()> {
        let theme_name = store.canonical_name(&normalize_theme_name(Some(name)));
        self.theme = store.get_theme(&theme_name)?;
        self.theme_name = theme_name;
        Ok(())
    }

    /// Edits one mode of one color.
    ///
    /// # Errors
    ///
    /// [`InvalidColorValue`](crate::ThemeError::InvalidColorValue) for a bad
    /// hex value, [`UnknownColorKey`](crate::ThemeError::UnknownColorKey) or
    /// [`MalformedThemeEntry`](crate::ThemeError::MalformedThemeEntry) for a
    /// key that cannot be edited.
    pub fn set_color(&mut self, key: &str, mode: ColorMode, hex: &str) -> Result<()> {
        let color = Rgba::parse(key, hex)?;
        self.theme.set_color(key, mode, color.to_hex())
    }

    /// Replaces the working colors with the shipped ones.
    pub fn reset_colors(&mut self, store: &ThemeStore) -> Result<()> {
        self.theme = store.get_system_theme(&self.theme_name)?;
        debug!("reset colors of {}", self.theme_name);
        Ok(())
    }

    pub fn preview_color(&self, keys: &[&str], mode: ColorMode, fallback: &str) -> Rgba {
        preview_color(&self.theme, keys, mode, fallback)
    }

    /// Valid entries on a tab, in the tab's order.
    pub fn tab_entries(&self, tab: EditorTab, era: PaletteEra) -> Vec<(&'static str, &ColorEntry)> {
        tab.keys(era)
            .iter()
            .filter_map(|key| self.theme.entry(key).ok().map(|entry| (*key, entry)))
            .collect()
    }

    /// Persists config and colors. Returns the config as stored.
    ///
    /// Config goes first and is read back, so the theme is written under the
    /// name the store actually holds.
    pub fn save(&mut self, store: &ThemeStore, config_store: &mut dyn ConfigStore) -> Result<Config> {
        self.config.theme_name = normalize_theme_name(Some(&self.theme_name));
        write_config(config_store, &self.config)?;
        self.config = load_config(config_store)?;

        let path: PathBuf = store.ensure_user_theme(&self.config.theme_name)?;
        write_theme(&path, &self.theme)?;
        debug!("saved theme {} to {}", self.theme_name, path.display());
        Ok(self.config.clone())
    }
}

/// The first valid color among `keys`, else `fallback`, else the sentinel.
pub fn preview_color(theme: &Theme, keys: &[&str], mode: ColorMode, fallback: &str) -> Rgba {
    keys.iter()
        .filter_map(|key| theme.entry(key).ok().map(|entry| (key, entry)))
        .find_map(|(key, entry)| Rgba::parse(key, entry.hex(mode)).ok())
        .or_else(|| Rgba::parse("fallback", fallback).ok())
        .unwrap_or(FALLBACK_COLOR)
}
