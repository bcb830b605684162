//! Role tables for each generation of host color names.

use log::warn;

use super::{ColorGroup, ColorRole, NativePalette};
use crate::color::{Rgba, FALLBACK_COLOR};
use crate::compile::NativeColorMap;
use crate::host::HostVersion;

/// Which set of theme keys drives the native palette.
///
/// Hosts from 2.1.56 on name colors semantically (`FG`, `CANVAS`, ...).
/// Older hosts use the original names (`TEXT_FG`, `WINDOW_BG`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaletteEra {
    Modern,
    Legacy,
}

/// A declarative description of how theme keys land in palette roles.
struct RoleTable {
    /// Active-group roles and the key each one reads.
    roles: &'static [(ColorRole, &'static str)],
    /// Alpha applied to the highlight role.
    highlight_alpha: u8,
    /// Key painted into the disabled group.
    disabled: &'static str,
    /// Placeholder text also uses the disabled color.
    placeholder_is_disabled: bool,
    bright_text: Option<Rgba>,
    window_background: &'static str,
}

const DISABLED_ROLES: [ColorRole; 3] = [
    ColorRole::Text,
    ColorRole::ButtonText,
    ColorRole::HighlightedText,
];

const MODERN: RoleTable = RoleTable {
    roles: &[
        (ColorRole::WindowText, "FG"),
        (ColorRole::ToolTipText, "FG"),
        (ColorRole::Text, "FG"),
        (ColorRole::ButtonText, "FG"),
        (ColorRole::HighlightedText, "HIGHLIGHT_FG"),
        (ColorRole::Highlight, "HIGHLIGHT_BG"),
        (ColorRole::Window, "CANVAS"),
        (ColorRole::AlternateBase, "CANVAS"),
        (ColorRole::Button, "BUTTON_BG"),
        (ColorRole::Base, "CANVAS_CODE"),
        (ColorRole::ToolTipBase, "CANVAS_CODE"),
        (ColorRole::PlaceholderText, "FG_SUBTLE"),
        (ColorRole::Link, "FG_LINK"),
    ],
    highlight_alpha: 255,
    disabled: "FG_DISABLED",
    placeholder_is_disabled: false,
    bright_text: Some(Rgba::RED),
    window_background: "CANVAS",
};

const LEGACY: RoleTable = RoleTable {
    roles: &[
        (ColorRole::Window, "WINDOW_BG"),
        (ColorRole::WindowText, "TEXT_FG"),
        (ColorRole::Base, "FRAME_BG"),
        (ColorRole::AlternateBase, "WINDOW_BG"),
        (ColorRole::ToolTipBase, "TOOLTIP_BG"),
        (ColorRole::ToolTipText, "TEXT_FG"),
        (ColorRole::Text, "TEXT_FG"),
        (ColorRole::Button, "BUTTON_BG"),
        (ColorRole::ButtonText, "TEXT_FG"),
        (ColorRole::BrightText, "HIGHLIGHT_FG"),
        (ColorRole::HighlightedText, "HIGHLIGHT_FG"),
        (ColorRole::Link, "LINK"),
        (ColorRole::NoRole, "WINDOW_BG"),
        (ColorRole::Highlight, "HIGHLIGHT_BG"),
    ],
    highlight_alpha: 64,
    disabled: "DISABLED",
    placeholder_is_disabled: true,
    bright_text: None,
    window_background: "WINDOW_BG",
};

impl PaletteEra {
    pub fn for_version(version: HostVersion) -> Self {
        if version.is_modern() {
            Self::Modern
        } else {
            Self::Legacy
        }
    }

    fn table(self) -> &'static RoleTable {
        match self {
            Self::Modern => &MODERN,
            Self::Legacy => &LEGACY,
        }
    }

    /// Theme keys this era reads.
    pub fn keys(self) -> Vec<&'static str> {
        let table = self.table();
        let mut keys: Vec<&str> = table.roles.iter().map(|(_, key)| *key).collect();
        keys.push(table.disabled);
        keys.push(table.window_background);
        keys.sort_unstable();
        keys.dedup();
        keys
    }

    /// Builds the native palette from a single-mode color map.
    ///
    /// Missing keys and unparsable values become [`FALLBACK_COLOR`].
    pub fn build(self, colors: &NativeColorMap) -> NativePalette {
        let table = self.table();
        let lookup = |key: &str| match colors.get(key) {
            Some(hex) => Rgba::parse_or_fallback(key, hex),
            None => {
                warn!("palette color {} missing, using {}", key, FALLBACK_COLOR);
                FALLBACK_COLOR
            }
        };

        let mut palette = NativePalette::new(lookup(table.window_background));
        for (role, key) in table.roles {
            let color = lookup(*key);
            let color = if *role == ColorRole::Highlight {
                color.with_alpha(table.highlight_alpha)
            } else {
                color
            };
            palette.set(ColorGroup::Active, *role, color);
        }

        let disabled = lookup(table.disabled);
        if table.placeholder_is_disabled {
            palette.set(ColorGroup::Active, ColorRole::PlaceholderText, disabled);
        }
        for role in DISABLED_ROLES {
            palette.set(ColorGroup::Disabled, role, disabled);
        }
        if let Some(bright) = table.bright_text {
            palette.set(ColorGroup::Active, ColorRole::BrightText, bright);
        }
        palette
    }
}
