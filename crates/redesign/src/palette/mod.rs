//! Native widget palettes.
//!
//! A [`NativePalette`] is built from a single-mode [`NativeColorMap`] by the
//! host's [`PaletteEra`], then handed to the host by [`apply_palette`].
//!
//! [`NativeColorMap`]: crate::compile::NativeColorMap

mod era;

use std::collections::BTreeMap;
use std::fmt;

use log::debug;

use crate::color::Rgba;
use crate::host::Host;
use crate::theme::{ColorMode, Theme};

pub use era::PaletteEra;

/// Widget state a color applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ColorGroup {
    Active,
    Disabled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ColorRole {
    Window,
    WindowText,
    Base,
    AlternateBase,
    ToolTipBase,
    ToolTipText,
    PlaceholderText,
    Text,
    Button,
    ButtonText,
    BrightText,
    Highlight,
    HighlightedText,
    Link,
    NoRole,
}

impl fmt::Display for ColorRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Colors per group and role, plus the web view window background.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativePalette {
    colors: BTreeMap<(ColorGroup, ColorRole), Rgba>,
    window_background: Rgba,
}

impl NativePalette {
    pub fn new(window_background: Rgba) -> Self {
        Self {
            colors: BTreeMap::new(),
            window_background,
        }
    }

    pub fn set(&mut self, group: ColorGroup, role: ColorRole, color: Rgba) {
        self.colors.insert((group, role), color);
    }

    /// The color set explicitly for a group and role.
    pub fn get(&self, group: ColorGroup, role: ColorRole) -> Option<Rgba> {
        self.colors.get(&(group, role)).copied()
    }

    /// The color a widget in `group` ends up with: disabled roles that were
    /// not set explicitly inherit the active color.
    pub fn resolve(&self, group: ColorGroup, role: ColorRole) -> Option<Rgba> {
        self.get(group, role).or_else(|| match group {
            ColorGroup::Disabled => self.get(ColorGroup::Active, role),
            ColorGroup::Active => None,
        })
    }

    pub fn window_background(&self) -> Rgba {
        self.window_background
    }

    pub fn iter(&self) -> impl Iterator<Item = (ColorGroup, ColorRole, Rgba)> + '_ {
        self.colors
            .iter()
            .map(|((group, role), color)| (*group, *role, *color))
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

/// Hands a palette to the host.
///
/// The base style is restored first so the palette lands on a clean style,
/// and the host stylesheet runs last so it sees the new palette.
pub fn apply_palette(host: &mut dyn Host, palette: &NativePalette) {
    debug!("applying palette with {} roles", palette.len());
    host.reapply_base_style();
    host.set_web_background(palette.window_background());
    host.set_palette(palette);
    host.reapply_stylesheet();
}

/// Pushes every valid `(light, dark)` pair into the host's color table.
pub fn sync_host_colors(host: &mut dyn Host, theme: &Theme) {
    for (key, entry) in theme.valid_entries() {
        host.sync_host_color(key, entry.hex(ColorMode::Light), entry.hex(ColorMode::Dark));
    }
}
