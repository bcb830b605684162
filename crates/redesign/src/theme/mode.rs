//! Color mode resolution.
//!
//! The host exposes a single night-mode flag. [`get_effective_color_mode`]
//! maps it to one of exactly two [`ColorMode`]s. The mode is never cached
//! across host events: every reload of the theme context re-resolves it from
//! the host's current flag.

use std::fmt;

/// The active light/dark rendering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ColorMode {
    /// Light mode (light background, dark text).
    Light,
    /// Dark mode (dark background, light text).
    Dark,
}

impl ColorMode {
    /// Both modes, light first.
    pub const ALL: [ColorMode; 2] = [ColorMode::Light, ColorMode::Dark];

    /// Position of this mode's hex value inside a theme color tuple
    /// `[label, description, light, dark, css_variable?]`.
    pub const fn tuple_index(self) -> usize {
        match self {
            ColorMode::Light => 2,
            ColorMode::Dark => 3,
        }
    }

    /// Maps the host's night-mode flag to a mode.
    pub const fn from_night_mode(night_mode: bool) -> Self {
        if night_mode {
            ColorMode::Dark
        } else {
            ColorMode::Light
        }
    }

    pub const fn is_dark(self) -> bool {
        matches!(self, ColorMode::Dark)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            ColorMode::Light => "light",
            ColorMode::Dark => "dark",
        }
    }
}

impl fmt::Display for ColorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolves the effective color mode from the host's night-mode flag.
pub fn get_effective_color_mode(night_mode: bool) -> ColorMode {
    ColorMode::from_night_mode(night_mode)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_night_mode_maps_to_dark() {
        assert_eq!(get_effective_color_mode(true), ColorMode::Dark);
        assert_eq!(get_effective_color_mode(false), ColorMode::Light);
    }

    #[test]
    fn test_tuple_indices() {
        assert_eq!(ColorMode::Light.tuple_index(), 2);
        assert_eq!(ColorMode::Dark.tuple_index(), 3);
    }

    #[test]
    fn test_display() {
        assert_eq!(ColorMode::Dark.to_string(), "dark");
    }
}
