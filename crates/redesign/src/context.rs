//! The resolved theme state every compile and apply call works from.

use log::debug;

use crate::compile::{compile_css, native_color_map, CompiledCss, NativeColorMap, Typography};
use crate::config::{load_config, Config, ConfigStore};
use crate::error::Result;
use crate::store::ThemeStore;
use crate::theme::{get_effective_color_mode, ColorMode, Theme};

/// A resolved theme, the active mode and the config it was resolved from.
///
/// Contexts are immutable. A reload builds a complete new context and the
/// caller swaps it in, so a failed reload leaves the previous one intact.
#[derive(Debug, Clone, PartialEq)]
pub struct ThemeContext {
    theme_name: String,
    theme: Theme,
    mode: ColorMode,
    config: Config,
}

impl ThemeContext {
    pub fn new(theme_name: impl Into<String>, theme: Theme, mode: ColorMode, config: Config) -> Self {
        Self {
            theme_name: theme_name.into(),
            theme,
            mode,
            config,
        }
    }

    /// Resolves the configured theme and the mode for the host's night-mode flag.
    pub fn resolve(store: &ThemeStore, config: Config, night_mode: bool) -> Result<Self> {
        let theme_name = store.resolved_name(&config.theme_name);
        let theme = store.get_theme(&theme_name)?;
        let mode = get_effective_color_mode(night_mode);
        debug!("resolved theme {} ({})", theme_name, mode);
        Ok(Self::new(theme_name, theme, mode, config))
    }

    /// Re-reads config and theme from storage.
    pub fn reload(store: &ThemeStore, config_store: &dyn ConfigStore, night_mode: bool) -> Result<Self> {
        let config = load_config(config_store)?;
        Self::resolve(store, config, night_mode)
    }

    /// The same theme in another mode.
    pub fn with_mode(mut self, mode: ColorMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn theme_name(&self) -> &str {
        &self.theme_name
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn mode(&self) -> ColorMode {
        self.mode
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Typography from config, or `None` when font customization is off.
    pub fn typography(&self) -> Option<Typography> {
        Typography::from_config(&self.config)
    }

    /// Compiles the theme's CSS. `include_typography` is still subject to
    /// the config's font customization switch.
    pub fn compile_css(&self, include_typography: bool) -> Result<CompiledCss> {
        let typography = if include_typography {
            self.typography()
        } else {
            None
        };
        compile_css(&self.theme, typography.as_ref())
    }

    /// The theme projected onto the active mode.
    pub fn native_colors(&self) -> NativeColorMap {
        native_color_map(&self.theme, self.mode)
    }
}
