//! # Redesign - Theme Engine for Flashcard Host Windows
//!
//! `redesign` resolves a user-editable color theme against the host's runtime
//! state and turns it into the style artifacts the host applies: CSS for web
//! views, widget stylesheets for native dialogs, and a native color palette.
//!
//! ## Core Concepts
//!
//! - [`Theme`]: Named palette of color keys, each with a light and a dark hex value
//! - [`ColorMode`]: Light or dark, derived from the host's night-mode flag
//! - [`ThemeStore`]: Shipped themes plus user overrides on disk
//! - [`ThemeContext`]: The resolved theme, mode and config every call works from
//! - [`Pipeline`]: Reacts to host notifications and drives resolve, compile and apply
//! - [`Host`]: The seam to the host application
//!
//! ## Quick Start
//!
//! ```rust
//! use redesign::{Config, ThemeContext, ThemeStore};
//!
//! let dir = tempfile::tempdir().unwrap();
//! let store = ThemeStore::builtin(dir.path());
//!
//! let ctx = ThemeContext::resolve(&store, Config::default(), true).unwrap();
//! let compiled = ctx.compile_css(true).unwrap();
//!
//! assert!(compiled.css.contains("body.nightMode"));
//! assert!(compiled.errors.is_empty());
//! ```
//!
//! ## Driving a Host
//!
//! ```rust
//! use redesign::host::{HostVersion, MockHost};
//! use redesign::inject::{ResourceTable, WebContent};
//! use redesign::{MemoryConfigStore, Pipeline, ThemeStore};
//!
//! let dir = tempfile::tempdir().unwrap();
//! let mut host = MockHost::new(HostVersion(60)).with_night_mode(true);
//! let mut pipeline = Pipeline::new(
//!     ThemeStore::builtin(dir.path()),
//!     MemoryConfigStore::default(),
//!     ResourceTable::new("redesign", dir.path()),
//!     &host,
//! )
//! .unwrap();
//!
//! pipeline.on_startup(&mut host).unwrap();
//! assert!(host.last_palette().is_some());
//!
//! let mut content = WebContent::default();
//! pipeline
//!     .on_webview_will_set_content(&mut host, "aqt.deckbrowser.DeckBrowser", &mut content)
//!     .unwrap();
//! assert!(content.head.contains("<style>"));
//! ```
//!
//! ## Theme Files
//!
//! Themes are JSON objects with a `colors` map. Each entry is
//! `[label, description, light, dark]` with an optional fifth element naming
//! the CSS variable explicitly:
//!
//! ```json
//! {
//!   "colors": {
//!     "CANVAS": ["Window background", "", "#f5f5f5", "#2c2c2c"],
//!     "STATE_NEW": ["New", "", "#3b82f6", "#93c5fd", "--new-count"]
//!   }
//! }
//! ```

pub mod color;
pub mod compile;
pub mod config;
pub mod context;
pub mod editor;
mod error;
pub mod host;
pub mod inject;
pub mod logging;
pub mod palette;
pub mod pipeline;
pub mod prelude;
pub mod store;
pub mod theme;

// Error type
pub use error::{Result, ThemeError};

// Color and theme model
pub use color::{Rgba, FALLBACK_COLOR};
pub use theme::{get_effective_color_mode, ColorEntry, ColorMode, ColorSlot, Theme};

// Storage
pub use store::{normalize_theme_name, read_theme, write_theme, ThemeStore, DEFAULT_THEME_NAME};

// Config
pub use config::{load_config, write_config, Config, ConfigStore, JsonConfigFile, MemoryConfigStore};

// Compilation
pub use compile::{compile_css, native_color_map, CompiledCss, NativeColorMap, Typography};

// Application
pub use context::ThemeContext;
pub use editor::{preview_color, EditorTab, ThemeEditor};
pub use host::{Host, HostCapabilities, HostVersion};
pub use palette::{apply_palette, NativePalette, PaletteEra};
pub use pipeline::{Pipeline, PipelineState, Trigger};
