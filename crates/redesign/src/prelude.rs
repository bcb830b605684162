//! Prelude for hosts embedding the engine.
//!
//! ```rust
//! use redesign::prelude::*;
//!
//! let theme = Theme::new()
//!     .add("FG", ColorEntry::new("Text", "", "#202020", "#eeeeee"));
//! assert_eq!(theme.entry("FG").unwrap().hex(ColorMode::Light), "#202020");
//! ```

pub use crate::config::{Config, ConfigStore, JsonConfigFile};
pub use crate::context::ThemeContext;
pub use crate::error::{Result, ThemeError};
pub use crate::host::{Host, HostVersion, UiState};
pub use crate::inject::{DialogKind, ResourceTable, WebContent, WebSurface};
pub use crate::pipeline::Pipeline;
pub use crate::store::ThemeStore;
pub use crate::theme::{ColorEntry, ColorMode, Theme};
