//! Themes and color modes.
//!
//! A [`Theme`] is a named palette of semantic color keys (`FG`, `CANVAS`,
//! `HIGHLIGHT_BG`, ...). Each key carries a light and a dark hex value.
//! Unlike adaptive style systems that store a base style plus optional
//! overrides, every key here always has both values, so switching
//! [`ColorMode`] is a pure re-projection of the same data.
//!
//! ```rust
//! use redesign::{ColorEntry, ColorMode, Theme};
//!
//! let theme = Theme::named("Nord")
//!     .add("CANVAS", ColorEntry::new("Window background", "", "#eceff4", "#2e3440"));
//!
//! let canvas = theme.entry("CANVAS").unwrap();
//! assert_eq!(canvas.hex(ColorMode::Dark), "#2e3440");
//! assert_eq!(canvas.property_name("CANVAS"), "--canvas");
//! ```

mod mode;
#[allow(clippy::module_inception)]
mod theme;

pub use mode::{get_effective_color_mode, ColorMode};
pub use theme::{derive_property_name, is_custom_property_name, ColorEntry, ColorSlot, Theme};
