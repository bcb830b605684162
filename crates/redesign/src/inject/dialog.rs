//! Native dialog styling.

use std::fmt;
use std::fs;

use log::debug;

use super::resources::{ResourceTable, StylesheetResource};
use crate::context::ThemeContext;
use crate::error::Result;

/// A host dialog the add-on knows how to style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DialogKind {
    AddCards,
    AddonsDialog,
    Browser,
    EditCurrent,
    FilteredDeckConfigDialog,
    NewDeckStats,
    About,
    Preferences,
    SyncLog,
}

/// Dialog-manager names plus the class names older hosts report.
const DIALOG_NAMES: &[(&str, DialogKind)] = &[
    ("AddCards", DialogKind::AddCards),
    ("AddonsDialog", DialogKind::AddonsDialog),
    ("Browser", DialogKind::Browser),
    ("EditCurrent", DialogKind::EditCurrent),
    ("FilteredDeckConfigDialog", DialogKind::FilteredDeckConfigDialog),
    ("NewDeckStats", DialogKind::NewDeckStats),
    ("DeckStats", DialogKind::NewDeckStats),
    ("About", DialogKind::About),
    ("ClosableQDialog", DialogKind::About),
    ("Preferences", DialogKind::Preferences),
    ("sync_log", DialogKind::SyncLog),
];

impl DialogKind {
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        DIALOG_NAMES
            .iter()
            .find(|(known, _)| *known == name)
            .map(|(_, kind)| *kind)
    }

    pub const fn stylesheet(self) -> Option<StylesheetResource> {
        match self {
            Self::AddCards => Some(StylesheetResource::QAddCards),
            Self::AddonsDialog => Some(StylesheetResource::QAddonsDialog),
            Self::Browser => Some(StylesheetResource::QBrowser),
            Self::EditCurrent => Some(StylesheetResource::QEditCurrent),
            Self::FilteredDeckConfigDialog => Some(StylesheetResource::QFilteredDeckConfigDialog),
            Self::NewDeckStats => Some(StylesheetResource::QNewDeckStats),
            Self::About => Some(StylesheetResource::QAbout),
            Self::Preferences => Some(StylesheetResource::QPreferences),
            Self::SyncLog => None,
        }
    }

    /// The statistics dialog embeds a web view that is filled after load.
    pub const fn wants_script(self) -> bool {
        matches!(self, Self::NewDeckStats)
    }
}

impl fmt::Display for DialogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// What to apply to an opened dialog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DialogStyling {
    /// Widget stylesheet text.
    pub stylesheet: Option<String>,
    /// Script to evaluate in the dialog's web view.
    pub script: Option<String>,
}

impl DialogStyling {
    pub fn is_empty(&self) -> bool {
        self.stylesheet.is_none() && self.script.is_none()
    }
}

/// Loads the styling for an opened dialog.
///
/// # Errors
///
/// Returns [`ThemeError::Io`](crate::ThemeError::Io) when the dialog's
/// stylesheet cannot be read.
pub fn style_dialog(
    kind: DialogKind,
    resources: &ResourceTable,
    ctx: &ThemeContext,
) -> Result<DialogStyling> {
    debug!("styling dialog {}", kind);

    let stylesheet = match kind.stylesheet() {
        Some(resource) => Some(fs::read_to_string(resources.native_path(resource))?),
        None => None,
    };
    let script = if kind.wants_script() {
        Some(ctx.compile_css(true)?.script())
    } else {
        None
    };

    Ok(DialogStyling { stylesheet, script })
}
