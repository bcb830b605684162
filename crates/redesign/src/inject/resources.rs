//! Stylesheet resources shipped with the add-on.
//!
//! Two families of files live under `<addon_dir>/files/`:
//!
//! | Family | Served as | Example |
//! |--------|-----------|---------|
//! | Web CSS | `/_addons/<package>/files/<Name>.css` | `/_addons/redesign/files/Reviewer.css` |
//! | Native QSS | `<addon_dir>/files/Q<Name>.css` (read from disk) | `…/files/QBrowser.css` |
//!
//! Web surfaces receive URLs because the host's web server serves add-on
//! files. Native dialogs receive file contents because widget stylesheets are
//! set as strings.

use std::fmt;
use std::path::{Path, PathBuf};

/// Directory under the add-on root holding every stylesheet.
pub const FILES_DIR: &str = "files";

/// A stylesheet file known to the injector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StylesheetResource {
    Global,
    Legacy,
    BottomBar,
    CardLayout,
    DeckBrowser,
    Editor,
    Overview,
    Reviewer,
    ReviewerBottomBar,
    TopToolbar,
    QAbout,
    QAddCards,
    QAddonsDialog,
    QBrowser,
    QEditCurrent,
    QFilteredDeckConfigDialog,
    QNewDeckStats,
    QPreferences,
}

impl StylesheetResource {
    pub const ALL: [StylesheetResource; 18] = [
        Self::Global,
        Self::Legacy,
        Self::BottomBar,
        Self::CardLayout,
        Self::DeckBrowser,
        Self::Editor,
        Self::Overview,
        Self::Reviewer,
        Self::ReviewerBottomBar,
        Self::TopToolbar,
        Self::QAbout,
        Self::QAddCards,
        Self::QAddonsDialog,
        Self::QBrowser,
        Self::QEditCurrent,
        Self::QFilteredDeckConfigDialog,
        Self::QNewDeckStats,
        Self::QPreferences,
    ];

    /// File name under [`FILES_DIR`].
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::Global => "global.css",
            Self::Legacy => "legacy.css",
            Self::BottomBar => "BottomBar.css",
            Self::CardLayout => "CardLayout.css",
            Self::DeckBrowser => "DeckBrowser.css",
            Self::Editor => "Editor.css",
            Self::Overview => "Overview.css",
            Self::Reviewer => "Reviewer.css",
            Self::ReviewerBottomBar => "ReviewerBottomBar.css",
            Self::TopToolbar => "TopToolbar.css",
            Self::QAbout => "QAbout.css",
            Self::QAddCards => "QAddCards.css",
            Self::QAddonsDialog => "QAddonsDialog.css",
            Self::QBrowser => "QBrowser.css",
            Self::QEditCurrent => "QEditCurrent.css",
            Self::QFilteredDeckConfigDialog => "QFilteredDeckConfigDialog.css",
            Self::QNewDeckStats => "QNewDeckStats.css",
            Self::QPreferences => "QPreferences.css",
        }
    }

    /// Native resources are widget stylesheets read from disk.
    pub const fn is_native(self) -> bool {
        matches!(
            self,
            Self::QAbout
                | Self::QAddCards
                | Self::QAddonsDialog
                | Self::QBrowser
                | Self::QEditCurrent
                | Self::QFilteredDeckConfigDialog
                | Self::QNewDeckStats
                | Self::QPreferences
        )
    }
}

impl fmt::Display for StylesheetResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

/// Resolves resources against one installed add-on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceTable {
    addon_package: String,
    addon_dir: PathBuf,
}

impl ResourceTable {
    pub fn new(addon_package: impl Into<String>, addon_dir: impl Into<PathBuf>) -> Self {
        Self {
            addon_package: addon_package.into(),
            addon_dir: addon_dir.into(),
        }
    }

    pub fn addon_package(&self) -> &str {
        &self.addon_package
    }

    pub fn addon_dir(&self) -> &Path {
        &self.addon_dir
    }

    /// URL of a resource as served by the host's web server.
    pub fn web_url(&self, resource: StylesheetResource) -> String {
        format!(
            "/_addons/{}/{}/{}",
            self.addon_package,
            FILES_DIR,
            resource.file_name()
        )
    }

    /// Path of a resource on disk.
    pub fn native_path(&self, resource: StylesheetResource) -> PathBuf {
        self.addon_dir.join(FILES_DIR).join(resource.file_name())
    }

    /// Web resources resolve to URLs, native ones to file paths.
    pub fn reference(&self, resource: StylesheetResource) -> String {
        if resource.is_native() {
            self.native_path(resource).display().to_string()
        } else {
            self.web_url(resource)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_web_url() {
        let table = ResourceTable::new("1234567", "/addons/1234567");
        assert_eq!(
            table.web_url(StylesheetResource::Reviewer),
            "/_addons/1234567/files/Reviewer.css"
        );
        assert_eq!(
            table.reference(StylesheetResource::Global),
            "/_addons/1234567/files/global.css"
        );
    }

    #[test]
    fn test_native_path() {
        let table = ResourceTable::new("redesign", "/addons/redesign");
        assert_eq!(
            table.native_path(StylesheetResource::QBrowser),
            Path::new("/addons/redesign/files/QBrowser.css")
        );
        assert!(table
            .reference(StylesheetResource::QAbout)
            .ends_with("QAbout.css"));
    }

    #[test]
    fn test_native_resources_are_prefixed() {
        for resource in StylesheetResource::ALL {
            assert_eq!(
                resource.is_native(),
                resource.file_name().starts_with('Q'),
                "{:?}",
                resource
            );
        }
    }
}
