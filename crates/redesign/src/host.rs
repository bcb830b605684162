//! The host application seam.
//!
//! Everything the engine does to windows goes through [`Host`]. The engine
//! never reaches into host internals, so a host build only has to implement
//! this trait. [`MockHost`] records every call and is what the tests and the
//! CLI's dry runs use.
//!
//! Host feature detection happens once, in [`HostCapabilities::detect`],
//! instead of probing for hooks at each call site.

use std::fmt;

use crate::color::Rgba;
use crate::inject::DialogKind;
use crate::palette::{NativePalette, PaletteEra};

/// Fixed height of the top toolbar web view, in pixels.
pub const TOOLBAR_HEIGHT: u32 = 45;

/// Hook names probed by [`HostCapabilities::detect`].
pub mod hooks {
    pub const DIALOG_MANAGER_DID_OPEN_DIALOG: &str = "dialog_manager_did_open_dialog";
    pub const MAIN_WINDOW_DID_INIT: &str = "main_window_did_init";
    pub const TOP_TOOLBAR_DID_INIT_LINKS: &str = "top_toolbar_did_init_links";
}

/// The host's point version, e.g. `56` for 2.1.56.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HostVersion(pub u32);

impl HostVersion {
    /// First point version with the semantic color names and the newer toolkit.
    pub const MODERN: HostVersion = HostVersion(56);

    pub fn is_modern(self) -> bool {
        self >= Self::MODERN
    }
}

impl fmt::Display for HostVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "2.1.{}", self.0)
    }
}

/// What the main window is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiState {
    Review,
    Overview,
    DeckBrowser,
    Other,
}

impl UiState {
    /// Maps the host's state string (`"review"`, `"overview"`, `"deckBrowser"`).
    pub fn from_state_name(name: &str) -> Self {
        match name {
            "review" => Self::Review,
            "overview" => Self::Overview,
            "deckBrowser" => Self::DeckBrowser,
            _ => Self::Other,
        }
    }
}

/// How opened dialogs are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogHooks {
    /// A single dialog-manager notification carrying the dialog name.
    Manager,
    /// Per-dialog notifications reporting class names.
    Legacy,
}

impl DialogHooks {
    /// Whether opening a dialog of this kind is reported at all.
    ///
    /// Legacy hosts only report dialogs set up through the main window's
    /// dialog bookkeeping plus the add-ons and browser windows.
    pub fn reports(self, kind: DialogKind) -> bool {
        match self {
            Self::Manager => true,
            Self::Legacy => matches!(
                kind,
                DialogKind::AddCards
                    | DialogKind::EditCurrent
                    | DialogKind::NewDeckStats
                    | DialogKind::About
                    | DialogKind::AddonsDialog
                    | DialogKind::Browser
            ),
        }
    }

    /// Whether a dialog's web view can be scripted once it has opened.
    pub fn runs_scripts(self) -> bool {
        self == Self::Manager
    }
}

/// How toolbar initialization is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarHooks {
    MainWindowInit,
    /// The toolbar height has to be enforced whenever its links are built.
    TopToolbarLinks,
    None,
}

/// Host features, detected once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostCapabilities {
    pub version: HostVersion,
    pub palette_era: PaletteEra,
    pub dialog_hooks: DialogHooks,
    pub toolbar_hooks: ToolbarHooks,
}

impl HostCapabilities {
    /// Derives capabilities from the point version and the registered hook names.
    pub fn detect<S: AsRef<str>>(version: HostVersion, hooks: &[S]) -> Self {
        let has = |name: &str| hooks.iter().any(|hook| hook.as_ref() == name);

        let dialog_hooks = if has(hooks::DIALOG_MANAGER_DID_OPEN_DIALOG) {
            DialogHooks::Manager
        } else {
            DialogHooks::Legacy
        };
        let toolbar_hooks = if has(hooks::MAIN_WINDOW_DID_INIT) {
            ToolbarHooks::MainWindowInit
        } else if has(hooks::TOP_TOOLBAR_DID_INIT_LINKS) {
            ToolbarHooks::TopToolbarLinks
        } else {
            ToolbarHooks::None
        };

        Self {
            version,
            palette_era: PaletteEra::for_version(version),
            dialog_hooks,
            toolbar_hooks,
        }
    }

    /// Capabilities of the host a [`Host`] reports.
    pub fn of(host: &dyn Host) -> Self {
        Self::detect(host.point_version(), &host.available_hooks())
    }
}

/// Operations the engine needs from the host application.
pub trait Host {
    fn night_mode(&self) -> bool;
    fn point_version(&self) -> HostVersion;
    fn ui_state(&self) -> UiState;
    /// Names of the notification hooks this host build offers.
    fn available_hooks(&self) -> Vec<String>;

    /// Restores the host's default widget style before a new palette lands.
    fn reapply_base_style(&mut self);
    fn set_web_background(&mut self, color: Rgba);
    fn set_palette(&mut self, palette: &NativePalette);
    /// Re-runs the host's own stylesheet pass over the new palette.
    fn reapply_stylesheet(&mut self);
    /// Updates the host's color table so host-drawn widgets match the theme.
    fn sync_host_color(&mut self, key: &str, light: &str, dark: &str);

    fn set_dialog_stylesheet(&mut self, dialog: DialogKind, stylesheet: &str);
    fn eval_dialog_script(&mut self, dialog: DialogKind, script: &str);

    fn set_toolbar_height(&mut self, height: u32);
    fn redraw_toolbar(&mut self);
    fn reinit_reviewer(&mut self);
    fn refresh_overview(&mut self);
    fn show_deck_browser(&mut self);
    fn refit_bottom_bar(&mut self);
}

/// A call recorded by [`MockHost`].
#[derive(Debug, Clone, PartialEq)]
pub enum HostCall {
    ReapplyBaseStyle,
    SetWebBackground(Rgba),
    SetPalette(NativePalette),
    ReapplyStylesheet,
    SyncHostColor {
        key: String,
        light: String,
        dark: String,
    },
    SetDialogStylesheet(DialogKind, String),
    EvalDialogScript(DialogKind, String),
    SetToolbarHeight(u32),
    RedrawToolbar,
    ReinitReviewer,
    RefreshOverview,
    ShowDeckBrowser,
    RefitBottomBar,
}

/// A host that records calls instead of touching any UI.
#[derive(Debug, Clone)]
pub struct MockHost {
    pub night_mode: bool,
    pub version: HostVersion,
    pub ui_state: UiState,
    pub hooks: Vec<String>,
    pub calls: Vec<HostCall>,
}

impl Default for MockHost {
    fn default() -> Self {
        Self::new(HostVersion::MODERN)
    }
}

impl MockHost {
    /// A host of the given version offering every known hook.
    pub fn new(version: HostVersion) -> Self {
        Self {
            night_mode: false,
            version,
            ui_state: UiState::Other,
            hooks: [
                hooks::DIALOG_MANAGER_DID_OPEN_DIALOG,
                hooks::MAIN_WINDOW_DID_INIT,
            ]
            .iter()
            .map(|hook| hook.to_string())
            .collect(),
            calls: Vec::new(),
        }
    }

    pub fn with_night_mode(mut self, night_mode: bool) -> Self {
        self.night_mode = night_mode;
        self
    }

    pub fn with_ui_state(mut self, ui_state: UiState) -> Self {
        self.ui_state = ui_state;
        self
    }

    pub fn with_hooks(mut self, hooks: &[&str]) -> Self {
        self.hooks = hooks.iter().map(|hook| hook.to_string()).collect();
        self
    }

    /// Returns and clears the recorded calls.
    pub fn take_calls(&mut self) -> Vec<HostCall> {
        std::mem::take(&mut self.calls)
    }

    /// The last palette handed to the host.
    pub fn last_palette(&self) -> Option<&NativePalette> {
        self.calls.iter().rev().find_map(|call| match call {
            HostCall::SetPalette(palette) => Some(palette),
            _ => None,
        })
    }
}

impl Host for MockHost {
    fn night_mode(&self) -> bool {
        self.night_mode
    }

    fn point_version(&self) -> HostVersion {
        self.version
    }

    fn ui_state(&self) -> UiState {
        self.ui_state
    }

    fn available_hooks(&self) -> Vec<String> {
        self.hooks.clone()
    }

    fn reapply_base_style(&mut self) {
        self.calls.push(HostCall::ReapplyBaseStyle);
    }

    fn set_web_background(&mut self, color: Rgba) {
        self.calls.push(HostCall::SetWebBackground(color));
    }

    fn set_palette(&mut self, palette: &NativePalette) {
        self.calls.push(HostCall::SetPalette(palette.clone()));
    }

    fn reapply_stylesheet(&mut self) {
        self.calls.push(HostCall::ReapplyStylesheet);
    }

    fn sync_host_color(&mut self, key: &str, light: &str, dark: &str) {
        self.calls.push(HostCall::SyncHostColor {
            key: key.to_string(),
            light: light.to_string(),
            dark: dark.to_string(),
        });
    }

    fn set_dialog_stylesheet(&mut self, dialog: DialogKind, stylesheet: &str) {
        self.calls
            .push(HostCall::SetDialogStylesheet(dialog, stylesheet.to_string()));
    }

    fn eval_dialog_script(&mut self, dialog: DialogKind, script: &str) {
        self.calls
            .push(HostCall::EvalDialogScript(dialog, script.to_string()));
    }

    fn set_toolbar_height(&mut self, height: u32) {
        self.calls.push(HostCall::SetToolbarHeight(height));
    }

    fn redraw_toolbar(&mut self) {
        self.calls.push(HostCall::RedrawToolbar);
    }

    fn reinit_reviewer(&mut self) {
        self.calls.push(HostCall::ReinitReviewer);
    }

    fn refresh_overview(&mut self) {
        self.calls.push(HostCall::RefreshOverview);
    }

    fn show_deck_browser(&mut self) {
        self.calls.push(HostCall::ShowDeckBrowser);
    }

    fn refit_bottom_bar(&mut self) {
        self.calls.push(HostCall::RefitBottomBar);
    }
}
