//! Style injection into host-rendered surfaces.
//!
//! Web views hand their pending page to [`inject`] as a [`WebContent`] before
//! it is loaded. Native dialogs go through [`style_dialog`] when they open.
//!
//! Injection is append-only. Existing `head`, `body`, `css` and `js` content
//! is never rewritten or removed. The only prepend is the hidden version
//! marker on the reviewer's bottom bar, which leaves the existing body intact
//! after it.

pub mod dialog;
pub mod resources;

use std::fmt;

use log::debug;

use crate::context::ThemeContext;
use crate::error::Result;
use crate::host::HostVersion;

pub use dialog::{style_dialog, DialogKind, DialogStyling};
pub use resources::{ResourceTable, StylesheetResource, FILES_DIR};

/// Invisible spacer that keeps the reviewer's answer buttons clear of the edge.
pub const BOTTOM_BAR_SPACER: &str =
    "<div style='height: 14px; opacity: 0; pointer-events: none;'></div>";

/// Extra height that only lives until the page's first script run, so the
/// host measures a tall enough bar before it shrinks back.
pub const BOTTOM_BAR_PAD_FIX: &str = "<div id='padFix' style='height: 30px; opacity: 0; pointer-events: none;'><script>const e = document.getElementById('padFix');e.parentElement.removeChild(e);</script></div>";

/// Hidden marker the stylesheets key on for hosts on the newer toolkit.
pub const NEW_QT6_MARKER: &str = "<div class='new-qt6' style='display: none;'></div>";

/// The host's pending page for one web view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WebContent {
    pub head: String,
    pub body: String,
    /// Stylesheet URLs loaded by the page.
    pub css: Vec<String>,
    /// Script URLs loaded by the page.
    pub js: Vec<String>,
}

/// A web rendering context of the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WebSurface {
    Reviewer,
    ReviewerBottomBar,
    DeckBrowser,
    DeckBrowserBottomBar,
    Overview,
    OverviewBottomBar,
    TopToolbar,
    Editor,
    CardLayout,
    Previewer,
    ResetRequired,
    Other,
}

/// Class names matched exactly, against the full name or its last segment.
const EXACT_SURFACES: &[(&str, WebSurface)] = &[
    ("Reviewer", WebSurface::Reviewer),
    ("DeckBrowser", WebSurface::DeckBrowser),
    ("TopToolbar", WebSurface::TopToolbar),
    ("DeckBrowserBottomBar", WebSurface::DeckBrowserBottomBar),
    ("OverviewBottomBar", WebSurface::OverviewBottomBar),
    ("Overview", WebSurface::Overview),
    ("Editor", WebSurface::Editor),
    ("ReviewerBottomBar", WebSurface::ReviewerBottomBar),
];

/// Substrings of the qualified context name, checked in order after the
/// exact names.
const NAMED_SURFACES: &[(&str, WebSurface)] = &[
    ("aqt.clayout.CardLayout", WebSurface::CardLayout),
    ("Previewer", WebSurface::Previewer),
    ("aqt.main.ResetRequired", WebSurface::ResetRequired),
];

impl WebSurface {
    /// Resolves a surface from the host's runtime type name.
    ///
    /// ```rust
    /// use redesign::inject::WebSurface;
    ///
    /// assert_eq!(WebSurface::from_context("aqt.reviewer.Reviewer"), WebSurface::Reviewer);
    /// assert_eq!(WebSurface::from_context("aqt.clayout.CardLayout"), WebSurface::CardLayout);
    /// assert_eq!(WebSurface::from_context("aqt.browser.previewer.BrowserPreviewer"), WebSurface::Previewer);
    /// assert_eq!(WebSurface::from_context("SomethingElse"), WebSurface::Other);
    /// ```
    pub fn from_context(type_name: &str) -> Self {
        let name = type_name.trim();
        let short = name.rsplit('.').next().unwrap_or(name);

        EXACT_SURFACES
            .iter()
            .find(|(class, _)| *class == name || *class == short)
            .or_else(|| NAMED_SURFACES.iter().find(|(part, _)| name.contains(part)))
            .map(|(_, surface)| *surface)
            .unwrap_or(WebSurface::Other)
    }

    /// Surfaces showing card content, which keep the card's own typography.
    pub fn is_card_rendering(self) -> bool {
        matches!(self, Self::Reviewer | Self::CardLayout | Self::Previewer)
    }

    /// Surface-specific stylesheets, appended after the global one.
    pub fn stylesheets(self) -> &'static [StylesheetResource] {
        use StylesheetResource as R;
        match self {
            Self::DeckBrowser => &[R::DeckBrowser],
            Self::TopToolbar => &[R::TopToolbar],
            Self::DeckBrowserBottomBar | Self::OverviewBottomBar => &[R::BottomBar],
            Self::Overview => &[R::Overview],
            Self::Editor => &[R::Editor],
            Self::Reviewer => &[R::Reviewer],
            Self::ReviewerBottomBar => &[R::BottomBar, R::ReviewerBottomBar],
            Self::CardLayout => &[R::CardLayout],
            Self::ResetRequired => &[R::Legacy],
            Self::Previewer | Self::Other => &[],
        }
    }
}

impl fmt::Display for WebSurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// What the host still has to do after an injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Injection {
    pub surface: WebSurface,
    /// The bottom bar grew and its height must be fitted again.
    pub refit_bottom_bar: bool,
}

/// Appends the theme to a web view's pending content.
///
/// Order: global stylesheet, compiled `<style>` block, then the surface's own
/// stylesheets. Card-rendering surfaces get no typography rule.
///
/// # Errors
///
/// Fails only if the CSS template fails to render.
pub fn inject(
    surface: WebSurface,
    content: &mut WebContent,
    ctx: &ThemeContext,
    resources: &ResourceTable,
    version: HostVersion,
) -> Result<Injection> {
    debug!("injecting theme {} into {}", ctx.theme_name(), surface);

    content
        .css
        .push(resources.web_url(StylesheetResource::Global));

    let compiled = ctx.compile_css(!surface.is_card_rendering())?;
    content.head.push_str(&compiled.style_tag());

    content.css.extend(
        surface
            .stylesheets()
            .iter()
            .map(|resource| resources.web_url(*resource)),
    );

    let refit_bottom_bar = surface == WebSurface::ReviewerBottomBar;
    if refit_bottom_bar {
        content.body.push_str(BOTTOM_BAR_SPACER);
        content.body.push_str(BOTTOM_BAR_PAD_FIX);
        if version.is_modern() {
            content.body.insert_str(0, NEW_QT6_MARKER);
        }
    }

    Ok(Injection {
        surface,
        refit_bottom_bar,
    })
}
