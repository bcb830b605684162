//! The theme pipeline: resolve, compile, apply, refresh.
//!
//! A [`Pipeline`] owns the current [`ThemeContext`] and reacts to host
//! notifications. A full cycle moves through
//!
//! ```text
//! Idle -> Resolving { name, mode } -> Compiled -> Applied -> Idle
//! ```
//!
//! and ends with every visible window redrawn. The states a cycle went
//! through are kept in [`Pipeline::trace`].
//!
//! The pipeline is single-threaded and lives on the host's UI thread. Every
//! handler finishes its mutation before returning.

use std::fmt;

use log::{debug, warn};

use crate::config::{load_config, ConfigStore};
use crate::context::ThemeContext;
use crate::editor::ThemeEditor;
use crate::error::Result;
use crate::host::{Host, HostCapabilities, ToolbarHooks, UiState, TOOLBAR_HEIGHT};
use crate::inject::{self, style_dialog, DialogKind, Injection, ResourceTable, WebContent, WebSurface};
use crate::palette::{apply_palette, sync_host_colors};
use crate::store::ThemeStore;
use crate::theme::{get_effective_color_mode, ColorMode};

/// Where a pipeline cycle is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    Resolving { name: String, mode: ColorMode },
    Compiled,
    Applied,
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => f.write_str("idle"),
            Self::Resolving { name, mode } => write!(f, "resolving {} ({})", name, mode),
            Self::Compiled => f.write_str("compiled"),
            Self::Applied => f.write_str("applied"),
        }
    }
}

/// What started a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Startup,
    EditorSave,
    ThemeDidChange,
    RefreshSignal,
}

/// Owns the resolved theme and drives it onto a host.
///
/// `C` is where the add-on config lives. Handlers take the host by reference
/// on each call, so the pipeline never holds on to host state.
pub struct Pipeline<C: ConfigStore> {
    store: ThemeStore,
    config_store: C,
    resources: ResourceTable,
    capabilities: HostCapabilities,
    context: ThemeContext,
    state: PipelineState,
    trace: Vec<PipelineState>,
    last_trigger: Option<Trigger>,
}

impl<C: ConfigStore> Pipeline<C> {
    /// Detects host capabilities and resolves the initial context.
    ///
    /// Nothing is applied to the host yet; call [`Pipeline::on_startup`].
    pub fn new(store: ThemeStore, config_store: C, resources: ResourceTable, host: &dyn Host) -> Result<Self> {
        let capabilities = HostCapabilities::of(host);
        debug!("host capabilities: {:?}", capabilities);
        let context = ThemeContext::reload(&store, &config_store, host.night_mode())?;
        Ok(Self {
            store,
            config_store,
            resources,
            capabilities,
            context,
            state: PipelineState::Idle,
            trace: Vec::new(),
            last_trigger: None,
        })
    }

    pub fn context(&self) -> &ThemeContext {
        &self.context
    }

    pub fn capabilities(&self) -> &HostCapabilities {
        &self.capabilities
    }

    pub fn store(&self) -> &ThemeStore {
        &self.store
    }

    pub fn config_store(&self) -> &C {
        &self.config_store
    }

    pub fn resources(&self) -> &ResourceTable {
        &self.resources
    }

    pub fn state(&self) -> &PipelineState {
        &self.state
    }

    /// States visited by the most recent cycle, ending in `Idle`.
    pub fn trace(&self) -> &[PipelineState] {
        &self.trace
    }

    pub fn last_trigger(&self) -> Option<Trigger> {
        self.last_trigger
    }

    pub fn on_startup(&mut self, host: &mut dyn Host) -> Result<()> {
        debug!("startup");
        self.run(Trigger::Startup, host)
    }

    /// The host switched between light and dark.
    pub fn on_theme_did_change(&mut self, host: &mut dyn Host) -> Result<()> {
        debug!("host theme changed");
        self.run(Trigger::ThemeDidChange, host)
    }

    /// Re-reads config and theme without touching the host.
    ///
    /// Sent by the editor surface after it changes storage. The next web view
    /// load picks up the new context.
    pub fn on_refresh_signal(&mut self, host: &dyn Host) -> Result<()> {
        debug!("refresh signal");
        self.last_trigger = Some(Trigger::RefreshSignal);
        self.trace.clear();
        self.resolve(host.night_mode())?;
        self.transition(PipelineState::Idle);
        Ok(())
    }

    pub fn on_editor_saved(&mut self, host: &mut dyn Host) -> Result<()> {
        debug!("editor saved");
        self.run(Trigger::EditorSave, host)
    }

    /// Styles a web view's pending content.
    pub fn on_webview_will_set_content(
        &self,
        host: &mut dyn Host,
        context_type: &str,
        content: &mut WebContent,
    ) -> Result<Injection> {
        let surface = WebSurface::from_context(context_type);
        debug!("webview content for {} ({})", context_type, surface);
        let injection = inject::inject(
            surface,
            content,
            &self.context,
            &self.resources,
            self.capabilities.version,
        )?;
        if injection.refit_bottom_bar {
            host.refit_bottom_bar();
        }
        Ok(injection)
    }

    /// Styles a dialog that just opened.
    ///
    /// Unknown dialogs, and dialogs the host's hook style never reports, are
    /// left alone. Legacy hook hosts get the stylesheet only.
    pub fn on_dialog_opened(&self, host: &mut dyn Host, name: &str) -> Result<Option<DialogKind>> {
        let hooks = self.capabilities.dialog_hooks;
        let kind = match DialogKind::from_name(name) {
            Some(kind) if hooks.reports(kind) => kind,
            _ => {
                debug!("no styling for dialog {} ({:?} hooks)", name, hooks);
                return Ok(None);
            }
        };
        let styling = style_dialog(kind, &self.resources, &self.context)?;
        if let Some(script) = styling.script.as_ref().filter(|_| hooks.runs_scripts()) {
            host.eval_dialog_script(kind, script);
        }
        if let Some(stylesheet) = &styling.stylesheet {
            host.set_dialog_stylesheet(kind, stylesheet);
        }
        Ok(Some(kind))
    }

    /// The toolbar rebuilt its links. Older hosts need the height enforced here.
    pub fn on_toolbar_did_init_links(&self, host: &mut dyn Host) {
        if self.capabilities.toolbar_hooks == ToolbarHooks::TopToolbarLinks {
            host.set_toolbar_height(TOOLBAR_HEIGHT);
        }
    }

    /// Opens an editor on the current config.
    pub fn open_editor(&self) -> Result<ThemeEditor> {
        ThemeEditor::open(&self.store, self.context.config().clone())
    }

    /// Saves an editor and applies the result.
    pub fn save_editor(&mut self, editor: &mut ThemeEditor, host: &mut dyn Host) -> Result<()> {
        editor.save(&self.store, &mut self.config_store)?;
        self.on_editor_saved(host)
    }

    /// Redraws the toolbar, then whatever the main window shows.
    pub fn refresh_all_windows(&self, host: &mut dyn Host) {
        host.set_toolbar_height(TOOLBAR_HEIGHT);
        host.redraw_toolbar();
        match host.ui_state() {
            UiState::Review => host.reinit_reviewer(),
            UiState::Overview => host.refresh_overview(),
            UiState::DeckBrowser => host.show_deck_browser(),
            UiState::Other => {}
        }
    }

    fn run(&mut self, trigger: Trigger, host: &mut dyn Host) -> Result<()> {
        self.last_trigger = Some(trigger);
        self.trace.clear();
        self.resolve(host.night_mode())?;

        let colors = self.context.native_colors();
        for err in &colors.errors {
            warn!("{}", err);
        }
        let palette = self.capabilities.palette_era.build(&colors);
        self.transition(PipelineState::Compiled);

        sync_host_colors(host, self.context.theme());
        apply_palette(host, &palette);
        self.transition(PipelineState::Applied);

        self.refresh_all_windows(host);
        self.transition(PipelineState::Idle);
        Ok(())
    }

    /// Builds a new context and swaps it in. On failure the old one stays.
    fn resolve(&mut self, night_mode: bool) -> Result<()> {
        match self.try_resolve(night_mode) {
            Ok(context) => {
                self.context = context;
                Ok(())
            }
            Err(err) => {
                warn!("theme reload failed, keeping {}: {}", self.context.theme_name(), err);
                self.transition(PipelineState::Idle);
                Err(err)
            }
        }
    }

    fn try_resolve(&mut self, night_mode: bool) -> Result<ThemeContext> {
        let config = load_config(&self.config_store)?;
        let name = self.store.resolved_name(&config.theme_name);
        self.transition(PipelineState::Resolving {
            name,
            mode: get_effective_color_mode(night_mode),
        });
        ThemeContext::resolve(&self.store, config, night_mode)
    }

    fn transition(&mut self, next: PipelineState) {
        debug!("pipeline: {} -> {}", self.state, next);
        self.trace.push(next.clone());
        self.state = next;
    }
}
