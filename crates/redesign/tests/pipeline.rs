use std::fs;
use std::path::PathBuf;

use redesign::host::{hooks, HostCall, HostVersion, MockHost, UiState};
use redesign::inject::{DialogKind, ResourceTable, StylesheetResource, WebContent, FILES_DIR};
use redesign::palette::{ColorGroup, ColorRole};
use redesign::pipeline::PipelineState;
use redesign::{
    write_config, ColorMode, Config, ConfigStore, JsonConfigFile, Pipeline, Rgba, ThemeError,
    ThemeStore,
};
use tempfile::TempDir;

struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let files = dir.path().join("addon").join(FILES_DIR);
        fs::create_dir_all(&files).unwrap();
        for resource in StylesheetResource::ALL {
            fs::write(
                files.join(resource.file_name()),
                format!("/* {} */", resource.file_name()),
            )
            .unwrap();
        }
        Self { dir }
    }

    fn user_dir(&self) -> PathBuf {
        self.dir.path().join("user_files")
    }

    fn config_path(&self) -> PathBuf {
        self.user_dir().join("config.json")
    }

    fn pipeline(&self, host: &MockHost) -> Pipeline<JsonConfigFile> {
        Pipeline::new(
            ThemeStore::builtin(self.user_dir()),
            JsonConfigFile::new(self.config_path()),
            ResourceTable::new("redesign", self.dir.path().join("addon")),
            host,
        )
        .unwrap()
    }

    fn write_config(&self, config: &Config) {
        let mut store = JsonConfigFile::new(self.config_path());
        write_config(&mut store, config).unwrap();
    }
}

fn position(calls: &[HostCall], wanted: fn(&HostCall) -> bool) -> usize {
    calls.iter().position(wanted).expect("call not recorded")
}

#[test]
fn startup_applies_in_order() {
    let fixture = Fixture::new();
    let mut host = MockHost::new(HostVersion(60)).with_ui_state(UiState::Review);
    let mut pipeline = fixture.pipeline(&host);
    pipeline.on_startup(&mut host).unwrap();

    let calls = host.take_calls();
    let sync = position(&calls, |c| matches!(c, HostCall::SyncHostColor { .. }));
    let style = position(&calls, |c| matches!(c, HostCall::ReapplyBaseStyle));
    let background = position(&calls, |c| matches!(c, HostCall::SetWebBackground(_)));
    let palette = position(&calls, |c| matches!(c, HostCall::SetPalette(_)));
    let stylesheet = position(&calls, |c| matches!(c, HostCall::ReapplyStylesheet));
    let toolbar = position(&calls, |c| matches!(c, HostCall::RedrawToolbar));
    let reviewer = position(&calls, |c| matches!(c, HostCall::ReinitReviewer));

    assert!(sync < style);
    assert!(style < background && background < palette && palette < stylesheet);
    assert!(stylesheet < toolbar && toolbar < reviewer);
    assert_eq!(pipeline.state(), &PipelineState::Idle);
}

#[test]
fn night_mode_drives_palette_and_injection() {
    let fixture = Fixture::new();
    let mut host = MockHost::new(HostVersion(60)).with_night_mode(true);
    let mut pipeline = fixture.pipeline(&host);
    pipeline.on_startup(&mut host).unwrap();

    let canvas_dark = pipeline
        .context()
        .theme()
        .entry("CANVAS")
        .unwrap()
        .hex(ColorMode::Dark)
        .to_string();
    let palette = host.last_palette().unwrap();
    assert_eq!(
        palette.get(ColorGroup::Active, ColorRole::Window),
        Some(Rgba::parse("CANVAS", &canvas_dark).unwrap())
    );

    let mut content = WebContent {
        head: "<title>decks</title>".into(),
        ..WebContent::default()
    };
    pipeline
        .on_webview_will_set_content(&mut host, "aqt.deckbrowser.DeckBrowser", &mut content)
        .unwrap();
    assert!(content.head.starts_with("<title>decks</title>"));
    // Both modes ship in the CSS; the page picks one by class.
    assert!(content.head.contains(&format!("--canvas: {};", canvas_dark)));
    assert!(content.head.contains("body.nightMode"));
}

#[test]
fn failed_reload_keeps_last_known_good() {
    let fixture = Fixture::new();
    let mut host = MockHost::default();
    let mut pipeline = fixture.pipeline(&host);
    pipeline.on_startup(&mut host).unwrap();
    let before = pipeline.context().clone();

    fixture.write_config(&Config {
        theme_name: "Nord".into(),
        ..Config::default()
    });
    fs::write(fixture.user_dir().join("Nord.json"), "{ not json").unwrap();
    host.take_calls();

    let err = pipeline.on_theme_did_change(&mut host).unwrap_err();
    assert!(matches!(err, ThemeError::Parse { .. }));
    assert_eq!(pipeline.context(), &before);
    assert_eq!(pipeline.state(), &PipelineState::Idle);
    assert!(host.calls.is_empty());
}

#[test]
fn editor_save_reaches_the_host() {
    let fixture = Fixture::new();
    let mut host = MockHost::default();
    let mut pipeline = fixture.pipeline(&host);
    pipeline.on_startup(&mut host).unwrap();

    let mut editor = pipeline.open_editor().unwrap();
    editor.select_theme(pipeline.store(), "Graphite").unwrap();
    editor.set_color("CANVAS", ColorMode::Light, "#123456").unwrap();
    editor.config_mut().font_customization_enabled = true;
    editor.config_mut().font_size = 16;
    pipeline.save_editor(&mut editor, &mut host).unwrap();

    assert_eq!(pipeline.context().theme_name(), "Graphite");
    assert_eq!(
        host.last_palette().unwrap().window_background(),
        Rgba::rgb(0x12, 0x34, 0x56)
    );

    let stored = pipeline.config_store().read().unwrap();
    assert_eq!(stored["font_size"], "16");
    assert_eq!(stored["font_customization_enabled"], "True");
    assert_eq!(stored["theme_name"], "Graphite");

    let mut content = WebContent::default();
    pipeline
        .on_webview_will_set_content(&mut host, "Editor", &mut content)
        .unwrap();
    assert!(content.head.contains("font-size: 16px !important;"));
}

#[test]
fn ensure_user_theme_is_idempotent() {
    let fixture = Fixture::new();
    let store = ThemeStore::builtin(fixture.user_dir());

    let path = store.ensure_user_theme("sunset.json").unwrap();
    fs::write(&path, r#"{"colors": {}}"#).unwrap();
    let again = store.ensure_user_theme("Sunset").unwrap();

    assert_eq!(path, again);
    assert_eq!(fs::read_to_string(&again).unwrap(), r#"{"colors": {}}"#);
}

#[test]
fn stats_dialog_gets_script_and_stylesheet() {
    let fixture = Fixture::new();
    let mut host = MockHost::default();
    let pipeline = fixture.pipeline(&host);

    let kind = pipeline.on_dialog_opened(&mut host, "DeckStats").unwrap();
    assert_eq!(kind, Some(DialogKind::NewDeckStats));
    match host.calls.as_slice() {
        [HostCall::EvalDialogScript(DialogKind::NewDeckStats, script), HostCall::SetDialogStylesheet(DialogKind::NewDeckStats, qss)] =>
        {
            assert!(script.contains("document.head.appendChild(style)"));
            assert_eq!(qss, "/* QNewDeckStats.css */");
        }
        calls => panic!("unexpected calls: {:?}", calls),
    }
}

#[test]
fn legacy_dialog_hooks_style_only_reported_dialogs() {
    let fixture = Fixture::new();
    let mut host = MockHost::new(HostVersion(50)).with_hooks(&[hooks::TOP_TOOLBAR_DID_INIT_LINKS]);
    let pipeline = fixture.pipeline(&host);

    for name in ["Preferences", "FilteredDeckConfigDialog", "sync_log"] {
        assert_eq!(pipeline.on_dialog_opened(&mut host, name).unwrap(), None);
    }
    assert!(host.calls.is_empty());

    let kind = pipeline.on_dialog_opened(&mut host, "DeckStats").unwrap();
    assert_eq!(kind, Some(DialogKind::NewDeckStats));
    assert_eq!(
        host.take_calls(),
        vec![HostCall::SetDialogStylesheet(
            DialogKind::NewDeckStats,
            "/* QNewDeckStats.css */".into()
        )]
    );

    for name in ["AddCards", "EditCurrent", "ClosableQDialog", "AddonsDialog", "Browser"] {
        assert!(pipeline.on_dialog_opened(&mut host, name).unwrap().is_some(), "{}", name);
    }
    assert_eq!(host.calls.len(), 5);
}

#[test]
fn legacy_host_uses_legacy_palette() {
    let fixture = Fixture::new();
    let mut host = MockHost::new(HostVersion(50));
    let mut pipeline = fixture.pipeline(&host);
    pipeline.on_startup(&mut host).unwrap();

    let palette = host.last_palette().unwrap();
    let window_bg = pipeline
        .context()
        .theme()
        .entry("WINDOW_BG")
        .unwrap()
        .hex(ColorMode::Light)
        .to_string();
    assert_eq!(palette.window_background(), Rgba::parse("WINDOW_BG", &window_bg).unwrap());
    assert_eq!(
        palette.get(ColorGroup::Active, ColorRole::Highlight).map(|c| c.a),
        Some(64)
    );
}
