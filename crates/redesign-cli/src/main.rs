//! Command-line companion for the redesign theme engine.
//!
//! Lists themes, prints the compiled CSS or the native palette for a theme,
//! and edits the user's theme files and config the same way the in-app
//! editor does.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use console::style;
use log::{debug, info};
use redesign::host::{HostCall, HostVersion, MockHost};
use redesign::inject::{inject, ResourceTable, WebContent, WebSurface};
use redesign::logging::{self, RealEnv};
use redesign::store::tagline;
use redesign::{
    get_effective_color_mode, load_config, write_config, ColorMode, Config, JsonConfigFile,
    MemoryConfigStore, Pipeline, Rgba, ThemeContext, ThemeEditor, ThemeStore,
};

#[derive(Parser, Debug)]
#[command(name = "redesign", version, about = "Inspect and edit redesign themes")]
struct Cli {
    #[command(flatten)]
    paths: Paths,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct Paths {
    /// Directory holding user theme overrides
    #[arg(long, global = true, default_value = "user_files")]
    user_dir: PathBuf,

    /// Directory of shipped themes (defaults to the built-in catalog)
    #[arg(long, global = true)]
    system_dir: Option<PathBuf>,

    /// Config file (defaults to config.json in the user directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Add-on package name used in web resource URLs
    #[arg(long, global = true, default_value = "redesign")]
    addon_package: String,

    /// Add-on install directory holding the stylesheet files
    #[arg(long, global = true, default_value = ".")]
    addon_dir: PathBuf,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List shipped and user themes
    List,
    /// Print the compiled CSS for a theme
    Css {
        /// Theme name (defaults to the configured theme)
        theme: Option<String>,
        /// Leave out the font rules
        #[arg(long)]
        no_typography: bool,
        /// Print the full injected head for a web surface instead
        #[arg(long)]
        surface: Option<String>,
        /// Host version used for surface-specific markup
        #[arg(long, default_value_t = HostVersion::MODERN.0)]
        host_version: u32,
    },
    /// Dry-run the apply step and print the host calls it makes
    Palette {
        /// Theme name (defaults to the configured theme)
        theme: Option<String>,
        #[arg(long, value_enum, default_value_t = ModeArg::Auto)]
        mode: ModeArg,
        #[arg(long, default_value_t = HostVersion::MODERN.0)]
        host_version: u32,
    },
    /// Change one color of a theme and save it as a user override
    SetColor {
        key: String,
        hex: String,
        #[arg(long, value_enum, default_value_t = ModeArg::Light)]
        mode: ModeArg,
        /// Theme to edit (defaults to the configured theme)
        #[arg(long)]
        theme: Option<String>,
    },
    /// Restore a theme's colors from the shipped version
    Reset {
        #[arg(long)]
        theme: Option<String>,
    },
    /// Show or change the add-on config
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Print the effective config
    Show,
    /// Update config values
    Set {
        #[arg(long)]
        theme: Option<String>,
        #[arg(long)]
        font: Option<String>,
        #[arg(long)]
        fallback_fonts: Option<String>,
        #[arg(long)]
        font_size: Option<u32>,
        #[arg(long)]
        font_customization: Option<bool>,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum ModeArg {
    Light,
    Dark,
    /// Follow the desktop's dark mode setting
    Auto,
}

impl ModeArg {
    fn night_mode(self) -> bool {
        match self {
            ModeArg::Light => false,
            ModeArg::Dark => true,
            ModeArg::Auto => matches!(dark_light::detect(), Ok(dark_light::Mode::Dark)),
        }
    }
}

impl Paths {
    fn store(&self) -> Result<ThemeStore> {
        match &self.system_dir {
            Some(dir) => ThemeStore::from_dir(dir, &self.user_dir)
                .with_context(|| format!("loading themes from {}", dir.display())),
            None => Ok(ThemeStore::builtin(&self.user_dir)),
        }
    }

    fn config_file(&self) -> JsonConfigFile {
        let path = self
            .config
            .clone()
            .unwrap_or_else(|| self.user_dir.join("config.json"));
        JsonConfigFile::new(path)
    }

    fn resources(&self) -> ResourceTable {
        ResourceTable::new(&self.addon_package, &self.addon_dir)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    if logging::init(&RealEnv, &cli.paths.user_dir)? {
        info!("debug logging enabled");
    }
    let result = run(cli);
    logging::flush();
    result
}

fn run(cli: Cli) -> Result<()> {
    let paths = cli.paths;
    debug!("running {:?}", cli.command);
    match cli.command {
        Command::List => list(&paths),
        Command::Css {
            theme,
            no_typography,
            surface,
            host_version,
        } => css(&paths, theme, !no_typography, surface, HostVersion(host_version)),
        Command::Palette {
            theme,
            mode,
            host_version,
        } => palette(&paths, theme, mode, HostVersion(host_version)),
        Command::SetColor {
            key,
            hex,
            mode,
            theme,
        } => set_color(&paths, theme, &key, &hex, mode),
        Command::Reset { theme } => reset(&paths, theme),
        Command::Config(ConfigCommand::Show) => show_config(&paths),
        Command::Config(ConfigCommand::Set {
            theme,
            font,
            fallback_fonts,
            font_size,
            font_customization,
        }) => {
            let mut file = paths.config_file();
            let mut config = load_config(&file)?;
            if let Some(theme) = theme {
                config.theme_name = paths.store()?.canonical_name(&theme);
            }
            if let Some(font) = font {
                config.font = font;
            }
            if let Some(fallback) = fallback_fonts {
                config.fallback_fonts = fallback;
            }
            if let Some(size) = font_size {
                if size == 0 {
                    bail!("font size must be positive");
                }
                config.font_size = size;
            }
            if let Some(enabled) = font_customization {
                config.font_customization_enabled = enabled;
            }
            write_config(&mut file, &config)?;
            print_config(&config);
            Ok(())
        }
    }
}

/// Nearest xterm-256 index for an RGB triple.
fn rgb_to_ansi256(color: Rgba) -> u8 {
    let (r, g, b) = color.rgb_tuple();
    if r == g && g == b {
        if r < 8 {
            16
        } else if r > 248 {
            231
        } else {
            232 + ((r as u16 - 8) * 24 / 247) as u8
        }
    } else {
        let scale = |c: u8| (c as u16 * 5 / 255) as u8;
        16 + 36 * scale(r) + 6 * scale(g) + scale(b)
    }
}

fn swatch(hex: &str) -> String {
    let color = Rgba::parse_or_fallback("swatch", hex);
    style("  ").on_color256(rgb_to_ansi256(color)).to_string()
}

fn list(paths: &Paths) -> Result<()> {
    let store = paths.store()?;
    let configured = load_config(&paths.config_file())?.theme_name;

    println!("{}", style("Shipped themes").bold());
    for name in store.list_system_theme_names() {
        let theme = store.get_theme(&name)?;
        let swatches: String = ["CANVAS", "FG", "BUTTON_BG", "ACCENT_CARD"]
            .iter()
            .filter_map(|key| theme.entry(key).ok())
            .map(|entry| swatch(entry.hex(ColorMode::Light)) + &swatch(entry.hex(ColorMode::Dark)))
            .collect();
        let marker = if name == configured { "*" } else { " " };
        println!(
            "{} {:<16} {} {}",
            marker,
            name,
            swatches,
            style(tagline(&name).unwrap_or("")).dim()
        );
    }

    let user = store.list_user_theme_names()?;
    if !user.is_empty() {
        println!();
        println!("{}", style("User themes").bold());
        for name in user {
            println!("  {}", name);
        }
    }
    Ok(())
}

fn resolve_context(
    paths: &Paths,
    theme: Option<String>,
    night_mode: bool,
) -> Result<(ThemeStore, ThemeContext)> {
    let store = paths.store()?;
    let mut config = load_config(&paths.config_file())?;
    if let Some(theme) = theme {
        config.theme_name = theme;
    }
    let ctx = ThemeContext::resolve(&store, config, night_mode)?;
    Ok((store, ctx))
}

fn css(
    paths: &Paths,
    theme: Option<String>,
    typography: bool,
    surface: Option<String>,
    version: HostVersion,
) -> Result<()> {
    let (_, ctx) = resolve_context(paths, theme, false)?;
    match surface {
        Some(name) => {
            let surface = WebSurface::from_context(&name);
            if surface == WebSurface::Other {
                bail!("unknown web surface: {}", name);
            }
            let mut content = WebContent::default();
            let injection = inject(surface, &mut content, &ctx, &paths.resources(), version)?;
            print!("{}", content.head);
            if injection.refit_bottom_bar {
                eprintln!("{}", style("bottom bar refit requested").dim());
            }
        }
        None => {
            let compiled = ctx.compile_css(typography)?;
            print!("{}", compiled.css);
            for err in &compiled.errors {
                eprintln!("{} {}", style("warning:").yellow(), err);
            }
        }
    }
    Ok(())
}

fn palette(
    paths: &Paths,
    theme: Option<String>,
    mode: ModeArg,
    version: HostVersion,
) -> Result<()> {
    let mut config = load_config(&paths.config_file())?;
    if let Some(theme) = theme {
        config.theme_name = theme;
    }
    let config_store = MemoryConfigStore::new(config.to_raw());

    let mut host = MockHost::new(version).with_night_mode(mode.night_mode());
    let mut pipeline = Pipeline::new(paths.store()?, config_store, paths.resources(), &host)?;
    pipeline.on_startup(&mut host)?;

    let ctx = pipeline.context();
    println!(
        "{} {} ({}, host {}, {:?} palette)",
        style("theme").bold(),
        ctx.theme_name(),
        get_effective_color_mode(host.night_mode),
        version,
        pipeline.capabilities().palette_era,
    );
    for call in host.take_calls() {
        match call {
            HostCall::SetPalette(palette) => {
                println!("set_palette");
                for (group, role, color) in palette.iter() {
                    println!(
                        "  {} {:<8} {:<16} {}",
                        swatch(&color.to_hex()),
                        format!("{:?}", group),
                        format!("{:?}", role),
                        color
                    );
                }
            }
            HostCall::SyncHostColor { key, light, dark } => {
                println!("sync_host_color {} {} {}", key, light, dark);
            }
            other => println!("{:?}", other),
        }
    }
    Ok(())
}

fn open_editor(paths: &Paths, theme: Option<String>) -> Result<(ThemeStore, ThemeEditor)> {
    let store = paths.store()?;
    let config = load_config(&paths.config_file())?;
    let mut editor = ThemeEditor::open(&store, config)?;
    if let Some(theme) = theme {
        editor.select_theme(&store, &theme)?;
    }
    Ok((store, editor))
}

fn set_color(
    paths: &Paths,
    theme: Option<String>,
    key: &str,
    hex: &str,
    mode: ModeArg,
) -> Result<()> {
    let mode = match mode {
        ModeArg::Auto => bail!("set-color needs an explicit --mode light or --mode dark"),
        other => get_effective_color_mode(other.night_mode()),
    };
    let (store, mut editor) = open_editor(paths, theme)?;
    editor.set_color(key, mode, hex)?;
    editor.save(&store, &mut paths.config_file())?;
    println!(
        "{} {} {} = {}",
        editor.theme_name(),
        key,
        mode,
        editor.theme().entry(key)?.hex(mode)
    );
    Ok(())
}

fn reset(paths: &Paths, theme: Option<String>) -> Result<()> {
    let (store, mut editor) = open_editor(paths, theme)?;
    editor.reset_colors(&store)?;
    editor.save(&store, &mut paths.config_file())?;
    println!("reset {}", editor.theme_name());
    Ok(())
}

fn show_config(paths: &Paths) -> Result<()> {
    let file = paths.config_file();
    let config = load_config(&file)?;
    println!("{}", style(file.path().display()).dim());
    print_config(&config);
    Ok(())
}

fn print_config(config: &Config) {
    let raw = serde_json::Value::Object(config.to_raw());
    match serde_json::to_string_pretty(&raw) {
        Ok(json) => println!("{}", json),
        Err(err) => eprintln!("{} {}", style("error:").red(), err),
    }
}
