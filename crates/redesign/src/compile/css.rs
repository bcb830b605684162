//! CSS rendering for web surfaces.

use minijinja::{context, Environment};
use once_cell::sync::Lazy;
use serde::Serialize;

use crate::error::Result;

/// Both color groups, then the optional typography rule.
///
/// The light group sits under the base `:root` selectors. The dark group is
/// gated on the `nightMode` body class. The page switches modes by toggling
/// that class, without recompiling anything.
const THEME_CSS: &str = r#"/* Light */
:root,
:root .isMac,
:root .isWin,
:root .isLin {
{% for d in declarations %}
    {{ d.property }}: {{ d.light }};
{% endfor %}
}
/* Dark */
:root body.nightMode,
:root body.isWin.nightMode,
:root body.isMac.nightMode,
:root body.isLin.nightMode {
{% for d in declarations %}
    {{ d.property }}: {{ d.dark }};
{% endfor %}
}
{% if typography %}
html {
    font-family: {{ typography.family }};
    font-size: {{ typography.size_px }}px !important;
    --font-size: {{ typography.size_px }}px !important;
}
{% endif %}
"#;

static ENV: Lazy<Environment<'static>> = Lazy::new(|| {
    let mut env = Environment::new();
    env.set_trim_blocks(true);
    env.set_lstrip_blocks(true);
    env.set_keep_trailing_newline(true);
    env
});

/// One color key as it appears in both groups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Declaration {
    pub key: String,
    pub property: String,
    pub light: String,
    pub dark: String,
}

/// Font settings emitted as a root-level `html` rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Typography {
    /// Primary font followed by the comma-joined fallbacks.
    pub family: String,
    pub size_px: u32,
}

pub(crate) fn render_css(declarations: &[Declaration], typography: Option<&Typography>) -> Result<String> {
    Ok(ENV.render_str(
        THEME_CSS,
        context! {
            declarations => declarations,
            typography => typography,
        },
    )?)
}
