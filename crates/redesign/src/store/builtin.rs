//! System themes shipped inside the binary.

/// `(file name, JSON content)` pairs for the shipped themes.
pub const BUILTIN_THEMES: &[(&str, &str)] = &[
    ("Anki.json", include_str!("../../themes/Anki.json")),
    ("Evergreen.json", include_str!("../../themes/Evergreen.json")),
    ("Graphite.json", include_str!("../../themes/Graphite.json")),
    ("Nord.json", include_str!("../../themes/Nord.json")),
    ("Sakura.json", include_str!("../../themes/Sakura.json")),
    ("Solarized.json", include_str!("../../themes/Solarized.json")),
    ("Sunset.json", include_str!("../../themes/Sunset.json")),
];

const TAGLINES: &[(&str, &str)] = &[
    ("Anki", "Default balanced palette"),
    ("Evergreen", "Calm moss and pine tones"),
    ("Graphite", "Refined slate neutrals"),
    ("Nord", "Cool arctic blue-greys"),
    ("Sakura", "Soft rose and plum tones"),
    ("Solarized", "Warm parchment and teal"),
    ("Sunset", "Muted terracotta warmth"),
];

/// One-line description of a shipped theme, for theme pickers.
pub fn tagline(name: &str) -> Option<&'static str> {
    TAGLINES
        .iter()
        .find(|(theme, _)| theme.eq_ignore_ascii_case(name))
        .map(|(_, line)| *line)
}
