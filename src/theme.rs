use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const BUILTIN_THEMES: &[&str] = &["blue", "green", "dark-blue"];

/// Colours of the launcher window. Values are colour names or `#rrggbb`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    #[serde(default = "default_background")]
    pub background: String,
    #[serde(default = "default_border")]
    pub border: String,
    #[serde(default = "default_entry")]
    pub entry: String,
    #[serde(default = "default_text")]
    pub text: String,
    pub accent: String,
}

fn default_background() -> String {
    "#1d1f21".into()
}

fn default_border() -> String {
    "#646464".into()
}

fn default_entry() -> String {
    "#282a2e".into()
}

fn default_text() -> String {
    "white".into()
}

impl Palette {
    fn with_accent(accent: &str) -> Self {
        Self {
            background: default_background(),
            border: default_border(),
            entry: default_entry(),
            text: default_text(),
            accent: accent.into(),
        }
    }

    pub fn builtin(name: &str) -> Option<Self> {
        match name {
            "blue" => Some(Self::with_accent("#1f6aa5")),
            "green" => Some(Self::with_accent("#2fa572")),
            "dark-blue" => Some(Self::with_accent("#3a7ebf")),
            _ => None,
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::with_accent("#1f6aa5")
    }
}

/// Theme identifiers: the built-in palettes followed by the stems of the
/// JSON files in `dir`, sorted.
pub fn available_themes(dir: &Path) -> Vec<String> {
    let mut files: Vec<String> = walkdir::WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            e.path()
                .extension()
                .map(|x| x.eq_ignore_ascii_case("json"))
                .unwrap_or(false)
        })
        .filter_map(|e| e.path().file_stem().map(|s| s.to_string_lossy().into_owned()))
        .filter(|s| !BUILTIN_THEMES.contains(&s.as_str()))
        .collect();
    files.sort();
    let mut themes: Vec<String> = BUILTIN_THEMES.iter().map(|s| s.to_string()).collect();
    themes.extend(files);
    themes
}

/// Load the palette called `name`, checking the built-ins first.
pub fn load_theme(dir: &Path, name: &str) -> anyhow::Result<Palette> {
    if let Some(p) = Palette::builtin(name) {
        return Ok(p);
    }
    if name.contains(['/', '\\']) || name.contains("..") {
        anyhow::bail!("invalid theme name '{name}'");
    }
    let path = dir.join(format!("{name}.json"));
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("reading theme {}", path.display()))?;
    let palette: Palette = serde_json::from_str(&content)
        .with_context(|| format!("parsing theme {}", path.display()))?;
    Ok(palette)
}

/// Parse a colour name or `#rrggbb` string.
pub fn parse_color(value: &str) -> Option<[u8; 3]> {
    let v = value.trim();
    if let Some(hex) = v.strip_prefix('#') {
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        return Some([r, g, b]);
    }
    let rgb = match v.to_ascii_lowercase().as_str() {
        "white" => [255, 255, 255],
        "black" => [0, 0, 0],
        "red" => [255, 0, 0],
        "lime" => [0, 255, 0],
        "green" => [0, 128, 0],
        "blue" => [0, 0, 255],
        "cyan" => [0, 255, 255],
        "yellow" => [255, 255, 0],
        "orange" => [255, 165, 0],
        "purple" => [128, 0, 128],
        "magenta" => [255, 0, 255],
        "gray" | "grey" => [128, 128, 128],
        _ => return None,
    };
    Some(rgb)
}
