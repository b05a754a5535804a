use crate::hotkey::{parse_hotkey, Hotkey};
use crate::messages::Locale;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Placeholder replaced by the submitted value in lookup URL templates.
pub const REPLACE_MARKER: &str = "REPLACEME";

/// An interactive trigger that asks for one value and opens a URL built from it.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct LookupFlow {
    /// Command name that opens the extra field.
    pub trigger: String,
    /// Label shown above the field.
    pub label: String,
    #[serde(default = "default_lookup_color")]
    pub color: String,
    /// URL template containing [`REPLACE_MARKER`].
    pub url: String,
}

fn default_lookup_color() -> String {
    "white".into()
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Settings {
    pub hotkey: Option<String>,
    /// Directory searched for `<command>.py` / `<command>.txt`. Relative paths
    /// are resolved against the application directory.
    #[serde(default)]
    pub commands_dir: Option<String>,
    /// Directory holding JSON palettes.
    #[serde(default)]
    pub themes_dir: Option<String>,
    #[serde(default = "default_theme")]
    pub theme: String,
    /// When enabled the application initialises the logger at debug level.
    #[serde(default)]
    pub debug_logging: bool,
    /// Optional log file. Logs go to stdout when absent.
    #[serde(default)]
    pub log_file: Option<String>,
    /// Interpreter used for `.py` commands, e.g. `"python3"` or `"py -3"`.
    #[serde(default)]
    pub script_interpreter: Option<String>,
    /// Base window size without any interactive fields.
    #[serde(default = "default_window_size")]
    pub window_size: (u32, u32),
    /// Height added to the window for every interactive field.
    #[serde(default = "default_field_height")]
    pub field_height: u32,
    #[serde(default)]
    pub locale: Locale,
    #[serde(default = "default_lookups")]
    pub lookups: Vec<LookupFlow>,
    #[serde(default)]
    pub tray_icon: Option<String>,
    #[serde(default)]
    pub window_icon: Option<String>,
}

fn default_theme() -> String {
    "blue".into()
}

fn default_window_size() -> (u32, u32) {
    (240, 100)
}

fn default_field_height() -> u32 {
    70
}

fn default_lookups() -> Vec<LookupFlow> {
    vec![LookupFlow {
        trigger: "in".into(),
        label: "CNPJ".into(),
        color: "cyan".into(),
        url: format!("https://intranet.lzt.com.br/cliente/pesquisar/{REPLACE_MARKER}"),
    }]
}

fn default_interpreter() -> &'static str {
    if cfg!(target_os = "windows") {
        "python"
    } else {
        "python3"
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            hotkey: Some("Ctrl+CapsLock".into()),
            commands_dir: None,
            themes_dir: None,
            theme: default_theme(),
            debug_logging: false,
            log_file: None,
            script_interpreter: None,
            window_size: default_window_size(),
            field_height: default_field_height(),
            locale: Locale::default(),
            lookups: default_lookups(),
            tray_icon: None,
            window_icon: None,
        }
    }
}

/// Directory of the running executable, falling back to the working directory.
pub fn app_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(Path::to_path_buf))
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."))
}

fn resolve(base: &Path, value: Option<&str>, fallback: &str) -> PathBuf {
    match value {
        Some(v) if Path::new(v).is_absolute() => PathBuf::from(v),
        Some(v) => base.join(v),
        None => base.join(fallback),
    }
}

impl Settings {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path).unwrap_or_default();
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: &str) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn hotkey(&self) -> Hotkey {
        if let Some(hotkey) = &self.hotkey {
            match parse_hotkey(hotkey) {
                Some(k) => return k,
                None => {
                    tracing::warn!(
                        "provided hotkey string '{}' is invalid; using default Ctrl+CapsLock",
                        hotkey
                    );
                }
            }
        }
        Hotkey::default()
    }

    pub fn commands_dir(&self, base: &Path) -> PathBuf {
        resolve(base, self.commands_dir.as_deref(), "commands")
    }

    pub fn themes_dir(&self, base: &Path) -> PathBuf {
        resolve(base, self.themes_dir.as_deref(), "themes")
    }

    pub fn log_file(&self, base: &Path) -> Option<PathBuf> {
        self.log_file
            .as_deref()
            .map(|f| resolve(base, Some(f), "launcher.log"))
    }

    pub fn tray_icon(&self, base: &Path) -> PathBuf {
        resolve(base, self.tray_icon.as_deref(), "assets/icons/trayicon.png")
    }

    pub fn window_icon(&self, base: &Path) -> PathBuf {
        resolve(base, self.window_icon.as_deref(), "assets/icons/icon.png")
    }

    /// Interpreter program and leading arguments for `.py` commands.
    pub fn interpreter(&self) -> Vec<String> {
        let raw = self
            .script_interpreter
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(default_interpreter());
        shlex::split(raw).unwrap_or_else(|| raw.split_whitespace().map(String::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hotkey::Key;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let s = Settings::load(path.to_str().unwrap()).unwrap();
        assert_eq!(s.window_size, (240, 100));
        assert_eq!(s.field_height, 70);
        assert_eq!(s.lookups.len(), 1);
        assert_eq!(s.lookups[0].trigger, "in");
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{ "hotkey": "F2", "theme": "green" }"#).unwrap();
        let s = Settings::load(path.to_str().unwrap()).unwrap();
        assert_eq!(s.theme, "green");
        assert_eq!(s.hotkey().key, Key::F(2));
        assert_eq!(s.lookups[0].label, "CNPJ");
    }

    #[test]
    fn invalid_hotkey_falls_back() {
        let s = Settings {
            hotkey: Some("Ctrl+Nope".into()),
            ..Settings::default()
        };
        let hk = s.hotkey();
        assert_eq!(hk, Hotkey::default());
        assert_eq!(hk.key, Key::CapsLock);
        assert!(hk.ctrl);
    }

    #[test]
    fn interpreter_is_split_like_a_shell() {
        let s = Settings {
            script_interpreter: Some("py -3".into()),
            ..Settings::default()
        };
        assert_eq!(s.interpreter(), vec!["py".to_string(), "-3".to_string()]);
    }

    #[test]
    fn relative_dirs_resolve_against_base() {
        let s = Settings {
            commands_dir: Some("cmds".into()),
            ..Settings::default()
        };
        let base = Path::new("/opt/launcher");
        assert_eq!(s.commands_dir(base), base.join("cmds"));
        assert_eq!(s.themes_dir(base), base.join("themes"));
    }
}
