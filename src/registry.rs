use crate::desktop::Desktop;
use crate::directive::Directive;
use crate::messages::Locale;
use crate::script::ACCEPTED_EXTENSIONS;
use std::fmt;
use std::path::Path;

/// Helper surface shared by built-in handlers and command files.
///
/// Everything a command may do goes through here, which keeps commands from
/// touching launcher state directly.
pub struct CommandContext<'a> {
    desktop: &'a mut dyn Desktop,
    commands_dir: &'a Path,
    settings_path: Option<&'a Path>,
    stay: bool,
}

impl<'a> CommandContext<'a> {
    pub fn new(
        desktop: &'a mut dyn Desktop,
        commands_dir: &'a Path,
        settings_path: Option<&'a Path>,
    ) -> Self {
        Self {
            desktop,
            commands_dir,
            settings_path,
            stay: false,
        }
    }

    pub fn commands_dir(&self) -> &Path {
        self.commands_dir
    }

    pub fn settings_path(&self) -> Option<&Path> {
        self.settings_path
    }

    pub fn open_url(&mut self, url: &str) -> anyhow::Result<()> {
        self.desktop.open_url(url)
    }

    /// Open `path`; relative paths are taken from the commands directory.
    pub fn open_path(&mut self, path: &Path) -> anyhow::Result<()> {
        let full = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.commands_dir.join(path)
        };
        self.desktop.open_path(&full)
    }

    pub fn spawn(&mut self, program: &Path, args: Option<&str>) -> anyhow::Result<()> {
        self.desktop.spawn(program, args)
    }

    /// Keep the launcher window visible after this command.
    pub fn stay_open(&mut self) {
        self.stay = true;
    }

    pub fn stays_open(&self) -> bool {
        self.stay
    }

    pub fn apply(&mut self, directive: &Directive) -> anyhow::Result<()> {
        tracing::debug!(?directive, "applying directive");
        match directive {
            Directive::OpenUrl(url) => self.open_url(url),
            Directive::OpenPath(path) => self.open_path(path),
            Directive::Exec { program, args } => self.spawn(program, args.as_deref()),
            Directive::Stay => {
                self.stay_open();
                Ok(())
            }
        }
    }
}

/// A command compiled into the launcher.
pub trait Builtin: Send + Sync {
    fn name(&self) -> &str;
    fn run(&self, ctx: &mut CommandContext<'_>) -> anyhow::Result<()>;
}

/// `dir`: open the commands directory in the file browser.
pub struct OpenCommandsDir;

impl Builtin for OpenCommandsDir {
    fn name(&self) -> &str {
        "dir"
    }

    fn run(&self, ctx: &mut CommandContext<'_>) -> anyhow::Result<()> {
        let dir = ctx.commands_dir().to_path_buf();
        ctx.open_path(&dir)
    }
}

/// `cfg`: open the settings file.
pub struct OpenSettings;

impl Builtin for OpenSettings {
    fn name(&self) -> &str {
        "cfg"
    }

    fn run(&self, ctx: &mut CommandContext<'_>) -> anyhow::Result<()> {
        let Some(path) = ctx.settings_path().map(Path::to_path_buf) else {
            anyhow::bail!("no settings file in use");
        };
        ctx.open_path(&path)
    }
}

/// Built-in commands, fixed once the launcher is constructed.
#[derive(Default)]
pub struct CommandRegistry {
    builtins: Vec<Box<dyn Builtin>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_defaults() -> Self {
        let mut reg = Self::new();
        reg.register(Box::new(OpenCommandsDir));
        reg.register(Box::new(OpenSettings));
        reg
    }

    /// Register a built-in. A later registration with the same name replaces
    /// the earlier one.
    pub fn register(&mut self, builtin: Box<dyn Builtin>) {
        let name = builtin.name().to_ascii_lowercase();
        self.builtins.retain(|b| b.name().to_ascii_lowercase() != name);
        self.builtins.push(builtin);
    }

    pub fn get(&self, name: &str) -> Option<&dyn Builtin> {
        self.builtins
            .iter()
            .find(|b| b.name().eq_ignore_ascii_case(name))
            .map(|b| b.as_ref())
    }

    pub fn names(&self) -> Vec<&str> {
        self.builtins.iter().map(|b| b.name()).collect()
    }
}

/// One line of the help overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandEntry {
    pub name: String,
    pub description: String,
}

impl fmt::Display for CommandEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.name, self.description)
    }
}

/// Enumerate command files in `dir` sorted by file name.
pub fn list_commands(dir: &Path, locale: Locale) -> anyhow::Result<Vec<CommandEntry>> {
    if !dir.is_dir() {
        anyhow::bail!("commands directory {} does not exist", dir.display());
    }
    let mut entries = Vec::new();
    for entry in walkdir::WalkDir::new(dir)
        .follow_links(true)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let accepted = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| ACCEPTED_EXTENSIONS.contains(&e))
            .unwrap_or(false);
        if !accepted {
            continue;
        }
        let Some(name) = path.file_stem().map(|s| s.to_string_lossy().into_owned()) else {
            continue;
        };
        entries.push(CommandEntry {
            name,
            description: command_description(path, locale),
        });
    }
    Ok(entries)
}

/// One-line description of a command file.
pub fn command_description(path: &Path, locale: Locale) -> String {
    match std::fs::read_to_string(path) {
        Ok(text) => extract_docstring(&text).unwrap_or_else(|| locale.no_description().into()),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "failed to read command file");
            locale.description_unavailable().into()
        }
    }
}

const DOC_MARKER: &str = "\"\"\"";

/// First `"""`-delimited block, whitespace collapsed to single spaces.
pub fn extract_docstring(text: &str) -> Option<String> {
    let start = text.find(DOC_MARKER)? + DOC_MARKER.len();
    let rest = &text[start..];
    let body = rest.find(DOC_MARKER).map_or(rest, |end| &rest[..end]);
    let line = body.split_whitespace().collect::<Vec<_>>().join(" ");
    (!line.is_empty()).then_some(line)
}

/// Text with the first `"""` block removed.
pub fn strip_docstring(text: &str) -> String {
    let Some(start) = text.find(DOC_MARKER) else {
        return text.to_string();
    };
    let after = &text[start + DOC_MARKER.len()..];
    match after.find(DOC_MARKER) {
        Some(end) => format!("{}{}", &text[..start], &after[end + DOC_MARKER.len()..]),
        None => text[..start].to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn docstring_multi_line_is_collapsed() {
        let text = "import x\n\"\"\"\n  Opens the\n  team wiki.\n\"\"\"\nprint(1)\n";
        assert_eq!(extract_docstring(text).as_deref(), Some("Opens the team wiki."));
    }

    #[test]
    fn docstring_closed_on_same_line() {
        let text = "\"\"\"Short one.\"\"\"\nurl:https://a.b\n\"\"\"later\"\"\"";
        assert_eq!(extract_docstring(text).as_deref(), Some("Short one."));
    }

    #[test]
    fn docstring_missing_or_empty() {
        assert_eq!(extract_docstring("url:https://a.b"), None);
        assert_eq!(extract_docstring("\"\"\"   \"\"\""), None);
    }

    #[test]
    fn strip_removes_first_block_only() {
        let text = "\"\"\"doc\nmore\"\"\"\nurl:https://a.b\n";
        assert_eq!(strip_docstring(text), "\nurl:https://a.b\n");
        assert_eq!(strip_docstring("stay"), "stay");
    }

    #[test]
    fn later_registration_replaces() {
        struct Other;
        impl Builtin for Other {
            fn name(&self) -> &str {
                "DIR"
            }
            fn run(&self, _ctx: &mut CommandContext<'_>) -> anyhow::Result<()> {
                Ok(())
            }
        }
        let mut reg = CommandRegistry::with_defaults();
        reg.register(Box::new(Other));
        assert_eq!(reg.get("dir").unwrap().name(), "DIR");
        assert_eq!(reg.names().len(), 2);
    }
}
