//! Command dispatch and interactive-field handling.
//!
//! [`Launcher`] owns everything the window shows: the main input line, the
//! interactive fields appended by multi-step commands and the help overlay.
//! The GUI renders it and feeds submits and keystrokes back in; OS side
//! effects go through a [`Desktop`].

use crate::desktop::Desktop;
use crate::fields::{Continuation, FieldStack, WindowSize};
use crate::flows::FlowSet;
use crate::messages::Locale;
use crate::registry::{list_commands, CommandContext, CommandRegistry};
use crate::script::ScriptLoader;
use crate::settings::Settings;
use crate::theme::{available_themes, load_theme, Palette};
use std::path::{Path, PathBuf};

pub const EXIT_COMMAND: &str = "exit";
pub const HELP_COMMAND: &str = "?";

/// Colour role of the main input's placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Normal,
    Notice,
    Error,
}

impl Tone {
    pub fn color(self) -> &'static str {
        match self {
            Tone::Normal => "gray",
            Tone::Notice => "lime",
            Tone::Error => "red",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputLine {
    pub text: String,
    pub placeholder: String,
    pub tone: Tone,
    reset_on_key: bool,
}

impl InputLine {
    fn new(prompt: &str) -> Self {
        Self {
            text: String::new(),
            placeholder: prompt.to_string(),
            tone: Tone::Normal,
            reset_on_key: false,
        }
    }

    /// Whether the next keystroke rebuilds the interface.
    pub fn reset_pending(&self) -> bool {
        self.reset_on_key
    }
}

/// Transient list of command files shown after `?`.
#[derive(Debug, Clone, PartialEq)]
pub struct HelpOverlay {
    pub title: String,
    pub lines: Vec<String>,
    /// Screen position of the overlay's top-left corner.
    pub anchor: (f32, f32),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Empty input.
    Ignored,
    Exit,
    Help,
    Builtin(String),
    Flow(String),
    Script(PathBuf),
    ScriptFailed(String),
    NotFound(String),
    /// An interactive field was submitted.
    Field(usize),
}

/// Result of a single dispatch. `hide` applies to this dispatch only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchResult {
    pub handled: bool,
    pub hide: bool,
    pub outcome: Outcome,
}

impl DispatchResult {
    fn success(hide: bool, outcome: Outcome) -> Self {
        Self {
            handled: true,
            hide,
            outcome,
        }
    }

    fn failure(outcome: Outcome) -> Self {
        Self {
            handled: false,
            hide: false,
            outcome,
        }
    }
}

pub struct Launcher<D: Desktop> {
    locale: Locale,
    registry: CommandRegistry,
    scripts: ScriptLoader,
    flows: FlowSet,
    fields: FieldStack,
    input: InputLine,
    overlay: Option<HelpOverlay>,
    notices: Vec<String>,
    exit_requested: bool,
    themes_dir: PathBuf,
    palette: Palette,
    settings: Settings,
    settings_path: Option<PathBuf>,
    desktop: D,
}

impl<D: Desktop> Launcher<D> {
    /// Build a launcher from `settings`, resolving relative directories
    /// against `base_dir`.
    pub fn new(settings: Settings, base_dir: &Path, desktop: D) -> Self {
        let locale = settings.locale;
        let (width, height) = settings.window_size;
        let themes_dir = settings.themes_dir(base_dir);
        let mut launcher = Self {
            locale,
            registry: CommandRegistry::with_defaults(),
            scripts: ScriptLoader::new(settings.commands_dir(base_dir), settings.interpreter()),
            flows: FlowSet::new(&settings.lookups),
            fields: FieldStack::new(WindowSize { width, height }, settings.field_height),
            input: InputLine::new(locale.prompt()),
            overlay: None,
            notices: Vec::new(),
            exit_requested: false,
            themes_dir,
            palette: Palette::default(),
            settings,
            settings_path: None,
            desktop,
        };
        match load_theme(&launcher.themes_dir, &launcher.settings.theme) {
            Ok(p) => launcher.palette = p,
            Err(e) => launcher.report(format!("{e:#}")),
        }
        tracing::info!(
            commands_dir = %launcher.scripts.dir().display(),
            builtins = ?launcher.registry.names(),
            "launcher initialised"
        );
        launcher
    }

    /// Settings file opened by `cfg` and rewritten when the theme changes.
    pub fn with_settings_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.settings_path = Some(path.into());
        self
    }

    pub fn with_registry(mut self, registry: CommandRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn input(&self) -> &InputLine {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut InputLine {
        &mut self.input
    }

    pub fn fields(&self) -> &FieldStack {
        &self.fields
    }

    pub fn fields_mut(&mut self) -> &mut FieldStack {
        &mut self.fields
    }

    pub fn overlay(&self) -> Option<&HelpOverlay> {
        self.overlay.as_ref()
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn theme(&self) -> &str {
        &self.settings.theme
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn commands_dir(&self) -> &Path {
        self.scripts.dir()
    }

    pub fn window_size(&self) -> WindowSize {
        self.fields.window_size()
    }

    pub fn exit_requested(&self) -> bool {
        self.exit_requested
    }

    pub fn request_exit(&mut self) {
        tracing::info!("exit requested");
        self.exit_requested = true;
    }

    pub fn desktop(&self) -> &D {
        &self.desktop
    }

    pub fn desktop_mut(&mut self) -> &mut D {
        &mut self.desktop
    }

    /// Error messages waiting to be shown to the user.
    pub fn take_notices(&mut self) -> Vec<String> {
        std::mem::take(&mut self.notices)
    }

    fn report(&mut self, message: String) {
        tracing::error!("{message}");
        self.notices.push(message);
    }

    /// Submit the main input line and apply the post-dispatch policy.
    pub fn submit(&mut self) -> DispatchResult {
        let raw = self.input.text.clone();
        let result = self.dispatch(&raw);
        if result.handled && !matches!(result.outcome, Outcome::Exit | Outcome::Help) {
            self.input.text.clear();
            self.input.placeholder = self.locale.prompt().to_string();
            self.input.tone = Tone::Normal;
        }
        tracing::debug!(hide = result.hide, handled = result.handled, "dispatch finished");
        result
    }

    /// Resolve `raw` and apply its effect. First match wins: exit, help,
    /// built-in, interactive trigger, command file.
    pub fn dispatch(&mut self, raw: &str) -> DispatchResult {
        let command = raw.trim().to_lowercase();
        if command.is_empty() {
            return DispatchResult::failure(Outcome::Ignored);
        }
        tracing::info!(%command, "command received");

        if command == EXIT_COMMAND {
            self.request_exit();
            return DispatchResult::success(false, Outcome::Exit);
        }

        if command == HELP_COMMAND {
            self.show_help();
            self.input.text.clear();
            self.input.placeholder = self.locale.prompt().to_string();
            self.input.tone = Tone::Notice;
            self.input.reset_on_key = true;
            return DispatchResult::success(false, Outcome::Help);
        }

        let builtin_result = self.registry.get(&command).map(|builtin| {
            tracing::info!(%command, "running built-in command");
            let mut ctx = CommandContext::new(
                &mut self.desktop,
                self.scripts.dir(),
                self.settings_path.as_deref(),
            );
            builtin.run(&mut ctx)
        });
        if let Some(result) = builtin_result {
            if let Err(e) = result {
                self.report(self.locale.command_failed(&command, &format!("{e:#}")));
            }
            return DispatchResult::success(true, Outcome::Builtin(command));
        }

        if let Some(flow) = self.flows.find(&command).cloned() {
            tracing::info!(%command, "starting interactive flow");
            flow.build(&mut self.fields, self.locale);
            return DispatchResult::success(false, Outcome::Flow(command));
        }

        let Some(file) = self.scripts.resolve(&command) else {
            tracing::info!(%command, "command not found");
            self.input.text.clear();
            self.input.placeholder = self.locale.not_found(&command);
            self.input.tone = Tone::Error;
            self.input.reset_on_key = true;
            return DispatchResult::failure(Outcome::NotFound(command));
        };

        let (result, stay) = {
            let mut ctx = CommandContext::new(
                &mut self.desktop,
                self.scripts.dir(),
                self.settings_path.as_deref(),
            );
            let result = self.scripts.run(&file, &mut ctx);
            (result, ctx.stays_open())
        };
        match result {
            Ok(()) => {
                self.reset_interface();
                DispatchResult::success(!stay, Outcome::Script(file.path))
            }
            Err(e) => {
                self.report(self.locale.command_failed(&command, &e));
                DispatchResult::failure(Outcome::ScriptFailed(command))
            }
        }
    }

    /// Pass the trimmed text of field `ordinal` to its continuation. The
    /// main dispatch chain is not consulted.
    pub fn submit_field(&mut self, ordinal: usize) -> Option<DispatchResult> {
        let field = self.fields.get(ordinal)?;
        let value = field.value.trim().to_string();
        let continuation = field.continuation.clone();
        tracing::info!(ordinal, %value, "interactive field submitted");

        let hide = match continuation {
            Continuation::OpenUrl { template } => {
                let url = Continuation::url_for(&template, &value);
                if let Err(e) = self.desktop.open_url(&url) {
                    self.report(format!("{e:#}"));
                }
                true
            }
            Continuation::SelectTheme => {
                if let Err(e) = self.select_theme(&value) {
                    self.report(format!("{e:#}"));
                }
                false
            }
        };
        self.reset_interface();
        Some(DispatchResult::success(hide, Outcome::Field(ordinal)))
    }

    /// Call for every keystroke in the main input, after the text changed.
    pub fn note_keystroke(&mut self) {
        if self.overlay.take().is_some() {
            tracing::debug!("help overlay dismissed");
        }
        if self.input.reset_on_key {
            let typed = std::mem::take(&mut self.input.text);
            self.reset_interface();
            self.input.text = typed;
        }
    }

    /// Back to the idle layout: no fields, fresh input, base geometry.
    pub fn reset_interface(&mut self) {
        tracing::debug!("resetting interface");
        self.fields.reset();
        self.overlay = None;
        self.input = InputLine::new(self.locale.prompt());
    }

    pub fn show_help(&mut self) {
        let lines = match list_commands(self.scripts.dir(), self.locale) {
            Ok(entries) => entries.iter().map(ToString::to_string).collect(),
            Err(e) => {
                self.report(format!("{e:#}"));
                Vec::new()
            }
        };
        self.overlay = Some(HelpOverlay {
            title: self.locale.help_title().to_string(),
            lines,
            anchor: (0.0, 0.0),
        });
    }

    pub fn dismiss_overlay(&mut self) {
        self.overlay = None;
    }

    /// Switch palettes and persist the choice when a settings file is known.
    pub fn select_theme(&mut self, name: &str) -> anyhow::Result<()> {
        let name = name.trim();
        if !available_themes(&self.themes_dir).iter().any(|t| t == name) {
            anyhow::bail!(self.locale.unknown_theme(name));
        }
        self.palette = load_theme(&self.themes_dir, name)?;
        self.settings.theme = name.to_string();
        tracing::info!(theme = name, "theme selected");
        if let Some(path) = &self.settings_path {
            self.settings.save(&path.to_string_lossy())?;
        }
        Ok(())
    }
}
