use crate::directive::parse_directive;
use crate::registry::{strip_docstring, CommandContext};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

/// Extensions probed for `<command>.<ext>`, in order.
pub const ACCEPTED_EXTENSIONS: &[&str] = &["py", "txt"];

#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    #[error("no script interpreter configured")]
    NoInterpreter,
    #[error("could not start '{interpreter}': {source}")]
    Spawn {
        interpreter: String,
        #[source]
        source: std::io::Error,
    },
    #[error("script exited with {status}: {stderr}")]
    Failed { status: ExitStatus, stderr: String },
    #[error("unknown directive '{0}'")]
    UnknownDirective(String),
    #[error("invalid url '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("{0:#}")]
    Effect(anyhow::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptKind {
    /// Run by the interpreter; directives are read from stdout.
    Program,
    /// Plain list of directives, never executed.
    Definition,
}

impl ScriptKind {
    fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "py" => Some(Self::Program),
            "txt" => Some(Self::Definition),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptFile {
    pub path: PathBuf,
    pub kind: ScriptKind,
}

/// Command names must stay inside the commands directory.
pub fn is_safe_name(name: &str) -> bool {
    !name.is_empty() && !name.contains(['/', '\\', ':']) && !name.contains("..")
}

pub struct ScriptLoader {
    dir: PathBuf,
    interpreter: Vec<String>,
}

impl ScriptLoader {
    pub fn new(dir: impl Into<PathBuf>, interpreter: Vec<String>) -> Self {
        Self {
            dir: dir.into(),
            interpreter,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// First existing `<name>.<ext>` in [`ACCEPTED_EXTENSIONS`] order.
    pub fn resolve(&self, name: &str) -> Option<ScriptFile> {
        if !is_safe_name(name) {
            return None;
        }
        ACCEPTED_EXTENSIONS.iter().find_map(|ext| {
            let path = self.dir.join(format!("{name}.{ext}"));
            tracing::debug!(path = %path.display(), "checking for command file");
            if path.is_file() {
                ScriptKind::from_extension(ext).map(|kind| ScriptFile { path, kind })
            } else {
                None
            }
        })
    }

    /// Run `file` and apply its directives through `ctx` in order. Program
    /// output is collected once the child exits. Directives applied before a
    /// failure stay applied.
    pub fn run(&self, file: &ScriptFile, ctx: &mut CommandContext<'_>) -> Result<(), ScriptError> {
        tracing::info!(path = %file.path.display(), kind = ?file.kind, "running command file");
        match file.kind {
            ScriptKind::Definition => self.run_definition(file, ctx),
            ScriptKind::Program => self.run_program(file, ctx),
        }
    }

    fn run_definition(&self, file: &ScriptFile, ctx: &mut CommandContext<'_>) -> Result<(), ScriptError> {
        let text = std::fs::read_to_string(&file.path)?;
        for line in strip_docstring(&text).lines() {
            if let Some(directive) = parse_directive(line)? {
                ctx.apply(&directive).map_err(ScriptError::Effect)?;
            }
        }
        Ok(())
    }

    fn run_program(&self, file: &ScriptFile, ctx: &mut CommandContext<'_>) -> Result<(), ScriptError> {
        let (program, lead) = self
            .interpreter
            .split_first()
            .ok_or(ScriptError::NoInterpreter)?;
        let mut child = Command::new(program)
            .args(lead)
            .arg(&file.path)
            .current_dir(&self.dir)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| ScriptError::Spawn {
                interpreter: program.clone(),
                source,
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            let payload = serde_json::json!({
                "command": file.path.file_stem().map(|s| s.to_string_lossy()),
                "script": file.path,
                "commands_dir": self.dir,
            });
            if let Err(e) = writeln!(stdin, "{payload}") {
                if e.kind() != std::io::ErrorKind::BrokenPipe {
                    tracing::warn!(error = %e, "failed to write script context");
                }
            }
        }

        let output = child.wait_with_output()?;
        let stdout = String::from_utf8_lossy(&output.stdout);
        for line in stdout.lines() {
            match parse_directive(line) {
                Ok(Some(directive)) => ctx.apply(&directive).map_err(ScriptError::Effect)?,
                Ok(None) => {}
                Err(ScriptError::UnknownDirective(text)) => {
                    tracing::info!(script = %file.path.display(), "{text}");
                }
                Err(e) => return Err(e),
            }
        }

        if !output.status.success() {
            return Err(ScriptError::Failed {
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsafe_names_never_resolve() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("ok.txt"), "stay").unwrap();
        let loader = ScriptLoader::new(dir.path(), vec![]);
        assert!(loader.resolve("ok").is_some());
        assert!(loader.resolve("../ok").is_none());
        assert!(loader.resolve("a/b").is_none());
        assert!(loader.resolve("").is_none());
    }

    #[test]
    fn py_is_probed_before_txt() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("both.txt"), "stay").unwrap();
        std::fs::write(dir.path().join("both.py"), "print('stay')").unwrap();
        let loader = ScriptLoader::new(dir.path(), vec![]);
        let file = loader.resolve("both").unwrap();
        assert_eq!(file.kind, ScriptKind::Program);
        assert!(file.path.ends_with("both.py"));
    }
}
