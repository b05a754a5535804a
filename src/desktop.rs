use std::path::Path;

/// Side effects the launcher performs on the user's desktop.
pub trait Desktop {
    fn open_url(&mut self, url: &str) -> anyhow::Result<()>;
    /// Open a file or folder with its default handler.
    fn open_path(&mut self, path: &Path) -> anyhow::Result<()>;
    /// Spawn `program` detached. `args` is split with shell word rules.
    fn spawn(&mut self, program: &Path, args: Option<&str>) -> anyhow::Result<()>;
}

/// [`Desktop`] backed by the operating system.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemDesktop;

impl Desktop for SystemDesktop {
    fn open_url(&mut self, url: &str) -> anyhow::Result<()> {
        tracing::info!(%url, "opening url");
        open::that(url).map_err(|e| e.into())
    }

    fn open_path(&mut self, path: &Path) -> anyhow::Result<()> {
        tracing::info!(path = %path.display(), "opening path");
        open::that(path).map_err(|e| e.into())
    }

    fn spawn(&mut self, program: &Path, args: Option<&str>) -> anyhow::Result<()> {
        let mut command = std::process::Command::new(program);
        if let Some(arg_str) = args {
            let arg_str = arg_str.trim();
            if !arg_str.is_empty() {
                if let Some(list) = shlex::split(arg_str) {
                    command.args(list);
                } else {
                    command.args(arg_str.split_whitespace());
                }
            }
        }
        tracing::info!(program = %program.display(), "spawning");
        command.spawn().map(|_| ()).map_err(|e| e.into())
    }
}
