//! Line-oriented instructions emitted by command files and scripts.
//!
//! ```text
//! url:https://example.com      open a URL in the browser
//! open:notes/todo.md           open a file or folder (relative to the commands dir)
//! exec:notepad.exe file.txt    spawn a program with optional arguments
//! stay                         keep the launcher visible afterwards
//! ```
//!
//! Blank lines and lines starting with `#` are ignored.

use crate::script::ScriptError;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    OpenUrl(String),
    OpenPath(PathBuf),
    Exec {
        program: PathBuf,
        args: Option<String>,
    },
    Stay,
}

/// Parse one line. Returns `Ok(None)` for blank and comment lines.
pub fn parse_directive(line: &str) -> Result<Option<Directive>, ScriptError> {
    let s = line.trim();
    if s.is_empty() || s.starts_with('#') {
        return Ok(None);
    }
    if s.eq_ignore_ascii_case("stay") {
        return Ok(Some(Directive::Stay));
    }
    if let Some(rest) = s.strip_prefix("url:") {
        let rest = rest.trim();
        return match url::Url::parse(rest) {
            Ok(_) => Ok(Some(Directive::OpenUrl(rest.to_string()))),
            Err(source) => Err(ScriptError::InvalidUrl {
                url: rest.to_string(),
                source,
            }),
        };
    }
    if let Some(rest) = s.strip_prefix("open:") {
        let rest = rest.trim();
        if !rest.is_empty() {
            return Ok(Some(Directive::OpenPath(PathBuf::from(rest))));
        }
    }
    if let Some(rest) = s.strip_prefix("exec:") {
        let rest = rest.trim();
        if !rest.is_empty() {
            let (program, args) = match rest.split_once(char::is_whitespace) {
                Some((p, a)) => (p, Some(a.trim().to_string())),
                None => (rest, None),
            };
            return Ok(Some(Directive::Exec {
                program: PathBuf::from(program),
                args: args.filter(|a| !a.is_empty()),
            }));
        }
    }
    Err(ScriptError::UnknownDirective(s.to_string()))
}
