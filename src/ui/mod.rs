//! Event output for the command line.
//!
//! Every user-facing line goes through [`emit`], which renders either a
//! colored text line or one JSON object per event. Warnings and errors go to
//! stderr, everything else to stdout.

use colored::*;
use serde::Serialize;
use std::io::{self, Write};
use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Success,
    Warn,
    Error,
    Debug,
}

impl Level {
    fn as_str(self) -> &'static str {
        match self {
            Level::Info => "info",
            Level::Success => "success",
            Level::Warn => "warn",
            Level::Error => "error",
            Level::Debug => "debug",
        }
    }

    fn to_stderr(self) -> bool {
        matches!(self, Level::Warn | Level::Error)
    }
}

#[derive(Debug, Clone, Copy)]
struct Renderer {
    format: OutputFormat,
    color: bool,
}

static RENDERER: RwLock<Renderer> = RwLock::new(Renderer {
    format: OutputFormat::Text,
    color: true,
});

static DEBUG_MODE: AtomicBool = AtomicBool::new(false);

pub fn set_debug_mode(enabled: bool) {
    DEBUG_MODE.store(enabled, Ordering::Relaxed);
}

pub fn is_debug_enabled() -> bool {
    DEBUG_MODE.load(Ordering::Relaxed)
}

pub fn init(format: OutputFormat, color: bool) {
    if let Ok(mut r) = RENDERER.write() {
        r.format = format;
        r.color = color;
    }
    if !color {
        colored::control::set_override(false);
    }
}

fn renderer() -> Renderer {
    RENDERER.read().map(|r| *r).unwrap_or(Renderer {
        format: OutputFormat::Text,
        color: false,
    })
}

pub fn get_output_format() -> OutputFormat {
    renderer().format
}

/// True when output is meant for a human (spinners, prompts, tables).
pub fn is_interactive_text() -> bool {
    matches!(get_output_format(), OutputFormat::Text)
}

#[derive(Serialize)]
struct Event<'a> {
    level: &'a str,
    code: &'a str,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<serde_json::Value>,
}

fn colorize(level: Level, s: &str) -> String {
    match level {
        Level::Info => s.normal().to_string(),
        Level::Success => s.green().bold().to_string(),
        Level::Warn => s.yellow().bold().to_string(),
        Level::Error => s.red().bold().to_string(),
        Level::Debug => s.cyan().to_string(),
    }
}

/// Drops CSI escape sequences (`ESC [ ... final-byte`).
fn strip_ansi(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\u{1b}' && chars.peek() == Some(&'[') {
            chars.next();
            for next in chars.by_ref() {
                if ('@'..='~').contains(&next) {
                    break;
                }
            }
            continue;
        }
        out.push(c);
    }
    out
}

fn render(level: Level, code: &str, message: &str, data: Option<serde_json::Value>) -> String {
    let r = renderer();
    match r.format {
        OutputFormat::Text if r.color => colorize(level, message),
        OutputFormat::Text => strip_ansi(message),
        OutputFormat::Json => {
            let clean = strip_ansi(message);
            let ev = Event {
                level: level.as_str(),
                code,
                message: &clean,
                data,
            };
            serde_json::to_string(&ev).unwrap_or_else(|_| clean.clone())
        }
    }
}

pub fn emit(level: Level, code: &str, message: &str, data: Option<serde_json::Value>) {
    if level == Level::Debug && !is_debug_enabled() {
        return;
    }
    let line = render(level, code, message, data);
    let _ = if level.to_stderr() {
        writeln!(io::stderr(), "{}", line)
    } else {
        writeln!(io::stdout(), "{}", line)
    };
}

pub mod prelude {
    pub use super::{Level, OutputFormat, emit, get_output_format, is_interactive_text};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_ansi() {
        assert_eq!(strip_ansi("\u{1b}[1;32mok\u{1b}[0m"), "ok");
        assert_eq!(strip_ansi("plain"), "plain");
        assert_eq!(strip_ansi("a\u{1b}[31mb"), "ab");
    }

    #[test]
    fn test_levels_routed_to_stderr() {
        assert!(Level::Warn.to_stderr());
        assert!(Level::Error.to_stderr());
        assert!(!Level::Info.to_stderr());
        assert!(!Level::Debug.to_stderr());
    }
}
