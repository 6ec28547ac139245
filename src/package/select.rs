//! Picking one source out of the resolver's candidates.
//!
//! A single available candidate is taken silently. Several are listed and
//! the operator types a number; empty or bad input falls back to the first
//! candidate, so the workflow is never blocked on a prompt.

use std::io::{self, BufRead, Write};

use colored::*;

use super::resolve::PackageSource;
use crate::ui::prelude::*;

/// What the operator's line of input asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    /// Blank input.
    Default,
    /// Zero-based index into the presented list.
    Index(usize),
    /// Not a number, or out of range.
    Invalid,
}

/// Interpret a 1-based choice among `count` options.
pub fn parse_choice(input: &str, count: usize) -> Choice {
    let input = input.trim();
    if input.is_empty() {
        return Choice::Default;
    }
    match input.parse::<usize>() {
        Ok(n) if (1..=count).contains(&n) => Choice::Index(n - 1),
        _ => Choice::Invalid,
    }
}

pub struct Selector<R, W> {
    input: R,
    output: W,
}

/// Where the source menu is drawn. Stdout carries JSON events under
/// `--output json`, so the menu moves to stderr there.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptStream {
    Stdout,
    Stderr,
}

impl PromptStream {
    pub fn for_format(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Text => PromptStream::Stdout,
            OutputFormat::Json => PromptStream::Stderr,
        }
    }
}

impl Write for PromptStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            PromptStream::Stdout => io::stdout().write(buf),
            PromptStream::Stderr => io::stderr().write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            PromptStream::Stdout => io::stdout().flush(),
            PromptStream::Stderr => io::stderr().flush(),
        }
    }
}

impl Selector<io::StdinLock<'static>, PromptStream> {
    /// Prompt on the terminal.
    pub fn stdin() -> Self {
        Selector::new(
            io::stdin().lock(),
            PromptStream::for_format(get_output_format()),
        )
    }
}

impl<R: BufRead, W: Write> Selector<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Reduce `candidates` to one source, or `None` when nothing is available.
    pub fn select(&mut self, candidates: &[PackageSource], package_name: &str) -> Option<PackageSource> {
        let available: Vec<&PackageSource> = candidates.iter().filter(|s| s.available).collect();

        match available.as_slice() {
            [] => None,
            [only] => {
                announce_found(only);
                Some((*only).clone())
            }
            _ => Some(self.prompt(&available, package_name).clone()),
        }
    }

    fn prompt<'c>(&mut self, available: &[&'c PackageSource], package_name: &str) -> &'c PackageSource {
        self.present(available, package_name);

        let (choice, input) = self.read_choice(available.len());
        match choice {
            Choice::Index(i) => available[i],
            Choice::Default => available[0],
            Choice::Invalid => {
                emit(
                    Level::Warn,
                    "select.invalid_choice",
                    &format!("Invalid choice '{}', using first option", input),
                    None,
                );
                available[0]
            }
        }
    }

    /// One line of operator input and the raw text for warnings. A closed
    /// stdin counts as accepting the default; unreadable input is invalid.
    fn read_choice(&mut self, count: usize) -> (Choice, String) {
        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(_) => (parse_choice(&line, count), line.trim().to_string()),
            Err(err) => (Choice::Invalid, format!("<unreadable: {}>", err)),
        }
    }

    fn present(&mut self, available: &[&PackageSource], package_name: &str) {
        let out = &mut self.output;
        let _ = writeln!(
            out,
            "\nFound '{}' in multiple sources:",
            package_name.bold()
        );
        for (i, source) in available.iter().enumerate() {
            let label = source
                .label()
                .map(|l| format!(" [{}]", l))
                .unwrap_or_default();
            let _ = writeln!(
                out,
                "  [{}] {:<10} {}{}",
                i + 1,
                source.kind.display_name(),
                describe(source),
                label.dimmed()
            );
        }
        let _ = write!(out, "\nChoose a source [1]: ");
        let _ = out.flush();
    }
}

/// `firefox`, or `Zen Browser (org.zen_browser.zen)` for store candidates.
pub fn describe(source: &PackageSource) -> String {
    match &source.display_name {
        Some(name) if !name.is_empty() => format!("{} ({})", name, source.package_name),
        _ => source.package_name.clone(),
    }
}

fn announce_found(source: &PackageSource) {
    let message = if source.kind.is_native() {
        format!("Found in {}", source.kind)
    } else {
        format!("Found in {}: {}", source.kind, describe(source))
    };
    emit(
        Level::Success,
        "select.auto",
        &message,
        Some(serde_json::json!({
            "source": source.kind.id(),
            "package": source.package_name,
        })),
    );
}
