use std::fmt;

use anyhow::{Context, Result};
use clap::ValueEnum;
use clap_complete::Shell;

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum SupportedShell {
    Bash,
    Zsh,
    Fish,
}

impl SupportedShell {
    fn as_complete_shell(self) -> Shell {
        match self {
            SupportedShell::Bash => Shell::Bash,
            SupportedShell::Zsh => Shell::Zsh,
            SupportedShell::Fish => Shell::Fish,
        }
    }
}

impl fmt::Display for SupportedShell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SupportedShell::Bash => write!(f, "bash"),
            SupportedShell::Zsh => write!(f, "zsh"),
            SupportedShell::Fish => write!(f, "fish"),
        }
    }
}

/// Render the completion script for `shell`.
pub fn generate(shell: SupportedShell) -> Result<String> {
    let mut command = crate::cli_command();
    let mut buffer = Vec::new();
    clap_complete::generate(
        shell.as_complete_shell(),
        &mut command,
        "lazypkg",
        &mut buffer,
    );
    String::from_utf8(buffer).with_context(|| format!("rendering {} completions", shell))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bash_completions_name_subcommands() {
        let script = generate(SupportedShell::Bash).unwrap();
        assert!(script.contains("lazypkg"));
        assert!(script.contains("install"));
        assert!(script.contains("webapp"));
    }

    #[test]
    fn test_every_shell_renders() {
        for shell in [SupportedShell::Bash, SupportedShell::Zsh, SupportedShell::Fish] {
            assert!(!generate(shell).unwrap().is_empty(), "{shell} produced nothing");
        }
    }
}
