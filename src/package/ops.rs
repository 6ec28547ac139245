//! Running package-source commands.
//!
//! One generic runner drives every source from its [`CommandTable`]; output
//! of mutating commands is streamed straight to the terminal.

use anyhow::{Context, Result, bail};
use duct::cmd;

use super::manager::{Invocation, ListFormat, SourceKind, Step};
use crate::common::shell::command_line;
use crate::ui::prelude::*;

fn run(invocation: &Invocation, args: Vec<String>) -> Result<()> {
    emit(
        Level::Debug,
        "ops.run",
        &format!("Running {}", command_line(invocation.program, &args)),
        None,
    );
    cmd(invocation.program, &args).run()?;
    Ok(())
}

fn run_steps(kind: SourceKind, steps: &[Step]) -> Result<()> {
    for step in steps {
        emit(
            Level::Info,
            "ops.step",
            &format!("{}: {}...", kind, step.summary),
            None,
        );
        run(&step.invocation, step.invocation.args_with(&[]))
            .with_context(|| format!("{} step '{}' failed", kind, step.summary))?;
    }
    Ok(())
}

pub fn install(kind: SourceKind, packages: &[&str]) -> Result<()> {
    if packages.is_empty() {
        bail!("no packages specified");
    }
    if kind == SourceKind::Flatpak {
        ensure_flathub()?;
    }
    let table = kind.commands();
    run(&table.install, table.install.args_with(packages))
        .with_context(|| format!("Failed to install {} with {}", packages.join(", "), kind))
}

pub fn remove(kind: SourceKind, packages: &[&str]) -> Result<()> {
    if packages.is_empty() {
        bail!("no packages specified");
    }
    let table = kind.commands();
    run(&table.remove, table.remove.args_with(packages))
        .with_context(|| format!("Failed to remove {} with {}", packages.join(", "), kind))
}

pub fn update(kind: SourceKind) -> Result<()> {
    run_steps(kind, kind.commands().update)
}

pub fn clean(kind: SourceKind) -> Result<()> {
    let table = kind.commands();
    run_steps(kind, table.clean)?;

    let Some(sweep) = table.orphans else {
        return Ok(());
    };

    emit(
        Level::Info,
        "ops.orphans",
        &format!("{}: Removing orphaned packages...", kind),
        None,
    );
    // The query exits non-zero when there is nothing to report
    let orphans = cmd(sweep.query.program, sweep.query.args)
        .stderr_null()
        .unchecked()
        .read()
        .unwrap_or_default();
    let orphans: Vec<&str> = orphans.split_whitespace().collect();
    if orphans.is_empty() {
        emit(
            Level::Info,
            "ops.orphans.none",
            "No orphaned packages found",
            None,
        );
        return Ok(());
    }

    run(&sweep.remove, sweep.remove.args_with(&orphans))
        .with_context(|| format!("Failed to remove orphaned packages with {}", kind))
}

/// Installed package names. The first listing command that yields output wins.
pub fn list(kind: SourceKind) -> Result<Vec<String>> {
    let mut last_error = None;

    for listing in kind.commands().list {
        let inv = listing.invocation;
        match cmd(inv.program, inv.args).stderr_null().read() {
            Ok(output) if !output.trim().is_empty() => {
                return Ok(parse_listing(&output, listing.format));
            }
            Ok(_) => continue,
            Err(err) => {
                emit(
                    Level::Debug,
                    "ops.list.failed",
                    &format!("{} failed: {}", command_line(inv.program, inv.args), err),
                    None,
                );
                last_error = Some(err);
            }
        }
    }

    match last_error {
        Some(err) => Err(err).with_context(|| format!("Failed to list {} packages", kind)),
        None => Ok(Vec::new()),
    }
}

pub fn parse_listing(output: &str, format: ListFormat) -> Vec<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| match format {
            ListFormat::Names => Some(line),
            ListFormat::DnfList => {
                if line.starts_with("Installed Packages") {
                    return None;
                }
                let field = line.split_whitespace().next()?;
                // Strip the architecture suffix: `bash.x86_64`
                Some(field.rsplit_once('.').map_or(field, |(name, _)| name))
            }
            ListFormat::AptList => {
                if line == "Listing..." {
                    return None;
                }
                line.split('/').next()
            }
            ListFormat::PacmanQuery => line.split_whitespace().next(),
        })
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// Check if Flathub remote is configured.
fn is_flathub_configured() -> bool {
    cmd!("flatpak", "remotes", "--columns=name")
        .stderr_null()
        .read()
        .map(|output| output.lines().any(|line| line.trim() == "flathub"))
        .unwrap_or(false)
}

/// Add the Flathub remote unless it is already there.
pub fn ensure_flathub() -> Result<()> {
    if is_flathub_configured() {
        return Ok(());
    }

    emit(
        Level::Info,
        "ops.flathub",
        "Adding the Flathub remote...",
        None,
    );
    cmd!(
        "flatpak",
        "remote-add",
        "--if-not-exists",
        "flathub",
        "https://flathub.org/repo/flathub.flatpakrepo"
    )
    .run()
    .context("Failed to add Flathub remote")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dnf_list() {
        let output = "Installed Packages\n\
                      bash.x86_64            5.2.26-3.fc40     @fedora\n\
                      python3.12.x86_64      3.12.3-2.fc40     @updates\n\
                      \n";
        assert_eq!(
            parse_listing(output, ListFormat::DnfList),
            vec!["bash", "python3.12"]
        );
    }

    #[test]
    fn test_parse_apt_list() {
        let output = "Listing...\n\
                      adduser/jammy,now 3.118ubuntu5 all [installed]\n\
                      vim/jammy-updates,now 2:8.2.3995-1ubuntu2.15 amd64 [installed]\n";
        assert_eq!(parse_listing(output, ListFormat::AptList), vec!["adduser", "vim"]);
    }

    #[test]
    fn test_parse_pacman_query() {
        let output = "bash 5.2.026-2\nlinux 6.9.7.arch1-1\n";
        assert_eq!(
            parse_listing(output, ListFormat::PacmanQuery),
            vec!["bash", "linux"]
        );
    }

    #[test]
    fn test_parse_names() {
        let output = "org.mozilla.firefox\n\n  com.spotify.Client  \n";
        assert_eq!(
            parse_listing(output, ListFormat::Names),
            vec!["org.mozilla.firefox", "com.spotify.Client"]
        );
    }

    #[test]
    fn test_empty_package_list_rejected() {
        assert!(install(SourceKind::Flatpak, &[]).is_err());
        assert!(remove(SourceKind::Flatpak, &[]).is_err());
    }
}
