//! Handlers behind `install`, `remove`, `update`, `clean`, `list` and `search`.

use std::io::{BufRead, Write};

use anyhow::{Context, Result, anyhow, bail};
use colored::*;
use serde_json::json;

use super::probe::SourceProbe;
use super::select::describe;
use super::{PackageSource, ResolveError, Resolver, Selector, SourceKind, SystemProbe, ops};
use crate::common::config::Config;
use crate::common::progress::with_spinner;
use crate::ui::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operation {
    Install,
    Remove,
}

impl Operation {
    fn code(self) -> &'static str {
        match self {
            Operation::Install => "install",
            Operation::Remove => "remove",
        }
    }

    fn progressive(self) -> &'static str {
        match self {
            Operation::Install => "Installing",
            Operation::Remove => "Removing",
        }
    }

    fn past(self) -> &'static str {
        match self {
            Operation::Install => "installed",
            Operation::Remove => "removed",
        }
    }
}

pub fn handle_install(config: &Config, packages: &[String]) -> Result<()> {
    let probe = SystemProbe;
    let resolver = Resolver::new(&probe, config.source_preferences()?);
    process_packages(
        &resolver,
        &mut Selector::stdin(),
        packages,
        Operation::Install,
        |chosen| ops::install(chosen.kind, &[chosen.package_name.as_str()]),
    )
}

pub fn handle_remove(config: &Config, packages: &[String]) -> Result<()> {
    let probe = SystemProbe;
    let resolver = Resolver::new(&probe, config.source_preferences()?);
    process_packages(
        &resolver,
        &mut Selector::stdin(),
        packages,
        Operation::Remove,
        |chosen| ops::remove(chosen.kind, &[chosen.package_name.as_str()]),
    )
}

/// Resolve, select and `act` on each package in turn. Failures are reported
/// per package and summarized at the end.
fn process_packages<P, R, W, F>(
    resolver: &Resolver<'_, P>,
    selector: &mut Selector<R, W>,
    packages: &[String],
    op: Operation,
    mut act: F,
) -> Result<()>
where
    P: SourceProbe,
    R: BufRead,
    W: Write,
    F: FnMut(&PackageSource) -> Result<()>,
{
    if packages.is_empty() {
        bail!("no package specified");
    }

    let mut failed = Vec::new();

    for package in packages {
        let sources = with_spinner(format!("Looking for '{}'...", package), || match op {
            Operation::Install => resolver.resolve(package),
            Operation::Remove => resolver.resolve_for_remove(package),
        });

        let Some(chosen) = selector.select(&sources, package) else {
            emit(
                Level::Error,
                &format!("{}.not_found", op.code()),
                &ResolveError::NotFound(package.clone()).to_string(),
                Some(json!({ "package": package })),
            );
            failed.push(package.as_str());
            continue;
        };

        emit(
            Level::Info,
            &format!("{}.start", op.code()),
            &format!(
                "{} '{}' from {}...",
                op.progressive(),
                describe(&chosen),
                chosen.kind
            ),
            None,
        );

        match act(&chosen) {
            Ok(()) => emit(
                Level::Success,
                &format!("{}.done", op.code()),
                &format!("Successfully {} '{}'", op.past(), package),
                Some(json!({ "package": package, "source": chosen.kind.id(), "id": chosen.package_name })),
            ),
            Err(err) => {
                emit(
                    Level::Error,
                    &format!("{}.failed", op.code()),
                    &format!("Failed to {} '{}': {:#}", op.code(), package, err),
                    Some(json!({ "package": package, "source": chosen.kind.id() })),
                );
                failed.push(package.as_str());
            }
        }
    }

    if !failed.is_empty() {
        bail!(
            "{} of {} package(s) could not be {}: {}",
            failed.len(),
            packages.len(),
            op.past(),
            failed.join(", ")
        );
    }
    Ok(())
}

/// Native manager plus Flatpak when enabled, in that order.
fn enabled_sources(config: &Config) -> Result<Vec<SourceKind>> {
    let prefs = config.source_preferences()?;
    let mut kinds = vec![SourceKind::Native(prefs.native)];
    if prefs.flatpak_enabled {
        kinds.push(SourceKind::Flatpak);
    }
    Ok(kinds)
}

/// Result of one source's update, sent back over the results channel.
#[derive(Debug)]
struct UpdateOutcome {
    kind: SourceKind,
    error: Option<String>,
}

/// Update every enabled source concurrently and report once all are done.
pub async fn handle_update(config: &Config) -> Result<()> {
    let kinds = enabled_sources(config)?;
    emit(Level::Info, "update.start", "Updating packages...", None);
    update_sources(kinds, ops::update).await
}

async fn update_sources<F>(kinds: Vec<SourceKind>, update: F) -> Result<()>
where
    F: Fn(SourceKind) -> Result<()> + Clone + Send + 'static,
{
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let mut handles = Vec::with_capacity(kinds.len());

    for kind in kinds {
        let tx = tx.clone();
        let update = update.clone();
        handles.push(tokio::task::spawn_blocking(move || {
            emit(
                Level::Info,
                "update.source.start",
                &format!("Updating {} packages...", kind),
                None,
            );
            let error = update(kind).err().map(|e| format!("{:#}", e));
            let _ = tx.send(UpdateOutcome { kind, error });
        }));
    }
    drop(tx);

    for handle in handles {
        handle.await.context("update task panicked")?;
    }

    let mut failed = Vec::new();
    while let Some(outcome) = rx.recv().await {
        match outcome.error {
            None => emit(
                Level::Success,
                "update.source.done",
                &format!("{} packages updated", outcome.kind),
                None,
            ),
            Some(err) => {
                emit(
                    Level::Error,
                    "update.source.failed",
                    &format!("Failed to update {} packages: {}", outcome.kind, err),
                    None,
                );
                failed.push(outcome.kind.display_name());
            }
        }
    }

    if failed.is_empty() {
        emit(Level::Success, "update.done", "All updates complete!", None);
        Ok(())
    } else {
        failed.sort_unstable();
        Err(anyhow!("Some updates failed: {}", failed.join(", ")))
    }
}

pub fn handle_clean(config: &Config) -> Result<()> {
    let kinds = enabled_sources(config)?;
    emit(Level::Info, "clean.start", "Cleaning system...", None);

    let mut failed = Vec::new();
    for kind in kinds {
        match ops::clean(kind) {
            Ok(()) => emit(
                Level::Success,
                "clean.source.done",
                &format!("{} cleaned", kind),
                None,
            ),
            Err(err) => {
                emit(
                    Level::Error,
                    "clean.source.failed",
                    &format!("Failed to clean {}: {:#}", kind, err),
                    None,
                );
                failed.push(kind.display_name());
            }
        }
    }

    if !failed.is_empty() {
        bail!("Cleaning failed for: {}", failed.join(", "));
    }
    emit(Level::Success, "clean.done", "System cleaned!", None);
    Ok(())
}

/// First `limit` names plus how many were left out.
fn truncate_listing(names: &[String], limit: Option<usize>) -> (&[String], usize) {
    match limit {
        Some(limit) if names.len() > limit => (&names[..limit], names.len() - limit),
        _ => (names, 0),
    }
}

pub fn handle_list(config: &Config, all: bool) -> Result<()> {
    let limit = (!all).then_some(config.list_limit);

    for kind in enabled_sources(config)? {
        let names = ops::list(kind).unwrap_or_else(|err| {
            emit(
                Level::Debug,
                "list.failed",
                &format!("{:#}", err),
                None,
            );
            Vec::new()
        });

        if !is_interactive_text() {
            emit(
                Level::Info,
                "list.source",
                &format!("{} packages: {}", kind, names.len()),
                Some(json!({ "source": kind.id(), "packages": names })),
            );
            continue;
        }

        println!("{}", format!("{} packages:", kind).bold());
        if names.is_empty() {
            println!("  (none found)");
        }
        let (shown, hidden) = truncate_listing(&names, limit);
        for name in shown {
            println!("  • {}", name);
        }
        if hidden > 0 {
            println!("  ... and {} more", hidden);
        }
        println!();
    }
    Ok(())
}

/// Show what resolution would offer for `term` without changing anything.
pub fn handle_search(config: &Config, term: &str) -> Result<()> {
    let prefs = config.source_preferences()?;
    let probe = SystemProbe;
    let resolver = Resolver::new(&probe, prefs);
    let sources = with_spinner(format!("Looking for '{}'...", term), || {
        resolver.resolve(term)
    });
    report_search(term, &sources, get_output_format())
}

/// Print the candidates, then fail when none of them is available.
fn report_search(term: &str, sources: &[PackageSource], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let data: Vec<_> = sources
                .iter()
                .map(|s| {
                    json!({
                        "source": s.kind.id(),
                        "package": s.package_name,
                        "name": s.display_name,
                        "available": s.available,
                        "confidence": s.confidence,
                    })
                })
                .collect();
            emit(
                Level::Info,
                "search.result",
                &format!("{} candidate(s) for '{}'", sources.len(), term),
                Some(json!(data)),
            );
        }
        OutputFormat::Text => {
            for source in sources {
                let status = if source.available {
                    source
                        .label()
                        .map(|l| l.to_string())
                        .unwrap_or_default()
                        .green()
                } else {
                    "not found".red()
                };
                println!(
                    "  {:<10} {} [{}]",
                    source.kind.display_name(),
                    describe(source),
                    status
                );
            }
        }
    }

    if !sources.iter().any(|s| s.available) {
        return Err(ResolveError::NotFound(term.to_string()).into());
    }
    Ok(())
}
