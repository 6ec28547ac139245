//! `lazypkg init` and `lazypkg config`.

use std::io::IsTerminal;

use anyhow::{Context, Result, anyhow};
use clap::{Args, Subcommand};
use colored::*;
use dialoguer::MultiSelect;
use serde_json::json;

use super::repos::ExtraRepos;
use crate::common::config::Config;
use crate::common::distro::SystemInfo;
use crate::common::paths;
use crate::package::{NativeManager, SourceKind, ops};
use crate::ui::prelude::*;

#[derive(Args, Debug, Clone, Default)]
pub struct InitArgs {
    /// Enable Flatpak and the Flathub remote
    #[arg(long)]
    pub flatpak: bool,

    /// Enable the distribution's extra repositories
    #[arg(long)]
    pub extra_repos: bool,

    /// Do not prompt; only enable what the flags ask for
    #[arg(short, long)]
    pub yes: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommands {
    /// Print the current configuration
    Show,
    /// Print the configuration file path
    Path,
}

/// Optional sources chosen for this run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct Choices {
    flatpak: bool,
    extra_repos: bool,
}

pub fn handle_init(args: &InitArgs) -> Result<()> {
    let manager = NativeManager::detect()
        .ok_or_else(|| anyhow!("no supported package manager found (looked for dnf, apt and pacman)"))?;
    let system = SystemInfo::detect();

    emit(
        Level::Info,
        "setup.detected",
        &format!(
            "Detected {} with {}",
            system.pretty_name.bold(),
            manager.display_name()
        ),
        Some(json!({ "distro": system.pretty_name, "package_manager": manager.id() })),
    );

    // Keep tuning from an earlier init
    let mut config = if Config::exists()? {
        Config::load().unwrap_or_else(|_| Config::new(manager))
    } else {
        Config::new(manager)
    };
    config.package_manager = manager.id().to_string();

    let repos = ExtraRepos::for_os(&system.os);
    let choices = choose_sources(args, &config, repos)?;

    config.flatpak_enabled = choices.flatpak && enable_flatpak(manager);
    config.extra_repos_enabled = choices.extra_repos && enable_extra_repos(repos);

    config.save()?;
    let path = paths::config_file()?;
    emit(
        Level::Success,
        "setup.saved",
        &format!("Configuration saved to {}", path.display()),
        Some(json!({ "path": path, "config": config })),
    );

    if is_interactive_text() {
        println!();
        println!("Next steps:");
        println!("  lazypkg install <package>   install from the best source");
        println!("  lazypkg search <term>       see where a package is available");
        println!("  lazypkg update              update everything");
    }
    Ok(())
}

fn choose_sources(args: &InitArgs, config: &Config, repos: ExtraRepos) -> Result<Choices> {
    let flagged = Choices {
        flatpak: args.flatpak,
        extra_repos: args.extra_repos,
    };
    let can_prompt = is_interactive_text() && std::io::stdin().is_terminal();
    if args.yes || args.flatpak || args.extra_repos || !can_prompt {
        return Ok(flagged);
    }

    let items = ["Flatpak (apps from Flathub)", repos.describe()];
    let defaults = [config.flatpak_enabled, config.extra_repos_enabled];
    let picked = MultiSelect::new()
        .with_prompt("Select optional package sources (space to toggle, enter to confirm)")
        .items(&items)
        .defaults(&defaults)
        .interact()
        .context("reading source selection")?;

    Ok(Choices {
        flatpak: picked.contains(&0),
        extra_repos: picked.contains(&1),
    })
}

/// Install Flatpak if needed and add Flathub. Failures are warnings.
fn enable_flatpak(manager: NativeManager) -> bool {
    let result = (|| -> Result<()> {
        if which::which("flatpak").is_err() {
            emit(
                Level::Info,
                "setup.flatpak.install",
                "Installing Flatpak...",
                None,
            );
            ops::install(SourceKind::Native(manager), &["flatpak"])?;
        }
        ops::ensure_flathub()
    })();

    match result {
        Ok(()) => {
            emit(Level::Success, "setup.flatpak.ready", "Flatpak is ready", None);
            true
        }
        Err(err) => {
            emit(
                Level::Warn,
                "setup.flatpak.failed",
                &format!("Could not set up Flatpak, leaving it disabled: {:#}", err),
                None,
            );
            false
        }
    }
}

fn enable_extra_repos(repos: ExtraRepos) -> bool {
    match repos.enable() {
        Ok(enabled) => {
            if enabled {
                emit(
                    Level::Success,
                    "setup.repos.ready",
                    &format!("{} enabled", repos.describe()),
                    None,
                );
            }
            enabled
        }
        Err(err) => {
            emit(
                Level::Warn,
                "setup.repos.failed",
                &format!("Could not enable extra repositories: {:#}", err),
                None,
            );
            false
        }
    }
}

pub fn handle_config(command: &ConfigCommands) -> Result<()> {
    match command {
        ConfigCommands::Path => {
            println!("{}", paths::config_file()?.display());
            Ok(())
        }
        ConfigCommands::Show => {
            let config = Config::load()?;
            match get_output_format() {
                OutputFormat::Json => emit(
                    Level::Info,
                    "config.show",
                    "Current configuration",
                    Some(json!(config)),
                ),
                OutputFormat::Text => {
                    let rendered =
                        toml::to_string_pretty(&config).context("serializing config to toml")?;
                    print!("{}", rendered);
                }
            }
            Ok(())
        }
    }
}
