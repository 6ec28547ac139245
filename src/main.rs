mod common;
mod completions;
mod package;
mod setup;
mod ui;
mod webapp;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};

use crate::common::config::Config;
use crate::completions::SupportedShell;
use crate::package::commands as pkg;
use crate::setup::{ConfigCommands, InitArgs};
use crate::ui::prelude::*;
use crate::webapp::WebappCommands;

/// Install, remove and update packages across the native package manager and Flatpak
#[derive(Parser, Debug)]
#[command(name = "lazypkg", author, version, about, long_about = None)]
struct Cli {
    /// Activate debug mode
    #[arg(short, long, global = true)]
    debug: bool,

    /// Output format for events
    #[arg(long, value_enum, global = true, default_value_t = OutputFormat::Text)]
    output: OutputFormat,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Detect the system and write the initial configuration
    Init(InitArgs),

    /// Install packages from the best matching source
    Install {
        /// Package names or search terms
        #[arg(required = true)]
        packages: Vec<String>,
    },

    /// Remove installed packages
    Remove {
        #[arg(required = true)]
        packages: Vec<String>,
    },

    /// Update all enabled sources
    Update,

    /// Clear caches and remove unused packages
    Clean,

    /// List installed packages per source
    List {
        /// Show every package instead of the configured limit
        #[arg(short, long)]
        all: bool,
    },

    /// Show where a package is available without changing anything
    Search { term: String },

    /// Inspect the configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Manage web application bookmarks
    Webapp {
        #[command(subcommand)]
        command: WebappCommands,
    },

    /// Print shell completions to stdout
    Completions {
        #[arg(value_enum)]
        shell: SupportedShell,
    },
}

pub(crate) fn cli_command() -> clap::Command {
    Cli::command()
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    ui::set_debug_mode(cli.debug);
    ui::init(cli.output, !cli.no_color);

    if let Err(err) = run(cli.command).await {
        emit(Level::Error, "lazypkg.error", &format!("{:#}", err), None);
        std::process::exit(1);
    }
}

async fn run(command: Option<Commands>) -> Result<()> {
    let Some(command) = command else {
        println!("lazypkg: run with --help for usage");
        return Ok(());
    };

    match command {
        Commands::Init(args) => setup::handle_init(&args),
        Commands::Completions { shell } => {
            print!("{}", completions::generate(shell)?);
            Ok(())
        }
        Commands::Config { command } => setup::handle_config(&command),
        Commands::Install { packages } => pkg::handle_install(&Config::load()?, &packages),
        Commands::Remove { packages } => pkg::handle_remove(&Config::load()?, &packages),
        Commands::Update => pkg::handle_update(&Config::load()?).await,
        Commands::Clean => pkg::handle_clean(&Config::load()?),
        Commands::List { all } => pkg::handle_list(&Config::load()?, all),
        Commands::Search { term } => pkg::handle_search(&Config::load()?, &term),
        Commands::Webapp { command } => {
            webapp::handle_webapp_command(&command, &Config::load()?)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["lazypkg", "install", "vim", "--output", "json", "-d"]).unwrap();
        assert!(cli.debug);
        assert_eq!(cli.output, OutputFormat::Json);
        assert!(matches!(cli.command, Some(Commands::Install { ref packages }) if packages == &["vim"]));
    }

    #[test]
    fn test_install_requires_a_package() {
        assert!(Cli::try_parse_from(["lazypkg", "install"]).is_err());
    }
}
