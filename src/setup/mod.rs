//! First-run setup for lazypkg
//!
//! This module provides the `lazypkg init` command, which detects the native
//! package manager, optionally enables Flatpak and extra repositories, and
//! writes the configuration. `lazypkg config` lives here too.

mod commands;
mod repos;

pub use commands::{ConfigCommands, InitArgs, handle_config, handle_init};
