//! Web application bookmarks opened in an app-mode browser window.

mod store;

use anyhow::{Context, Result};
use clap::Subcommand;
use comfy_table::{ContentArrangement, Table, presets::UTF8_FULL};
use duct::cmd;
use serde_json::json;

use crate::common::config::Config;
use crate::common::shell::command_line;
use crate::ui::prelude::*;
pub use store::{WebApp, WebAppStore, launch_command};

#[derive(Subcommand, Debug, Clone)]
pub enum WebappCommands {
    /// Save a new web app
    Add {
        /// Unique name for the web app
        name: String,
        /// Address to open
        url: String,
    },
    /// Change the URL of a saved web app
    Edit { name: String, url: String },
    /// Forget a saved web app
    Delete { name: String },
    /// Show saved web apps
    List,
    /// Launch a saved web app in the configured browser
    Open { name: String },
}

pub fn handle_webapp_command(command: &WebappCommands, config: &Config) -> Result<()> {
    let mut store = WebAppStore::load()?;

    match command {
        WebappCommands::Add { name, url } => {
            store.add(name, url)?;
            store.save()?;
            emit(
                Level::Success,
                "webapp.added",
                &format!("Added webapp '{}'", name),
                Some(json!({ "name": name, "url": url })),
            );
        }
        WebappCommands::Edit { name, url } => {
            store.edit(name, url)?;
            store.save()?;
            emit(
                Level::Success,
                "webapp.edited",
                &format!("Updated webapp '{}'", name),
                Some(json!({ "name": name, "url": url })),
            );
        }
        WebappCommands::Delete { name } => {
            store.delete(name)?;
            store.save()?;
            emit(
                Level::Success,
                "webapp.deleted",
                &format!("Deleted webapp '{}'", name),
                Some(json!({ "name": name })),
            );
        }
        WebappCommands::List => list(&store),
        WebappCommands::Open { name } => {
            let app = store
                .get(name)
                .with_context(|| format!("webapp '{}' not found", name))?;
            open(app, &config.webapp_browser)?;
        }
    }
    Ok(())
}

fn list(store: &WebAppStore) {
    if !is_interactive_text() {
        emit(
            Level::Info,
            "webapp.list",
            &format!("{} webapp(s)", store.apps.len()),
            Some(json!(store.apps)),
        );
        return;
    }

    if store.apps.is_empty() {
        println!("No webapps found");
        return;
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Name", "URL"]);
    for app in &store.apps {
        table.add_row(vec![app.name.as_str(), app.url.as_str()]);
    }
    println!("{table}");
}

/// Start the browser detached; lazypkg does not wait for it.
fn open(app: &WebApp, browser: &str) -> Result<()> {
    let argv = launch_command(browser, &app.url)?;
    let (program, args) = argv
        .split_first()
        .context("browser command is empty")?;

    emit(
        Level::Info,
        "webapp.open",
        &format!("Opening {}: {}", app.name, app.url),
        None,
    );
    emit(
        Level::Debug,
        "webapp.open.command",
        &command_line(program, args),
        None,
    );

    cmd(program, args)
        .stdin_null()
        .stdout_null()
        .stderr_null()
        .start()
        .with_context(|| format!("launching browser '{}'", program))?;
    Ok(())
}
