use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::common::paths;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct WebApp {
    pub name: String,
    pub url: String,
}

/// Contents of `webapps.toml`.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct WebAppStore {
    #[serde(default)]
    pub apps: Vec<WebApp>,
}

impl WebAppStore {
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::webapps_file()?)
    }

    /// A missing file is an empty store.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let s = fs::read_to_string(path)
            .with_context(|| format!("reading webapps {}", path.display()))?;
        toml::from_str(&s).with_context(|| format!("parsing webapps {}", path.display()))
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&paths::webapps_file()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        paths::ensure_parent(path)?;
        let toml = toml::to_string_pretty(self).context("serializing webapps to toml")?;
        fs::write(path, toml).with_context(|| format!("writing webapps {}", path.display()))?;
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&WebApp> {
        self.apps.iter().find(|app| app.name == name)
    }

    pub fn add(&mut self, name: &str, url: &str) -> Result<()> {
        let (name, url) = (name.trim(), url.trim());
        if name.is_empty() || url.is_empty() {
            bail!("webapp name and URL must not be empty");
        }
        if self.get(name).is_some() {
            bail!("webapp '{}' already exists", name);
        }
        self.apps.push(WebApp {
            name: name.to_string(),
            url: url.to_string(),
        });
        Ok(())
    }

    pub fn edit(&mut self, name: &str, url: &str) -> Result<()> {
        let url = url.trim();
        if url.is_empty() {
            bail!("webapp URL must not be empty");
        }
        let app = self
            .apps
            .iter_mut()
            .find(|app| app.name == name)
            .with_context(|| format!("webapp '{}' not found", name))?;
        app.url = url.to_string();
        Ok(())
    }

    pub fn delete(&mut self, name: &str) -> Result<WebApp> {
        let index = self
            .apps
            .iter()
            .position(|app| app.name == name)
            .with_context(|| format!("webapp '{}' not found", name))?;
        Ok(self.apps.remove(index))
    }
}

/// Split the browser template into argv with `{url}` substituted. The URL is
/// appended when the template has no placeholder.
pub fn launch_command(template: &str, url: &str) -> Result<Vec<String>> {
    let words = shell_words::split(template)
        .with_context(|| format!("parsing browser command '{}'", template))?;
    if words.is_empty() {
        bail!("browser command is empty");
    }

    let has_placeholder = words.iter().any(|w| w.contains("{url}"));
    let mut argv: Vec<String> = words.iter().map(|w| w.replace("{url}", url)).collect();
    if !has_placeholder {
        argv.push(url.to_string());
    }
    Ok(argv)
}
