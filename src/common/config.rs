//! Persisted user configuration (`config.toml`).

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use super::paths;
use crate::package::{NativeManager, ResolveError, SourcePreferences};

pub const DEFAULT_WEBAPP_BROWSER: &str = "chromium-browser --app={url} --window-size=1600,900";

fn default_list_limit() -> usize {
    20
}

fn default_webapp_browser() -> String {
    DEFAULT_WEBAPP_BROWSER.to_string()
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Native manager identifier: `dnf`, `apt` or `pacman`.
    pub package_manager: String,
    #[serde(default)]
    pub flatpak_enabled: bool,
    /// RPM Fusion / EPEL / alien were set up during init.
    #[serde(default)]
    pub extra_repos_enabled: bool,
    /// How many packages `list` prints per source.
    #[serde(default = "default_list_limit")]
    pub list_limit: usize,
    /// Browser command for web apps; `{url}` is substituted.
    #[serde(default = "default_webapp_browser")]
    pub webapp_browser: String,
}

impl Config {
    pub fn new(manager: NativeManager) -> Self {
        Config {
            package_manager: manager.id().to_string(),
            flatpak_enabled: false,
            extra_repos_enabled: false,
            list_limit: default_list_limit(),
            webapp_browser: default_webapp_browser(),
        }
    }

    pub fn exists() -> Result<bool> {
        Ok(paths::config_file()?.exists())
    }

    /// Load the config, failing with an init hint when it has never been written.
    pub fn load() -> Result<Config> {
        let path = paths::config_file()?;
        if !path.exists() {
            bail!(
                "lazypkg is not initialized (no config at {}). Run: lazypkg init",
                path.display()
            );
        }
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Config> {
        let s = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        toml::from_str(&s).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&paths::config_file()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        paths::ensure_parent(path)?;
        let toml = toml::to_string_pretty(self).context("serializing config to toml")?;
        fs::write(path, toml).with_context(|| format!("writing config {}", path.display()))?;
        Ok(())
    }

    pub fn native_manager(&self) -> Result<NativeManager, ResolveError> {
        self.package_manager.parse()
    }

    /// The immutable per-invocation view the resolver works from.
    pub fn source_preferences(&self) -> Result<SourcePreferences, ResolveError> {
        Ok(SourcePreferences {
            native: self.native_manager()?,
            flatpak_enabled: self.flatpak_enabled,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("nested").join("config.toml");

        let mut config = Config::new(NativeManager::Pacman);
        config.flatpak_enabled = true;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.native_manager().unwrap(), NativeManager::Pacman);
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let config: Config = toml::from_str("package_manager = \"apt\"\n").unwrap();
        assert!(!config.flatpak_enabled);
        assert!(!config.extra_repos_enabled);
        assert_eq!(config.list_limit, 20);
        assert_eq!(config.webapp_browser, DEFAULT_WEBAPP_BROWSER);
    }

    #[test]
    fn test_unknown_manager_is_inconsistent() {
        let config: Config =
            toml::from_str("package_manager = \"zypper\"\nflatpak_enabled = true\n").unwrap();
        assert_eq!(
            config.source_preferences(),
            Err(ResolveError::UnknownManager("zypper".to_string()))
        );
    }

    #[test]
    fn test_preferences_carry_flatpak_flag() {
        let config: Config =
            toml::from_str("package_manager = \"DNF\"\nflatpak_enabled = true\n").unwrap();
        let prefs = config.source_preferences().unwrap();
        assert_eq!(prefs.native, NativeManager::Dnf);
        assert!(prefs.flatpak_enabled);
    }
}
