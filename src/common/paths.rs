use anyhow::{Context, Result};
use std::path::PathBuf;

/// Overrides the configuration directory (used by tests and packaging).
pub const CONFIG_DIR_ENV: &str = "LAZYPKG_CONFIG_DIR";

/// Directory holding `config.toml` and `webapps.toml`.
///
/// Not created here; writers create it on first save.
pub fn config_dir() -> Result<PathBuf> {
    if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(dir));
    }

    Ok(dirs::config_dir()
        .context("Unable to determine user config directory")?
        .join("lazypkg"))
}

pub fn config_file() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}

pub fn webapps_file() -> Result<PathBuf> {
    Ok(config_dir()?.join("webapps.toml"))
}

/// Create the parent directory of `path` if needed.
pub fn ensure_parent(path: &std::path::Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating directory {}", parent.display()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_env_override() {
        let tmp = tempfile::tempdir().unwrap();
        unsafe { std::env::set_var(CONFIG_DIR_ENV, tmp.path()) };
        assert_eq!(config_dir().unwrap(), tmp.path());
        assert_eq!(config_file().unwrap(), tmp.path().join("config.toml"));
        assert_eq!(webapps_file().unwrap(), tmp.path().join("webapps.toml"));
        unsafe { std::env::remove_var(CONFIG_DIR_ENV) };
    }

    #[test]
    #[serial]
    fn test_empty_override_is_ignored() {
        unsafe { std::env::set_var(CONFIG_DIR_ENV, "") };
        let dir = config_dir().unwrap();
        assert!(dir.ends_with("lazypkg"));
        unsafe { std::env::remove_var(CONFIG_DIR_ENV) };
    }
}
