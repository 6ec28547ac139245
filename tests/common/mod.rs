use anyhow::Result;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A private configuration directory for one test.
pub struct TestEnvironment {
    temp_dir: TempDir,
}

impl TestEnvironment {
    pub fn new() -> Result<Self> {
        Ok(Self {
            temp_dir: tempfile::tempdir()?,
        })
    }

    /// Directory passed to the binary as `LAZYPKG_CONFIG_DIR`
    pub fn config_dir(&self) -> PathBuf {
        self.temp_dir.path().join("lazypkg")
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir().join("config.toml")
    }

    pub fn webapps_file(&self) -> PathBuf {
        self.config_dir().join("webapps.toml")
    }

    /// Write a config naming `manager`, as `lazypkg init` would.
    pub fn write_config(&self, manager: &str) -> Result<()> {
        self.write_raw_config(&format!(
            "package_manager = \"{}\"\nflatpak_enabled = false\n",
            manager
        ))
    }

    pub fn write_raw_config(&self, content: &str) -> Result<()> {
        write_file(&self.config_file(), content)
    }
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)?;
    Ok(())
}
