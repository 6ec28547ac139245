//! Per-distribution extra repositories enabled during `init`.

use anyhow::{Context, Result, bail};
use duct::cmd;

use crate::common::distro::OperatingSystem;
use crate::common::shell::command_line;
use crate::ui::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtraRepos {
    /// RPM Fusion free and nonfree
    RpmFusion,
    /// EPEL plus RPM Fusion for EL
    Epel,
    /// `alien` for converting RPMs
    Alien,
    /// AUR helpers are not packaged in the official repositories
    Aur,
    Unsupported,
}

impl ExtraRepos {
    pub fn for_os(os: &OperatingSystem) -> Self {
        match os {
            OperatingSystem::Fedora => ExtraRepos::RpmFusion,
            OperatingSystem::RedHat => ExtraRepos::Epel,
            os if os.is_debian_based() => ExtraRepos::Alien,
            os if os.is_arch_based() => ExtraRepos::Aur,
            _ => ExtraRepos::Unsupported,
        }
    }

    /// Label shown in the init prompt.
    pub fn describe(&self) -> &'static str {
        match self {
            ExtraRepos::RpmFusion => "Extra repositories (RPM Fusion)",
            ExtraRepos::Epel => "Extra repositories (EPEL and RPM Fusion)",
            ExtraRepos::Alien => "RPM package support (alien)",
            ExtraRepos::Aur => "AUR support (manual AUR helper install)",
            ExtraRepos::Unsupported => "Extra repositories (not available here)",
        }
    }

    /// Set the repositories up. Returns whether anything was enabled.
    pub fn enable(self) -> Result<bool> {
        match self {
            ExtraRepos::RpmFusion => {
                let version = rpm_macro("fedora")?;
                let urls = rpmfusion_urls("fedora", &version);
                let mut args = vec!["dnf", "install", "-y"];
                args.extend(urls.iter().map(String::as_str));
                run_sudo(&args).context("Failed to enable RPM Fusion")?;
                Ok(true)
            }
            ExtraRepos::Epel => {
                let version = rpm_macro("rhel")?;
                let urls = epel_urls(&version);
                let mut args = vec!["dnf", "install", "-y", "--nogpgcheck"];
                args.extend(urls.iter().map(String::as_str));
                run_sudo(&args).context("Failed to enable EPEL")?;
                Ok(true)
            }
            ExtraRepos::Alien => {
                run_sudo(&["apt", "install", "-y", "alien"]).context("Failed to install alien")?;
                Ok(true)
            }
            ExtraRepos::Aur => {
                emit(
                    Level::Warn,
                    "setup.repos.aur",
                    "AUR helpers are not in the official repositories; install one such as yay or paru manually",
                    None,
                );
                Ok(false)
            }
            ExtraRepos::Unsupported => {
                emit(
                    Level::Warn,
                    "setup.repos.unsupported",
                    "No extra repositories are known for this distribution",
                    None,
                );
                Ok(false)
            }
        }
    }
}

fn run_sudo(args: &[&str]) -> Result<()> {
    emit(
        Level::Debug,
        "setup.repos.run",
        &format!("Running {}", command_line("sudo", args)),
        None,
    );
    cmd("sudo", args).run()?;
    Ok(())
}

/// Evaluate `%fedora` / `%rhel` the way the release URLs expect.
fn rpm_macro(name: &str) -> Result<String> {
    let value = cmd!("rpm", "-E", format!("%{}", name))
        .stderr_null()
        .read()
        .with_context(|| format!("Failed to query the {} release with rpm", name))?;
    let value = value.trim().to_string();
    if value.is_empty() || !value.chars().all(|c| c.is_ascii_digit()) {
        bail!("rpm reported an unexpected {} release: '{}'", name, value);
    }
    Ok(value)
}

/// RPM Fusion release packages; `flavor` is `fedora` or `el`.
pub fn rpmfusion_urls(flavor: &str, version: &str) -> Vec<String> {
    ["free", "nonfree"]
        .iter()
        .map(|tree| {
            format!(
                "https://mirrors.rpmfusion.org/{tree}/{flavor}/rpmfusion-{tree}-release-{version}.noarch.rpm"
            )
        })
        .collect()
}

pub fn epel_urls(version: &str) -> Vec<String> {
    let mut urls = vec![format!(
        "https://dl.fedoraproject.org/pub/epel/epel-release-latest-{version}.noarch.rpm"
    )];
    urls.extend(rpmfusion_urls("el", version));
    urls
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_os() {
        assert_eq!(ExtraRepos::for_os(&OperatingSystem::Fedora), ExtraRepos::RpmFusion);
        assert_eq!(ExtraRepos::for_os(&OperatingSystem::RedHat), ExtraRepos::Epel);
        assert_eq!(ExtraRepos::for_os(&OperatingSystem::PopOS), ExtraRepos::Alien);
        assert_eq!(ExtraRepos::for_os(&OperatingSystem::Debian), ExtraRepos::Alien);
        assert_eq!(ExtraRepos::for_os(&OperatingSystem::Manjaro), ExtraRepos::Aur);
        assert_eq!(
            ExtraRepos::for_os(&OperatingSystem::Unknown("gentoo".into())),
            ExtraRepos::Unsupported
        );
    }

    #[test]
    fn test_rpmfusion_urls() {
        assert_eq!(
            rpmfusion_urls("fedora", "40"),
            vec![
                "https://mirrors.rpmfusion.org/free/fedora/rpmfusion-free-release-40.noarch.rpm",
                "https://mirrors.rpmfusion.org/nonfree/fedora/rpmfusion-nonfree-release-40.noarch.rpm",
            ]
        );
    }

    #[test]
    fn test_epel_urls() {
        let urls = epel_urls("9");
        assert_eq!(urls.len(), 3);
        assert_eq!(
            urls[0],
            "https://dl.fedoraproject.org/pub/epel/epel-release-latest-9.noarch.rpm"
        );
        assert!(urls[1].contains("/free/el/rpmfusion-free-release-9"));
        assert!(urls[2].contains("/nonfree/el/rpmfusion-nonfree-release-9"));
    }

    #[test]
    fn test_manual_sources_enable_nothing() {
        assert!(!ExtraRepos::Aur.enable().unwrap());
        assert!(!ExtraRepos::Unsupported.enable().unwrap());
    }
}
