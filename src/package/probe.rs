//! Read-only queries against package sources.
//!
//! A probe never fails: a missing binary, a non-zero exit or empty output all
//! mean "no match" for that source.

use duct::cmd;

use super::manager::{Invocation, NativeManager, SourceKind};
use crate::common::shell::command_line;
use crate::ui::prelude::*;

/// One application reported by Flatpak.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppStoreHit {
    /// Reverse-DNS application id, e.g. `org.zen_browser.zen`.
    pub identifier: String,
    pub display_name: String,
}

/// The seam between resolution and the outside world.
pub trait SourceProbe {
    /// Whether the native manager's repositories carry exactly `name`.
    fn exists(&self, name: &str, manager: NativeManager) -> bool;

    /// Whether `name` is currently installed through the native manager.
    fn is_installed(&self, name: &str, manager: NativeManager) -> bool;

    /// Remote Flatpak search for `term`, unranked.
    fn search(&self, term: &str) -> Vec<AppStoreHit>;

    /// Flatpak applications installed on this system, unranked.
    fn installed_apps(&self) -> Vec<AppStoreHit>;
}

/// Probes the real system by running the commands from each source's table.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemProbe;

impl SystemProbe {
    fn read(&self, invocation: &Invocation, name: &str) -> Option<String> {
        let args = invocation.args_for(name);
        let line = command_line(invocation.program, &args);

        match cmd(invocation.program, &args)
            .stdin_null()
            .stderr_null()
            .read()
        {
            Ok(output) if !output.trim().is_empty() => Some(output),
            Ok(_) => {
                emit(
                    Level::Debug,
                    "probe.empty",
                    &format!("{} produced no output", line),
                    None,
                );
                None
            }
            Err(err) => {
                emit(
                    Level::Debug,
                    "probe.failed",
                    &format!("{} failed: {}", line, err),
                    None,
                );
                None
            }
        }
    }
}

impl SourceProbe for SystemProbe {
    fn exists(&self, name: &str, manager: NativeManager) -> bool {
        let table = SourceKind::Native(manager).commands();
        self.read(&table.query, name).is_some()
    }

    fn is_installed(&self, name: &str, manager: NativeManager) -> bool {
        let table = SourceKind::Native(manager).commands();
        match (manager, self.read(&table.installed, name)) {
            // dpkg-query also knows removed-but-configured packages
            (NativeManager::Apt, Some(status)) => status.contains("install ok installed"),
            (_, output) => output.is_some(),
        }
    }

    fn search(&self, term: &str) -> Vec<AppStoreHit> {
        self.read(&SourceKind::Flatpak.commands().query, term)
            .map(|output| parse_app_listing(&output))
            .unwrap_or_default()
    }

    fn installed_apps(&self) -> Vec<AppStoreHit> {
        self.read(&SourceKind::Flatpak.commands().installed, "")
            .map(|output| parse_app_listing(&output))
            .unwrap_or_default()
    }
}

/// Parse `application<TAB>name` lines. Lines without a tab, or whose id is
/// not dotted (at least two non-empty segments), are dropped.
pub fn parse_app_listing(output: &str) -> Vec<AppStoreHit> {
    output
        .lines()
        .filter_map(|line| {
            let (id, name) = line.split_once('\t')?;
            let id = id.trim();
            // Extra columns after the name are ignored
            let name = name.split('\t').next().unwrap_or_default().trim();

            let segments = id.split('.').filter(|s| !s.is_empty()).count();
            if segments < 2 {
                return None;
            }

            Some(AppStoreHit {
                identifier: id.to_string(),
                display_name: name.to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_app_listing() {
        let output = "org.zen_browser.zen\tZen Browser\n\
                      io.gitlab.librewolf-community\tLibreWolf\n";
        let hits = parse_app_listing(output);
        assert_eq!(
            hits,
            vec![
                AppStoreHit {
                    identifier: "org.zen_browser.zen".into(),
                    display_name: "Zen Browser".into(),
                },
                AppStoreHit {
                    identifier: "io.gitlab.librewolf-community".into(),
                    display_name: "LibreWolf".into(),
                },
            ]
        );
    }

    #[test]
    fn test_parse_drops_malformed_lines() {
        let output = "No matches found\n\
                      \n\
                      notdotted\tSomething\n\
                      .hidden\tDot Only\n\
                      \tMissing Id\n\
                      com.spotify.Client\t Spotify \textra column\n";
        let hits = parse_app_listing(output);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].identifier, "com.spotify.Client");
        assert_eq!(hits[0].display_name, "Spotify");
    }

    #[test]
    fn test_parse_empty() {
        assert!(parse_app_listing("").is_empty());
    }
}
