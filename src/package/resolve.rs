//! Turning a package name into a ranked list of candidate sources.

use super::manager::{NativeManager, SourceKind};
use super::probe::{AppStoreHit, SourceProbe};
use super::score::{self, ConfidenceLabel};
use crate::ui::prelude::*;

/// Flatpak candidates kept per resolution.
pub const MAX_STORE_CANDIDATES: usize = 5;

/// Installed Flatpak apps scoring below this carry no real name signal and
/// are not offered for removal.
pub const MIN_REMOVE_CONFIDENCE: u8 = score::FIRST_WORD;

/// Native confidence: repository lookups are exact, never fuzzy.
const NATIVE_CONFIDENCE: u8 = 100;

/// Which sources are enabled, read from the config once per invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourcePreferences {
    pub native: NativeManager,
    pub flatpak_enabled: bool,
}

/// A place where the requested package might come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageSource {
    pub kind: SourceKind,
    /// Name to hand to the manager; a Flatpak app id for store candidates.
    pub package_name: String,
    /// Catalog name for store candidates.
    pub display_name: Option<String>,
    pub available: bool,
    /// Only set when `available`.
    pub confidence: Option<u8>,
}

impl PackageSource {
    fn native(manager: NativeManager, name: &str, available: bool) -> Self {
        PackageSource {
            kind: SourceKind::Native(manager),
            package_name: name.to_string(),
            display_name: None,
            available,
            confidence: available.then_some(NATIVE_CONFIDENCE),
        }
    }

    fn store(hit: AppStoreHit, confidence: u8) -> Self {
        PackageSource {
            kind: SourceKind::Flatpak,
            package_name: hit.identifier,
            display_name: Some(hit.display_name),
            available: true,
            confidence: Some(confidence),
        }
    }

    pub fn label(&self) -> Option<ConfidenceLabel> {
        self.confidence.map(ConfidenceLabel::from_score)
    }
}

pub struct Resolver<'a, P: SourceProbe> {
    probe: &'a P,
    prefs: SourcePreferences,
}

impl<'a, P: SourceProbe> Resolver<'a, P> {
    pub fn new(probe: &'a P, prefs: SourcePreferences) -> Self {
        Self { probe, prefs }
    }

    /// Candidates for installing `name`: the native entry first (available or
    /// not), then up to [`MAX_STORE_CANDIDATES`] Flatpak apps by confidence.
    ///
    /// Check `available`, not the length, to detect "not found".
    pub fn resolve(&self, name: &str) -> Vec<PackageSource> {
        let native = self.prefs.native;
        self.trace_probe(native.display_name(), name);
        let mut sources = vec![PackageSource::native(
            native,
            name,
            self.probe.exists(name, native),
        )];

        if self.prefs.flatpak_enabled {
            self.trace_probe("Flatpak", name);
            sources.extend(rank_store_hits(name, self.probe.search(name), 0));
        }

        sources
    }

    /// Like [`Self::resolve`] but only matches what is installed right now.
    pub fn resolve_for_remove(&self, name: &str) -> Vec<PackageSource> {
        let native = self.prefs.native;
        self.trace_probe(native.display_name(), name);
        let mut sources = vec![PackageSource::native(
            native,
            name,
            self.probe.is_installed(name, native),
        )];

        if self.prefs.flatpak_enabled {
            self.trace_probe("Flatpak", name);
            sources.extend(rank_store_hits(
                name,
                self.probe.installed_apps(),
                MIN_REMOVE_CONFIDENCE,
            ));
        }

        sources
    }

    fn trace_probe(&self, source: &str, name: &str) {
        emit(
            Level::Debug,
            "resolve.probe",
            &format!("Searching for '{}' in {}", name, source),
            None,
        );
    }
}

/// Score, drop anything under `min_confidence`, sort descending (stable, so
/// ties keep discovery order) and keep the best few.
fn rank_store_hits(term: &str, hits: Vec<AppStoreHit>, min_confidence: u8) -> Vec<PackageSource> {
    let mut ranked: Vec<PackageSource> = hits
        .into_iter()
        .filter_map(|hit| {
            let confidence = score::score(term, &hit.display_name, &hit.identifier);
            (confidence >= min_confidence).then(|| PackageSource::store(hit, confidence))
        })
        .collect();

    ranked.sort_by(|a, b| b.confidence.cmp(&a.confidence));
    ranked.truncate(MAX_STORE_CANDIDATES);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    /// Scripted probe that records how often Flatpak was asked.
    #[derive(Default)]
    struct FakeProbe {
        native_available: bool,
        native_installed: bool,
        store: Vec<(&'static str, &'static str)>,
        installed: Vec<(&'static str, &'static str)>,
        store_calls: Cell<usize>,
    }

    fn hits(rows: &[(&str, &str)]) -> Vec<AppStoreHit> {
        rows.iter()
            .map(|(id, name)| AppStoreHit {
                identifier: id.to_string(),
                display_name: name.to_string(),
            })
            .collect()
    }

    impl SourceProbe for FakeProbe {
        fn exists(&self, _name: &str, _manager: NativeManager) -> bool {
            self.native_available
        }

        fn is_installed(&self, _name: &str, _manager: NativeManager) -> bool {
            self.native_installed
        }

        fn search(&self, _term: &str) -> Vec<AppStoreHit> {
            self.store_calls.set(self.store_calls.get() + 1);
            hits(&self.store)
        }

        fn installed_apps(&self) -> Vec<AppStoreHit> {
            self.store_calls.set(self.store_calls.get() + 1);
            hits(&self.installed)
        }
    }

    fn prefs(flatpak_enabled: bool) -> SourcePreferences {
        SourcePreferences {
            native: NativeManager::Dnf,
            flatpak_enabled,
        }
    }

    #[test]
    fn test_native_only_when_store_disabled() {
        let probe = FakeProbe {
            native_available: true,
            store: vec![("org.mozilla.firefox", "Firefox")],
            ..Default::default()
        };
        let sources = Resolver::new(&probe, prefs(false)).resolve("firefox");

        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].kind, SourceKind::Native(NativeManager::Dnf));
        assert!(sources[0].available);
        assert_eq!(sources[0].confidence, Some(100));
        // Store is skipped entirely, not merely empty
        assert_eq!(probe.store_calls.get(), 0);
    }

    #[test]
    fn test_unavailable_native_has_no_confidence() {
        let probe = FakeProbe::default();
        let sources = Resolver::new(&probe, prefs(true)).resolve("nothing");

        assert_eq!(sources.len(), 1);
        assert!(!sources[0].available);
        assert_eq!(sources[0].confidence, None);
        assert_eq!(probe.store_calls.get(), 1);
    }

    #[test]
    fn test_zen_scenario() {
        let probe = FakeProbe {
            store: vec![("org.zen_browser.zen", "Zen Browser")],
            ..Default::default()
        };
        let sources = Resolver::new(&probe, prefs(true)).resolve("zen");

        assert_eq!(sources.len(), 2);
        assert!(!sources[0].available);
        assert_eq!(sources[1].kind, SourceKind::Flatpak);
        assert_eq!(sources[1].package_name, "org.zen_browser.zen");
        assert_eq!(sources[1].display_name.as_deref(), Some("Zen Browser"));
        assert_eq!(sources[1].confidence, Some(90));
    }

    #[test]
    fn test_store_ranked_stably_and_truncated() {
        let probe = FakeProbe {
            native_available: true,
            store: vec![
                ("org.example.First", "Private Browser"),
                ("org.example.Weak", "Unrelated"),
                ("org.example.Second", "Secure Browser"),
                ("com.browser.Exact", "Browser"),
                ("org.example.Third", "Web Browser"),
                ("org.example.Fourth", "Tiny Browser"),
                ("org.example.Fifth", "Fast Browser"),
            ],
            ..Default::default()
        };
        let sources = Resolver::new(&probe, prefs(true)).resolve("browser");

        assert_eq!(sources.len(), 1 + MAX_STORE_CANDIDATES);
        assert!(sources[0].kind.is_native());
        let ids: Vec<&str> = sources[1..].iter().map(|s| s.package_name.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "com.browser.Exact",
                "org.example.First",
                "org.example.Second",
                "org.example.Third",
                "org.example.Fourth",
            ]
        );
        assert_eq!(sources[1].confidence, Some(100));
        assert!(sources[2..].iter().all(|s| s.confidence == Some(80)));
    }

    #[test]
    fn test_resolve_is_deterministic() {
        let probe = FakeProbe {
            store: vec![
                ("org.a.One", "One Browser"),
                ("org.b.Two", "Two Browser"),
                ("org.c.Three", "Three Browser"),
            ],
            ..Default::default()
        };
        let resolver = Resolver::new(&probe, prefs(true));
        assert_eq!(resolver.resolve("browser"), resolver.resolve("browser"));
    }

    #[test]
    fn test_remove_matches_installed_only() {
        let probe = FakeProbe {
            native_available: true,
            native_installed: false,
            installed: vec![
                ("org.gimp.GIMP", "GNU Image Manipulation Program"),
                ("org.zen_browser.zen", "Zen Browser"),
                ("com.spotify.Client", "Spotify"),
            ],
            ..Default::default()
        };
        let sources = Resolver::new(&probe, prefs(true)).resolve_for_remove("zen");

        assert!(!sources[0].available);
        // Weak matches among installed apps are not offered
        assert_eq!(sources.len(), 2);
        assert_eq!(sources[1].package_name, "org.zen_browser.zen");
    }

    #[test]
    fn test_remove_native_installed() {
        let probe = FakeProbe {
            native_installed: true,
            ..Default::default()
        };
        let sources = Resolver::new(&probe, prefs(false)).resolve_for_remove("vim");
        assert_eq!(sources.len(), 1);
        assert!(sources[0].available);
        assert_eq!(sources[0].label(), Some(ConfidenceLabel::Exact));
    }
}
